//! Account, token, and session endpoints.
//!
//! ```text
//! GET  /api/v1/profile
//! GET  /api/v1/auth/token
//! POST /api/v1/auth/refresh {"refresh_token":"<hex>"}
//! POST /api/v1/logout
//! ```
//!
//! The OAuth handshake with the social provider happens outside this crate;
//! whatever finishes it calls [`complete_social_login`] with the verified
//! profile to register the user and open a session.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::domain::ports::TokenPair;
use crate::domain::{Error, SocialProfile, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::guards::UserPrincipal;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Body for `POST /api/v1/auth/refresh`.
#[derive(Debug, Deserialize, Serialize)]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh_token: String,
}

/// Register or refresh the user behind a completed social login and bind
/// them to the session.
pub async fn complete_social_login(
    state: &HttpState,
    session: &SessionContext,
    profile: SocialProfile,
) -> ApiResult<User> {
    let user = state.accounts.sign_in_social(profile).await?;
    session.persist_user(user.id)?;
    info!(user_id = %user.id, provider = %user.social_provider, "social login completed");
    Ok(user)
}

/// The caller's stored user record.
#[get("/profile")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    UserPrincipal(caller): UserPrincipal,
) -> ApiResult<web::Json<User>> {
    state.accounts.profile(&caller).await.map(web::Json)
}

/// Exchange an authenticated session (or token) for a fresh token pair.
#[get("/auth/token")]
pub async fn issue_token(
    state: web::Data<HttpState>,
    UserPrincipal(caller): UserPrincipal,
) -> ApiResult<web::Json<TokenPair>> {
    state.accounts.issue_tokens(&caller).await.map(web::Json)
}

/// Rotate a refresh token. The presented token stops working.
#[post("/auth/refresh")]
pub async fn refresh_token(
    state: web::Data<HttpState>,
    payload: web::Json<RefreshRequest>,
) -> ApiResult<web::Json<TokenPair>> {
    let presented = payload.into_inner().refresh_token;
    if presented.trim().is_empty() {
        return Err(Error::invalid_request("refresh token required")
            .with_details(json!({ "field": "refresh_token", "code": "missing" })));
    }
    state.accounts.refresh(&presented).await.map(web::Json)
}

/// Revoke the session user's refresh tokens and drop the session.
#[post("/logout")]
pub async fn logout(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    if let Some(user) = session.user_id() {
        state.accounts.logout(user).await?;
    }
    session.purge();
    Ok(HttpResponse::Ok().json(json!({ "message": "logged out" })))
}

#[cfg(test)]
#[path = "account_tests.rs"]
mod tests;
