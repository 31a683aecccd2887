//! Match endpoints for signed-in users.
//!
//! ```text
//! GET  /api/v1/user/matches
//! POST /api/v1/user/matches {"activity_id":1,"match_time":"2026-03-01T18:00:00Z"}
//! POST /api/v1/user/matches/{id}/join
//! GET  /api/v1/user/past-matches
//! ```

use actix_web::{HttpResponse, get, post, web};

use crate::domain::{Match, MatchDraft};
use crate::inbound::http::ApiResult;
use crate::inbound::http::guards::UserPrincipal;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::MatchPath;

/// Open matches that have not started yet, soonest first.
#[get("/user/matches")]
pub async fn list_open_matches(
    state: web::Data<HttpState>,
    _caller: UserPrincipal,
) -> ApiResult<web::Json<Vec<Match>>> {
    state.matches.list_open_matches().await.map(web::Json)
}

/// Open a match organised by the caller.
///
/// Any organizer id in the body is ignored; the caller is the organizer.
#[post("/user/matches")]
pub async fn create_match(
    state: web::Data<HttpState>,
    UserPrincipal(caller): UserPrincipal,
    payload: web::Json<MatchDraft>,
) -> ApiResult<HttpResponse> {
    let created = state
        .matches
        .create_match(&caller, payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(created))
}

/// Ask to join a match. The row starts `pending`.
#[post("/user/matches/{id}/join")]
pub async fn join_match(
    MatchPath(match_id): MatchPath,
    state: web::Data<HttpState>,
    UserPrincipal(caller): UserPrincipal,
) -> ApiResult<HttpResponse> {
    let joined = state.matches.join_match(&caller, match_id).await?;
    Ok(HttpResponse::Created().json(joined))
}

/// Completed matches the caller took part in, most recent first.
#[get("/user/past-matches")]
pub async fn list_past_matches(
    state: web::Data<HttpState>,
    UserPrincipal(caller): UserPrincipal,
) -> ApiResult<web::Json<Vec<Match>>> {
    state.matches.list_past_matches(&caller).await.map(web::Json)
}

#[cfg(test)]
#[path = "matches_tests.rs"]
mod tests;
