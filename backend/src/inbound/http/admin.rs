//! Admin catalogue maintenance.
//!
//! ```text
//! GET  /api/v1/admin/activities
//! POST /api/v1/admin/activities {"title":"Padel","target_count":4,"location_id":1}
//! GET  /api/v1/admin/locations
//! POST /api/v1/admin/locations
//!      {"name":"Court","address":"1 Main St","latitude":25.0,"longitude":121.5}
//! PUT  /api/v1/admin/matches/{id}/cancel
//! ```

use actix_web::{HttpResponse, get, post, put, web};

use crate::domain::{Activity, ActivityDraft, Location, LocationDraft, Match, MatchStatus};
use crate::inbound::http::ApiResult;
use crate::inbound::http::guards::AdminPrincipal;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::MatchPath;

#[get("/admin/activities")]
pub async fn list_activities(
    state: web::Data<HttpState>,
    _admin: AdminPrincipal,
) -> ApiResult<web::Json<Vec<Activity>>> {
    state.catalogue.list_activities().await.map(web::Json)
}

/// Create an activity at an existing location.
#[post("/admin/activities")]
pub async fn create_activity(
    state: web::Data<HttpState>,
    AdminPrincipal(admin): AdminPrincipal,
    payload: web::Json<ActivityDraft>,
) -> ApiResult<HttpResponse> {
    let created = state
        .catalogue
        .create_activity(&admin, payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(created))
}

#[get("/admin/locations")]
pub async fn list_locations(
    state: web::Data<HttpState>,
    _admin: AdminPrincipal,
) -> ApiResult<web::Json<Vec<Location>>> {
    state.catalogue.list_locations().await.map(web::Json)
}

#[post("/admin/locations")]
pub async fn create_location(
    state: web::Data<HttpState>,
    _admin: AdminPrincipal,
    payload: web::Json<LocationDraft>,
) -> ApiResult<HttpResponse> {
    let created = state
        .catalogue
        .create_location(payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(created))
}

/// Cancel any open match regardless of who organises it.
#[put("/admin/matches/{id}/cancel")]
pub async fn cancel_match(
    MatchPath(match_id): MatchPath,
    state: web::Data<HttpState>,
    _admin: AdminPrincipal,
) -> ApiResult<web::Json<Match>> {
    state
        .matches
        .transition(match_id, MatchStatus::Cancelled)
        .await
        .map(web::Json)
}

#[cfg(test)]
#[path = "admin_tests.rs"]
mod tests;
