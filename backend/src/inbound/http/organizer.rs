//! Organizer-only match management.
//!
//! ```text
//! PUT /api/v1/organizer/matches/{id}/participants/{participant_id}/approve
//! PUT /api/v1/organizer/matches/{id}/participants/{participant_id}/reject
//! PUT /api/v1/organizer/matches/{id}/close
//! PUT /api/v1/organizer/matches/{id}/complete
//! PUT /api/v1/organizer/matches/{id}/cancel
//! ```

use actix_web::{put, web};

use crate::domain::{Match, MatchParticipant, MatchStatus};
use crate::inbound::http::ApiResult;
use crate::inbound::http::guards::MatchOrganizer;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::ParticipantPath;

/// Approve a pending or rejected participant. Repeating it is harmless.
#[put("/organizer/matches/{id}/participants/{participant_id}/approve")]
pub async fn approve_participant(
    ParticipantPath(participant): ParticipantPath,
    state: web::Data<HttpState>,
    organizer: MatchOrganizer,
) -> ApiResult<web::Json<MatchParticipant>> {
    state
        .matches
        .approve_participant(organizer.match_id, participant)
        .await
        .map(web::Json)
}

#[put("/organizer/matches/{id}/participants/{participant_id}/reject")]
pub async fn reject_participant(
    ParticipantPath(participant): ParticipantPath,
    state: web::Data<HttpState>,
    organizer: MatchOrganizer,
) -> ApiResult<web::Json<MatchParticipant>> {
    state
        .matches
        .reject_participant(organizer.match_id, participant)
        .await
        .map(web::Json)
}

async fn move_to(
    state: &HttpState,
    organizer: &MatchOrganizer,
    target: MatchStatus,
) -> ApiResult<web::Json<Match>> {
    state
        .matches
        .transition(organizer.match_id, target)
        .await
        .map(web::Json)
}

/// Stop accepting joins.
#[put("/organizer/matches/{id}/close")]
pub async fn close_match(
    state: web::Data<HttpState>,
    organizer: MatchOrganizer,
) -> ApiResult<web::Json<Match>> {
    move_to(&state, &organizer, MatchStatus::Closed).await
}

/// Mark the match as played, opening the review window.
#[put("/organizer/matches/{id}/complete")]
pub async fn complete_match(
    state: web::Data<HttpState>,
    organizer: MatchOrganizer,
) -> ApiResult<web::Json<Match>> {
    move_to(&state, &organizer, MatchStatus::Completed).await
}

#[put("/organizer/matches/{id}/cancel")]
pub async fn cancel_match(
    state: web::Data<HttpState>,
    organizer: MatchOrganizer,
) -> ApiResult<web::Json<Match>> {
    move_to(&state, &organizer, MatchStatus::Cancelled).await
}
