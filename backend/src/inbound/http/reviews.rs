//! Reviews and reactions.
//!
//! ```text
//! POST /api/v1/review/matches/{id} {"reviewee_id":3,"score":5,"comment":"great"}
//! POST /api/v1/review-like/reviews/{id}/like
//! POST /api/v1/review-like/reviews/{id}/dislike
//! ```
//!
//! A reaction request answers 201 when it creates the caller's row and 200
//! when it flips an existing row. Repeating the stored reaction is a 400.

use actix_web::{HttpResponse, post, web};

use crate::domain::{Reaction, ReactionOutcome, ReviewDraft, ReviewId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::guards::{MatchReviewer, UserPrincipal};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::ReviewPath;

/// Review another participant of a recently completed match.
#[post("/review/matches/{id}")]
pub async fn create_review(
    state: web::Data<HttpState>,
    reviewer: MatchReviewer,
    payload: web::Json<ReviewDraft>,
) -> ApiResult<HttpResponse> {
    let review = state
        .reviews
        .create_review(&reviewer.principal, reviewer.match_id, payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(review))
}

async fn react(
    review: ReviewId,
    state: &HttpState,
    caller: &UserPrincipal,
    reaction: Reaction,
) -> ApiResult<HttpResponse> {
    let outcome = state.reviews.react(&caller.0, review, reaction).await?;
    let response = match &outcome {
        ReactionOutcome::Created(row) => HttpResponse::Created().json(row),
        ReactionOutcome::Changed(row) => HttpResponse::Ok().json(row),
    };
    Ok(response)
}

#[post("/review-like/reviews/{id}/like")]
pub async fn like_review(
    ReviewPath(review): ReviewPath,
    state: web::Data<HttpState>,
    caller: UserPrincipal,
) -> ApiResult<HttpResponse> {
    react(review, &state, &caller, Reaction::Like).await
}

#[post("/review-like/reviews/{id}/dislike")]
pub async fn dislike_review(
    ReviewPath(review): ReviewPath,
    state: web::Data<HttpState>,
    caller: UserPrincipal,
) -> ApiResult<HttpResponse> {
    react(review, &state, &caller, Reaction::Dislike).await
}

#[cfg(test)]
#[path = "reviews_tests.rs"]
mod tests;
