//! Review lifecycle service.
//!
//! Reviews are create-once and must name a registered reviewee. Reactions
//! follow toggle-upsert rules: insert when absent, flip in place when the
//! stored polarity is the opposite, and refuse a repeat of the same polarity.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    ReviewLifecycle, ReviewPersistenceError, ReviewRepository, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    Error, MatchId, NewReview, NewReviewLike, Principal, Reaction, ReactionOutcome, Review,
    ReviewDraft, ReviewId,
};

const ALREADY_REVIEWED: &str = "already reviewed";

fn map_repository_error(error: ReviewPersistenceError) -> Error {
    match error {
        ReviewPersistenceError::Connection { message } => {
            Error::internal(format!("review repository unavailable: {message}"))
        }
        ReviewPersistenceError::Query { message } => {
            Error::internal(format!("review repository error: {message}"))
        }
        ReviewPersistenceError::Conflict { message } => Error::conflict(message),
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    Error::internal(format!("reviewee lookup failed: {error}"))
}

fn duplicate_reaction(reaction: Reaction) -> Error {
    match reaction {
        Reaction::Like => Error::conflict("already liked"),
        Reaction::Dislike => Error::conflict("already disliked"),
    }
}

#[derive(Clone)]
pub struct ReviewService<R, U> {
    reviews: Arc<R>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<R, U> ReviewService<R, U> {
    pub fn new(reviews: Arc<R>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            reviews,
            users,
            clock,
        }
    }
}

#[async_trait]
impl<R, U> ReviewLifecycle for ReviewService<R, U>
where
    R: ReviewRepository,
    U: UserRepository,
{
    async fn create_review(
        &self,
        reviewer: &Principal,
        match_id: MatchId,
        draft: ReviewDraft,
    ) -> Result<Review, Error> {
        let review = NewReview::try_new(draft, match_id, reviewer.id(), self.clock.utc())
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let reviewee = self
            .users
            .find_by_id(review.reviewee_id)
            .await
            .map_err(map_user_error)?;
        if reviewee.is_none() {
            return Err(Error::invalid_request(format!(
                "user {} does not exist",
                review.reviewee_id
            ))
            .with_details(json!({ "field": "reviewee_id" })));
        }
        let existing = self
            .reviews
            .find_review_by_triple(review.reviewer_id, review.reviewee_id, match_id)
            .await
            .map_err(map_repository_error)?;
        if existing.is_some() {
            return Err(Error::conflict(ALREADY_REVIEWED));
        }
        let stored = self
            .reviews
            .insert_review(&review)
            .await
            .map_err(|err| match err {
                ReviewPersistenceError::Conflict { message } => {
                    debug!(%match_id, %message, "concurrent review lost the race");
                    Error::conflict(ALREADY_REVIEWED)
                }
                other => map_repository_error(other),
            })?;
        info!(review_id = %stored.id, %match_id, "review recorded");
        Ok(stored)
    }

    async fn react(
        &self,
        caller: &Principal,
        review_id: ReviewId,
        reaction: Reaction,
    ) -> Result<ReactionOutcome, Error> {
        let review = self
            .reviews
            .find_review(review_id)
            .await
            .map_err(map_repository_error)?;
        if review.is_none() {
            return Err(Error::invalid_request(format!(
                "review {review_id} does not exist"
            )));
        }

        let existing = self
            .reviews
            .find_reaction(review_id, caller.id())
            .await
            .map_err(map_repository_error)?;

        match existing {
            None => {
                let created = self
                    .reviews
                    .insert_reaction(&NewReviewLike {
                        review_id,
                        user_id: caller.id(),
                        reaction,
                    })
                    .await
                    .map_err(|err| match err {
                        ReviewPersistenceError::Conflict { .. } => duplicate_reaction(reaction),
                        other => map_repository_error(other),
                    })?;
                Ok(ReactionOutcome::Created(created))
            }
            Some(current) if current.reaction == reaction => Err(duplicate_reaction(reaction)),
            Some(current) => {
                let flipped = self
                    .reviews
                    .set_reaction_polarity(current.id, reaction)
                    .await
                    .map_err(map_repository_error)?;
                debug!(like_id = %flipped.id, to = reaction.as_str(), "reaction flipped");
                Ok(ReactionOutcome::Changed(flipped))
            }
        }
    }
}
