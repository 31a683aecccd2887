//! Port for reviews and review reactions.
use async_trait::async_trait;

use crate::domain::{
    MatchId, NewReview, NewReviewLike, Reaction, Review, ReviewId, ReviewLike, ReviewLikeId, UserId,
};

use super::define_port_error;

define_port_error! {
    pub enum ReviewPersistenceError {
        Connection { message: String } => "review repository connection failed: {message}",
        Query { message: String } => "review repository query failed: {message}",
        Conflict { message: String } => "review repository conflict: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn find_review(&self, id: ReviewId) -> Result<Option<Review>, ReviewPersistenceError>;

    /// The review for a `(reviewer, reviewee, match)` triple, if any.
    async fn find_review_by_triple(
        &self,
        reviewer: UserId,
        reviewee: UserId,
        match_id: MatchId,
    ) -> Result<Option<Review>, ReviewPersistenceError>;

    async fn insert_review(&self, review: &NewReview) -> Result<Review, ReviewPersistenceError>;

    /// The caller's reaction to a review, if any.
    async fn find_reaction(
        &self,
        review: ReviewId,
        user: UserId,
    ) -> Result<Option<ReviewLike>, ReviewPersistenceError>;

    async fn insert_reaction(
        &self,
        reaction: &NewReviewLike,
    ) -> Result<ReviewLike, ReviewPersistenceError>;

    /// Flip an existing reaction in place. The row keeps its id.
    async fn set_reaction_polarity(
        &self,
        id: ReviewLikeId,
        reaction: Reaction,
    ) -> Result<ReviewLike, ReviewPersistenceError>;
}
