//! Driving port for reviews and reactions.

use async_trait::async_trait;

use crate::domain::{
    Error, MatchId, Principal, Reaction, ReactionOutcome, Review, ReviewDraft, ReviewId,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewLifecycle: Send + Sync {
    /// Record the caller's review of another participant. One per triple.
    async fn create_review(
        &self,
        reviewer: &Principal,
        match_id: MatchId,
        draft: ReviewDraft,
    ) -> Result<Review, Error>;

    /// Create, flip, or reject a reaction depending on what is stored.
    async fn react(
        &self,
        caller: &Principal,
        review_id: ReviewId,
        reaction: Reaction,
    ) -> Result<ReactionOutcome, Error>;
}
