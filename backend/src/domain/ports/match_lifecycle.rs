//! Driving port for match and participant state changes.
//!
//! Callers are expected to have passed the relevant guard already: organizer
//! operations take ids the organizer guard has vetted and do not re-check
//! ownership.

use async_trait::async_trait;

use crate::domain::{
    Error, Match, MatchDraft, MatchId, MatchParticipant, MatchStatus, ParticipantId, Principal,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MatchLifecycle: Send + Sync {
    /// Open a match with the caller as organizer.
    async fn create_match(&self, organizer: &Principal, draft: MatchDraft) -> Result<Match, Error>;

    /// Create a `pending` participant row for the caller.
    async fn join_match(
        &self,
        caller: &Principal,
        match_id: MatchId,
    ) -> Result<MatchParticipant, Error>;

    async fn approve_participant(
        &self,
        match_id: MatchId,
        participant_id: ParticipantId,
    ) -> Result<MatchParticipant, Error>;

    async fn reject_participant(
        &self,
        match_id: MatchId,
        participant_id: ParticipantId,
    ) -> Result<MatchParticipant, Error>;

    /// Move a match forward to `target`.
    async fn transition(&self, match_id: MatchId, target: MatchStatus) -> Result<Match, Error>;

    async fn list_open_matches(&self) -> Result<Vec<Match>, Error>;

    async fn list_past_matches(&self, caller: &Principal) -> Result<Vec<Match>, Error>;
}
