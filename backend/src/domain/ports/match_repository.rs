//! Port for matches and their participant rows.
//!
//! Adapters must enforce uniqueness of `(match_id, user_id)` on participants
//! and report a violation as [`MatchPersistenceError::Conflict`]; the
//! lifecycle engine's read-then-insert check is not race free on its own.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    Match, MatchId, MatchParticipant, MatchStatus, NewMatch, NewParticipant, ParticipantId,
    ParticipantStatus, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by match repository adapters.
    pub enum MatchPersistenceError {
        Connection { message: String } => "match repository connection failed: {message}",
        Query { message: String } => "match repository query failed: {message}",
        /// A unique constraint rejected the write.
        Conflict { message: String } => "match repository conflict: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MatchRepository: Send + Sync {
    async fn find_match(&self, id: MatchId) -> Result<Option<Match>, MatchPersistenceError>;

    /// Insert a match with status `open`.
    async fn insert_match(&self, new_match: &NewMatch) -> Result<Match, MatchPersistenceError>;

    /// Move a match from `from` to `to` only while it still holds `from`.
    ///
    /// Returns `None` when no row matched, either because the match is gone
    /// or because a concurrent writer changed its status first.
    async fn update_match_status(
        &self,
        id: MatchId,
        from: MatchStatus,
        to: MatchStatus,
    ) -> Result<Option<Match>, MatchPersistenceError>;

    /// Open matches scheduled after `now`, soonest first.
    async fn list_open_matches(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Match>, MatchPersistenceError>;

    /// Completed matches `user` joined, most recent first.
    async fn list_completed_for_user(
        &self,
        user: UserId,
    ) -> Result<Vec<Match>, MatchPersistenceError>;

    /// The participant row for `(match_id, user)`, if the user has joined.
    async fn find_participant(
        &self,
        match_id: MatchId,
        user: UserId,
    ) -> Result<Option<MatchParticipant>, MatchPersistenceError>;

    /// The participant row with `id`, only if it belongs to `match_id`.
    async fn find_participant_in_match(
        &self,
        id: ParticipantId,
        match_id: MatchId,
    ) -> Result<Option<MatchParticipant>, MatchPersistenceError>;

    /// Insert a `pending` participant row.
    async fn insert_participant(
        &self,
        participant: &NewParticipant,
    ) -> Result<MatchParticipant, MatchPersistenceError>;

    async fn update_participant_status(
        &self,
        id: ParticipantId,
        status: ParticipantStatus,
    ) -> Result<MatchParticipant, MatchPersistenceError>;
}
