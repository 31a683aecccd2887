//! Authorization guards.
//!
//! Each guard resolves the caller and then checks one predicate. Every denial
//! is reported as the same `401 unauthorized` error so callers cannot discover
//! which matches exist or who organizes them; the actual reason goes to the
//! debug log. Persistence failures are internal errors, never denials.

use std::sync::Arc;

use mockable::Clock;
use tracing::{debug, warn};

use super::ports::{MatchPersistenceError, MatchRepository};
use super::{
    Error, IdentityResolver, Match, MatchId, ParticipantStatus, Principal, RequestCredentials,
};

fn denied() -> Error {
    Error::unauthorized("unauthorized")
}

fn guard_lookup_failed(err: MatchPersistenceError) -> Error {
    warn!(error = %err, "match lookup failed inside guard");
    Error::internal(err.to_string())
}

/// Role and capability checks layered over [`IdentityResolver`].
pub struct AccessGuards {
    resolver: IdentityResolver,
    matches: Arc<dyn MatchRepository>,
    clock: Arc<dyn Clock>,
}

impl AccessGuards {
    pub fn new(
        resolver: IdentityResolver,
        matches: Arc<dyn MatchRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            resolver,
            matches,
            clock,
        }
    }

    /// Any resolved caller.
    pub async fn authenticated(
        &self,
        credentials: &RequestCredentials,
    ) -> Result<Principal, Error> {
        self.resolver.resolve(credentials).await.map_err(|failure| {
            debug!(reason = %failure, "identity resolution denied request");
            Error::from(failure)
        })
    }

    /// A caller whose stored row carries the admin flag.
    pub async fn admin(&self, credentials: &RequestCredentials) -> Result<Principal, Error> {
        let principal = self.authenticated(credentials).await?;
        if principal.is_admin() {
            Ok(principal)
        } else {
            debug!(user_id = %principal.id(), "admin guard denied non-admin caller");
            Err(denied())
        }
    }

    /// The organizer of `match_id`.
    pub async fn match_organizer(
        &self,
        credentials: &RequestCredentials,
        match_id: MatchId,
    ) -> Result<(Principal, Match), Error> {
        let principal = self.authenticated(credentials).await?;
        let found = self.load_match(match_id).await?;
        if found.organizer_id == principal.id() {
            Ok((principal, found))
        } else {
            debug!(user_id = %principal.id(), %match_id, "caller does not organize match");
            Err(denied())
        }
    }

    /// An approved participant of a completed match, inside the review window.
    pub async fn match_reviewer(
        &self,
        credentials: &RequestCredentials,
        match_id: MatchId,
    ) -> Result<(Principal, Match), Error> {
        let principal = self.authenticated(credentials).await?;
        let found = self.load_match(match_id).await?;
        let participant = self
            .matches
            .find_participant(match_id, principal.id())
            .await
            .map_err(guard_lookup_failed)?;
        let approved = participant.is_some_and(|row| row.status == ParticipantStatus::Approved);
        if !approved {
            debug!(user_id = %principal.id(), %match_id, "caller is not an approved participant");
            return Err(denied());
        }
        if !found.in_review_window(self.clock.utc()) {
            debug!(%match_id, status = %found.status, "match is outside its review window");
            return Err(denied());
        }
        Ok((principal, found))
    }

    async fn load_match(&self, match_id: MatchId) -> Result<Match, Error> {
        self.matches
            .find_match(match_id)
            .await
            .map_err(guard_lookup_failed)?
            .ok_or_else(|| {
                debug!(%match_id, "guarded match does not exist");
                denied()
            })
    }
}

#[cfg(test)]
#[path = "guards_tests.rs"]
mod tests;
