//! Match lifecycle service.
//!
//! Implements [`MatchLifecycle`] over a [`MatchRepository`] and the catalogue
//! (for activity lookups). Every state change is a single row insert or
//! update.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    CataloguePersistenceError, CatalogueRepository, MatchLifecycle, MatchPersistenceError,
    MatchRepository,
};
use crate::domain::{
    Error, Match, MatchDraft, MatchId, MatchParticipant, MatchStatus, NewMatch, NewParticipant,
    ParticipantId, ParticipantStatus, Principal,
};

const ALREADY_JOINED: &str = "already joined";

fn map_match_error(error: MatchPersistenceError) -> Error {
    match error {
        MatchPersistenceError::Connection { message } => {
            Error::internal(format!("match repository unavailable: {message}"))
        }
        MatchPersistenceError::Query { message } => {
            Error::internal(format!("match repository error: {message}"))
        }
        MatchPersistenceError::Conflict { message } => Error::conflict(message),
    }
}

fn map_catalogue_error(error: CataloguePersistenceError) -> Error {
    Error::internal(format!("catalogue lookup failed: {error}"))
}

/// Match service implementing the [`MatchLifecycle`] driving port.
#[derive(Clone)]
pub struct MatchService<M, C> {
    matches: Arc<M>,
    catalogue: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<M, C> MatchService<M, C> {
    pub fn new(matches: Arc<M>, catalogue: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self {
            matches,
            catalogue,
            clock,
        }
    }
}

impl<M, C> MatchService<M, C>
where
    M: MatchRepository,
    C: CatalogueRepository,
{
    async fn find_existing(&self, match_id: MatchId) -> Result<Match, Error> {
        self.matches
            .find_match(match_id)
            .await
            .map_err(map_match_error)?
            .ok_or_else(|| Error::not_found(format!("match {match_id} not found")))
    }

    async fn set_participant_status(
        &self,
        match_id: MatchId,
        participant_id: ParticipantId,
        status: ParticipantStatus,
    ) -> Result<MatchParticipant, Error> {
        let existing = self
            .matches
            .find_participant_in_match(participant_id, match_id)
            .await
            .map_err(map_match_error)?;
        if existing.is_none() {
            return Err(Error::not_found(format!(
                "participant {participant_id} not found in match {match_id}"
            )));
        }
        let updated = self
            .matches
            .update_participant_status(participant_id, status)
            .await
            .map_err(map_match_error)?;
        info!(%match_id, %participant_id, status = %status, "participant status set");
        Ok(updated)
    }
}

#[async_trait]
impl<M, C> MatchLifecycle for MatchService<M, C>
where
    M: MatchRepository,
    C: CatalogueRepository,
{
    async fn create_match(&self, organizer: &Principal, draft: MatchDraft) -> Result<Match, Error> {
        let now = self.clock.utc();
        if draft.match_time <= now {
            return Err(Error::invalid_request("match time must be in the future")
                .with_details(json!({ "field": "match_time" })));
        }
        let activity = self
            .catalogue
            .find_activity(draft.activity_id)
            .await
            .map_err(map_catalogue_error)?;
        if activity.is_none() {
            return Err(Error::invalid_request(format!(
                "activity {} does not exist",
                draft.activity_id
            ))
            .with_details(json!({ "field": "activity_id" })));
        }
        let created = self
            .matches
            .insert_match(&NewMatch {
                activity_id: draft.activity_id,
                organizer_id: organizer.id(),
                match_time: draft.match_time,
                created_at: now,
            })
            .await
            .map_err(map_match_error)?;
        info!(match_id = %created.id, organizer = %organizer.id(), "match opened");
        Ok(created)
    }

    async fn join_match(
        &self,
        caller: &Principal,
        match_id: MatchId,
    ) -> Result<MatchParticipant, Error> {
        let now = self.clock.utc();
        let found = self
            .matches
            .find_match(match_id)
            .await
            .map_err(map_match_error)?
            .ok_or_else(|| Error::invalid_request(format!("match {match_id} does not exist")))?;
        if !found.accepts_joins(now) {
            return Err(Error::invalid_request("match is not open for joining"));
        }
        let existing = self
            .matches
            .find_participant(match_id, caller.id())
            .await
            .map_err(map_match_error)?;
        if existing.is_some() {
            return Err(Error::conflict(ALREADY_JOINED));
        }
        let joined = self
            .matches
            .insert_participant(&NewParticipant {
                match_id,
                user_id: caller.id(),
                joined_at: now,
            })
            .await
            .map_err(|err| match err {
                MatchPersistenceError::Conflict { message } => {
                    debug!(
                        %match_id,
                        user_id = %caller.id(),
                        %message,
                        "concurrent join lost the race"
                    );
                    Error::conflict(ALREADY_JOINED)
                }
                other => map_match_error(other),
            })?;
        info!(%match_id, user_id = %caller.id(), "participant joined");
        Ok(joined)
    }

    async fn approve_participant(
        &self,
        match_id: MatchId,
        participant_id: ParticipantId,
    ) -> Result<MatchParticipant, Error> {
        self.set_participant_status(match_id, participant_id, ParticipantStatus::Approved)
            .await
    }

    async fn reject_participant(
        &self,
        match_id: MatchId,
        participant_id: ParticipantId,
    ) -> Result<MatchParticipant, Error> {
        self.set_participant_status(match_id, participant_id, ParticipantStatus::Rejected)
            .await
    }

    async fn transition(&self, match_id: MatchId, target: MatchStatus) -> Result<Match, Error> {
        let found = self.find_existing(match_id).await?;
        if !found.status.can_transition_to(target) {
            return Err(Error::invalid_request(format!(
                "cannot move match from {} to {target}",
                found.status
            )));
        }
        let updated = self
            .matches
            .update_match_status(match_id, found.status, target)
            .await
            .map_err(map_match_error)?
            .ok_or_else(|| {
                debug!(%match_id, from = %found.status, "status changed concurrently");
                Error::invalid_request(format!(
                    "cannot move match from {} to {target}",
                    found.status
                ))
            })?;
        info!(%match_id, from = %found.status, to = %target, "match status changed");
        Ok(updated)
    }

    async fn list_open_matches(&self) -> Result<Vec<Match>, Error> {
        self.matches
            .list_open_matches(self.clock.utc())
            .await
            .map_err(map_match_error)
    }

    async fn list_past_matches(&self, caller: &Principal) -> Result<Vec<Match>, Error> {
        self.matches
            .list_completed_for_user(caller.id())
            .await
            .map_err(map_match_error)
    }
}

#[cfg(test)]
#[path = "match_service_tests.rs"]
mod tests;
