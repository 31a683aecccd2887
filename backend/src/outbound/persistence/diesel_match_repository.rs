//! PostgreSQL-backed `MatchRepository`.
//!
//! The `match_participants_match_user_key` constraint backs the join
//! pre-check; a concurrent duplicate join surfaces here as
//! [`MatchPersistenceError::Conflict`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{MatchPersistenceError, MatchRepository};
use crate::domain::{
    Match, MatchId, MatchParticipant, MatchStatus, NewMatch, NewParticipant, ParticipantId,
    ParticipantStatus, UserId,
};

use super::diesel_error_mapping::{self as mapping, RepositoryError};
use super::models::{MatchRow, NewMatchRow, NewParticipantRow, ParticipantRow};
use super::pool::{DbPool, PoolError};
use super::schema::{match_participants, matches};

#[derive(Clone)]
pub struct DieselMatchRepository {
    pool: DbPool,
}

impl DieselMatchRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> MatchPersistenceError {
    mapping::map_pool_error(error)
}

fn map_diesel_error(error: diesel::result::Error) -> MatchPersistenceError {
    mapping::map_diesel_error(error)
}

fn row_to_match(row: MatchRow) -> Result<Match, MatchPersistenceError> {
    let status = row
        .status
        .parse::<MatchStatus>()
        .map_err(|err| MatchPersistenceError::invalid_column("match status", err))?;
    Ok(Match {
        id: MatchPersistenceError::decode_id("match id", row.id)?,
        activity_id: MatchPersistenceError::decode_id("activity id", row.activity_id)?,
        organizer_id: MatchPersistenceError::decode_id("organizer id", row.organizer_id)?,
        match_time: row.match_time,
        status,
        created_at: row.created_at,
    })
}

fn row_to_participant(row: ParticipantRow) -> Result<MatchParticipant, MatchPersistenceError> {
    let status = row
        .status
        .parse::<ParticipantStatus>()
        .map_err(|err| MatchPersistenceError::invalid_column("participant status", err))?;
    Ok(MatchParticipant {
        id: MatchPersistenceError::decode_id("participant id", row.id)?,
        match_id: MatchPersistenceError::decode_id("match id", row.match_id)?,
        user_id: MatchPersistenceError::decode_id("user id", row.user_id)?,
        status,
        joined_at: row.joined_at,
    })
}

fn rows_to_matches(rows: Vec<MatchRow>) -> Result<Vec<Match>, MatchPersistenceError> {
    rows.into_iter().map(row_to_match).collect()
}

#[async_trait]
impl MatchRepository for DieselMatchRepository {
    async fn find_match(&self, id: MatchId) -> Result<Option<Match>, MatchPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        matches::table
            .find(id.get())
            .select(MatchRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_match)
            .transpose()
    }

    async fn insert_match(&self, new_match: &NewMatch) -> Result<Match, MatchPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewMatchRow {
            activity_id: new_match.activity_id.get(),
            organizer_id: new_match.organizer_id.get(),
            match_time: new_match.match_time,
            status: MatchStatus::Open.as_str(),
            created_at: new_match.created_at,
        };
        let stored = diesel::insert_into(matches::table)
            .values(&row)
            .returning(MatchRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_match(stored)
    }

    async fn update_match_status(
        &self,
        id: MatchId,
        from: MatchStatus,
        to: MatchStatus,
    ) -> Result<Option<Match>, MatchPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let target = matches::table
            .filter(matches::id.eq(id.get()))
            .filter(matches::status.eq(from.as_str()));
        let stored = diesel::update(target)
            .set(matches::status.eq(to.as_str()))
            .returning(MatchRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        stored.map(row_to_match).transpose()
    }

    async fn list_open_matches(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Match>, MatchPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = matches::table
            .filter(matches::status.eq(MatchStatus::Open.as_str()))
            .filter(matches::match_time.gt(now))
            .order((matches::match_time.asc(), matches::id.asc()))
            .select(MatchRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_matches(rows)
    }

    async fn list_completed_for_user(
        &self,
        user: UserId,
    ) -> Result<Vec<Match>, MatchPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let joined = match_participants::table
            .filter(match_participants::user_id.eq(user.get()))
            .select(match_participants::match_id);
        let rows = matches::table
            .filter(matches::status.eq(MatchStatus::Completed.as_str()))
            .filter(matches::id.eq_any(joined))
            .order((matches::match_time.desc(), matches::id.desc()))
            .select(MatchRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_matches(rows)
    }

    async fn find_participant(
        &self,
        match_id: MatchId,
        user: UserId,
    ) -> Result<Option<MatchParticipant>, MatchPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        match_participants::table
            .filter(match_participants::match_id.eq(match_id.get()))
            .filter(match_participants::user_id.eq(user.get()))
            .select(ParticipantRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_participant)
            .transpose()
    }

    async fn find_participant_in_match(
        &self,
        id: ParticipantId,
        match_id: MatchId,
    ) -> Result<Option<MatchParticipant>, MatchPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        match_participants::table
            .find(id.get())
            .filter(match_participants::match_id.eq(match_id.get()))
            .select(ParticipantRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_participant)
            .transpose()
    }

    async fn insert_participant(
        &self,
        participant: &NewParticipant,
    ) -> Result<MatchParticipant, MatchPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewParticipantRow {
            match_id: participant.match_id.get(),
            user_id: participant.user_id.get(),
            status: ParticipantStatus::Pending.as_str(),
            joined_at: participant.joined_at,
        };
        let stored = diesel::insert_into(match_participants::table)
            .values(&row)
            .returning(ParticipantRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_participant(stored)
    }

    async fn update_participant_status(
        &self,
        id: ParticipantId,
        status: ParticipantStatus,
    ) -> Result<MatchParticipant, MatchPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let stored = diesel::update(match_participants::table.find(id.get()))
            .set(match_participants::status.eq(status.as_str()))
            .returning(ParticipantRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_participant(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 2, 17, 30, 0)
            .single()
            .expect("valid timestamp")
    }

    #[rstest]
    #[case("open", Some(MatchStatus::Open))]
    #[case("cancelled", Some(MatchStatus::Cancelled))]
    #[case("archived", None)]
    fn match_rows_parse_status(#[case] status: &str, #[case] expected: Option<MatchStatus>) {
        let row = MatchRow {
            id: 5,
            activity_id: 2,
            organizer_id: 9,
            match_time: at(),
            status: status.into(),
            created_at: at(),
        };
        assert_eq!(row_to_match(row).ok().map(|m| m.status), expected);
    }

    #[test]
    fn participant_rows_reject_bad_user_ids() {
        let row = ParticipantRow {
            id: 1,
            match_id: 5,
            user_id: -4,
            status: "pending".into(),
            joined_at: at(),
        };
        let err = row_to_participant(row).expect_err("negative user id");
        assert!(
            matches!(err, MatchPersistenceError::Query { message } if message.contains("user id"))
        );
    }
}
