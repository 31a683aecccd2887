//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Each `*Row` converts into its domain type
//! through a fallible `TryFrom`, since ids and status strings are validated
//! on the way in.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{
    activities, locations, match_participants, matches, refresh_tokens, review_likes, reviews,
    users,
};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub social_id: String,
    pub social_provider: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub social_id: &'a str,
    pub social_provider: &'a str,
    pub name: &'a str,
    pub email: &'a str,
    pub avatar_url: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile fields refreshed on every social sign-in. `avatar_url` is always
/// written, so a cleared avatar is stored as `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserProfileUpdate<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub avatar_url: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = locations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LocationRow {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = locations)]
pub(crate) struct NewLocationRow<'a> {
    pub name: &'a str,
    pub address: &'a str,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = activities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ActivityRow {
    pub id: i64,
    pub title: String,
    pub target_count: i32,
    pub location_id: i64,
    pub description: String,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = activities)]
pub(crate) struct NewActivityRow<'a> {
    pub title: &'a str,
    pub target_count: i32,
    pub location_id: i64,
    pub description: &'a str,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Matches and participants
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = matches)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MatchRow {
    pub id: i64,
    pub activity_id: i64,
    pub organizer_id: i64,
    pub match_time: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = matches)]
pub(crate) struct NewMatchRow<'a> {
    pub activity_id: i64,
    pub organizer_id: i64,
    pub match_time: DateTime<Utc>,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = match_participants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ParticipantRow {
    pub id: i64,
    pub match_id: i64,
    pub user_id: i64,
    pub status: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = match_participants)]
pub(crate) struct NewParticipantRow<'a> {
    pub match_id: i64,
    pub user_id: i64,
    pub status: &'a str,
    pub joined_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Reviews and reactions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewRow {
    pub id: i64,
    pub match_id: i64,
    pub reviewer_id: i64,
    pub reviewee_id: i64,
    pub score: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reviews)]
pub(crate) struct NewReviewRow<'a> {
    pub match_id: i64,
    pub reviewer_id: i64,
    pub reviewee_id: i64,
    pub score: i16,
    pub comment: &'a str,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = review_likes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewLikeRow {
    pub id: i64,
    pub review_id: i64,
    pub user_id: i64,
    pub is_like: bool,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = review_likes)]
pub(crate) struct NewReviewLikeRow {
    pub review_id: i64,
    pub user_id: i64,
    pub is_like: bool,
}

// ---------------------------------------------------------------------------
// Refresh tokens
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = refresh_tokens)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RefreshTokenRow {
    pub id: i64,
    pub user_id: i64,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = refresh_tokens)]
pub(crate) struct NewRefreshTokenRow<'a> {
    pub user_id: i64,
    pub token_hash: &'a str,
    pub expires_at: DateTime<Utc>,
}
