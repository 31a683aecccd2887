//! Port for stored refresh token digests.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{RefreshTokenId, UserId};

use super::define_port_error;

define_port_error! {
    pub enum RefreshTokenPersistenceError {
        Connection { message: String } => "refresh token store connection failed: {message}",
        Query { message: String } => "refresh token store query failed: {message}",
        Conflict { message: String } => "refresh token already stored: {message}",
    }
}

/// A persisted refresh token. Only the digest is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRefreshToken {
    pub id: RefreshTokenId,
    pub user_id: UserId,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    async fn insert(
        &self,
        user_id: UserId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<StoredRefreshToken, RefreshTokenPersistenceError>;

    /// The token with `token_hash` that expires after `now`.
    async fn find_active_by_hash(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<StoredRefreshToken>, RefreshTokenPersistenceError>;

    async fn delete(&self, id: RefreshTokenId) -> Result<(), RefreshTokenPersistenceError>;

    /// Remove every token belonging to `user_id`, returning how many went.
    async fn delete_for_user(&self, user_id: UserId) -> Result<usize, RefreshTokenPersistenceError>;
}
