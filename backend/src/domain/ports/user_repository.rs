//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{SocialProfile, SocialProvider, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A user with the same social identity already exists.
        Conflict { message: String } => "user already exists: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Look a user up by the `(social id, provider)` pair.
    async fn find_by_social(
        &self,
        social_id: &str,
        provider: SocialProvider,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Create a non-admin user from a sign-in profile.
    async fn insert(
        &self,
        profile: &SocialProfile,
        now: DateTime<Utc>,
    ) -> Result<User, UserPersistenceError>;

    /// Refresh name, email, and avatar from a later sign-in.
    async fn update_profile(
        &self,
        id: UserId,
        profile: &SocialProfile,
        now: DateTime<Utc>,
    ) -> Result<User, UserPersistenceError>;
}
