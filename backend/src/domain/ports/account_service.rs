//! Driving port for account and token use-cases.
//!
//! Inbound adapters call it after the federated login callback and for the
//! token endpoints, without touching persistence directly.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{Error, Principal, SocialProfile, User, UserId};

/// Access and refresh token handed back to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// The stored record for the caller.
    async fn profile(&self, caller: &Principal) -> Result<User, Error>;

    /// Create or refresh the user for a completed social login.
    async fn sign_in_social(&self, profile: SocialProfile) -> Result<User, Error>;

    /// Issue a fresh access token and rotate the caller's refresh token.
    async fn issue_tokens(&self, caller: &Principal) -> Result<TokenPair, Error>;

    /// Exchange a refresh token for a new pair. The old token is consumed.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, Error>;

    /// Revoke every refresh token held by `user`.
    async fn logout(&self, user: UserId) -> Result<(), Error>;
}
