//! Identity resolution.
//!
//! Works out who is calling from the credentials a request carries. Sources
//! are tried as an ordered chain of [`CredentialStrategy`] values: the
//! server-side session first, then an `Authorization: Bearer` token. A
//! strategy that has nothing to say returns [`Resolution::NotApplicable`] and
//! the chain moves on; any other answer ends the chain.
//!
//! Resolution is read-only. It never writes to the session.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, warn};

use super::ports::{UserPersistenceError, UserRepository};
use super::{AuthFailure, Principal, TokenCodec, TokenError, UserId};

const BEARER_PREFIX: &str = "Bearer ";

/// What the session says about the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionIdentity {
    /// No session, or a session without a user id.
    #[default]
    Absent,
    /// A user id stored by a previous sign-in.
    UserId(i64),
    /// The session held something under the user id key that is not an id.
    Malformed,
}

/// Raw credentials lifted from a request by an inbound adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestCredentials {
    pub session: SessionIdentity,
    /// The full `Authorization` header value, if present.
    pub authorization: Option<String>,
}

impl RequestCredentials {
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_session_user(mut self, id: i64) -> Self {
        self.session = SessionIdentity::UserId(id);
        self
    }

    #[must_use]
    pub fn with_authorization(mut self, value: impl Into<String>) -> Self {
        self.authorization = Some(value.into());
        self
    }
}

/// Outcome of a single strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(Principal),
    NotApplicable,
    Failed(AuthFailure),
}

/// One source of caller identity.
#[async_trait]
pub trait CredentialStrategy: Send + Sync {
    async fn attempt(&self, credentials: &RequestCredentials) -> Resolution;
}

async fn load_principal(users: &dyn UserRepository, id: UserId) -> Resolution {
    match users.find_by_id(id).await {
        Ok(Some(user)) => Resolution::Resolved(Principal::from(&user)),
        Ok(None) => Resolution::Failed(AuthFailure::NotFound),
        Err(err) => Resolution::Failed(lookup_failure(err)),
    }
}

fn lookup_failure(err: UserPersistenceError) -> AuthFailure {
    warn!(error = %err, "user lookup failed during identity resolution");
    AuthFailure::internal(err.to_string())
}

/// Reads the user id stored in the session.
///
/// The admin flag always comes from the stored row.
pub struct SessionStrategy {
    users: Arc<dyn UserRepository>,
}

impl SessionStrategy {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl CredentialStrategy for SessionStrategy {
    async fn attempt(&self, credentials: &RequestCredentials) -> Resolution {
        let raw = match credentials.session {
            SessionIdentity::Absent => return Resolution::NotApplicable,
            SessionIdentity::Malformed => {
                debug!("session identity has unexpected shape; falling through");
                return Resolution::NotApplicable;
            }
            SessionIdentity::UserId(raw) => raw,
        };
        match UserId::new(raw) {
            Ok(id) => load_principal(self.users.as_ref(), id).await,
            Err(_) => {
                debug!(raw, "session user id is not a valid id; falling through");
                Resolution::NotApplicable
            }
        }
    }
}

/// Verifies an `Authorization: Bearer` access token.
pub struct BearerStrategy {
    users: Arc<dyn UserRepository>,
    codec: Arc<TokenCodec>,
    clock: Arc<dyn Clock>,
}

impl BearerStrategy {
    pub fn new(
        users: Arc<dyn UserRepository>,
        codec: Arc<TokenCodec>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { users, codec, clock }
    }
}

#[async_trait]
impl CredentialStrategy for BearerStrategy {
    async fn attempt(&self, credentials: &RequestCredentials) -> Resolution {
        let Some(header) = credentials.authorization.as_deref() else {
            return Resolution::NotApplicable;
        };
        let Some(token) = header.strip_prefix(BEARER_PREFIX) else {
            debug!("authorization header is not a bearer credential");
            return Resolution::Failed(AuthFailure::NoCredential);
        };
        let claims = match self.codec.verify(token.trim(), self.clock.utc()) {
            Ok(claims) => claims,
            Err(TokenError::Malformed | TokenError::Expired) => {
                return Resolution::Failed(AuthFailure::InvalidToken);
            }
            Err(err @ (TokenError::SecretTooShort { .. } | TokenError::Signing { .. })) => {
                warn!(error = %err, "token verification is misconfigured");
                return Resolution::Failed(AuthFailure::internal(err.to_string()));
            }
        };
        match UserId::new(claims.user_id) {
            Ok(id) => load_principal(self.users.as_ref(), id).await,
            Err(_) => Resolution::Failed(AuthFailure::InvalidToken),
        }
    }
}

/// Runs the strategy chain for a request.
///
/// # Examples
/// ```no_run
/// # use std::sync::Arc;
/// # use free2free::domain::{IdentityResolver, RequestCredentials, TokenCodec};
/// # use free2free::domain::ports::UserRepository;
/// # async fn demo(users: Arc<dyn UserRepository>) {
/// let resolver = IdentityResolver::new(
///     users,
///     Arc::new(TokenCodec::new(vec![7_u8; 32])),
///     Arc::new(mockable::DefaultClock),
/// );
/// let outcome = resolver.resolve(&RequestCredentials::anonymous()).await;
/// assert!(outcome.is_err());
/// # }
/// ```
pub struct IdentityResolver {
    strategies: Vec<Box<dyn CredentialStrategy>>,
}

impl IdentityResolver {
    /// The standard chain: session, then bearer token.
    pub fn new(
        users: Arc<dyn UserRepository>,
        codec: Arc<TokenCodec>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::with_strategies(vec![
            Box::new(SessionStrategy::new(Arc::clone(&users))),
            Box::new(BearerStrategy::new(users, codec, clock)),
        ])
    }

    pub fn with_strategies(strategies: Vec<Box<dyn CredentialStrategy>>) -> Self {
        Self { strategies }
    }

    pub async fn resolve(
        &self,
        credentials: &RequestCredentials,
    ) -> Result<Principal, AuthFailure> {
        for strategy in &self.strategies {
            match strategy.attempt(credentials).await {
                Resolution::Resolved(principal) => return Ok(principal),
                Resolution::Failed(failure) => return Err(failure),
                Resolution::NotApplicable => {}
            }
        }
        Err(AuthFailure::NoCredential)
    }
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;
