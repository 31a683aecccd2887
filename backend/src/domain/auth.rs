//! Authentication primitives: the resolved caller and the ways resolving it
//! can fail.

use serde::Serialize;

use super::{Error, User, UserId};

/// The calling identity for one request.
///
/// Always projected from a stored [`User`] row, so the admin flag reflects
/// current privileges rather than whatever a session or token claimed.
///
/// # Examples
/// ```
/// use free2free::domain::{Principal, UserId};
///
/// let principal = Principal::new(UserId::new(3).unwrap(), "Ada", false);
/// assert!(!principal.is_admin());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    id: UserId,
    display_name: String,
    is_admin: bool,
}

impl Principal {
    pub fn new(id: UserId, display_name: impl Into<String>, is_admin: bool) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            is_admin,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self::new(user.id, user.name.clone(), user.is_admin)
    }
}

/// Typed failure from identity resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthFailure {
    /// Neither a session identity nor a bearer header was supplied.
    #[error("no credential supplied")]
    NoCredential,
    /// The bearer token was malformed, badly signed, or expired.
    #[error("invalid or expired token")]
    InvalidToken,
    /// The credential named a user that does not exist.
    #[error("user not found")]
    NotFound,
    /// Configuration or persistence fault while resolving.
    #[error("identity resolution failed: {message}")]
    Internal { message: String },
}

impl AuthFailure {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<AuthFailure> for Error {
    fn from(failure: AuthFailure) -> Self {
        match failure {
            AuthFailure::Internal { message } => Error::internal(message),
            AuthFailure::NoCredential | AuthFailure::InvalidToken | AuthFailure::NotFound => {
                Error::unauthorized("unauthorized")
            }
        }
    }
}
