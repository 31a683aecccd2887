//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Wraps the Actix cookie session so the rest of the adapter only deals with
//! storing a user id, reading it back as a [`SessionIdentity`], and purging.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use serde_json::Value;
use tracing::warn;

use crate::domain::{Error, SessionIdentity, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store the signed-in user's id in the session cookie.
    pub fn persist_user(&self, user_id: UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.get())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Read the stored identity without failing the request.
    ///
    /// Anything other than an integer under the user id key, including a
    /// cookie that no longer deserialises, is reported as
    /// [`SessionIdentity::Malformed`].
    pub fn identity(&self) -> SessionIdentity {
        match self.0.get::<Value>(USER_ID_KEY) {
            Ok(None) => SessionIdentity::Absent,
            Ok(Some(value)) => match value.as_i64() {
                Some(raw) => SessionIdentity::UserId(raw),
                None => {
                    warn!(kind = value_kind(&value), "session user id has unexpected type");
                    SessionIdentity::Malformed
                }
            },
            Err(error) => {
                warn!(%error, "session user id could not be read");
                SessionIdentity::Malformed
            }
        }
    }

    /// The stored user id, if it parses as one.
    pub fn user_id(&self) -> Option<UserId> {
        match self.identity() {
            SessionIdentity::UserId(raw) => UserId::new(raw).ok(),
            SessionIdentity::Absent | SessionIdentity::Malformed => None,
        }
    }

    /// Drop the session entirely and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
