//! Lift raw caller credentials off an Actix request.

use actix_session::SessionExt;
use actix_web::{HttpRequest, http::header};
use tracing::debug;

use crate::domain::RequestCredentials;
use crate::inbound::http::session::SessionContext;

/// Collect the session identity and `Authorization` header.
///
/// Reading never fails: an unreadable header is treated as absent and a
/// tampered session is reported as malformed for the resolver to decide on.
pub fn request_credentials(req: &HttpRequest) -> RequestCredentials {
    let session = SessionContext::new(req.get_session()).identity();
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| match value.to_str() {
            Ok(text) => Some(text.to_owned()),
            Err(_) => {
                debug!("ignoring non-ascii authorization header");
                None
            }
        });
    RequestCredentials {
        session,
        authorization,
    }
}
