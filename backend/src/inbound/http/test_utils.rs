//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};
use mockable::Clock;
use serde_json::Value;

use crate::domain::Principal;
use crate::domain::ports::{
    MockAccountService, MockCatalogueAdmin, MockMatchLifecycle, MockReviewLifecycle,
};
use crate::inbound::http::configure;
use crate::inbound::http::state::HttpState;
use crate::test_support::{InMemoryStore, MutableClock, access_guards, test_codec};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie a response set, if any.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}

/// Driving-port mocks for handler tests. Unset expectations panic when hit.
#[derive(Default)]
pub struct MockPorts {
    pub matches: MockMatchLifecycle,
    pub reviews: MockReviewLifecycle,
    pub catalogue: MockCatalogueAdmin,
    pub accounts: MockAccountService,
}

/// State whose guards resolve against `store` and whose use-cases are mocks.
pub fn mocked_state(
    store: &Arc<InMemoryStore>,
    clock: &Arc<MutableClock>,
    ports: MockPorts,
) -> HttpState {
    HttpState::new(
        access_guards(store, clock),
        Arc::new(ports.matches),
        Arc::new(ports.reviews),
        Arc::new(ports.catalogue),
        Arc::new(ports.accounts),
    )
}

/// The API as mounted by the server, with a test session middleware.
pub async fn api_app(
    state: HttpState,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    test::init_service(
        App::new().app_data(web::Data::new(state)).service(
            web::scope("/api/v1")
                .wrap(test_session_middleware())
                .configure(configure),
        ),
    )
    .await
}

/// An `Authorization` header value for `principal`.
pub fn bearer(principal: &Principal, clock: &MutableClock) -> String {
    match test_codec().issue(principal, clock.utc()) {
        Ok(issued) => format!("Bearer {}", issued.token),
        Err(err) => panic!("test token: {err}"),
    }
}

/// Deserialise a JSON response body.
pub async fn json_body(res: ServiceResponse) -> Value {
    let bytes = test::read_body(res).await;
    match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(err) => panic!("response body is not JSON ({err}): {bytes:?}"),
    }
}
