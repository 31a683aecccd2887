//! Shared harness for end-to-end API tests over the in-memory store.

use std::sync::Arc;

use actix_session::storage::CookieSessionStore;
use actix_session::{Session, SessionMiddleware};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, HttpResponse, test, web};
use chrono::{DateTime, Duration, TimeZone, Utc};
use mockable::Clock;
use serde_json::Value;

use free2free::Trace;
use free2free::domain::{Match, MatchStatus, ParticipantStatus, Principal, User};
use free2free::inbound::http::configure;
use free2free::test_support::{InMemoryStore, MutableClock, http_state, test_codec};

/// Test-only route that writes an arbitrary JSON value as the session user.
pub const SESSION_SEED_PATH: &str = "/api/v1/test/session";

pub fn start_of_day() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 9, 10, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Users and a match most suites need.
pub struct Harness {
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<MutableClock>,
    pub admin: User,
    pub organizer: User,
    pub member: User,
    pub other: User,
}

impl Harness {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let admin = store.seed_user("Admin", true);
        let organizer = store.seed_user("Olu", false);
        let member = store.seed_user("Mia", false);
        let other = store.seed_user("Noor", false);
        Self {
            store,
            clock: Arc::new(MutableClock::new(start_of_day())),
            admin,
            organizer,
            member,
            other,
        }
    }

    /// An open match owned by the organizer, `hours_ahead` from now.
    pub fn open_match(&self, hours_ahead: i64) -> Match {
        let location = self.store.seed_location("Riverside Courts");
        let activity = self
            .store
            .seed_activity("Doubles", location.id, self.admin.id);
        self.store.seed_match(
            activity.id,
            self.organizer.id,
            self.clock.utc() + Duration::hours(hours_ahead),
            MatchStatus::Open,
        )
    }

    /// A match completed an hour ago where `member` and `other` were approved.
    pub fn completed_match(&self) -> Match {
        let location = self.store.seed_location("Hill Park");
        let activity = self
            .store
            .seed_activity("Five-a-side", location.id, self.admin.id);
        let played = self.store.seed_match(
            activity.id,
            self.organizer.id,
            self.clock.utc() - Duration::hours(1),
            MatchStatus::Completed,
        );
        for user in [&self.member, &self.other] {
            self.store
                .seed_participant(played.id, user.id, ParticipantStatus::Approved);
        }
        played
    }

    pub fn bearer(&self, user: &User) -> String {
        let issued = test_codec()
            .issue(&Principal::from(user), self.clock.utc())
            .expect("token issues");
        format!("Bearer {}", issued.token)
    }

    pub async fn app(
        &self,
    ) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
    {
        let state = http_state(self.store.clone(), self.clock.clone());
        test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .wrap(Trace)
                .service(
                    web::scope("/api/v1")
                        .wrap(
                            SessionMiddleware::builder(
                                CookieSessionStore::default(),
                                Key::generate(),
                            )
                            .cookie_name("session".to_owned())
                            .cookie_secure(false)
                            .build(),
                        )
                        .route(
                            "/test/session",
                            web::post().to(|session: Session, body: web::Json<Value>| async move {
                                session
                                    .insert("user_id", body.into_inner())
                                    .map(|()| HttpResponse::NoContent().finish())
                            }),
                        )
                        .configure(configure),
                ),
        )
        .await
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

pub fn session_cookie(res: &ServiceResponse) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

pub async fn body_json(res: ServiceResponse) -> Value {
    test::read_body_json(res).await
}
