//! Handler tests for profile, token, and logout endpoints.

use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, HttpResponse, test, web};
use chrono::{TimeZone, Utc};
use mockall::predicate::eq;
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::ports::TokenPair;
use crate::domain::{Principal, UserId};
use crate::inbound::http::configure;
use crate::inbound::http::test_utils::{
    MockPorts, api_app, bearer, json_body, mocked_state, session_cookie, test_session_middleware,
};
use crate::test_support::{InMemoryStore, MutableClock, user_fixture};

struct Harness {
    store: Arc<InMemoryStore>,
    clock: Arc<MutableClock>,
    caller: Principal,
}

#[fixture]
fn harness() -> Harness {
    let store = Arc::new(InMemoryStore::new());
    let caller = Principal::from(&store.seed_user("Mia", false));
    let now = Utc
        .with_ymd_and_hms(2026, 6, 1, 8, 0, 0)
        .single()
        .expect("valid timestamp");
    Harness {
        store,
        clock: Arc::new(MutableClock::new(now)),
        caller,
    }
}

fn pair() -> TokenPair {
    TokenPair {
        access_token: "access".into(),
        refresh_token: "refresh".into(),
        expires_in: 900,
    }
}

#[rstest]
#[actix_web::test]
async fn profile_returns_stored_user(harness: Harness) {
    let caller_id = harness.caller.id();
    let mut ports = MockPorts::default();
    ports
        .accounts
        .expect_profile()
        .withf(move |caller| caller.id() == caller_id)
        .times(1)
        .returning(move |caller| Ok(user_fixture(caller.id().get(), "Mia", false)));
    let app = api_app(mocked_state(&harness.store, &harness.clock, ports)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/profile")
            .insert_header((header::AUTHORIZATION, bearer(&harness.caller, &harness.clock)))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["name"], "Mia");
    assert_eq!(body["social_provider"], "facebook");
}

#[rstest]
#[actix_web::test]
async fn token_endpoint_returns_pair(harness: Harness) {
    let mut ports = MockPorts::default();
    ports
        .accounts
        .expect_issue_tokens()
        .times(1)
        .returning(|_| Ok(pair()));
    let app = api_app(mocked_state(&harness.store, &harness.clock, ports)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/auth/token")
            .insert_header((header::AUTHORIZATION, bearer(&harness.caller, &harness.clock)))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(
        body,
        json!({ "access_token": "access", "refresh_token": "refresh", "expires_in": 900 })
    );
}

#[rstest]
#[case::missing(json!({}))]
#[case::blank(json!({ "refresh_token": "  " }))]
#[actix_web::test]
async fn refresh_requires_a_token(harness: Harness, #[case] payload: serde_json::Value) {
    let app = api_app(mocked_state(&harness.store, &harness.clock, MockPorts::default())).await;
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/refresh")
            .set_json(payload)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = json_body(res).await;
    assert_eq!(body["details"]["field"], "refresh_token");
}

#[rstest]
#[actix_web::test]
async fn refresh_passes_token_through(harness: Harness) {
    let mut ports = MockPorts::default();
    ports
        .accounts
        .expect_refresh()
        .withf(|token| token == "abc123")
        .times(1)
        .returning(|_| Ok(pair()));
    let app = api_app(mocked_state(&harness.store, &harness.clock, ports)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/refresh")
            .set_json(json!({ "refresh_token": "abc123" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn anonymous_logout_only_purges(harness: Harness) {
    let app = api_app(mocked_state(&harness.store, &harness.clock, MockPorts::default())).await;
    let res =
        test::call_service(&app, test::TestRequest::post().uri("/api/v1/logout").to_request())
            .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn social_login_opens_a_session_that_logout_revokes(harness: Harness) {
    let mut ports = MockPorts::default();
    ports
        .accounts
        .expect_sign_in_social()
        .times(1)
        .returning(|profile| Ok(user_fixture(41, profile.name(), false)));
    ports
        .accounts
        .expect_logout()
        .with(eq(UserId::new(41).expect("valid id")))
        .times(1)
        .returning(|_| Ok(()));
    let state = mocked_state(&harness.store, &harness.clock, ports);
    let app = test::init_service(
        App::new().app_data(web::Data::new(state)).service(
            web::scope("/api/v1")
                .wrap(test_session_middleware())
                .route(
                    "/callback",
                    web::post().to(
                        |state: web::Data<HttpState>, session: SessionContext| async move {
                            let profile = SocialProfile::try_new(
                                "fb-41",
                                "facebook",
                                "Grace",
                                "grace@example.com",
                                None,
                            )
                            .map_err(|err| Error::invalid_request(err.to_string()))?;
                            let user = complete_social_login(&state, &session, profile).await?;
                            Ok::<_, Error>(HttpResponse::Ok().json(user))
                        },
                    ),
                )
                .configure(configure),
        ),
    )
    .await;

    let signed_in = test::call_service(
        &app,
        test::TestRequest::post().uri("/api/v1/callback").to_request(),
    )
    .await;
    assert_eq!(signed_in.status(), StatusCode::OK);
    let cookie = session_cookie(&signed_in).expect("session cookie");

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let cleared = session_cookie(&res).expect("session cookie cleared");
    assert_eq!(cleared.value(), "");
}
