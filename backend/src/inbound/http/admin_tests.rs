//! Handler tests for admin catalogue endpoints.

use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::test;
use chrono::{TimeZone, Utc};
use mockable::Clock;
use rstest::{fixture, rstest};
use serde_json::json;

use crate::domain::{
    Activity, ActivityId, Error, Location, LocationId, Match, MatchId, MatchStatus, Principal,
};
use crate::inbound::http::test_utils::{MockPorts, api_app, bearer, json_body, mocked_state};
use crate::test_support::{InMemoryStore, MutableClock};

struct Harness {
    store: Arc<InMemoryStore>,
    clock: Arc<MutableClock>,
    admin: Principal,
    member: Principal,
}

#[fixture]
fn harness() -> Harness {
    let store = Arc::new(InMemoryStore::new());
    let admin = Principal::from(&store.seed_user("Ada", true));
    let member = Principal::from(&store.seed_user("Mia", false));
    let now = Utc
        .with_ymd_and_hms(2026, 2, 2, 10, 0, 0)
        .single()
        .expect("valid timestamp");
    Harness {
        store,
        clock: Arc::new(MutableClock::new(now)),
        admin,
        member,
    }
}

#[rstest]
#[case::list_activities("GET", "/api/v1/admin/activities")]
#[case::list_locations("GET", "/api/v1/admin/locations")]
#[case::cancel("PUT", "/api/v1/admin/matches/4/cancel")]
#[actix_web::test]
async fn members_are_turned_away(harness: Harness, #[case] method: &str, #[case] uri: &str) {
    let app = api_app(mocked_state(&harness.store, &harness.clock, MockPorts::default())).await;
    let req = match method {
        "PUT" => test::TestRequest::put(),
        _ => test::TestRequest::get(),
    };
    let res = test::call_service(
        &app,
        req.uri(uri)
            .insert_header((header::AUTHORIZATION, bearer(&harness.member, &harness.clock)))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(res).await;
    assert_eq!(body["error"], "unauthorized");
}

#[rstest]
#[actix_web::test]
async fn activity_is_stamped_with_admin(harness: Harness) {
    let admin_id = harness.admin.id();
    let created_at = harness.clock.utc();
    let mut ports = MockPorts::default();
    ports
        .catalogue
        .expect_create_activity()
        .withf(move |admin, draft| admin.id() == admin_id && draft.title == "Padel")
        .times(1)
        .returning(move |admin, draft| {
            Ok(Activity {
                id: ActivityId::new(3).expect("valid id"),
                title: draft.title,
                target_count: draft.target_count,
                location_id: draft.location_id,
                description: draft.description,
                created_by: admin.id(),
                created_at,
            })
        });
    let app = api_app(mocked_state(&harness.store, &harness.clock, ports)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/admin/activities")
            .insert_header((header::AUTHORIZATION, bearer(&harness.admin, &harness.clock)))
            .set_json(json!({ "title": "Padel", "target_count": 4, "location_id": 1 }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body = json_body(res).await;
    assert_eq!(body["created_by"], json!(admin_id.get()));
}

#[rstest]
#[actix_web::test]
async fn unknown_location_is_a_400(harness: Harness) {
    let mut ports = MockPorts::default();
    ports.catalogue.expect_create_activity().returning(|_, _| {
        Err(Error::invalid_request("location does not exist")
            .with_details(json!({ "field": "location_id" })))
    });
    let app = api_app(mocked_state(&harness.store, &harness.clock, ports)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/admin/activities")
            .insert_header((header::AUTHORIZATION, bearer(&harness.admin, &harness.clock)))
            .set_json(json!({ "title": "Padel", "target_count": 4, "location_id": 404 }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = json_body(res).await;
    assert_eq!(body["details"]["field"], "location_id");
}

#[rstest]
#[actix_web::test]
async fn lists_locations(harness: Harness) {
    let created_at = harness.clock.utc();
    let mut ports = MockPorts::default();
    ports.catalogue.expect_list_locations().times(1).returning(move || {
        Ok(vec![Location {
            id: LocationId::new(1).expect("valid id"),
            name: "Court".into(),
            address: "1 Main St".into(),
            latitude: 25.03,
            longitude: 121.56,
            created_at,
        }])
    });
    let app = api_app(mocked_state(&harness.store, &harness.clock, ports)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/admin/locations")
            .insert_header((header::AUTHORIZATION, bearer(&harness.admin, &harness.clock)))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body[0]["name"], "Court");
}

#[rstest]
#[actix_web::test]
async fn admin_cancel_targets_path_match(harness: Harness) {
    let at = harness.clock.utc();
    let admin_id = harness.admin.id();
    let mut ports = MockPorts::default();
    ports
        .matches
        .expect_transition()
        .withf(|match_id, target| match_id.get() == 4 && *target == MatchStatus::Cancelled)
        .times(1)
        .returning(move |match_id, target| {
            Ok(Match {
                id: match_id,
                activity_id: ActivityId::new(1).expect("valid id"),
                organizer_id: admin_id,
                match_time: at,
                status: target,
                created_at: at,
            })
        });
    let app = api_app(mocked_state(&harness.store, &harness.clock, ports)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/v1/admin/matches/4/cancel")
            .insert_header((header::AUTHORIZATION, bearer(&harness.admin, &harness.clock)))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["status"], "cancelled");
    assert_eq!(body["id"], json!(MatchId::new(4).expect("valid id").get()));
}
