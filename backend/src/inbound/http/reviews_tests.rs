//! Handler tests for reviews and reactions.

use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::test;
use chrono::{Duration, TimeZone, Utc};
use mockable::Clock;
use mockall::predicate::{always, eq};
use rstest::{fixture, rstest};
use serde_json::json;

use crate::domain::{
    Error, MatchId, MatchStatus, ParticipantStatus, Principal, Reaction, ReactionOutcome, Review,
    ReviewId, ReviewLike, ReviewLikeId, ReviewScore, UserId,
};
use crate::inbound::http::test_utils::{MockPorts, api_app, bearer, json_body, mocked_state};
use crate::test_support::{InMemoryStore, MutableClock};

struct Harness {
    store: Arc<InMemoryStore>,
    clock: Arc<MutableClock>,
    reviewer: Principal,
    reviewee: UserId,
    match_id: MatchId,
}

#[fixture]
fn harness() -> Harness {
    let now = Utc
        .with_ymd_and_hms(2026, 5, 20, 21, 0, 0)
        .single()
        .expect("valid timestamp");
    let store = Arc::new(InMemoryStore::new());
    let organizer = store.seed_user("Olu", false);
    let reviewer = store.seed_user("Mia", false);
    let location = store.seed_location("Park");
    let activity = store.seed_activity("Frisbee", location.id, organizer.id);
    let played = store.seed_match(
        activity.id,
        organizer.id,
        now - Duration::hours(2),
        MatchStatus::Completed,
    );
    store.seed_participant(played.id, reviewer.id, ParticipantStatus::Approved);
    Harness {
        store,
        clock: Arc::new(MutableClock::new(now)),
        reviewer: Principal::from(&reviewer),
        reviewee: organizer.id,
        match_id: played.id,
    }
}

fn like_row(reaction: Reaction, user: UserId) -> ReviewLike {
    ReviewLike {
        id: ReviewLikeId::new(30).expect("valid id"),
        review_id: ReviewId::new(8).expect("valid id"),
        user_id: user,
        reaction,
    }
}

#[rstest]
#[actix_web::test]
async fn approved_participant_can_review(harness: Harness) {
    let reviewer_id = harness.reviewer.id();
    let reviewee = harness.reviewee;
    let match_id = harness.match_id;
    let now = harness.clock.utc();
    let mut ports = MockPorts::default();
    ports
        .reviews
        .expect_create_review()
        .withf(move |reviewer, id, draft| {
            reviewer.id() == reviewer_id && *id == match_id && draft.score == 5
        })
        .times(1)
        .returning(move |reviewer, match_id, draft| {
            Ok(Review {
                id: ReviewId::new(8).expect("valid id"),
                match_id,
                reviewer_id: reviewer.id(),
                reviewee_id: reviewee,
                score: ReviewScore::new(draft.score).expect("valid score"),
                comment: draft.comment,
                created_at: now,
            })
        });
    let app = api_app(mocked_state(&harness.store, &harness.clock, ports)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/review/matches/{match_id}"))
            .insert_header((header::AUTHORIZATION, bearer(&harness.reviewer, &harness.clock)))
            .set_json(json!({ "reviewee_id": reviewee.get(), "score": 5, "comment": "great" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body = json_body(res).await;
    assert_eq!(body["score"], 5);
    assert_eq!(body["reviewer_id"], json!(reviewer_id.get()));
}

#[rstest]
#[actix_web::test]
async fn review_after_window_is_unauthorized(harness: Harness) {
    harness.clock.advance(Duration::hours(2));
    let app = api_app(mocked_state(&harness.store, &harness.clock, MockPorts::default())).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/review/matches/{}", harness.match_id))
            .insert_header((header::AUTHORIZATION, bearer(&harness.reviewer, &harness.clock)))
            .set_json(json!({ "reviewee_id": harness.reviewee.get(), "score": 4 }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[case::first_like(
    "like",
    Reaction::Like,
    Ok(ReactionOutcome::Created(like_row(Reaction::Like, UserId::new(2).expect("valid id")))),
    StatusCode::CREATED
)]
#[case::flip_to_dislike(
    "dislike",
    Reaction::Dislike,
    Ok(ReactionOutcome::Changed(like_row(Reaction::Dislike, UserId::new(2).expect("valid id")))),
    StatusCode::OK
)]
#[case::repeat_like(
    "like",
    Reaction::Like,
    Err(Error::conflict("already liked")),
    StatusCode::BAD_REQUEST
)]
#[actix_web::test]
async fn reaction_status_follows_outcome(
    harness: Harness,
    #[case] verb: &str,
    #[case] reaction: Reaction,
    #[case] outcome: Result<ReactionOutcome, Error>,
    #[case] expected: StatusCode,
) {
    let mut ports = MockPorts::default();
    ports
        .reviews
        .expect_react()
        .with(always(), eq(ReviewId::new(8).expect("valid id")), eq(reaction))
        .times(1)
        .return_once(move |_, _, _| outcome);
    let app = api_app(mocked_state(&harness.store, &harness.clock, ports)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/review-like/reviews/8/{verb}"))
            .insert_header((header::AUTHORIZATION, bearer(&harness.reviewer, &harness.clock)))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), expected);
}

#[rstest]
#[actix_web::test]
async fn bad_review_id_is_a_400(harness: Harness) {
    let app = api_app(mocked_state(&harness.store, &harness.clock, MockPorts::default())).await;
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/review-like/reviews/zero/like")
            .insert_header((header::AUTHORIZATION, bearer(&harness.reviewer, &harness.clock)))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = json_body(res).await;
    assert_eq!(body["details"]["code"], "not_a_number");
}
