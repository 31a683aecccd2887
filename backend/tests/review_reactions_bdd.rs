//! Behaviour tests for reaction toggling on reviews.
//!
//! Scenarios drive the review service directly over the in-memory store, so
//! they pin the toggle rules independently of the HTTP adapter.

use std::cell::RefCell;
use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use mockable::Clock;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tokio::runtime::Runtime;

use free2free::domain::ports::ReviewLifecycle;
use free2free::domain::{
    Error, ErrorCode, MatchStatus, ParticipantStatus, Principal, Reaction, ReactionOutcome,
    ReviewDraft, ReviewId, ReviewService, User,
};
use free2free::test_support::{InMemoryStore, MutableClock};

struct ReactionWorld {
    runtime: Runtime,
    clock: Arc<MutableClock>,
    store: Arc<InMemoryStore>,
    service: ReviewService<InMemoryStore, InMemoryStore>,
    reviewee: RefCell<Option<User>>,
    review: RefCell<Option<ReviewId>>,
    outcome: RefCell<Option<Result<ReactionOutcome, Error>>>,
}

impl ReactionWorld {
    fn new() -> Self {
        let now = Utc
            .with_ymd_and_hms(2026, 7, 4, 18, 0, 0)
            .single()
            .expect("valid timestamp");
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(MutableClock::new(now));
        let service_clock: Arc<dyn Clock> = clock.clone();
        Self {
            runtime: Runtime::new().expect("tokio runtime"),
            clock,
            service: ReviewService::new(store.clone(), store.clone(), service_clock),
            store,
            reviewee: RefCell::new(None),
            review: RefCell::new(None),
            outcome: RefCell::new(None),
        }
    }

    fn reviewee(&self) -> User {
        self.reviewee.borrow().clone().expect("reviewee seeded")
    }

    fn react(&self, review: ReviewId, reaction: Reaction) {
        let caller = Principal::from(&self.reviewee());
        let result = self
            .runtime
            .block_on(self.service.react(&caller, review, reaction));
        *self.outcome.borrow_mut() = Some(result);
    }

    fn with_outcome<F>(&self, f: F)
    where
        F: FnOnce(&Result<ReactionOutcome, Error>),
    {
        let outcome = self.outcome.borrow();
        f(outcome.as_ref().expect("a reaction was attempted"));
    }

    fn refused_with(&self, code: ErrorCode) {
        self.with_outcome(|outcome| match outcome {
            Ok(row) => panic!("expected refusal, got {row:?}"),
            Err(error) => assert_eq!(error.code(), code),
        });
    }
}

#[fixture]
fn world() -> ReactionWorld {
    ReactionWorld::new()
}

#[given("a review written after a completed match")]
fn a_review_written_after_a_completed_match(world: &ReactionWorld) {
    let admin = world.store.seed_user("Admin", true);
    let reviewer = world.store.seed_user("Ada", false);
    let reviewee = world.store.seed_user("Ben", false);
    let location = world.store.seed_location("Canal Pitch");
    let activity = world
        .store
        .seed_activity("Futsal", location.id, admin.id);
    let played = world.store.seed_match(
        activity.id,
        admin.id,
        world.clock.utc() - Duration::hours(1),
        MatchStatus::Completed,
    );
    for user in [&reviewer, &reviewee] {
        world
            .store
            .seed_participant(played.id, user.id, ParticipantStatus::Approved);
    }
    let draft = ReviewDraft {
        reviewee_id: reviewee.id.get(),
        score: 4,
        comment: "solid defender".to_owned(),
    };
    let review = world
        .runtime
        .block_on(
            world
                .service
                .create_review(&Principal::from(&reviewer), played.id, draft),
        )
        .expect("review stored");
    *world.review.borrow_mut() = Some(review.id);
    *world.reviewee.borrow_mut() = Some(reviewee);
}

#[when("the reviewee likes the review")]
fn the_reviewee_likes_the_review(world: &ReactionWorld) {
    let review = world.review.borrow().expect("review seeded");
    world.react(review, Reaction::Like);
}

#[when("the reviewee dislikes the review")]
fn the_reviewee_dislikes_the_review(world: &ReactionWorld) {
    let review = world.review.borrow().expect("review seeded");
    world.react(review, Reaction::Dislike);
}

#[when("the reviewee likes a review that does not exist")]
fn the_reviewee_likes_a_missing_review(world: &ReactionWorld) {
    world.react(ReviewId::new(9_999).expect("valid id"), Reaction::Like);
}

#[then("the reaction is created")]
fn the_reaction_is_created(world: &ReactionWorld) {
    world.with_outcome(|outcome| {
        assert!(matches!(
            outcome,
            Ok(ReactionOutcome::Created(row)) if row.reaction == Reaction::Like
        ));
    });
}

#[then("the reaction is changed to dislike")]
fn the_reaction_is_changed_to_dislike(world: &ReactionWorld) {
    world.with_outcome(|outcome| {
        assert!(matches!(
            outcome,
            Ok(ReactionOutcome::Changed(row)) if row.reaction == Reaction::Dislike
        ));
    });
}

#[then("the reaction is refused as a conflict")]
fn the_reaction_is_refused_as_a_conflict(world: &ReactionWorld) {
    world.refused_with(ErrorCode::Conflict);
}

#[then("the reaction is refused as invalid")]
fn the_reaction_is_refused_as_invalid(world: &ReactionWorld) {
    world.refused_with(ErrorCode::InvalidRequest);
}

#[then("the reviewee holds exactly one reaction")]
fn the_reviewee_holds_exactly_one_reaction(world: &ReactionWorld) {
    let review = world.review.borrow().expect("review seeded");
    let rows = world.store.reaction_rows(review, world.reviewee().id);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].reaction, Reaction::Dislike);
}

#[scenario(
    path = "tests/features/review_reactions.feature",
    name = "Toggling a reaction keeps a single row"
)]
fn toggling_a_reaction_keeps_a_single_row(world: ReactionWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/review_reactions.feature",
    name = "Reacting to a missing review is refused"
)]
fn reacting_to_a_missing_review_is_refused(world: ReactionWorld) {
    drop(world);
}
