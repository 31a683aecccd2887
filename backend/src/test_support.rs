//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled for `cfg(test)` and behind the `test-support` feature.

mod clock;
mod memory_store;

pub use clock::MutableClock;
pub use memory_store::InMemoryStore;

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use mockable::Clock;

use crate::domain::{
    AccessGuards, CatalogueService, IdentityResolver, MatchService, ReviewService, SocialProvider,
    TokenCodec, User, UserAccountService, UserId,
};
use crate::inbound::http::state::HttpState;

/// Signing secret long enough for [`TokenCodec`].
pub const TEST_SECRET: &[u8] = b"test-secret-that-is-at-least-32-bytes!";

/// A codec over [`TEST_SECRET`].
pub fn test_codec() -> Arc<TokenCodec> {
    Arc::new(TokenCodec::new(TEST_SECRET))
}

/// Guards resolving callers against `store` with the test codec.
pub fn access_guards(store: &Arc<InMemoryStore>, clock: &Arc<MutableClock>) -> Arc<AccessGuards> {
    let clock: Arc<dyn Clock> = clock.clone();
    let resolver = IdentityResolver::new(store.clone(), test_codec(), Arc::clone(&clock));
    Arc::new(AccessGuards::new(resolver, store.clone(), clock))
}

/// Wire the real domain services over one in-memory store.
pub fn http_state(store: Arc<InMemoryStore>, clock: Arc<MutableClock>) -> HttpState {
    let guards = access_guards(&store, &clock);
    let clock: Arc<dyn Clock> = clock;
    HttpState::new(
        guards,
        Arc::new(MatchService::new(store.clone(), store.clone(), Arc::clone(&clock))),
        Arc::new(ReviewService::new(
            store.clone(),
            store.clone(),
            Arc::clone(&clock),
        )),
        Arc::new(CatalogueService::new(store.clone(), Arc::clone(&clock))),
        Arc::new(UserAccountService::new(store.clone(), store, test_codec(), clock)),
    )
}

/// A stored user with deterministic timestamps.
///
/// # Panics
/// Panics when `id` is not positive.
pub fn user_fixture(id: i64, name: &str, is_admin: bool) -> User {
    let created = Utc
        .with_ymd_and_hms(2025, 12, 1, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now);
    let id = match UserId::new(id) {
        Ok(id) => id,
        Err(err) => panic!("fixture user id {id}: {err}"),
    };
    User {
        id,
        social_id: format!("social-{id}"),
        social_provider: SocialProvider::Facebook,
        name: name.to_owned(),
        email: format!("user{id}@example.com"),
        avatar_url: None,
        is_admin,
        created_at: created,
        updated_at: created,
    }
}
