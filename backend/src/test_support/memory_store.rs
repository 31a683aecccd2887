//! In-memory implementation of every persistence port.
//!
//! Enforces the same unique constraints as the database schema so tests can
//! exercise duplicate-key handling without PostgreSQL.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    CataloguePersistenceError, CatalogueRepository, MatchPersistenceError, MatchRepository,
    RefreshTokenPersistenceError, RefreshTokenRepository, ReviewPersistenceError,
    ReviewRepository, StoredRefreshToken, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Activity, ActivityId, Location, LocationId, Match, MatchId, MatchParticipant, MatchStatus,
    NewActivity, NewLocation, NewMatch, NewParticipant, NewReview, NewReviewLike, ParticipantId,
    ParticipantStatus, Reaction, RefreshTokenId, Review, ReviewId, ReviewLike, ReviewLikeId,
    SocialProfile, SocialProvider, User, UserId,
};

#[derive(Default)]
struct Tables {
    sequence: i64,
    users: Vec<User>,
    locations: Vec<Location>,
    activities: Vec<Activity>,
    matches: Vec<Match>,
    participants: Vec<MatchParticipant>,
    reviews: Vec<Review>,
    likes: Vec<ReviewLike>,
    tokens: Vec<StoredRefreshToken>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.sequence += 1;
        self.sequence
    }
}

fn id_of<T: TryFrom<i64>>(raw: i64) -> T {
    match T::try_from(raw) {
        Ok(id) => id,
        Err(_) => panic!("sequence produced invalid id {raw}"),
    }
}

/// Shared in-memory tables. Cheap to wrap in an `Arc` and hand to every
/// service.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        match self.tables.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Insert a user directly, bypassing sign-in.
    pub fn seed_user(&self, name: &str, is_admin: bool) -> User {
        let mut tables = self.lock();
        let raw = tables.next_id();
        let now = Utc::now();
        let user = User {
            id: id_of(raw),
            social_id: format!("seed-{raw}"),
            social_provider: SocialProvider::Facebook,
            name: name.to_owned(),
            email: format!("seed{raw}@example.com"),
            avatar_url: None,
            is_admin,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        user
    }

    pub fn seed_location(&self, name: &str) -> Location {
        let mut tables = self.lock();
        let location = Location {
            id: id_of(tables.next_id()),
            name: name.to_owned(),
            address: format!("{name} Street"),
            latitude: 51.5,
            longitude: -0.12,
            created_at: Utc::now(),
        };
        tables.locations.push(location.clone());
        location
    }

    pub fn seed_activity(&self, title: &str, location: LocationId, created_by: UserId) -> Activity {
        let mut tables = self.lock();
        let activity = Activity {
            id: id_of(tables.next_id()),
            title: title.to_owned(),
            target_count: 4,
            location_id: location,
            description: String::new(),
            created_by,
            created_at: Utc::now(),
        };
        tables.activities.push(activity.clone());
        activity
    }

    pub fn seed_match(
        &self,
        activity: ActivityId,
        organizer: UserId,
        match_time: DateTime<Utc>,
        status: MatchStatus,
    ) -> Match {
        let mut tables = self.lock();
        let row = Match {
            id: id_of(tables.next_id()),
            activity_id: activity,
            organizer_id: organizer,
            match_time,
            status,
            created_at: Utc::now(),
        };
        tables.matches.push(row.clone());
        row
    }

    pub fn seed_participant(
        &self,
        match_id: MatchId,
        user: UserId,
        status: ParticipantStatus,
    ) -> MatchParticipant {
        let mut tables = self.lock();
        let row = MatchParticipant {
            id: id_of(tables.next_id()),
            match_id,
            user_id: user,
            status,
            joined_at: Utc::now(),
        };
        tables.participants.push(row.clone());
        row
    }

    /// Participant rows for `(match_id, user)`.
    pub fn participant_count(&self, match_id: MatchId, user: UserId) -> usize {
        self.lock()
            .participants
            .iter()
            .filter(|p| p.match_id == match_id && p.user_id == user)
            .count()
    }

    /// Reaction rows for `(review, user)`.
    pub fn reaction_rows(&self, review: ReviewId, user: UserId) -> Vec<ReviewLike> {
        self.lock()
            .likes
            .iter()
            .filter(|l| l.review_id == review && l.user_id == user)
            .cloned()
            .collect()
    }

    pub fn refresh_token_count(&self, user: UserId) -> usize {
        self.lock().tokens.iter().filter(|t| t.user_id == user).count()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_social(
        &self,
        social_id: &str,
        provider: SocialProvider,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|u| u.social_id == social_id && u.social_provider == provider)
            .cloned())
    }

    async fn insert(
        &self,
        profile: &SocialProfile,
        now: DateTime<Utc>,
    ) -> Result<User, UserPersistenceError> {
        let mut tables = self.lock();
        let taken = tables.users.iter().any(|u| {
            u.social_id == profile.social_id() && u.social_provider == profile.provider()
        });
        if taken {
            return Err(UserPersistenceError::conflict("users_social_id_provider_key"));
        }
        let user = User {
            id: id_of(tables.next_id()),
            social_id: profile.social_id().to_owned(),
            social_provider: profile.provider(),
            name: profile.name().to_owned(),
            email: profile.email().to_owned(),
            avatar_url: profile.avatar_url().map(str::to_owned),
            is_admin: false,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn update_profile(
        &self,
        id: UserId,
        profile: &SocialProfile,
        now: DateTime<Utc>,
    ) -> Result<User, UserPersistenceError> {
        let mut tables = self.lock();
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| UserPersistenceError::query(format!("user {id} missing")))?;
        user.name = profile.name().to_owned();
        user.email = profile.email().to_owned();
        user.avatar_url = profile.avatar_url().map(str::to_owned);
        user.updated_at = now;
        Ok(user.clone())
    }
}

#[async_trait]
impl CatalogueRepository for InMemoryStore {
    async fn find_activity(
        &self,
        id: ActivityId,
    ) -> Result<Option<Activity>, CataloguePersistenceError> {
        Ok(self.lock().activities.iter().find(|a| a.id == id).cloned())
    }

    async fn list_activities(&self) -> Result<Vec<Activity>, CataloguePersistenceError> {
        let mut rows = self.lock().activities.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn insert_activity(
        &self,
        activity: &NewActivity,
        now: DateTime<Utc>,
    ) -> Result<Activity, CataloguePersistenceError> {
        let mut tables = self.lock();
        let row = Activity {
            id: id_of(tables.next_id()),
            title: activity.title.clone(),
            target_count: activity.target_count,
            location_id: activity.location_id,
            description: activity.description.clone(),
            created_by: activity.created_by,
            created_at: now,
        };
        tables.activities.push(row.clone());
        Ok(row)
    }

    async fn find_location(
        &self,
        id: LocationId,
    ) -> Result<Option<Location>, CataloguePersistenceError> {
        Ok(self.lock().locations.iter().find(|l| l.id == id).cloned())
    }

    async fn list_locations(&self) -> Result<Vec<Location>, CataloguePersistenceError> {
        let mut rows = self.lock().locations.clone();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn insert_location(
        &self,
        location: &NewLocation,
        now: DateTime<Utc>,
    ) -> Result<Location, CataloguePersistenceError> {
        let mut tables = self.lock();
        let row = Location {
            id: id_of(tables.next_id()),
            name: location.name().to_owned(),
            address: location.address().to_owned(),
            latitude: location.latitude(),
            longitude: location.longitude(),
            created_at: now,
        };
        tables.locations.push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl MatchRepository for InMemoryStore {
    async fn find_match(&self, id: MatchId) -> Result<Option<Match>, MatchPersistenceError> {
        Ok(self.lock().matches.iter().find(|m| m.id == id).cloned())
    }

    async fn insert_match(&self, new_match: &NewMatch) -> Result<Match, MatchPersistenceError> {
        let mut tables = self.lock();
        let row = Match {
            id: id_of(tables.next_id()),
            activity_id: new_match.activity_id,
            organizer_id: new_match.organizer_id,
            match_time: new_match.match_time,
            status: MatchStatus::Open,
            created_at: new_match.created_at,
        };
        tables.matches.push(row.clone());
        Ok(row)
    }

    async fn update_match_status(
        &self,
        id: MatchId,
        from: MatchStatus,
        to: MatchStatus,
    ) -> Result<Option<Match>, MatchPersistenceError> {
        let mut tables = self.lock();
        let row = tables
            .matches
            .iter_mut()
            .find(|m| m.id == id && m.status == from);
        Ok(row.map(|row| {
            row.status = to;
            row.clone()
        }))
    }

    async fn list_open_matches(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Match>, MatchPersistenceError> {
        let mut rows: Vec<Match> = self
            .lock()
            .matches
            .iter()
            .filter(|m| m.status == MatchStatus::Open && m.match_time > now)
            .cloned()
            .collect();
        rows.sort_by_key(|m| m.match_time);
        Ok(rows)
    }

    async fn list_completed_for_user(
        &self,
        user: UserId,
    ) -> Result<Vec<Match>, MatchPersistenceError> {
        let tables = self.lock();
        let mut rows: Vec<Match> = tables
            .matches
            .iter()
            .filter(|m| m.status == MatchStatus::Completed)
            .filter(|m| {
                tables
                    .participants
                    .iter()
                    .any(|p| p.match_id == m.id && p.user_id == user)
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.match_time.cmp(&a.match_time));
        Ok(rows)
    }

    async fn find_participant(
        &self,
        match_id: MatchId,
        user: UserId,
    ) -> Result<Option<MatchParticipant>, MatchPersistenceError> {
        Ok(self
            .lock()
            .participants
            .iter()
            .find(|p| p.match_id == match_id && p.user_id == user)
            .cloned())
    }

    async fn find_participant_in_match(
        &self,
        id: ParticipantId,
        match_id: MatchId,
    ) -> Result<Option<MatchParticipant>, MatchPersistenceError> {
        Ok(self
            .lock()
            .participants
            .iter()
            .find(|p| p.id == id && p.match_id == match_id)
            .cloned())
    }

    async fn insert_participant(
        &self,
        participant: &NewParticipant,
    ) -> Result<MatchParticipant, MatchPersistenceError> {
        let mut tables = self.lock();
        let taken = tables
            .participants
            .iter()
            .any(|p| p.match_id == participant.match_id && p.user_id == participant.user_id);
        if taken {
            return Err(MatchPersistenceError::conflict("match_participants_match_user_key"));
        }
        let row = MatchParticipant {
            id: id_of(tables.next_id()),
            match_id: participant.match_id,
            user_id: participant.user_id,
            status: ParticipantStatus::Pending,
            joined_at: participant.joined_at,
        };
        tables.participants.push(row.clone());
        Ok(row)
    }

    async fn update_participant_status(
        &self,
        id: ParticipantId,
        status: ParticipantStatus,
    ) -> Result<MatchParticipant, MatchPersistenceError> {
        let mut tables = self.lock();
        let row = tables
            .participants
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| MatchPersistenceError::query(format!("participant {id} missing")))?;
        row.status = status;
        Ok(row.clone())
    }
}

#[async_trait]
impl ReviewRepository for InMemoryStore {
    async fn find_review(&self, id: ReviewId) -> Result<Option<Review>, ReviewPersistenceError> {
        Ok(self.lock().reviews.iter().find(|r| r.id == id).cloned())
    }

    async fn find_review_by_triple(
        &self,
        reviewer: UserId,
        reviewee: UserId,
        match_id: MatchId,
    ) -> Result<Option<Review>, ReviewPersistenceError> {
        Ok(self
            .lock()
            .reviews
            .iter()
            .find(|r| {
                r.reviewer_id == reviewer && r.reviewee_id == reviewee && r.match_id == match_id
            })
            .cloned())
    }

    async fn insert_review(&self, review: &NewReview) -> Result<Review, ReviewPersistenceError> {
        let mut tables = self.lock();
        let users_exist = [review.reviewer_id, review.reviewee_id]
            .iter()
            .all(|id| tables.users.iter().any(|u| u.id == *id));
        if !users_exist {
            return Err(ReviewPersistenceError::query(
                "insert violates foreign key constraint reviews_reviewee_id_fkey",
            ));
        }
        let taken = tables.reviews.iter().any(|r| {
            r.reviewer_id == review.reviewer_id
                && r.reviewee_id == review.reviewee_id
                && r.match_id == review.match_id
        });
        if taken {
            return Err(ReviewPersistenceError::conflict("reviews_reviewer_reviewee_match_key"));
        }
        let row = Review {
            id: id_of(tables.next_id()),
            match_id: review.match_id,
            reviewer_id: review.reviewer_id,
            reviewee_id: review.reviewee_id,
            score: review.score,
            comment: review.comment.clone(),
            created_at: review.created_at,
        };
        tables.reviews.push(row.clone());
        Ok(row)
    }

    async fn find_reaction(
        &self,
        review: ReviewId,
        user: UserId,
    ) -> Result<Option<ReviewLike>, ReviewPersistenceError> {
        Ok(self
            .lock()
            .likes
            .iter()
            .find(|l| l.review_id == review && l.user_id == user)
            .cloned())
    }

    async fn insert_reaction(
        &self,
        reaction: &NewReviewLike,
    ) -> Result<ReviewLike, ReviewPersistenceError> {
        let mut tables = self.lock();
        let taken = tables
            .likes
            .iter()
            .any(|l| l.review_id == reaction.review_id && l.user_id == reaction.user_id);
        if taken {
            return Err(ReviewPersistenceError::conflict("review_likes_review_user_key"));
        }
        let row = ReviewLike {
            id: id_of::<ReviewLikeId>(tables.next_id()),
            review_id: reaction.review_id,
            user_id: reaction.user_id,
            reaction: reaction.reaction,
        };
        tables.likes.push(row.clone());
        Ok(row)
    }

    async fn set_reaction_polarity(
        &self,
        id: ReviewLikeId,
        reaction: Reaction,
    ) -> Result<ReviewLike, ReviewPersistenceError> {
        let mut tables = self.lock();
        let row = tables
            .likes
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| ReviewPersistenceError::query(format!("reaction {id} missing")))?;
        row.reaction = reaction;
        Ok(row.clone())
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryStore {
    async fn insert(
        &self,
        user_id: UserId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<StoredRefreshToken, RefreshTokenPersistenceError> {
        let mut tables = self.lock();
        if tables.tokens.iter().any(|t| t.token_hash == token_hash) {
            return Err(RefreshTokenPersistenceError::conflict("refresh_tokens_token_hash_key"));
        }
        let row = StoredRefreshToken {
            id: id_of::<RefreshTokenId>(tables.next_id()),
            user_id,
            token_hash: token_hash.to_owned(),
            expires_at,
        };
        tables.tokens.push(row.clone());
        Ok(row)
    }

    async fn find_active_by_hash(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<StoredRefreshToken>, RefreshTokenPersistenceError> {
        Ok(self
            .lock()
            .tokens
            .iter()
            .find(|t| t.token_hash == token_hash && t.expires_at > now)
            .cloned())
    }

    async fn delete(&self, id: RefreshTokenId) -> Result<(), RefreshTokenPersistenceError> {
        self.lock().tokens.retain(|t| t.id != id);
        Ok(())
    }

    async fn delete_for_user(
        &self,
        user_id: UserId,
    ) -> Result<usize, RefreshTokenPersistenceError> {
        let mut tables = self.lock();
        let before = tables.tokens.len();
        tables.tokens.retain(|t| t.user_id != user_id);
        Ok(before - tables.tokens.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ReviewScore;
    use chrono::Duration;

    #[tokio::test]
    async fn participant_pairs_are_unique() {
        let store = InMemoryStore::new();
        let organizer = store.seed_user("Org", false);
        let member = store.seed_user("Member", false);
        let location = store.seed_location("Hall");
        let activity = store.seed_activity("Darts", location.id, organizer.id);
        let m = store.seed_match(
            activity.id,
            organizer.id,
            Utc::now() + Duration::hours(1),
            MatchStatus::Open,
        );
        let join = NewParticipant {
            match_id: m.id,
            user_id: member.id,
            joined_at: Utc::now(),
        };
        store.insert_participant(&join).await.expect("first join");
        let err = store.insert_participant(&join).await.expect_err("second join");
        assert!(matches!(err, MatchPersistenceError::Conflict { .. }));
        assert_eq!(store.participant_count(m.id, member.id), 1);
    }

    #[tokio::test]
    async fn status_updates_only_apply_from_the_expected_status() {
        let store = InMemoryStore::new();
        let organizer = store.seed_user("Org", false);
        let location = store.seed_location("Hall");
        let activity = store.seed_activity("Darts", location.id, organizer.id);
        let m = store.seed_match(
            activity.id,
            organizer.id,
            Utc::now() + Duration::hours(1),
            MatchStatus::Open,
        );
        let closed = store
            .update_match_status(m.id, MatchStatus::Open, MatchStatus::Closed)
            .await
            .expect("update");
        assert_eq!(closed.map(|c| c.status), Some(MatchStatus::Closed));
        let stale = store
            .update_match_status(m.id, MatchStatus::Open, MatchStatus::Cancelled)
            .await
            .expect("update");
        assert!(stale.is_none());
    }

    #[tokio::test]
    async fn reviews_are_unique_per_triple() {
        let store = InMemoryStore::new();
        let a = store.seed_user("A", false);
        let b = store.seed_user("B", false);
        let review = NewReview {
            match_id: MatchId::new(1).expect("valid id"),
            reviewer_id: a.id,
            reviewee_id: b.id,
            score: ReviewScore::new(5).expect("valid score"),
            comment: String::new(),
            created_at: Utc::now(),
        };
        store.insert_review(&review).await.expect("first review");
        assert!(store.insert_review(&review).await.is_err());
    }

    #[tokio::test]
    async fn reviews_require_a_registered_reviewee() {
        let store = InMemoryStore::new();
        let a = store.seed_user("A", false);
        let review = NewReview {
            match_id: MatchId::new(1).expect("valid id"),
            reviewer_id: a.id,
            reviewee_id: UserId::new(9_999).expect("valid id"),
            score: ReviewScore::new(4).expect("valid score"),
            comment: String::new(),
            created_at: Utc::now(),
        };
        let err = store.insert_review(&review).await.expect_err("dangling reviewee");
        assert!(matches!(err, ReviewPersistenceError::Query { .. }));
    }

    #[tokio::test]
    async fn expired_refresh_tokens_are_not_found() {
        let store = InMemoryStore::new();
        let user = store.seed_user("A", false);
        let now = Utc::now();
        RefreshTokenRepository::insert(&store, user.id, "digest", now + Duration::minutes(1))
            .await
            .expect("stored");
        assert!(store.find_active_by_hash("digest", now).await.expect("lookup").is_some());
        let later = now + Duration::minutes(2);
        assert!(store.find_active_by_hash("digest", later).await.expect("lookup").is_none());
    }
}
