//! PostgreSQL-backed `ReviewRepository` for reviews and reactions.
//!
//! Reviews are insert-only. Reactions are flipped in place with a single
//! `UPDATE`, so a `(review, user)` pair never holds more than one row.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ReviewPersistenceError, ReviewRepository};
use crate::domain::{
    MatchId, NewReview, NewReviewLike, Reaction, Review, ReviewId, ReviewLike, ReviewLikeId,
    ReviewScore, UserId,
};

use super::diesel_error_mapping::{self as mapping, RepositoryError};
use super::models::{NewReviewLikeRow, NewReviewRow, ReviewLikeRow, ReviewRow};
use super::pool::{DbPool, PoolError};
use super::schema::{review_likes, reviews};

#[derive(Clone)]
pub struct DieselReviewRepository {
    pool: DbPool,
}

impl DieselReviewRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ReviewPersistenceError {
    mapping::map_pool_error(error)
}

fn map_diesel_error(error: diesel::result::Error) -> ReviewPersistenceError {
    mapping::map_diesel_error(error)
}

fn row_to_review(row: ReviewRow) -> Result<Review, ReviewPersistenceError> {
    let score = ReviewScore::new(row.score)
        .map_err(|err| ReviewPersistenceError::invalid_column("score", err))?;
    Ok(Review {
        id: ReviewPersistenceError::decode_id("review id", row.id)?,
        match_id: ReviewPersistenceError::decode_id("match id", row.match_id)?,
        reviewer_id: ReviewPersistenceError::decode_id("reviewer id", row.reviewer_id)?,
        reviewee_id: ReviewPersistenceError::decode_id("reviewee id", row.reviewee_id)?,
        score,
        comment: row.comment,
        created_at: row.created_at,
    })
}

fn row_to_reaction(row: ReviewLikeRow) -> Result<ReviewLike, ReviewPersistenceError> {
    Ok(ReviewLike {
        id: ReviewPersistenceError::decode_id("review like id", row.id)?,
        review_id: ReviewPersistenceError::decode_id("review id", row.review_id)?,
        user_id: ReviewPersistenceError::decode_id("user id", row.user_id)?,
        reaction: Reaction::from_is_like(row.is_like),
    })
}

#[async_trait]
impl ReviewRepository for DieselReviewRepository {
    async fn find_review(&self, id: ReviewId) -> Result<Option<Review>, ReviewPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        reviews::table
            .find(id.get())
            .select(ReviewRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_review)
            .transpose()
    }

    async fn find_review_by_triple(
        &self,
        reviewer: UserId,
        reviewee: UserId,
        match_id: MatchId,
    ) -> Result<Option<Review>, ReviewPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        reviews::table
            .filter(reviews::reviewer_id.eq(reviewer.get()))
            .filter(reviews::reviewee_id.eq(reviewee.get()))
            .filter(reviews::match_id.eq(match_id.get()))
            .select(ReviewRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_review)
            .transpose()
    }

    async fn insert_review(&self, review: &NewReview) -> Result<Review, ReviewPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewReviewRow {
            match_id: review.match_id.get(),
            reviewer_id: review.reviewer_id.get(),
            reviewee_id: review.reviewee_id.get(),
            score: review.score.get(),
            comment: &review.comment,
            created_at: review.created_at,
        };
        let stored = diesel::insert_into(reviews::table)
            .values(&row)
            .returning(ReviewRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_review(stored)
    }

    async fn find_reaction(
        &self,
        review: ReviewId,
        user: UserId,
    ) -> Result<Option<ReviewLike>, ReviewPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        review_likes::table
            .filter(review_likes::review_id.eq(review.get()))
            .filter(review_likes::user_id.eq(user.get()))
            .select(ReviewLikeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_reaction)
            .transpose()
    }

    async fn insert_reaction(
        &self,
        reaction: &NewReviewLike,
    ) -> Result<ReviewLike, ReviewPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewReviewLikeRow {
            review_id: reaction.review_id.get(),
            user_id: reaction.user_id.get(),
            is_like: reaction.reaction.is_like(),
        };
        let stored = diesel::insert_into(review_likes::table)
            .values(&row)
            .returning(ReviewLikeRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_reaction(stored)
    }

    async fn set_reaction_polarity(
        &self,
        id: ReviewLikeId,
        reaction: Reaction,
    ) -> Result<ReviewLike, ReviewPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let stored = diesel::update(review_likes::table.find(id.get()))
            .set(review_likes::is_like.eq(reaction.is_like()))
            .returning(ReviewLikeRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_reaction(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reaction_rows_map_polarity() {
        let like = row_to_reaction(ReviewLikeRow {
            id: 1,
            review_id: 2,
            user_id: 3,
            is_like: false,
        })
        .expect("valid row");
        assert_eq!(like.reaction, Reaction::Dislike);
    }

    #[test]
    fn out_of_range_scores_are_query_errors() {
        let row = ReviewRow {
            id: 1,
            match_id: 2,
            reviewer_id: 3,
            reviewee_id: 4,
            score: 1,
            comment: String::new(),
            created_at: chrono::Utc::now(),
        };
        let err = row_to_review(row).expect_err("score below range");
        assert!(
            matches!(err, ReviewPersistenceError::Query { message } if message.contains("score"))
        );
    }
}
