//! Post-match reviews and the like/dislike reactions left on them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MatchId, ReviewId, ReviewLikeId, UserId};

pub const REVIEW_COMMENT_MAX: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewValidationError {
    #[error("score must be between {min} and {max}")]
    ScoreOutOfRange { min: i16, max: i16 },
    #[error("comment must be at most {max} characters")]
    CommentTooLong { max: usize },
    #[error("reviewee must be a valid user id")]
    InvalidReviewee,
    #[error("users cannot review themselves")]
    SelfReview,
}

/// Review score restricted to `3..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub struct ReviewScore(i16);

impl ReviewScore {
    pub const MIN: i16 = 3;
    pub const MAX: i16 = 5;

    pub fn new(raw: i16) -> Result<Self, ReviewValidationError> {
        if (Self::MIN..=Self::MAX).contains(&raw) {
            Ok(Self(raw))
        } else {
            Err(ReviewValidationError::ScoreOutOfRange {
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }

    #[must_use]
    pub const fn get(self) -> i16 {
        self.0
    }
}

impl TryFrom<i16> for ReviewScore {
    type Error = ReviewValidationError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ReviewScore> for i16 {
    fn from(value: ReviewScore) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Review {
    pub id: ReviewId,
    pub match_id: MatchId,
    pub reviewer_id: UserId,
    pub reviewee_id: UserId,
    pub score: ReviewScore,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Raw review body as posted by the client.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewDraft {
    pub reviewee_id: i64,
    pub score: i16,
    #[serde(default)]
    pub comment: String,
}

/// Validated review ready for insertion. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub match_id: MatchId,
    pub reviewer_id: UserId,
    pub reviewee_id: UserId,
    pub score: ReviewScore,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl NewReview {
    pub fn try_new(
        draft: ReviewDraft,
        match_id: MatchId,
        reviewer_id: UserId,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ReviewValidationError> {
        let reviewee_id =
            UserId::new(draft.reviewee_id).map_err(|_| ReviewValidationError::InvalidReviewee)?;
        if reviewee_id == reviewer_id {
            return Err(ReviewValidationError::SelfReview);
        }
        let score = ReviewScore::new(draft.score)?;
        let comment = draft.comment.trim().to_owned();
        if comment.chars().count() > REVIEW_COMMENT_MAX {
            return Err(ReviewValidationError::CommentTooLong {
                max: REVIEW_COMMENT_MAX,
            });
        }
        Ok(Self {
            match_id,
            reviewer_id,
            reviewee_id,
            score,
            comment,
            created_at,
        })
    }
}

/// Polarity of a reaction on a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reaction {
    Like,
    Dislike,
}

impl Reaction {
    #[must_use]
    pub const fn is_like(self) -> bool {
        matches!(self, Self::Like)
    }

    #[must_use]
    pub const fn from_is_like(is_like: bool) -> Self {
        if is_like { Self::Like } else { Self::Dislike }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewLike {
    pub id: ReviewLikeId,
    pub review_id: ReviewId,
    pub user_id: UserId,
    pub reaction: Reaction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReviewLike {
    pub review_id: ReviewId,
    pub user_id: UserId,
    pub reaction: Reaction,
}

/// What a reaction request did to the stored row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactionOutcome {
    /// No prior reaction existed; a row was inserted.
    Created(ReviewLike),
    /// The prior reaction had the opposite polarity and was flipped in place.
    Changed(ReviewLike),
}

impl ReactionOutcome {
    pub fn reaction(&self) -> &ReviewLike {
        match self {
            Self::Created(like) | Self::Changed(like) => like,
        }
    }
}
