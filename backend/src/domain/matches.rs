//! Matches and their participants.
//!
//! A match moves forward only:
//!
//! ```text
//! open ──close──▶ closed ──complete──▶ completed
//!   │ └──────────complete──────────────▲
//!   └──cancel──▶ cancelled
//! ```
//!
//! Participants are created `pending` on join and only ever flipped between
//! `approved` and `rejected` by the organizer; rows are never deleted.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{ActivityId, MatchId, ParticipantId, UserId};

/// How long after the scheduled time a completed match accepts reviews.
pub const REVIEW_WINDOW: Duration = Duration::hours(4);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status: {0}")]
pub struct UnknownStatus(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Open,
    Closed,
    Completed,
    Cancelled,
}

impl MatchStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether `next` is a legal forward step from `self`.
    ///
    /// # Examples
    /// ```
    /// use free2free::domain::MatchStatus;
    ///
    /// assert!(MatchStatus::Open.can_transition_to(MatchStatus::Closed));
    /// assert!(!MatchStatus::Completed.can_transition_to(MatchStatus::Open));
    /// ```
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Open, Self::Closed)
                | (Self::Open, Self::Completed)
                | (Self::Closed, Self::Completed)
                | (Self::Open, Self::Cancelled)
        )
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownStatus(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    pub id: MatchId,
    pub activity_id: ActivityId,
    pub organizer_id: UserId,
    pub match_time: DateTime<Utc>,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
}

impl Match {
    /// Open and scheduled after `now`.
    #[must_use]
    pub fn accepts_joins(&self, now: DateTime<Utc>) -> bool {
        self.status == MatchStatus::Open && self.match_time > now
    }

    /// Completed and still inside [`REVIEW_WINDOW`] of the scheduled time.
    #[must_use]
    pub fn in_review_window(&self, now: DateTime<Utc>) -> bool {
        self.status == MatchStatus::Completed && now < self.match_time + REVIEW_WINDOW
    }
}

/// Client input for opening a match.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchDraft {
    pub activity_id: ActivityId,
    pub match_time: DateTime<Utc>,
}

/// Row to insert when a match is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMatch {
    pub activity_id: ActivityId,
    pub organizer_id: UserId,
    pub match_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantStatus {
    Pending,
    Approved,
    Rejected,
}

impl ParticipantStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ParticipantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParticipantStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(UnknownStatus(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchParticipant {
    pub id: ParticipantId,
    pub match_id: MatchId,
    pub user_id: UserId,
    pub status: ParticipantStatus,
    pub joined_at: DateTime<Utc>,
}

/// Row to insert on join. Always `pending`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewParticipant {
    pub match_id: MatchId,
    pub user_id: UserId,
    pub joined_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case(MatchStatus::Open, MatchStatus::Closed, true)]
    #[case(MatchStatus::Open, MatchStatus::Completed, true)]
    #[case(MatchStatus::Open, MatchStatus::Cancelled, true)]
    #[case(MatchStatus::Closed, MatchStatus::Completed, true)]
    #[case(MatchStatus::Closed, MatchStatus::Open, false)]
    #[case(MatchStatus::Closed, MatchStatus::Cancelled, false)]
    #[case(MatchStatus::Completed, MatchStatus::Open, false)]
    #[case(MatchStatus::Cancelled, MatchStatus::Open, false)]
    #[case(MatchStatus::Open, MatchStatus::Open, false)]
    fn transitions_only_move_forward(
        #[case] from: MatchStatus,
        #[case] to: MatchStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(from.can_transition_to(to), allowed);
    }

    fn fixture(status: MatchStatus) -> Match {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 18, 0, 0).single().expect("valid time");
        Match {
            id: MatchId::new(1).expect("id"),
            activity_id: ActivityId::new(1).expect("id"),
            organizer_id: UserId::new(1).expect("id"),
            match_time: at,
            status,
            created_at: at - Duration::days(1),
        }
    }

    #[rstest]
    #[case(MatchStatus::Completed, 0, true)]
    #[case(MatchStatus::Completed, 239, true)]
    #[case(MatchStatus::Completed, 240, false)]
    #[case(MatchStatus::Open, 10, false)]
    #[case(MatchStatus::Closed, 10, false)]
    fn review_window_is_four_hours_after_completion(
        #[case] status: MatchStatus,
        #[case] minutes_after: i64,
        #[case] open: bool,
    ) {
        let m = fixture(status);
        let now = m.match_time + Duration::minutes(minutes_after);
        assert_eq!(m.in_review_window(now), open);
    }

    #[test]
    fn joins_require_open_future_match() {
        let m = fixture(MatchStatus::Open);
        assert!(m.accepts_joins(m.match_time - Duration::minutes(1)));
        assert!(!m.accepts_joins(m.match_time));
        assert!(!fixture(MatchStatus::Closed).accepts_joins(m.match_time - Duration::hours(1)));
    }

    #[test]
    fn statuses_round_trip_through_text() {
        assert_eq!("cancelled".parse::<MatchStatus>(), Ok(MatchStatus::Cancelled));
        assert!("archived".parse::<MatchStatus>().is_err());
        assert_eq!("approved".parse::<ParticipantStatus>(), Ok(ParticipantStatus::Approved));
    }
}
