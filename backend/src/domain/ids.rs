//! Strongly typed record identifiers.
//!
//! Every aggregate is keyed by a positive 64-bit integer assigned by the
//! database. Wrapping each in its own type stops a participant id being passed
//! where a match id is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Reasons a raw value cannot become a record identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IdValidationError {
    #[error("identifier must be a whole number")]
    NotANumber,
    #[error("identifier must be positive")]
    NotPositive,
}

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "i64", into = "i64")]
        pub struct $name(i64);

        impl $name {
            /// Validate and wrap a raw identifier.
            pub fn new(raw: i64) -> Result<Self, IdValidationError> {
                if raw > 0 {
                    Ok(Self(raw))
                } else {
                    Err(IdValidationError::NotPositive)
                }
            }

            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl TryFrom<i64> for $name {
            type Error = IdValidationError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl FromStr for $name {
            type Err = IdValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw: i64 = s.trim().parse().map_err(|_| IdValidationError::NotANumber)?;
                Self::new(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

record_id!(
    /// Primary key of a `users` row.
    UserId
);
record_id!(LocationId);
record_id!(ActivityId);
record_id!(
    /// Primary key of a `matches` row.
    MatchId
);
record_id!(
    /// Primary key of a `match_participants` row. Distinct from [`UserId`].
    ParticipantId
);
record_id!(ReviewId);
record_id!(ReviewLikeId);
record_id!(RefreshTokenId);
