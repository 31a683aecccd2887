//! Domain primitives, services, and ports.
//!
//! Purpose: hold the identity pipeline (credentials → principal → guards) and
//! the lifecycle rules for matches, participants, reviews, and reactions,
//! independent of HTTP and of the database.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic failures.
//! - `IdentityResolver` and `AccessGuards`: who is calling and what they may do.
//! - `MatchService`, `ReviewService`, `CatalogueService`, `UserAccountService`:
//!   implementations of the driving ports in [`ports`].

pub mod account_service;
pub mod auth;
pub mod catalogue;
pub mod catalogue_service;
pub mod error;
pub mod guards;
pub mod identity;
pub mod ids;
pub mod match_service;
pub mod matches;
pub mod ports;
pub mod review;
pub mod review_service;
pub mod token;
pub mod trace_id;
pub mod user;

pub use self::account_service::UserAccountService;
pub use self::auth::{AuthFailure, Principal};
pub use self::catalogue::{
    Activity, ActivityDraft, CatalogueValidationError, Location, LocationDraft, NewActivity,
    NewLocation,
};
pub use self::catalogue_service::CatalogueService;
pub use self::error::{Error, ErrorCode};
pub use self::guards::AccessGuards;
pub use self::identity::{
    BearerStrategy, CredentialStrategy, IdentityResolver, RequestCredentials, Resolution,
    SessionIdentity, SessionStrategy,
};
pub use self::ids::{
    ActivityId, IdValidationError, LocationId, MatchId, ParticipantId, RefreshTokenId, ReviewId,
    ReviewLikeId, UserId,
};
pub use self::match_service::MatchService;
pub use self::matches::{
    Match, MatchDraft, MatchParticipant, MatchStatus, NewMatch, NewParticipant,
    ParticipantStatus, REVIEW_WINDOW, UnknownStatus,
};
pub use self::review::{
    NewReview, NewReviewLike, Reaction, ReactionOutcome, Review, ReviewDraft, ReviewLike,
    ReviewScore, ReviewValidationError,
};
pub use self::review_service::ReviewService;
pub use self::token::{
    ACCESS_TOKEN_TTL, Claims, IssuedToken, MIN_SECRET_LEN, REFRESH_TOKEN_TTL, RefreshToken,
    TokenCodec, TokenError, refresh_token_digest,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{SocialProfile, SocialProvider, User, UserValidationError};
