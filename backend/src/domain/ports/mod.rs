//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by persistence adapters.
//! Driving ports (`MatchLifecycle`, `ReviewLifecycle`, `CatalogueAdmin`,
//! `AccountService`) are implemented by domain services and called by inbound
//! adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_service;
mod catalogue_admin;
mod catalogue_repository;
mod match_lifecycle;
mod match_repository;
mod refresh_token_repository;
mod review_lifecycle;
mod review_repository;
mod user_repository;

#[cfg(test)]
pub use account_service::MockAccountService;
pub use account_service::{AccountService, TokenPair};
#[cfg(test)]
pub use catalogue_admin::MockCatalogueAdmin;
pub use catalogue_admin::CatalogueAdmin;
#[cfg(test)]
pub use catalogue_repository::MockCatalogueRepository;
pub use catalogue_repository::{CataloguePersistenceError, CatalogueRepository};
#[cfg(test)]
pub use match_lifecycle::MockMatchLifecycle;
pub use match_lifecycle::MatchLifecycle;
#[cfg(test)]
pub use match_repository::MockMatchRepository;
pub use match_repository::{MatchPersistenceError, MatchRepository};
#[cfg(test)]
pub use refresh_token_repository::MockRefreshTokenRepository;
pub use refresh_token_repository::{
    RefreshTokenPersistenceError, RefreshTokenRepository, StoredRefreshToken,
};
#[cfg(test)]
pub use review_lifecycle::MockReviewLifecycle;
pub use review_lifecycle::ReviewLifecycle;
#[cfg(test)]
pub use review_repository::MockReviewRepository;
pub use review_repository::{ReviewPersistenceError, ReviewRepository};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
