//! PostgreSQL persistence adapters built on Diesel.
//!
//! Each adapter implements one driven port from [`crate::domain::ports`] and
//! only translates between row structs and domain types. Row structs and the
//! table definitions stay private to this module.
//!
//! ```no_run
//! use free2free::outbound::persistence::{DbPool, DieselMatchRepository, PoolConfig};
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/free2free")).await?;
//! let matches = DieselMatchRepository::new(pool);
//! # let _ = matches;
//! # Ok(())
//! # }
//! ```

mod diesel_catalogue_repository;
mod diesel_error_mapping;
mod diesel_match_repository;
mod diesel_refresh_token_repository;
mod diesel_review_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_catalogue_repository::DieselCatalogueRepository;
pub use diesel_match_repository::DieselMatchRepository;
pub use diesel_refresh_token_repository::DieselRefreshTokenRepository;
pub use diesel_review_repository::DieselReviewRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
