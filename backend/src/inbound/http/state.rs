//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::AccessGuards;
use crate::domain::ports::{AccountService, CatalogueAdmin, MatchLifecycle, ReviewLifecycle};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub guards: Arc<AccessGuards>,
    pub matches: Arc<dyn MatchLifecycle>,
    pub reviews: Arc<dyn ReviewLifecycle>,
    pub catalogue: Arc<dyn CatalogueAdmin>,
    pub accounts: Arc<dyn AccountService>,
}

impl HttpState {
    pub fn new(
        guards: Arc<AccessGuards>,
        matches: Arc<dyn MatchLifecycle>,
        reviews: Arc<dyn ReviewLifecycle>,
        catalogue: Arc<dyn CatalogueAdmin>,
        accounts: Arc<dyn AccountService>,
    ) -> Self {
        Self {
            guards,
            matches,
            reviews,
            catalogue,
            accounts,
        }
    }
}
