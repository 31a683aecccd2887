//! Driving port for admin catalogue maintenance.

use async_trait::async_trait;

use crate::domain::{Activity, ActivityDraft, Error, Location, LocationDraft, Principal};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueAdmin: Send + Sync {
    async fn create_location(&self, draft: LocationDraft) -> Result<Location, Error>;

    async fn list_locations(&self) -> Result<Vec<Location>, Error>;

    /// Create an activity at an existing location, stamped with `admin`.
    async fn create_activity(
        &self,
        admin: &Principal,
        draft: ActivityDraft,
    ) -> Result<Activity, Error>;

    async fn list_activities(&self) -> Result<Vec<Activity>, Error>;
}
