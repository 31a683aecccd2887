//! Port for the admin-curated catalogue of locations and activities.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Activity, ActivityId, Location, LocationId, NewActivity, NewLocation};

use super::define_port_error;

define_port_error! {
    pub enum CataloguePersistenceError {
        Connection { message: String } => "catalogue repository connection failed: {message}",
        Query { message: String } => "catalogue repository query failed: {message}",
        Conflict { message: String } => "catalogue entry conflicts: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueRepository: Send + Sync {
    async fn find_activity(
        &self,
        id: ActivityId,
    ) -> Result<Option<Activity>, CataloguePersistenceError>;

    /// All activities, newest first.
    async fn list_activities(&self) -> Result<Vec<Activity>, CataloguePersistenceError>;

    async fn insert_activity(
        &self,
        activity: &NewActivity,
        now: DateTime<Utc>,
    ) -> Result<Activity, CataloguePersistenceError>;

    async fn find_location(
        &self,
        id: LocationId,
    ) -> Result<Option<Location>, CataloguePersistenceError>;

    /// All locations ordered by name.
    async fn list_locations(&self) -> Result<Vec<Location>, CataloguePersistenceError>;

    async fn insert_location(
        &self,
        location: &NewLocation,
        now: DateTime<Utc>,
    ) -> Result<Location, CataloguePersistenceError>;
}
