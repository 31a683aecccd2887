//! Admin catalogue service: plain validation over the catalogue repository.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;

use crate::domain::ports::{CatalogueAdmin, CataloguePersistenceError, CatalogueRepository};
use crate::domain::{
    Activity, ActivityDraft, CatalogueValidationError, Error, Location, LocationDraft, NewActivity,
    NewLocation, Principal,
};

fn map_repository_error(error: CataloguePersistenceError) -> Error {
    match error {
        CataloguePersistenceError::Conflict { message } => Error::conflict(message),
        other => Error::internal(other.to_string()),
    }
}

fn invalid(err: CatalogueValidationError) -> Error {
    let field = err.field();
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

#[derive(Clone)]
pub struct CatalogueService<C> {
    catalogue: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<C> CatalogueService<C> {
    pub fn new(catalogue: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self { catalogue, clock }
    }
}

#[async_trait]
impl<C> CatalogueAdmin for CatalogueService<C>
where
    C: CatalogueRepository,
{
    async fn create_location(&self, draft: LocationDraft) -> Result<Location, Error> {
        let location = NewLocation::from_draft(draft).map_err(invalid)?;
        self.catalogue
            .insert_location(&location, self.clock.utc())
            .await
            .map_err(map_repository_error)
    }

    async fn list_locations(&self) -> Result<Vec<Location>, Error> {
        self.catalogue
            .list_locations()
            .await
            .map_err(map_repository_error)
    }

    async fn create_activity(
        &self,
        admin: &Principal,
        draft: ActivityDraft,
    ) -> Result<Activity, Error> {
        let activity = NewActivity::try_new(draft, admin.id()).map_err(invalid)?;
        let location = self
            .catalogue
            .find_location(activity.location_id)
            .await
            .map_err(map_repository_error)?;
        if location.is_none() {
            return Err(Error::invalid_request(format!(
                "location {} does not exist",
                activity.location_id
            ))
            .with_details(json!({ "field": "location_id" })));
        }
        self.catalogue
            .insert_activity(&activity, self.clock.utc())
            .await
            .map_err(map_repository_error)
    }

    async fn list_activities(&self) -> Result<Vec<Activity>, Error> {
        self.catalogue
            .list_activities()
            .await
            .map_err(map_repository_error)
    }
}
