//! PostgreSQL-backed `CatalogueRepository` for locations and activities.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CataloguePersistenceError, CatalogueRepository};
use crate::domain::{Activity, ActivityId, Location, LocationId, NewActivity, NewLocation};

use super::diesel_error_mapping::{self as mapping, RepositoryError};
use super::models::{ActivityRow, LocationRow, NewActivityRow, NewLocationRow};
use super::pool::{DbPool, PoolError};
use super::schema::{activities, locations};

#[derive(Clone)]
pub struct DieselCatalogueRepository {
    pool: DbPool,
}

impl DieselCatalogueRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CataloguePersistenceError {
    mapping::map_pool_error(error)
}

fn map_diesel_error(error: diesel::result::Error) -> CataloguePersistenceError {
    mapping::map_diesel_error(error)
}

fn row_to_location(row: LocationRow) -> Result<Location, CataloguePersistenceError> {
    Ok(Location {
        id: CataloguePersistenceError::decode_id("location id", row.id)?,
        name: row.name,
        address: row.address,
        latitude: row.latitude,
        longitude: row.longitude,
        created_at: row.created_at,
    })
}

fn row_to_activity(row: ActivityRow) -> Result<Activity, CataloguePersistenceError> {
    Ok(Activity {
        id: CataloguePersistenceError::decode_id("activity id", row.id)?,
        title: row.title,
        target_count: row.target_count,
        location_id: CataloguePersistenceError::decode_id("location id", row.location_id)?,
        description: row.description,
        created_by: CataloguePersistenceError::decode_id("created_by", row.created_by)?,
        created_at: row.created_at,
    })
}

#[async_trait]
impl CatalogueRepository for DieselCatalogueRepository {
    async fn find_activity(
        &self,
        id: ActivityId,
    ) -> Result<Option<Activity>, CataloguePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        activities::table
            .find(id.get())
            .select(ActivityRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_activity)
            .transpose()
    }

    async fn list_activities(&self) -> Result<Vec<Activity>, CataloguePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ActivityRow> = activities::table
            .order((activities::created_at.desc(), activities::id.desc()))
            .select(ActivityRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_activity).collect()
    }

    async fn insert_activity(
        &self,
        activity: &NewActivity,
        now: DateTime<Utc>,
    ) -> Result<Activity, CataloguePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewActivityRow {
            title: &activity.title,
            target_count: activity.target_count,
            location_id: activity.location_id.get(),
            description: &activity.description,
            created_by: activity.created_by.get(),
            created_at: now,
        };
        let stored = diesel::insert_into(activities::table)
            .values(&row)
            .returning(ActivityRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_activity(stored)
    }

    async fn find_location(
        &self,
        id: LocationId,
    ) -> Result<Option<Location>, CataloguePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        locations::table
            .find(id.get())
            .select(LocationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_location)
            .transpose()
    }

    async fn list_locations(&self) -> Result<Vec<Location>, CataloguePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<LocationRow> = locations::table
            .order((locations::name.asc(), locations::id.asc()))
            .select(LocationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_location).collect()
    }

    async fn insert_location(
        &self,
        location: &NewLocation,
        now: DateTime<Utc>,
    ) -> Result<Location, CataloguePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewLocationRow {
            name: location.name(),
            address: location.address(),
            latitude: location.latitude(),
            longitude: location.longitude(),
            created_at: now,
        };
        let stored = diesel::insert_into(locations::table)
            .values(&row)
            .returning(LocationRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_location(stored)
    }
}
