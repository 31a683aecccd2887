//! PostgreSQL-backed `UserRepository`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{SocialProfile, SocialProvider, User, UserId};

use super::diesel_error_mapping::{self as mapping, RepositoryError};
use super::models::{NewUserRow, UserProfileUpdate, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    mapping::map_pool_error(error)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    mapping::map_diesel_error(error)
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let social_provider = row
        .social_provider
        .parse::<SocialProvider>()
        .map_err(|err| UserPersistenceError::invalid_column("social_provider", err))?;
    Ok(User {
        id: UserPersistenceError::decode_id("user id", row.id)?,
        social_id: row.social_id,
        social_provider,
        name: row.name,
        email: row.email,
        avatar_url: row.avatar_url,
        is_admin: row.is_admin,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_user)
            .transpose()
    }

    async fn find_by_social(
        &self,
        social_id: &str,
        provider: SocialProvider,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .filter(users::social_id.eq(social_id))
            .filter(users::social_provider.eq(provider.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_user)
            .transpose()
    }

    async fn insert(
        &self,
        profile: &SocialProfile,
        now: DateTime<Utc>,
    ) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            social_id: profile.social_id(),
            social_provider: profile.provider().as_str(),
            name: profile.name(),
            email: profile.email(),
            avatar_url: profile.avatar_url(),
            created_at: now,
            updated_at: now,
        };
        let stored = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_user(stored)
    }

    async fn update_profile(
        &self,
        id: UserId,
        profile: &SocialProfile,
        now: DateTime<Utc>,
    ) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = UserProfileUpdate {
            name: profile.name(),
            email: profile.email(),
            avatar_url: profile.avatar_url(),
            updated_at: now,
        };
        let stored = diesel::update(users::table.find(id.get()))
            .set(&changes)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_user(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(provider: &str, id: i64) -> UserRow {
        let at = Utc
            .with_ymd_and_hms(2026, 1, 5, 9, 0, 0)
            .single()
            .expect("valid timestamp");
        UserRow {
            id,
            social_id: "fb-1".into(),
            social_provider: provider.into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            avatar_url: None,
            is_admin: true,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn rows_convert_to_users() {
        let user = row_to_user(row("instagram", 3)).expect("valid row");
        assert_eq!(user.id.get(), 3);
        assert_eq!(user.social_provider, SocialProvider::Instagram);
        assert!(user.is_admin);
    }

    #[test]
    fn unknown_provider_is_a_query_error() {
        let err = row_to_user(row("myspace", 3)).expect_err("provider rejected");
        assert!(matches!(err, UserPersistenceError::Query { .. }));
    }
}
