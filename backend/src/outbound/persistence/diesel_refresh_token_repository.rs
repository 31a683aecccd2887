//! PostgreSQL-backed `RefreshTokenRepository`. Only digests are stored.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{
    RefreshTokenPersistenceError, RefreshTokenRepository, StoredRefreshToken,
};
use crate::domain::{RefreshTokenId, UserId};

use super::diesel_error_mapping::{self as mapping, RepositoryError};
use super::models::{NewRefreshTokenRow, RefreshTokenRow};
use super::pool::{DbPool, PoolError};
use super::schema::refresh_tokens;

#[derive(Clone)]
pub struct DieselRefreshTokenRepository {
    pool: DbPool,
}

impl DieselRefreshTokenRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RefreshTokenPersistenceError {
    mapping::map_pool_error(error)
}

fn map_diesel_error(error: diesel::result::Error) -> RefreshTokenPersistenceError {
    mapping::map_diesel_error(error)
}

fn row_to_token(row: RefreshTokenRow) -> Result<StoredRefreshToken, RefreshTokenPersistenceError> {
    Ok(StoredRefreshToken {
        id: RefreshTokenPersistenceError::decode_id("refresh token id", row.id)?,
        user_id: RefreshTokenPersistenceError::decode_id("user id", row.user_id)?,
        token_hash: row.token_hash,
        expires_at: row.expires_at,
    })
}

#[async_trait]
impl RefreshTokenRepository for DieselRefreshTokenRepository {
    async fn insert(
        &self,
        user_id: UserId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<StoredRefreshToken, RefreshTokenPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewRefreshTokenRow {
            user_id: user_id.get(),
            token_hash,
            expires_at,
        };
        let stored = diesel::insert_into(refresh_tokens::table)
            .values(&row)
            .returning(RefreshTokenRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_token(stored)
    }

    async fn find_active_by_hash(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<StoredRefreshToken>, RefreshTokenPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        refresh_tokens::table
            .filter(refresh_tokens::token_hash.eq(token_hash))
            .filter(refresh_tokens::expires_at.gt(now))
            .select(RefreshTokenRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_token)
            .transpose()
    }

    async fn delete(&self, id: RefreshTokenId) -> Result<(), RefreshTokenPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(refresh_tokens::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn delete_for_user(
        &self,
        user_id: UserId,
    ) -> Result<usize, RefreshTokenPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(refresh_tokens::table.filter(refresh_tokens::user_id.eq(user_id.get())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}
