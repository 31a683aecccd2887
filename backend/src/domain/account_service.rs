//! Account service: social sign-in, profile reads, and token issuance.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    AccountService, RefreshTokenPersistenceError, RefreshTokenRepository, TokenPair,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    ACCESS_TOKEN_TTL, Error, Principal, REFRESH_TOKEN_TTL, RefreshToken, SocialProfile,
    TokenCodec, User, UserId, refresh_token_digest,
};

fn map_user_error(error: UserPersistenceError) -> Error {
    Error::internal(format!("user repository error: {error}"))
}

fn map_token_store_error(error: RefreshTokenPersistenceError) -> Error {
    Error::internal(format!("refresh token store error: {error}"))
}

#[derive(Clone)]
pub struct UserAccountService<U, T> {
    users: Arc<U>,
    tokens: Arc<T>,
    codec: Arc<TokenCodec>,
    clock: Arc<dyn Clock>,
}

impl<U, T> UserAccountService<U, T> {
    pub fn new(
        users: Arc<U>,
        tokens: Arc<T>,
        codec: Arc<TokenCodec>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            tokens,
            codec,
            clock,
        }
    }
}

impl<U, T> UserAccountService<U, T>
where
    U: UserRepository,
    T: RefreshTokenRepository,
{
    /// Sign a new access token and replace every stored refresh token for
    /// the principal with a single fresh one.
    async fn mint_pair(&self, principal: &Principal) -> Result<TokenPair, Error> {
        let now = self.clock.utc();
        let access = self.codec.issue(principal, now).map_err(|err| {
            warn!(error = %err, "access token could not be issued");
            Error::internal(err.to_string())
        })?;
        let refresh = RefreshToken::generate();
        self.tokens
            .delete_for_user(principal.id())
            .await
            .map_err(map_token_store_error)?;
        self.tokens
            .insert(principal.id(), refresh.digest(), now + REFRESH_TOKEN_TTL)
            .await
            .map_err(map_token_store_error)?;
        Ok(TokenPair {
            access_token: access.token,
            refresh_token: refresh.plain().to_owned(),
            expires_in: ACCESS_TOKEN_TTL.num_seconds(),
        })
    }
}

#[async_trait]
impl<U, T> AccountService for UserAccountService<U, T>
where
    U: UserRepository,
    T: RefreshTokenRepository,
{
    async fn profile(&self, caller: &Principal) -> Result<User, Error> {
        self.users
            .find_by_id(caller.id())
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }

    async fn sign_in_social(&self, profile: SocialProfile) -> Result<User, Error> {
        let now = self.clock.utc();
        let existing = self
            .users
            .find_by_social(profile.social_id(), profile.provider())
            .await
            .map_err(map_user_error)?;
        let user = match existing {
            Some(user) => self
                .users
                .update_profile(user.id, &profile, now)
                .await
                .map_err(map_user_error)?,
            None => match self.users.insert(&profile, now).await {
                Ok(user) => {
                    info!(user_id = %user.id, provider = %profile.provider(), "user registered");
                    user
                }
                Err(UserPersistenceError::Conflict { .. }) => {
                    debug!(
                        provider = %profile.provider(),
                        "concurrent sign-in created the user first"
                    );
                    let winner = self
                        .users
                        .find_by_social(profile.social_id(), profile.provider())
                        .await
                        .map_err(map_user_error)?
                        .ok_or_else(|| Error::internal("user vanished after conflicting insert"))?;
                    self.users
                        .update_profile(winner.id, &profile, now)
                        .await
                        .map_err(map_user_error)?
                }
                Err(other) => return Err(map_user_error(other)),
            },
        };
        Ok(user)
    }

    async fn issue_tokens(&self, caller: &Principal) -> Result<TokenPair, Error> {
        self.mint_pair(caller).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, Error> {
        let now = self.clock.utc();
        let digest = refresh_token_digest(refresh_token.trim());
        let stored = self
            .tokens
            .find_active_by_hash(&digest, now)
            .await
            .map_err(map_token_store_error)?
            .ok_or_else(|| {
                debug!("refresh token unknown or expired");
                Error::unauthorized("unauthorized")
            })?;
        self.tokens
            .delete(stored.id)
            .await
            .map_err(map_token_store_error)?;
        let user = self
            .users
            .find_by_id(stored.user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized("unauthorized"))?;
        self.mint_pair(&Principal::from(&user)).await
    }

    async fn logout(&self, user: UserId) -> Result<(), Error> {
        let removed = self
            .tokens
            .delete_for_user(user)
            .await
            .map_err(map_token_store_error)?;
        debug!(user_id = %user, removed, "refresh tokens revoked");
        Ok(())
    }
}
