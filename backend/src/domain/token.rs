//! Signed access tokens and opaque refresh tokens.
//!
//! Access tokens are HS256 JWTs carrying the user id, display name, and admin
//! flag. Refresh tokens are random strings; only their SHA-256 digest is
//! persisted.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;
use zeroize::Zeroizing;

use super::Principal;

/// Minimum signing secret length in bytes.
pub const MIN_SECRET_LEN: usize = 32;
/// Lifetime of an access token.
pub const ACCESS_TOKEN_TTL: Duration = Duration::minutes(15);
/// Lifetime of a refresh token.
pub const REFRESH_TOKEN_TTL: Duration = Duration::days(7);

const REFRESH_TOKEN_BYTES: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("signing secret is {length} bytes; at least {min} are required")]
    SecretTooShort { length: usize, min: usize },
    #[error("token is malformed or its signature does not verify")]
    Malformed,
    #[error("token has expired")]
    Expired,
    #[error("token could not be signed: {message}")]
    Signing { message: String },
}

/// Claims embedded in an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub user_name: String,
    pub is_admin: bool,
    pub exp: i64,
    pub iat: i64,
}

/// A freshly signed access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies access tokens with a process-wide secret.
///
/// The length check runs on every call as well as at startup, so a codec
/// built around a short secret can never produce or accept a token.
#[derive(Clone)]
pub struct TokenCodec {
    secret: Zeroizing<Vec<u8>>,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("secret_len", &self.secret.len())
            .finish()
    }
}

impl TokenCodec {
    /// Wrap a secret without checking it.
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: Zeroizing::new(secret.into()),
        }
    }

    /// Wrap a secret, rejecting one shorter than [`MIN_SECRET_LEN`].
    pub fn validated(secret: impl Into<Vec<u8>>) -> Result<Self, TokenError> {
        let codec = Self::new(secret);
        codec.check_secret()?;
        Ok(codec)
    }

    fn check_secret(&self) -> Result<(), TokenError> {
        if self.secret.len() < MIN_SECRET_LEN {
            return Err(TokenError::SecretTooShort {
                length: self.secret.len(),
                min: MIN_SECRET_LEN,
            });
        }
        Ok(())
    }

    /// Sign an access token for `principal`, valid for [`ACCESS_TOKEN_TTL`].
    pub fn issue(
        &self,
        principal: &Principal,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        self.check_secret()?;
        let expires_at = now + ACCESS_TOKEN_TTL;
        let claims = Claims {
            user_id: principal.id().get(),
            user_name: principal.display_name().to_owned(),
            is_admin: principal.is_admin(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .map_err(|err| TokenError::Signing {
            message: err.to_string(),
        })?;
        Ok(IssuedToken { token, expires_at })
    }

    /// Verify signature and expiry against `now`, returning the claims.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        self.check_secret()?;
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the injected clock below.
        validation.validate_exp = false;
        validation.leeway = 0;
        let data = decode::<Claims>(token, &DecodingKey::from_secret(&self.secret), &validation)
            .map_err(|err| {
                debug!(error = %err, "access token rejected");
                TokenError::Malformed
            })?;
        if data.claims.exp <= now.timestamp() {
            return Err(TokenError::Expired);
        }
        Ok(data.claims)
    }
}

/// A newly minted refresh token and the digest that gets stored.
pub struct RefreshToken {
    plain: Zeroizing<String>,
    digest: String,
}

impl RefreshToken {
    /// Draw [`REFRESH_TOKEN_BYTES`] random bytes and hex-encode them.
    pub fn generate() -> Self {
        let mut bytes = Zeroizing::new([0_u8; REFRESH_TOKEN_BYTES]);
        rand::thread_rng().fill_bytes(&mut bytes[..]);
        let plain = Zeroizing::new(hex::encode(&bytes[..]));
        let digest = refresh_token_digest(&plain);
        Self { plain, digest }
    }

    /// The value handed to the client. Never persisted.
    pub fn plain(&self) -> &str {
        &self.plain
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }
}

/// Hex SHA-256 digest used to look refresh tokens up.
pub fn refresh_token_digest(plain: &str) -> String {
    hex::encode(Sha256::digest(plain.as_bytes()))
}
