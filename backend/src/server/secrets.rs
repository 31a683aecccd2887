//! Access token signing secret.
//!
//! `JWT_SECRET` wins over `JWT_SECRET_FILE`. A secret shorter than
//! [`MIN_SECRET_LEN`] stops startup rather than signing weak tokens.

use mockable::Env;
use tracing::info;
use zeroize::Zeroizing;

use free2free::domain::{MIN_SECRET_LEN, TokenCodec};

use super::config::ConfigError;

const JWT_SECRET_ENV: &str = "JWT_SECRET";
const JWT_SECRET_FILE_ENV: &str = "JWT_SECRET_FILE";

/// Load and validate the signing secret, returning a ready codec.
pub fn token_codec_from_env<E: Env>(env: &E) -> Result<TokenCodec, ConfigError> {
    let secret = secret_from_env(env)?;
    if secret.len() < MIN_SECRET_LEN {
        return Err(ConfigError::JwtSecretTooShort {
            length: secret.len(),
            min: MIN_SECRET_LEN,
        });
    }
    info!(secret_len = secret.len(), "token signing secret loaded");
    Ok(TokenCodec::new(secret.to_vec()))
}

fn secret_from_env<E: Env>(env: &E) -> Result<Zeroizing<Vec<u8>>, ConfigError> {
    if let Some(value) = env.string(JWT_SECRET_ENV).map(Zeroizing::new) {
        return Ok(Zeroizing::new(value.as_bytes().to_vec()));
    }
    let path = env
        .string(JWT_SECRET_FILE_ENV)
        .ok_or(ConfigError::MissingJwtSecret)?;
    let bytes = std::fs::read(&path)
        .map(Zeroizing::new)
        .map_err(|source| ConfigError::JwtSecretRead {
            path: path.clone(),
            source,
        })?;
    // Secret files usually end with a newline.
    let trimmed = bytes.trim_ascii_end();
    Ok(Zeroizing::new(trimmed.to_vec()))
}
