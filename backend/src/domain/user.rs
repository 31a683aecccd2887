//! User records and the federated sign-in profile that creates them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// Maximum length of a display name, in characters.
pub const USER_NAME_MAX: usize = 100;

/// Validation errors returned by [`SocialProfile::try_new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("social id must not be empty")]
    EmptySocialId,
    #[error("unsupported social provider: {0}")]
    UnknownProvider(String),
    #[error("name must not be empty")]
    EmptyName,
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("email address is not valid")]
    InvalidEmail,
}

/// Federated identity providers accepted at sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialProvider {
    Facebook,
    Instagram,
}

impl SocialProvider {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Facebook => "facebook",
            Self::Instagram => "instagram",
        }
    }
}

impl fmt::Display for SocialProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SocialProvider {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "facebook" => Ok(Self::Facebook),
            "instagram" => Ok(Self::Instagram),
            other => Err(UserValidationError::UnknownProvider(other.to_owned())),
        }
    }
}

/// Durable user identity.
///
/// Unique on `(social_id, social_provider)`. The admin flag lives here and
/// nowhere else; sessions and tokens never override it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub social_id: String,
    pub social_provider: SocialProvider,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile data handed over by the federated login callback.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "SocialProfileDto")]
pub struct SocialProfile {
    social_id: String,
    provider: SocialProvider,
    name: String,
    email: String,
    avatar_url: Option<String>,
}

impl SocialProfile {
    /// Validate raw callback fields.
    ///
    /// # Examples
    /// ```
    /// use free2free::domain::{SocialProfile, SocialProvider};
    ///
    /// let profile = SocialProfile::try_new("fb-1", "facebook", "Ada", "ada@example.com", None)
    ///     .expect("valid profile");
    /// assert_eq!(profile.provider(), SocialProvider::Facebook);
    /// ```
    pub fn try_new(
        social_id: impl Into<String>,
        provider: &str,
        name: impl Into<String>,
        email: impl Into<String>,
        avatar_url: Option<String>,
    ) -> Result<Self, UserValidationError> {
        let social_id = social_id.into();
        if social_id.trim().is_empty() {
            return Err(UserValidationError::EmptySocialId);
        }
        let provider = provider.parse()?;
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if name.chars().count() > USER_NAME_MAX {
            return Err(UserValidationError::NameTooLong { max: USER_NAME_MAX });
        }
        let email = email.into().trim().to_owned();
        if !looks_like_email(&email) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self {
            social_id,
            provider,
            name,
            email,
            avatar_url: avatar_url.filter(|url| !url.trim().is_empty()),
        })
    }

    pub fn social_id(&self) -> &str {
        &self.social_id
    }

    pub fn provider(&self) -> SocialProvider {
        self.provider
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

#[derive(Deserialize)]
struct SocialProfileDto {
    social_id: String,
    provider: String,
    name: String,
    email: String,
    #[serde(default)]
    avatar_url: Option<String>,
}

impl TryFrom<SocialProfileDto> for SocialProfile {
    type Error = UserValidationError;

    fn try_from(dto: SocialProfileDto) -> Result<Self, Self::Error> {
        Self::try_new(dto.social_id, &dto.provider, dto.name, dto.email, dto.avatar_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "facebook", "Ada", "a@b.io", UserValidationError::EmptySocialId)]
    #[case("1", "twitter", "Ada", "a@b.io", UserValidationError::UnknownProvider("twitter".into()))]
    #[case("1", "facebook", "  ", "a@b.io", UserValidationError::EmptyName)]
    #[case("1", "instagram", "Ada", "ada.example.com", UserValidationError::InvalidEmail)]
    #[case("1", "instagram", "Ada", "ada@localhost", UserValidationError::InvalidEmail)]
    fn rejects_invalid_profiles(
        #[case] social_id: &str,
        #[case] provider: &str,
        #[case] name: &str,
        #[case] email: &str,
        #[case] expected: UserValidationError,
    ) {
        let err = SocialProfile::try_new(social_id, provider, name, email, None)
            .expect_err("profile should be rejected");
        assert_eq!(err, expected);
    }

    #[test]
    fn rejects_overlong_names() {
        let name = "x".repeat(USER_NAME_MAX + 1);
        let err = SocialProfile::try_new("1", "facebook", name, "a@b.io", None)
            .expect_err("name too long");
        assert_eq!(err, UserValidationError::NameTooLong { max: USER_NAME_MAX });
    }

    #[test]
    fn blank_avatar_is_dropped() {
        let profile = SocialProfile::try_new("1", "facebook", " Ada ", "a@b.io", Some(" ".into()))
            .expect("valid profile");
        assert_eq!(profile.name(), "Ada");
        assert!(profile.avatar_url().is_none());
    }
}
