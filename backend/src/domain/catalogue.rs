//! Admin-curated catalogue: locations and the activities hosted at them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ActivityId, LocationId, UserId};

pub const LOCATION_NAME_MAX: usize = 100;
pub const LOCATION_ADDRESS_MAX: usize = 200;
pub const ACTIVITY_TITLE_MAX: usize = 200;
pub const ACTIVITY_DESCRIPTION_MAX: usize = 1000;
pub const TARGET_COUNT_MIN: i32 = 1;
pub const TARGET_COUNT_MAX: i32 = 100;

/// Field-level validation failures for catalogue input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogueValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("{field} is out of range")]
    OutOfRange { field: &'static str },
}

impl CatalogueValidationError {
    /// Name of the offending input field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Empty { field } | Self::TooLong { field, .. } | Self::OutOfRange { field } => {
                field
            }
        }
    }
}

fn required_text(
    field: &'static str,
    value: String,
    max: usize,
) -> Result<String, CatalogueValidationError> {
    let value = value.trim().to_owned();
    if value.is_empty() {
        return Err(CatalogueValidationError::Empty { field });
    }
    if value.chars().count() > max {
        return Err(CatalogueValidationError::TooLong { field, max });
    }
    Ok(value)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
}

/// Location fields as submitted by an administrator.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationDraft {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Validated input for a new location.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLocation {
    name: String,
    address: String,
    latitude: f64,
    longitude: f64,
}

impl NewLocation {
    pub fn try_new(
        name: impl Into<String>,
        address: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self, CatalogueValidationError> {
        let name = required_text("name", name.into(), LOCATION_NAME_MAX)?;
        let address = required_text("address", address.into(), LOCATION_ADDRESS_MAX)?;
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CatalogueValidationError::OutOfRange { field: "latitude" });
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CatalogueValidationError::OutOfRange { field: "longitude" });
        }
        Ok(Self {
            name,
            address,
            latitude,
            longitude,
        })
    }

    pub fn from_draft(draft: LocationDraft) -> Result<Self, CatalogueValidationError> {
        Self::try_new(draft.name, draft.address, draft.latitude, draft.longitude)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Activity {
    pub id: ActivityId,
    pub title: String,
    pub target_count: i32,
    pub location_id: LocationId,
    pub description: String,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

/// Activity fields as submitted by an administrator.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivityDraft {
    pub title: String,
    pub target_count: i32,
    pub location_id: LocationId,
    #[serde(default)]
    pub description: String,
}

/// Validated input for a new activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivity {
    pub title: String,
    pub target_count: i32,
    pub location_id: LocationId,
    pub description: String,
    pub created_by: UserId,
}

impl NewActivity {
    /// Validate a draft, stamping the creating administrator.
    pub fn try_new(
        draft: ActivityDraft,
        created_by: UserId,
    ) -> Result<Self, CatalogueValidationError> {
        let title = required_text("title", draft.title, ACTIVITY_TITLE_MAX)?;
        if !(TARGET_COUNT_MIN..=TARGET_COUNT_MAX).contains(&draft.target_count) {
            return Err(CatalogueValidationError::OutOfRange {
                field: "target_count",
            });
        }
        let description = draft.description.trim().to_owned();
        if description.chars().count() > ACTIVITY_DESCRIPTION_MAX {
            return Err(CatalogueValidationError::TooLong {
                field: "description",
                max: ACTIVITY_DESCRIPTION_MAX,
            });
        }
        Ok(Self {
            title,
            target_count: draft.target_count,
            location_id: draft.location_id,
            description,
            created_by,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn draft(title: &str, target_count: i32, description: &str) -> ActivityDraft {
        ActivityDraft {
            title: title.into(),
            target_count,
            location_id: LocationId::new(1).expect("valid id"),
            description: description.into(),
        }
    }

    fn admin() -> UserId {
        UserId::new(9).expect("valid id")
    }

    #[rstest]
    #[case(draft("", 4, ""), "title")]
    #[case(draft("Bowling", 0, ""), "target_count")]
    #[case(draft("Bowling", 101, ""), "target_count")]
    #[case(draft("Bowling", 4, &"d".repeat(1001)), "description")]
    fn activity_validation_names_the_field(#[case] input: ActivityDraft, #[case] field: &str) {
        let err = NewActivity::try_new(input, admin()).expect_err("invalid draft");
        assert_eq!(err.field(), field);
    }

    #[test]
    fn activity_is_stamped_with_creator() {
        let activity = NewActivity::try_new(draft(" Bowling ", 4, "lanes"), admin())
            .expect("valid draft");
        assert_eq!(activity.title, "Bowling");
        assert_eq!(activity.created_by, admin());
    }

    #[rstest]
    #[case("", "Main St", 0.0, 0.0, "name")]
    #[case("Hall", "", 0.0, 0.0, "address")]
    #[case("Hall", "Main St", 91.0, 0.0, "latitude")]
    #[case("Hall", "Main St", 0.0, f64::NAN, "longitude")]
    fn location_validation_names_the_field(
        #[case] name: &str,
        #[case] address: &str,
        #[case] lat: f64,
        #[case] long: f64,
        #[case] field: &str,
    ) {
        let err = NewLocation::try_new(name, address, lat, long).expect_err("invalid location");
        assert_eq!(err.field(), field);
    }
}
