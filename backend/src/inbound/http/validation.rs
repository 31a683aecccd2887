//! Shared validation helpers for inbound HTTP adapters.

use std::str::FromStr;

use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};
use serde_json::json;

use crate::domain::{Error, IdValidationError, MatchId, ParticipantId, ReviewId};

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(self) -> &'static str {
        self.0
    }
}

/// The match id segment used by guarded routes.
pub(crate) const MATCH_ID: FieldName = FieldName::new("id");
pub(crate) const PARTICIPANT_ID: FieldName = FieldName::new("participant_id");
pub(crate) const REVIEW_ID: FieldName = FieldName::new("id");

fn invalid_id(field: FieldName, value: &str, err: IdValidationError) -> Error {
    let code = match err {
        IdValidationError::NotANumber => "not_a_number",
        IdValidationError::NotPositive => "not_positive",
    };
    Error::invalid_request(format!("{} must be a positive integer", field.as_str())).with_details(
        json!({
            "field": field.as_str(),
            "value": value,
            "code": code,
        }),
    )
}

/// Parse a record id out of the matched path.
///
/// A missing segment is treated like an empty one so the client still gets a
/// 400 naming the field.
pub(crate) fn path_id<T>(req: &HttpRequest, field: FieldName) -> Result<T, Error>
where
    T: FromStr<Err = IdValidationError>,
{
    let raw = req.match_info().get(field.as_str()).unwrap_or_default();
    raw.parse().map_err(|err| invalid_id(field, raw, err))
}

macro_rules! path_segment {
    ($(#[$meta:meta])* $name:ident($id:ty) = $field:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name(pub $id);

        impl FromRequest for $name {
            type Error = Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
                ready(path_id(req, $field).map(Self))
            }
        }
    };
}

path_segment!(
    /// The `{id}` segment of a match route. List it ahead of any principal
    /// so a malformed id is rejected before credentials are looked at.
    MatchPath(MatchId) = MATCH_ID
);
path_segment!(
    /// The `{participant_id}` segment of an organizer route.
    ParticipantPath(ParticipantId) = PARTICIPANT_ID
);
path_segment!(
    /// The `{id}` segment of a reaction route.
    ReviewPath(ReviewId) = REVIEW_ID
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, MatchId};
    use actix_web::test::TestRequest;
    use rstest::rstest;

    fn request_with_id(raw: &str) -> HttpRequest {
        TestRequest::default().param("id", raw.to_owned()).to_http_request()
    }

    #[test]
    fn parses_positive_ids() {
        let id: MatchId = path_id(&request_with_id("42"), MATCH_ID).expect("valid id");
        assert_eq!(id.get(), 42);
    }

    #[rstest]
    #[case("abc", "not_a_number")]
    #[case("0", "not_positive")]
    #[case("-1", "not_positive")]
    fn rejects_bad_ids_with_field_details(#[case] raw: &str, #[case] code: &str) {
        let err = path_id::<MatchId>(&request_with_id(raw), MATCH_ID).expect_err("invalid");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        let details = err.details().expect("details present");
        assert_eq!(details["field"], "id");
        assert_eq!(details["code"], code);
    }

    #[test]
    fn missing_segment_is_rejected() {
        let req = TestRequest::default().to_http_request();
        assert!(path_id::<MatchId>(&req, MATCH_ID).is_err());
    }

    #[actix_web::test]
    async fn path_extractors_parse_their_own_segment() {
        let req = TestRequest::default()
            .param("id", "7")
            .param("participant_id", "nope")
            .to_http_request();

        let matched = MatchPath::extract(&req).await.expect("valid match id");
        assert_eq!(matched.0.get(), 7);
        let err = ParticipantPath::extract(&req).await.expect_err("invalid participant id");
        assert_eq!(err.details().expect("details present")["field"], "participant_id");
    }
}
