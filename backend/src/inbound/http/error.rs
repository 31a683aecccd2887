//! HTTP boundary translator for domain errors.
//!
//! Every failure leaves the service as the same JSON shape:
//! `{"code": <status>, "error": <message>, "error_code": <category>}` plus
//! optional `trace_id` and `details`. Internal errors are redacted.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const REDACTED: &str = "Internal server error";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest | ErrorCode::Conflict => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Wire shape of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub code: u16,
    pub error: &'a str,
    pub error_code: ErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<&'a Value>,
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let internal = self.code() == ErrorCode::InternalError;
        if internal {
            error!(
                error = %self,
                trace_id = ?self.trace_id(),
                "request failed with internal error"
            );
        }
        let body = ErrorBody {
            code: status.as_u16(),
            error: if internal { REDACTED } else { self.message() },
            error_code: self.code(),
            trace_id: self.trace_id(),
            details: if internal { None } else { self.details() },
        };
        let mut builder = HttpResponse::build(status);
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(body)
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal(REDACTED)
    }
}

/// Route malformed JSON bodies through the common error shape.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(format!("invalid request body: {err}")).into()
}

/// Route unparsable path segments through the common error shape.
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(format!("invalid path parameter: {err}")).into()
}

/// Route unparsable query strings through the common error shape.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(format!("invalid query string: {err}")).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use rstest::rstest;
    use serde_json::json;

    async fn body_of(err: Error) -> (StatusCode, Value) {
        let response = err.error_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.expect("read body");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[rstest]
    #[case(Error::invalid_request("bad"), 400, "invalid_request")]
    #[case(Error::conflict("already joined"), 400, "conflict")]
    #[case(Error::unauthorized("unauthorized"), 401, "unauthorized")]
    #[case(Error::not_found("missing"), 404, "not_found")]
    #[actix_web::test]
    async fn status_is_echoed_in_body(
        #[case] err: Error,
        #[case] status: u16,
        #[case] code: &str,
    ) {
        let message = err.message().to_owned();
        let (actual, body) = body_of(err).await;
        assert_eq!(actual.as_u16(), status);
        assert_eq!(body["code"], json!(status));
        assert_eq!(body["error"], json!(message));
        assert_eq!(body["error_code"], json!(code));
    }

    #[actix_web::test]
    async fn internal_errors_are_redacted() {
        let err = Error::internal("pool exhausted at db-1:5432")
            .with_details(json!({ "host": "db-1" }))
            .with_trace_id("abc");
        let response = err.error_response();
        assert_eq!(
            response
                .headers()
                .get(TRACE_ID_HEADER)
                .and_then(|v| v.to_str().ok()),
            Some("abc")
        );
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], json!(REDACTED));
        assert_eq!(body["trace_id"], json!("abc"));
        assert!(body.get("details").is_none());
    }
}
