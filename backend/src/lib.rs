//! free2free backend: identity, authorization guards, and the match and
//! review lifecycle behind an Actix REST API.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use middleware::Trace;
