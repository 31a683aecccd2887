//! Extractors that gate handlers on who is calling.
//!
//! Each extractor reads the request credentials, runs the matching
//! [`AccessGuards`](crate::domain::AccessGuards) check, and hands the handler
//! an already-vetted principal. Guarded match routes parse the `{id}` segment
//! before looking at credentials so a malformed id is always a 400.

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, MatchId, Principal};
use crate::inbound::http::credentials::request_credentials;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{MATCH_ID, path_id};

fn http_state(req: &HttpRequest) -> Result<web::Data<HttpState>, Error> {
    req.app_data::<web::Data<HttpState>>()
        .cloned()
        .ok_or_else(|| Error::internal("http state is not registered"))
}

/// Any resolved caller.
#[derive(Debug, Clone)]
pub struct UserPrincipal(pub Principal);

/// A caller whose stored row carries the admin flag.
#[derive(Debug, Clone)]
pub struct AdminPrincipal(pub Principal);

/// The organizer of the match named by the `{id}` path segment.
#[derive(Debug, Clone)]
pub struct MatchOrganizer {
    pub principal: Principal,
    pub match_id: MatchId,
}

/// An approved participant allowed to review the match named by `{id}`.
#[derive(Debug, Clone)]
pub struct MatchReviewer {
    pub principal: Principal,
    pub match_id: MatchId,
}

impl FromRequest for UserPrincipal {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let prepared = http_state(req).map(|state| (state, request_credentials(req)));
        Box::pin(async move {
            let (state, credentials) = prepared?;
            state.guards.authenticated(&credentials).await.map(Self)
        })
    }
}

impl FromRequest for AdminPrincipal {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let prepared = http_state(req).map(|state| (state, request_credentials(req)));
        Box::pin(async move {
            let (state, credentials) = prepared?;
            state.guards.admin(&credentials).await.map(Self)
        })
    }
}

impl FromRequest for MatchOrganizer {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let prepared = path_id::<MatchId>(req, MATCH_ID).and_then(|match_id| {
            http_state(req).map(|state| (state, request_credentials(req), match_id))
        });
        Box::pin(async move {
            let (state, credentials, match_id) = prepared?;
            let (principal, _) = state.guards.match_organizer(&credentials, match_id).await?;
            Ok(Self {
                principal,
                match_id,
            })
        })
    }
}

impl FromRequest for MatchReviewer {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let prepared = path_id::<MatchId>(req, MATCH_ID).and_then(|match_id| {
            http_state(req).map(|state| (state, request_credentials(req), match_id))
        });
        Box::pin(async move {
            let (state, credentials, match_id) = prepared?;
            let (principal, _) = state.guards.match_reviewer(&credentials, match_id).await?;
            Ok(Self {
                principal,
                match_id,
            })
        })
    }
}

#[cfg(test)]
#[path = "guards_tests.rs"]
mod tests;
