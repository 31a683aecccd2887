//! HTTP inbound adapter exposing the REST API under `/api/v1`.

pub mod account;
pub mod admin;
pub mod credentials;
pub mod error;
pub mod guards;
pub mod health;
pub mod matches;
pub mod organizer;
pub mod reviews;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every API handler and the extractor error handlers.
///
/// Mount inside a scope that carries the session middleware:
///
/// ```ignore
/// App::new().service(web::scope("/api/v1").wrap(session).configure(configure))
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .service(account::get_profile)
        .service(account::issue_token)
        .service(account::refresh_token)
        .service(account::logout)
        .service(admin::list_activities)
        .service(admin::create_activity)
        .service(admin::list_locations)
        .service(admin::create_location)
        .service(admin::cancel_match)
        .service(matches::list_open_matches)
        .service(matches::create_match)
        .service(matches::join_match)
        .service(matches::list_past_matches)
        .service(organizer::approve_participant)
        .service(organizer::reject_participant)
        .service(organizer::close_match)
        .service(organizer::complete_match)
        .service(organizer::cancel_match)
        .service(reviews::create_review)
        .service(reviews::like_review)
        .service(reviews::dislike_review);
}
