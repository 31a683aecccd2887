//! Server construction and middleware wiring.

mod config;
mod secrets;

pub use config::{AppSettings, ConfigError, ServerConfig};
pub use secrets::token_codec_from_env;

use std::sync::Arc;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::{Clock, DefaultClock};

use free2free::Trace;
use free2free::domain::{
    AccessGuards, CatalogueService, IdentityResolver, MatchService, ReviewService, TokenCodec,
    UserAccountService,
};
use free2free::inbound::http::configure;
use free2free::inbound::http::health::{HealthState, live, ready};
use free2free::inbound::http::state::HttpState;
use free2free::outbound::persistence::{
    DbPool, DieselCatalogueRepository, DieselMatchRepository, DieselRefreshTokenRepository,
    DieselReviewRepository, DieselUserRepository,
};

/// Wire the Diesel adapters into the domain services.
fn build_http_state(pool: &DbPool, codec: Arc<TokenCodec>) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let catalogue = Arc::new(DieselCatalogueRepository::new(pool.clone()));
    let matches = Arc::new(DieselMatchRepository::new(pool.clone()));
    let reviews = Arc::new(DieselReviewRepository::new(pool.clone()));
    let tokens = Arc::new(DieselRefreshTokenRepository::new(pool.clone()));

    let resolver = IdentityResolver::new(users.clone(), Arc::clone(&codec), Arc::clone(&clock));
    let guards = Arc::new(AccessGuards::new(
        resolver,
        matches.clone(),
        Arc::clone(&clock),
    ));

    HttpState::new(
        guards,
        Arc::new(MatchService::new(
            matches,
            catalogue.clone(),
            Arc::clone(&clock),
        )),
        Arc::new(ReviewService::new(
            reviews,
            users.clone(),
            Arc::clone(&clock),
        )),
        Arc::new(CatalogueService::new(catalogue, Arc::clone(&clock))),
        Arc::new(UserAccountService::new(users, tokens, codec, clock)),
    )
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(web::scope("/api/v1").wrap(session).configure(configure))
        .service(ready)
        .service(live)
}

/// Bind the listener and return the running server.
///
/// Readiness flips once the socket is bound; the caller awaits the returned
/// [`Server`].
///
/// # Errors
/// Propagates [`std::io::Error`] when the socket cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    pool: &DbPool,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        codec,
    } = config;
    let http_state = web::Data::new(build_http_state(pool, codec));
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
