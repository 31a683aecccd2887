//! Backend entry point: configuration, logging, migrations, then the server.

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use free2free::inbound::http::health::HealthState;
use free2free::inbound::http::session_config::{
    BuildMode, key_fingerprint, session_settings_from_env,
};
use free2free::outbound::persistence::{DbPool, run_pending_migrations};
use server::{AppSettings, ServerConfig, create_server, token_codec_from_env};

#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|err| color_eyre::eyre::eyre!("failed to load configuration: {err}"))?;
    let env = DefaultEnv::new();
    let session = session_settings_from_env(&env, BuildMode::from_debug_assertions())?;
    info!(
        fingerprint = %key_fingerprint(&session.key),
        "session signing key loaded"
    );
    let codec = Arc::new(token_codec_from_env(&env)?);

    let database_url = settings.database_url()?;
    run_pending_migrations(database_url).await?;
    let pool = DbPool::new(settings.pool_config()?).await?;

    let bind_addr = settings.bind_addr()?;
    let config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
        codec,
    );
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, &pool, config)?;
    info!(%bind_addr, "listening");
    server.await?;
    Ok(())
}
