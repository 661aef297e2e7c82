//! Backend entry-point: loads configuration, wires adapters, and serves the
//! REST API.

mod server;

use std::ffi::OsString;
use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig as _;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use vidshare::config::AppSettings;
use vidshare::inbound::http::health::HealthState;
use vidshare::outbound::auth::JwtCredentialVerifier;
use vidshare::outbound::media::LocalMediaStorage;
use vidshare::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use vidshare::token_config::{BuildMode, token_settings_from_env};

/// Load settings from `args`, `VIDSHARE_*` variables, and config files.
fn load_settings(args: impl IntoIterator<Item = OsString>) -> Result<AppSettings> {
    AppSettings::load_from_iter(args).map_err(|err| eyre!("failed to load configuration: {err}"))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = load_settings(std::env::args_os())?;
    let tokens = token_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("invalid token configuration")?;
    let credentials = Arc::new(JwtCredentialVerifier::new(tokens.key));
    let media = LocalMediaStorage::open(&settings.media_root(), settings.media_base_url())
        .wrap_err("failed to open media root")?;

    let mut config = ServerConfig::new(settings.bind_addr(), credentials, media);
    if let Some(database_url) = settings.database_url() {
        if settings.run_migrations() {
            let applied = run_pending_migrations(database_url)
                .await
                .wrap_err("failed to apply migrations")?;
            info!(applied, "database schema up to date");
        }
        let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(settings.pool_max_size))
            .await
            .wrap_err("failed to build connection pool")?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    info!(bind_addr = %config.bind_addr(), "starting HTTP server");
    let server = create_server(health_state.clone(), config).wrap_err("failed to start server")?;
    server.await.wrap_err("server terminated with an error")?;
    health_state.mark_unhealthy();
    Ok(())
}
