//! Rebuild every user's followed-channel index from channel subscriber sets.
//!
//! Repairs the drift left behind when a subscription change failed between
//! its two writes. Run it while subscription traffic is quiet; the pass reads
//! a snapshot of all users before rewriting indexes.

use std::ffi::OsString;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig as _;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use vidshare::config::AppSettings;
use vidshare::domain::ReconciliationService;
use vidshare::domain::ports::SubscriptionMaintenance;
use vidshare::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};

/// `reconcile-subscriptions` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "reconcile-subscriptions",
    about = "Rebuild followed-channel indexes from channel subscriber sets",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to `VIDSHARE_DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

/// Pick the database URL, preferring a non-blank `--database-url` flag.
fn resolve_database_url<'a>(args: &'a CliArgs, settings: &'a AppSettings) -> Option<&'a str> {
    args.database_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .or_else(|| settings.database_url())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let settings = AppSettings::load_from_iter([OsString::from("reconcile-subscriptions")])
        .map_err(|err| eyre!("failed to load configuration: {err}"))?;
    let database_url = resolve_database_url(&args, &settings).ok_or_else(|| {
        eyre!("--database-url or VIDSHARE_DATABASE_URL must be set to reconcile subscriptions")
    })?;

    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(settings.pool_max_size))
        .await
        .wrap_err("failed to build connection pool")?;
    let service = ReconciliationService::new(Arc::new(DieselUserRepository::new(pool)));

    let report = service
        .reconcile_subscriptions()
        .await
        .map_err(|err| eyre!("reconciliation failed: {}", err.message()))?;
    info!(
        users_scanned = report.users_scanned,
        users_repaired = report.users_repaired,
        channels_added = report.channels_added,
        channels_removed = report.channels_removed,
        "subscription reconciliation finished"
    );
    Ok(())
}
