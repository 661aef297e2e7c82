//! Builders for HTTP state from the configured adapters.

use std::sync::Arc;

use mockable::DefaultClock;
use tracing::info;

use vidshare::inbound::http::state::HttpState;
use vidshare::outbound::memory::{InMemoryUserRepository, InMemoryVideoRepository};
use vidshare::outbound::persistence::{DieselUserRepository, DieselVideoRepository};

use super::ServerConfig;

/// Build handler state, using PostgreSQL when a pool is configured and the
/// in-memory store otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> HttpState {
    let media = Arc::new(config.media.clone());
    let credentials = config.credentials.clone();
    let clock = Arc::new(DefaultClock);

    match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL aggregate store");
            HttpState::from_adapters(
                Arc::new(DieselVideoRepository::new(pool.clone())),
                Arc::new(DieselUserRepository::new(pool.clone())),
                media,
                credentials,
                clock,
            )
        }
        None => {
            info!("no database configured; using in-memory aggregate store");
            HttpState::from_adapters(
                Arc::new(InMemoryVideoRepository::new()),
                Arc::new(InMemoryUserRepository::new()),
                media,
                credentials,
                clock,
            )
        }
    }
}
