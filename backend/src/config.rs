//! Application configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `VIDSHARE_*` environment variables, and an
//! optional configuration file, in that order of precedence.

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_MEDIA_ROOT: &str = "./media";
const DEFAULT_MEDIA_BASE: &str = "/media";

/// Runtime settings shared by the server and maintenance binaries.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "VIDSHARE")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL connection string. When absent the in-memory store is used.
    pub database_url: Option<String>,
    /// Maximum number of pooled database connections.
    #[ortho_config(default = 10)]
    pub pool_max_size: u32,
    /// Directory holding uploaded media.
    pub media_root: Option<PathBuf>,
    /// Public URL prefix under which media is served.
    pub media_base_url: Option<String>,
    /// Apply pending migrations before serving. Unset means yes.
    pub run_migrations: Option<bool>,
}

impl AppSettings {
    /// Bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 8080)))
    }

    /// Media directory, falling back to `./media`.
    pub fn media_root(&self) -> PathBuf {
        self.media_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MEDIA_ROOT))
    }

    pub fn media_base_url(&self) -> &str {
        self.media_base_url.as_deref().unwrap_or(DEFAULT_MEDIA_BASE)
    }

    /// Whether to apply pending migrations at startup, defaulting to `true`.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }

    /// Database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}
