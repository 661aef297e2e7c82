//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use vidshare::domain::ports::CredentialVerifier;
use vidshare::outbound::media::LocalMediaStorage;
use vidshare::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) credentials: Arc<dyn CredentialVerifier>,
    pub(crate) media: LocalMediaStorage,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a configuration backed by the in-memory store.
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        credentials: Arc<dyn CredentialVerifier>,
        media: LocalMediaStorage,
    ) -> Self {
        Self {
            bind_addr,
            credentials,
            media,
            db_pool: None,
        }
    }

    /// Attach a database connection pool.
    ///
    /// When provided, the server stores users and videos in PostgreSQL.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
