//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on domain ports,
//! which keeps them testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    ChannelQuery, CredentialVerifier, FixtureChannelQuery, FixtureCredentialVerifier,
    FixtureSubscriptionCommand, FixtureVideoCatalogue, FixtureVideoEngagementCommand,
    MediaStorage, SubscriptionCommand, UserRepository, VideoCatalogueCommand,
    VideoCatalogueQuery, VideoEngagementCommand, VideoRepository,
};
use crate::domain::{
    ChannelQueryService, EngagementService, SubscriptionService, VideoCatalogueService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub engagement: Arc<dyn VideoEngagementCommand>,
    pub subscriptions: Arc<dyn SubscriptionCommand>,
    pub channels: Arc<dyn ChannelQuery>,
    pub catalogue: Arc<dyn VideoCatalogueCommand>,
    pub catalogue_query: Arc<dyn VideoCatalogueQuery>,
    pub credentials: Arc<dyn CredentialVerifier>,
}

impl HttpState {
    /// Wire the domain services over concrete driven adapters.
    pub fn from_adapters<V, U, M>(
        videos: Arc<V>,
        users: Arc<U>,
        media: Arc<M>,
        credentials: Arc<dyn CredentialVerifier>,
        clock: Arc<dyn Clock>,
    ) -> Self
    where
        V: VideoRepository + 'static,
        U: UserRepository + 'static,
        M: MediaStorage + 'static,
    {
        let catalogue = Arc::new(VideoCatalogueService::new(
            videos.clone(),
            users.clone(),
            media,
            clock,
        ));
        Self {
            engagement: Arc::new(EngagementService::new(videos)),
            subscriptions: Arc::new(SubscriptionService::new(users.clone())),
            channels: Arc::new(ChannelQueryService::new(users)),
            catalogue: catalogue.clone(),
            catalogue_query: catalogue,
            credentials,
        }
    }

    /// State wired entirely to fixture ports.
    ///
    /// Tests replace individual fields with mocks or real services.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use vidshare::domain::ports::FixtureChannelQuery;
    /// use vidshare::inbound::http::state::HttpState;
    ///
    /// let state = HttpState {
    ///     channels: Arc::new(FixtureChannelQuery),
    ///     ..HttpState::fixtures()
    /// };
    /// let _channels = state.channels.clone();
    /// ```
    pub fn fixtures() -> Self {
        Self {
            engagement: Arc::new(FixtureVideoEngagementCommand),
            subscriptions: Arc::new(FixtureSubscriptionCommand),
            channels: Arc::new(FixtureChannelQuery),
            catalogue: Arc::new(FixtureVideoCatalogue),
            catalogue_query: Arc::new(FixtureVideoCatalogue),
            credentials: Arc::new(FixtureCredentialVerifier),
        }
    }
}
