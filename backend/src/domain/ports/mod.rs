//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, credential verification, media storage) are
//! implemented by outbound adapters. Driving ports are implemented by domain
//! services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod channel_query;
mod credential_verifier;
mod media_storage;
mod subscription_command;
mod subscription_maintenance;
mod user_repository;
mod video_catalogue;
mod video_engagement_command;
mod video_repository;

#[cfg(test)]
pub use channel_query::MockChannelQuery;
pub use channel_query::{ChannelProfile, ChannelQuery, ChannelSummary, FixtureChannelQuery};
#[cfg(test)]
pub use credential_verifier::MockCredentialVerifier;
pub use credential_verifier::{
    CredentialVerifier, CredentialVerifierError, FixtureCredentialVerifier,
};
#[cfg(test)]
pub use media_storage::MockMediaStorage;
pub use media_storage::{FixtureMediaStorage, MediaStorage, MediaStorageError};
#[cfg(test)]
pub use subscription_command::MockSubscriptionCommand;
pub use subscription_command::{
    FixtureSubscriptionCommand, SubscriptionCommand, SubscriptionRequest, SubscriptionResponse,
    SubscriptionStatus,
};
#[cfg(test)]
pub use subscription_maintenance::MockSubscriptionMaintenance;
pub use subscription_maintenance::{
    FixtureSubscriptionMaintenance, ReconciliationReport, SubscriptionMaintenance,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{FixtureUserRepository, UserRepository, UserRepositoryError};
#[cfg(test)]
pub use video_catalogue::{MockVideoCatalogueCommand, MockVideoCatalogueQuery};
pub use video_catalogue::{
    DeleteVideoRequest, FixtureVideoCatalogue, PublishVideoRequest, VideoCatalogueCommand,
    VideoCatalogueQuery, VideoView, VideoWithOwner,
};
#[cfg(test)]
pub use video_engagement_command::MockVideoEngagementCommand;
pub use video_engagement_command::{
    EngagementRequest, EngagementResponse, FixtureVideoEngagementCommand, VideoEngagementCommand,
};
#[cfg(test)]
pub use video_repository::MockVideoRepository;
pub use video_repository::{FixtureVideoRepository, VideoRepository, VideoRepositoryError};
