//! Domain primitives, aggregates, and services.
//!
//! Purpose: hold the engagement and subscription rules independently of any
//! transport or storage technology. Aggregates expose pure transitions;
//! services orchestrate them through the ports in [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Video / User: aggregates with derived engagement counters.
//! - MemberSet: insertion-ordered membership set backing every counter.
//! - EngagementService, SubscriptionService, ChannelQueryService,
//!   ReconciliationService, VideoCatalogueService: driving port
//!   implementations.

pub mod channel_query_service;
pub mod engagement_service;
pub mod error;
pub mod identifiers;
pub mod identity;
pub mod media;
pub mod membership;
pub mod ports;
pub mod reconciliation_service;
mod repository_error_mapping;
pub mod subscription_service;
pub mod trace_id;
pub mod user;
pub mod video;
pub mod video_catalogue_service;

pub use self::channel_query_service::ChannelQueryService;
pub use self::engagement_service::EngagementService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::identifiers::{IdValidationError, UserId, VideoId};
pub use self::identity::VerifiedIdentity;
pub use self::media::{MediaKind, MediaReference, MediaUpload};
pub use self::membership::MemberSet;
pub use self::reconciliation_service::ReconciliationService;
pub use self::subscription_service::SubscriptionService;
pub use self::trace_id::TraceId;
pub use self::user::{
    CHANNEL_NAME_MAX, ChannelMutation, ChannelMutationOutcome, ChannelName, EmailAddress,
    MutationEffect, SubscriptionError, User, UserParts, UserProfile, UserValidationError,
};
pub use self::video::{
    EngagementStatus, Reaction, TITLE_MAX, Video, VideoDetails, VideoMutation,
    VideoMutationOutcome, VideoParts, VideoValidationError,
};
pub use self::video_catalogue_service::VideoCatalogueService;

/// Convenient result alias for driving ports and handlers.
pub type ApiResult<T> = Result<T, Error>;
