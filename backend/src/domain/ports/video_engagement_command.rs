//! Driving port for reacting to and viewing videos.

use async_trait::async_trait;

use crate::domain::{EngagementStatus, Error, UserId, VideoId};

/// Engagement request from an authenticated actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngagementRequest {
    pub video_id: VideoId,
    pub actor: UserId,
}

/// Resulting status plus the video's counters after the transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngagementResponse {
    pub status: EngagementStatus,
    pub likes: u64,
    pub dislikes: u64,
    pub views: u64,
}

/// Reaction and view transitions.
///
/// Every operation fails with `not_found` when the video does not exist and
/// reports success only after the new state is persisted.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoEngagementCommand: Send + Sync {
    /// Toggle the actor's like, clearing a dislike first.
    async fn toggle_like(&self, request: EngagementRequest) -> Result<EngagementResponse, Error>;

    /// Toggle the actor's dislike, clearing a like first.
    async fn toggle_dislike(&self, request: EngagementRequest)
    -> Result<EngagementResponse, Error>;

    /// Count the actor's view once.
    async fn register_view(&self, request: EngagementRequest) -> Result<EngagementResponse, Error>;
}

/// Fixture command that treats every video as missing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureVideoEngagementCommand;

impl FixtureVideoEngagementCommand {
    fn missing(request: EngagementRequest) -> Error {
        Error::not_found(format!("video {} not found", request.video_id))
    }
}

#[async_trait]
impl VideoEngagementCommand for FixtureVideoEngagementCommand {
    async fn toggle_like(&self, request: EngagementRequest) -> Result<EngagementResponse, Error> {
        Err(Self::missing(request))
    }

    async fn toggle_dislike(
        &self,
        request: EngagementRequest,
    ) -> Result<EngagementResponse, Error> {
        Err(Self::missing(request))
    }

    async fn register_view(&self, request: EngagementRequest) -> Result<EngagementResponse, Error> {
        Err(Self::missing(request))
    }
}
