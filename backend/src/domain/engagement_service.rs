//! Reaction and view service.
//!
//! Implements [`VideoEngagementCommand`] by handing each transition to the
//! repository's atomic `apply`. The service holds no state of its own.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    EngagementRequest, EngagementResponse, VideoEngagementCommand, VideoRepository,
};
use crate::domain::repository_error_mapping::map_video_repository_error;
use crate::domain::{Error, VideoMutation};

/// Engagement service backed by a video repository.
#[derive(Clone)]
pub struct EngagementService<V> {
    videos: Arc<V>,
}

impl<V> EngagementService<V> {
    pub fn new(videos: Arc<V>) -> Self {
        Self { videos }
    }
}

impl<V> EngagementService<V>
where
    V: VideoRepository,
{
    async fn run(
        &self,
        request: EngagementRequest,
        mutation: VideoMutation,
    ) -> Result<EngagementResponse, Error> {
        let outcome = self
            .videos
            .apply(&request.video_id, mutation)
            .await
            .map_err(map_video_repository_error)?
            .ok_or_else(|| {
                Error::not_found("Video not found")
                    .with_details(json!({ "videoId": request.video_id }))
            })?;

        let video = &outcome.video;
        info!(
            video_id = %request.video_id,
            actor = %request.actor,
            status = outcome.status.label(),
            likes = video.likes(),
            dislikes = video.dislikes(),
            views = video.views(),
            "engagement applied"
        );

        Ok(EngagementResponse {
            status: outcome.status,
            likes: video.likes(),
            dislikes: video.dislikes(),
            views: video.views(),
        })
    }
}

#[async_trait]
impl<V> VideoEngagementCommand for EngagementService<V>
where
    V: VideoRepository,
{
    async fn toggle_like(&self, request: EngagementRequest) -> Result<EngagementResponse, Error> {
        self.run(request, VideoMutation::ToggleLike { actor: request.actor })
            .await
    }

    async fn toggle_dislike(
        &self,
        request: EngagementRequest,
    ) -> Result<EngagementResponse, Error> {
        self.run(request, VideoMutation::ToggleDislike { actor: request.actor })
            .await
    }

    async fn register_view(&self, request: EngagementRequest) -> Result<EngagementResponse, Error> {
        self.run(request, VideoMutation::RegisterView { actor: request.actor })
            .await
    }
}

#[cfg(test)]
#[path = "engagement_service_tests.rs"]
mod tests;
