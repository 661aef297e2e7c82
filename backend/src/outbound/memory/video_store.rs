//! In-memory [`VideoRepository`].

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{VideoRepository, VideoRepositoryError};
use crate::domain::{UserId, Video, VideoId, VideoMutation, VideoMutationOutcome};

#[derive(Debug, Default)]
pub struct InMemoryVideoRepository {
    videos: RwLock<HashMap<VideoId, Video>>,
}

impl InMemoryVideoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing videos.
    pub fn with_videos(videos: impl IntoIterator<Item = Video>) -> Self {
        let videos = videos.into_iter().map(|video| (video.id(), video)).collect();
        Self {
            videos: RwLock::new(videos),
        }
    }
}

fn newest_first(mut videos: Vec<Video>) -> Vec<Video> {
    videos.sort_by(|a, b| {
        b.created_at()
            .cmp(&a.created_at())
            .then_with(|| a.id().cmp(&b.id()))
    });
    videos
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn find_by_id(&self, id: &VideoId) -> Result<Option<Video>, VideoRepositoryError> {
        Ok(self.videos.read().await.get(id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Video>, VideoRepositoryError> {
        let videos = self.videos.read().await.values().cloned().collect();
        Ok(newest_first(videos))
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Video>, VideoRepositoryError> {
        let videos = self
            .videos
            .read()
            .await
            .values()
            .filter(|video| video.owner() == *owner)
            .cloned()
            .collect();
        Ok(newest_first(videos))
    }

    async fn insert(&self, video: &Video) -> Result<(), VideoRepositoryError> {
        let mut videos = self.videos.write().await;
        if videos.contains_key(&video.id()) {
            return Err(VideoRepositoryError::query(format!(
                "video {} already exists",
                video.id()
            )));
        }
        videos.insert(video.id(), video.clone());
        Ok(())
    }

    async fn delete(&self, id: &VideoId) -> Result<bool, VideoRepositoryError> {
        Ok(self.videos.write().await.remove(id).is_some())
    }

    async fn apply(
        &self,
        id: &VideoId,
        mutation: VideoMutation,
    ) -> Result<Option<VideoMutationOutcome>, VideoRepositoryError> {
        let mut videos = self.videos.write().await;
        let Some(video) = videos.get_mut(id) else {
            return Ok(None);
        };
        let status = video.apply(mutation);
        Ok(Some(VideoMutationOutcome {
            video: video.clone(),
            status,
        }))
    }
}
