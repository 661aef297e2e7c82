//! Driving ports for publishing, deleting, and reading videos.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Error, MediaUpload, UserId, Video, VideoDetails, VideoId};

use super::ChannelSummary;

/// Read model of a video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoView {
    #[schema(value_type = String, example = "7c9e6679-7425-40de-944b-e07fc1f90ae7")]
    pub id: VideoId,
    #[schema(value_type = String)]
    pub owner_id: UserId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    pub duration_secs: Option<u32>,
    pub video_url: String,
    pub thumbnail_url: String,
    pub likes: u64,
    pub dislikes: u64,
    pub views: u64,
    #[schema(value_type = Vec<String>)]
    pub liked_by: Vec<UserId>,
    #[schema(value_type = Vec<String>)]
    pub disliked_by: Vec<UserId>,
    #[schema(value_type = Vec<String>)]
    pub viewed_by: Vec<UserId>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
}

impl From<&Video> for VideoView {
    fn from(video: &Video) -> Self {
        let details = video.details();
        Self {
            id: video.id(),
            owner_id: video.owner(),
            title: details.title.clone(),
            description: details.description.clone(),
            category: details.category.clone(),
            tags: details.tags.clone(),
            duration_secs: details.duration_secs,
            video_url: video.video().url.clone(),
            thumbnail_url: video.thumbnail().url.clone(),
            likes: video.likes(),
            dislikes: video.dislikes(),
            views: video.views(),
            liked_by: video.liked_by().as_slice().to_vec(),
            disliked_by: video.disliked_by().as_slice().to_vec(),
            viewed_by: video.viewed_by().as_slice().to_vec(),
            created_at: video.created_at(),
        }
    }
}

/// A video together with a summary of the channel that published it.
///
/// `owner` is `None` when the owning user record no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoWithOwner {
    #[serde(flatten)]
    pub video: VideoView,
    pub owner: Option<ChannelSummary>,
}

/// Request to publish a new video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishVideoRequest {
    pub owner: UserId,
    pub details: VideoDetails,
    pub video: MediaUpload,
    pub thumbnail: MediaUpload,
}

/// Request to delete a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteVideoRequest {
    pub video_id: VideoId,
    pub actor: UserId,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoCatalogueCommand: Send + Sync {
    /// Upload both assets and store the new video.
    ///
    /// The uploaded video asset is removed again if the thumbnail upload or
    /// the record insert fails.
    async fn publish_video(&self, request: PublishVideoRequest) -> Result<VideoView, Error>;

    /// Delete a video and its assets. Only the owner may do this.
    async fn delete_video(&self, request: DeleteVideoRequest) -> Result<(), Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoCatalogueQuery: Send + Sync {
    async fn get_video(&self, id: VideoId) -> Result<VideoWithOwner, Error>;

    async fn list_videos(&self) -> Result<Vec<VideoView>, Error>;

    async fn list_videos_by_owner(&self, owner: UserId) -> Result<Vec<VideoView>, Error>;
}

/// Fixture catalogue with no videos.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureVideoCatalogue;

#[async_trait]
impl VideoCatalogueCommand for FixtureVideoCatalogue {
    async fn publish_video(&self, _request: PublishVideoRequest) -> Result<VideoView, Error> {
        Err(Error::service_unavailable("video publishing is not configured"))
    }

    async fn delete_video(&self, request: DeleteVideoRequest) -> Result<(), Error> {
        Err(Error::not_found(format!("video {} not found", request.video_id)))
    }
}

#[async_trait]
impl VideoCatalogueQuery for FixtureVideoCatalogue {
    async fn get_video(&self, id: VideoId) -> Result<VideoWithOwner, Error> {
        Err(Error::not_found(format!("video {id} not found")))
    }

    async fn list_videos(&self) -> Result<Vec<VideoView>, Error> {
        Ok(Vec::new())
    }

    async fn list_videos_by_owner(&self, _owner: UserId) -> Result<Vec<VideoView>, Error> {
        Ok(Vec::new())
    }
}
