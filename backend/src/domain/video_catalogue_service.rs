//! Video catalogue service: publishing, deletion, and reads.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    ChannelSummary, DeleteVideoRequest, MediaStorage, PublishVideoRequest, UserRepository,
    VideoCatalogueCommand, VideoCatalogueQuery, VideoRepository, VideoView, VideoWithOwner,
};
use crate::domain::repository_error_mapping::{
    map_media_storage_error, map_user_repository_error, map_video_repository_error,
};
use crate::domain::subscription_service::user_not_found;
use crate::domain::{Error, MediaKind, MediaReference, UserId, Video, VideoId};

fn video_not_found(id: VideoId) -> Error {
    Error::not_found("Video not found").with_details(json!({ "videoId": id }))
}

/// Catalogue service over videos, users, and media storage.
#[derive(Clone)]
pub struct VideoCatalogueService<V, U, M> {
    videos: Arc<V>,
    users: Arc<U>,
    media: Arc<M>,
    clock: Arc<dyn Clock>,
}

impl<V, U, M> VideoCatalogueService<V, U, M> {
    pub fn new(videos: Arc<V>, users: Arc<U>, media: Arc<M>, clock: Arc<dyn Clock>) -> Self {
        Self {
            videos,
            users,
            media,
            clock,
        }
    }
}

impl<V, U, M> VideoCatalogueService<V, U, M>
where
    V: VideoRepository,
    U: UserRepository,
    M: MediaStorage,
{
    /// Best-effort removal of an asset that is no longer referenced.
    async fn discard(&self, reference: &MediaReference, kind: MediaKind) {
        if let Err(err) = self.media.delete(reference, kind).await {
            warn!(
                storage_id = %reference.storage_id,
                ?kind,
                error = %err,
                "failed to remove orphaned media asset"
            );
        }
    }
}

#[async_trait]
impl<V, U, M> VideoCatalogueCommand for VideoCatalogueService<V, U, M>
where
    V: VideoRepository,
    U: UserRepository,
    M: MediaStorage,
{
    async fn publish_video(&self, request: PublishVideoRequest) -> Result<VideoView, Error> {
        let PublishVideoRequest {
            owner,
            details,
            video,
            thumbnail,
        } = request;

        self.users
            .find_by_id(&owner)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| user_not_found(owner))?;

        let video_ref = self
            .media
            .upload(video)
            .await
            .map_err(map_media_storage_error)?;
        let thumbnail_ref = match self.media.upload(thumbnail).await {
            Ok(reference) => reference,
            Err(err) => {
                self.discard(&video_ref, MediaKind::Video).await;
                return Err(map_media_storage_error(err));
            }
        };

        let built = Video::publish(
            VideoId::random(),
            owner,
            details,
            video_ref.clone(),
            thumbnail_ref.clone(),
            self.clock.utc(),
        );
        let record = match built {
            Ok(record) => record,
            Err(err) => {
                self.discard(&thumbnail_ref, MediaKind::Thumbnail).await;
                self.discard(&video_ref, MediaKind::Video).await;
                return Err(Error::invalid_request(err.to_string()));
            }
        };

        if let Err(err) = self.videos.insert(&record).await {
            self.discard(&thumbnail_ref, MediaKind::Thumbnail).await;
            self.discard(&video_ref, MediaKind::Video).await;
            return Err(map_video_repository_error(err));
        }

        info!(video_id = %record.id(), %owner, "video published");
        Ok(VideoView::from(&record))
    }

    async fn delete_video(&self, request: DeleteVideoRequest) -> Result<(), Error> {
        let video = self
            .videos
            .find_by_id(&request.video_id)
            .await
            .map_err(map_video_repository_error)?
            .ok_or_else(|| video_not_found(request.video_id))?;

        if video.owner() != request.actor {
            return Err(Error::forbidden("You have no permission to delete this video")
                .with_details(json!({ "videoId": request.video_id })));
        }

        self.media
            .delete(video.thumbnail(), MediaKind::Thumbnail)
            .await
            .map_err(map_media_storage_error)?;
        self.media
            .delete(video.video(), MediaKind::Video)
            .await
            .map_err(map_media_storage_error)?;

        let removed = self
            .videos
            .delete(&request.video_id)
            .await
            .map_err(map_video_repository_error)?;
        if !removed {
            return Err(video_not_found(request.video_id));
        }

        info!(video_id = %request.video_id, owner = %request.actor, "video deleted");
        Ok(())
    }
}

#[async_trait]
impl<V, U, M> VideoCatalogueQuery for VideoCatalogueService<V, U, M>
where
    V: VideoRepository,
    U: UserRepository,
    M: MediaStorage,
{
    async fn get_video(&self, id: VideoId) -> Result<VideoWithOwner, Error> {
        let video = self
            .videos
            .find_by_id(&id)
            .await
            .map_err(map_video_repository_error)?
            .ok_or_else(|| video_not_found(id))?;
        let owner = self
            .users
            .find_by_id(&video.owner())
            .await
            .map_err(map_user_repository_error)?;

        Ok(VideoWithOwner {
            video: VideoView::from(&video),
            owner: owner.as_ref().map(ChannelSummary::from),
        })
    }

    async fn list_videos(&self) -> Result<Vec<VideoView>, Error> {
        let videos = self
            .videos
            .list_all()
            .await
            .map_err(map_video_repository_error)?;
        Ok(videos.iter().map(VideoView::from).collect())
    }

    async fn list_videos_by_owner(&self, owner: UserId) -> Result<Vec<VideoView>, Error> {
        let videos = self
            .videos
            .list_by_owner(&owner)
            .await
            .map_err(map_video_repository_error)?;
        Ok(videos.iter().map(VideoView::from).collect())
    }
}

#[cfg(test)]
#[path = "video_catalogue_service_tests.rs"]
mod tests;
