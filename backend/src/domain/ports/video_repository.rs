//! Port for video aggregate persistence.
//!
//! Engagement changes go through [`VideoRepository::apply`], which is the
//! only way to mutate a stored video's membership sets. Adapters must load
//! the aggregate, run the pure transition, and persist the result as one
//! atomic step so concurrent reactions on the same video never lose updates.

use async_trait::async_trait;

use crate::domain::{UserId, Video, VideoId, VideoMutation, VideoMutationOutcome};

use super::define_port_error;

define_port_error! {
    /// Errors raised by video repository adapters.
    pub enum VideoRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "video repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "video repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Fetch a video by identifier.
    async fn find_by_id(&self, id: &VideoId) -> Result<Option<Video>, VideoRepositoryError>;

    /// List every video, newest first.
    async fn list_all(&self) -> Result<Vec<Video>, VideoRepositoryError>;

    /// List the videos published by `owner`, newest first.
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Video>, VideoRepositoryError>;

    /// Store a newly published video.
    async fn insert(&self, video: &Video) -> Result<(), VideoRepositoryError>;

    /// Remove a video record, returning whether it existed.
    async fn delete(&self, id: &VideoId) -> Result<bool, VideoRepositoryError>;

    /// Atomically apply an engagement mutation.
    ///
    /// Returns `None` when the video does not exist.
    async fn apply(
        &self,
        id: &VideoId,
        mutation: VideoMutation,
    ) -> Result<Option<VideoMutationOutcome>, VideoRepositoryError>;
}

/// Fixture implementation that stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureVideoRepository;

#[async_trait]
impl VideoRepository for FixtureVideoRepository {
    async fn find_by_id(&self, _id: &VideoId) -> Result<Option<Video>, VideoRepositoryError> {
        Ok(None)
    }

    async fn list_all(&self) -> Result<Vec<Video>, VideoRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_by_owner(&self, _owner: &UserId) -> Result<Vec<Video>, VideoRepositoryError> {
        Ok(Vec::new())
    }

    async fn insert(&self, _video: &Video) -> Result<(), VideoRepositoryError> {
        Ok(())
    }

    async fn delete(&self, _id: &VideoId) -> Result<bool, VideoRepositoryError> {
        Ok(false)
    }

    async fn apply(
        &self,
        _id: &VideoId,
        _mutation: VideoMutation,
    ) -> Result<Option<VideoMutationOutcome>, VideoRepositoryError> {
        Ok(None)
    }
}
