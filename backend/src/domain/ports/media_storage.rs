//! Port for binary media storage.

use async_trait::async_trait;

use crate::domain::{MediaKind, MediaReference, MediaUpload};

use super::define_port_error;

define_port_error! {
    /// Errors raised by media storage adapters.
    pub enum MediaStorageError {
        /// The backing store could not be reached.
        Unavailable { message: String } => "media storage unavailable: {message}",
        /// The asset could not be written or removed.
        Write { message: String } => "media storage write failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Persist an asset and return where it can be fetched from.
    async fn upload(&self, upload: MediaUpload) -> Result<MediaReference, MediaStorageError>;

    /// Remove an asset, returning whether it existed.
    async fn delete(
        &self,
        reference: &MediaReference,
        kind: MediaKind,
    ) -> Result<bool, MediaStorageError>;
}

/// Fixture storage that fabricates references without storing bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMediaStorage;

#[async_trait]
impl MediaStorage for FixtureMediaStorage {
    async fn upload(&self, upload: MediaUpload) -> Result<MediaReference, MediaStorageError> {
        let storage_id = format!("{}/{}", upload.kind.as_str(), upload.file_name);
        Ok(MediaReference::new(
            format!("memory://{storage_id}"),
            storage_id,
        ))
    }

    async fn delete(
        &self,
        _reference: &MediaReference,
        _kind: MediaKind,
    ) -> Result<bool, MediaStorageError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_derives_reference_from_upload() {
        let reference = FixtureMediaStorage
            .upload(MediaUpload {
                kind: MediaKind::Thumbnail,
                file_name: "cover.png".into(),
                content_type: "image/png".into(),
                bytes: Vec::new(),
            })
            .await
            .expect("fixture upload succeeds");
        assert_eq!(reference.storage_id, "thumbnails/cover.png");
        assert_eq!(reference.url, "memory://thumbnails/cover.png");
    }
}
