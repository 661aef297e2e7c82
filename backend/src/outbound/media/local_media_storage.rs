//! Filesystem media storage rooted in a capability directory.
//!
//! Assets land under `<root>/<kind>/<uuid>-<file name>`. All file access goes
//! through a `cap_std::fs::Dir`, so a crafted storage id cannot reach outside
//! the media root.

use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::ports::{MediaStorage, MediaStorageError};
use crate::domain::{MediaKind, MediaReference, MediaUpload};

/// Media storage writing into a local directory.
#[derive(Clone)]
pub struct LocalMediaStorage {
    root: Arc<Dir>,
    public_base: String,
}

impl LocalMediaStorage {
    /// Open (creating if needed) `root` and serve assets under `public_base`.
    ///
    /// # Errors
    ///
    /// Returns [`MediaStorageError::Unavailable`] when the directory cannot be
    /// created or opened.
    pub fn open(root: &Path, public_base: impl Into<String>) -> Result<Self, MediaStorageError> {
        Dir::create_ambient_dir_all(root, ambient_authority()).map_err(|err| {
            MediaStorageError::unavailable(format!("create {}: {err}", root.display()))
        })?;
        let dir = Dir::open_ambient_dir(root, ambient_authority()).map_err(|err| {
            MediaStorageError::unavailable(format!("open {}: {err}", root.display()))
        })?;
        Ok(Self {
            root: Arc::new(dir),
            public_base: public_base.into().trim_end_matches('/').to_owned(),
        })
    }

    fn url_for(&self, storage_id: &str) -> String {
        format!("{}/{storage_id}", self.public_base)
    }
}

/// Reduce a client-supplied name to a single safe path component.
fn sanitise_file_name(raw: &str) -> String {
    let last = raw.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = last
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "upload".to_owned()
    } else {
        trimmed.to_owned()
    }
}

#[async_trait]
impl MediaStorage for LocalMediaStorage {
    async fn upload(&self, upload: MediaUpload) -> Result<MediaReference, MediaStorageError> {
        let MediaUpload {
            kind,
            file_name,
            bytes,
            ..
        } = upload;
        let storage_id = format!(
            "{}/{}-{}",
            kind.as_str(),
            Uuid::new_v4(),
            sanitise_file_name(&file_name)
        );
        let root = Arc::clone(&self.root);
        let target = storage_id.clone();
        let size = bytes.len();

        tokio::task::spawn_blocking(move || {
            root.create_dir_all(kind.as_str())?;
            root.write(&target, &bytes)
        })
        .await
        .map_err(|err| MediaStorageError::write(format!("upload task failed: {err}")))?
        .map_err(|err| MediaStorageError::write(format!("write {storage_id}: {err}")))?;

        info!(storage_id = %storage_id, size, "media asset stored");
        Ok(MediaReference::new(self.url_for(&storage_id), storage_id))
    }

    async fn delete(
        &self,
        reference: &MediaReference,
        kind: MediaKind,
    ) -> Result<bool, MediaStorageError> {
        let expected_prefix = format!("{}/", kind.as_str());
        if !reference.storage_id.starts_with(&expected_prefix) {
            debug!(storage_id = %reference.storage_id, ?kind, "storage id does not match kind");
            return Ok(false);
        }
        let root = Arc::clone(&self.root);
        let target = reference.storage_id.clone();

        let removed = tokio::task::spawn_blocking(move || match root.remove_file(&target) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err),
        })
        .await
        .map_err(|err| MediaStorageError::write(format!("delete task failed: {err}")))?
        .map_err(|err| {
            MediaStorageError::write(format!("delete {}: {err}", reference.storage_id))
        })?;

        if removed {
            info!(storage_id = %reference.storage_id, "media asset removed");
        }
        Ok(removed)
    }
}
