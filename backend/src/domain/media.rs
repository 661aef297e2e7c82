//! Media asset references handed out by the storage collaborator.

use serde::{Deserialize, Serialize};

/// Kind of media asset, used by storage adapters to pick a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Video,
    Thumbnail,
    Logo,
}

impl MediaKind {
    /// Directory-style prefix for assets of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Video => "videos",
            Self::Thumbnail => "thumbnails",
            Self::Logo => "logos",
        }
    }
}

/// Location of a stored asset plus the identifier needed to delete it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaReference {
    pub url: String,
    pub storage_id: String,
}

impl MediaReference {
    pub fn new(url: impl Into<String>, storage_id: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            storage_id: storage_id.into(),
        }
    }
}

/// Raw asset submitted for storage.
///
/// `Debug` deliberately omits the payload bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct MediaUpload {
    pub kind: MediaKind,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for MediaUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaUpload")
            .field("kind", &self.kind)
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}
