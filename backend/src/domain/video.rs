//! Video aggregate and its engagement state machine.
//!
//! A video owns three membership sets: who liked it, who disliked it, and who
//! has viewed it. Like, dislike, and view counts are the cardinalities of those
//! sets. A user may appear in at most one of the like and dislike sets.
//!
//! Transitions are pure functions over a loaded aggregate; repositories are
//! responsible for running them atomically against persisted state.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{MediaReference, MemberSet, UserId, VideoId};

/// Maximum length of a video title, in characters.
pub const TITLE_MAX: usize = 200;

/// Validation errors raised when building or rehydrating a [`Video`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VideoValidationError {
    #[error("video title must not be empty")]
    EmptyTitle,
    #[error("video title must be at most {max} characters")]
    TitleTooLong { max: usize },
    #[error("user {user} both likes and dislikes the video")]
    ConflictingReaction { user: UserId },
}

/// A user's reaction to a single video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reaction {
    None,
    Liked,
    Disliked,
}

/// Outcome of an engagement transition, carrying its wire label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngagementStatus {
    Liked,
    LikeRemoved,
    Disliked,
    DislikeRemoved,
    ViewIncreased,
    AlreadyViewed,
}

impl EngagementStatus {
    /// Status label returned to clients.
    pub fn label(self) -> &'static str {
        match self {
            Self::Liked => "liked",
            Self::LikeRemoved => "like removed",
            Self::Disliked => "disliked",
            Self::DislikeRemoved => "dislike removed",
            Self::ViewIncreased => "View Increased",
            Self::AlreadyViewed => "Already viewed",
        }
    }

    /// Whether the transition changed the aggregate.
    pub fn changed_state(self) -> bool {
        !matches!(self, Self::AlreadyViewed)
    }
}

impl std::fmt::Display for EngagementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Engagement command applied to a single video by a single actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoMutation {
    ToggleLike { actor: UserId },
    ToggleDislike { actor: UserId },
    RegisterView { actor: UserId },
}

impl VideoMutation {
    pub fn actor(&self) -> UserId {
        match self {
            Self::ToggleLike { actor }
            | Self::ToggleDislike { actor }
            | Self::RegisterView { actor } => *actor,
        }
    }
}

/// Result of applying a [`VideoMutation`] inside a repository.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoMutationOutcome {
    pub video: Video,
    pub status: EngagementStatus,
}

/// Descriptive metadata supplied when publishing a video.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VideoDetails {
    pub title: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    pub duration_secs: Option<u32>,
}

/// Stored representation used to rehydrate a [`Video`].
#[derive(Debug, Clone, PartialEq)]
pub struct VideoParts {
    pub id: VideoId,
    pub owner: UserId,
    pub details: VideoDetails,
    pub video: MediaReference,
    pub thumbnail: MediaReference,
    pub liked_by: Vec<UserId>,
    pub disliked_by: Vec<UserId>,
    pub viewed_by: Vec<UserId>,
    pub created_at: DateTime<Utc>,
}

/// Published video aggregate.
///
/// ## Invariants
/// - `title` is non-empty once trimmed and at most [`TITLE_MAX`] characters.
/// - No user is a member of both `liked_by` and `disliked_by`.
#[derive(Debug, Clone, PartialEq)]
pub struct Video {
    id: VideoId,
    owner: UserId,
    details: VideoDetails,
    video: MediaReference,
    thumbnail: MediaReference,
    liked_by: MemberSet,
    disliked_by: MemberSet,
    viewed_by: MemberSet,
    created_at: DateTime<Utc>,
}

fn validate_details(details: &VideoDetails) -> Result<(), VideoValidationError> {
    let title = details.title.trim();
    if title.is_empty() {
        return Err(VideoValidationError::EmptyTitle);
    }
    if title.chars().count() > TITLE_MAX {
        return Err(VideoValidationError::TitleTooLong { max: TITLE_MAX });
    }
    Ok(())
}

impl Video {
    /// Create a freshly published video with no engagement.
    pub fn publish(
        id: VideoId,
        owner: UserId,
        mut details: VideoDetails,
        video: MediaReference,
        thumbnail: MediaReference,
        created_at: DateTime<Utc>,
    ) -> Result<Self, VideoValidationError> {
        validate_details(&details)?;
        details.title = details.title.trim().to_owned();
        Ok(Self {
            id,
            owner,
            details,
            video,
            thumbnail,
            liked_by: MemberSet::default(),
            disliked_by: MemberSet::default(),
            viewed_by: MemberSet::default(),
            created_at,
        })
    }

    /// Rebuild a video from persisted parts, re-checking its invariants.
    pub fn from_parts(parts: VideoParts) -> Result<Self, VideoValidationError> {
        let VideoParts {
            id,
            owner,
            details,
            video,
            thumbnail,
            liked_by,
            disliked_by,
            viewed_by,
            created_at,
        } = parts;
        validate_details(&details)?;

        let liked_by = MemberSet::from(liked_by);
        let disliked_by = MemberSet::from(disliked_by);
        if let Some(user) = liked_by.iter().find(|id| disliked_by.contains(id)) {
            return Err(VideoValidationError::ConflictingReaction { user: *user });
        }

        Ok(Self {
            id,
            owner,
            details,
            video,
            thumbnail,
            liked_by,
            disliked_by,
            viewed_by: MemberSet::from(viewed_by),
            created_at,
        })
    }

    pub fn id(&self) -> VideoId {
        self.id
    }

    pub fn owner(&self) -> UserId {
        self.owner
    }

    pub fn details(&self) -> &VideoDetails {
        &self.details
    }

    pub fn video(&self) -> &MediaReference {
        &self.video
    }

    pub fn thumbnail(&self) -> &MediaReference {
        &self.thumbnail
    }

    pub fn liked_by(&self) -> &MemberSet {
        &self.liked_by
    }

    pub fn disliked_by(&self) -> &MemberSet {
        &self.disliked_by
    }

    pub fn viewed_by(&self) -> &MemberSet {
        &self.viewed_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn likes(&self) -> u64 {
        self.liked_by.count()
    }

    pub fn dislikes(&self) -> u64 {
        self.disliked_by.count()
    }

    pub fn views(&self) -> u64 {
        self.viewed_by.count()
    }

    /// Current reaction of `actor`.
    pub fn reaction_of(&self, actor: &UserId) -> Reaction {
        if self.liked_by.contains(actor) {
            Reaction::Liked
        } else if self.disliked_by.contains(actor) {
            Reaction::Disliked
        } else {
            Reaction::None
        }
    }

    /// Toggle `actor`'s like, clearing any dislike first.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use vidshare::domain::{
    ///     EngagementStatus, MediaReference, UserId, Video, VideoDetails, VideoId,
    /// };
    ///
    /// let details = VideoDetails { title: "Intro".into(), ..VideoDetails::default() };
    /// let media = MediaReference::new("https://cdn/v", "v");
    /// let mut video = Video::publish(
    ///     VideoId::random(), UserId::random(), details, media.clone(), media, Utc::now(),
    /// ).expect("valid video");
    /// let actor = UserId::random();
    /// assert_eq!(video.toggle_like(actor), EngagementStatus::Liked);
    /// assert_eq!(video.toggle_like(actor), EngagementStatus::LikeRemoved);
    /// assert_eq!(video.likes(), 0);
    /// ```
    pub fn toggle_like(&mut self, actor: UserId) -> EngagementStatus {
        self.disliked_by.remove(&actor);
        if self.liked_by.remove(&actor) {
            EngagementStatus::LikeRemoved
        } else {
            self.liked_by.insert(actor);
            EngagementStatus::Liked
        }
    }

    /// Toggle `actor`'s dislike, clearing any like first.
    pub fn toggle_dislike(&mut self, actor: UserId) -> EngagementStatus {
        self.liked_by.remove(&actor);
        if self.disliked_by.remove(&actor) {
            EngagementStatus::DislikeRemoved
        } else {
            self.disliked_by.insert(actor);
            EngagementStatus::Disliked
        }
    }

    /// Count a view by `actor` at most once.
    pub fn register_view(&mut self, actor: UserId) -> EngagementStatus {
        if self.viewed_by.insert(actor) {
            EngagementStatus::ViewIncreased
        } else {
            EngagementStatus::AlreadyViewed
        }
    }

    /// Dispatch a [`VideoMutation`] to the matching transition.
    pub fn apply(&mut self, mutation: VideoMutation) -> EngagementStatus {
        match mutation {
            VideoMutation::ToggleLike { actor } => self.toggle_like(actor),
            VideoMutation::ToggleDislike { actor } => self.toggle_dislike(actor),
            VideoMutation::RegisterView { actor } => self.register_view(actor),
        }
    }
}

#[cfg(test)]
mod tests;
