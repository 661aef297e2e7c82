//! User aggregate, doubling as the user's channel.
//!
//! A channel keeps two membership sets. `subscribed_by` lists the users who
//! subscribe to this channel and is the authoritative side of the relation;
//! the subscriber count is its cardinality. `subscribed_channels` lists the
//! channels this user follows, in subscription order, and is a derived index
//! that reconciliation can rebuild from every channel's `subscribed_by`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MediaReference, MemberSet, UserId};

/// Maximum channel name length, in characters.
pub const CHANNEL_NAME_MAX: usize = 64;

/// Validation errors raised when building a [`User`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("channel name must not be empty")]
    EmptyChannelName,
    #[error("channel name must be at most {max} characters")]
    ChannelNameTooLong { max: usize },
    #[error("email address must contain a local part and a domain")]
    InvalidEmail,
}

/// Display name of a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChannelName(String);

impl ChannelName {
    /// Validate and construct a channel name, trimming surrounding whitespace.
    pub fn new(name: impl Into<String>) -> Result<Self, UserValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyChannelName);
        }
        if trimmed.chars().count() > CHANNEL_NAME_MAX {
            return Err(UserValidationError::ChannelNameTooLong {
                max: CHANNEL_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ChannelName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ChannelName> for String {
    fn from(value: ChannelName) -> Self {
        value.0
    }
}

impl TryFrom<String> for ChannelName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Contact email of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        match trimmed.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(trimmed.to_owned()))
            }
            _ => Err(UserValidationError::InvalidEmail),
        }
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Reasons a subscription change is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubscriptionError {
    #[error("You cannot subscribe to your own channel")]
    SelfSubscription,
    #[error("Already a subscriber")]
    AlreadySubscribed,
    #[error("You are not a subscriber")]
    NotSubscribed,
}

/// Membership change applied to one side of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelMutation {
    /// Record `subscriber` in this channel's `subscribed_by`.
    AddSubscriber(UserId),
    /// Drop `subscriber` from this channel's `subscribed_by`.
    RemoveSubscriber(UserId),
    /// Record `channel` in this user's `subscribed_channels`.
    FollowChannel(UserId),
    /// Drop `channel` from this user's `subscribed_channels`.
    UnfollowChannel(UserId),
}

/// Whether a [`ChannelMutation`] changed the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationEffect {
    Applied,
    Unchanged,
}

impl MutationEffect {
    fn from_changed(changed: bool) -> Self {
        if changed { Self::Applied } else { Self::Unchanged }
    }
}

/// Result of applying a [`ChannelMutation`] inside a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMutationOutcome {
    pub user: User,
    pub effect: MutationEffect,
}

/// Profile fields supplied when registering a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub channel_name: ChannelName,
    pub email: EmailAddress,
    pub phone: Option<String>,
    pub logo: Option<MediaReference>,
}

/// Stored representation used to rehydrate a [`User`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserParts {
    pub id: UserId,
    pub profile: UserProfile,
    pub subscribed_by: Vec<UserId>,
    pub subscribed_channels: Vec<UserId>,
    pub created_at: DateTime<Utc>,
}

/// User and channel aggregate.
///
/// ## Invariants
/// - A user never appears in their own `subscribed_by`.
/// - `subscribed_channels` never contains the user's own id once written
///   through [`ChannelMutation::FollowChannel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    profile: UserProfile,
    subscribed_by: MemberSet,
    subscribed_channels: MemberSet,
    created_at: DateTime<Utc>,
}

impl User {
    /// Create a user with no subscriptions.
    pub fn register(id: UserId, profile: UserProfile, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            profile,
            subscribed_by: MemberSet::default(),
            subscribed_channels: MemberSet::default(),
            created_at,
        }
    }

    /// Rebuild a user from persisted parts.
    ///
    /// A stored self-subscription in `subscribed_by` is dropped. A stored
    /// self entry in `subscribed_channels` is kept so the self-correction
    /// path of unsubscribe can still remove it.
    pub fn from_parts(parts: UserParts) -> Self {
        let UserParts {
            id,
            profile,
            subscribed_by,
            subscribed_channels,
            created_at,
        } = parts;
        let subscribed_by = subscribed_by.into_iter().filter(|s| *s != id).collect();
        Self {
            id,
            profile,
            subscribed_by,
            subscribed_channels: MemberSet::from(subscribed_channels),
            created_at,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn channel_name(&self) -> &ChannelName {
        &self.profile.channel_name
    }

    pub fn logo(&self) -> Option<&MediaReference> {
        self.profile.logo.as_ref()
    }

    pub fn subscribed_by(&self) -> &MemberSet {
        &self.subscribed_by
    }

    pub fn subscribed_channels(&self) -> &MemberSet {
        &self.subscribed_channels
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Subscriber count, derived from `subscribed_by`.
    pub fn subscribers(&self) -> u64 {
        self.subscribed_by.count()
    }

    /// Apply a membership change.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use vidshare::domain::{
    ///     ChannelMutation, ChannelName, EmailAddress, MutationEffect, SubscriptionError,
    ///     User, UserId, UserProfile,
    /// };
    ///
    /// let profile = UserProfile {
    ///     channel_name: ChannelName::new("Ferris").expect("valid"),
    ///     email: EmailAddress::new("ferris@example.com").expect("valid"),
    ///     phone: None,
    ///     logo: None,
    /// };
    /// let mut channel = User::register(UserId::random(), profile, Utc::now());
    /// let fan = UserId::random();
    /// assert_eq!(channel.apply(ChannelMutation::AddSubscriber(fan)), Ok(MutationEffect::Applied));
    /// assert_eq!(
    ///     channel.apply(ChannelMutation::AddSubscriber(fan)),
    ///     Err(SubscriptionError::AlreadySubscribed),
    /// );
    /// assert_eq!(channel.subscribers(), 1);
    /// ```
    pub fn apply(
        &mut self,
        mutation: ChannelMutation,
    ) -> Result<MutationEffect, SubscriptionError> {
        match mutation {
            ChannelMutation::AddSubscriber(subscriber) => {
                if subscriber == self.id {
                    return Err(SubscriptionError::SelfSubscription);
                }
                if !self.subscribed_by.insert(subscriber) {
                    return Err(SubscriptionError::AlreadySubscribed);
                }
                Ok(MutationEffect::Applied)
            }
            ChannelMutation::RemoveSubscriber(subscriber) => {
                if !self.subscribed_by.remove(&subscriber) {
                    return Err(SubscriptionError::NotSubscribed);
                }
                Ok(MutationEffect::Applied)
            }
            ChannelMutation::FollowChannel(channel) => {
                if channel == self.id {
                    return Err(SubscriptionError::SelfSubscription);
                }
                Ok(MutationEffect::from_changed(
                    self.subscribed_channels.insert(channel),
                ))
            }
            ChannelMutation::UnfollowChannel(channel) => Ok(MutationEffect::from_changed(
                self.subscribed_channels.remove(&channel),
            )),
        }
    }

    /// Replace the derived `subscribed_channels` index wholesale.
    pub fn replace_subscribed_channels(&mut self, channels: MemberSet) {
        self.subscribed_channels = channels;
    }
}
