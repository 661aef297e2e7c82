//! Driving port for channel subscriptions.

use async_trait::async_trait;

use crate::domain::{Error, UserId};

/// Subscription change requested by `subscriber` against `channel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionRequest {
    pub subscriber: UserId,
    pub channel: UserId,
}

/// Outcome of a subscription change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionStatus {
    Subscribed,
    Unsubscribed,
    /// A stale self entry was removed from the caller's followed channels.
    SelfSubscriptionRemoved,
}

impl SubscriptionStatus {
    /// Status label returned to clients.
    pub fn label(self) -> &'static str {
        match self {
            Self::Subscribed => "Subscribed",
            Self::Unsubscribed => "Unsubscribed successfully",
            Self::SelfSubscriptionRemoved => "Self-subscription removed successfully",
        }
    }
}

/// Status plus the channel's subscriber count after the change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionResponse {
    pub status: SubscriptionStatus,
    pub channel_subscribers: u64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionCommand: Send + Sync {
    /// Subscribe to a channel.
    ///
    /// Fails with `invalid_request` on self-subscription, `not_found` when
    /// either user is missing, and `conflict` when already subscribed.
    async fn subscribe(&self, request: SubscriptionRequest) -> Result<SubscriptionResponse, Error>;

    /// Unsubscribe from a channel.
    ///
    /// Unsubscribing from oneself only tidies the caller's followed channels.
    /// Fails with `conflict` when not subscribed.
    async fn unsubscribe(
        &self,
        request: SubscriptionRequest,
    ) -> Result<SubscriptionResponse, Error>;
}

/// Fixture command that treats every channel as missing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSubscriptionCommand;

#[async_trait]
impl SubscriptionCommand for FixtureSubscriptionCommand {
    async fn subscribe(&self, request: SubscriptionRequest) -> Result<SubscriptionResponse, Error> {
        Err(Error::not_found(format!("user {} not found", request.channel)))
    }

    async fn unsubscribe(
        &self,
        request: SubscriptionRequest,
    ) -> Result<SubscriptionResponse, Error> {
        Err(Error::not_found(format!("user {} not found", request.channel)))
    }
}
