//! Driving port for channel reads.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Error, User, UserId};

/// Compact channel description used in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSummary {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: UserId,
    pub channel_name: String,
    pub logo_url: Option<String>,
    pub subscribers: u64,
}

impl From<&User> for ChannelSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            channel_name: user.channel_name().to_string(),
            logo_url: user.logo().map(|logo| logo.url.clone()),
            subscribers: user.subscribers(),
        }
    }
}

/// Public channel profile.
///
/// Contact details are not exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChannelProfile {
    #[schema(value_type = String)]
    pub id: UserId,
    pub channel_name: String,
    pub logo_url: Option<String>,
    pub subscribers: u64,
    #[schema(value_type = Vec<String>)]
    pub subscribed_by: Vec<UserId>,
    #[schema(value_type = Vec<String>)]
    pub subscribed_channels: Vec<UserId>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
}

impl From<&User> for ChannelProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            channel_name: user.channel_name().to_string(),
            logo_url: user.logo().map(|logo| logo.url.clone()),
            subscribers: user.subscribers(),
            subscribed_by: user.subscribed_by().as_slice().to_vec(),
            subscribed_channels: user.subscribed_channels().as_slice().to_vec(),
            created_at: user.created_at(),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChannelQuery: Send + Sync {
    /// Fetch a channel profile; `not_found` when absent.
    async fn get_channel(&self, id: UserId) -> Result<ChannelProfile, Error>;

    /// Summaries of the channels `id` follows, in subscription order.
    ///
    /// Channels that no longer exist are skipped.
    async fn list_subscribed_channels(&self, id: UserId) -> Result<Vec<ChannelSummary>, Error>;
}

/// Fixture query that knows no channels.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureChannelQuery;

#[async_trait]
impl ChannelQuery for FixtureChannelQuery {
    async fn get_channel(&self, id: UserId) -> Result<ChannelProfile, Error> {
        Err(Error::not_found(format!("user {id} not found")))
    }

    async fn list_subscribed_channels(&self, id: UserId) -> Result<Vec<ChannelSummary>, Error> {
        Err(Error::not_found(format!("user {id} not found")))
    }
}
