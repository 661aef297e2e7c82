//! Channel read service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{ChannelProfile, ChannelQuery, ChannelSummary, UserRepository};
use crate::domain::repository_error_mapping::map_user_repository_error;
use crate::domain::subscription_service::user_not_found;
use crate::domain::{Error, UserId};

/// Channel query service backed by a user repository.
#[derive(Clone)]
pub struct ChannelQueryService<U> {
    users: Arc<U>,
}

impl<U> ChannelQueryService<U> {
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<U> ChannelQuery for ChannelQueryService<U>
where
    U: UserRepository,
{
    async fn get_channel(&self, id: UserId) -> Result<ChannelProfile, Error> {
        let user = self
            .users
            .find_by_id(&id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| user_not_found(id))?;
        Ok(ChannelProfile::from(&user))
    }

    async fn list_subscribed_channels(&self, id: UserId) -> Result<Vec<ChannelSummary>, Error> {
        let user = self
            .users
            .find_by_id(&id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| user_not_found(id))?;

        let followed = user.subscribed_channels().as_slice();
        if followed.is_empty() {
            return Ok(Vec::new());
        }
        let channels = self
            .users
            .find_many(followed)
            .await
            .map_err(map_user_repository_error)?;

        let skipped = followed.len().saturating_sub(channels.len());
        if skipped > 0 {
            debug!(user_id = %id, skipped, "followed channels no longer exist");
        }
        Ok(channels.iter().map(ChannelSummary::from).collect())
    }
}
