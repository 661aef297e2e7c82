//! Channel subscription service.
//!
//! A subscription is recorded on two aggregates. The channel's
//! `subscribed_by` is written first and is authoritative; the subscriber's
//! `subscribed_channels` is a derived index written second. When the second
//! write fails the relation is left detectably inconsistent and the error is
//! logged with a reconciliation hint; [`SubscriptionMaintenance`] repairs it.
//!
//! [`SubscriptionMaintenance`]: crate::domain::ports::SubscriptionMaintenance

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{error, info};

use crate::domain::ports::{
    SubscriptionCommand, SubscriptionRequest, SubscriptionResponse, SubscriptionStatus,
    UserRepository, UserRepositoryError,
};
use crate::domain::repository_error_mapping::{
    map_subscription_error, map_user_repository_error,
};
use crate::domain::{ChannelMutation, ChannelMutationOutcome, Error, SubscriptionError, UserId};

pub(crate) fn user_not_found(id: UserId) -> Error {
    Error::not_found("User not found").with_details(json!({ "userId": id }))
}

/// Subscription service backed by a user repository.
#[derive(Clone)]
pub struct SubscriptionService<U> {
    users: Arc<U>,
}

impl<U> SubscriptionService<U> {
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

impl<U> SubscriptionService<U>
where
    U: UserRepository,
{
    async fn apply(
        &self,
        id: UserId,
        mutation: ChannelMutation,
    ) -> Result<ChannelMutationOutcome, Error> {
        self.users
            .apply(&id, mutation)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| user_not_found(id))
    }

    async fn ensure_exists(&self, id: UserId) -> Result<(), Error> {
        self.users
            .find_by_id(&id)
            .await
            .map_err(map_user_repository_error)?
            .map(|_| ())
            .ok_or_else(|| user_not_found(id))
    }

    /// Write the derived side after the authoritative side has committed.
    async fn apply_derived(
        &self,
        request: SubscriptionRequest,
        mutation: ChannelMutation,
    ) -> Result<(), Error> {
        let result = self.users.apply(&request.subscriber, mutation).await;
        let failure = match result {
            Ok(Some(_)) => return Ok(()),
            Ok(None) => UserRepositoryError::query("subscriber vanished mid-update"),
            Err(err) => err,
        };
        error!(
            subscriber = %request.subscriber,
            channel = %request.channel,
            ?mutation,
            error = %failure,
            "subscription half-applied; run reconcile-subscriptions to repair subscribed channels"
        );
        Err(map_user_repository_error(failure))
    }
}

#[async_trait]
impl<U> SubscriptionCommand for SubscriptionService<U>
where
    U: UserRepository,
{
    async fn subscribe(&self, request: SubscriptionRequest) -> Result<SubscriptionResponse, Error> {
        let SubscriptionRequest {
            subscriber,
            channel,
        } = request;
        if subscriber == channel {
            return Err(map_subscription_error(SubscriptionError::SelfSubscription));
        }
        self.ensure_exists(subscriber).await?;

        let channel_outcome = self
            .apply(channel, ChannelMutation::AddSubscriber(subscriber))
            .await?;
        self.apply_derived(request, ChannelMutation::FollowChannel(channel))
            .await?;

        let status = SubscriptionStatus::Subscribed;
        let channel_subscribers = channel_outcome.user.subscribers();
        info!(
            %subscriber,
            %channel,
            status = status.label(),
            subscribers = channel_subscribers,
            "subscription recorded"
        );
        Ok(SubscriptionResponse {
            status,
            channel_subscribers,
        })
    }

    async fn unsubscribe(
        &self,
        request: SubscriptionRequest,
    ) -> Result<SubscriptionResponse, Error> {
        let SubscriptionRequest {
            subscriber,
            channel,
        } = request;

        if subscriber == channel {
            let outcome = self
                .apply(subscriber, ChannelMutation::UnfollowChannel(channel))
                .await?;
            let status = SubscriptionStatus::SelfSubscriptionRemoved;
            info!(%subscriber, status = status.label(), "self subscription cleared");
            return Ok(SubscriptionResponse {
                status,
                channel_subscribers: outcome.user.subscribers(),
            });
        }

        self.ensure_exists(subscriber).await?;
        let channel_outcome = self
            .apply(channel, ChannelMutation::RemoveSubscriber(subscriber))
            .await?;
        self.apply_derived(request, ChannelMutation::UnfollowChannel(channel))
            .await?;

        let status = SubscriptionStatus::Unsubscribed;
        let channel_subscribers = channel_outcome.user.subscribers();
        info!(
            %subscriber,
            %channel,
            status = status.label(),
            subscribers = channel_subscribers,
            "subscription removed"
        );
        Ok(SubscriptionResponse {
            status,
            channel_subscribers,
        })
    }
}

#[cfg(test)]
#[path = "subscription_service_tests.rs"]
mod tests;
