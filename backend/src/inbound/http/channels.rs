//! Channel subscription and profile HTTP handlers.
//!
//! ```text
//! PUT /api/v1/users/subscribe/{userId}
//! PUT /api/v1/users/unsubscribe/{userId}
//! GET /api/v1/users/subscribed-channels/{userId}
//! GET /api/v1/users/{userId}
//! ```

use actix_web::{get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{ChannelProfile, ChannelSummary, SubscriptionRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{USER_ID, parse_user_id};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeResponse {
    #[schema(example = "Subscribed")]
    pub message: String,
    pub subscribers: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnsubscribeResponse {
    #[schema(example = "Unsubscribed successfully")]
    pub subscribed_status: String,
    pub subscribers: u64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscribedChannelsResponse {
    pub subscribed_channels: Vec<ChannelSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChannelProfileResponse {
    pub user: ChannelProfile,
}

fn subscription_request(
    channel: &str,
    caller: &AuthenticatedUser,
) -> ApiResult<SubscriptionRequest> {
    Ok(SubscriptionRequest {
        subscriber: caller.user_id(),
        channel: parse_user_id(channel, USER_ID)?,
    })
}

/// Subscribe the caller to a channel.
#[utoipa::path(
    put,
    path = "/api/v1/users/subscribe/{userId}",
    params(("userId" = String, Path, description = "Channel owner to subscribe to")),
    responses(
        (status = 200, description = "Subscribed", body = SubscribeResponse),
        (status = 400, description = "Malformed id or self-subscription", body = ErrorSchema),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorSchema),
        (status = 404, description = "Channel or caller not found", body = ErrorSchema),
        (status = 409, description = "Already a subscriber", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    security(("bearer" = [])),
    tags = ["users"],
    operation_id = "subscribe"
)]
#[put("/users/subscribe/{user_id}")]
pub async fn subscribe(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<SubscribeResponse>> {
    let request = subscription_request(&path, &caller)?;
    let response = state.subscriptions.subscribe(request).await?;
    Ok(web::Json(SubscribeResponse {
        message: response.status.label().to_owned(),
        subscribers: response.channel_subscribers,
    }))
}

/// Unsubscribe the caller from a channel.
///
/// Targeting one's own channel only removes a stale self entry from the
/// caller's followed channels.
#[utoipa::path(
    put,
    path = "/api/v1/users/unsubscribe/{userId}",
    params(("userId" = String, Path, description = "Channel owner to unsubscribe from")),
    responses(
        (status = 200, description = "Unsubscribed", body = UnsubscribeResponse),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorSchema),
        (status = 404, description = "Channel or caller not found", body = ErrorSchema),
        (status = 409, description = "Not a subscriber", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    security(("bearer" = [])),
    tags = ["users"],
    operation_id = "unsubscribe"
)]
#[put("/users/unsubscribe/{user_id}")]
pub async fn unsubscribe(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<UnsubscribeResponse>> {
    let request = subscription_request(&path, &caller)?;
    let response = state.subscriptions.unsubscribe(request).await?;
    Ok(web::Json(UnsubscribeResponse {
        subscribed_status: response.status.label().to_owned(),
        subscribers: response.channel_subscribers,
    }))
}

/// List the channels a user follows.
#[utoipa::path(
    get,
    path = "/api/v1/users/subscribed-channels/{userId}",
    params(("userId" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Followed channels", body = SubscribedChannelsResponse),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    security([]),
    tags = ["users"],
    operation_id = "listSubscribedChannels"
)]
#[get("/users/subscribed-channels/{user_id}")]
pub async fn subscribed_channels(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<SubscribedChannelsResponse>> {
    let user_id = parse_user_id(&path, USER_ID)?;
    let subscribed_channels = state.channels.list_subscribed_channels(user_id).await?;
    Ok(web::Json(SubscribedChannelsResponse {
        subscribed_channels,
    }))
}

/// Fetch a channel profile.
#[utoipa::path(
    get,
    path = "/api/v1/users/{userId}",
    params(("userId" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Channel profile", body = ChannelProfileResponse),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    security([]),
    tags = ["users"],
    operation_id = "getChannel"
)]
#[get("/users/{user_id}")]
pub async fn get_channel(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ChannelProfileResponse>> {
    let user_id = parse_user_id(&path, USER_ID)?;
    let user = state.channels.get_channel(user_id).await?;
    Ok(web::Json(ChannelProfileResponse { user }))
}

#[cfg(test)]
#[path = "channels_tests.rs"]
mod tests;
