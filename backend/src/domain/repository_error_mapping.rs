//! Translation of driven-port failures into domain errors.

use serde_json::json;

use crate::domain::ports::{MediaStorageError, UserRepositoryError, VideoRepositoryError};
use crate::domain::{Error, SubscriptionError};

pub(crate) fn map_video_repository_error(error: VideoRepositoryError) -> Error {
    match error {
        VideoRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("video repository unavailable: {message}"))
        }
        VideoRepositoryError::Query { message } => {
            Error::internal(format!("video repository error: {message}"))
        }
    }
}

pub(crate) fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::Rejected { reason } => map_subscription_error(reason),
    }
}

pub(crate) fn map_subscription_error(reason: SubscriptionError) -> Error {
    let code = match reason {
        SubscriptionError::SelfSubscription => "self_subscription",
        SubscriptionError::AlreadySubscribed => "already_subscribed",
        SubscriptionError::NotSubscribed => "not_subscribed",
    };
    let error = match reason {
        SubscriptionError::SelfSubscription => Error::invalid_request(reason.to_string()),
        SubscriptionError::AlreadySubscribed | SubscriptionError::NotSubscribed => {
            Error::conflict(reason.to_string())
        }
    };
    error.with_details(json!({ "code": code }))
}

pub(crate) fn map_media_storage_error(error: MediaStorageError) -> Error {
    match error {
        MediaStorageError::Unavailable { message } => {
            Error::service_unavailable(format!("media storage unavailable: {message}"))
        }
        MediaStorageError::Write { message } => {
            Error::internal(format!("media storage error: {message}"))
        }
    }
}
