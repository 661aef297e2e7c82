//! HTTP inbound adapter exposing the REST endpoints.

use actix_web::web;

pub mod channels;
pub mod error;
pub mod health;
pub mod identity;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub(crate) mod validation;
pub mod videos;

pub use error::ApiResult;

/// Register every `/api/v1` handler on `cfg`.
///
/// Fixed-segment routes are registered before their `{id}` siblings.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(videos::toggle_like)
        .service(videos::toggle_dislike)
        .service(videos::register_view)
        .service(videos::list_videos)
        .service(videos::list_videos_by_owner)
        .service(videos::get_video)
        .service(videos::delete_video)
        .service(channels::subscribe)
        .service(channels::unsubscribe)
        .service(channels::subscribed_channels)
        .service(channels::get_channel);
}
