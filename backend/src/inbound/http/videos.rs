//! Video engagement and catalogue HTTP handlers.
//!
//! ```text
//! PUT    /api/v1/videos/like/{videoId}
//! PUT    /api/v1/videos/dislike/{videoId}
//! PUT    /api/v1/videos/views/{videoId}
//! GET    /api/v1/videos
//! GET    /api/v1/videos/{videoId}
//! GET    /api/v1/videos/user/{userId}
//! DELETE /api/v1/videos/{videoId}
//! ```

use actix_web::{delete, get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{
    DeleteVideoRequest, EngagementRequest, EngagementResponse, VideoView, VideoWithOwner,
};
use crate::domain::{UserId, VideoId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{USER_ID, parse_user_id, parse_video_id};

/// Counters returned alongside every engagement status.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EngagementCounts {
    pub likes: u64,
    pub dislikes: u64,
    pub views: u64,
}

impl From<&EngagementResponse> for EngagementCounts {
    fn from(value: &EngagementResponse) -> Self {
        Self {
            likes: value.likes,
            dislikes: value.dislikes,
            views: value.views,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikeStatusResponse {
    #[schema(example = "liked")]
    pub like_status: String,
    #[serde(flatten)]
    pub counts: EngagementCounts,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DislikeStatusResponse {
    #[schema(example = "dislike removed")]
    pub dislike_status: String,
    #[serde(flatten)]
    pub counts: EngagementCounts,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ViewStatusResponse {
    #[schema(example = "View Increased")]
    pub view_status: String,
    #[serde(flatten)]
    pub counts: EngagementCounts,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VideoListResponse {
    pub videos: Vec<VideoView>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VideoResponse {
    pub video: VideoWithOwner,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedVideoResponse {
    #[schema(value_type = String)]
    pub deleted_video_id: VideoId,
}

fn engagement_request(video_id: &str, caller: &AuthenticatedUser) -> ApiResult<EngagementRequest> {
    Ok(EngagementRequest {
        video_id: parse_video_id(video_id)?,
        actor: caller.user_id(),
    })
}

/// Toggle the caller's like on a video.
#[utoipa::path(
    put,
    path = "/api/v1/videos/like/{videoId}",
    params(("videoId" = String, Path, description = "Video identifier")),
    responses(
        (status = 200, description = "Like toggled", body = LikeStatusResponse),
        (status = 400, description = "Malformed video id", body = ErrorSchema),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorSchema),
        (status = 404, description = "Video not found", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    security(("bearer" = [])),
    tags = ["videos"],
    operation_id = "toggleLike"
)]
#[put("/videos/like/{video_id}")]
pub async fn toggle_like(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<LikeStatusResponse>> {
    let request = engagement_request(&path, &caller)?;
    let response = state.engagement.toggle_like(request).await?;
    Ok(web::Json(LikeStatusResponse {
        like_status: response.status.label().to_owned(),
        counts: EngagementCounts::from(&response),
    }))
}

/// Toggle the caller's dislike on a video.
#[utoipa::path(
    put,
    path = "/api/v1/videos/dislike/{videoId}",
    params(("videoId" = String, Path, description = "Video identifier")),
    responses(
        (status = 200, description = "Dislike toggled", body = DislikeStatusResponse),
        (status = 400, description = "Malformed video id", body = ErrorSchema),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorSchema),
        (status = 404, description = "Video not found", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    security(("bearer" = [])),
    tags = ["videos"],
    operation_id = "toggleDislike"
)]
#[put("/videos/dislike/{video_id}")]
pub async fn toggle_dislike(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<DislikeStatusResponse>> {
    let request = engagement_request(&path, &caller)?;
    let response = state.engagement.toggle_dislike(request).await?;
    Ok(web::Json(DislikeStatusResponse {
        dislike_status: response.status.label().to_owned(),
        counts: EngagementCounts::from(&response),
    }))
}

/// Count the caller's view of a video once.
#[utoipa::path(
    put,
    path = "/api/v1/videos/views/{videoId}",
    params(("videoId" = String, Path, description = "Video identifier")),
    responses(
        (
            status = 200,
            description = "View registered or already counted",
            body = ViewStatusResponse
        ),
        (status = 400, description = "Malformed video id", body = ErrorSchema),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorSchema),
        (status = 404, description = "Video not found", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    security(("bearer" = [])),
    tags = ["videos"],
    operation_id = "registerView"
)]
#[put("/videos/views/{video_id}")]
pub async fn register_view(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<ViewStatusResponse>> {
    let request = engagement_request(&path, &caller)?;
    let response = state.engagement.register_view(request).await?;
    Ok(web::Json(ViewStatusResponse {
        view_status: response.status.label().to_owned(),
        counts: EngagementCounts::from(&response),
    }))
}

/// List every published video, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/videos",
    responses(
        (status = 200, description = "All videos", body = VideoListResponse),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    security([]),
    tags = ["videos"],
    operation_id = "listVideos"
)]
#[get("/videos")]
pub async fn list_videos(state: web::Data<HttpState>) -> ApiResult<web::Json<VideoListResponse>> {
    let videos = state.catalogue_query.list_videos().await?;
    Ok(web::Json(VideoListResponse { videos }))
}

/// Fetch one video with its owner's channel summary.
#[utoipa::path(
    get,
    path = "/api/v1/videos/{videoId}",
    params(("videoId" = String, Path, description = "Video identifier")),
    responses(
        (status = 200, description = "Video", body = VideoResponse),
        (status = 400, description = "Malformed video id", body = ErrorSchema),
        (status = 404, description = "Video not found", body = ErrorSchema)
    ),
    security([]),
    tags = ["videos"],
    operation_id = "getVideo"
)]
#[get("/videos/{video_id}")]
pub async fn get_video(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<VideoResponse>> {
    let video_id = parse_video_id(&path)?;
    let video = state.catalogue_query.get_video(video_id).await?;
    Ok(web::Json(VideoResponse { video }))
}

/// List the videos published by one channel.
#[utoipa::path(
    get,
    path = "/api/v1/videos/user/{userId}",
    params(("userId" = String, Path, description = "Owning user identifier")),
    responses(
        (status = 200, description = "Owner's videos", body = VideoListResponse),
        (status = 400, description = "Malformed user id", body = ErrorSchema)
    ),
    security([]),
    tags = ["videos"],
    operation_id = "listVideosByOwner"
)]
#[get("/videos/user/{user_id}")]
pub async fn list_videos_by_owner(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<VideoListResponse>> {
    let owner: UserId = parse_user_id(&path, USER_ID)?;
    let videos = state.catalogue_query.list_videos_by_owner(owner).await?;
    Ok(web::Json(VideoListResponse { videos }))
}

/// Delete a video and its media assets. Only the owner may do this.
#[utoipa::path(
    delete,
    path = "/api/v1/videos/{videoId}",
    params(("videoId" = String, Path, description = "Video identifier")),
    responses(
        (status = 200, description = "Video deleted", body = DeletedVideoResponse),
        (status = 400, description = "Malformed video id", body = ErrorSchema),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorSchema),
        (status = 403, description = "Caller does not own the video", body = ErrorSchema),
        (status = 404, description = "Video not found", body = ErrorSchema)
    ),
    security(("bearer" = [])),
    tags = ["videos"],
    operation_id = "deleteVideo"
)]
#[delete("/videos/{video_id}")]
pub async fn delete_video(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeletedVideoResponse>> {
    let video_id = parse_video_id(&path)?;
    state
        .catalogue
        .delete_video(DeleteVideoRequest {
            video_id,
            actor: caller.user_id(),
        })
        .await?;
    Ok(web::Json(DeletedVideoResponse {
        deleted_video_id: video_id,
    }))
}

#[cfg(test)]
#[path = "videos_tests.rs"]
mod tests;
