//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api/v1` handler, the health probes, the
//! error payload mirrors from [`crate::inbound::http::schemas`], and the
//! bearer security scheme. Swagger UI serves it in debug builds and
//! `openapi-dump` prints it for external tooling.

use crate::inbound::http::channels::{
    ChannelProfileResponse, SubscribeResponse, SubscribedChannelsResponse, UnsubscribeResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::videos::{
    DeletedVideoResponse, DislikeStatusResponse, LikeStatusResponse, VideoListResponse,
    VideoResponse, ViewStatusResponse,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("HS256 token issued by the account service."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Vidshare engagement API",
        description = "Video reactions, views, channel subscriptions, and catalogue reads."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::videos::toggle_like,
        crate::inbound::http::videos::toggle_dislike,
        crate::inbound::http::videos::register_view,
        crate::inbound::http::videos::list_videos,
        crate::inbound::http::videos::get_video,
        crate::inbound::http::videos::list_videos_by_owner,
        crate::inbound::http::videos::delete_video,
        crate::inbound::http::channels::subscribe,
        crate::inbound::http::channels::unsubscribe,
        crate::inbound::http::channels::subscribed_channels,
        crate::inbound::http::channels::get_channel,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        LikeStatusResponse,
        DislikeStatusResponse,
        ViewStatusResponse,
        VideoListResponse,
        VideoResponse,
        DeletedVideoResponse,
        SubscribeResponse,
        UnsubscribeResponse,
        SubscribedChannelsResponse,
        ChannelProfileResponse,
    )),
    tags(
        (name = "videos", description = "Video engagement and catalogue"),
        (name = "users", description = "Channel subscriptions and profiles"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated OpenAPI document.

    use super::*;
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    fn error_schema_uses_camel_case_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get("Error").expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
        assert_object_schema_has_field(error_schema, "traceId");
    }

    #[rstest]
    #[case("/api/v1/videos/like/{videoId}")]
    #[case("/api/v1/videos/{videoId}")]
    #[case("/api/v1/users/subscribe/{userId}")]
    #[case("/api/v1/users/subscribed-channels/{userId}")]
    #[case("/health/ready")]
    fn document_lists_route(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer"));
    }
}
