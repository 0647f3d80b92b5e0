use crate::api::schemas::{ErrorDetail, ErrorResponse, SuccessResponse};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Photo/Video Backend API",
        version = "1.0.0",
        description = "Self-hosted, multi-tenant photo and video management backend: asset ingest/retrieval, albums, tags, memories, stacks, partner sharing, shared links, activity, and the device sync protocol.",
        contact(
            name = "API Support",
            email = "support@example.com"
        )
    ),
    components(
        schemas(
            SuccessResponse<()>,
            ErrorResponse,
            ErrorDetail,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Login, session, and API key endpoints"),
        (name = "assets", description = "Asset ingest and retrieval endpoints"),
        (name = "sync", description = "Device sync protocol endpoints"),
        (name = "timeline", description = "Timeline and folder view endpoints"),
        (name = "trash", description = "Soft-delete, restore, and purge endpoints"),
        (name = "albums", description = "Album and album membership endpoints"),
        (name = "tags", description = "Tag endpoints"),
        (name = "memories", description = "Memory endpoints"),
        (name = "stacks", description = "Asset stack endpoints"),
        (name = "partners", description = "Partner sharing endpoints"),
        (name = "shared_links", description = "Public shared link endpoints"),
        (name = "activity", description = "Album comment/like endpoints"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "BearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Enter your session access token"))
                        .build(),
                ),
            )
        }
    }
}
