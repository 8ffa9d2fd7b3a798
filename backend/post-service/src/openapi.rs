/// OpenAPI documentation for Post Service
use crate::error::FieldError;
use crate::handlers::comments::CreateCommentRequest;
use crate::handlers::posts::CreatePostRequest;
use crate::models::{Comment, Like, Post};
use crate::middleware::AUTH_TOKEN_HEADER;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Post Service API",
        version = "1.0.0",
        description = "Text posts with likes and comments. Every /api/v1/posts route requires a JWT, sent as x-auth-token or as a Bearer token.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8085", description = "Development server"),
    ),
    paths(
        crate::handlers::posts::create_post,
        crate::handlers::posts::list_posts,
        crate::handlers::posts::get_post,
        crate::handlers::posts::delete_post,
        crate::handlers::likes::like_post,
        crate::handlers::likes::unlike_post,
        crate::handlers::comments::add_comment,
        crate::handlers::comments::delete_comment,
    ),
    tags(
        (name = "posts", description = "Post creation, listing, retrieval and deletion"),
        (name = "engagement", description = "Likes and comments on posts"),
    ),
    components(
        schemas(Post, Like, Comment, CreatePostRequest, CreateCommentRequest, FieldError)
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
            components.add_security_scheme(
                "auth_token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(AUTH_TOKEN_HEADER))),
            );
        }
    }
}

impl ApiDoc {
    pub fn openapi_json_path() -> &'static str {
        "/api/v1/openapi.json"
    }

    /// Swagger UI at `/swagger-ui/`; also serves the document at `openapi_json_path`.
    pub fn swagger_ui() -> SwaggerUi {
        SwaggerUi::new("/swagger-ui/{_:.*}").url(Self::openapi_json_path(), Self::openapi())
    }
}
