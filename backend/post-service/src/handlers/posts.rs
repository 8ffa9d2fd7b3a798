/// Post handlers - HTTP endpoints for post operations
use crate::error::{FieldError, Result};
use crate::middleware::UserId;
use crate::models::Post;
use crate::services::PostService;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePostRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Text is required"))]
    pub text: String,
}

/// Create a new post
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    tag = "posts",
    request_body = CreatePostRequest,
    security(("auth_token" = []), ("bearer_auth" = [])),
    responses(
        (status = 200, description = "Post created", body = Post),
        (status = 400, description = "Text missing or empty", body = [FieldError]),
        (status = 404, description = "Caller has no user profile")
    )
)]
pub async fn create_post(
    service: web::Data<PostService>,
    user_id: UserId,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let post = service.create_post(user_id.0, &req.text).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// List every post, newest first
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    tag = "posts",
    security(("auth_token" = []), ("bearer_auth" = [])),
    responses(
        (status = 200, description = "All posts, newest first", body = [Post])
    )
)]
pub async fn list_posts(service: web::Data<PostService>) -> Result<HttpResponse> {
    let posts = service.list_posts().await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// Get a post by ID
#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}",
    tag = "posts",
    params(("id" = String, Path, description = "Post ID")),
    security(("auth_token" = []), ("bearer_auth" = [])),
    responses(
        (status = 200, description = "Post found", body = Post),
        (status = 404, description = "Post not found")
    )
)]
pub async fn get_post(
    service: web::Data<PostService>,
    post_id: web::Path<String>,
) -> Result<HttpResponse> {
    let post = service.get_post(&post_id).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// Delete a post
#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}",
    tag = "posts",
    params(("id" = String, Path, description = "Post ID")),
    security(("auth_token" = []), ("bearer_auth" = [])),
    responses(
        (status = 200, description = "Post removed"),
        (status = 401, description = "Caller does not own the post"),
        (status = 404, description = "Post not found")
    )
)]
pub async fn delete_post(
    service: web::Data<PostService>,
    user_id: UserId,
    post_id: web::Path<String>,
) -> Result<HttpResponse> {
    service.delete_post(user_id.0, &post_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "msg": "Post removed" })))
}
