/// Like handlers
use crate::error::{FieldError, Result};
use crate::middleware::UserId;
use crate::models::Like;
use crate::services::PostService;
use actix_web::{web, HttpResponse};

/// Like a post
#[utoipa::path(
    put,
    path = "/api/v1/posts/like/{id}",
    tag = "engagement",
    params(("id" = String, Path, description = "Post ID")),
    security(("auth_token" = []), ("bearer_auth" = [])),
    responses(
        (status = 200, description = "Likes after the change, newest first", body = [Like]),
        (status = 400, description = "Post already liked", body = [FieldError]),
        (status = 404, description = "Post not found")
    )
)]
pub async fn like_post(
    service: web::Data<PostService>,
    user_id: UserId,
    post_id: web::Path<String>,
) -> Result<HttpResponse> {
    let likes = service.toggle_like(user_id.0, &post_id, true).await?;
    Ok(HttpResponse::Ok().json(likes))
}

/// Withdraw the caller's like
#[utoipa::path(
    put,
    path = "/api/v1/posts/unlike/{id}",
    tag = "engagement",
    params(("id" = String, Path, description = "Post ID")),
    security(("auth_token" = []), ("bearer_auth" = [])),
    responses(
        (status = 200, description = "Likes after the change", body = [Like]),
        (status = 400, description = "Post has not yet been liked", body = [FieldError]),
        (status = 404, description = "Post not found")
    )
)]
pub async fn unlike_post(
    service: web::Data<PostService>,
    user_id: UserId,
    post_id: web::Path<String>,
) -> Result<HttpResponse> {
    let likes = service.toggle_like(user_id.0, &post_id, false).await?;
    Ok(HttpResponse::Ok().json(likes))
}
