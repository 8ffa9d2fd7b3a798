/// Comment handlers - HTTP endpoints for comment operations
use crate::error::{FieldError, Result};
use crate::middleware::UserId;
use crate::models::Comment;
use crate::services::PostService;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// Request body for creating a comment
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCommentRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Text is required"))]
    pub text: String,
}

/// Add a comment to a post
#[utoipa::path(
    put,
    path = "/api/v1/posts/comment/{id}",
    tag = "engagement",
    request_body = CreateCommentRequest,
    params(("id" = String, Path, description = "Post ID")),
    security(("auth_token" = []), ("bearer_auth" = [])),
    responses(
        (status = 200, description = "Comments, newest first", body = [Comment]),
        (status = 400, description = "Text missing or empty", body = [FieldError]),
        (status = 404, description = "Post or caller profile not found")
    )
)]
pub async fn add_comment(
    service: web::Data<PostService>,
    user_id: UserId,
    post_id: web::Path<String>,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let comments = service.add_comment(user_id.0, &post_id, &req.text).await?;
    Ok(HttpResponse::Ok().json(comments))
}

/// Delete a comment
#[utoipa::path(
    delete,
    path = "/api/v1/posts/comment/{id}/{comment_id}",
    tag = "engagement",
    params(
        ("id" = String, Path, description = "Post ID"),
        ("comment_id" = String, Path, description = "Comment ID")
    ),
    security(("auth_token" = []), ("bearer_auth" = [])),
    responses(
        (status = 200, description = "Remaining comments", body = [Comment]),
        (status = 401, description = "Caller did not write the comment"),
        (status = 404, description = "Post or comment not found")
    )
)]
pub async fn delete_comment(
    service: web::Data<PostService>,
    user_id: UserId,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comments = service
        .delete_comment(user_id.0, &post_id, &comment_id)
        .await?;

    Ok(HttpResponse::Ok().json(comments))
}
