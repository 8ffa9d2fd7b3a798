/// HTTP handlers for post-related endpoints
///
/// - Posts: create, list, fetch, delete
/// - Likes: like / unlike
/// - Comments: add / delete
///
/// All of them expect `JwtAuthMiddleware` to have resolved the caller.
pub mod comments;
pub mod likes;
pub mod posts;

pub use comments::{add_comment, delete_comment};
pub use likes::{like_post, unlike_post};
pub use posts::{create_post, delete_post, get_post, list_posts};

use crate::error::{AppError, FieldError};
use actix_web::web;

/// JSON extractor settings: malformed bodies become field-level 400s.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| {
            AppError::Validation(vec![FieldError::new("body", err.to_string())]).into()
        })
}

/// Mount the post routes (relative to the enclosing scope).
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).service(
        web::scope("/posts")
            .service(
                web::resource("")
                    .route(web::post().to(create_post))
                    .route(web::get().to(list_posts)),
            )
            .route("/like/{id}", web::put().to(like_post))
            .route("/unlike/{id}", web::put().to(unlike_post))
            .route("/comment/{id}", web::put().to(add_comment))
            .route(
                "/comment/{id}/{comment_id}",
                web::delete().to(delete_comment),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_post))
                    .route(web::delete().to(delete_post)),
            ),
    );
}
