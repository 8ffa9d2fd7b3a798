/// Error types for Post Service
///
/// Every failure a handler can produce is an `AppError`. Client-facing variants
/// render as JSON; anything originating in the backend is logged and collapsed
/// into an opaque plain-text 500.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Result type for post-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Body text for every 500 response
const SERVER_ERROR_BODY: &str = "Server Error";

/// A single problem reported back to the client in a 400 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub msg: String,
    /// Offending request field, absent for business-rule errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
}

impl FieldError {
    pub fn new(param: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            param: Some(param.into()),
        }
    }

    pub fn message(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            param: None,
        }
    }
}

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Request payload failed field validation
    #[error("Validation failed: {0:?}")]
    Validation(Vec<FieldError>),

    #[error("Post already liked")]
    AlreadyLiked,

    #[error("Post has not yet been liked")]
    NotLiked,

    /// No usable caller identity on the request
    #[error("{0}")]
    Unauthenticated(&'static str),

    /// Caller is authenticated but does not own the target
    #[error("User not authorized")]
    NotAuthorized,

    #[error("Post not found")]
    PostNotFound,

    #[error("Comment does not exist")]
    CommentNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    fn is_server_error(&self) -> bool {
        matches!(self, AppError::Database(_))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::AlreadyLiked | AppError::NotLiked => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthenticated(_) | AppError::NotAuthorized => StatusCode::UNAUTHORIZED,
            AppError::PostNotFound | AppError::CommentNotFound | AppError::UserNotFound => {
                StatusCode::NOT_FOUND
            }
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        if self.is_server_error() {
            tracing::error!(error = %self, "request failed with unhandled error");
            return HttpResponse::build(status)
                .content_type("text/plain; charset=utf-8")
                .body(SERVER_ERROR_BODY);
        }

        match self {
            AppError::Validation(errors) => {
                HttpResponse::build(status).json(serde_json::json!({ "errors": errors }))
            }
            AppError::AlreadyLiked | AppError::NotLiked => {
                HttpResponse::build(status).json(serde_json::json!({
                    "errors": [FieldError::message(self.to_string())],
                }))
            }
            _ => HttpResponse::build(status).json(serde_json::json!({ "msg": self.to_string() })),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = field.to_string();
                errs.iter().map(move |err| {
                    let msg = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", err.code));
                    FieldError::new(field.clone(), msg)
                })
            })
            .collect();

        fields.sort_by(|a, b| a.param.cmp(&b.param));
        AppError::Validation(fields)
    }
}
