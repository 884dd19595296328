use std::fmt::Display;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ErrorBody;
use service::article::ArticleError;
use thiserror::Error;
use tracing::{error, warn};

/// JSON error response: `{"error": "<message>"}` with the given status.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub message: String,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    /// 500 with a fixed public message; the underlying cause only goes to the log.
    pub fn internal(public_msg: &str, cause: &dyn Display) -> Self {
        error!(error = %cause, public = public_msg, "request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, public_msg)
    }

    /// Map a failed create/update/delete.
    ///
    /// A missing id on these paths answers 400, matching the validation class;
    /// only `GET /api/articles/{id}` answers 404.
    pub fn from_article(e: ArticleError, failure_msg: &str) -> Self {
        match e {
            ArticleError::Validation(_) | ArticleError::NotFound(_) => Self::new(StatusCode::BAD_REQUEST, e.to_string()),
            ArticleError::Storage(_) => Self::internal(failure_msg, &e),
        }
    }
}

// 提取器失败统一返回 {"error": ...}，不暴露 serde 细节
impl From<JsonRejection> for JsonApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(status = %rejection.status(), reason = %rejection.body_text(), "rejected request body");
        Self::new(StatusCode::BAD_REQUEST, "invalid request body")
    }
}

impl From<QueryRejection> for JsonApiError {
    fn from(rejection: QueryRejection) -> Self {
        warn!(reason = %rejection.body_text(), "rejected query string");
        Self::new(StatusCode::BAD_REQUEST, "invalid query parameters")
    }
}

impl From<PathRejection> for JsonApiError {
    fn from(rejection: PathRejection) -> Self {
        warn!(reason = %rejection.body_text(), "rejected path parameter");
        Self::new(StatusCode::BAD_REQUEST, "invalid article id")
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody::new(self.message))).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use service::article::ValidationError;

    #[test]
    fn validation_and_not_found_are_bad_request() {
        let e = JsonApiError::from_article(ValidationError::TitleRequired.into(), "x");
        assert_eq!(e.status, StatusCode::BAD_REQUEST);
        assert_eq!(e.message, "title is required");

        let e = JsonApiError::from_article(ArticleError::NotFound(9), "x");
        assert_eq!(e.status, StatusCode::BAD_REQUEST);
        assert_eq!(e.message, "article not found");
    }

    #[test]
    fn storage_errors_hide_details() {
        let e = JsonApiError::from_article(ArticleError::Storage("connection refused 10.0.0.3".into()), "failed to update article");
        assert_eq!(e.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.message, "failed to update article");
    }
}
