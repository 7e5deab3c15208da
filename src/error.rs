use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use validator::ValidationErrors;

use crate::bluesky::BlueskyError;

#[derive(Debug)]
pub enum AppError {
    Unauthorized(String),
    UnprocessableEntity(String),
    BadGateway(String),
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::UnprocessableEntity(errors.to_string())
    }
}

/// Malformed or non-JSON bodies get the same shape as validation failures.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::UnprocessableEntity(rejection.body_text())
    }
}

/// Only login failures reach the HTTP edge; search and follow errors are
/// reported as data inside successful responses.
impl From<BlueskyError> for AppError {
    fn from(err: BlueskyError) -> Self {
        match err {
            BlueskyError::Authentication(msg) => AppError::Unauthorized(msg),
            other => AppError::BadGateway(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
        };

        let body = Json(json!({
            "success": false,
            "message": error_message,
        }));

        (status, body).into_response()
    }
}
