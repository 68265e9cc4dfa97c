//! API 错误类型。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hackide_api_types::ErrorResponse;
use hackide_core::domain::DomainError;
use tracing::error;

/// API 错误，序列化为 `ErrorResponse`。
#[derive(Debug)]
pub struct ApiError {
    pub message: String,
    pub code: String,
    pub status: StatusCode,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.to_string(),
            status,
        }
    }

    pub fn bad_request(code: &str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message)
    }

    pub fn not_found(code: &str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, code, message)
    }

    pub fn forbidden(code: &str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, code, message)
    }

    pub fn conflict(code: &str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, code, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", message)
    }

    pub fn contest_not_found() -> Self {
        Self::not_found("CONTEST_NOT_FOUND", "Contest not found")
    }

    pub fn problem_not_found() -> Self {
        Self::not_found("PROBLEM_NOT_FOUND", "Problem not found")
    }

    pub fn final_already_submitted() -> Self {
        Self::conflict(
            "FINAL_ALREADY_SUBMITTED",
            "Final submission already made for this contest",
        )
    }

    pub fn premium_required() -> Self {
        Self::new(
            StatusCode::PAYMENT_REQUIRED,
            "PREMIUM_REQUIRED",
            "Premium problems require an active subscription.",
        )
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        error!(error = %err, "request failed");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "Internal server error",
        )
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let code = match err {
            DomainError::UnsupportedLanguage(_) => "UNSUPPORTED_LANGUAGE",
            DomainError::InvalidPlanTier(_) => "INVALID_PLAN",
            DomainError::EmptyUsername
            | DomainError::UsernameTooLong(_)
            | DomainError::InvalidUsernameCharacter(_) => "INVALID_USERNAME",
            _ => "VALIDATION_ERROR",
        };
        Self::bad_request(code, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            code: self.code,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}
