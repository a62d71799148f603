//! HTTP error mapping.
//!
//! Every handler returns `Result<_, ApiError>`. The body is always
//! `{ "code": ..., "message": ..., "details": {...} }` with `code` taken from
//! `ErrorCode::as_str`.

use std::collections::HashMap;
use std::str::FromStr;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// JSON error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub details: HashMap<String, String>,
}

/// Converts domain errors into HTTP responses.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl ApiError {
    pub fn bad_request(field: &str, message: impl Into<String>) -> Self {
        Self(DomainError::validation(field, message))
    }

    pub fn status(&self) -> StatusCode {
        status_for(self.0.code)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

pub fn status_for(code: ErrorCode) -> StatusCode {
    use ErrorCode::*;
    match code {
        ValidationFailed | OtpInvalidCode => StatusCode::BAD_REQUEST,
        Unauthorized => StatusCode::UNAUTHORIZED,
        Forbidden | AccountSuspended => StatusCode::FORBIDDEN,
        UserNotFound | CardNotFound | ShopNotFound | DiscountRuleNotFound | TransactionNotFound
        | OtpSessionNotFound | BannerNotFound | BlogPostNotFound | FaqNotFound => StatusCode::NOT_FOUND,
        InvalidStateTransition | PhoneAlreadyRegistered | CardAlreadyIssued | SlugTaken
        | OtpAlreadyVerified | ConcurrentModification => StatusCode::CONFLICT,
        OtpExpired => StatusCode::GONE,
        CardNotUsable | ShopNotAcceptingCards => StatusCode::UNPROCESSABLE_ENTITY,
        OtpTooManyAttempts | OtpResendCooldown | OtpResendLimit | RateLimited => {
            StatusCode::TOO_MANY_REQUESTS
        }
        ExternalServiceError => StatusCode::BAD_GATEWAY,
        DatabaseError | InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let err = self.0;

        // Internal details stay in the log.
        let (message, details) = if status.is_server_error() {
            tracing::error!(code = %err.code, message = %err.message, "Request failed");
            ("Internal server error".to_string(), HashMap::new())
        } else {
            (err.message, err.details)
        };

        let body = ErrorResponse {
            code: err.code.as_str().to_string(),
            message,
            details,
        };
        (status, Json(body)).into_response()
    }
}

/// Parses a path segment, reporting a bad id as a validation error on `field`.
pub fn parse_id<T: FromStr>(field: &str, raw: &str) -> Result<T, ApiError> {
    raw.parse::<T>()
        .map_err(|_| ApiError::bad_request(field, format!("Invalid {}", field)))
}
