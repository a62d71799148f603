//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i64, max: i64, actual: i64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::EmptyField { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,

    // Not found errors
    UserNotFound,
    CardNotFound,
    ShopNotFound,
    DiscountRuleNotFound,
    TransactionNotFound,
    OtpSessionNotFound,
    BannerNotFound,
    BlogPostNotFound,
    FaqNotFound,

    // Conflict / state errors
    InvalidStateTransition,
    PhoneAlreadyRegistered,
    CardAlreadyIssued,
    CardNotUsable,
    ShopNotAcceptingCards,
    SlugTaken,
    ConcurrentModification,

    // OTP errors
    OtpExpired,
    OtpInvalidCode,
    OtpTooManyAttempts,
    OtpAlreadyVerified,
    OtpResendCooldown,
    OtpResendLimit,
    RateLimited,

    // Authorization errors
    Unauthorized,
    Forbidden,
    AccountSuspended,

    // Infrastructure errors
    DatabaseError,
    ExternalServiceError,
    InternalError,
}

impl ErrorCode {
    /// Stable wire representation of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::UserNotFound => "USER_NOT_FOUND",
            ErrorCode::CardNotFound => "CARD_NOT_FOUND",
            ErrorCode::ShopNotFound => "SHOP_NOT_FOUND",
            ErrorCode::DiscountRuleNotFound => "DISCOUNT_RULE_NOT_FOUND",
            ErrorCode::TransactionNotFound => "TRANSACTION_NOT_FOUND",
            ErrorCode::OtpSessionNotFound => "OTP_SESSION_NOT_FOUND",
            ErrorCode::BannerNotFound => "BANNER_NOT_FOUND",
            ErrorCode::BlogPostNotFound => "BLOG_POST_NOT_FOUND",
            ErrorCode::FaqNotFound => "FAQ_NOT_FOUND",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::PhoneAlreadyRegistered => "PHONE_ALREADY_REGISTERED",
            ErrorCode::CardAlreadyIssued => "CARD_ALREADY_ISSUED",
            ErrorCode::CardNotUsable => "CARD_NOT_USABLE",
            ErrorCode::ShopNotAcceptingCards => "SHOP_NOT_ACCEPTING_CARDS",
            ErrorCode::SlugTaken => "SLUG_TAKEN",
            ErrorCode::ConcurrentModification => "CONCURRENT_MODIFICATION",
            ErrorCode::OtpExpired => "OTP_EXPIRED",
            ErrorCode::OtpInvalidCode => "OTP_INVALID_CODE",
            ErrorCode::OtpTooManyAttempts => "OTP_TOO_MANY_ATTEMPTS",
            ErrorCode::OtpAlreadyVerified => "OTP_ALREADY_VERIFIED",
            ErrorCode::OtpResendCooldown => "OTP_RESEND_COOLDOWN",
            ErrorCode::OtpResendLimit => "OTP_RESEND_LIMIT",
            ErrorCode::RateLimited => "RATE_LIMITED",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::AccountSuspended => "ACCOUNT_SUSPENDED",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::ExternalServiceError => "EXTERNAL_SERVICE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }

    /// True for codes that report a missing resource.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ErrorCode::UserNotFound
                | ErrorCode::CardNotFound
                | ErrorCode::ShopNotFound
                | ErrorCode::DiscountRuleNotFound
                | ErrorCode::TransactionNotFound
                | ErrorCode::OtpSessionNotFound
                | ErrorCode::BannerNotFound
                | ErrorCode::BlogPostNotFound
                | ErrorCode::FaqNotFound
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a validation error for a specific field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message).with_detail("field", field.into())
    }

    /// Creates a not-found error for the given code and identifier.
    pub fn not_found(code: ErrorCode, what: &str, id: impl fmt::Display) -> Self {
        Self::new(code, format!("{} not found", what)).with_detail("id", id.to_string())
    }

    /// Creates a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// The stored record changed after it was loaded; the write was dropped.
    pub fn concurrent_modification(what: &str, id: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::ConcurrentModification,
            format!("{} was modified concurrently, please retry", what),
        )
        .with_detail("id", id.to_string())
    }

    /// Creates a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        let field = err.field().to_string();
        DomainError::validation(field, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_empty_field_displays_correctly() {
        let err = ValidationError::empty_field("name");
        assert_eq!(format!("{}", err), "Field 'name' cannot be empty");
    }

    #[test]
    fn validation_error_out_of_range_displays_correctly() {
        let err = ValidationError::out_of_range("per_page", 1, 100, 500);
        assert_eq!(
            format!("{}", err),
            "Field 'per_page' must be between 1 and 100, got 500"
        );
    }

    #[test]
    fn domain_error_displays_code_and_message() {
        let err = DomainError::new(ErrorCode::ShopNotFound, "Shop not found");
        assert_eq!(format!("{}", err), "[SHOP_NOT_FOUND] Shop not found");
    }

    #[test]
    fn not_found_records_id_detail() {
        let err = DomainError::not_found(ErrorCode::UserNotFound, "User", "abc");
        assert_eq!(err.message, "User not found");
        assert_eq!(err.details.get("id"), Some(&"abc".to_string()));
        assert!(err.code.is_not_found());
    }

    #[test]
    fn validation_error_converts_with_field_detail() {
        let err: DomainError = ValidationError::invalid_format("phone", "too short").into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.details.get("field"), Some(&"phone".to_string()));
    }

    #[test]
    fn concurrent_modification_is_not_a_not_found_code() {
        let err = DomainError::concurrent_modification("User", "abc");
        assert_eq!(err.code.as_str(), "CONCURRENT_MODIFICATION");
        assert!(!err.code.is_not_found());
        assert_eq!(err.details.get("id"), Some(&"abc".to_string()));
    }

    #[test]
    fn forbidden_is_not_a_not_found_code() {
        assert!(!ErrorCode::Forbidden.is_not_found());
        assert_eq!(ErrorCode::Forbidden.to_string(), "FORBIDDEN");
    }
}
