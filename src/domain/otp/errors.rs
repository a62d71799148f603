use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Why an OTP request, resend or verification was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OtpError {
    #[error("Code has expired")]
    Expired,

    #[error("Invalid code, {remaining_attempts} attempts remaining")]
    InvalidCode { remaining_attempts: u32 },

    #[error("Too many failed attempts")]
    TooManyAttempts,

    #[error("Code was already used")]
    AlreadyVerified,

    #[error("Resend not allowed yet, retry in {retry_after_secs}s")]
    ResendCooldown { retry_after_secs: i64 },

    #[error("Resend limit reached")]
    ResendLimitReached,

    #[error("Too many code requests for this phone number")]
    TooManyRequests,
}

impl OtpError {
    pub fn code(&self) -> ErrorCode {
        match self {
            OtpError::Expired => ErrorCode::OtpExpired,
            OtpError::InvalidCode { .. } => ErrorCode::OtpInvalidCode,
            OtpError::TooManyAttempts => ErrorCode::OtpTooManyAttempts,
            OtpError::AlreadyVerified => ErrorCode::OtpAlreadyVerified,
            OtpError::ResendCooldown { .. } => ErrorCode::OtpResendCooldown,
            OtpError::ResendLimitReached => ErrorCode::OtpResendLimit,
            OtpError::TooManyRequests => ErrorCode::RateLimited,
        }
    }
}

impl From<OtpError> for DomainError {
    fn from(err: OtpError) -> Self {
        let base = DomainError::new(err.code(), err.to_string());
        match err {
            OtpError::InvalidCode { remaining_attempts } => {
                base.with_detail("remaining_attempts", remaining_attempts.to_string())
            }
            OtpError::ResendCooldown { retry_after_secs } => {
                base.with_detail("retry_after_secs", retry_after_secs.to_string())
            }
            _ => base,
        }
    }
}
