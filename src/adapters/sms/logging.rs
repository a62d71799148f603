//! Log-only OTP sender for local development.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PhoneNumber};
use crate::domain::otp::{OtpCode, OtpPurpose};
use crate::ports::OtpSender;

/// Writes each code to the `otp` log target instead of sending an SMS.
///
/// Refused by config validation in production.
#[derive(Debug, Default, Clone)]
pub struct LoggingOtpSender;

impl LoggingOtpSender {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OtpSender for LoggingOtpSender {
    async fn send(
        &self,
        phone: &PhoneNumber,
        code: &OtpCode,
        purpose: OtpPurpose,
    ) -> Result<(), DomainError> {
        tracing::info!(
            target: "otp",
            phone = %phone.redacted(),
            purpose = purpose.as_str(),
            code = code.as_str(),
            "OTP code (log delivery)"
        );
        Ok(())
    }
}
