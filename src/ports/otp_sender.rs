//! Outbound OTP delivery port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PhoneNumber};
use crate::domain::otp::{OtpCode, OtpPurpose};

/// Delivers a one-time code to a phone, usually by SMS.
///
/// # Errors
///
/// Implementations return `ExternalServiceError` when the gateway refuses
/// or cannot be reached.
#[async_trait]
pub trait OtpSender: Send + Sync {
    async fn send(
        &self,
        phone: &PhoneNumber,
        code: &OtpCode,
        purpose: OtpPurpose,
    ) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otp_sender_is_object_safe() {
        fn _accepts_dyn(_sender: &dyn OtpSender) {}
    }
}
