//! In-memory OTP sender that keeps every delivered code.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::foundation::{DomainError, ErrorCode, PhoneNumber};
use crate::domain::otp::{OtpCode, OtpPurpose};
use crate::ports::OtpSender;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentCode {
    pub phone: PhoneNumber,
    pub code: String,
    pub purpose: OtpPurpose,
}

/// Records sent codes so tests can read them back. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct RecordingOtpSender {
    sent: Arc<Mutex<Vec<SentCode>>>,
    fail: Arc<Mutex<bool>>,
}

impl RecordingOtpSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent send fail with `ExternalServiceError`.
    pub async fn fail_sends(&self, fail: bool) {
        *self.fail.lock().await = fail;
    }

    pub async fn sent(&self) -> Vec<SentCode> {
        self.sent.lock().await.clone()
    }

    /// Most recent code delivered to `phone`.
    pub async fn last_code_for(&self, phone: &PhoneNumber) -> Option<String> {
        self.sent
            .lock()
            .await
            .iter()
            .rev()
            .find(|s| &s.phone == phone)
            .map(|s| s.code.clone())
    }
}

#[async_trait]
impl OtpSender for RecordingOtpSender {
    async fn send(
        &self,
        phone: &PhoneNumber,
        code: &OtpCode,
        purpose: OtpPurpose,
    ) -> Result<(), DomainError> {
        if *self.fail.lock().await {
            return Err(DomainError::new(
                ErrorCode::ExternalServiceError,
                "SMS gateway unavailable",
            ));
        }
        self.sent.lock().await.push(SentCode {
            phone: phone.clone(),
            code: code.as_str().to_string(),
            purpose,
        });
        Ok(())
    }
}
