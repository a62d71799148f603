//! HTTP SMS gateway adapter.
//!
//! Posts `{"to", "from", "message"}` as JSON with a bearer API key. Any
//! non-2xx answer is reported as `ExternalServiceError`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::config::SmsConfig;
use crate::domain::foundation::{DomainError, ErrorCode, PhoneNumber};
use crate::domain::otp::{OtpCode, OtpPurpose};
use crate::ports::OtpSender;

#[derive(Debug, Clone)]
pub struct SmsGatewayConfig {
    pub url: String,
    api_key: SecretString,
    pub sender_id: String,
    pub timeout: Duration,
}

impl SmsGatewayConfig {
    pub fn new(url: impl Into<String>, api_key: SecretString, sender_id: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key,
            sender_id: sender_id.into(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Gateway settings from `SmsConfig`, `None` when no URL is configured.
    pub fn from_sms_config(config: &SmsConfig) -> Option<Self> {
        let url = config.gateway_url.as_deref().filter(|u| !u.is_empty())?;
        Some(Self::new(url, config.api_key.clone(), config.sender_id.clone()))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Serialize)]
struct SmsRequest<'a> {
    to: &'a str,
    from: &'a str,
    message: String,
}

pub struct HttpSmsGateway {
    config: SmsGatewayConfig,
    client: Client,
}

impl HttpSmsGateway {
    pub fn new(config: SmsGatewayConfig) -> Result<Self, DomainError> {
        let client = Client::builder().timeout(config.timeout).build().map_err(|e| {
            DomainError::new(
                ErrorCode::ExternalServiceError,
                format!("Failed to create HTTP client: {}", e),
            )
        })?;
        Ok(Self { config, client })
    }

    fn message_for(code: &OtpCode, purpose: OtpPurpose) -> String {
        match purpose {
            OtpPurpose::Login => format!("Your discount card login code is {}", code.as_str()),
            OtpPurpose::PhoneChange => {
                format!("Your code to confirm this phone number is {}", code.as_str())
            }
        }
    }
}

#[async_trait]
impl OtpSender for HttpSmsGateway {
    async fn send(
        &self,
        phone: &PhoneNumber,
        code: &OtpCode,
        purpose: OtpPurpose,
    ) -> Result<(), DomainError> {
        let body = SmsRequest {
            to: phone.as_str(),
            from: &self.config.sender_id,
            message: Self::message_for(code, purpose),
        };

        let response = self
            .client
            .post(&self.config.url)
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    tracing::error!(phone = %phone.redacted(), "SMS gateway timed out");
                } else {
                    tracing::error!(phone = %phone.redacted(), "SMS gateway request failed: {}", e);
                }
                DomainError::new(ErrorCode::ExternalServiceError, "SMS gateway unreachable")
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::error!(
                phone = %phone.redacted(),
                status = status.as_u16(),
                "SMS gateway rejected message: {}",
                detail
            );
            return Err(DomainError::new(
                ErrorCode::ExternalServiceError,
                "SMS gateway rejected the message",
            )
            .with_detail("status", status.as_u16().to_string()));
        }

        tracing::info!(phone = %phone.redacted(), purpose = purpose.as_str(), "OTP sent");
        Ok(())
    }
}

impl std::fmt::Debug for HttpSmsGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSmsGateway")
            .field("url", &self.config.url)
            .field("sender_id", &self.config.sender_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SmsProvider;

    #[test]
    fn gateway_config_requires_url() {
        let config = SmsConfig::default();
        assert!(SmsGatewayConfig::from_sms_config(&config).is_none());

        let config = SmsConfig {
            provider: SmsProvider::Http,
            gateway_url: Some("https://sms.example.com/send".to_string()),
            ..Default::default()
        };
        let gateway = SmsGatewayConfig::from_sms_config(&config).unwrap();
        assert_eq!(gateway.url, "https://sms.example.com/send");
        assert_eq!(gateway.sender_id, "DiscountCard");
    }

    #[test]
    fn message_contains_code() {
        let code = OtpCode::generate(6);
        let message = HttpSmsGateway::message_for(&code, OtpPurpose::Login);
        assert!(message.ends_with(code.as_str()));
    }

    #[tokio::test]
    async fn unreachable_gateway_is_external_error() {
        let config = SmsGatewayConfig::new(
            "http://127.0.0.1:9/send",
            SecretString::new("key".to_string()),
            "Test",
        )
        .with_timeout(Duration::from_millis(500));
        let gateway = HttpSmsGateway::new(config).unwrap();
        let phone = PhoneNumber::parse("+15551234567").unwrap();

        let err = gateway
            .send(&phone, &OtpCode::generate(6), OtpPurpose::Login)
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ExternalServiceError);
    }

    #[test]
    fn debug_output_omits_api_key() {
        let config = SmsGatewayConfig::new(
            "https://sms.example.com",
            SecretString::new("super-secret".to_string()),
            "Test",
        );
        let gateway = HttpSmsGateway::new(config).unwrap();
        assert!(!format!("{:?}", gateway).contains("super-secret"));
    }
}
