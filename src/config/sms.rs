//! SMS delivery configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::auth::empty_secret;
use super::error::ValidationError;
use super::server::Environment;

/// Which `OtpSender` adapter delivers codes.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SmsProvider {
    /// Write codes to the log. Development only.
    #[default]
    Log,
    /// POST to an HTTP SMS gateway.
    Http,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmsConfig {
    #[serde(default)]
    pub provider: SmsProvider,

    pub gateway_url: Option<String>,

    #[serde(default = "empty_secret")]
    pub api_key: SecretString,

    #[serde(default = "default_sender_id")]
    pub sender_id: String,
}

impl SmsConfig {
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        match self.provider {
            SmsProvider::Log => {
                if *environment == Environment::Production {
                    return Err(ValidationError::LogSmsInProduction);
                }
            }
            SmsProvider::Http => {
                let url = self
                    .gateway_url
                    .as_deref()
                    .filter(|u| !u.is_empty())
                    .ok_or(ValidationError::MissingRequired("DISCOUNT_CARD__SMS__GATEWAY_URL"))?;
                if !url.starts_with("https://") && !url.starts_with("http://") {
                    return Err(ValidationError::InvalidGatewayUrl);
                }
                if *environment == Environment::Production && !url.starts_with("https://") {
                    return Err(ValidationError::InvalidGatewayUrl);
                }
                if self.api_key.expose_secret().is_empty() {
                    return Err(ValidationError::MissingRequired("DISCOUNT_CARD__SMS__API_KEY"));
                }
            }
        }
        Ok(())
    }
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            provider: SmsProvider::default(),
            gateway_url: None,
            api_key: empty_secret(),
            sender_id: default_sender_id(),
        }
    }
}

fn default_sender_id() -> String {
    "DiscountCard".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(url: &str) -> SmsConfig {
        SmsConfig {
            provider: SmsProvider::Http,
            gateway_url: Some(url.to_string()),
            api_key: SecretString::new("key".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_log_provider_only_outside_production() {
        let config = SmsConfig::default();
        assert!(config.validate(&Environment::Development).is_ok());
        assert_eq!(
            config.validate(&Environment::Production),
            Err(ValidationError::LogSmsInProduction)
        );
    }

    #[test]
    fn test_http_provider_requires_url_and_key() {
        let mut config = http("https://sms.example.com/send");
        assert!(config.validate(&Environment::Production).is_ok());

        config.api_key = empty_secret();
        assert!(matches!(
            config.validate(&Environment::Development),
            Err(ValidationError::MissingRequired(_))
        ));

        config.gateway_url = None;
        assert!(config.validate(&Environment::Development).is_err());
    }

    #[test]
    fn test_production_gateway_must_use_https() {
        let config = http("http://sms.example.com/send");
        assert!(config.validate(&Environment::Staging).is_ok());
        assert_eq!(
            config.validate(&Environment::Production),
            Err(ValidationError::InvalidGatewayUrl)
        );
    }
}
