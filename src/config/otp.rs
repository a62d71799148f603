//! OTP configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::auth::empty_secret;
use super::error::ValidationError;
use crate::domain::otp::OtpPolicy;

/// One-time code settings. Turned into an [`OtpPolicy`] at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct OtpConfig {
    #[serde(default = "default_code_length")]
    pub code_length: u8,

    #[serde(default = "default_ttl")]
    pub ttl_secs: i64,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_max_resends")]
    pub max_resends: u32,

    #[serde(default = "default_resend_cooldown")]
    pub resend_cooldown_secs: i64,

    #[serde(default = "default_max_sessions_per_hour")]
    pub max_sessions_per_hour: u32,

    /// HMAC key for code hashes
    #[serde(default = "empty_secret")]
    pub hash_secret: SecretString,
}

impl OtpConfig {
    pub fn policy(&self) -> OtpPolicy {
        OtpPolicy {
            code_length: self.code_length,
            ttl_secs: self.ttl_secs,
            max_attempts: self.max_attempts,
            max_resends: self.max_resends,
            resend_cooldown_secs: self.resend_cooldown_secs,
            max_sessions_per_hour: self.max_sessions_per_hour,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.hash_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("DISCOUNT_CARD__OTP__HASH_SECRET"));
        }
        if !(4..=8).contains(&self.code_length) {
            return Err(ValidationError::InvalidOtpSetting { field: "code_length" });
        }
        if !(30..=3600).contains(&self.ttl_secs) {
            return Err(ValidationError::InvalidOtpSetting { field: "ttl_secs" });
        }
        if self.max_attempts == 0 || self.max_attempts > 20 {
            return Err(ValidationError::InvalidOtpSetting { field: "max_attempts" });
        }
        if self.max_resends > 10 {
            return Err(ValidationError::InvalidOtpSetting { field: "max_resends" });
        }
        if self.resend_cooldown_secs < 0 || self.resend_cooldown_secs >= self.ttl_secs {
            return Err(ValidationError::InvalidOtpSetting {
                field: "resend_cooldown_secs",
            });
        }
        if self.max_sessions_per_hour == 0 {
            return Err(ValidationError::InvalidOtpSetting {
                field: "max_sessions_per_hour",
            });
        }
        Ok(())
    }
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_length: default_code_length(),
            ttl_secs: default_ttl(),
            max_attempts: default_max_attempts(),
            max_resends: default_max_resends(),
            resend_cooldown_secs: default_resend_cooldown(),
            max_sessions_per_hour: default_max_sessions_per_hour(),
            hash_secret: empty_secret(),
        }
    }
}

fn default_code_length() -> u8 {
    6
}

fn default_ttl() -> i64 {
    300
}

fn default_max_attempts() -> u32 {
    5
}

fn default_max_resends() -> u32 {
    3
}

fn default_resend_cooldown() -> i64 {
    60
}

fn default_max_sessions_per_hour() -> u32 {
    5
}
