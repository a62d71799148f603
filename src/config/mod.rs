//! Application configuration module
//!
//! Configuration is read from environment variables with the `DISCOUNT_CARD`
//! prefix; nested values are separated by a double underscore.
//!
//! # Example
//!
//! ```no_run
//! use discount_card::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod card;
mod database;
mod error;
mod otp;
mod server;
mod sms;

pub use auth::{AuthConfig, MIN_JWT_SECRET_BYTES};
pub use card::CardConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use otp::OtpConfig;
pub use server::{Environment, ServerConfig};
pub use sms::{SmsConfig, SmsProvider};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Token signing (HS256 JWT)
    #[serde(default)]
    pub auth: AuthConfig,

    /// One-time code limits and hashing key
    #[serde(default)]
    pub otp: OtpConfig,

    /// SMS delivery of one-time codes
    #[serde(default)]
    pub sms: SmsConfig,

    /// Card issuance defaults
    #[serde(default)]
    pub card: CardConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` if present, then reads every `DISCOUNT_CARD__*` variable.
    ///
    /// # Environment Variable Format
    ///
    /// - `DISCOUNT_CARD__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `DISCOUNT_CARD__OTP__HASH_SECRET=...` -> `otp.hash_secret = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("DISCOUNT_CARD")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first section that is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate()?;
        self.otp.validate()?;
        self.sms.validate(&self.server.environment)?;
        self.card.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
