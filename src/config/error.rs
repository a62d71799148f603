//! Configuration error types

use thiserror::Error;

/// Failure to assemble an [`AppConfig`](super::AppConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// A loaded value that the server refuses to start with.
///
/// Variants carry the offending value so the startup log says what to fix.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Port 0 is not a valid listen port")]
    InvalidPort,

    #[error("Request timeout of {0}s is outside 1..=300")]
    InvalidTimeout(u64),

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Database URL must start with postgres:// or postgresql://")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections ({min}) exceeds max_connections ({max})")]
    InvalidPoolSize { min: u32, max: u32 },

    #[error("Pool size {0} exceeds the maximum of 100")]
    PoolSizeTooLarge(u32),

    #[error("JWT secret must be at least {0} bytes")]
    JwtSecretTooShort(usize),

    #[error("Token TTL of {0}s is outside 60s..=30 days")]
    InvalidTokenTtl(i64),

    #[error("OTP setting '{field}' is out of range")]
    InvalidOtpSetting { field: &'static str },

    #[error("SMS provider 'log' is not allowed in production")]
    LogSmsInProduction,

    #[error("Invalid SMS gateway URL")]
    InvalidGatewayUrl,

    #[error("Card validity of {0} days is outside 1..=3650")]
    InvalidCardValidity(u32),
}
