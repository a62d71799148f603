//! Token issuance configuration (HS256 JWT)

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Minimum HMAC key length accepted for signing tokens.
pub const MIN_JWT_SECRET_BYTES: usize = 32;

const MAX_TOKEN_TTL_SECS: i64 = 30 * 24 * 3600;

/// Authentication configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing key
    #[serde(default = "empty_secret")]
    pub jwt_secret: SecretString,

    /// `iss` claim written into and required on every token
    #[serde(default = "default_issuer")]
    pub issuer: String,

    /// `aud` claim written into and required on every token
    #[serde(default = "default_audience")]
    pub audience: String,

    /// Access token lifetime in seconds
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: i64,
}

impl AuthConfig {
    /// Validate authentication configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let secret_len = self.jwt_secret.expose_secret().len();
        if secret_len == 0 {
            return Err(ValidationError::MissingRequired("DISCOUNT_CARD__AUTH__JWT_SECRET"));
        }
        if secret_len < MIN_JWT_SECRET_BYTES {
            return Err(ValidationError::JwtSecretTooShort(MIN_JWT_SECRET_BYTES));
        }
        if self.issuer.trim().is_empty() {
            return Err(ValidationError::MissingRequired("DISCOUNT_CARD__AUTH__ISSUER"));
        }
        if self.audience.trim().is_empty() {
            return Err(ValidationError::MissingRequired("DISCOUNT_CARD__AUTH__AUDIENCE"));
        }
        if !(60..=MAX_TOKEN_TTL_SECS).contains(&self.token_ttl_secs) {
            return Err(ValidationError::InvalidTokenTtl(self.token_ttl_secs));
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: empty_secret(),
            issuer: default_issuer(),
            audience: default_audience(),
            token_ttl_secs: default_token_ttl(),
        }
    }
}

pub(super) fn empty_secret() -> SecretString {
    SecretString::new(String::new())
}

fn default_issuer() -> String {
    "discount-card".to_string()
}

fn default_audience() -> String {
    "discount-card-api".to_string()
}

fn default_token_ttl() -> i64 {
    86_400
}
