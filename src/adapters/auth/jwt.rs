//! HS256 JWT adapter.
//!
//! Implements both `TokenIssuer` and `SessionValidator` with one shared key,
//! so every token this service mints is accepted by its own middleware.
//!
//! # Security
//!
//! Validation checks:
//! - **Signature** (HS256 only; other algorithms are rejected)
//! - **Issuer (iss)** and **Audience (aud)**
//! - **Expiry (exp)**

use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::domain::foundation::{AuthError, AuthenticatedUser, PhoneNumber, Role, Timestamp, UserId};
use crate::domain::user::User;
use crate::ports::{IssuedToken, SessionValidator, TokenIssuer};

/// Claims carried by access tokens.
#[derive(Debug, Serialize, Deserialize)]
struct AccessClaims {
    /// User ID
    sub: String,
    phone: String,
    role: Role,
    iss: String,
    aud: String,
    iat: i64,
    exp: i64,
}

/// Mints and validates HS256 access tokens.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    ttl_secs: i64,
}

impl JwtTokenService {
    pub fn new(
        secret: &SecretString,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        ttl_secs: i64,
    ) -> Self {
        let key = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(key),
            decoding_key: DecodingKey::from_secret(key),
            issuer: issuer.into(),
            audience: audience.into(),
            ttl_secs,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            &config.jwt_secret,
            config.issuer.clone(),
            config.audience.clone(),
            config.token_ttl_secs,
        )
    }

    fn encode_claims(&self, claims: &AccessClaims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to sign access token: {}", e);
            AuthError::service_unavailable("token signing failed")
        })
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation
    }
}

#[async_trait]
impl TokenIssuer for JwtTokenService {
    async fn issue(&self, user: &User) -> Result<IssuedToken, AuthError> {
        let now = Timestamp::now();
        let expires_at = now.plus_secs(self.ttl_secs);
        let claims = AccessClaims {
            sub: user.id().to_string(),
            phone: user.phone().as_str().to_string(),
            role: user.role(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.as_unix_secs(),
            exp: expires_at.as_unix_secs(),
        };

        let access_token = self.encode_claims(&claims)?;
        tracing::debug!(user_id = %user.id(), role = %user.role(), "Issued access token");

        Ok(IssuedToken {
            access_token,
            token_type: "Bearer",
            expires_at,
        })
    }
}

#[async_trait]
impl SessionValidator for JwtTokenService {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<AccessClaims>(token, &self.decoding_key, &self.validation())
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Token expired");
                    AuthError::TokenExpired
                }
                ErrorKind::InvalidIssuer => {
                    tracing::warn!("Invalid issuer in token");
                    AuthError::InvalidToken
                }
                ErrorKind::InvalidAudience => {
                    tracing::warn!("Invalid audience in token");
                    AuthError::InvalidToken
                }
                _ => {
                    tracing::warn!("Token validation failed: {}", e);
                    AuthError::InvalidToken
                }
            })?;
        let claims = data.claims;

        let user_id: UserId = claims.sub.parse().map_err(|_| {
            tracing::warn!("Invalid user ID in token: {}", claims.sub);
            AuthError::InvalidToken
        })?;
        let phone = PhoneNumber::parse(&claims.phone).map_err(|_| {
            tracing::warn!("Invalid phone claim in token");
            AuthError::InvalidToken
        })?;

        Ok(AuthenticatedUser::new(user_id, phone, claims.role))
    }
}

impl std::fmt::Debug for JwtTokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenService")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}
