//! Token issuing port.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::foundation::{AuthError, Timestamp};
use crate::domain::user::User;

/// A freshly minted access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_at: Timestamp,
}

/// Mints access tokens after a successful OTP login.
///
/// Tokens must be accepted by the `SessionValidator` the same deployment
/// uses.
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    async fn issue(&self, user: &User) -> Result<IssuedToken, AuthError>;
}
