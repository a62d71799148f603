//! Authentication types for the domain layer.
//!
//! `AuthenticatedUser` is what the HTTP layer hands to handlers after a
//! bearer token has been validated through the `SessionValidator` port.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{DomainError, ErrorCode, PhoneNumber, UserId, ValidationError};

/// Platform role. Higher rank means more privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Customer,
    ShopOwner,
    Admin,
}

impl Role {
    pub fn rank(&self) -> u8 {
        match self {
            Role::Customer => 0,
            Role::ShopOwner => 1,
            Role::Admin => 2,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::ShopOwner => "shop_owner",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Role::Customer),
            "shop_owner" => Ok(Role::ShopOwner),
            "admin" => Ok(Role::Admin),
            other => Err(ValidationError::invalid_format(
                "role",
                format!("unknown role '{}'", other),
            )),
        }
    }
}

/// Authenticated user extracted from a validated access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub phone: PhoneNumber,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn new(id: UserId, phone: PhoneNumber, role: Role) -> Self {
        Self { id, phone, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// True when the caller is the given user or an admin.
    pub fn is_self_or_admin(&self, user_id: &UserId) -> bool {
        self.is_admin() || &self.id == user_id
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    /// The token is valid but its holder has since been suspended.
    #[error("Account is suspended")]
    AccountSuspended,

    /// Token could not be produced or checked for infrastructure reasons.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this error indicates the user should log in again.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(self, AuthError::InvalidToken | AuthError::TokenExpired)
    }
}

impl From<AuthError> for DomainError {
    fn from(err: AuthError) -> Self {
        let code = match err {
            AuthError::InvalidToken | AuthError::TokenExpired => ErrorCode::Unauthorized,
            AuthError::InsufficientPermissions => ErrorCode::Forbidden,
            AuthError::AccountSuspended => ErrorCode::AccountSuspended,
            AuthError::ServiceUnavailable(_) => ErrorCode::InternalError,
        };
        DomainError::new(code, err.to_string())
    }
}
