//! Mock authentication adapters for testing.
//!
//! `MockSessionValidator` maps fixed bearer strings to users, and
//! `MockTokenIssuer` hands out predictable tokens, so HTTP and handler tests
//! run without signing keys.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{AuthError, AuthenticatedUser, PhoneNumber, Role, Timestamp, UserId};
use crate::domain::user::User;
use crate::ports::{IssuedToken, SessionValidator, TokenIssuer};

/// Mock session validator for testing.
///
/// Tokens not in the map return `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    /// Error returned for every validation when set
    force_error: RwLock<Option<AuthError>>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a valid token that maps to a user.
    pub fn with_user(mut self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.tokens.get_mut().insert(token.into(), user);
        self
    }

    /// Adds a token for a fresh user with the given role and phone.
    pub fn with_role(self, token: impl Into<String>, role: Role, phone: &str) -> Self {
        match PhoneNumber::parse(phone) {
            Ok(phone) => self.with_user(token, AuthenticatedUser::new(UserId::new(), phone, role)),
            Err(_) => self,
        }
    }

    /// Forces all validations to return the specified error.
    pub fn with_error(mut self, error: AuthError) -> Self {
        *self.force_error.get_mut() = Some(error);
        self
    }

    pub async fn clear_error(&self) {
        *self.force_error.write().await = None;
    }

    /// Registers a new valid token at runtime.
    pub async fn add_token(&self, token: impl Into<String>, user: AuthenticatedUser) {
        self.tokens.write().await.insert(token.into(), user);
    }

    pub async fn remove_token(&self, token: &str) {
        self.tokens.write().await.remove(token);
    }

    /// User registered for a token, if any.
    pub async fn user_for(&self, token: &str) -> Option<AuthenticatedUser> {
        self.tokens.read().await.get(token).cloned()
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if let Some(error) = self.force_error.read().await.clone() {
            return Err(error);
        }

        self.tokens
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

/// Issues `mock-token-<user id>` tokens valid for one hour.
#[derive(Debug, Default)]
pub struct MockTokenIssuer {
    issued: RwLock<Vec<UserId>>,
}

impl MockTokenIssuer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Users a token has been issued for, in order.
    pub async fn issued_for(&self) -> Vec<UserId> {
        self.issued.read().await.clone()
    }
}

#[async_trait]
impl TokenIssuer for MockTokenIssuer {
    async fn issue(&self, user: &User) -> Result<IssuedToken, AuthError> {
        self.issued.write().await.push(*user.id());
        Ok(IssuedToken {
            access_token: format!("mock-token-{}", user.id()),
            token_type: "Bearer",
            expires_at: Timestamp::now().plus_secs(3600),
        })
    }
}
