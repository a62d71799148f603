//! Session validation against the stored account.
//!
//! Access tokens live for a day, so the claims alone would let a suspended
//! or demoted user keep acting until expiry. `CurrentUserValidator` wraps the
//! signature check and replaces the claimed role and phone with what the
//! user row says now.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::ports::{SessionValidator, UserRepository};

pub struct CurrentUserValidator {
    tokens: Arc<dyn SessionValidator>,
    users: Arc<dyn UserRepository>,
}

impl CurrentUserValidator {
    pub fn new(tokens: Arc<dyn SessionValidator>, users: Arc<dyn UserRepository>) -> Self {
        Self { tokens, users }
    }
}

#[async_trait]
impl SessionValidator for CurrentUserValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let claimed = self.tokens.validate(token).await?;

        let user = self
            .users
            .find_by_id(&claimed.id)
            .await
            .map_err(|e| AuthError::service_unavailable(e.message))?
            .ok_or(AuthError::InvalidToken)?;

        if !user.is_active() {
            tracing::warn!(user_id = %claimed.id, "Token presented by suspended account");
            return Err(AuthError::AccountSuspended);
        }
        if user.role() != claimed.role {
            tracing::debug!(
                user_id = %claimed.id,
                claimed = %claimed.role,
                current = %user.role(),
                "Role changed since token was issued"
            );
        }

        Ok(AuthenticatedUser::new(claimed.id, user.phone().clone(), user.role()))
    }
}
