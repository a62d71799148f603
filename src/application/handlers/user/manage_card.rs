//! Card handlers: issue a card, then block, unblock, re-tier or renew it.

use std::sync::Arc;

use crate::application::handlers::access::require_admin;
use crate::domain::foundation::{AuthenticatedUser, DomainError, ErrorCode, Timestamp, UserId};
use crate::domain::user::{CardNumber, CardTier, User};
use crate::ports::UserRepository;

/// Card numbers are random; a collision with an existing card is retried.
const MAX_ISSUE_ATTEMPTS: usize = 3;

#[derive(Debug, Clone)]
pub struct IssueCardCommand {
    pub actor: AuthenticatedUser,
    pub user_id: UserId,
    /// Falls back to the configured default tier.
    pub tier: Option<CardTier>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    Block,
    Unblock,
    ChangeTier(CardTier),
    Renew,
}

#[derive(Debug, Clone)]
pub struct ManageCardCommand {
    pub actor: AuthenticatedUser,
    pub user_id: UserId,
    pub action: CardAction,
}

/// Issuing and servicing discount cards. Admin only.
pub struct ManageCardHandler {
    users: Arc<dyn UserRepository>,
    validity_days: u32,
    default_tier: CardTier,
}

impl ManageCardHandler {
    pub fn new(users: Arc<dyn UserRepository>, validity_days: u32, default_tier: CardTier) -> Self {
        Self {
            users,
            validity_days,
            default_tier,
        }
    }

    pub async fn issue(&self, cmd: IssueCardCommand) -> Result<User, DomainError> {
        require_admin(&cmd.actor)?;
        let original = self.load(&cmd.user_id).await?;
        let tier = cmd.tier.unwrap_or(self.default_tier);

        let mut last_err = None;
        for _ in 0..MAX_ISSUE_ATTEMPTS {
            let mut user = original.clone();
            user.issue_card(CardNumber::generate(), tier, self.validity_days, Timestamp::now())?;
            match self.users.update(&user).await {
                Ok(()) => {
                    tracing::info!(user_id = %user.id(), tier = tier.as_str(), "Card issued");
                    return Ok(user);
                }
                Err(err) if err.code == ErrorCode::CardAlreadyIssued => {
                    tracing::warn!(user_id = %user.id(), "Card number collision, retrying");
                    last_err = Some(err);
                }
                Err(err) => return Err(err),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            DomainError::new(ErrorCode::InternalError, "Could not allocate a card number")
        }))
    }

    pub async fn handle(&self, cmd: ManageCardCommand) -> Result<User, DomainError> {
        require_admin(&cmd.actor)?;
        let mut user = self.load(&cmd.user_id).await?;

        let card = user.card_mut()?;
        match cmd.action {
            CardAction::Block => card.block()?,
            CardAction::Unblock => card.unblock()?,
            CardAction::ChangeTier(tier) => card.change_tier(tier),
            CardAction::Renew => card.renew(self.validity_days, Timestamp::now())?,
        }
        self.users.update(&user).await?;

        tracing::info!(user_id = %user.id(), action = ?cmd.action, "Card updated");
        Ok(user)
    }

    async fn load(&self, id: &UserId) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(ErrorCode::UserNotFound, "User", id))
    }
}
