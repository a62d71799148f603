//! ManageRulesHandler - Create, edit, toggle and delete discount rules.
//!
//! Shop rules are managed by the shop's owner or an admin. Platform-wide
//! rules (no shop) are admin only.

use std::sync::Arc;

use crate::application::handlers::access::require_admin;
use crate::domain::discount::{DiscountRule, RuleTerms};
use crate::domain::foundation::{AuthenticatedUser, DiscountRuleId, DomainError, ErrorCode, ShopId};
use crate::ports::{DiscountRuleRepository, ShopRepository};

#[derive(Debug, Clone)]
pub struct CreateRuleCommand {
    pub actor: AuthenticatedUser,
    /// `None` creates a platform-wide rule.
    pub shop_id: Option<ShopId>,
    pub terms: RuleTerms,
}

#[derive(Debug, Clone)]
pub struct UpdateRuleCommand {
    pub actor: AuthenticatedUser,
    pub rule_id: DiscountRuleId,
    pub terms: RuleTerms,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleAction {
    Activate,
    Deactivate,
}

#[derive(Debug, Clone)]
pub struct ChangeRuleStateCommand {
    pub actor: AuthenticatedUser,
    pub rule_id: DiscountRuleId,
    pub action: RuleAction,
}

#[derive(Debug, Clone)]
pub struct DeleteRuleCommand {
    pub actor: AuthenticatedUser,
    pub rule_id: DiscountRuleId,
}

pub struct ManageRulesHandler {
    rules: Arc<dyn DiscountRuleRepository>,
    shops: Arc<dyn ShopRepository>,
}

impl ManageRulesHandler {
    pub fn new(rules: Arc<dyn DiscountRuleRepository>, shops: Arc<dyn ShopRepository>) -> Self {
        Self { rules, shops }
    }

    pub async fn create(&self, cmd: CreateRuleCommand) -> Result<DiscountRule, DomainError> {
        self.authorize(&cmd.actor, cmd.shop_id.as_ref()).await?;

        let rule = DiscountRule::create(cmd.shop_id, cmd.terms)?;
        self.rules.save(&rule).await?;

        tracing::info!(
            rule_id = %rule.id(),
            shop_id = ?rule.shop_id(),
            kind = rule.kind().as_str(),
            "Discount rule created"
        );
        Ok(rule)
    }

    pub async fn update(&self, cmd: UpdateRuleCommand) -> Result<DiscountRule, DomainError> {
        let mut rule = self.load(&cmd.rule_id).await?;
        self.authorize(&cmd.actor, rule.shop_id()).await?;

        rule.update(cmd.terms)?;
        self.rules.update(&rule).await?;
        Ok(rule)
    }

    pub async fn change_state(&self, cmd: ChangeRuleStateCommand) -> Result<DiscountRule, DomainError> {
        let mut rule = self.load(&cmd.rule_id).await?;
        self.authorize(&cmd.actor, rule.shop_id()).await?;

        match cmd.action {
            RuleAction::Activate => rule.activate()?,
            RuleAction::Deactivate => rule.deactivate()?,
        }
        self.rules.update(&rule).await?;
        Ok(rule)
    }

    pub async fn delete(&self, cmd: DeleteRuleCommand) -> Result<(), DomainError> {
        let rule = self.load(&cmd.rule_id).await?;
        self.authorize(&cmd.actor, rule.shop_id()).await?;

        self.rules.delete(rule.id()).await?;
        tracing::info!(rule_id = %rule.id(), actor = %cmd.actor.id, "Discount rule deleted");
        Ok(())
    }

    async fn authorize(&self, actor: &AuthenticatedUser, shop_id: Option<&ShopId>) -> Result<(), DomainError> {
        let Some(shop_id) = shop_id else {
            return require_admin(actor);
        };
        let shop = self
            .shops
            .find_by_id(shop_id)
            .await?
            .ok_or_else(|| DomainError::not_found(ErrorCode::ShopNotFound, "Shop", shop_id))?;
        shop.authorize_manage(&actor.id, actor.is_admin())
    }

    async fn load(&self, id: &DiscountRuleId) -> Result<DiscountRule, DomainError> {
        self.rules
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(ErrorCode::DiscountRuleNotFound, "Discount rule", id))
    }
}
