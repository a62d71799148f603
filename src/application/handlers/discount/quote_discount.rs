//! QuoteDiscountHandler - Resolves a card at a shop and prices a purchase.
//!
//! The same resolution backs transaction recording, so a quote always
//! matches what recording would charge at that instant.

use std::sync::Arc;

use crate::domain::discount::{
    best_discount, find_applicable_rules, AppliedDiscount, DiscountRule, PurchaseContext,
};
use crate::domain::foundation::{AuthenticatedUser, DomainError, ErrorCode, Money, ShopId, Timestamp};
use crate::domain::shop::Shop;
use crate::domain::user::{CardNumber, CardTier, User};
use crate::ports::{DiscountRuleRepository, ShopRepository, UserRepository};

#[derive(Debug, Clone)]
pub struct QuoteDiscountCommand {
    pub actor: AuthenticatedUser,
    pub shop_id: ShopId,
    pub card_number: CardNumber,
    pub amount: Money,
}

/// Everything known about a purchase before it is recorded.
#[derive(Debug, Clone)]
pub struct PurchaseQuote {
    pub holder: User,
    pub shop: Shop,
    pub tier: CardTier,
    pub amount: Money,
    /// Applicable rules, priority first.
    pub applicable: Vec<DiscountRule>,
    pub best: Option<AppliedDiscount>,
}

impl PurchaseQuote {
    pub fn discount(&self) -> Money {
        self.best.as_ref().map_or(Money::ZERO, |b| b.discount)
    }

    pub fn final_amount(&self) -> Money {
        self.amount.saturating_sub(self.discount())
    }
}

pub struct QuoteDiscountHandler {
    users: Arc<dyn UserRepository>,
    shops: Arc<dyn ShopRepository>,
    rules: Arc<dyn DiscountRuleRepository>,
}

impl QuoteDiscountHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        shops: Arc<dyn ShopRepository>,
        rules: Arc<dyn DiscountRuleRepository>,
    ) -> Self {
        Self { users, shops, rules }
    }

    pub async fn handle(&self, cmd: QuoteDiscountCommand) -> Result<PurchaseQuote, DomainError> {
        self.quote_at(cmd, Timestamp::now()).await
    }

    pub(crate) async fn quote_at(
        &self,
        cmd: QuoteDiscountCommand,
        now: Timestamp,
    ) -> Result<PurchaseQuote, DomainError> {
        if !cmd.amount.is_positive() {
            return Err(DomainError::validation("amount_cents", "Amount must be greater than zero"));
        }

        // 1. Shop exists and the caller may sell on its behalf
        let shop = self
            .shops
            .find_by_id(&cmd.shop_id)
            .await?
            .ok_or_else(|| DomainError::not_found(ErrorCode::ShopNotFound, "Shop", cmd.shop_id))?;
        shop.authorize_manage(&cmd.actor.id, cmd.actor.is_admin())?;
        if !shop.is_accepting_cards() {
            return Err(DomainError::new(
                ErrorCode::ShopNotAcceptingCards,
                format!("Shop is {} and does not accept cards", shop.status().as_str()),
            ));
        }

        // 2. Card resolves to an active holder with a usable card
        let holder = self
            .users
            .find_by_card_number(&cmd.card_number)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(ErrorCode::CardNotFound, "Card", cmd.card_number.masked())
            })?;
        if !holder.is_active() {
            return Err(DomainError::new(ErrorCode::CardNotUsable, "Card holder is suspended"));
        }
        let card = holder.card().ok_or_else(|| {
            DomainError::not_found(ErrorCode::CardNotFound, "Card", cmd.card_number.masked())
        })?;
        card.ensure_usable(&now)?;
        let tier = card.tier();

        // 3. Shop rules plus platform rules, best single discount wins
        let candidates = self.rules.find_candidates(shop.id()).await?;
        let ctx = PurchaseContext {
            shop_id: *shop.id(),
            amount: cmd.amount,
            tier,
            at: now,
        };
        let applicable = find_applicable_rules(&candidates, &ctx)
            .into_iter()
            .cloned()
            .collect();
        let best = best_discount(&candidates, &ctx);

        Ok(PurchaseQuote {
            holder,
            shop,
            tier,
            amount: cmd.amount,
            applicable,
            best,
        })
    }
}
