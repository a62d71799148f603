//! ListRulesHandler - Rules offered by a shop or by the platform.

use std::sync::Arc;

use crate::domain::discount::DiscountRule;
use crate::domain::foundation::{AuthenticatedUser, DomainError, ErrorCode, ShopId};
use crate::ports::{DiscountRuleRepository, ShopRepository};

#[derive(Debug, Clone)]
pub struct ListRulesQuery {
    pub actor: Option<AuthenticatedUser>,
    /// `None` lists platform-wide rules.
    pub shop_id: Option<ShopId>,
    /// Honoured for the shop owner and admins; ignored for everyone else.
    pub include_inactive: bool,
}

pub struct ListRulesHandler {
    rules: Arc<dyn DiscountRuleRepository>,
    shops: Arc<dyn ShopRepository>,
}

impl ListRulesHandler {
    pub fn new(rules: Arc<dyn DiscountRuleRepository>, shops: Arc<dyn ShopRepository>) -> Self {
        Self { rules, shops }
    }

    pub async fn handle(&self, query: ListRulesQuery) -> Result<Vec<DiscountRule>, DomainError> {
        let is_admin = query.actor.as_ref().map_or(false, |a| a.is_admin());

        let may_see_inactive = match &query.shop_id {
            Some(shop_id) => {
                let shop = self
                    .shops
                    .find_by_id(shop_id)
                    .await?
                    .ok_or_else(|| DomainError::not_found(ErrorCode::ShopNotFound, "Shop", shop_id))?;
                is_admin || query.actor.as_ref().map_or(false, |a| shop.is_owner(&a.id))
            }
            None => is_admin,
        };

        self.rules
            .list_by_shop(query.shop_id.as_ref(), query.include_inactive && may_see_inactive)
            .await
    }
}
