//! Discount rule repository port.

use async_trait::async_trait;

use crate::domain::discount::DiscountRule;
use crate::domain::foundation::{DiscountRuleId, DomainError, ShopId};

#[async_trait]
pub trait DiscountRuleRepository: Send + Sync {
    async fn save(&self, rule: &DiscountRule) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `DiscountRuleNotFound` if the rule doesn't exist
    async fn update(&self, rule: &DiscountRule) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `DiscountRuleNotFound` if the rule doesn't exist
    async fn delete(&self, id: &DiscountRuleId) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &DiscountRuleId) -> Result<Option<DiscountRule>, DomainError>;

    /// Rules owned by one shop, or platform-wide rules when `shop_id` is
    /// `None`. Ordered by priority desc, then created_at asc.
    async fn list_by_shop(
        &self,
        shop_id: Option<&ShopId>,
        include_inactive: bool,
    ) -> Result<Vec<DiscountRule>, DomainError>;

    /// Active rules that could apply at a shop: its own plus platform-wide.
    async fn find_candidates(&self, shop_id: &ShopId) -> Result<Vec<DiscountRule>, DomainError>;
}
