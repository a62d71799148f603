//! In-memory discount rule repository.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::discount::DiscountRule;
use crate::domain::foundation::{DiscountRuleId, DomainError, ErrorCode, ShopId};
use crate::ports::DiscountRuleRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemoryDiscountRuleRepository {
    rules: Arc<RwLock<HashMap<DiscountRuleId, DiscountRule>>>,
}

impl InMemoryDiscountRuleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn not_found(id: &DiscountRuleId) -> DomainError {
        DomainError::not_found(ErrorCode::DiscountRuleNotFound, "Discount rule", id)
    }

    fn sorted(mut rules: Vec<DiscountRule>) -> Vec<DiscountRule> {
        rules.sort_by(|a, b| {
            b.priority()
                .cmp(&a.priority())
                .then(a.created_at().cmp(b.created_at()))
        });
        rules
    }
}

#[async_trait]
impl DiscountRuleRepository for InMemoryDiscountRuleRepository {
    async fn save(&self, rule: &DiscountRule) -> Result<(), DomainError> {
        self.rules.write().await.insert(*rule.id(), rule.clone());
        Ok(())
    }

    async fn update(&self, rule: &DiscountRule) -> Result<(), DomainError> {
        let mut rules = self.rules.write().await;
        let existing = rules.get_mut(rule.id()).ok_or_else(|| Self::not_found(rule.id()))?;
        *existing = rule.clone();
        Ok(())
    }

    async fn delete(&self, id: &DiscountRuleId) -> Result<(), DomainError> {
        self.rules
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Self::not_found(id))
    }

    async fn find_by_id(&self, id: &DiscountRuleId) -> Result<Option<DiscountRule>, DomainError> {
        Ok(self.rules.read().await.get(id).cloned())
    }

    async fn list_by_shop(
        &self,
        shop_id: Option<&ShopId>,
        include_inactive: bool,
    ) -> Result<Vec<DiscountRule>, DomainError> {
        let rules = self
            .rules
            .read()
            .await
            .values()
            .filter(|r| r.shop_id() == shop_id)
            .filter(|r| include_inactive || r.is_active())
            .cloned()
            .collect();
        Ok(Self::sorted(rules))
    }

    async fn find_candidates(&self, shop_id: &ShopId) -> Result<Vec<DiscountRule>, DomainError> {
        let rules = self
            .rules
            .read()
            .await
            .values()
            .filter(|r| r.is_active())
            .filter(|r| r.shop_id().map_or(true, |id| id == shop_id))
            .cloned()
            .collect();
        Ok(Self::sorted(rules))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::discount::test_support::{pct, terms};

    #[tokio::test]
    async fn candidates_include_platform_rules_but_not_other_shops() {
        let repo = InMemoryDiscountRuleRepository::new();
        let shop = ShopId::new();
        let other = ShopId::new();

        let own = DiscountRule::create(Some(shop), terms(pct(10))).unwrap();
        let platform = DiscountRule::create(None, terms(pct(5))).unwrap();
        let foreign = DiscountRule::create(Some(other), terms(pct(50))).unwrap();
        let mut inactive = DiscountRule::create(Some(shop), terms(pct(30))).unwrap();
        inactive.deactivate().unwrap();
        for rule in [&own, &platform, &foreign, &inactive] {
            repo.save(rule).await.unwrap();
        }

        let ids: Vec<_> = repo
            .find_candidates(&shop)
            .await
            .unwrap()
            .iter()
            .map(|r| *r.id())
            .collect();

        assert_eq!(ids.len(), 2);
        assert!(ids.contains(own.id()));
        assert!(ids.contains(platform.id()));
    }

    #[tokio::test]
    async fn list_by_shop_orders_by_priority() {
        let repo = InMemoryDiscountRuleRepository::new();
        let shop = ShopId::new();
        let mut high = terms(pct(10));
        high.priority = 10;
        let low = DiscountRule::create(Some(shop), terms(pct(10))).unwrap();
        let high = DiscountRule::create(Some(shop), high).unwrap();
        repo.save(&low).await.unwrap();
        repo.save(&high).await.unwrap();

        let listed = repo.list_by_shop(Some(&shop), false).await.unwrap();
        assert_eq!(listed[0].id(), high.id());

        let platform = repo.list_by_shop(None, true).await.unwrap();
        assert!(platform.is_empty());
    }

    #[tokio::test]
    async fn delete_unknown_rule_is_not_found() {
        let repo = InMemoryDiscountRuleRepository::new();
        let err = repo.delete(&DiscountRuleId::new()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DiscountRuleNotFound);
    }
}
