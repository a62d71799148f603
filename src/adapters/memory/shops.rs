//! In-memory shop repository.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, Page, ShopId};
use crate::domain::shop::{Shop, ShopHit, ShopSearch};
use crate::ports::ShopRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemoryShopRepository {
    shops: Arc<RwLock<HashMap<ShopId, Shop>>>,
}

impl InMemoryShopRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<Shop> {
        self.shops.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl ShopRepository for InMemoryShopRepository {
    async fn save(&self, shop: &Shop) -> Result<(), DomainError> {
        self.shops.write().await.insert(*shop.id(), shop.clone());
        Ok(())
    }

    async fn update(&self, shop: &Shop) -> Result<(), DomainError> {
        let mut shops = self.shops.write().await;
        match shops.get_mut(shop.id()) {
            Some(existing) => {
                *existing = shop.clone();
                Ok(())
            }
            None => Err(DomainError::not_found(ErrorCode::ShopNotFound, "Shop", shop.id())),
        }
    }

    async fn find_by_id(&self, id: &ShopId) -> Result<Option<Shop>, DomainError> {
        Ok(self.shops.read().await.get(id).cloned())
    }

    async fn search(&self, search: &ShopSearch) -> Result<Page<ShopHit>, DomainError> {
        let mut hits: Vec<ShopHit> = self
            .shops
            .read()
            .await
            .values()
            .filter_map(|s| search.matches(s))
            .collect();
        search.sort_results(&mut hits);
        Ok(search.page.paginate(hits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{GeoPoint, UserId};
    use crate::domain::shop::{NearFilter, ShopCategory, ShopDetails, ShopStatus};

    fn shop(name: &str, lat: f64, lng: f64) -> Shop {
        let mut shop = Shop::register(
            UserId::new(),
            ShopDetails {
                name: name.to_string(),
                description: None,
                category: ShopCategory::Cafe,
                address: "1 Main St".to_string(),
                location: GeoPoint::new(lat, lng).unwrap(),
                phone: None,
            },
        )
        .unwrap();
        shop.approve().unwrap();
        shop
    }

    #[tokio::test]
    async fn search_orders_by_distance_when_near_is_set() {
        let repo = InMemoryShopRepository::new();
        repo.save(&shop("Far", 41.0, 29.0)).await.unwrap();
        repo.save(&shop("Near", 40.01, 29.0)).await.unwrap();
        repo.save(&shop("Way off", 10.0, 10.0)).await.unwrap();

        let search = ShopSearch {
            near: Some(NearFilter::new(GeoPoint::new(40.0, 29.0).unwrap(), 200.0).unwrap()),
            ..Default::default()
        };
        let page = repo.search(&search).await.unwrap();

        let names: Vec<_> = page.items.iter().map(|h| h.shop.name()).collect();
        assert_eq!(names, vec!["Near", "Far"]);
        assert!(page.items[0].distance_km.unwrap() < 2.0);
    }

    #[tokio::test]
    async fn default_search_hides_pending_shops() {
        let repo = InMemoryShopRepository::new();
        repo.save(&shop("Open", 40.0, 29.0)).await.unwrap();
        let pending = Shop::register(
            UserId::new(),
            ShopDetails {
                name: "Pending".to_string(),
                description: None,
                category: ShopCategory::Other,
                address: "2 Main St".to_string(),
                location: GeoPoint::new(40.0, 29.0).unwrap(),
                phone: None,
            },
        )
        .unwrap();
        repo.save(&pending).await.unwrap();

        let page = repo.search(&ShopSearch::default()).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].shop.status(), ShopStatus::Active);
    }

    #[tokio::test]
    async fn update_unknown_shop_is_not_found() {
        let repo = InMemoryShopRepository::new();
        let err = repo.update(&shop("Ghost", 0.0, 0.0)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ShopNotFound);
    }
}
