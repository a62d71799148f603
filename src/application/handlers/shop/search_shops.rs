//! Shop queries: public search and single-shop lookup.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, DomainError, ErrorCode, Page, ShopId};
use crate::domain::shop::{Shop, ShopHit, ShopSearch, ShopStatus};
use crate::ports::ShopRepository;

#[derive(Debug, Clone)]
pub struct SearchShopsQuery {
    pub actor: Option<AuthenticatedUser>,
    pub search: ShopSearch,
}

#[derive(Debug, Clone)]
pub struct GetShopQuery {
    pub actor: Option<AuthenticatedUser>,
    pub shop_id: ShopId,
}

/// Anonymous callers and customers only see active shops. Owners see all
/// of their own shops and admins see everything.
pub struct SearchShopsHandler {
    shops: Arc<dyn ShopRepository>,
}

impl SearchShopsHandler {
    pub fn new(shops: Arc<dyn ShopRepository>) -> Self {
        Self { shops }
    }

    pub async fn search(&self, query: SearchShopsQuery) -> Result<Page<ShopHit>, DomainError> {
        let mut search = query.search;
        let unrestricted = match &query.actor {
            Some(actor) if actor.is_admin() => true,
            Some(actor) => search.owner_id == Some(actor.id),
            None => false,
        };
        if !unrestricted {
            search.status = Some(ShopStatus::Active);
        }
        self.shops.search(&search).await
    }

    pub async fn get(&self, query: GetShopQuery) -> Result<Shop, DomainError> {
        let shop = self
            .shops
            .find_by_id(&query.shop_id)
            .await?
            .ok_or_else(|| DomainError::not_found(ErrorCode::ShopNotFound, "Shop", query.shop_id))?;

        let visible = shop.status() == ShopStatus::Active
            || query
                .actor
                .as_ref()
                .map_or(false, |a| a.is_admin() || shop.is_owner(&a.id));
        if !visible {
            // Hidden shops look the same as missing ones.
            return Err(DomainError::not_found(ErrorCode::ShopNotFound, "Shop", query.shop_id));
        }
        Ok(shop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryShopRepository;
    use crate::domain::foundation::{GeoPoint, PhoneNumber, Role, UserId};
    use crate::domain::shop::{NearFilter, ShopCategory, ShopDetails};

    fn shop(name: &str, lat: f64, lng: f64, approve: bool) -> Shop {
        let mut s = Shop::register(
            UserId::new(),
            ShopDetails {
                name: name.into(),
                description: None,
                category: ShopCategory::Restaurant,
                address: "Somewhere".into(),
                location: GeoPoint::new(lat, lng).unwrap(),
                phone: None,
            },
        )
        .unwrap();
        if approve {
            s.approve().unwrap();
        }
        s
    }

    async fn seeded() -> (SearchShopsHandler, Shop, Shop, Shop) {
        let repo = InMemoryShopRepository::new();
        let near = shop("Near Diner", 48.8566, 2.3522, true);
        let far = shop("Far Diner", 48.9566, 2.3522, true);
        let pending = shop("Pending Diner", 48.8570, 2.3520, false);
        for s in [&near, &far, &pending] {
            repo.save(s).await.unwrap();
        }
        (SearchShopsHandler::new(Arc::new(repo)), near, far, pending)
    }

    #[tokio::test]
    async fn anonymous_search_sees_only_active_shops_nearest_first() {
        let (handler, near, far, _) = seeded().await;
        let search = ShopSearch {
            near: Some(NearFilter::new(GeoPoint::new(48.8566, 2.3522).unwrap(), 20.0).unwrap()),
            status: None,
            ..ShopSearch::default()
        };

        let page = handler
            .search(SearchShopsQuery {
                actor: None,
                search,
            })
            .await
            .unwrap();

        let ids: Vec<_> = page.items.iter().map(|h| *h.shop.id()).collect();
        assert_eq!(ids, vec![*near.id(), *far.id()]);
        assert!(page.items[0].distance_km.unwrap() < 0.01);
    }

    #[tokio::test]
    async fn owner_sees_own_pending_shop() {
        let (handler, _, _, pending) = seeded().await;
        let owner = AuthenticatedUser::new(
            *pending.owner_id(),
            PhoneNumber::parse("+15551234567").unwrap(),
            Role::ShopOwner,
        );

        let page = handler
            .search(SearchShopsQuery {
                actor: Some(owner.clone()),
                search: ShopSearch {
                    owner_id: Some(owner.id),
                    status: None,
                    ..ShopSearch::default()
                },
            })
            .await
            .unwrap();
        assert_eq!(page.total, 1);

        let fetched = handler
            .get(GetShopQuery {
                actor: Some(owner),
                shop_id: *pending.id(),
            })
            .await
            .unwrap();
        assert_eq!(fetched.id(), pending.id());
    }

    #[tokio::test]
    async fn pending_shop_is_hidden_from_public() {
        let (handler, _, _, pending) = seeded().await;
        let err = handler
            .get(GetShopQuery {
                actor: None,
                shop_id: *pending.id(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ShopNotFound);
    }
}
