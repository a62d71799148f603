//! ManageShopHandler - Edits and lifecycle transitions for a shop.

use std::sync::Arc;

use crate::application::handlers::access::require_admin;
use crate::domain::foundation::{AuthenticatedUser, DomainError, ErrorCode, ShopId};
use crate::domain::shop::{Shop, ShopDetails};
use crate::ports::ShopRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopAction {
    /// Admin only.
    Approve,
    /// Admin only.
    Suspend,
    /// Admin only.
    Reinstate,
    /// Owner or admin.
    Close,
}

#[derive(Debug, Clone)]
pub struct UpdateShopCommand {
    pub actor: AuthenticatedUser,
    pub shop_id: ShopId,
    pub details: ShopDetails,
}

#[derive(Debug, Clone)]
pub struct ChangeShopStatusCommand {
    pub actor: AuthenticatedUser,
    pub shop_id: ShopId,
    pub action: ShopAction,
}

pub struct ManageShopHandler {
    shops: Arc<dyn ShopRepository>,
}

impl ManageShopHandler {
    pub fn new(shops: Arc<dyn ShopRepository>) -> Self {
        Self { shops }
    }

    pub async fn update(&self, cmd: UpdateShopCommand) -> Result<Shop, DomainError> {
        let mut shop = self.load(&cmd.shop_id).await?;
        shop.authorize_manage(&cmd.actor.id, cmd.actor.is_admin())?;

        shop.update_details(cmd.details)?;
        self.shops.update(&shop).await?;
        Ok(shop)
    }

    pub async fn change_status(&self, cmd: ChangeShopStatusCommand) -> Result<Shop, DomainError> {
        let mut shop = self.load(&cmd.shop_id).await?;

        match cmd.action {
            ShopAction::Approve => {
                require_admin(&cmd.actor)?;
                shop.approve()?;
            }
            ShopAction::Suspend => {
                require_admin(&cmd.actor)?;
                shop.suspend()?;
            }
            ShopAction::Reinstate => {
                require_admin(&cmd.actor)?;
                shop.reinstate()?;
            }
            ShopAction::Close => {
                shop.authorize_manage(&cmd.actor.id, cmd.actor.is_admin())?;
                shop.close()?;
            }
        }
        self.shops.update(&shop).await?;

        tracing::info!(
            shop_id = %shop.id(),
            status = shop.status().as_str(),
            actor = %cmd.actor.id,
            "Shop status changed"
        );
        Ok(shop)
    }

    async fn load(&self, id: &ShopId) -> Result<Shop, DomainError> {
        self.shops
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(ErrorCode::ShopNotFound, "Shop", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryShopRepository;
    use crate::domain::foundation::{GeoPoint, PhoneNumber, Role, UserId};
    use crate::domain::shop::{ShopCategory, ShopStatus};

    fn details(name: &str) -> ShopDetails {
        ShopDetails {
            name: name.into(),
            description: Some("Fresh bread".into()),
            category: ShopCategory::Grocery,
            address: "2 Side St".into(),
            location: GeoPoint::new(51.5, -0.12).unwrap(),
            phone: None,
        }
    }

    fn person(id: UserId, role: Role) -> AuthenticatedUser {
        AuthenticatedUser::new(id, PhoneNumber::parse("+15551234567").unwrap(), role)
    }

    async fn seeded() -> (ManageShopHandler, Shop) {
        let repo = InMemoryShopRepository::new();
        let shop = Shop::register(UserId::new(), details("Bakery")).unwrap();
        repo.save(&shop).await.unwrap();
        (ManageShopHandler::new(Arc::new(repo)), shop)
    }

    fn status(shop: &Shop, actor: AuthenticatedUser, action: ShopAction) -> ChangeShopStatusCommand {
        ChangeShopStatusCommand {
            actor,
            shop_id: *shop.id(),
            action,
        }
    }

    #[tokio::test]
    async fn admin_approves_and_suspends() {
        let (handler, shop) = seeded().await;
        let admin = person(UserId::new(), Role::Admin);

        let approved = handler
            .change_status(status(&shop, admin.clone(), ShopAction::Approve))
            .await
            .unwrap();
        assert_eq!(approved.status(), ShopStatus::Active);

        let suspended = handler
            .change_status(status(&shop, admin.clone(), ShopAction::Suspend))
            .await
            .unwrap();
        assert_eq!(suspended.status(), ShopStatus::Suspended);

        let reinstated = handler
            .change_status(status(&shop, admin, ShopAction::Reinstate))
            .await
            .unwrap();
        assert!(reinstated.is_accepting_cards());
    }

    #[tokio::test]
    async fn owner_cannot_approve_own_shop() {
        let (handler, shop) = seeded().await;
        let owner = person(*shop.owner_id(), Role::ShopOwner);

        let err = handler
            .change_status(status(&shop, owner, ShopAction::Approve))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn owner_closes_shop_and_closed_is_terminal() {
        let (handler, shop) = seeded().await;
        let owner = person(*shop.owner_id(), Role::ShopOwner);

        handler
            .change_status(status(&shop, owner, ShopAction::Close))
            .await
            .unwrap();

        let err = handler
            .change_status(status(&shop, person(UserId::new(), Role::Admin), ShopAction::Approve))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[tokio::test]
    async fn stranger_cannot_edit() {
        let (handler, shop) = seeded().await;
        let err = handler
            .update(UpdateShopCommand {
                actor: person(UserId::new(), Role::ShopOwner),
                shop_id: *shop.id(),
                details: details("Hijacked"),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn owner_edits_details() {
        let (handler, shop) = seeded().await;
        let updated = handler
            .update(UpdateShopCommand {
                actor: person(*shop.owner_id(), Role::ShopOwner),
                shop_id: *shop.id(),
                details: details("Better Bakery"),
            })
            .await
            .unwrap();
        assert_eq!(updated.name(), "Better Bakery");
    }
}
