//! CreateShopHandler - Registers a shop pending admin approval.

use std::sync::Arc;

use crate::application::handlers::access::require_merchant;
use crate::domain::foundation::{AuthenticatedUser, DomainError, ErrorCode, UserId};
use crate::domain::shop::{Shop, ShopDetails};
use crate::ports::{ShopRepository, UserRepository};

#[derive(Debug, Clone)]
pub struct CreateShopCommand {
    pub actor: AuthenticatedUser,
    pub details: ShopDetails,
    /// Admins may register a shop on behalf of an owner.
    pub owner_id: Option<UserId>,
}

pub struct CreateShopHandler {
    shops: Arc<dyn ShopRepository>,
    users: Arc<dyn UserRepository>,
}

impl CreateShopHandler {
    pub fn new(shops: Arc<dyn ShopRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { shops, users }
    }

    pub async fn handle(&self, cmd: CreateShopCommand) -> Result<Shop, DomainError> {
        require_merchant(&cmd.actor)?;

        let owner_id = match cmd.owner_id {
            Some(owner) if owner != cmd.actor.id => {
                if !cmd.actor.is_admin() {
                    return Err(DomainError::forbidden("Only admins can register shops for others"));
                }
                if self.users.find_by_id(&owner).await?.is_none() {
                    return Err(DomainError::not_found(ErrorCode::UserNotFound, "User", owner));
                }
                owner
            }
            _ => cmd.actor.id,
        };

        let shop = Shop::register(owner_id, cmd.details)?;
        self.shops.save(&shop).await?;

        tracing::info!(shop_id = %shop.id(), owner_id = %owner_id, "Shop registered");
        Ok(shop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryShopRepository, InMemoryUserRepository};
    use crate::domain::foundation::{GeoPoint, PhoneNumber, Role};
    use crate::domain::shop::{ShopCategory, ShopStatus};

    fn details(name: &str) -> ShopDetails {
        ShopDetails {
            name: name.into(),
            description: None,
            category: ShopCategory::Cafe,
            address: "1 Main St".into(),
            location: GeoPoint::new(40.0, -73.0).unwrap(),
            phone: None,
        }
    }

    fn actor(role: Role) -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new(), PhoneNumber::parse("+15551234567").unwrap(), role)
    }

    fn handler() -> (CreateShopHandler, InMemoryShopRepository) {
        let shops = InMemoryShopRepository::new();
        let handler =
            CreateShopHandler::new(Arc::new(shops.clone()), Arc::new(InMemoryUserRepository::new()));
        (handler, shops)
    }

    #[tokio::test]
    async fn owner_registers_pending_shop() {
        let (handler, shops) = handler();
        let owner = actor(Role::ShopOwner);

        let shop = handler
            .handle(CreateShopCommand {
                actor: owner.clone(),
                details: details("Bean There"),
                owner_id: None,
            })
            .await
            .unwrap();

        assert_eq!(shop.status(), ShopStatus::Pending);
        assert_eq!(shop.owner_id(), &owner.id);
        assert!(shops.find_by_id(shop.id()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn customers_cannot_register_shops() {
        let (handler, _) = handler();
        let err = handler
            .handle(CreateShopCommand {
                actor: actor(Role::Customer),
                details: details("Nope"),
                owner_id: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn owner_cannot_register_for_someone_else() {
        let (handler, _) = handler();
        let err = handler
            .handle(CreateShopCommand {
                actor: actor(Role::ShopOwner),
                details: details("Proxy"),
                owner_id: Some(UserId::new()),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let (handler, _) = handler();
        let err = handler
            .handle(CreateShopCommand {
                actor: actor(Role::ShopOwner),
                details: details("   "),
                owner_id: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
