//! User queries: fetch one user, list users, fetch the caller's card.

use std::sync::Arc;

use crate::application::handlers::access::require_admin;
use crate::domain::foundation::{AuthenticatedUser, DomainError, ErrorCode, Page, UserId};
use crate::domain::user::{DiscountCard, User};
use crate::ports::{UserFilter, UserRepository};

#[derive(Debug, Clone)]
pub struct GetUserQuery {
    pub actor: AuthenticatedUser,
    pub user_id: UserId,
}

#[derive(Debug, Clone)]
pub struct ListUsersQuery {
    pub actor: AuthenticatedUser,
    pub filter: UserFilter,
}

#[derive(Debug, Clone)]
pub struct GetCardQuery {
    pub user_id: UserId,
}

/// Read-side handler for users and their cards.
pub struct GetUserHandler {
    users: Arc<dyn UserRepository>,
}

impl GetUserHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Admins may read anyone; other users only themselves.
    pub async fn get(&self, query: GetUserQuery) -> Result<User, DomainError> {
        if !query.actor.is_self_or_admin(&query.user_id) {
            return Err(DomainError::forbidden("Cannot view another user"));
        }
        self.load(&query.user_id).await
    }

    pub async fn list(&self, query: ListUsersQuery) -> Result<Page<User>, DomainError> {
        require_admin(&query.actor)?;
        self.users.list(&query.filter).await
    }

    pub async fn card(&self, query: GetCardQuery) -> Result<DiscountCard, DomainError> {
        let user = self.load(&query.user_id).await?;
        user.card()
            .cloned()
            .ok_or_else(|| DomainError::not_found(ErrorCode::CardNotFound, "Card", query.user_id))
    }

    async fn load(&self, id: &UserId) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(ErrorCode::UserNotFound, "User", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryUserRepository;
    use crate::domain::foundation::{PhoneNumber, Role};

    fn actor(user: &User) -> AuthenticatedUser {
        AuthenticatedUser::new(*user.id(), user.phone().clone(), user.role())
    }

    async fn seeded() -> (GetUserHandler, User, User) {
        let repo = InMemoryUserRepository::new();
        let alice = User::register(PhoneNumber::parse("+15550000001").unwrap(), Role::Customer);
        let admin = User::register(PhoneNumber::parse("+15550000002").unwrap(), Role::Admin);
        repo.save(&alice).await.unwrap();
        repo.save(&admin).await.unwrap();
        (GetUserHandler::new(Arc::new(repo)), alice, admin)
    }

    #[tokio::test]
    async fn user_can_read_self_but_not_others() {
        let (handler, alice, admin) = seeded().await;

        let me = handler
            .get(GetUserQuery {
                actor: actor(&alice),
                user_id: *alice.id(),
            })
            .await
            .unwrap();
        assert_eq!(me.id(), alice.id());

        let err = handler
            .get(GetUserQuery {
                actor: actor(&alice),
                user_id: *admin.id(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn listing_requires_admin() {
        let (handler, alice, admin) = seeded().await;

        let page = handler
            .list(ListUsersQuery {
                actor: actor(&admin),
                filter: UserFilter::default(),
            })
            .await
            .unwrap();
        assert_eq!(page.total, 2);

        assert!(handler
            .list(ListUsersQuery {
                actor: actor(&alice),
                filter: UserFilter::default(),
            })
            .await
            .is_err());
    }

    #[tokio::test]
    async fn missing_card_is_not_found() {
        let (handler, alice, _) = seeded().await;
        let err = handler
            .card(GetCardQuery {
                user_id: *alice.id(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CardNotFound);
    }
}
