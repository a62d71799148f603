//! In-memory user repository.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, Page, PhoneNumber, UserId};
use crate::domain::user::{CardNumber, User};
use crate::ports::{UserFilter, UserRepository};

#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every stored user.
    pub async fn all(&self) -> Vec<User> {
        self.users.read().await.values().cloned().collect()
    }

    fn check_unique(users: &HashMap<UserId, User>, user: &User) -> Result<(), DomainError> {
        for other in users.values().filter(|u| u.id() != user.id()) {
            if other.phone() == user.phone() {
                return Err(DomainError::new(
                    ErrorCode::PhoneAlreadyRegistered,
                    "Phone number is already registered",
                ));
            }
            if let (Some(a), Some(b)) = (other.card(), user.card()) {
                if a.number() == b.number() {
                    return Err(DomainError::new(
                        ErrorCode::CardAlreadyIssued,
                        "Card number is already issued",
                    ));
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn save(&self, user: &User) -> Result<(), DomainError> {
        let mut users = self.users.write().await;
        Self::check_unique(&users, user)?;
        users.insert(*user.id(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        let mut users = self.users.write().await;
        let stored = users
            .get(user.id())
            .ok_or_else(|| DomainError::not_found(ErrorCode::UserNotFound, "User", user.id()))?;
        if stored.version() != user.version() {
            return Err(DomainError::concurrent_modification("User", user.id()));
        }
        Self::check_unique(&users, user)?;
        users.insert(*user.id(), user.clone().with_version(user.version() + 1));
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_phone(&self, phone: &PhoneNumber) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.phone() == phone)
            .cloned())
    }

    async fn find_by_card_number(&self, number: &CardNumber) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.card().map_or(false, |c| c.number() == number))
            .cloned())
    }

    async fn list(&self, filter: &UserFilter) -> Result<Page<User>, DomainError> {
        let mut matched: Vec<User> = self
            .users
            .read()
            .await
            .values()
            .filter(|u| filter.matches(u))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at().cmp(a.created_at()).then(a.id().cmp(b.id())));
        Ok(filter.page.paginate(matched))
    }
}
