//! Shop repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Page, ShopId};
use crate::domain::shop::{Shop, ShopHit, ShopSearch};

#[async_trait]
pub trait ShopRepository: Send + Sync {
    async fn save(&self, shop: &Shop) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `ShopNotFound` if the shop doesn't exist
    async fn update(&self, shop: &Shop) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &ShopId) -> Result<Option<Shop>, DomainError>;

    /// Runs a search. Ordering and filtering follow `ShopSearch::matches`
    /// and `ShopSearch::sort_results`.
    async fn search(&self, search: &ShopSearch) -> Result<Page<ShopHit>, DomainError>;
}
