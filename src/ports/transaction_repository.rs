//! Transaction repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Page, TransactionId};
use crate::domain::transaction::{Transaction, TransactionFilter};

#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn save(&self, tx: &Transaction) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `TransactionNotFound` if the transaction doesn't exist
    async fn update(&self, tx: &Transaction) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &TransactionId) -> Result<Option<Transaction>, DomainError>;

    /// Matching transactions, newest first.
    async fn list(&self, filter: &TransactionFilter) -> Result<Page<Transaction>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn TransactionRepository) {}
    }
}
