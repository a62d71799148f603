//! In-memory transaction repository.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, Page, TransactionId};
use crate::domain::transaction::{Transaction, TransactionFilter};
use crate::ports::TransactionRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemoryTransactionRepository {
    transactions: Arc<RwLock<HashMap<TransactionId, Transaction>>>,
}

impl InMemoryTransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<Transaction> {
        self.transactions.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    async fn save(&self, tx: &Transaction) -> Result<(), DomainError> {
        self.transactions.write().await.insert(*tx.id(), tx.clone());
        Ok(())
    }

    async fn update(&self, tx: &Transaction) -> Result<(), DomainError> {
        let mut transactions = self.transactions.write().await;
        let existing = transactions.get_mut(tx.id()).ok_or_else(|| {
            DomainError::not_found(ErrorCode::TransactionNotFound, "Transaction", tx.id())
        })?;
        *existing = tx.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: &TransactionId) -> Result<Option<Transaction>, DomainError> {
        Ok(self.transactions.read().await.get(id).cloned())
    }

    async fn list(&self, filter: &TransactionFilter) -> Result<Page<Transaction>, DomainError> {
        let mut matched: Vec<Transaction> = self
            .transactions
            .read()
            .await
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at().cmp(a.created_at()).then(a.id().cmp(b.id())));
        Ok(filter.page.paginate(matched))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Money, ShopId, UserId};
    use crate::domain::transaction::TransactionStatus;
    use crate::domain::user::CardNumber;

    fn tx(user: UserId, shop: ShopId) -> Transaction {
        Transaction::record(
            user,
            shop,
            CardNumber::generate(),
            Money::from_cents(1_000).unwrap(),
            None,
            None,
            UserId::new(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn list_filters_by_user_and_status() {
        let repo = InMemoryTransactionRepository::new();
        let user = UserId::new();
        let shop = ShopId::new();
        let mut done = tx(user, shop);
        done.complete().unwrap();
        repo.save(&done).await.unwrap();
        repo.save(&tx(user, shop)).await.unwrap();
        repo.save(&tx(UserId::new(), shop)).await.unwrap();

        let mine = repo
            .list(&TransactionFilter {
                user_id: Some(user),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(mine.total, 2);

        let completed = repo
            .list(&TransactionFilter {
                user_id: Some(user),
                status: Some(TransactionStatus::Completed),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(completed.total, 1);
        assert_eq!(completed.items[0].id(), done.id());
    }

    #[tokio::test]
    async fn update_persists_status_change() {
        let repo = InMemoryTransactionRepository::new();
        let mut t = tx(UserId::new(), ShopId::new());
        repo.save(&t).await.unwrap();

        t.cancel().unwrap();
        repo.update(&t).await.unwrap();

        let stored = repo.find_by_id(t.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), TransactionStatus::Cancelled);
    }
}
