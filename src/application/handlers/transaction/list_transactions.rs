//! Transaction queries: the caller's own purchases, a shop's sales, or all.

use std::sync::Arc;

use crate::application::handlers::access::require_admin;
use crate::domain::foundation::{
    AuthenticatedUser, DateRange, DomainError, ErrorCode, Page, PageRequest, ShopId, TransactionId,
};
use crate::domain::transaction::{Transaction, TransactionFilter, TransactionStatus};
use crate::ports::{ShopRepository, TransactionRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionScope {
    /// Purchases made with the caller's card.
    Mine,
    /// Sales at one shop; owner or admin.
    Shop(ShopId),
    /// Everything; admin only.
    All,
}

#[derive(Debug, Clone)]
pub struct ListTransactionsQuery {
    pub actor: AuthenticatedUser,
    pub scope: TransactionScope,
    pub status: Option<TransactionStatus>,
    pub range: Option<DateRange>,
    pub page: PageRequest,
}

#[derive(Debug, Clone)]
pub struct GetTransactionQuery {
    pub actor: AuthenticatedUser,
    pub transaction_id: TransactionId,
}

pub struct ListTransactionsHandler {
    transactions: Arc<dyn TransactionRepository>,
    shops: Arc<dyn ShopRepository>,
}

impl ListTransactionsHandler {
    pub fn new(transactions: Arc<dyn TransactionRepository>, shops: Arc<dyn ShopRepository>) -> Self {
        Self { transactions, shops }
    }

    pub async fn list(&self, query: ListTransactionsQuery) -> Result<Page<Transaction>, DomainError> {
        let mut filter = TransactionFilter {
            status: query.status,
            range: query.range,
            page: query.page,
            ..TransactionFilter::default()
        };

        match query.scope {
            TransactionScope::Mine => filter.user_id = Some(query.actor.id),
            TransactionScope::Shop(shop_id) => {
                self.authorize_shop(&query.actor, &shop_id).await?;
                filter.shop_id = Some(shop_id);
            }
            TransactionScope::All => require_admin(&query.actor)?,
        }

        self.transactions.list(&filter).await
    }

    /// Visible to the card holder, the shop's owner and admins.
    pub async fn get(&self, query: GetTransactionQuery) -> Result<Transaction, DomainError> {
        let tx = self
            .transactions
            .find_by_id(&query.transaction_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(ErrorCode::TransactionNotFound, "Transaction", query.transaction_id)
            })?;

        if query.actor.is_admin() || tx.user_id() == &query.actor.id {
            return Ok(tx);
        }
        self.authorize_shop(&query.actor, tx.shop_id()).await?;
        Ok(tx)
    }

    async fn authorize_shop(&self, actor: &AuthenticatedUser, shop_id: &ShopId) -> Result<(), DomainError> {
        let shop = self
            .shops
            .find_by_id(shop_id)
            .await?
            .ok_or_else(|| DomainError::not_found(ErrorCode::ShopNotFound, "Shop", shop_id))?;
        shop.authorize_manage(&actor.id, actor.is_admin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryTransactionRepository;
    use crate::application::handlers::discount::fixtures::{store, Store};
    use crate::domain::foundation::{Money, PhoneNumber, Role, UserId};

    async fn seeded() -> (ListTransactionsHandler, Store, Vec<Transaction>) {
        let s = store().await;
        let repo = InMemoryTransactionRepository::new();
        let mut txs = Vec::new();
        for cents in [500, 700, 900] {
            let tx = Transaction::record(
                *s.holder.id(),
                *s.shop.id(),
                s.card_number.clone(),
                Money::from_cents(cents).unwrap(),
                None,
                None,
                s.owner.id,
            )
            .unwrap();
            repo.save(&tx).await.unwrap();
            txs.push(tx);
        }
        let handler = ListTransactionsHandler::new(Arc::new(repo), Arc::new(s.shops.clone()));
        (handler, s, txs)
    }

    fn holder(s: &Store) -> AuthenticatedUser {
        AuthenticatedUser::new(*s.holder.id(), s.holder.phone().clone(), Role::Customer)
    }

    fn stranger() -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new(), PhoneNumber::parse("+15553333333").unwrap(), Role::Customer)
    }

    fn query(actor: AuthenticatedUser, scope: TransactionScope) -> ListTransactionsQuery {
        ListTransactionsQuery {
            actor,
            scope,
            status: None,
            range: None,
            page: PageRequest::default(),
        }
    }

    #[tokio::test]
    async fn holder_lists_own_purchases() {
        let (handler, s, _) = seeded().await;
        let page = handler.list(query(holder(&s), TransactionScope::Mine)).await.unwrap();
        assert_eq!(page.total, 3);

        let none = handler.list(query(stranger(), TransactionScope::Mine)).await.unwrap();
        assert_eq!(none.total, 0);
    }

    #[tokio::test]
    async fn shop_listing_requires_owner() {
        let (handler, s, _) = seeded().await;
        let page = handler
            .list(query(s.owner.clone(), TransactionScope::Shop(*s.shop.id())))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 3);

        let err = handler
            .list(query(stranger(), TransactionScope::Shop(*s.shop.id())))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn listing_everything_is_admin_only() {
        let (handler, s, _) = seeded().await;
        let err = handler.list(query(s.owner.clone(), TransactionScope::All)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn status_filter_applies() {
        let (handler, s, _) = seeded().await;
        let mut q = query(holder(&s), TransactionScope::Mine);
        q.status = Some(TransactionStatus::Completed);
        assert_eq!(handler.list(q).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn get_is_limited_to_participants() {
        let (handler, s, txs) = seeded().await;
        let id = *txs[0].id();

        for actor in [holder(&s), s.owner.clone()] {
            let tx = handler
                .get(GetTransactionQuery {
                    actor,
                    transaction_id: id,
                })
                .await
                .unwrap();
            assert_eq!(tx.id(), &id);
        }

        let err = handler
            .get(GetTransactionQuery {
                actor: stranger(),
                transaction_id: id,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }
}
