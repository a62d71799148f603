//! RecordTransactionHandler - Records a card purchase at a shop.

use std::sync::Arc;

use crate::application::handlers::discount::{PurchaseQuote, QuoteDiscountCommand, QuoteDiscountHandler};
use crate::domain::foundation::{AuthenticatedUser, DomainError, Money, ShopId, Timestamp};
use crate::domain::transaction::Transaction;
use crate::domain::user::CardNumber;
use crate::ports::TransactionRepository;

#[derive(Debug, Clone)]
pub struct RecordTransactionCommand {
    pub actor: AuthenticatedUser,
    pub shop_id: ShopId,
    pub card_number: CardNumber,
    pub amount: Money,
    pub note: Option<String>,
}

pub struct RecordTransactionHandler {
    transactions: Arc<dyn TransactionRepository>,
    quotes: QuoteDiscountHandler,
}

impl RecordTransactionHandler {
    pub fn new(transactions: Arc<dyn TransactionRepository>, quotes: QuoteDiscountHandler) -> Self {
        Self { transactions, quotes }
    }

    pub async fn handle(&self, cmd: RecordTransactionCommand) -> Result<Transaction, DomainError> {
        // 1. Same resolution as a quote: shop, caller, card, rules
        let quote: PurchaseQuote = self
            .quotes
            .quote_at(
                QuoteDiscountCommand {
                    actor: cmd.actor.clone(),
                    shop_id: cmd.shop_id,
                    card_number: cmd.card_number.clone(),
                    amount: cmd.amount,
                },
                Timestamp::now(),
            )
            .await?;

        // 2. Record as pending with the winning discount
        let tx = Transaction::record(
            *quote.holder.id(),
            *quote.shop.id(),
            cmd.card_number,
            cmd.amount,
            quote.best.as_ref(),
            cmd.note,
            cmd.actor.id,
        )?;

        // 3. Persist
        self.transactions.save(&tx).await?;

        tracing::info!(
            transaction_id = %tx.id(),
            shop_id = %tx.shop_id(),
            original_cents = tx.original_amount().cents(),
            discount_cents = tx.discount_amount().cents(),
            rule_id = ?tx.applied_rule_id(),
            "Transaction recorded"
        );
        Ok(tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryTransactionRepository;
    use crate::application::handlers::discount::fixtures::store;
    use crate::domain::foundation::ErrorCode;
    use crate::domain::transaction::TransactionStatus;

    fn cents(c: i64) -> Money {
        Money::from_cents(c).unwrap()
    }

    #[tokio::test]
    async fn records_pending_transaction_with_best_discount() {
        let s = store().await;
        let repo = InMemoryTransactionRepository::new();
        let handler = RecordTransactionHandler::new(Arc::new(repo.clone()), s.quoter());

        let tx = handler
            .handle(RecordTransactionCommand {
                actor: s.owner.clone(),
                shop_id: *s.shop.id(),
                card_number: s.card_number.clone(),
                amount: cents(2500),
                note: Some("  table 4 ".into()),
            })
            .await
            .unwrap();

        assert_eq!(tx.status(), TransactionStatus::Pending);
        assert_eq!(tx.user_id(), s.holder.id());
        assert_eq!(tx.discount_amount(), cents(300));
        assert_eq!(tx.final_amount(), cents(2200));
        assert_eq!(tx.note(), Some("table 4"));
        assert_eq!(tx.recorded_by(), &s.owner.id);
        assert!(repo.find_by_id(tx.id()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn tiny_purchase_rounds_discount_to_nothing() {
        let s = store().await;
        let handler = RecordTransactionHandler::new(
            Arc::new(InMemoryTransactionRepository::new()),
            s.quoter(),
        );

        // 10% of 5 cents floors to zero, which is never applied
        let tx = handler
            .handle(RecordTransactionCommand {
                actor: s.owner.clone(),
                shop_id: *s.shop.id(),
                card_number: s.card_number.clone(),
                amount: cents(5),
                note: None,
            })
            .await
            .unwrap();
        assert_eq!(tx.discount_amount(), Money::ZERO);
        assert!(tx.applied_rule_id().is_none());
    }

    #[tokio::test]
    async fn zero_amount_is_rejected() {
        let s = store().await;
        let handler = RecordTransactionHandler::new(
            Arc::new(InMemoryTransactionRepository::new()),
            s.quoter(),
        );
        let err = handler
            .handle(RecordTransactionCommand {
                actor: s.owner.clone(),
                shop_id: *s.shop.id(),
                card_number: s.card_number.clone(),
                amount: Money::ZERO,
                note: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
