//! ManageTransactionHandler - Complete, cancel or refund a transaction.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, DomainError, ErrorCode, TransactionId};
use crate::domain::transaction::Transaction;
use crate::ports::{ShopRepository, TransactionRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionAction {
    Complete,
    Cancel,
    Refund,
}

#[derive(Debug, Clone)]
pub struct ManageTransactionCommand {
    pub actor: AuthenticatedUser,
    pub transaction_id: TransactionId,
    pub action: TransactionAction,
}

/// Status changes are made by the shop's owner or an admin.
pub struct ManageTransactionHandler {
    transactions: Arc<dyn TransactionRepository>,
    shops: Arc<dyn ShopRepository>,
}

impl ManageTransactionHandler {
    pub fn new(transactions: Arc<dyn TransactionRepository>, shops: Arc<dyn ShopRepository>) -> Self {
        Self { transactions, shops }
    }

    pub async fn handle(&self, cmd: ManageTransactionCommand) -> Result<Transaction, DomainError> {
        let mut tx = self
            .transactions
            .find_by_id(&cmd.transaction_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(ErrorCode::TransactionNotFound, "Transaction", cmd.transaction_id)
            })?;

        if !cmd.actor.is_admin() {
            let shop = self
                .shops
                .find_by_id(tx.shop_id())
                .await?
                .ok_or_else(|| DomainError::not_found(ErrorCode::ShopNotFound, "Shop", tx.shop_id()))?;
            shop.authorize_manage(&cmd.actor.id, false)?;
        }

        match cmd.action {
            TransactionAction::Complete => tx.complete()?,
            TransactionAction::Cancel => tx.cancel()?,
            TransactionAction::Refund => tx.refund()?,
        }
        self.transactions.update(&tx).await?;

        tracing::info!(
            transaction_id = %tx.id(),
            status = tx.status().as_str(),
            actor = %cmd.actor.id,
            "Transaction status changed"
        );
        Ok(tx)
    }
}
