//! HTTP DTOs for card transactions.

use serde::{Deserialize, Serialize};

use crate::adapters::http::dto::{rfc3339, PageParams, RangeParams};
use crate::domain::transaction::{Transaction, TransactionStatus};

/// POST /transactions
#[derive(Debug, Clone, Deserialize)]
pub struct RecordTransactionRequest {
    pub shop_id: String,
    pub card_number: String,
    pub amount_cents: i64,
    #[serde(default)]
    pub note: Option<String>,
}

/// Query string shared by every transaction listing.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ListTransactionsParams {
    #[serde(default)]
    pub status: Option<TransactionStatus>,
    #[serde(default)]
    pub from: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub to: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

impl ListTransactionsParams {
    pub fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            per_page: self.per_page,
        }
    }

    pub fn range_params(&self) -> RangeParams {
        RangeParams {
            from: self.from,
            to: self.to,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionResponse {
    pub id: String,
    pub user_id: String,
    pub shop_id: String,
    pub card_number: String,
    pub original_amount_cents: i64,
    pub discount_amount_cents: i64,
    pub final_amount_cents: i64,
    pub applied_rule_id: Option<String>,
    pub status: TransactionStatus,
    pub note: Option<String>,
    pub recorded_by: String,
    pub created_at: String,
    pub updated_at: String,
    pub completed_at: Option<String>,
}

impl From<&Transaction> for TransactionResponse {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id().to_string(),
            user_id: tx.user_id().to_string(),
            shop_id: tx.shop_id().to_string(),
            card_number: tx.card_number().masked(),
            original_amount_cents: tx.original_amount().cents(),
            discount_amount_cents: tx.discount_amount().cents(),
            final_amount_cents: tx.final_amount().cents(),
            applied_rule_id: tx.applied_rule_id().map(|id| id.to_string()),
            status: tx.status(),
            note: tx.note().map(str::to_string),
            recorded_by: tx.recorded_by().to_string(),
            created_at: rfc3339(tx.created_at()),
            updated_at: rfc3339(tx.updated_at()),
            completed_at: tx.completed_at().map(rfc3339),
        }
    }
}

impl From<Transaction> for TransactionResponse {
    fn from(tx: Transaction) -> Self {
        Self::from(&tx)
    }
}
