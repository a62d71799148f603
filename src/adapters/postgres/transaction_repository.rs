//! PostgreSQL implementation of TransactionRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::support::{corrupt, count, db_error, money, opt_dt, opt_ts, parse_column, ts};
use crate::domain::foundation::{
    DiscountRuleId, DomainError, ErrorCode, Page, ShopId, TransactionId, UserId,
};
use crate::domain::transaction::{Transaction, TransactionFilter};
use crate::domain::user::CardNumber;
use crate::ports::TransactionRepository;

const TRANSACTION_COLUMNS: &str = "id, user_id, shop_id, card_number, original_amount_cents, \
     discount_amount_cents, final_amount_cents, applied_rule_id, status, note, recorded_by, \
     created_at, updated_at, completed_at";

pub struct PostgresTransactionRepository {
    pool: PgPool,
}

impl PostgresTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: Uuid,
    user_id: Uuid,
    shop_id: Uuid,
    card_number: String,
    original_amount_cents: i64,
    discount_amount_cents: i64,
    final_amount_cents: i64,
    applied_rule_id: Option<Uuid>,
    status: String,
    note: Option<String>,
    recorded_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = DomainError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        Ok(Transaction::reconstitute(
            TransactionId::from_uuid(row.id),
            UserId::from_uuid(row.user_id),
            ShopId::from_uuid(row.shop_id),
            CardNumber::parse(&row.card_number).map_err(|e| corrupt("card_number", e))?,
            money("original_amount_cents", row.original_amount_cents)?,
            money("discount_amount_cents", row.discount_amount_cents)?,
            money("final_amount_cents", row.final_amount_cents)?,
            row.applied_rule_id.map(DiscountRuleId::from_uuid),
            parse_column("status", &row.status)?,
            row.note,
            UserId::from_uuid(row.recorded_by),
            ts(row.created_at),
            ts(row.updated_at),
            opt_ts(row.completed_at),
        ))
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &TransactionFilter) {
    qb.push(" WHERE TRUE");
    if let Some(user_id) = filter.user_id {
        qb.push(" AND user_id = ").push_bind(*user_id.as_uuid());
    }
    if let Some(shop_id) = filter.shop_id {
        qb.push(" AND shop_id = ").push_bind(*shop_id.as_uuid());
    }
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(range) = filter.range {
        qb.push(" AND created_at >= ")
            .push_bind(*range.start().as_datetime())
            .push(" AND created_at < ")
            .push_bind(*range.end_exclusive().as_datetime());
    }
}

#[async_trait]
impl TransactionRepository for PostgresTransactionRepository {
    async fn save(&self, tx: &Transaction) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, user_id, shop_id, card_number, original_amount_cents,
                discount_amount_cents, final_amount_cents, applied_rule_id, status, note,
                recorded_by, created_at, updated_at, completed_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(tx.id().as_uuid())
        .bind(tx.user_id().as_uuid())
        .bind(tx.shop_id().as_uuid())
        .bind(tx.card_number().as_str())
        .bind(tx.original_amount().cents())
        .bind(tx.discount_amount().cents())
        .bind(tx.final_amount().cents())
        .bind(tx.applied_rule_id().map(|id| *id.as_uuid()))
        .bind(tx.status().as_str())
        .bind(tx.note())
        .bind(tx.recorded_by().as_uuid())
        .bind(tx.created_at().as_datetime())
        .bind(tx.updated_at().as_datetime())
        .bind(opt_dt(tx.completed_at()))
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to save transaction", e))?;

        Ok(())
    }

    /// Only lifecycle fields change after recording; amounts are immutable.
    async fn update(&self, tx: &Transaction) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE transactions SET
                status = $2,
                updated_at = $3,
                completed_at = $4
            WHERE id = $1
            "#,
        )
        .bind(tx.id().as_uuid())
        .bind(tx.status().as_str())
        .bind(tx.updated_at().as_datetime())
        .bind(opt_dt(tx.completed_at()))
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update transaction", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(
                ErrorCode::TransactionNotFound,
                "Transaction",
                tx.id(),
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &TransactionId) -> Result<Option<Transaction>, DomainError> {
        let sql = format!("SELECT {} FROM transactions WHERE id = $1", TRANSACTION_COLUMNS);
        let row: Option<TransactionRow> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find transaction", e))?;

        row.map(Transaction::try_from).transpose()
    }

    async fn list(&self, filter: &TransactionFilter) -> Result<Page<Transaction>, DomainError> {
        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM transactions");
        push_filter(&mut count_qb, filter);
        let (total,): (i64,) = count_qb
            .build_query_as()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count transactions", e))?;

        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM transactions",
            TRANSACTION_COLUMNS
        ));
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC, id ASC LIMIT ")
            .push_bind(filter.page.limit() as i64)
            .push(" OFFSET ")
            .push_bind(filter.page.offset() as i64);

        let rows: Vec<TransactionRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list transactions", e))?;

        let items = rows
            .into_iter()
            .map(Transaction::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, count(total), filter.page))
    }
}
