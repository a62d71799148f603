//! PostgreSQL implementation of AnalyticsReader.
//!
//! Aggregates in SQL over completed transactions. `SUM` over BIGINT yields
//! NUMERIC in Postgres, so every sum is cast back to BIGINT.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use super::support::{count, db_error, money, parse_column};
use crate::domain::analytics::{
    CategoryStats, DailyStats, PlatformOverview, ShopPerformance, ShopReport, MAX_TOP_SHOPS,
};
use crate::domain::foundation::{DateRange, DomainError, ErrorCode, ShopId, Timestamp};
use crate::domain::shop::ShopCategory;
use crate::ports::AnalyticsReader;

pub struct PostgresAnalyticsReader {
    pool: PgPool,
}

impl PostgresAnalyticsReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn daily(
        &self,
        range: &DateRange,
        shop_id: Option<&ShopId>,
    ) -> Result<Vec<DailyStats>, DomainError> {
        let rows: Vec<DailyRow> = sqlx::query_as(
            r#"
            SELECT (created_at AT TIME ZONE 'UTC')::DATE AS day,
                   COUNT(*) AS tx_count,
                   COALESCE(SUM(original_amount_cents), 0)::BIGINT AS gross_cents,
                   COALESCE(SUM(discount_amount_cents), 0)::BIGINT AS discount_cents
            FROM transactions
            WHERE status = 'completed'
              AND created_at >= $1 AND created_at < $2
              AND ($3::UUID IS NULL OR shop_id = $3)
            GROUP BY day
            ORDER BY day
            "#,
        )
        .bind(*range.start().as_datetime())
        .bind(*range.end_exclusive().as_datetime())
        .bind(shop_id.map(|id| *id.as_uuid()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load daily transactions", e))?;

        rows.into_iter().map(DailyStats::try_from).collect()
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OverviewRow {
    total_users: i64,
    new_users: i64,
    active_cards: i64,
    total_shops: i64,
    active_shops: i64,
    pending_shops: i64,
    transaction_count: i64,
    completed_count: i64,
    gross_cents: i64,
    discount_cents: i64,
    net_cents: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct DailyRow {
    day: NaiveDate,
    tx_count: i64,
    gross_cents: i64,
    discount_cents: i64,
}

impl TryFrom<DailyRow> for DailyStats {
    type Error = DomainError;

    fn try_from(row: DailyRow) -> Result<Self, Self::Error> {
        Ok(DailyStats {
            date: row.day,
            count: count(row.tx_count),
            gross: money("gross", row.gross_cents)?,
            discount: money("discount", row.discount_cents)?,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PerformanceRow {
    shop_id: Uuid,
    shop_name: String,
    tx_count: i64,
    gross_cents: i64,
    discount_cents: i64,
}

impl TryFrom<PerformanceRow> for ShopPerformance {
    type Error = DomainError;

    fn try_from(row: PerformanceRow) -> Result<Self, Self::Error> {
        Ok(ShopPerformance {
            shop_id: ShopId::from_uuid(row.shop_id),
            shop_name: row.shop_name,
            transaction_count: count(row.tx_count),
            gross_amount: money("gross", row.gross_cents)?,
            discount_amount: money("discount", row.discount_cents)?,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    category: String,
    shop_count: i64,
    tx_count: i64,
    discount_cents: i64,
}

#[async_trait]
impl AnalyticsReader for PostgresAnalyticsReader {
    async fn overview(&self, range: &DateRange) -> Result<PlatformOverview, DomainError> {
        let row: OverviewRow = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users) AS total_users,
                (SELECT COUNT(*) FROM users
                  WHERE created_at >= $1 AND created_at < $2) AS new_users,
                (SELECT COUNT(*) FROM users
                  WHERE card_status = 'active' AND card_expires_at > $3) AS active_cards,
                (SELECT COUNT(*) FROM shops) AS total_shops,
                (SELECT COUNT(*) FROM shops WHERE status = 'active') AS active_shops,
                (SELECT COUNT(*) FROM shops WHERE status = 'pending') AS pending_shops,
                COUNT(t.id) AS transaction_count,
                COUNT(t.id) FILTER (WHERE t.status = 'completed') AS completed_count,
                COALESCE(SUM(t.original_amount_cents)
                    FILTER (WHERE t.status = 'completed'), 0)::BIGINT AS gross_cents,
                COALESCE(SUM(t.discount_amount_cents)
                    FILTER (WHERE t.status = 'completed'), 0)::BIGINT AS discount_cents,
                COALESCE(SUM(t.final_amount_cents)
                    FILTER (WHERE t.status = 'completed'), 0)::BIGINT AS net_cents
            FROM transactions t
            WHERE t.created_at >= $1 AND t.created_at < $2
            "#,
        )
        .bind(*range.start().as_datetime())
        .bind(*range.end_exclusive().as_datetime())
        .bind(*Timestamp::now().as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load platform overview", e))?;

        Ok(PlatformOverview {
            total_users: count(row.total_users),
            new_users: count(row.new_users),
            total_shops: count(row.total_shops),
            active_shops: count(row.active_shops),
            pending_shops: count(row.pending_shops),
            active_cards: count(row.active_cards),
            transaction_count: count(row.transaction_count),
            completed_count: count(row.completed_count),
            gross_amount: money("gross", row.gross_cents)?,
            discount_amount: money("discount", row.discount_cents)?,
            net_amount: money("net", row.net_cents)?,
        })
    }

    async fn daily_transactions(&self, range: &DateRange) -> Result<Vec<DailyStats>, DomainError> {
        self.daily(range, None).await
    }

    async fn top_shops(
        &self,
        range: &DateRange,
        limit: u32,
    ) -> Result<Vec<ShopPerformance>, DomainError> {
        let limit = i64::from(limit.clamp(1, MAX_TOP_SHOPS));
        let rows: Vec<PerformanceRow> = sqlx::query_as(
            r#"
            SELECT s.id AS shop_id,
                   s.name AS shop_name,
                   COUNT(*) AS tx_count,
                   SUM(t.original_amount_cents)::BIGINT AS gross_cents,
                   SUM(t.discount_amount_cents)::BIGINT AS discount_cents
            FROM transactions t
            JOIN shops s ON s.id = t.shop_id
            WHERE t.status = 'completed'
              AND t.created_at >= $1 AND t.created_at < $2
            GROUP BY s.id, s.name
            ORDER BY gross_cents DESC, tx_count DESC, s.name COLLATE "C"
            LIMIT $3
            "#,
        )
        .bind(*range.start().as_datetime())
        .bind(*range.end_exclusive().as_datetime())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load top shops", e))?;

        rows.into_iter().map(ShopPerformance::try_from).collect()
    }

    async fn category_breakdown(
        &self,
        range: &DateRange,
    ) -> Result<Vec<CategoryStats>, DomainError> {
        let rows: Vec<CategoryRow> = sqlx::query_as(
            r#"
            SELECT s.category,
                   COUNT(DISTINCT s.id) AS shop_count,
                   COUNT(t.id) AS tx_count,
                   COALESCE(SUM(t.discount_amount_cents), 0)::BIGINT AS discount_cents
            FROM shops s
            LEFT JOIN transactions t
                   ON t.shop_id = s.id
                  AND t.status = 'completed'
                  AND t.created_at >= $1 AND t.created_at < $2
            GROUP BY s.category
            "#,
        )
        .bind(*range.start().as_datetime())
        .bind(*range.end_exclusive().as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load category breakdown", e))?;

        let mut stats = rows
            .into_iter()
            .map(|row| {
                Ok(CategoryStats {
                    category: parse_column::<ShopCategory>("category", &row.category)?,
                    shop_count: count(row.shop_count),
                    transaction_count: count(row.tx_count),
                    discount_amount: money("discount", row.discount_cents)?,
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;
        stats.sort_by_key(|s| s.category);
        Ok(stats)
    }

    async fn shop_report(
        &self,
        shop_id: &ShopId,
        range: &DateRange,
    ) -> Result<ShopReport, DomainError> {
        let row: Option<PerformanceRow> = sqlx::query_as(
            r#"
            SELECT s.id AS shop_id,
                   s.name AS shop_name,
                   COUNT(t.id) AS tx_count,
                   COALESCE(SUM(t.original_amount_cents), 0)::BIGINT AS gross_cents,
                   COALESCE(SUM(t.discount_amount_cents), 0)::BIGINT AS discount_cents
            FROM shops s
            LEFT JOIN transactions t
                   ON t.shop_id = s.id
                  AND t.status = 'completed'
                  AND t.created_at >= $2 AND t.created_at < $3
            WHERE s.id = $1
            GROUP BY s.id, s.name
            "#,
        )
        .bind(shop_id.as_uuid())
        .bind(*range.start().as_datetime())
        .bind(*range.end_exclusive().as_datetime())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load shop report", e))?;

        let performance = row
            .ok_or_else(|| DomainError::not_found(ErrorCode::ShopNotFound, "Shop", shop_id))?
            .try_into()?;
        let daily = self.daily(range, Some(shop_id)).await?;

        Ok(ShopReport { performance, daily })
    }
}
