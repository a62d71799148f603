//! PostgreSQL implementation of DiscountRuleRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::support::{corrupt, db_error, money, opt_dt, opt_money, opt_ts, parse_column, ts};
use crate::domain::discount::{DiscountKind, DiscountRule, RuleTerms};
use crate::domain::foundation::{DiscountRuleId, DomainError, ErrorCode, ShopId};
use crate::ports::DiscountRuleRepository;

const RULE_COLUMNS: &str = "id, shop_id, name, description, kind, value, min_purchase_cents, \
     max_purchase_cents, max_discount_cents, min_tier, valid_from, valid_until, active, \
     priority, created_at, updated_at";

/// Highest priority first, then oldest first.
const RULE_ORDER: &str = "ORDER BY priority DESC, created_at ASC, id ASC";

pub struct PostgresDiscountRuleRepository {
    pool: PgPool,
}

impl PostgresDiscountRuleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn not_found(id: &DiscountRuleId) -> DomainError {
        DomainError::not_found(ErrorCode::DiscountRuleNotFound, "Discount rule", id)
    }

    fn into_rules(rows: Vec<RuleRow>) -> Result<Vec<DiscountRule>, DomainError> {
        rows.into_iter().map(DiscountRule::try_from).collect()
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RuleRow {
    id: Uuid,
    shop_id: Option<Uuid>,
    name: String,
    description: Option<String>,
    kind: String,
    value: i64,
    min_purchase_cents: i64,
    max_purchase_cents: Option<i64>,
    max_discount_cents: Option<i64>,
    min_tier: String,
    valid_from: Option<DateTime<Utc>>,
    valid_until: Option<DateTime<Utc>>,
    active: bool,
    priority: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RuleRow> for DiscountRule {
    type Error = DomainError;

    fn try_from(row: RuleRow) -> Result<Self, Self::Error> {
        let terms = RuleTerms {
            name: row.name,
            description: row.description,
            kind: DiscountKind::from_parts(&row.kind, row.value).map_err(|e| corrupt("kind", e))?,
            min_purchase: money("min_purchase_cents", row.min_purchase_cents)?,
            max_purchase: opt_money("max_purchase_cents", row.max_purchase_cents)?,
            max_discount: opt_money("max_discount_cents", row.max_discount_cents)?,
            min_tier: parse_column("min_tier", &row.min_tier)?,
            valid_from: opt_ts(row.valid_from),
            valid_until: opt_ts(row.valid_until),
            priority: row.priority,
        };

        Ok(DiscountRule::reconstitute(
            DiscountRuleId::from_uuid(row.id),
            row.shop_id.map(ShopId::from_uuid),
            terms,
            row.active,
            ts(row.created_at),
            ts(row.updated_at),
        ))
    }
}

#[async_trait]
impl DiscountRuleRepository for PostgresDiscountRuleRepository {
    async fn save(&self, rule: &DiscountRule) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO discount_rules (
                id, shop_id, name, description, kind, value, min_purchase_cents,
                max_purchase_cents, max_discount_cents, min_tier, valid_from, valid_until,
                active, priority, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(rule.id().as_uuid())
        .bind(rule.shop_id().map(|s| *s.as_uuid()))
        .bind(rule.name())
        .bind(rule.description())
        .bind(rule.kind().as_str())
        .bind(rule.kind().raw_value())
        .bind(rule.min_purchase().cents())
        .bind(rule.max_purchase().map(|m| m.cents()))
        .bind(rule.max_discount().map(|m| m.cents()))
        .bind(rule.min_tier().as_str())
        .bind(opt_dt(rule.valid_from()))
        .bind(opt_dt(rule.valid_until()))
        .bind(rule.is_active())
        .bind(rule.priority())
        .bind(rule.created_at().as_datetime())
        .bind(rule.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to save discount rule", e))?;

        Ok(())
    }

    async fn update(&self, rule: &DiscountRule) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE discount_rules SET
                name = $2,
                description = $3,
                kind = $4,
                value = $5,
                min_purchase_cents = $6,
                max_purchase_cents = $7,
                max_discount_cents = $8,
                min_tier = $9,
                valid_from = $10,
                valid_until = $11,
                active = $12,
                priority = $13,
                updated_at = $14
            WHERE id = $1
            "#,
        )
        .bind(rule.id().as_uuid())
        .bind(rule.name())
        .bind(rule.description())
        .bind(rule.kind().as_str())
        .bind(rule.kind().raw_value())
        .bind(rule.min_purchase().cents())
        .bind(rule.max_purchase().map(|m| m.cents()))
        .bind(rule.max_discount().map(|m| m.cents()))
        .bind(rule.min_tier().as_str())
        .bind(opt_dt(rule.valid_from()))
        .bind(opt_dt(rule.valid_until()))
        .bind(rule.is_active())
        .bind(rule.priority())
        .bind(rule.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update discount rule", e))?;

        if result.rows_affected() == 0 {
            return Err(Self::not_found(rule.id()));
        }
        Ok(())
    }

    async fn delete(&self, id: &DiscountRuleId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM discount_rules WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete discount rule", e))?;

        if result.rows_affected() == 0 {
            return Err(Self::not_found(id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &DiscountRuleId) -> Result<Option<DiscountRule>, DomainError> {
        let sql = format!("SELECT {} FROM discount_rules WHERE id = $1", RULE_COLUMNS);
        let row: Option<RuleRow> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find discount rule", e))?;

        row.map(DiscountRule::try_from).transpose()
    }

    async fn list_by_shop(
        &self,
        shop_id: Option<&ShopId>,
        include_inactive: bool,
    ) -> Result<Vec<DiscountRule>, DomainError> {
        // `IS NOT DISTINCT FROM` makes a NULL parameter select platform-wide rules.
        let sql = format!(
            "SELECT {} FROM discount_rules \
             WHERE shop_id IS NOT DISTINCT FROM $1 AND ($2 OR active) {}",
            RULE_COLUMNS, RULE_ORDER
        );
        let rows: Vec<RuleRow> = sqlx::query_as(&sql)
            .bind(shop_id.map(|s| *s.as_uuid()))
            .bind(include_inactive)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list discount rules", e))?;

        Self::into_rules(rows)
    }

    async fn find_candidates(&self, shop_id: &ShopId) -> Result<Vec<DiscountRule>, DomainError> {
        let sql = format!(
            "SELECT {} FROM discount_rules \
             WHERE active AND (shop_id = $1 OR shop_id IS NULL) {}",
            RULE_COLUMNS, RULE_ORDER
        );
        let rows: Vec<RuleRow> = sqlx::query_as(&sql)
            .bind(shop_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to load discount rules", e))?;

        Self::into_rules(rows)
    }
}
