//! PostgreSQL implementation of UserRepository.
//!
//! The discount card is stored inline on the `users` row; all five card
//! columns are either set or NULL together.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::support::{corrupt, count, db_error, like_pattern, opt_dt, opt_ts, parse_column, ts, violates};
use crate::domain::foundation::{
    DomainError, Email, ErrorCode, Page, PhoneNumber, UserId,
};
use crate::domain::user::{CardNumber, DiscountCard, User};
use crate::ports::{UserFilter, UserRepository};

const USER_COLUMNS: &str = "id, phone, name, email, role, status, card_number, card_tier, \
     card_status, card_issued_at, card_expires_at, created_at, updated_at, last_login_at, version";

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_write_error(context: &str, err: sqlx::Error) -> DomainError {
        if violates(&err, "users_phone_key") {
            return DomainError::new(
                ErrorCode::PhoneAlreadyRegistered,
                "Phone number is already registered",
            );
        }
        if violates(&err, "users_card_number_key") {
            return DomainError::new(ErrorCode::CardAlreadyIssued, "Card number is already issued");
        }
        db_error(context, err)
    }

    async fn find_one(&self, column: &str, bind: FindBy<'_>) -> Result<Option<User>, DomainError> {
        let sql = format!("SELECT {} FROM users WHERE {} = $1", USER_COLUMNS, column);
        let query = sqlx::query_as::<_, UserRow>(&sql);
        let query = match bind {
            FindBy::Id(id) => query.bind(id),
            FindBy::Text(text) => query.bind(text),
        };
        let row = query
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find user", e))?;
        row.map(User::try_from).transpose()
    }
}

enum FindBy<'a> {
    Id(Uuid),
    Text(&'a str),
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    phone: String,
    name: Option<String>,
    email: Option<String>,
    role: String,
    status: String,
    card_number: Option<String>,
    card_tier: Option<String>,
    card_status: Option<String>,
    card_issued_at: Option<DateTime<Utc>>,
    card_expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    last_login_at: Option<DateTime<Utc>>,
    version: i32,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let card = match (
            row.card_number,
            row.card_tier,
            row.card_status,
            row.card_issued_at,
            row.card_expires_at,
        ) {
            (Some(number), Some(tier), Some(status), Some(issued), Some(expires)) => {
                Some(DiscountCard::reconstitute(
                    CardNumber::parse(&number).map_err(|e| corrupt("card_number", e))?,
                    parse_column("card_tier", &tier)?,
                    parse_column("card_status", &status)?,
                    ts(issued),
                    ts(expires),
                ))
            }
            (None, None, None, None, None) => None,
            _ => return Err(corrupt("card", "partially stored card")),
        };

        Ok(User::reconstitute(
            UserId::from_uuid(row.id),
            PhoneNumber::parse(&row.phone).map_err(|e| corrupt("phone", e))?,
            row.name,
            row.email
                .as_deref()
                .map(Email::parse)
                .transpose()
                .map_err(|e| corrupt("email", e))?,
            parse_column("role", &row.role)?,
            parse_column("status", &row.status)?,
            card,
            ts(row.created_at),
            ts(row.updated_at),
            opt_ts(row.last_login_at),
        )
        .with_version(u32::try_from(row.version).map_err(|e| corrupt("version", e))?))
    }
}

fn version_column(version: u32) -> i32 {
    i32::try_from(version).unwrap_or(i32::MAX)
}

/// Pushes the WHERE clause for a filter.
fn push_filter<'a>(qb: &mut QueryBuilder<'a, Postgres>, filter: &'a UserFilter) {
    qb.push(" WHERE TRUE");
    if let Some(role) = filter.role {
        qb.push(" AND role = ").push_bind(role.as_str());
    }
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(q) = filter.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        let pattern = like_pattern(&q.to_lowercase());
        qb.push(" AND (phone LIKE ")
            .push_bind(pattern.clone())
            .push(" OR lower(coalesce(name, '')) LIKE ")
            .push_bind(pattern.clone())
            .push(" OR coalesce(email, '') LIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn save(&self, user: &User) -> Result<(), DomainError> {
        let card = user.card();
        sqlx::query(
            r#"
            INSERT INTO users (
                id, phone, name, email, role, status, card_number, card_tier, card_status,
                card_issued_at, card_expires_at, created_at, updated_at, last_login_at, version
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.phone().as_str())
        .bind(user.name())
        .bind(user.email().map(Email::as_str))
        .bind(user.role().as_str())
        .bind(user.status().as_str())
        .bind(card.map(|c| c.number().as_str()))
        .bind(card.map(|c| c.tier().as_str()))
        .bind(card.map(|c| c.status().as_str()))
        .bind(opt_dt(card.map(|c| c.issued_at())))
        .bind(opt_dt(card.map(|c| c.expires_at())))
        .bind(user.created_at().as_datetime())
        .bind(user.updated_at().as_datetime())
        .bind(opt_dt(user.last_login_at()))
        .bind(version_column(user.version()))
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_write_error("Failed to save user", e))?;

        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        let card = user.card();
        let result = sqlx::query(
            r#"
            UPDATE users SET
                phone = $2,
                name = $3,
                email = $4,
                role = $5,
                status = $6,
                card_number = $7,
                card_tier = $8,
                card_status = $9,
                card_issued_at = $10,
                card_expires_at = $11,
                updated_at = $12,
                last_login_at = $13,
                version = version + 1
            WHERE id = $1 AND version = $14
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.phone().as_str())
        .bind(user.name())
        .bind(user.email().map(Email::as_str))
        .bind(user.role().as_str())
        .bind(user.status().as_str())
        .bind(card.map(|c| c.number().as_str()))
        .bind(card.map(|c| c.tier().as_str()))
        .bind(card.map(|c| c.status().as_str()))
        .bind(opt_dt(card.map(|c| c.issued_at())))
        .bind(opt_dt(card.map(|c| c.expires_at())))
        .bind(user.updated_at().as_datetime())
        .bind(opt_dt(user.last_login_at()))
        .bind(version_column(user.version()))
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_write_error("Failed to update user", e))?;

        if result.rows_affected() == 0 {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                    .bind(user.id().as_uuid())
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| db_error("Failed to check user", e))?;
            if exists {
                return Err(DomainError::concurrent_modification("User", user.id()));
            }
            return Err(DomainError::not_found(ErrorCode::UserNotFound, "User", user.id()));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        self.find_one("id", FindBy::Id(*id.as_uuid())).await
    }

    async fn find_by_phone(&self, phone: &PhoneNumber) -> Result<Option<User>, DomainError> {
        self.find_one("phone", FindBy::Text(phone.as_str())).await
    }

    async fn find_by_card_number(&self, number: &CardNumber) -> Result<Option<User>, DomainError> {
        self.find_one("card_number", FindBy::Text(number.as_str())).await
    }

    async fn list(&self, filter: &UserFilter) -> Result<Page<User>, DomainError> {
        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users");
        push_filter(&mut count_qb, filter);
        let (total,): (i64,) = count_qb
            .build_query_as()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count users", e))?;

        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM users", USER_COLUMNS));
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC, id ASC LIMIT ")
            .push_bind(filter.page.limit() as i64)
            .push(" OFFSET ")
            .push_bind(filter.page.offset() as i64);

        let rows: Vec<UserRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list users", e))?;

        let items = rows
            .into_iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, count(total), filter.page))
    }
}
