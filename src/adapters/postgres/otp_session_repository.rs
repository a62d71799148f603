//! PostgreSQL implementation of OtpSessionRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::support::{corrupt, db_error, opt_dt, opt_ts, parse_column, ts};
use crate::domain::foundation::{
    DomainError, ErrorCode, OtpSessionId, PhoneNumber, Timestamp, UserId,
};
use crate::domain::otp::OtpSession;
use crate::ports::OtpSessionRepository;

pub struct PostgresOtpSessionRepository {
    pool: PgPool,
}

impl PostgresOtpSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OtpSessionRow {
    id: Uuid,
    phone: String,
    purpose: String,
    requested_by: Option<Uuid>,
    code_hash: String,
    status: String,
    attempts: i32,
    max_attempts: i32,
    resend_count: i32,
    max_resends: i32,
    resend_cooldown_secs: i64,
    last_sent_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    verified_at: Option<DateTime<Utc>>,
    version: i32,
}

fn counter(column: &str, raw: i32) -> Result<u32, DomainError> {
    u32::try_from(raw).map_err(|e| corrupt(column, e))
}

fn as_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

impl TryFrom<OtpSessionRow> for OtpSession {
    type Error = DomainError;

    fn try_from(row: OtpSessionRow) -> Result<Self, Self::Error> {
        Ok(OtpSession::reconstitute(
            OtpSessionId::from_uuid(row.id),
            PhoneNumber::parse(&row.phone).map_err(|e| corrupt("phone", e))?,
            parse_column("purpose", &row.purpose)?,
            row.requested_by.map(UserId::from_uuid),
            row.code_hash,
            parse_column("status", &row.status)?,
            counter("attempts", row.attempts)?,
            counter("max_attempts", row.max_attempts)?,
            counter("resend_count", row.resend_count)?,
            counter("max_resends", row.max_resends)?,
            row.resend_cooldown_secs,
            ts(row.last_sent_at),
            ts(row.expires_at),
            ts(row.created_at),
            opt_ts(row.verified_at),
        )
        .with_version(counter("version", row.version)?))
    }
}

const INSERT_SESSION: &str = r#"
    INSERT INTO otp_sessions (
        id, phone, purpose, requested_by, code_hash, status, attempts, max_attempts,
        resend_count, max_resends, resend_cooldown_secs, last_sent_at, expires_at,
        created_at, verified_at, version
    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
"#;

fn insert_session(
    session: &OtpSession,
) -> sqlx::query::Query<'_, sqlx::Postgres, sqlx::postgres::PgArguments> {
    sqlx::query(INSERT_SESSION)
        .bind(session.id().as_uuid())
        .bind(session.phone().as_str())
        .bind(session.purpose().as_str())
        .bind(session.requested_by().map(|id| *id.as_uuid()))
        .bind(session.code_hash())
        .bind(session.status().as_str())
        .bind(as_i32(session.attempts()))
        .bind(as_i32(session.max_attempts()))
        .bind(as_i32(session.resend_count()))
        .bind(as_i32(session.max_resends()))
        .bind(session.resend_cooldown_secs())
        .bind(session.last_sent_at().as_datetime())
        .bind(session.expires_at().as_datetime())
        .bind(session.created_at().as_datetime())
        .bind(opt_dt(session.verified_at()))
        .bind(as_i32(session.version()))
}

#[async_trait]
impl OtpSessionRepository for PostgresOtpSessionRepository {
    async fn save(&self, session: &OtpSession) -> Result<(), DomainError> {
        insert_session(session)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to save OTP session", e))?;
        Ok(())
    }

    async fn save_within_limit(
        &self,
        session: &OtpSession,
        since: &Timestamp,
        limit: u32,
    ) -> Result<bool, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to start transaction", e))?;

        // Serializes concurrent requests for the same phone until commit.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(session.phone().as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to lock phone for OTP request", e))?;

        let (recent,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM otp_sessions WHERE phone = $1 AND created_at >= $2",
        )
        .bind(session.phone().as_str())
        .bind(since.as_datetime())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to count OTP sessions", e))?;

        if recent >= i64::from(limit) {
            return Ok(false);
        }

        insert_session(session)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to save OTP session", e))?;
        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit OTP session", e))?;
        Ok(true)
    }

    async fn update(&self, session: &OtpSession) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE otp_sessions SET
                code_hash = $2,
                status = $3,
                attempts = $4,
                resend_count = $5,
                last_sent_at = $6,
                expires_at = $7,
                verified_at = $8,
                version = version + 1
            WHERE id = $1 AND version = $9
            "#,
        )
        .bind(session.id().as_uuid())
        .bind(session.code_hash())
        .bind(session.status().as_str())
        .bind(as_i32(session.attempts()))
        .bind(as_i32(session.resend_count()))
        .bind(session.last_sent_at().as_datetime())
        .bind(session.expires_at().as_datetime())
        .bind(opt_dt(session.verified_at()))
        .bind(as_i32(session.version()))
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update OTP session", e))?;

        if result.rows_affected() == 0 {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM otp_sessions WHERE id = $1)")
                    .bind(session.id().as_uuid())
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| db_error("Failed to check OTP session", e))?;
            if exists {
                return Err(DomainError::concurrent_modification("OTP session", session.id()));
            }
            return Err(DomainError::not_found(
                ErrorCode::OtpSessionNotFound,
                "OTP session",
                session.id(),
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &OtpSessionId) -> Result<Option<OtpSession>, DomainError> {
        let row: Option<OtpSessionRow> = sqlx::query_as(
            r#"
            SELECT id, phone, purpose, requested_by, code_hash, status, attempts, max_attempts,
                   resend_count, max_resends, resend_cooldown_secs, last_sent_at, expires_at,
                   created_at, verified_at, version
            FROM otp_sessions
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find OTP session", e))?;

        row.map(OtpSession::try_from).transpose()
    }
}
