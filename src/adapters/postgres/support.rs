//! Row conversion and error mapping shared by the PostgreSQL adapters.

use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::domain::foundation::{DomainError, ErrorCode, Money, Timestamp, ValidationError};

/// Wraps a driver error as `DatabaseError` and logs it.
pub(super) fn db_error(context: &str, err: sqlx::Error) -> DomainError {
    tracing::error!("{}: {}", context, err);
    DomainError::database(format!("{}: {}", context, err))
}

/// True when `err` is a unique violation of the named constraint.
pub(super) fn violates(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint() == Some(constraint),
        _ => false,
    }
}

/// A stored value that no longer passes domain validation.
pub(super) fn corrupt(column: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Invalid {} value in database: {}", column, err),
    )
}

pub(super) fn parse_column<T>(column: &str, raw: &str) -> Result<T, DomainError>
where
    T: FromStr<Err = ValidationError>,
{
    raw.parse().map_err(|e| corrupt(column, e))
}

pub(super) fn money(column: &str, cents: i64) -> Result<Money, DomainError> {
    Money::from_cents(cents).map_err(|e| corrupt(column, e))
}

pub(super) fn opt_money(column: &str, cents: Option<i64>) -> Result<Option<Money>, DomainError> {
    cents.map(|c| money(column, c)).transpose()
}

pub(super) fn ts(dt: DateTime<Utc>) -> Timestamp {
    Timestamp::from_datetime(dt)
}

pub(super) fn opt_ts(dt: Option<DateTime<Utc>>) -> Option<Timestamp> {
    dt.map(Timestamp::from_datetime)
}

pub(super) fn opt_dt(ts: Option<&Timestamp>) -> Option<DateTime<Utc>> {
    ts.map(|t| *t.as_datetime())
}

/// Non-negative count from `COUNT(*)`.
pub(super) fn count(raw: i64) -> u64 {
    u64::try_from(raw).unwrap_or_default()
}

/// Escapes `%`, `_` and `\` for use inside a `LIKE` pattern.
pub(super) fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shop::ShopStatus;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("cafe"), "%cafe%");
    }

    #[test]
    fn parse_column_reports_database_error() {
        let ok: ShopStatus = parse_column("status", "active").unwrap();
        assert_eq!(ok, ShopStatus::Active);

        let err = parse_column::<ShopStatus>("status", "bogus").unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }

    #[test]
    fn negative_money_is_corrupt() {
        assert!(money("amount", -1).is_err());
        assert_eq!(opt_money("amount", None).unwrap(), None);
    }

    #[test]
    fn count_clamps_negative() {
        assert_eq!(count(-3), 0);
        assert_eq!(count(7), 7);
    }
}
