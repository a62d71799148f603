//! UTC instants used for expiry, validity windows and audit fields.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC. Serializes as RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Calendar day (UTC) this instant falls on; analytics buckets by it.
    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    /// True when `start <= self < end`; a missing bound is open.
    pub fn is_within(&self, start: Option<&Timestamp>, end: Option<&Timestamp>) -> bool {
        start.map_or(true, |s| !self.is_before(s)) && end.map_or(true, |e| self.is_before(e))
    }

    /// Signed; negative when `other` is later.
    pub fn duration_since(&self, other: &Timestamp) -> Duration {
        self.0.signed_duration_since(other.0)
    }

    fn shifted(&self, by: Duration) -> Self {
        Self(self.0 + by)
    }

    pub fn add_days(&self, days: i64) -> Self {
        self.shifted(Duration::days(days))
    }

    pub fn minus_days(&self, days: i64) -> Self {
        self.shifted(-Duration::days(days))
    }

    pub fn plus_secs(&self, secs: i64) -> Self {
        self.shifted(Duration::seconds(secs))
    }

    pub fn minus_secs(&self, secs: i64) -> Self {
        self.shifted(-Duration::seconds(secs))
    }

    /// Seconds since the Unix epoch, as carried in JWT `iat`/`exp`.
    pub fn as_unix_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// `None` when `secs` is outside chrono's representable range.
    pub fn from_unix_secs(secs: i64) -> Option<Self> {
        DateTime::<Utc>::from_timestamp(secs, 0).map(Self)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}
