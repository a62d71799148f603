//! Inclusive date ranges for reporting.

use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::{Timestamp, ValidationError};

pub const MAX_SPAN_DAYS: i64 = 366;

/// Calendar days `from..=to` (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, ValidationError> {
        if from > to {
            return Err(ValidationError::invalid_format("from", "must not be after 'to'"));
        }
        let span = (to - from).num_days() + 1;
        if span > MAX_SPAN_DAYS {
            return Err(ValidationError::out_of_range("date_range_days", 1, MAX_SPAN_DAYS, span));
        }
        Ok(Self { from, to })
    }

    /// The `days` calendar days ending with today.
    pub fn last_days(days: u32, now: Timestamp) -> Result<Self, ValidationError> {
        if days == 0 {
            return Err(ValidationError::out_of_range("days", 1, MAX_SPAN_DAYS, 0));
        }
        let to = now.date();
        let from = to - Duration::days(i64::from(days) - 1);
        Self::new(from, to)
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }

    pub fn contains(&self, ts: &Timestamp) -> bool {
        self.contains_date(ts.date())
    }

    /// First instant of the range.
    pub fn start(&self) -> Timestamp {
        Timestamp::from_datetime(Utc.from_utc_datetime(&self.from.and_time(NaiveTime::MIN)))
    }

    /// First instant after the range (exclusive bound).
    pub fn end_exclusive(&self) -> Timestamp {
        let next = self.to + Duration::days(1);
        Timestamp::from_datetime(Utc.from_utc_datetime(&next.and_time(NaiveTime::MIN)))
    }
}
