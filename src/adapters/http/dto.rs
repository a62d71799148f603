//! DTOs shared across endpoint groups.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use crate::domain::foundation::{DateRange, Page, PageRequest, Timestamp};

/// `?page=&per_page=` query parameters.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

impl PageParams {
    pub fn to_request(self) -> Result<PageRequest, ApiError> {
        Ok(PageRequest::from_query(self.page, self.per_page)?)
    }
}

/// `?from=YYYY-MM-DD&to=YYYY-MM-DD`; both or neither.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RangeParams {
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

impl RangeParams {
    pub fn to_range(self) -> Result<Option<DateRange>, ApiError> {
        match (self.from, self.to) {
            (Some(from), Some(to)) => Ok(Some(DateRange::new(from, to)?)),
            (None, None) => Ok(None),
            _ => Err(ApiError::bad_request("from", "Both from and to are required")),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u64,
}

impl<T> PageResponse<T> {
    pub fn from_page<U>(page: Page<U>, f: impl FnMut(U) -> T) -> Self {
        let total_pages = page.total_pages();
        let page = page.map(f);
        Self {
            items: page.items,
            total: page.total,
            page: page.page,
            per_page: page.per_page,
            total_pages,
        }
    }
}

/// RFC 3339 with second precision and a `Z` suffix.
pub fn rfc3339(ts: &Timestamp) -> String {
    ts.as_datetime()
        .to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}
