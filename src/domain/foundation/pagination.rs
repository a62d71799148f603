//! Page requests and paged results.

use serde::{Deserialize, Serialize};

use super::ValidationError;

pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Result<Self, ValidationError> {
        if page < 1 {
            return Err(ValidationError::out_of_range("page", 1, i64::from(u32::MAX), i64::from(page)));
        }
        if !(1..=MAX_PER_PAGE).contains(&per_page) {
            return Err(ValidationError::out_of_range(
                "per_page",
                1,
                i64::from(MAX_PER_PAGE),
                i64::from(per_page),
            ));
        }
        Ok(Self { page, per_page })
    }

    /// Builds a request from optional query parameters, applying defaults.
    pub fn from_query(page: Option<u32>, per_page: Option<u32>) -> Result<Self, ValidationError> {
        Self::new(page.unwrap_or(1), per_page.unwrap_or(DEFAULT_PER_PAGE))
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }

    /// Slices an already filtered and ordered list into a page.
    pub fn paginate<T>(&self, items: Vec<T>) -> Page<T> {
        let total = items.len() as u64;
        let items = items
            .into_iter()
            .skip(self.offset() as usize)
            .take(self.per_page as usize)
            .collect();
        Page::new(items, total, *self)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// One page of results plus the total number of matches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            per_page: request.per_page,
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.per_page == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.per_page))
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_bounds() {
        assert!(PageRequest::new(0, 10).is_err());
        assert!(PageRequest::new(1, 0).is_err());
        assert!(PageRequest::new(1, 101).is_err());
        assert!(PageRequest::new(3, 100).is_ok());
    }

    #[test]
    fn defaults_apply_to_missing_query_values() {
        let req = PageRequest::from_query(None, None).unwrap();
        assert_eq!((req.page(), req.per_page()), (1, DEFAULT_PER_PAGE));
    }

    #[test]
    fn offset_counts_previous_pages() {
        assert_eq!(PageRequest::new(3, 25).unwrap().offset(), 50);
    }

    #[test]
    fn paginate_slices_and_counts() {
        let req = PageRequest::new(2, 3).unwrap();
        let page = req.paginate((1..=8).collect::<Vec<_>>());
        assert_eq!(page.items, vec![4, 5, 6]);
        assert_eq!(page.total, 8);
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn map_keeps_metadata() {
        let page = PageRequest::default().paginate(vec![1, 2]).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.total, 2);
    }
}
