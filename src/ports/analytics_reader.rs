//! Analytics reader port (read side).
//!
//! Read-only projections for the admin dashboard. Implementations may
//! aggregate in SQL; results must match the pure functions in
//! `domain::analytics`.

use async_trait::async_trait;

use crate::domain::analytics::{
    CategoryStats, DailyStats, PlatformOverview, ShopPerformance, ShopReport,
};
use crate::domain::foundation::{DateRange, DomainError, ShopId};

#[async_trait]
pub trait AnalyticsReader: Send + Sync {
    async fn overview(&self, range: &DateRange) -> Result<PlatformOverview, DomainError>;

    async fn daily_transactions(&self, range: &DateRange) -> Result<Vec<DailyStats>, DomainError>;

    async fn top_shops(
        &self,
        range: &DateRange,
        limit: u32,
    ) -> Result<Vec<ShopPerformance>, DomainError>;

    async fn category_breakdown(&self, range: &DateRange)
        -> Result<Vec<CategoryStats>, DomainError>;

    /// # Errors
    ///
    /// - `ShopNotFound` if the shop doesn't exist
    async fn shop_report(&self, shop_id: &ShopId, range: &DateRange)
        -> Result<ShopReport, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analytics_reader_is_object_safe() {
        fn _accepts_dyn(_reader: &dyn AnalyticsReader) {}
    }
}
