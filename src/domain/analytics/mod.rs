//! Analytics module: reporting read models and the pure aggregations that
//! produce them from raw aggregates.
//!
//! The PostgreSQL reader computes the same numbers with `GROUP BY`; the
//! in-memory reader calls the functions in `aggregate`.

mod aggregate;
mod reports;

pub use aggregate::{
    category_breakdown, daily_transactions, overview, shop_performance, top_shops,
};
pub use reports::{
    CategoryStats, DailyStats, PlatformOverview, ShopPerformance, ShopReport, MAX_TOP_SHOPS,
};
