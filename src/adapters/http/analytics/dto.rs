//! HTTP DTOs for analytics reports.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::adapters::http::dto::RangeParams;
use crate::domain::analytics::{
    CategoryStats, DailyStats, PlatformOverview, ShopPerformance, ShopReport,
};
use crate::domain::shop::ShopCategory;

/// Default number of shops in the top-shops ranking.
pub const DEFAULT_TOP_SHOPS: u32 = 10;

/// `?from=&to=` plus an optional `limit` for the ranking.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ReportParams {
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl ReportParams {
    pub fn range_params(&self) -> RangeParams {
        RangeParams {
            from: self.from,
            to: self.to,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OverviewResponse {
    pub total_users: u64,
    pub new_users: u64,
    pub total_shops: u64,
    pub active_shops: u64,
    pub pending_shops: u64,
    pub active_cards: u64,
    pub transaction_count: u64,
    pub completed_count: u64,
    pub gross_amount_cents: i64,
    pub discount_amount_cents: i64,
    pub net_amount_cents: i64,
}

impl From<PlatformOverview> for OverviewResponse {
    fn from(o: PlatformOverview) -> Self {
        Self {
            total_users: o.total_users,
            new_users: o.new_users,
            total_shops: o.total_shops,
            active_shops: o.active_shops,
            pending_shops: o.pending_shops,
            active_cards: o.active_cards,
            transaction_count: o.transaction_count,
            completed_count: o.completed_count,
            gross_amount_cents: o.gross_amount.cents(),
            discount_amount_cents: o.discount_amount.cents(),
            net_amount_cents: o.net_amount.cents(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyResponse {
    pub date: NaiveDate,
    pub count: u64,
    pub gross_cents: i64,
    pub discount_cents: i64,
}

impl From<&DailyStats> for DailyResponse {
    fn from(d: &DailyStats) -> Self {
        Self {
            date: d.date,
            count: d.count,
            gross_cents: d.gross.cents(),
            discount_cents: d.discount.cents(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ShopPerformanceResponse {
    pub shop_id: String,
    pub shop_name: String,
    pub transaction_count: u64,
    pub gross_amount_cents: i64,
    pub discount_amount_cents: i64,
}

impl From<&ShopPerformance> for ShopPerformanceResponse {
    fn from(p: &ShopPerformance) -> Self {
        Self {
            shop_id: p.shop_id.to_string(),
            shop_name: p.shop_name.clone(),
            transaction_count: p.transaction_count,
            gross_amount_cents: p.gross_amount.cents(),
            discount_amount_cents: p.discount_amount.cents(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryResponse {
    pub category: ShopCategory,
    pub shop_count: u64,
    pub transaction_count: u64,
    pub discount_amount_cents: i64,
}

impl From<&CategoryStats> for CategoryResponse {
    fn from(c: &CategoryStats) -> Self {
        Self {
            category: c.category,
            shop_count: c.shop_count,
            transaction_count: c.transaction_count,
            discount_amount_cents: c.discount_amount.cents(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ShopReportResponse {
    #[serde(flatten)]
    pub performance: ShopPerformanceResponse,
    pub daily: Vec<DailyResponse>,
}

impl From<ShopReport> for ShopReportResponse {
    fn from(r: ShopReport) -> Self {
        Self {
            performance: ShopPerformanceResponse::from(&r.performance),
            daily: r.daily.iter().map(DailyResponse::from).collect(),
        }
    }
}
