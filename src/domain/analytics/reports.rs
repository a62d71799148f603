use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::foundation::{Money, ShopId};
use crate::domain::shop::ShopCategory;

/// Upper bound for `top_shops` limits.
pub const MAX_TOP_SHOPS: u32 = 50;

/// Platform-wide totals over a date range.
///
/// User and shop counts are current totals; `new_users` and the transaction
/// figures are restricted to the range. Amounts only count completed
/// transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlatformOverview {
    pub total_users: u64,
    pub new_users: u64,
    pub total_shops: u64,
    pub active_shops: u64,
    pub pending_shops: u64,
    pub active_cards: u64,
    pub transaction_count: u64,
    pub completed_count: u64,
    pub gross_amount: Money,
    pub discount_amount: Money,
    pub net_amount: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyStats {
    pub date: NaiveDate,
    pub count: u64,
    pub gross: Money,
    pub discount: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShopPerformance {
    pub shop_id: ShopId,
    pub shop_name: String,
    pub transaction_count: u64,
    pub gross_amount: Money,
    pub discount_amount: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub category: ShopCategory,
    pub shop_count: u64,
    pub transaction_count: u64,
    pub discount_amount: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShopReport {
    pub performance: ShopPerformance,
    pub daily: Vec<DailyStats>,
}
