//! In-memory analytics reader.
//!
//! Snapshots the in-memory repositories and hands them to the pure
//! aggregations in `domain::analytics`.

use async_trait::async_trait;

use super::{InMemoryShopRepository, InMemoryTransactionRepository, InMemoryUserRepository};
use crate::domain::analytics::{
    self, CategoryStats, DailyStats, PlatformOverview, ShopPerformance, ShopReport, MAX_TOP_SHOPS,
};
use crate::domain::foundation::{DateRange, DomainError, ErrorCode, ShopId, Timestamp};
use crate::ports::{AnalyticsReader, ShopRepository};

#[derive(Debug, Clone)]
pub struct InMemoryAnalyticsReader {
    users: InMemoryUserRepository,
    shops: InMemoryShopRepository,
    transactions: InMemoryTransactionRepository,
}

impl InMemoryAnalyticsReader {
    pub fn new(
        users: InMemoryUserRepository,
        shops: InMemoryShopRepository,
        transactions: InMemoryTransactionRepository,
    ) -> Self {
        Self {
            users,
            shops,
            transactions,
        }
    }
}

#[async_trait]
impl AnalyticsReader for InMemoryAnalyticsReader {
    async fn overview(&self, range: &DateRange) -> Result<PlatformOverview, DomainError> {
        let users = self.users.all().await;
        let shops = self.shops.all().await;
        let transactions = self.transactions.all().await;
        Ok(analytics::overview(
            &users,
            &shops,
            &transactions,
            range,
            &Timestamp::now(),
        ))
    }

    async fn daily_transactions(&self, range: &DateRange) -> Result<Vec<DailyStats>, DomainError> {
        let transactions = self.transactions.all().await;
        Ok(analytics::daily_transactions(&transactions, range, None))
    }

    async fn top_shops(
        &self,
        range: &DateRange,
        limit: u32,
    ) -> Result<Vec<ShopPerformance>, DomainError> {
        let shops = self.shops.all().await;
        let transactions = self.transactions.all().await;
        let limit = limit.clamp(1, MAX_TOP_SHOPS) as usize;
        Ok(analytics::top_shops(&shops, &transactions, range, limit))
    }

    async fn category_breakdown(
        &self,
        range: &DateRange,
    ) -> Result<Vec<CategoryStats>, DomainError> {
        let shops = self.shops.all().await;
        let transactions = self.transactions.all().await;
        Ok(analytics::category_breakdown(&shops, &transactions, range))
    }

    async fn shop_report(
        &self,
        shop_id: &ShopId,
        range: &DateRange,
    ) -> Result<ShopReport, DomainError> {
        let shop = self
            .shops
            .find_by_id(shop_id)
            .await?
            .ok_or_else(|| DomainError::not_found(ErrorCode::ShopNotFound, "Shop", shop_id))?;
        let transactions = self.transactions.all().await;
        Ok(ShopReport {
            performance: analytics::shop_performance(&shop, &transactions, range),
            daily: analytics::daily_transactions(&transactions, range, Some(shop_id)),
        })
    }
}
