//! AnalyticsHandler - Authorizes report requests and delegates to the reader.

use std::sync::Arc;

use crate::application::handlers::access::require_admin;
use crate::domain::analytics::{
    CategoryStats, DailyStats, PlatformOverview, ShopPerformance, ShopReport, MAX_TOP_SHOPS,
};
use crate::domain::foundation::{
    AuthenticatedUser, DateRange, DomainError, ErrorCode, ShopId, Timestamp, ValidationError,
};
use crate::ports::{AnalyticsReader, ShopRepository};

/// Window used when the caller gives no dates.
pub const DEFAULT_RANGE_DAYS: u32 = 30;

pub struct AnalyticsHandler {
    reader: Arc<dyn AnalyticsReader>,
    shops: Arc<dyn ShopRepository>,
}

impl AnalyticsHandler {
    pub fn new(reader: Arc<dyn AnalyticsReader>, shops: Arc<dyn ShopRepository>) -> Self {
        Self { reader, shops }
    }

    pub async fn overview(
        &self,
        actor: &AuthenticatedUser,
        range: Option<DateRange>,
    ) -> Result<PlatformOverview, DomainError> {
        require_admin(actor)?;
        self.reader.overview(&resolve(range)?).await
    }

    pub async fn daily(
        &self,
        actor: &AuthenticatedUser,
        range: Option<DateRange>,
    ) -> Result<Vec<DailyStats>, DomainError> {
        require_admin(actor)?;
        self.reader.daily_transactions(&resolve(range)?).await
    }

    pub async fn top_shops(
        &self,
        actor: &AuthenticatedUser,
        range: Option<DateRange>,
        limit: u32,
    ) -> Result<Vec<ShopPerformance>, DomainError> {
        require_admin(actor)?;
        if limit == 0 || limit > MAX_TOP_SHOPS {
            let max = i64::from(MAX_TOP_SHOPS);
            return Err(ValidationError::out_of_range("limit", 1, max, i64::from(limit)).into());
        }
        self.reader.top_shops(&resolve(range)?, limit).await
    }

    pub async fn categories(
        &self,
        actor: &AuthenticatedUser,
        range: Option<DateRange>,
    ) -> Result<Vec<CategoryStats>, DomainError> {
        require_admin(actor)?;
        self.reader.category_breakdown(&resolve(range)?).await
    }

    pub async fn shop_report(
        &self,
        actor: &AuthenticatedUser,
        shop_id: &ShopId,
        range: Option<DateRange>,
    ) -> Result<ShopReport, DomainError> {
        let shop = self
            .shops
            .find_by_id(shop_id)
            .await?
            .ok_or_else(|| DomainError::not_found(ErrorCode::ShopNotFound, "Shop", shop_id))?;
        shop.authorize_manage(&actor.id, actor.is_admin())?;

        self.reader.shop_report(shop_id, &resolve(range)?).await
    }
}

fn resolve(range: Option<DateRange>) -> Result<DateRange, DomainError> {
    match range {
        Some(r) => Ok(r),
        None => Ok(DateRange::last_days(DEFAULT_RANGE_DAYS, Timestamp::now())?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryAnalyticsReader, InMemoryShopRepository, InMemoryTransactionRepository,
        InMemoryUserRepository,
    };
    use crate::domain::foundation::{GeoPoint, Money, PhoneNumber, Role, UserId};
    use crate::domain::shop::{Shop, ShopCategory, ShopDetails};
    use crate::domain::transaction::Transaction;
    use crate::domain::user::CardNumber;
    use crate::ports::TransactionRepository;

    struct Fixture {
        handler: AnalyticsHandler,
        shop: Shop,
    }

    async fn fixture() -> Fixture {
        let users = InMemoryUserRepository::new();
        let shops = InMemoryShopRepository::new();
        let transactions = InMemoryTransactionRepository::new();

        let mut shop = Shop::register(
            UserId::new(),
            ShopDetails {
                name: "Book Nook".into(),
                description: None,
                category: ShopCategory::Entertainment,
                address: "6 Page St".into(),
                location: GeoPoint::new(1.0, 1.0).unwrap(),
                phone: None,
            },
        )
        .unwrap();
        shop.approve().unwrap();
        shops.save(&shop).await.unwrap();

        for cents in [1000, 2000] {
            let mut tx = Transaction::record(
                UserId::new(),
                *shop.id(),
                CardNumber::generate(),
                Money::from_cents(cents).unwrap(),
                None,
                None,
                *shop.owner_id(),
            )
            .unwrap();
            tx.complete().unwrap();
            transactions.save(&tx).await.unwrap();
        }

        let reader = InMemoryAnalyticsReader::new(users, shops.clone(), transactions);
        Fixture {
            handler: AnalyticsHandler::new(Arc::new(reader), Arc::new(shops)),
            shop,
        }
    }

    fn person(id: UserId, role: Role) -> AuthenticatedUser {
        AuthenticatedUser::new(id, PhoneNumber::parse("+15554445555").unwrap(), role)
    }

    #[tokio::test]
    async fn admin_sees_overview_of_last_thirty_days() {
        let f = fixture().await;
        let overview = f
            .handler
            .overview(&person(UserId::new(), Role::Admin), None)
            .await
            .unwrap();
        assert_eq!(overview.completed_count, 2);
        assert_eq!(overview.gross_amount, Money::from_cents(3000).unwrap());
        assert_eq!(overview.active_shops, 1);
    }

    #[tokio::test]
    async fn owners_cannot_read_platform_reports() {
        let f = fixture().await;
        let owner = person(*f.shop.owner_id(), Role::ShopOwner);
        let err = f.handler.categories(&owner, None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn owner_reads_own_shop_report() {
        let f = fixture().await;
        let owner = person(*f.shop.owner_id(), Role::ShopOwner);
        let report = f.handler.shop_report(&owner, f.shop.id(), None).await.unwrap();
        assert_eq!(report.performance.transaction_count, 2);
        assert_eq!(report.performance.shop_name, "Book Nook");

        let stranger = person(UserId::new(), Role::ShopOwner);
        let err = f
            .handler
            .shop_report(&stranger, f.shop.id(), None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn top_shops_limit_is_bounded() {
        let f = fixture().await;
        let admin = person(UserId::new(), Role::Admin);
        let err = f.handler.top_shops(&admin, None, 0).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let top = f.handler.top_shops(&admin, None, 5).await.unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].shop_id, *f.shop.id());
    }
}
