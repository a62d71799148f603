use std::collections::{BTreeMap, HashMap};

use super::{CategoryStats, DailyStats, PlatformOverview, ShopPerformance};
use crate::domain::foundation::{DateRange, Money, ShopId, Timestamp};
use crate::domain::shop::{Shop, ShopCategory, ShopStatus};
use crate::domain::transaction::{Transaction, TransactionStatus};
use crate::domain::user::User;

fn completed_in<'a>(
    transactions: &'a [Transaction],
    range: &'a DateRange,
) -> impl Iterator<Item = &'a Transaction> + 'a {
    transactions
        .iter()
        .filter(move |t| t.status() == TransactionStatus::Completed && range.contains(t.created_at()))
}

fn add(total: &mut Money, amount: Money) {
    *total = total.checked_add(amount).unwrap_or(*total);
}

pub fn overview(
    users: &[User],
    shops: &[Shop],
    transactions: &[Transaction],
    range: &DateRange,
    now: &Timestamp,
) -> PlatformOverview {
    let mut out = PlatformOverview {
        total_users: users.len() as u64,
        new_users: users.iter().filter(|u| range.contains(u.created_at())).count() as u64,
        total_shops: shops.len() as u64,
        active_shops: shops.iter().filter(|s| s.status() == ShopStatus::Active).count() as u64,
        pending_shops: shops.iter().filter(|s| s.status() == ShopStatus::Pending).count() as u64,
        active_cards: users
            .iter()
            .filter(|u| u.card().map_or(false, |c| c.is_usable(now)))
            .count() as u64,
        transaction_count: transactions
            .iter()
            .filter(|t| range.contains(t.created_at()))
            .count() as u64,
        ..Default::default()
    };

    for tx in completed_in(transactions, range) {
        out.completed_count += 1;
        add(&mut out.gross_amount, tx.original_amount());
        add(&mut out.discount_amount, tx.discount_amount());
        add(&mut out.net_amount, tx.final_amount());
    }
    out
}

/// Completed transactions per day, ascending. Days without sales are omitted.
pub fn daily_transactions(
    transactions: &[Transaction],
    range: &DateRange,
    shop_id: Option<&ShopId>,
) -> Vec<DailyStats> {
    let mut by_day: BTreeMap<chrono::NaiveDate, DailyStats> = BTreeMap::new();
    for tx in completed_in(transactions, range) {
        if shop_id.map_or(false, |id| tx.shop_id() != id) {
            continue;
        }
        let date = tx.created_at().date();
        let entry = by_day.entry(date).or_insert_with(|| DailyStats {
            date,
            count: 0,
            gross: Money::ZERO,
            discount: Money::ZERO,
        });
        entry.count += 1;
        add(&mut entry.gross, tx.original_amount());
        add(&mut entry.discount, tx.discount_amount());
    }
    by_day.into_values().collect()
}

/// Totals for one shop. Shops without sales report zeros.
pub fn shop_performance(shop: &Shop, transactions: &[Transaction], range: &DateRange) -> ShopPerformance {
    let mut perf = ShopPerformance {
        shop_id: *shop.id(),
        shop_name: shop.name().to_string(),
        transaction_count: 0,
        gross_amount: Money::ZERO,
        discount_amount: Money::ZERO,
    };
    for tx in completed_in(transactions, range).filter(|t| t.shop_id() == shop.id()) {
        perf.transaction_count += 1;
        add(&mut perf.gross_amount, tx.original_amount());
        add(&mut perf.discount_amount, tx.discount_amount());
    }
    perf
}

/// Shops with at least one completed sale, by gross amount desc.
pub fn top_shops(
    shops: &[Shop],
    transactions: &[Transaction],
    range: &DateRange,
    limit: usize,
) -> Vec<ShopPerformance> {
    let mut perf: Vec<ShopPerformance> = shops
        .iter()
        .map(|s| shop_performance(s, transactions, range))
        .filter(|p| p.transaction_count > 0)
        .collect();
    perf.sort_by(|a, b| {
        b.gross_amount
            .cmp(&a.gross_amount)
            .then_with(|| b.transaction_count.cmp(&a.transaction_count))
            .then_with(|| a.shop_name.cmp(&b.shop_name))
    });
    perf.truncate(limit);
    perf
}

/// Per-category shop counts and completed sales, in category order.
/// Categories with no shops are omitted.
pub fn category_breakdown(
    shops: &[Shop],
    transactions: &[Transaction],
    range: &DateRange,
) -> Vec<CategoryStats> {
    let category_of: HashMap<ShopId, ShopCategory> =
        shops.iter().map(|s| (*s.id(), s.category())).collect();

    let mut stats: BTreeMap<ShopCategory, CategoryStats> = BTreeMap::new();
    for shop in shops {
        stats
            .entry(shop.category())
            .or_insert_with(|| CategoryStats {
                category: shop.category(),
                shop_count: 0,
                transaction_count: 0,
                discount_amount: Money::ZERO,
            })
            .shop_count += 1;
    }
    for tx in completed_in(transactions, range) {
        let Some(category) = category_of.get(tx.shop_id()) else {
            continue;
        };
        if let Some(entry) = stats.get_mut(category) {
            entry.transaction_count += 1;
            add(&mut entry.discount_amount, tx.discount_amount());
        }
    }
    stats.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::discount::AppliedDiscount;
    use crate::domain::foundation::{DiscountRuleId, GeoPoint, PhoneNumber, Role, UserId};
    use crate::domain::shop::ShopDetails;
    use crate::domain::user::{CardNumber, CardTier};

    fn money(c: i64) -> Money {
        Money::from_cents(c).unwrap()
    }

    fn shop(name: &str, category: ShopCategory) -> Shop {
        let mut s = Shop::register(
            UserId::new(),
            ShopDetails {
                name: name.into(),
                description: None,
                category,
                address: "Street 1".into(),
                location: GeoPoint::new(0.0, 0.0).unwrap(),
                phone: None,
            },
        )
        .unwrap();
        s.approve().unwrap();
        s
    }

    fn sale(shop: &Shop, amount: i64, discount: i64, complete: bool) -> Transaction {
        let applied = AppliedDiscount {
            rule_id: DiscountRuleId::new(),
            rule_name: "r".into(),
            original: money(amount),
            discount: money(discount),
            final_amount: money(amount - discount),
        };
        let mut tx = Transaction::record(
            UserId::new(),
            *shop.id(),
            CardNumber::generate(),
            money(amount),
            Some(&applied),
            None,
            UserId::new(),
        )
        .unwrap();
        if complete {
            tx.complete().unwrap();
        }
        tx
    }

    fn today() -> DateRange {
        DateRange::last_days(1, Timestamp::now()).unwrap()
    }

    #[test]
    fn overview_counts_only_completed_amounts() {
        let cafe = shop("Cafe", ShopCategory::Cafe);
        let txs = vec![
            sale(&cafe, 1000, 100, true),
            sale(&cafe, 500, 50, false),
        ];
        let mut user = User::register(PhoneNumber::parse("+15551234567").unwrap(), Role::Customer);
        user.issue_card(CardNumber::generate(), CardTier::Basic, 365, Timestamp::now())
            .unwrap();

        let o = overview(&[user], &[cafe], &txs, &today(), &Timestamp::now());
        assert_eq!(o.total_users, 1);
        assert_eq!(o.new_users, 1);
        assert_eq!(o.active_cards, 1);
        assert_eq!(o.active_shops, 1);
        assert_eq!(o.transaction_count, 2);
        assert_eq!(o.completed_count, 1);
        assert_eq!(o.gross_amount, money(1000));
        assert_eq!(o.discount_amount, money(100));
        assert_eq!(o.net_amount, money(900));
    }

    #[test]
    fn daily_groups_by_date() {
        let cafe = shop("Cafe", ShopCategory::Cafe);
        let txs = vec![sale(&cafe, 1000, 100, true), sale(&cafe, 200, 0, true)];
        let daily = daily_transactions(&txs, &today(), None);
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].count, 2);
        assert_eq!(daily[0].gross, money(1200));

        let other = ShopId::new();
        assert!(daily_transactions(&txs, &today(), Some(&other)).is_empty());
    }

    #[test]
    fn top_shops_orders_by_gross_and_limits() {
        let a = shop("A", ShopCategory::Cafe);
        let b = shop("B", ShopCategory::Cafe);
        let c = shop("C", ShopCategory::Cafe);
        let txs = vec![
            sale(&a, 100, 0, true),
            sale(&b, 900, 0, true),
            sale(&c, 500, 0, false),
        ];
        let top = top_shops(&[a, b, c], &txs, &today(), 5);
        let names: Vec<&str> = top.iter().map(|p| p.shop_name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);

        let a2 = shop("A", ShopCategory::Cafe);
        assert_eq!(top_shops(&[a2], &[], &today(), 1).len(), 0);
    }

    #[test]
    fn category_breakdown_counts_shops_and_sales() {
        let cafe = shop("Cafe", ShopCategory::Cafe);
        let gym = shop("Gym", ShopCategory::Health);
        let txs = vec![sale(&cafe, 1000, 150, true)];
        let stats = category_breakdown(&[cafe, gym], &txs, &today());
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].category, ShopCategory::Cafe);
        assert_eq!(stats[0].transaction_count, 1);
        assert_eq!(stats[0].discount_amount, money(150));
        assert_eq!(stats[1].category, ShopCategory::Health);
        assert_eq!(stats[1].transaction_count, 0);
    }
}
