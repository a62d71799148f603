use super::{Transaction, TransactionStatus};
use crate::domain::foundation::{DateRange, PageRequest, ShopId, UserId};

/// Criteria for listing transactions, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub user_id: Option<UserId>,
    pub shop_id: Option<ShopId>,
    pub status: Option<TransactionStatus>,
    pub range: Option<DateRange>,
    pub page: PageRequest,
}

impl TransactionFilter {
    pub fn matches(&self, tx: &Transaction) -> bool {
        self.user_id.map_or(true, |id| tx.user_id() == &id)
            && self.shop_id.map_or(true, |id| tx.shop_id() == &id)
            && self.status.map_or(true, |s| tx.status() == s)
            && self.range.map_or(true, |r| r.contains(tx.created_at()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Money, Timestamp};
    use crate::domain::user::CardNumber;

    fn tx(user: UserId, shop: ShopId) -> Transaction {
        Transaction::record(
            user,
            shop,
            CardNumber::generate(),
            Money::from_cents(100).unwrap(),
            None,
            None,
            UserId::new(),
        )
        .unwrap()
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(TransactionFilter::default().matches(&tx(UserId::new(), ShopId::new())));
    }

    #[test]
    fn filters_combine() {
        let user = UserId::new();
        let shop = ShopId::new();
        let t = tx(user, shop);

        let by_user = TransactionFilter {
            user_id: Some(user),
            ..Default::default()
        };
        assert!(by_user.matches(&t));

        let wrong_shop = TransactionFilter {
            user_id: Some(user),
            shop_id: Some(ShopId::new()),
            ..Default::default()
        };
        assert!(!wrong_shop.matches(&t));

        let completed = TransactionFilter {
            status: Some(TransactionStatus::Completed),
            ..Default::default()
        };
        assert!(!completed.matches(&t));
    }

    #[test]
    fn date_range_uses_creation_day() {
        let t = tx(UserId::new(), ShopId::new());
        let today = TransactionFilter {
            range: Some(DateRange::last_days(1, Timestamp::now()).unwrap()),
            ..Default::default()
        };
        assert!(today.matches(&t));

        let old = Timestamp::now().minus_days(30);
        let last_month = TransactionFilter {
            range: Some(DateRange::new(old.date(), old.add_days(1).date()).unwrap()),
            ..Default::default()
        };
        assert!(!last_month.matches(&t));
    }
}
