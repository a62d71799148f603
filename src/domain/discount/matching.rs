//! Rule matching: which rules apply to a purchase and which one wins.
//!
//! Rules never stack. A purchase gets at most one discount, from the rule
//! that saves the customer the most.

use serde::Serialize;

use super::{DiscountKind, DiscountRule};
use crate::domain::foundation::{DiscountRuleId, Money, ShopId, Timestamp};
use crate::domain::user::CardTier;

/// The facts about a purchase that rules are evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseContext {
    pub shop_id: ShopId,
    pub amount: Money,
    pub tier: CardTier,
    pub at: Timestamp,
}

/// Outcome of applying the winning rule to a purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedDiscount {
    pub rule_id: DiscountRuleId,
    pub rule_name: String,
    pub original: Money,
    pub discount: Money,
    pub final_amount: Money,
}

impl DiscountRule {
    /// Whether every condition of this rule holds for `ctx`.
    ///
    /// `valid_from` is inclusive and `valid_until` exclusive.
    pub fn is_applicable(&self, ctx: &PurchaseContext) -> bool {
        if !self.is_active() {
            return false;
        }
        if let Some(shop_id) = self.shop_id() {
            if shop_id != &ctx.shop_id {
                return false;
            }
        }
        if ctx.amount < self.min_purchase() {
            return false;
        }
        if let Some(max) = self.max_purchase() {
            if ctx.amount > max {
                return false;
            }
        }
        if ctx.tier < self.min_tier() {
            return false;
        }
        ctx.at.is_within(self.valid_from(), self.valid_until())
    }

    /// Discount this rule gives on `amount`, never more than `amount`.
    pub fn discount_for(&self, amount: Money) -> Money {
        let raw = match self.kind() {
            DiscountKind::Percentage(pct) => amount.percent(pct),
            DiscountKind::FixedAmount(value) => value.min(amount),
        };
        let capped = match self.max_discount() {
            Some(cap) => raw.min(cap),
            None => raw,
        };
        capped.min(amount)
    }
}

/// Applicable rules, ordered by priority desc, then discount desc, then
/// oldest first.
pub fn find_applicable_rules<'a>(
    rules: &'a [DiscountRule],
    ctx: &PurchaseContext,
) -> Vec<&'a DiscountRule> {
    let mut applicable: Vec<(&DiscountRule, Money)> = rules
        .iter()
        .filter(|r| r.is_applicable(ctx))
        .map(|r| (r, r.discount_for(ctx.amount)))
        .collect();

    applicable.sort_by(|(a, da), (b, db)| {
        b.priority()
            .cmp(&a.priority())
            .then_with(|| db.cmp(da))
            .then_with(|| a.created_at().cmp(b.created_at()))
    });

    applicable.into_iter().map(|(r, _)| r).collect()
}

/// The single rule with the largest discount for `ctx`.
///
/// Ties go to the higher priority, then to the older rule. Returns `None`
/// when nothing applies or the best discount is zero.
pub fn best_discount(rules: &[DiscountRule], ctx: &PurchaseContext) -> Option<AppliedDiscount> {
    let (rule, discount) = rules
        .iter()
        .filter(|r| r.is_applicable(ctx))
        .map(|r| (r, r.discount_for(ctx.amount)))
        .max_by(|(a, da), (b, db)| {
            da.cmp(db)
                .then_with(|| a.priority().cmp(&b.priority()))
                // older wins, so a later created_at compares as smaller
                .then_with(|| b.created_at().cmp(a.created_at()))
        })?;

    if discount.is_zero() {
        return None;
    }

    Some(AppliedDiscount {
        rule_id: *rule.id(),
        rule_name: rule.name().to_string(),
        original: ctx.amount,
        discount,
        final_amount: ctx.amount.saturating_sub(discount),
    })
}

#[cfg(test)]
mod tests {
    use super::super::rule::test_support::*;
    use super::super::RuleTerms;
    use super::*;
    use proptest::prelude::*;

    fn money(c: i64) -> Money {
        Money::from_cents(c).unwrap()
    }

    fn ctx(shop_id: ShopId, amount: i64, tier: CardTier) -> PurchaseContext {
        PurchaseContext {
            shop_id,
            amount: money(amount),
            tier,
            at: Timestamp::now(),
        }
    }

    fn rule_with(shop_id: Option<ShopId>, f: impl FnOnce(&mut RuleTerms)) -> DiscountRule {
        let mut t = terms(pct(10));
        f(&mut t);
        DiscountRule::create(shop_id, t).unwrap()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // is_applicable
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn platform_rule_applies_to_any_shop() {
        let rule = rule_with(None, |_| {});
        assert!(rule.is_applicable(&ctx(ShopId::new(), 1000, CardTier::Basic)));
    }

    #[test]
    fn shop_rule_applies_only_to_its_shop() {
        let shop = ShopId::new();
        let rule = rule_with(Some(shop), |_| {});
        assert!(rule.is_applicable(&ctx(shop, 1000, CardTier::Basic)));
        assert!(!rule.is_applicable(&ctx(ShopId::new(), 1000, CardTier::Basic)));
    }

    #[test]
    fn inactive_rule_never_applies() {
        let mut rule = rule_with(None, |_| {});
        rule.deactivate().unwrap();
        assert!(!rule.is_applicable(&ctx(ShopId::new(), 1000, CardTier::Platinum)));
    }

    #[test]
    fn purchase_bounds_are_inclusive() {
        let rule = rule_with(None, |t| {
            t.min_purchase = money(500);
            t.max_purchase = Some(money(1000));
        });
        let shop = ShopId::new();
        assert!(!rule.is_applicable(&ctx(shop, 499, CardTier::Basic)));
        assert!(rule.is_applicable(&ctx(shop, 500, CardTier::Basic)));
        assert!(rule.is_applicable(&ctx(shop, 1000, CardTier::Basic)));
        assert!(!rule.is_applicable(&ctx(shop, 1001, CardTier::Basic)));
    }

    #[test]
    fn tier_must_meet_minimum() {
        let rule = rule_with(None, |t| t.min_tier = CardTier::Gold);
        let shop = ShopId::new();
        assert!(!rule.is_applicable(&ctx(shop, 100, CardTier::Silver)));
        assert!(rule.is_applicable(&ctx(shop, 100, CardTier::Gold)));
        assert!(rule.is_applicable(&ctx(shop, 100, CardTier::Platinum)));
    }

    #[test]
    fn validity_window_is_half_open() {
        let start = Timestamp::now();
        let end = start.plus_secs(3600);
        let rule = rule_with(None, |t| {
            t.valid_from = Some(start);
            t.valid_until = Some(end);
        });
        let mut c = ctx(ShopId::new(), 100, CardTier::Basic);

        c.at = start.minus_secs(1);
        assert!(!rule.is_applicable(&c));
        c.at = start;
        assert!(rule.is_applicable(&c));
        c.at = end.minus_secs(1);
        assert!(rule.is_applicable(&c));
        c.at = end;
        assert!(!rule.is_applicable(&c));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // discount_for
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn percentage_discount_rounds_down() {
        let rule = rule_with(None, |t| t.kind = pct(15));
        assert_eq!(rule.discount_for(money(999)), money(149));
    }

    #[test]
    fn fixed_discount_never_exceeds_amount() {
        let rule = rule_with(None, |t| t.kind = fixed(500));
        assert_eq!(rule.discount_for(money(300)), money(300));
        assert_eq!(rule.discount_for(money(800)), money(500));
    }

    #[test]
    fn max_discount_caps_percentage() {
        let rule = rule_with(None, |t| {
            t.kind = pct(50);
            t.max_discount = Some(money(1000));
        });
        assert_eq!(rule.discount_for(money(10_000)), money(1000));
        assert_eq!(rule.discount_for(money(1000)), money(500));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // find_applicable_rules / best_discount
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn applicable_rules_ordered_by_priority_then_discount() {
        let shop = ShopId::new();
        let low_prio_big = rule_with(Some(shop), |t| {
            t.name = "big".into();
            t.kind = pct(50);
        });
        let high_prio_small = rule_with(None, |t| {
            t.name = "prio".into();
            t.kind = pct(5);
            t.priority = 10;
        });
        let low_prio_small = rule_with(Some(shop), |t| {
            t.name = "small".into();
            t.kind = pct(10);
        });
        let gold_only = rule_with(Some(shop), |t| {
            t.name = "gold".into();
            t.min_tier = CardTier::Gold;
        });
        let rules = vec![low_prio_small, gold_only, high_prio_small, low_prio_big];

        let names: Vec<&str> = find_applicable_rules(&rules, &ctx(shop, 1000, CardTier::Basic))
            .iter()
            .map(|r| r.name())
            .collect();
        assert_eq!(names, vec!["prio", "big", "small"]);
    }

    #[test]
    fn best_discount_picks_largest_saving_not_priority() {
        let shop = ShopId::new();
        let rules = vec![
            rule_with(None, |t| {
                t.name = "prio".into();
                t.kind = pct(5);
                t.priority = 100;
            }),
            rule_with(Some(shop), |t| {
                t.name = "fixed".into();
                t.kind = fixed(300);
            }),
        ];
        let applied = best_discount(&rules, &ctx(shop, 2000, CardTier::Basic)).unwrap();
        assert_eq!(applied.rule_name, "fixed");
        assert_eq!(applied.discount, money(300));
        assert_eq!(applied.final_amount, money(1700));
        assert_eq!(applied.original, money(2000));
    }

    #[test]
    fn best_discount_ties_go_to_priority_then_age() {
        let shop = ShopId::new();
        let older = rule_with(None, |t| t.name = "older".into());
        let newer = rule_with(None, |t| t.name = "newer".into());
        let rules = vec![newer.clone(), older.clone()];
        let c = ctx(shop, 1000, CardTier::Basic);

        let winner = best_discount(&rules, &c).unwrap();
        assert_eq!(winner.rule_name, "older");

        let prioritized = rule_with(None, |t| {
            t.name = "prioritized".into();
            t.priority = 1;
        });
        let rules = vec![older, newer, prioritized];
        assert_eq!(best_discount(&rules, &c).unwrap().rule_name, "prioritized");
    }

    #[test]
    fn zero_discount_is_not_applied() {
        let rule = rule_with(None, |t| t.kind = pct(10));
        assert!(best_discount(&[rule], &ctx(ShopId::new(), 5, CardTier::Basic)).is_none());
    }

    #[test]
    fn no_rules_means_no_discount() {
        assert!(best_discount(&[], &ctx(ShopId::new(), 500, CardTier::Basic)).is_none());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Properties
    // ─────────────────────────────────────────────────────────────────────────

    fn arb_kind() -> impl Strategy<Value = DiscountKind> {
        prop_oneof![
            (1u8..=100).prop_map(pct),
            (1i64..=100_000).prop_map(fixed),
        ]
    }

    fn arb_tier() -> impl Strategy<Value = CardTier> {
        prop_oneof![
            Just(CardTier::Basic),
            Just(CardTier::Silver),
            Just(CardTier::Gold),
            Just(CardTier::Platinum),
        ]
    }

    proptest! {
        #[test]
        fn prop_discount_never_exceeds_amount(
            kind in arb_kind(),
            cap in proptest::option::of(1i64..=50_000),
            amount in 0i64..=10_000_000,
        ) {
            let rule = rule_with(None, |t| {
                t.kind = kind;
                t.max_discount = cap.map(money);
            });
            let d = rule.discount_for(money(amount));
            prop_assert!(d <= money(amount));
            if let Some(c) = cap {
                prop_assert!(d <= money(c));
            }
        }

        #[test]
        fn prop_applicable_rules_satisfy_every_condition(
            specs in proptest::collection::vec(
                (arb_kind(), 0i64..=5_000, arb_tier(), any::<bool>(), any::<bool>()),
                0..12,
            ),
            amount in 0i64..=10_000,
            tier in arb_tier(),
        ) {
            let shop = ShopId::new();
            let other = ShopId::new();
            let rules: Vec<DiscountRule> = specs
                .into_iter()
                .map(|(kind, min, min_tier, own_shop, active)| {
                    let mut r = rule_with(if own_shop { Some(shop) } else { Some(other) }, |t| {
                        t.kind = kind;
                        t.min_purchase = money(min);
                        t.min_tier = min_tier;
                    });
                    if !active {
                        r.deactivate().unwrap();
                    }
                    r
                })
                .collect();
            let c = ctx(shop, amount, tier);

            for r in find_applicable_rules(&rules, &c) {
                prop_assert!(r.is_active());
                prop_assert_eq!(r.shop_id(), Some(&shop));
                prop_assert!(money(amount) >= r.min_purchase());
                prop_assert!(tier >= r.min_tier());
            }

            if let Some(best) = best_discount(&rules, &c) {
                let max = find_applicable_rules(&rules, &c)
                    .iter()
                    .map(|r| r.discount_for(c.amount))
                    .max()
                    .unwrap();
                prop_assert_eq!(best.discount, max);
                prop_assert_eq!(best.final_amount.cents() + best.discount.cents(), amount);
            }
        }
    }
}
