//! Discount module: rules offered by shops or the platform, and the matching
//! that decides which one applies to a purchase.

mod matching;
mod rule;

pub use matching::{best_discount, find_applicable_rules, AppliedDiscount, PurchaseContext};
pub use rule::{DiscountKind, DiscountRule, RuleTerms, MAX_RULE_NAME_LENGTH};

#[cfg(test)]
pub(crate) use rule::test_support;
