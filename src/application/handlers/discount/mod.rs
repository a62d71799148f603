//! Discount handlers.
//!
//! ## Commands
//! - Create, update, activate, deactivate and delete rules
//!
//! ## Queries
//! - List a shop's rules, or the platform-wide ones
//! - Quote the discount a card gets for a purchase

mod list_rules;
mod manage_rules;
mod quote_discount;

pub use list_rules::{ListRulesHandler, ListRulesQuery};
pub use manage_rules::{
    ChangeRuleStateCommand, CreateRuleCommand, DeleteRuleCommand, ManageRulesHandler, RuleAction,
    UpdateRuleCommand,
};
pub use quote_discount::{PurchaseQuote, QuoteDiscountCommand, QuoteDiscountHandler};

#[cfg(test)]
pub(crate) use quote_discount::fixtures;
