//! HTTP DTOs for discount rules and quotes.
//!
//! Money crosses the wire as integer cents in `*_cents` fields. A rule's
//! `value` is a whole percent for `percentage` rules and cents for
//! `fixed_amount` rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::adapters::http::dto::rfc3339;
use crate::adapters::http::error::ApiError;
use crate::application::handlers::discount::PurchaseQuote;
use crate::domain::discount::{DiscountKind, DiscountRule, RuleTerms};
use crate::domain::foundation::{Money, Timestamp};
use crate::domain::user::CardTier;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Body for creating or replacing a rule's terms.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// `percentage` or `fixed_amount`.
    pub kind: String,
    pub value: i64,
    #[serde(default)]
    pub min_purchase_cents: i64,
    #[serde(default)]
    pub max_purchase_cents: Option<i64>,
    #[serde(default)]
    pub max_discount_cents: Option<i64>,
    #[serde(default)]
    pub min_tier: CardTier,
    #[serde(default)]
    pub valid_from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub valid_until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub priority: i32,
}

impl RuleRequest {
    pub fn into_terms(self) -> Result<RuleTerms, ApiError> {
        let max_purchase = self
            .max_purchase_cents
            .map(|c| Money::from_cents_field("max_purchase_cents", c))
            .transpose()?;
        let max_discount = self
            .max_discount_cents
            .map(|c| Money::from_cents_field("max_discount_cents", c))
            .transpose()?;

        Ok(RuleTerms {
            name: self.name,
            description: self.description,
            kind: DiscountKind::from_parts(&self.kind, self.value)?,
            min_purchase: Money::from_cents_field("min_purchase_cents", self.min_purchase_cents)?,
            max_purchase,
            max_discount,
            min_tier: self.min_tier,
            valid_from: self.valid_from.map(Timestamp::from_datetime),
            valid_until: self.valid_until.map(Timestamp::from_datetime),
            priority: self.priority,
        })
    }
}

/// `?include_inactive=true` on rule listings.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ListRulesParams {
    #[serde(default)]
    pub include_inactive: bool,
}

/// POST /discounts/quote
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteRequest {
    pub shop_id: String,
    pub card_number: String,
    pub amount_cents: i64,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct RuleResponse {
    pub id: String,
    /// `None` for platform-wide rules.
    pub shop_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub kind: &'static str,
    pub value: i64,
    pub min_purchase_cents: i64,
    pub max_purchase_cents: Option<i64>,
    pub max_discount_cents: Option<i64>,
    pub min_tier: CardTier,
    pub valid_from: Option<String>,
    pub valid_until: Option<String>,
    pub priority: i32,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&DiscountRule> for RuleResponse {
    fn from(rule: &DiscountRule) -> Self {
        let kind = rule.kind();
        Self {
            id: rule.id().to_string(),
            shop_id: rule.shop_id().map(|id| id.to_string()),
            name: rule.name().to_string(),
            description: rule.description().map(str::to_string),
            kind: kind.as_str(),
            value: kind.raw_value(),
            min_purchase_cents: rule.min_purchase().cents(),
            max_purchase_cents: rule.max_purchase().map(|m| m.cents()),
            max_discount_cents: rule.max_discount().map(|m| m.cents()),
            min_tier: rule.min_tier(),
            valid_from: rule.valid_from().map(rfc3339),
            valid_until: rule.valid_until().map(rfc3339),
            priority: rule.priority(),
            is_active: rule.is_active(),
            created_at: rfc3339(rule.created_at()),
            updated_at: rfc3339(rule.updated_at()),
        }
    }
}

impl From<DiscountRule> for RuleResponse {
    fn from(rule: DiscountRule) -> Self {
        Self::from(&rule)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AppliedRuleResponse {
    pub rule_id: String,
    pub rule_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuoteResponse {
    pub shop_id: String,
    pub shop_name: String,
    pub card_number: String,
    pub holder_name: Option<String>,
    pub tier: CardTier,
    pub amount_cents: i64,
    pub discount_cents: i64,
    pub final_amount_cents: i64,
    pub applied_rule: Option<AppliedRuleResponse>,
    pub applicable_rules: Vec<RuleResponse>,
}

impl From<&PurchaseQuote> for QuoteResponse {
    fn from(quote: &PurchaseQuote) -> Self {
        Self {
            shop_id: quote.shop.id().to_string(),
            shop_name: quote.shop.name().to_string(),
            card_number: quote
                .holder
                .card()
                .map(|c| c.number().masked())
                .unwrap_or_default(),
            holder_name: quote.holder.name().map(str::to_string),
            tier: quote.tier,
            amount_cents: quote.amount.cents(),
            discount_cents: quote.discount().cents(),
            final_amount_cents: quote.final_amount().cents(),
            applied_rule: quote.best.as_ref().map(|b| AppliedRuleResponse {
                rule_id: b.rule_id.to_string(),
                rule_name: b.rule_name.clone(),
            }),
            applicable_rules: quote.applicable.iter().map(RuleResponse::from).collect(),
        }
    }
}
