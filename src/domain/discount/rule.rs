//! Discount rule aggregate.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DiscountRuleId, DomainError, ErrorCode, Money, Percentage, ShopId, Timestamp, ValidationError,
};
use crate::domain::user::CardTier;

pub const MAX_RULE_NAME_LENGTH: usize = 120;

/// How much a rule takes off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DiscountKind {
    Percentage(Percentage),
    FixedAmount(Money),
}

impl DiscountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountKind::Percentage(_) => "percentage",
            DiscountKind::FixedAmount(_) => "fixed_amount",
        }
    }

    /// Raw value: whole percent or cents.
    pub fn raw_value(&self) -> i64 {
        match self {
            DiscountKind::Percentage(p) => i64::from(p.value()),
            DiscountKind::FixedAmount(m) => m.cents(),
        }
    }

    /// Rebuilds a kind from its stored name and raw value.
    pub fn from_parts(kind: &str, value: i64) -> Result<Self, ValidationError> {
        match kind {
            "percentage" => Ok(DiscountKind::Percentage(Percentage::from_field("value", value)?)),
            "fixed_amount" => Ok(DiscountKind::FixedAmount(Money::from_cents_field("value", value)?)),
            other => Err(ValidationError::invalid_format(
                "kind",
                format!("unknown discount kind '{}'", other),
            )),
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            DiscountKind::Percentage(p) if p.is_zero() => Err(ValidationError::out_of_range(
                "value", 1, 100, 0,
            )),
            DiscountKind::FixedAmount(m) if m.is_zero() => Err(ValidationError::invalid_format(
                "value",
                "fixed discount must be greater than zero",
            )),
            _ => Ok(()),
        }
    }
}

/// The editable terms of a rule, validated as a unit.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleTerms {
    pub name: String,
    pub description: Option<String>,
    pub kind: DiscountKind,
    pub min_purchase: Money,
    pub max_purchase: Option<Money>,
    pub max_discount: Option<Money>,
    pub min_tier: CardTier,
    pub valid_from: Option<Timestamp>,
    pub valid_until: Option<Timestamp>,
    pub priority: i32,
}

impl RuleTerms {
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        let len = self.name.chars().count();
        if len > MAX_RULE_NAME_LENGTH {
            return Err(ValidationError::out_of_range(
                "name",
                1,
                MAX_RULE_NAME_LENGTH as i64,
                len as i64,
            ));
        }
        self.description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        self.kind.validate()?;

        if let Some(max) = self.max_purchase {
            if max < self.min_purchase {
                return Err(ValidationError::invalid_format(
                    "max_purchase_cents",
                    "must not be less than min_purchase_cents",
                ));
            }
        }
        if let Some(cap) = self.max_discount {
            if cap.is_zero() {
                return Err(ValidationError::invalid_format(
                    "max_discount_cents",
                    "must be greater than zero",
                ));
            }
        }
        if let (Some(from), Some(until)) = (self.valid_from, self.valid_until) {
            if !from.is_before(&until) {
                return Err(ValidationError::invalid_format(
                    "valid_until",
                    "must be after valid_from",
                ));
            }
        }
        Ok(self)
    }
}

/// A discount offered by one shop, or platform-wide when `shop_id` is `None`.
///
/// # Invariants
///
/// - `name` non-empty, at most 120 characters
/// - `min_purchase <= max_purchase` when a maximum is set
/// - `valid_from < valid_until` when both are set
/// - `max_discount > 0` when set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountRule {
    id: DiscountRuleId,
    shop_id: Option<ShopId>,
    name: String,
    description: Option<String>,
    kind: DiscountKind,
    min_purchase: Money,
    max_purchase: Option<Money>,
    max_discount: Option<Money>,
    min_tier: CardTier,
    valid_from: Option<Timestamp>,
    valid_until: Option<Timestamp>,
    active: bool,
    priority: i32,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl DiscountRule {
    /// Creates an active rule.
    pub fn create(shop_id: Option<ShopId>, terms: RuleTerms) -> Result<Self, DomainError> {
        let terms = terms.validated()?;
        let now = Timestamp::now();
        Ok(Self {
            id: DiscountRuleId::new(),
            shop_id,
            name: terms.name,
            description: terms.description,
            kind: terms.kind,
            min_purchase: terms.min_purchase,
            max_purchase: terms.max_purchase,
            max_discount: terms.max_discount,
            min_tier: terms.min_tier,
            valid_from: terms.valid_from,
            valid_until: terms.valid_until,
            active: true,
            priority: terms.priority,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitute a rule from persistence.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: DiscountRuleId,
        shop_id: Option<ShopId>,
        terms: RuleTerms,
        active: bool,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            shop_id,
            name: terms.name,
            description: terms.description,
            kind: terms.kind,
            min_purchase: terms.min_purchase,
            max_purchase: terms.max_purchase,
            max_discount: terms.max_discount,
            min_tier: terms.min_tier,
            valid_from: terms.valid_from,
            valid_until: terms.valid_until,
            active,
            priority: terms.priority,
            created_at,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &DiscountRuleId {
        &self.id
    }

    pub fn shop_id(&self) -> Option<&ShopId> {
        self.shop_id.as_ref()
    }

    pub fn is_platform_wide(&self) -> bool {
        self.shop_id.is_none()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn kind(&self) -> DiscountKind {
        self.kind
    }

    pub fn min_purchase(&self) -> Money {
        self.min_purchase
    }

    pub fn max_purchase(&self) -> Option<Money> {
        self.max_purchase
    }

    pub fn max_discount(&self) -> Option<Money> {
        self.max_discount
    }

    pub fn min_tier(&self) -> CardTier {
        self.min_tier
    }

    pub fn valid_from(&self) -> Option<&Timestamp> {
        self.valid_from.as_ref()
    }

    pub fn valid_until(&self) -> Option<&Timestamp> {
        self.valid_until.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Current terms, e.g. as the base for a partial update.
    pub fn terms(&self) -> RuleTerms {
        RuleTerms {
            name: self.name.clone(),
            description: self.description.clone(),
            kind: self.kind,
            min_purchase: self.min_purchase,
            max_purchase: self.max_purchase,
            max_discount: self.max_discount,
            min_tier: self.min_tier,
            valid_from: self.valid_from,
            valid_until: self.valid_until,
            priority: self.priority,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    pub fn update(&mut self, terms: RuleTerms) -> Result<(), DomainError> {
        let terms = terms.validated()?;
        self.name = terms.name;
        self.description = terms.description;
        self.kind = terms.kind;
        self.min_purchase = terms.min_purchase;
        self.max_purchase = terms.max_purchase;
        self.max_discount = terms.max_discount;
        self.min_tier = terms.min_tier;
        self.valid_from = terms.valid_from;
        self.valid_until = terms.valid_until;
        self.priority = terms.priority;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    pub fn activate(&mut self) -> Result<(), DomainError> {
        if self.active {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Rule is already active",
            ));
        }
        self.active = true;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    pub fn deactivate(&mut self) -> Result<(), DomainError> {
        if !self.active {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Rule is already inactive",
            ));
        }
        self.active = false;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}
