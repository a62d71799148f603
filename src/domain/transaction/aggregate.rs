//! Transaction aggregate: one card purchase at one shop.

use serde::{Deserialize, Serialize};

use super::TransactionStatus;
use crate::domain::discount::AppliedDiscount;
use crate::domain::foundation::{
    DiscountRuleId, DomainError, Money, ShopId, StateMachine, Timestamp, TransactionId, UserId,
    ValidationError,
};
use crate::domain::user::CardNumber;

pub const MAX_NOTE_LENGTH: usize = 500;

/// # Invariants
///
/// - `original_amount > 0`
/// - `discount_amount <= original_amount`
/// - `final_amount == original_amount - discount_amount`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    id: TransactionId,
    user_id: UserId,
    shop_id: ShopId,
    card_number: CardNumber,
    original_amount: Money,
    discount_amount: Money,
    final_amount: Money,
    applied_rule_id: Option<DiscountRuleId>,
    status: TransactionStatus,
    note: Option<String>,
    recorded_by: UserId,
    created_at: Timestamp,
    updated_at: Timestamp,
    completed_at: Option<Timestamp>,
}

impl Transaction {
    /// Records a pending purchase with the discount chosen for it, if any.
    pub fn record(
        user_id: UserId,
        shop_id: ShopId,
        card_number: CardNumber,
        amount: Money,
        applied: Option<&AppliedDiscount>,
        note: Option<String>,
        recorded_by: UserId,
    ) -> Result<Self, DomainError> {
        if !amount.is_positive() {
            return Err(ValidationError::invalid_format(
                "amount_cents",
                "must be greater than zero",
            )
            .into());
        }

        let (discount, rule_id) = match applied {
            Some(a) => (a.discount.min(amount), Some(a.rule_id)),
            None => (Money::ZERO, None),
        };

        let note = note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        if let Some(n) = &note {
            let len = n.chars().count();
            if len > MAX_NOTE_LENGTH {
                return Err(ValidationError::out_of_range(
                    "note",
                    0,
                    MAX_NOTE_LENGTH as i64,
                    len as i64,
                )
                .into());
            }
        }

        let now = Timestamp::now();
        Ok(Self {
            id: TransactionId::new(),
            user_id,
            shop_id,
            card_number,
            original_amount: amount,
            discount_amount: discount,
            final_amount: amount.saturating_sub(discount),
            applied_rule_id: rule_id,
            status: TransactionStatus::Pending,
            note,
            recorded_by,
            created_at: now,
            updated_at: now,
            completed_at: None,
        })
    }

    /// Reconstitute a transaction from persistence.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: TransactionId,
        user_id: UserId,
        shop_id: ShopId,
        card_number: CardNumber,
        original_amount: Money,
        discount_amount: Money,
        final_amount: Money,
        applied_rule_id: Option<DiscountRuleId>,
        status: TransactionStatus,
        note: Option<String>,
        recorded_by: UserId,
        created_at: Timestamp,
        updated_at: Timestamp,
        completed_at: Option<Timestamp>,
    ) -> Self {
        Self {
            id,
            user_id,
            shop_id,
            card_number,
            original_amount,
            discount_amount,
            final_amount,
            applied_rule_id,
            status,
            note,
            recorded_by,
            created_at,
            updated_at,
            completed_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn shop_id(&self) -> &ShopId {
        &self.shop_id
    }

    pub fn card_number(&self) -> &CardNumber {
        &self.card_number
    }

    pub fn original_amount(&self) -> Money {
        self.original_amount
    }

    pub fn discount_amount(&self) -> Money {
        self.discount_amount
    }

    pub fn final_amount(&self) -> Money {
        self.final_amount
    }

    pub fn applied_rule_id(&self) -> Option<&DiscountRuleId> {
        self.applied_rule_id.as_ref()
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn recorded_by(&self) -> &UserId {
        &self.recorded_by
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    pub fn completed_at(&self) -> Option<&Timestamp> {
        self.completed_at.as_ref()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    pub fn complete(&mut self) -> Result<(), DomainError> {
        self.move_to(TransactionStatus::Completed)?;
        self.completed_at = Some(self.updated_at);
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), DomainError> {
        self.move_to(TransactionStatus::Cancelled)
    }

    pub fn refund(&mut self) -> Result<(), DomainError> {
        self.move_to(TransactionStatus::Refunded)
    }

    fn move_to(&mut self, target: TransactionStatus) -> Result<(), DomainError> {
        self.status = self.status.transition_to(target)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}
