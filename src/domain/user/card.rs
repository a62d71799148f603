//! Discount card value objects.
//!
//! A card is embedded in its holder's `User`; there is at most one per user.

use rand::rngs::OsRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, ValidationError};

/// Issuer prefix shared by every card number.
pub const CARD_PREFIX: &str = "7700";

/// Total number of digits, including the Luhn check digit.
pub const CARD_NUMBER_LENGTH: usize = 16;

/// Membership tier. Ordering follows privilege, so `Gold >= Silver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardTier {
    #[default]
    Basic,
    Silver,
    Gold,
    Platinum,
}

impl CardTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardTier::Basic => "basic",
            CardTier::Silver => "silver",
            CardTier::Gold => "gold",
            CardTier::Platinum => "platinum",
        }
    }
}

impl fmt::Display for CardTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardTier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(CardTier::Basic),
            "silver" => Ok(CardTier::Silver),
            "gold" => Ok(CardTier::Gold),
            "platinum" => Ok(CardTier::Platinum),
            other => Err(ValidationError::invalid_format(
                "tier",
                format!("unknown card tier '{}'", other),
            )),
        }
    }
}

/// A 16 digit card number starting with `7700` and ending in a Luhn digit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CardNumber(String);

impl CardNumber {
    /// Generates a fresh random number from the OS CSPRNG.
    pub fn generate() -> Self {
        let mut rng = OsRng;
        let mut payload = String::with_capacity(CARD_NUMBER_LENGTH);
        payload.push_str(CARD_PREFIX);
        while payload.len() < CARD_NUMBER_LENGTH - 1 {
            let digit: u8 = rng.gen_range(0..10);
            payload.push(char::from(b'0' + digit));
        }
        let check = luhn_check_digit(&payload);
        payload.push(char::from(b'0' + check));
        Self(payload)
    }

    /// Parses a number typed by a cashier; spaces and dashes are ignored.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let digits: String = input
            .chars()
            .filter(|c| !matches!(c, ' ' | '-'))
            .collect();

        if digits.is_empty() {
            return Err(ValidationError::empty_field("card_number"));
        }
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::invalid_format("card_number", "must contain only digits"));
        }
        if digits.len() != CARD_NUMBER_LENGTH {
            return Err(ValidationError::invalid_format(
                "card_number",
                format!("must have {} digits", CARD_NUMBER_LENGTH),
            ));
        }
        if !digits.starts_with(CARD_PREFIX) {
            return Err(ValidationError::invalid_format("card_number", "unknown issuer prefix"));
        }

        let (payload, check) = digits.split_at(CARD_NUMBER_LENGTH - 1);
        let expected = luhn_check_digit(payload);
        if check.as_bytes()[0] - b'0' != expected {
            return Err(ValidationError::invalid_format("card_number", "checksum mismatch"));
        }

        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Only the last four digits visible, e.g. `**** **** **** 1234`.
    pub fn masked(&self) -> String {
        let last4 = &self.0[self.0.len() - 4..];
        format!("**** **** **** {}", last4)
    }
}

/// Luhn check digit for an all-digit payload.
fn luhn_check_digit(payload: &str) -> u8 {
    let sum: u32 = payload
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let d = u32::from(b - b'0');
            if i % 2 == 0 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();
    ((10 - (sum % 10)) % 10) as u8
}

impl TryFrom<String> for CardNumber {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CardNumber> for String {
    fn from(n: CardNumber) -> Self {
        n.0
    }
}

impl fmt::Display for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    Active,
    Blocked,
}

impl CardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardStatus::Active => "active",
            CardStatus::Blocked => "blocked",
        }
    }
}

impl FromStr for CardStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(CardStatus::Active),
            "blocked" => Ok(CardStatus::Blocked),
            other => Err(ValidationError::invalid_format(
                "card_status",
                format!("unknown card status '{}'", other),
            )),
        }
    }
}

/// A discount card held by one user.
///
/// # Invariants
///
/// - `issued_at < expires_at`
/// - A card is usable only while `Active` and not yet expired
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountCard {
    number: CardNumber,
    tier: CardTier,
    status: CardStatus,
    issued_at: Timestamp,
    expires_at: Timestamp,
}

impl DiscountCard {
    /// Issues a new active card valid for `validity_days` from `now`.
    pub fn issue(
        number: CardNumber,
        tier: CardTier,
        validity_days: u32,
        now: Timestamp,
    ) -> Result<Self, DomainError> {
        if validity_days == 0 {
            return Err(DomainError::validation("validity_days", "Validity must be at least one day"));
        }
        Ok(Self {
            number,
            tier,
            status: CardStatus::Active,
            issued_at: now,
            expires_at: now.add_days(i64::from(validity_days)),
        })
    }

    /// Reconstitute a card from persistence.
    pub fn reconstitute(
        number: CardNumber,
        tier: CardTier,
        status: CardStatus,
        issued_at: Timestamp,
        expires_at: Timestamp,
    ) -> Self {
        Self {
            number,
            tier,
            status,
            issued_at,
            expires_at,
        }
    }

    pub fn number(&self) -> &CardNumber {
        &self.number
    }

    pub fn tier(&self) -> CardTier {
        self.tier
    }

    pub fn status(&self) -> CardStatus {
        self.status
    }

    pub fn issued_at(&self) -> &Timestamp {
        &self.issued_at
    }

    pub fn expires_at(&self) -> &Timestamp {
        &self.expires_at
    }

    pub fn is_expired(&self, now: &Timestamp) -> bool {
        !now.is_before(&self.expires_at)
    }

    pub fn is_usable(&self, now: &Timestamp) -> bool {
        self.status == CardStatus::Active && !self.is_expired(now)
    }

    /// Fails with `CardNotUsable` unless the card can be used at `now`.
    pub fn ensure_usable(&self, now: &Timestamp) -> Result<(), DomainError> {
        if self.status == CardStatus::Blocked {
            return Err(DomainError::new(ErrorCode::CardNotUsable, "Card is blocked"));
        }
        if self.is_expired(now) {
            return Err(DomainError::new(ErrorCode::CardNotUsable, "Card has expired"));
        }
        Ok(())
    }

    pub fn block(&mut self) -> Result<(), DomainError> {
        if self.status == CardStatus::Blocked {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Card is already blocked",
            ));
        }
        self.status = CardStatus::Blocked;
        Ok(())
    }

    pub fn unblock(&mut self) -> Result<(), DomainError> {
        if self.status == CardStatus::Active {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Card is not blocked",
            ));
        }
        self.status = CardStatus::Active;
        Ok(())
    }

    pub fn change_tier(&mut self, tier: CardTier) {
        self.tier = tier;
    }

    /// Extends validity. Time left on an unexpired card is kept.
    pub fn renew(&mut self, validity_days: u32, now: Timestamp) -> Result<(), DomainError> {
        if validity_days == 0 {
            return Err(DomainError::validation("validity_days", "Validity must be at least one day"));
        }
        let base = if self.expires_at.is_after(&now) {
            self.expires_at
        } else {
            now
        };
        self.expires_at = base.add_days(i64::from(validity_days));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_are_ordered_by_privilege() {
        assert!(CardTier::Basic < CardTier::Silver);
        assert!(CardTier::Silver < CardTier::Gold);
        assert!(CardTier::Gold < CardTier::Platinum);
        assert_eq!("gold".parse::<CardTier>().unwrap(), CardTier::Gold);
    }

    #[test]
    fn generated_numbers_are_valid() {
        for _ in 0..50 {
            let n = CardNumber::generate();
            assert_eq!(n.as_str().len(), CARD_NUMBER_LENGTH);
            assert!(n.as_str().starts_with(CARD_PREFIX));
            assert_eq!(CardNumber::parse(n.as_str()).unwrap(), n);
        }
    }

    #[test]
    fn luhn_digit_matches_known_value() {
        // 7992739871 has check digit 3
        assert_eq!(luhn_check_digit("7992739871"), 3);
    }

    #[test]
    fn parse_rejects_bad_checksum() {
        let n = CardNumber::generate();
        let mut chars: Vec<char> = n.as_str().chars().collect();
        let last = chars[15].to_digit(10).unwrap();
        chars[15] = char::from_digit((last + 1) % 10, 10).unwrap();
        let tampered: String = chars.into_iter().collect();
        assert!(CardNumber::parse(&tampered).is_err());
    }

    #[test]
    fn parse_ignores_separators_and_checks_prefix() {
        let n = CardNumber::generate();
        let s = n.as_str();
        let spaced = format!("{} {} {} {}", &s[0..4], &s[4..8], &s[8..12], &s[12..16]);
        assert_eq!(CardNumber::parse(&spaced).unwrap(), n);
        assert!(CardNumber::parse("4111111111111111").is_err());
        assert!(CardNumber::parse("7700").is_err());
    }

    #[test]
    fn masked_shows_last_four() {
        let n = CardNumber::generate();
        let masked = n.masked();
        assert!(masked.starts_with("**** **** **** "));
        assert!(masked.ends_with(&n.as_str()[12..]));
    }

    #[test]
    fn card_expires_at_validity_boundary() {
        let now = Timestamp::now();
        let card = DiscountCard::issue(CardNumber::generate(), CardTier::Basic, 30, now).unwrap();
        assert!(card.is_usable(&now));
        assert!(!card.is_usable(&now.add_days(30)));
    }

    #[test]
    fn blocked_card_is_not_usable() {
        let now = Timestamp::now();
        let mut card = DiscountCard::issue(CardNumber::generate(), CardTier::Gold, 30, now).unwrap();
        card.block().unwrap();
        assert!(!card.is_usable(&now));
        assert_eq!(card.ensure_usable(&now).unwrap_err().code, ErrorCode::CardNotUsable);
        assert!(card.block().is_err());
        card.unblock().unwrap();
        assert!(card.is_usable(&now));
    }

    #[test]
    fn renew_extends_from_current_expiry_when_unexpired() {
        let now = Timestamp::now();
        let mut card = DiscountCard::issue(CardNumber::generate(), CardTier::Basic, 10, now).unwrap();
        card.renew(30, now).unwrap();
        assert_eq!(*card.expires_at(), now.add_days(40));
    }

    #[test]
    fn renew_counts_from_now_when_expired() {
        let issued = Timestamp::now().minus_days(100);
        let mut card = DiscountCard::issue(CardNumber::generate(), CardTier::Basic, 10, issued).unwrap();
        let now = Timestamp::now();
        card.renew(30, now).unwrap();
        assert_eq!(*card.expires_at(), now.add_days(30));
    }
}
