//! Phone number value object, normalized to E.164.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A phone number in E.164 form: `+` followed by 8 to 15 digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parses user input. Spaces, dashes, dots and parentheses are ignored
    /// and a leading `00` international prefix becomes `+`.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("phone"));
        }

        let cleaned: String = trimmed
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
            .collect();

        let digits = if let Some(rest) = cleaned.strip_prefix('+') {
            rest
        } else if let Some(rest) = cleaned.strip_prefix("00") {
            rest
        } else {
            return Err(ValidationError::invalid_format(
                "phone",
                "must start with + or 00 country prefix",
            ));
        };

        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::invalid_format("phone", "must contain only digits"));
        }
        if !(8..=15).contains(&digits.len()) {
            return Err(ValidationError::invalid_format(
                "phone",
                "must have between 8 and 15 digits",
            ));
        }
        if digits.starts_with('0') {
            return Err(ValidationError::invalid_format(
                "phone",
                "country code cannot start with 0",
            ));
        }

        Ok(Self(format!("+{}", digits)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number with all but the last three digits hidden, for logs.
    pub fn redacted(&self) -> String {
        let keep = 3.min(self.0.len());
        let tail = &self.0[self.0.len() - keep..];
        format!("+***{}", tail)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(p: PhoneNumber) -> Self {
        p.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
