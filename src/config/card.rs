//! Card issuance configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::user::CardTier;

#[derive(Debug, Clone, Deserialize)]
pub struct CardConfig {
    /// Days a newly issued or renewed card stays valid
    #[serde(default = "default_validity_days")]
    pub validity_days: u32,

    /// Tier given to cards issued without an explicit tier
    #[serde(default)]
    pub default_tier: CardTier,
}

impl CardConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=3650).contains(&self.validity_days) {
            return Err(ValidationError::InvalidCardValidity(self.validity_days));
        }
        Ok(())
    }
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            validity_days: default_validity_days(),
            default_tier: CardTier::Basic,
        }
    }
}

fn default_validity_days() -> u32 {
    365
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_config_defaults() {
        let config = CardConfig::default();
        assert_eq!(config.validity_days, 365);
        assert_eq!(config.default_tier, CardTier::Basic);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validity_days_bounds() {
        let config = CardConfig {
            validity_days: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidCardValidity(0)));
    }
}
