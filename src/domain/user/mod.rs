//! User module: platform users and their discount cards.

mod aggregate;
mod card;

pub use aggregate::{User, UserStatus, MAX_NAME_LENGTH};
pub use card::{
    CardNumber, CardStatus, CardTier, DiscountCard, CARD_NUMBER_LENGTH, CARD_PREFIX,
};
