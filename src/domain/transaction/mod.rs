//! Transaction module: purchases made with a discount card.

mod aggregate;
mod filter;
mod status;

pub use aggregate::{Transaction, MAX_NOTE_LENGTH};
pub use filter::TransactionFilter;
pub use status::TransactionStatus;
