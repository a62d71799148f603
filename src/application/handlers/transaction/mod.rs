//! Transaction handlers.
//!
//! ## Commands
//! - Record a purchase (shop owner or admin)
//! - Complete, cancel, refund
//!
//! ## Queries
//! - List own, per shop, or all transactions
//! - Get one transaction

mod list_transactions;
mod manage_transaction;
mod record_transaction;

pub use list_transactions::{
    GetTransactionQuery, ListTransactionsHandler, ListTransactionsQuery, TransactionScope,
};
pub use manage_transaction::{ManageTransactionCommand, ManageTransactionHandler, TransactionAction};
pub use record_transaction::{RecordTransactionCommand, RecordTransactionHandler};
