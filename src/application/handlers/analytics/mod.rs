//! Analytics handlers.
//!
//! Platform-wide reports are admin only. A shop's own report is open to its
//! owner as well.

mod reports;

pub use reports::{AnalyticsHandler, DEFAULT_RANGE_DAYS};
