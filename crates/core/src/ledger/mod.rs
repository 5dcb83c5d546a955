//! Double-entry bookkeeping logic.
//!
//! This module implements the core ledger functionality:
//! - Transaction aggregates, line items and taxes
//! - Business rule validation
//! - Reporting period posting rules
//! - Posting transactions into balanced ledger rows
//! - The ledger hash chain
//! - Opening balances
//! - Error types for ledger operations

pub mod entry;
pub mod error;
pub mod hash;
pub mod opening;
pub mod period;
pub mod posting;
pub mod transaction;
pub mod types;
pub mod validation;

#[cfg(test)]
mod posting_props;
#[cfg(test)]
mod validation_props;

pub use entry::LedgerEntry;
pub use error::{ErrorKind, LedgerError};
pub use hash::{ChainTail, HashChain};
pub use opening::Balance;
pub use period::{PeriodStatus, ReportingPeriod, period_allows_posting};
pub use posting::{PostingBatch, PostingPair, PostingService};
pub use transaction::{Transaction, TransactionStatus};
pub use types::{LineItem, Tax};
pub use validation::{TransactionValidator, validate_entries};
