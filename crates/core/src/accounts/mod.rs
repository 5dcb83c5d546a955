//! Chart of accounts.
//!
//! - Entities (the tenants whose books are kept)
//! - Accounts and account categories
//! - Account lookup used by validation and posting
//! - Closing balance calculation

pub mod account;
pub mod balance;

pub use account::{Account, Category, Entity};
pub use balance::{AccountBalance, closing_balance};

use folio_shared::types::{AccountId, TaxId};

use crate::ledger::error::LedgerError;
use crate::ledger::types::Tax;

/// Read access to an entity's accounts and taxes.
///
/// Implemented by the storage layer; validation and posting never look
/// anything up by other means.
pub trait AccountDirectory {
    /// Looks up an account.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account does not exist.
    fn account(&self, id: AccountId) -> Result<&Account, LedgerError>;

    /// Looks up a tax.
    ///
    /// # Errors
    ///
    /// Returns `TaxNotFound` if the tax does not exist.
    fn tax(&self, id: TaxId) -> Result<&Tax, LedgerError>;
}
