//! Ledger entry domain types.

use chrono::NaiveDate;
use folio_shared::types::{
    AccountId, CurrencyId, EntityId, EntryType, LedgerId, LineItemId, TaxId, TransactionId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single row of the general ledger.
///
/// Rows are produced in debit/credit pairs by posting. `post_account_id` is
/// the account the row moves; `folio_account_id` is the account on the other
/// side of the same pair. Rows are append-only and chained by hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique identifier for this row.
    pub id: LedgerId,
    /// Entity whose books this row belongs to.
    pub entity_id: EntityId,
    /// Currency of the amount.
    pub currency_id: CurrencyId,
    /// The transaction this row belongs to.
    pub transaction_id: TransactionId,
    /// Line item this row was derived from, absent for the main account leg of
    /// a compound transaction.
    pub line_item_id: Option<LineItemId>,
    /// Tax this row carries, if it is a tax leg.
    pub tax_id: Option<TaxId>,
    /// Transaction date.
    pub transaction_date: NaiveDate,
    /// Whether this row debits or credits `post_account_id`.
    pub entry_type: EntryType,
    /// Amount, always positive.
    pub amount: Decimal,
    /// Account moved by this row.
    pub post_account_id: AccountId,
    /// Counter account of the pair.
    pub folio_account_id: AccountId,
    /// Position in the entity's hash chain, starting at 1.
    pub sequence: u64,
    /// Hash of the previous row, or the configured salt for the first row.
    pub previous_hash: String,
    /// Digest of this row's content chained to `previous_hash`.
    pub hash: String,
}

impl LedgerEntry {
    /// Returns the signed amount (positive for debit, negative for credit).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        match self.entry_type {
            EntryType::Debit => self.amount,
            EntryType::Credit => -self.amount,
        }
    }

    /// Returns true if this row carries tax.
    #[must_use]
    pub fn is_tax(&self) -> bool {
        self.tax_id.is_some()
    }
}
