//! Account balance calculations.
//!
//! Balances are signed debit-positive: debits add, credits subtract.
//! [`AccountBalance::natural`] flips the sign for credit-normal accounts.

use chrono::NaiveDate;
use folio_shared::types::{AccountId, AccountType, EntryType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::entry::LedgerEntry;
use crate::ledger::opening::Balance;

/// Account balance at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// The account ID.
    pub account_id: AccountId,
    /// Opening balances carried into the period, debit positive.
    pub opening: Decimal,
    /// Total debit movement.
    pub debit_total: Decimal,
    /// Total credit movement.
    pub credit_total: Decimal,
    /// Net balance: opening + debits - credits.
    pub balance: Decimal,
}

impl AccountBalance {
    /// Creates an empty account balance.
    #[must_use]
    pub fn new(account_id: AccountId) -> Self {
        Self {
            account_id,
            opening: Decimal::ZERO,
            debit_total: Decimal::ZERO,
            credit_total: Decimal::ZERO,
            balance: Decimal::ZERO,
        }
    }

    /// Adds an opening balance.
    pub fn add_opening(&mut self, balance: &Balance) {
        self.opening += balance.signed_amount();
        self.recompute();
    }

    /// Adds a debit amount.
    pub fn add_debit(&mut self, amount: Decimal) {
        self.debit_total += amount;
        self.recompute();
    }

    /// Adds a credit amount.
    pub fn add_credit(&mut self, amount: Decimal) {
        self.credit_total += amount;
        self.recompute();
    }

    /// Balance in the account's natural direction: positive when the account
    /// sits on its normal side.
    #[must_use]
    pub fn natural(&self, account_type: AccountType) -> Decimal {
        match account_type.normal_balance() {
            EntryType::Debit => self.balance,
            EntryType::Credit => -self.balance,
        }
    }

    fn recompute(&mut self) {
        self.balance = self.opening + self.debit_total - self.credit_total;
    }
}

/// Closing balance of an account as of a date.
///
/// Sums the account's opening balances and every ledger row posted to the
/// account on or before `as_of`. Rows for other accounts are ignored.
#[must_use]
pub fn closing_balance<'a, B, E>(
    account_id: AccountId,
    as_of: NaiveDate,
    openings: B,
    entries: E,
) -> AccountBalance
where
    B: IntoIterator<Item = &'a Balance>,
    E: IntoIterator<Item = &'a LedgerEntry>,
{
    let mut result = AccountBalance::new(account_id);
    for opening in openings {
        if opening.account_id == account_id {
            result.add_opening(opening);
        }
    }
    for entry in entries {
        if entry.post_account_id != account_id || entry.transaction_date > as_of {
            continue;
        }
        match entry.entry_type {
            EntryType::Debit => result.add_debit(entry.amount),
            EntryType::Credit => result.add_credit(entry.amount),
        }
    }
    result
}
