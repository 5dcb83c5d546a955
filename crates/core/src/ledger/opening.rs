//! Opening balances.
//!
//! An opening balance carries an outstanding amount from before the
//! reporting period. It never posts ledger rows; it only contributes to
//! closing balances and acts as a clearance target.

use chrono::NaiveDate;
use folio_shared::types::money::ensure_precision;
use folio_shared::types::{
    AccountId, BalanceId, CurrencyId, EntityId, EntryType, ReportingPeriodId, TransactionType,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;
use super::period::ReportingPeriod;
use crate::accounts::Account;
use crate::policy::PolicyTable;

/// Transaction types an opening balance may stand in for.
pub const BALANCE_TRANSACTION_TYPES: [TransactionType; 3] = [
    TransactionType::ClientInvoice,
    TransactionType::SupplierBill,
    TransactionType::JournalEntry,
];

/// An opening balance on an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// Unique identifier.
    pub id: BalanceId,
    /// Entity this balance belongs to.
    pub entity_id: EntityId,
    /// Currency of the amount.
    pub currency_id: CurrencyId,
    /// Account carrying the balance.
    pub account_id: AccountId,
    /// Period the balance opens.
    pub reporting_period_id: ReportingPeriodId,
    /// Kind of document the balance originated from.
    pub transaction_type: TransactionType,
    /// Date of the originating document.
    pub transaction_date: NaiveDate,
    /// Number of the originating document.
    pub transaction_no: String,
    /// Outstanding amount, always positive.
    pub amount: Decimal,
    /// Side of the account the balance sits on.
    pub balance_type: EntryType,
}

impl Balance {
    /// Creates an opening balance on `account` for `period`.
    #[must_use]
    pub fn new(
        account: &Account,
        period: &ReportingPeriod,
        transaction_type: TransactionType,
        transaction_date: NaiveDate,
        transaction_no: impl Into<String>,
        amount: Decimal,
        balance_type: EntryType,
    ) -> Self {
        Self {
            id: BalanceId::new(),
            entity_id: account.entity_id,
            currency_id: account.currency_id,
            account_id: account.id,
            reporting_period_id: period.id,
            transaction_type,
            transaction_date,
            transaction_no: transaction_no.into(),
            amount,
            balance_type,
        }
    }

    /// Returns true if the balance sits on the credit side.
    #[must_use]
    pub fn credited(&self) -> bool {
        self.balance_type == EntryType::Credit
    }

    /// Returns the signed amount (positive for debit, negative for credit).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        match self.balance_type {
            EntryType::Debit => self.amount,
            EntryType::Credit => -self.amount,
        }
    }

    /// Validates the balance against its account and the active period.
    ///
    /// Returns the balance with its amount rounded to the money scale.
    ///
    /// # Errors
    ///
    /// - `InvalidBalanceTransaction` if the type cannot carry a balance
    /// - `ZeroAmount` / `NegativeAmount` if the amount is not positive
    /// - `Money` if the amount overflows the configured precision
    /// - `InvalidBalanceAccount` for income statement accounts
    /// - `InvalidBalanceDate` if dated inside the period and mid-year balances are off
    pub fn validate(
        mut self,
        account: &Account,
        period: &ReportingPeriod,
        policy: &PolicyTable,
    ) -> Result<Self, LedgerError> {
        if !BALANCE_TRANSACTION_TYPES.contains(&self.transaction_type) {
            return Err(LedgerError::InvalidBalanceTransaction(self.transaction_type));
        }
        if self.amount.is_zero() {
            return Err(LedgerError::ZeroAmount("Opening Balance".to_string()));
        }
        if self.amount < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount("Opening Balance".to_string()));
        }
        self.amount = ensure_precision(self.amount, policy.money_precision(), policy.money_scale())?;

        if account.account_type.is_income_statement() {
            return Err(LedgerError::InvalidBalanceAccount(account.account_type));
        }
        if !policy.allow_mid_year_balances() && self.transaction_date >= period.start {
            return Err(LedgerError::InvalidBalanceDate {
                date: self.transaction_date,
                start: period.start,
            });
        }
        Ok(self)
    }
}
