//! Business rule validation for ledger operations.
//!
//! [`TransactionValidator`] runs before posting and rejects anything the
//! posting engine should never see. [`validate_entries`] checks the rows a
//! posting produced.

use folio_shared::types::EntryType;
use folio_shared::types::money::{checked_sum, ensure_precision};
use rust_decimal::Decimal;

use super::entry::LedgerEntry;
use super::error::LedgerError;
use super::period::ReportingPeriod;
use super::transaction::Transaction;
use crate::accounts::AccountDirectory;
use crate::policy::{PolicyTable, TransactionPolicy};

/// Validates transactions against account, tax and period rules.
pub struct TransactionValidator;

impl TransactionValidator {
    /// Validates a transaction for posting.
    ///
    /// # Errors
    ///
    /// Returns the first rule the transaction violates:
    /// - `PostedTransaction` / `TransactionNotFound` if not a draft
    /// - `MissingLineItem` if it has no line items
    /// - period errors from [`ReportingPeriod::validate_posting`]
    /// - `InvalidMainAccount` / `InvalidLineItemAccount` per the type's policy
    /// - `RedundantTransaction` if a line item posts to the main account
    /// - `NegativeAmount` / `Money` on bad amounts
    /// - tax errors from [`super::types::Tax::validate`]
    /// - compound errors from [`Self::validate_compound`]
    pub fn validate<D: AccountDirectory + ?Sized>(
        transaction: &Transaction,
        directory: &D,
        period: &ReportingPeriod,
        policy: &PolicyTable,
    ) -> Result<(), LedgerError> {
        transaction.ensure_editable()?;
        if transaction.line_items().is_empty() {
            return Err(LedgerError::MissingLineItem {
                transaction: transaction.display_no(),
            });
        }

        period.validate_posting(transaction.transaction_type(), transaction.transaction_date())?;

        let rules = TransactionPolicy::for_type(transaction.transaction_type());
        let main = directory.account(transaction.account_id())?;
        if !rules.allows_main_account(main.account_type) {
            return Err(LedgerError::InvalidMainAccount {
                transaction_type: transaction.transaction_type(),
                account_type: main.account_type,
            });
        }

        let (precision, scale) = (policy.money_precision(), policy.money_scale());
        for item in transaction.line_items() {
            item.validate_amounts()?;
            ensure_precision(item.amount, precision, scale)?;
            ensure_precision(item.quantity, precision, scale)?;
            ensure_precision(item.contribution()?, precision, scale)?;
            if item.account_id == transaction.account_id() {
                return Err(LedgerError::RedundantTransaction { line_item: item.id });
            }

            let account = directory.account(item.account_id)?;
            if !rules.allows_line_item_account(account.account_type) {
                return Err(LedgerError::InvalidLineItemAccount {
                    transaction_type: transaction.transaction_type(),
                    account_type: account.account_type,
                });
            }

            if let Some(tax_id) = item.tax_id {
                if transaction.compound() {
                    return Err(LedgerError::InvalidTaxCharge { line_item: item.id });
                }
                directory.tax(tax_id)?.validate(directory)?;
            }
        }

        if let Some(main_amount) = transaction.main_account_amount() {
            ensure_precision(main_amount, precision, scale)?;
        }
        if transaction.compound() {
            Self::validate_compound(transaction)?;
        }

        ensure_precision(transaction.amount()?, precision, scale)?;
        Ok(())
    }

    /// Checks that a compound transaction has a main account amount and that
    /// its debit and credit sides balance.
    ///
    /// # Errors
    ///
    /// - `MissingMainAccountAmount` if no main account amount is set
    /// - `NegativeAmount` if it is negative
    /// - `InvalidTaxCharge` if a line item carries a tax
    /// - `UnbalancedTransaction` if debits and credits differ
    pub fn validate_compound(transaction: &Transaction) -> Result<(), LedgerError> {
        let main_amount = transaction.main_account_amount().ok_or_else(|| {
            LedgerError::MissingMainAccountAmount {
                transaction: transaction.display_no(),
            }
        })?;
        if main_amount < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount(format!(
                "{} main account",
                transaction.display_no()
            )));
        }

        let (mut debit, mut credit) = if transaction.credited() {
            (Decimal::ZERO, transaction.amount()?)
        } else {
            (transaction.amount()?, Decimal::ZERO)
        };
        for item in transaction.line_items() {
            if item.tax_id.is_some() {
                return Err(LedgerError::InvalidTaxCharge { line_item: item.id });
            }
            if item.credited {
                credit = checked_sum(credit, item.contribution()?)?;
            } else {
                debit = checked_sum(debit, item.contribution()?)?;
            }
        }

        if debit != credit {
            return Err(LedgerError::UnbalancedTransaction { debit, credit });
        }
        Ok(())
    }
}

/// Validates that the rows of one posting are balanced and positive.
///
/// # Errors
///
/// - `MissingLineItem` if there are no rows
/// - `ZeroAmount` / `NegativeAmount` if a row amount is not positive
/// - `UnbalancedTransaction` if debits and credits differ
pub fn validate_entries(entries: &[LedgerEntry]) -> Result<(), LedgerError> {
    if entries.is_empty() {
        return Err(LedgerError::MissingLineItem {
            transaction: String::from("Posting"),
        });
    }

    let mut total_debits = Decimal::ZERO;
    let mut total_credits = Decimal::ZERO;

    for entry in entries {
        if entry.amount.is_zero() {
            return Err(LedgerError::ZeroAmount(format!("Ledger {}", entry.id)));
        }
        if entry.amount < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount(format!("Ledger {}", entry.id)));
        }

        match entry.entry_type {
            EntryType::Debit => total_debits = checked_sum(total_debits, entry.amount)?,
            EntryType::Credit => total_credits = checked_sum(total_credits, entry.amount)?,
        }
    }

    if total_debits != total_credits {
        return Err(LedgerError::UnbalancedTransaction {
            debit: total_debits,
            credit: total_credits,
        });
    }

    Ok(())
}
