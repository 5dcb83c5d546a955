//! Transaction aggregate.
//!
//! A transaction is one source document: a header plus ordered line items.
//! Every mutator checks the lifecycle status first, so a posted transaction
//! can never change and a recycled one behaves as if it did not exist.

use chrono::NaiveDate;
use folio_shared::types::money::{checked_sum, round};
use folio_shared::types::{
    AccountId, CurrencyId, EntityId, LineItemId, TransactionId, TransactionType,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;
use super::types::LineItem;
use crate::accounts::AccountDirectory;
use crate::policy::TransactionPolicy;

/// Transaction lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Transaction is being drafted and can be modified.
    #[default]
    Draft,
    /// Transaction has been soft deleted and is hidden from reads.
    Recycled,
    /// Transaction has been posted to the ledger (immutable).
    Posted,
}

impl TransactionStatus {
    /// Returns true if the transaction can be modified.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if the transaction is immutable.
    #[must_use]
    pub fn is_immutable(&self) -> bool {
        matches!(self, Self::Posted)
    }
}

/// A financial transaction and its line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    id: TransactionId,
    entity_id: EntityId,
    currency_id: CurrencyId,
    transaction_type: TransactionType,
    transaction_date: NaiveDate,
    narration: String,
    reference: Option<String>,
    account_id: AccountId,
    credited: bool,
    compound: bool,
    main_account_amount: Option<Decimal>,
    transaction_no: Option<String>,
    status: TransactionStatus,
    line_items: Vec<LineItem>,
}

impl Transaction {
    /// Creates a draft transaction. The main account polarity comes from the
    /// type's policy; Journal Entries start debited.
    #[must_use]
    pub fn new(
        entity_id: EntityId,
        currency_id: CurrencyId,
        transaction_type: TransactionType,
        transaction_date: NaiveDate,
        account_id: AccountId,
        narration: impl Into<String>,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            entity_id,
            currency_id,
            transaction_type,
            transaction_date,
            narration: narration.into(),
            reference: None,
            account_id,
            credited: TransactionPolicy::for_type(transaction_type).default_credited(),
            compound: false,
            main_account_amount: None,
            transaction_no: None,
            status: TransactionStatus::Draft,
            line_items: Vec::new(),
        }
    }

    // ========== Accessors ==========

    /// Unique identifier.
    #[must_use]
    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// Entity the transaction belongs to.
    #[must_use]
    pub fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    /// Currency of every amount on the transaction.
    #[must_use]
    pub fn currency_id(&self) -> CurrencyId {
        self.currency_id
    }

    /// Transaction type.
    #[must_use]
    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    /// Transaction date.
    #[must_use]
    pub fn transaction_date(&self) -> NaiveDate {
        self.transaction_date
    }

    /// Free text description.
    #[must_use]
    pub fn narration(&self) -> &str {
        &self.narration
    }

    /// External reference, e.g. the client's order number.
    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    /// Main account.
    #[must_use]
    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    /// Whether the main account is credited.
    #[must_use]
    pub fn credited(&self) -> bool {
        self.credited
    }

    /// Whether line items carry their own polarity.
    #[must_use]
    pub fn compound(&self) -> bool {
        self.compound
    }

    /// Amount posted to the main account of a compound transaction.
    #[must_use]
    pub fn main_account_amount(&self) -> Option<Decimal> {
        self.main_account_amount
    }

    /// Number assigned at posting.
    #[must_use]
    pub fn transaction_no(&self) -> Option<&str> {
        self.transaction_no.as_deref()
    }

    /// Lifecycle status.
    #[must_use]
    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    /// Returns true once posted.
    #[must_use]
    pub fn is_posted(&self) -> bool {
        self.status == TransactionStatus::Posted
    }

    /// Ordered line items.
    #[must_use]
    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    /// Number used in messages: the transaction number once posted,
    /// otherwise the type and id.
    #[must_use]
    pub fn display_no(&self) -> String {
        self.transaction_no
            .clone()
            .unwrap_or_else(|| format!("{} {}", self.transaction_type.label(), self.id))
    }

    /// Face value of the transaction, tax excluded.
    ///
    /// For a compound transaction this is the main account amount; otherwise
    /// it is the sum of line item contributions.
    ///
    /// # Errors
    ///
    /// Returns `Money` if a contribution or the total is out of range.
    pub fn amount(&self) -> Result<Decimal, LedgerError> {
        if self.compound {
            return Ok(self.main_account_amount.map(round).unwrap_or_default());
        }
        self.line_items.iter().try_fold(Decimal::ZERO, |total, item| {
            Ok(checked_sum(total, item.contribution()?)?)
        })
    }

    /// Total tax charged on the line items.
    ///
    /// # Errors
    ///
    /// Returns `TaxNotFound` if a line item references an unknown tax.
    pub fn tax<D: AccountDirectory + ?Sized>(&self, directory: &D) -> Result<Decimal, LedgerError> {
        let mut total = Decimal::ZERO;
        for item in &self.line_items {
            if let Some(tax_id) = item.tax_id {
                let tax = directory.tax(tax_id)?;
                if tax.is_chargeable() {
                    total = checked_sum(total, item.tax_amount(tax)?)?;
                }
            }
        }
        Ok(total)
    }

    // ========== Guarded mutators ==========

    /// Fails unless the transaction is a draft.
    ///
    /// # Errors
    ///
    /// - `PostedTransaction` if posted
    /// - `TransactionNotFound` if recycled
    pub fn ensure_editable(&self) -> Result<(), LedgerError> {
        match self.status {
            TransactionStatus::Draft => Ok(()),
            TransactionStatus::Posted => Err(LedgerError::PostedTransaction(self.display_no())),
            TransactionStatus::Recycled => Err(LedgerError::TransactionNotFound(self.id)),
        }
    }

    /// Sets the narration.
    ///
    /// # Errors
    ///
    /// Fails if the transaction is not editable.
    pub fn set_narration(&mut self, narration: impl Into<String>) -> Result<(), LedgerError> {
        self.ensure_editable()?;
        self.narration = narration.into();
        Ok(())
    }

    /// Sets the external reference.
    ///
    /// # Errors
    ///
    /// Fails if the transaction is not editable.
    pub fn set_reference(&mut self, reference: Option<String>) -> Result<(), LedgerError> {
        self.ensure_editable()?;
        self.reference = reference;
        Ok(())
    }

    /// Moves the transaction date.
    ///
    /// # Errors
    ///
    /// Fails if the transaction is not editable.
    pub fn set_transaction_date(&mut self, date: NaiveDate) -> Result<(), LedgerError> {
        self.ensure_editable()?;
        self.transaction_date = date;
        Ok(())
    }

    /// Changes the main account.
    ///
    /// # Errors
    ///
    /// Fails if the transaction is not editable.
    pub fn set_account(&mut self, account_id: AccountId) -> Result<(), LedgerError> {
        self.ensure_editable()?;
        self.account_id = account_id;
        Ok(())
    }

    /// Sets the main account polarity of a Journal Entry.
    ///
    /// # Errors
    ///
    /// - `FixedPolarity` for any other transaction type
    /// - fails if the transaction is not editable
    pub fn set_credited(&mut self, credited: bool) -> Result<(), LedgerError> {
        self.ensure_editable()?;
        if TransactionPolicy::for_type(self.transaction_type).credited.is_some() {
            return Err(LedgerError::FixedPolarity(self.transaction_type));
        }
        self.credited = credited;
        Ok(())
    }

    /// Turns a Journal Entry into a compound entry posting `main_account_amount`
    /// to the main account.
    ///
    /// # Errors
    ///
    /// - `FixedPolarity` for any other transaction type
    /// - fails if the transaction is not editable
    pub fn set_compound(&mut self, main_account_amount: Option<Decimal>) -> Result<(), LedgerError> {
        self.ensure_editable()?;
        if TransactionPolicy::for_type(self.transaction_type).credited.is_some() {
            return Err(LedgerError::FixedPolarity(self.transaction_type));
        }
        self.compound = true;
        self.main_account_amount = main_account_amount;
        Ok(())
    }

    /// Appends a line item.
    ///
    /// # Errors
    ///
    /// Fails if the transaction is not editable.
    pub fn add_line_item(&mut self, item: LineItem) -> Result<LineItemId, LedgerError> {
        self.ensure_editable()?;
        let id = item.id;
        self.line_items.push(item);
        Ok(id)
    }

    /// Edits a line item in place.
    ///
    /// # Errors
    ///
    /// - `LineItemNotFound` if no such line item exists
    /// - fails if the transaction is not editable
    pub fn update_line_item<F>(&mut self, id: LineItemId, edit: F) -> Result<(), LedgerError>
    where
        F: FnOnce(&mut LineItem),
    {
        self.ensure_editable()?;
        let item = self
            .line_items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(LedgerError::LineItemNotFound(id))?;
        edit(item);
        item.id = id;
        Ok(())
    }

    /// Removes a line item.
    ///
    /// # Errors
    ///
    /// - `LineItemNotFound` if no such line item exists
    /// - fails if the transaction is not editable
    pub fn remove_line_item(&mut self, id: LineItemId) -> Result<LineItem, LedgerError> {
        self.ensure_editable()?;
        let position = self
            .line_items
            .iter()
            .position(|item| item.id == id)
            .ok_or(LedgerError::LineItemNotFound(id))?;
        Ok(self.line_items.remove(position))
    }

    /// Records the number assigned by the posting pipeline.
    ///
    /// # Errors
    ///
    /// Fails if the transaction is not editable.
    pub fn assign_number(&mut self, transaction_no: String) -> Result<(), LedgerError> {
        self.ensure_editable()?;
        self.transaction_no = Some(transaction_no);
        Ok(())
    }

    /// Soft deletes a draft.
    ///
    /// # Errors
    ///
    /// - `PostedTransaction` if posted
    /// - `TransactionNotFound` if already recycled
    pub fn recycle(&mut self) -> Result<(), LedgerError> {
        self.ensure_editable()?;
        self.status = TransactionStatus::Recycled;
        Ok(())
    }

    /// Brings a recycled transaction back as a draft.
    ///
    /// # Errors
    ///
    /// Returns `PostedTransaction` if posted.
    pub fn restore(&mut self) -> Result<(), LedgerError> {
        match self.status {
            TransactionStatus::Posted => Err(LedgerError::PostedTransaction(self.display_no())),
            TransactionStatus::Draft | TransactionStatus::Recycled => {
                self.status = TransactionStatus::Draft;
                Ok(())
            }
        }
    }

    /// Checks that the transaction may be permanently deleted.
    ///
    /// # Errors
    ///
    /// Returns `PostedTransaction` if posted.
    pub fn ensure_destroyable(&self) -> Result<(), LedgerError> {
        if self.is_posted() {
            return Err(LedgerError::PostedTransaction(self.display_no()));
        }
        Ok(())
    }

    pub(crate) fn mark_posted(&mut self) {
        self.status = TransactionStatus::Posted;
    }
}
