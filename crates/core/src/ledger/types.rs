//! Line items and taxes.
//!
//! A line item is one row of a source document before posting. Its
//! contribution is `amount × quantity`; an attached tax adds a separate
//! ledger pair when the transaction is posted.

use folio_shared::types::money::{checked_product, inclusive_portion, percentage};
use folio_shared::types::{AccountId, AccountType, EntityId, LineItemId, TaxId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;
use crate::accounts::AccountDirectory;

/// A flat-rate tax with its control account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tax {
    /// Unique identifier.
    pub id: TaxId,
    /// Entity this tax belongs to.
    pub entity_id: EntityId,
    /// Display name, e.g. "Value Added Tax".
    pub name: String,
    /// Short code, e.g. "VAT".
    pub code: String,
    /// Rate as a percentage.
    pub rate: Decimal,
    /// Control account collecting the tax, required when `rate > 0`.
    pub account_id: Option<AccountId>,
}

impl Tax {
    /// Creates a new tax.
    #[must_use]
    pub fn new(
        entity_id: EntityId,
        name: impl Into<String>,
        code: impl Into<String>,
        rate: Decimal,
        account_id: Option<AccountId>,
    ) -> Self {
        Self {
            id: TaxId::new(),
            entity_id,
            name: name.into(),
            code: code.into(),
            rate,
            account_id,
        }
    }

    /// Returns true if this tax produces ledger rows.
    #[must_use]
    pub fn is_chargeable(&self) -> bool {
        self.rate > Decimal::ZERO
    }

    /// Validates the rate and the control account.
    ///
    /// # Errors
    ///
    /// - `NegativeAmount` if the rate is negative
    /// - `MissingTaxAccount` if the rate is positive and no account is set
    /// - `InvalidTaxAccount` if the account is not a Control account
    pub fn validate<D: AccountDirectory + ?Sized>(&self, directory: &D) -> Result<(), LedgerError> {
        if self.rate < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount(format!("Tax {} rate", self.name)));
        }
        match self.account_id {
            None if self.is_chargeable() => Err(LedgerError::MissingTaxAccount {
                tax: self.name.clone(),
            }),
            None => Ok(()),
            Some(account_id) => {
                let account = directory.account(account_id)?;
                if account.account_type == AccountType::Control {
                    Ok(())
                } else {
                    Err(LedgerError::InvalidTaxAccount {
                        tax: self.name.clone(),
                        account_type: account.account_type,
                    })
                }
            }
        }
    }
}

/// One row of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Unique identifier.
    pub id: LineItemId,
    /// Free text description.
    pub narration: String,
    /// Account the line item posts to.
    pub account_id: AccountId,
    /// Unit amount.
    pub amount: Decimal,
    /// Quantity, defaults to one.
    pub quantity: Decimal,
    /// Polarity of this line, only read for compound transactions.
    pub credited: bool,
    /// Optional tax charged on the line.
    pub tax_id: Option<TaxId>,
    /// Whether `amount` already contains the tax.
    pub tax_inclusive: bool,
}

impl LineItem {
    /// Creates a line item with quantity one and no tax.
    #[must_use]
    pub fn new(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            id: LineItemId::new(),
            narration: String::new(),
            account_id,
            amount,
            quantity: Decimal::ONE,
            credited: false,
            tax_id: None,
            tax_inclusive: false,
        }
    }

    /// Sets the narration.
    #[must_use]
    pub fn with_narration(mut self, narration: impl Into<String>) -> Self {
        self.narration = narration.into();
        self
    }

    /// Sets the quantity.
    #[must_use]
    pub fn with_quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = quantity;
        self
    }

    /// Charges a tax on this line.
    #[must_use]
    pub fn with_tax(mut self, tax_id: TaxId, inclusive: bool) -> Self {
        self.tax_id = Some(tax_id);
        self.tax_inclusive = inclusive;
        self
    }

    /// Marks the line as credited (compound transactions only).
    #[must_use]
    pub fn credited(mut self, credited: bool) -> Self {
        self.credited = credited;
        self
    }

    /// Monetary contribution: `amount × quantity`, rounded.
    ///
    /// # Errors
    ///
    /// Returns `Money` if the product is out of range.
    pub fn contribution(&self) -> Result<Decimal, LedgerError> {
        Ok(checked_product(self.amount, self.quantity)?)
    }

    /// Tax carried by this line under `tax`.
    ///
    /// # Errors
    ///
    /// Returns `Money` if the tax is out of range.
    pub fn tax_amount(&self, tax: &Tax) -> Result<Decimal, LedgerError> {
        let contribution = self.contribution()?;
        let amount = if self.tax_inclusive {
            inclusive_portion(contribution, tax.rate)?
        } else {
            percentage(contribution, tax.rate)?
        };
        Ok(amount)
    }

    /// Checks that amount and quantity are not negative.
    ///
    /// # Errors
    ///
    /// Returns `NegativeAmount` naming the offending field.
    pub fn validate_amounts(&self) -> Result<(), LedgerError> {
        if self.amount < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount(format!("Line Item {}", self.id)));
        }
        if self.quantity < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount(format!(
                "Line Item {} quantity",
                self.id
            )));
        }
        Ok(())
    }
}
