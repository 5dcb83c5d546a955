//! Entity, account and category types.

use folio_shared::types::{AccountId, AccountType, CategoryId, CurrencyId, EntityId};
use serde::{Deserialize, Serialize};

use crate::ledger::error::LedgerError;

/// An entity whose books are kept: one tenant of the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// Legal name.
    pub name: String,
    /// Reporting currency.
    pub currency_id: CurrencyId,
}

impl Entity {
    /// Creates a new entity.
    #[must_use]
    pub fn new(name: impl Into<String>, currency_id: CurrencyId) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            currency_id,
        }
    }
}

/// Grouping of accounts of one type for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier.
    pub id: CategoryId,
    /// Entity this category belongs to.
    pub entity_id: EntityId,
    /// Display name.
    pub name: String,
    /// The only account type this category may hold.
    pub category_account_type: AccountType,
}

impl Category {
    /// Creates a new category.
    #[must_use]
    pub fn new(entity_id: EntityId, name: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            id: CategoryId::new(),
            entity_id,
            name: name.into(),
            category_account_type: account_type,
        }
    }
}

/// A ledger account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Entity this account belongs to.
    pub entity_id: EntityId,
    /// Display name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Chart of accounts code, allocated per account type.
    pub account_code: u32,
    /// Currency the account is kept in.
    pub currency_id: CurrencyId,
    /// Optional reporting category.
    pub category_id: Option<CategoryId>,
    /// Optional description.
    pub description: Option<String>,
}

impl Account {
    /// Creates an account without a code. The store allocates the code
    /// when the account is added.
    #[must_use]
    pub fn new(
        entity_id: EntityId,
        name: impl Into<String>,
        account_type: AccountType,
        currency_id: CurrencyId,
    ) -> Self {
        Self {
            id: AccountId::new(),
            entity_id,
            name: name.into(),
            account_type,
            account_code: 0,
            currency_id,
            category_id: None,
            description: None,
        }
    }

    /// Places the account in a category.
    #[must_use]
    pub fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Checks that `category` holds accounts of this account's type.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCategoryAccountType` on mismatch.
    pub fn validate_category(&self, category: &Category) -> Result<(), LedgerError> {
        if category.category_account_type == self.account_type {
            Ok(())
        } else {
            Err(LedgerError::InvalidCategoryAccountType {
                account_type: self.account_type,
                category_type: category.category_account_type,
            })
        }
    }
}
