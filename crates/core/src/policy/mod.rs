//! Transaction policy.
//!
//! Two layers:
//! - [`TransactionPolicy`]: the static per transaction type record of allowed
//!   main account types, allowed line item account types and fixed polarity.
//! - [`PolicyTable`]: the configurable lookups (number prefixes, account code
//!   bases, assignable and clearable sets, money precision) built once from
//!   [`AccountingConfig`] and read-only afterwards.

use std::collections::{HashMap, HashSet};

use folio_shared::AccountingConfig;
use folio_shared::types::{AccountType, TransactionType};

const ANY: &[AccountType] = &[];
const BANK: &[AccountType] = &[AccountType::Bank];
const RECEIVABLE: &[AccountType] = &[AccountType::Receivable];
const PAYABLE: &[AccountType] = &[AccountType::Payable];
const REVENUE: &[AccountType] = &[AccountType::OperatingRevenue];
const PURCHASABLES: &[AccountType] = &[
    AccountType::OperatingExpense,
    AccountType::DirectExpense,
    AccountType::OverheadExpense,
    AccountType::OtherExpense,
    AccountType::NonCurrentAsset,
    AccountType::CurrentAsset,
    AccountType::Inventory,
];

/// Declarative posting rules for one transaction type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionPolicy {
    /// The transaction type the rules apply to.
    pub transaction_type: TransactionType,
    /// Allowed main account types; empty means any.
    pub main_account_types: &'static [AccountType],
    /// Allowed line item account types; empty means any.
    pub line_item_account_types: &'static [AccountType],
    /// Fixed main account polarity, `None` when the caller chooses.
    pub credited: Option<bool>,
}

impl TransactionPolicy {
    /// Looks up the rules for `transaction_type`.
    #[must_use]
    pub const fn for_type(transaction_type: TransactionType) -> Self {
        let (main_account_types, line_item_account_types, credited) = match transaction_type {
            TransactionType::CashSale => (BANK, REVENUE, Some(false)),
            TransactionType::ClientInvoice => (RECEIVABLE, REVENUE, Some(false)),
            TransactionType::CreditNote => (RECEIVABLE, REVENUE, Some(true)),
            TransactionType::ClientReceipt => (RECEIVABLE, BANK, Some(true)),
            TransactionType::CashPurchase => (BANK, PURCHASABLES, Some(true)),
            TransactionType::SupplierBill => (PAYABLE, PURCHASABLES, Some(true)),
            TransactionType::DebitNote => (PAYABLE, PURCHASABLES, Some(false)),
            TransactionType::SupplierPayment => (PAYABLE, BANK, Some(false)),
            TransactionType::ContraEntry => (BANK, BANK, Some(false)),
            TransactionType::JournalEntry => (ANY, ANY, None),
        };

        Self {
            transaction_type,
            main_account_types,
            line_item_account_types,
            credited,
        }
    }

    /// Returns true if an account of `account_type` may be the main account.
    #[must_use]
    pub fn allows_main_account(&self, account_type: AccountType) -> bool {
        self.main_account_types.is_empty() || self.main_account_types.contains(&account_type)
    }

    /// Returns true if an account of `account_type` may be a line item account.
    #[must_use]
    pub fn allows_line_item_account(&self, account_type: AccountType) -> bool {
        self.line_item_account_types.is_empty()
            || self.line_item_account_types.contains(&account_type)
    }

    /// Polarity a new transaction of this type starts with.
    #[must_use]
    pub fn default_credited(&self) -> bool {
        self.credited.unwrap_or(false)
    }
}

/// Configurable accounting lookups.
#[derive(Debug, Clone)]
pub struct PolicyTable {
    prefixes: HashMap<TransactionType, String>,
    account_codes: HashMap<AccountType, u32>,
    assignables: HashSet<TransactionType>,
    clearables: HashSet<TransactionType>,
    money_scale: u32,
    money_precision: u32,
    allow_mid_year_balances: bool,
}

impl PolicyTable {
    /// Builds the table from configuration.
    #[must_use]
    pub fn from_config(config: &AccountingConfig) -> Self {
        Self {
            prefixes: config.transaction_prefixes.clone(),
            account_codes: config.account_codes.clone(),
            assignables: config.assignables.iter().copied().collect(),
            clearables: config.clearables.iter().copied().collect(),
            money_scale: config.money_scale,
            money_precision: config.money_precision,
            allow_mid_year_balances: config.allow_mid_year_balances,
        }
    }

    /// Returns true if `transaction_type` may clear other transactions.
    #[must_use]
    pub fn is_assignable(&self, transaction_type: TransactionType) -> bool {
        self.assignables.contains(&transaction_type)
    }

    /// Returns true if `transaction_type` may be cleared.
    #[must_use]
    pub fn is_clearable(&self, transaction_type: TransactionType) -> bool {
        self.clearables.contains(&transaction_type)
    }

    /// Number prefix for `transaction_type`.
    ///
    /// Types missing from configuration fall back to their label initials.
    #[must_use]
    pub fn prefix(&self, transaction_type: TransactionType) -> String {
        self.prefixes.get(&transaction_type).cloned().unwrap_or_else(|| {
            transaction_type
                .label()
                .split_whitespace()
                .filter_map(|word| word.chars().next())
                .collect()
        })
    }

    /// Formats a transaction number: `{prefix}{period_count:02}/{sequence:04}`.
    #[must_use]
    pub fn transaction_no(
        &self,
        transaction_type: TransactionType,
        period_count: u32,
        sequence: u64,
    ) -> String {
        format!(
            "{}{period_count:02}/{sequence:04}",
            self.prefix(transaction_type)
        )
    }

    /// Code for a new account given how many accounts of its type exist.
    #[must_use]
    pub fn next_account_code(&self, account_type: AccountType, existing: usize) -> u32 {
        let base = self.account_codes.get(&account_type).copied().unwrap_or_default();
        let offset = u32::try_from(existing).unwrap_or(u32::MAX - 1);
        base.saturating_add(offset).saturating_add(1)
    }

    /// Fractional digits kept on amounts.
    #[must_use]
    pub const fn money_scale(&self) -> u32 {
        self.money_scale
    }

    /// Total digits allowed on amounts.
    #[must_use]
    pub const fn money_precision(&self) -> u32 {
        self.money_precision
    }

    /// Whether opening balances may be dated inside the period.
    #[must_use]
    pub const fn allow_mid_year_balances(&self) -> bool {
        self.allow_mid_year_balances
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::from_config(&AccountingConfig::default())
    }
}
