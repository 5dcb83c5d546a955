//! Closed accounting enumerations.
//!
//! These are the fixed vocabularies the rest of the system looks up policy by:
//! account types, transaction types and ledger entry types.

use serde::{Deserialize, Serialize};

/// Entry type: either Debit or Credit.
///
/// In double-entry bookkeeping:
/// - Debits increase asset/expense accounts, decrease liability/equity/revenue accounts
/// - Credits decrease asset/expense accounts, increase liability/equity/revenue accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Debit entry.
    Debit,
    /// Credit entry.
    Credit,
}

impl EntryType {
    /// Returns the entry type on the other side of a double entry.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }

    /// Entry type of a side whose `credited` flag is given.
    #[must_use]
    pub const fn from_credited(credited: bool) -> Self {
        if credited { Self::Credit } else { Self::Debit }
    }

    /// Stable lowercase name, used in hash payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Debit => write!(f, "Debit"),
            Self::Credit => write!(f, "Credit"),
        }
    }
}

/// Account type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Long lived assets (equipment, buildings).
    NonCurrentAsset,
    /// Assets that offset another asset (accumulated depreciation).
    ContraAsset,
    /// Stock held for sale.
    Inventory,
    /// Bank and cash accounts.
    Bank,
    /// Other short term assets.
    CurrentAsset,
    /// Amounts owed by clients.
    Receivable,
    /// Long term obligations.
    NonCurrentLiability,
    /// Control accounts (e.g. tax collected/paid).
    Control,
    /// Other short term obligations.
    CurrentLiability,
    /// Amounts owed to suppliers.
    Payable,
    /// Suspense/reconciliation accounts.
    Reconciliation,
    /// Owner's equity.
    Equity,
    /// Revenue from the entity's main activities.
    OperatingRevenue,
    /// Expenses of the entity's main activities.
    OperatingExpense,
    /// Revenue from incidental activities.
    NonOperatingRevenue,
    /// Cost of goods sold.
    DirectExpense,
    /// Overheads.
    OverheadExpense,
    /// Anything else.
    OtherExpense,
}

impl AccountType {
    /// All account types, in chart-of-accounts order.
    pub const ALL: [Self; 18] = [
        Self::NonCurrentAsset,
        Self::ContraAsset,
        Self::Inventory,
        Self::Bank,
        Self::CurrentAsset,
        Self::Receivable,
        Self::NonCurrentLiability,
        Self::Control,
        Self::CurrentLiability,
        Self::Payable,
        Self::Reconciliation,
        Self::Equity,
        Self::OperatingRevenue,
        Self::OperatingExpense,
        Self::NonOperatingRevenue,
        Self::DirectExpense,
        Self::OverheadExpense,
        Self::OtherExpense,
    ];

    /// The entry type that increases an account of this type.
    ///
    /// - Asset/Expense: balance += debit - credit (debit-normal)
    /// - Liability/Equity/Revenue: balance += credit - debit (credit-normal)
    #[must_use]
    pub const fn normal_balance(self) -> EntryType {
        match self {
            Self::NonCurrentAsset
            | Self::Inventory
            | Self::Bank
            | Self::CurrentAsset
            | Self::Receivable
            | Self::Reconciliation
            | Self::OperatingExpense
            | Self::DirectExpense
            | Self::OverheadExpense
            | Self::OtherExpense => EntryType::Debit,
            Self::ContraAsset
            | Self::NonCurrentLiability
            | Self::Control
            | Self::CurrentLiability
            | Self::Payable
            | Self::Equity
            | Self::OperatingRevenue
            | Self::NonOperatingRevenue => EntryType::Credit,
        }
    }

    /// Returns true for accounts reported on the Income Statement.
    #[must_use]
    pub const fn is_income_statement(self) -> bool {
        matches!(
            self,
            Self::OperatingRevenue
                | Self::OperatingExpense
                | Self::NonOperatingRevenue
                | Self::DirectExpense
                | Self::OverheadExpense
                | Self::OtherExpense
        )
    }

    /// Human readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NonCurrentAsset => "Non Current Asset",
            Self::ContraAsset => "Contra Asset",
            Self::Inventory => "Inventory",
            Self::Bank => "Bank",
            Self::CurrentAsset => "Current Asset",
            Self::Receivable => "Receivable",
            Self::NonCurrentLiability => "Non Current Liability",
            Self::Control => "Control",
            Self::CurrentLiability => "Current Liability",
            Self::Payable => "Payable",
            Self::Reconciliation => "Reconciliation",
            Self::Equity => "Equity",
            Self::OperatingRevenue => "Operating Revenue",
            Self::OperatingExpense => "Operating Expense",
            Self::NonOperatingRevenue => "Non Operating Revenue",
            Self::DirectExpense => "Direct Expense",
            Self::OverheadExpense => "Overhead Expense",
            Self::OtherExpense => "Other Expense",
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Transaction type classification.
///
/// Each type maps to a source document and carries a fixed posting policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// General journal entry.
    JournalEntry,
    /// Credit sale to a client.
    ClientInvoice,
    /// Sale settled immediately in cash.
    CashSale,
    /// Reduction of an amount owed by a client.
    CreditNote,
    /// Purchase on credit from a supplier.
    SupplierBill,
    /// Purchase settled immediately in cash.
    CashPurchase,
    /// Reduction of an amount owed to a supplier.
    DebitNote,
    /// Money received from a client.
    ClientReceipt,
    /// Money paid to a supplier.
    SupplierPayment,
    /// Transfer between bank accounts.
    ContraEntry,
}

impl TransactionType {
    /// All transaction types.
    pub const ALL: [Self; 10] = [
        Self::JournalEntry,
        Self::ClientInvoice,
        Self::CashSale,
        Self::CreditNote,
        Self::SupplierBill,
        Self::CashPurchase,
        Self::DebitNote,
        Self::ClientReceipt,
        Self::SupplierPayment,
        Self::ContraEntry,
    ];

    /// Human readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::JournalEntry => "Journal Entry",
            Self::ClientInvoice => "Client Invoice",
            Self::CashSale => "Cash Sale",
            Self::CreditNote => "Credit Note",
            Self::SupplierBill => "Supplier Bill",
            Self::CashPurchase => "Cash Purchase",
            Self::DebitNote => "Debit Note",
            Self::ClientReceipt => "Client Receipt",
            Self::SupplierPayment => "Supplier Payment",
            Self::ContraEntry => "Contra Entry",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
