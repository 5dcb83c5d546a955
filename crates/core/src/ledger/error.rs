//! Ledger error types for validation, state, referential and capacity errors.
//!
//! Every error carries enough context to be shown to an end user as is:
//! the offending transaction number, account or amount.

use chrono::NaiveDate;
use folio_shared::AppError;
use folio_shared::types::{
    AccountId, AccountType, BalanceId, CategoryId, EntryType, LedgerId, LineItemId, MoneyError,
    TaxId, TransactionId, TransactionType,
};
use rust_decimal::Decimal;
use thiserror::Error;

/// Broad classification of ledger errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input rejected before any mutation.
    Validation,
    /// Lifecycle precondition violated.
    State,
    /// Relationship between two entities is invalid.
    Referential,
    /// A quantity exceeds the available allowance.
    Capacity,
    /// A referenced entity does not exist.
    NotFound,
    /// Concurrent writers raced on the same entity.
    Concurrency,
    /// Stored data failed an integrity check.
    Internal,
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Transaction has no line items.
    #[error("{transaction} has no Line Items and cannot be posted")]
    MissingLineItem {
        /// Display number of the transaction.
        transaction: String,
    },

    /// Amount cannot be zero.
    #[error("{0} amount cannot be zero")]
    ZeroAmount(String),

    /// Amount cannot be negative.
    #[error("{0} amount cannot be negative")]
    NegativeAmount(String),

    /// Amount does not fit the configured precision.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Tax with a positive rate has no control account.
    #[error("Tax {tax} has a rate above zero and therefore requires a Control account")]
    MissingTaxAccount {
        /// Tax name.
        tax: String,
    },

    /// Tax account is not a control account.
    #[error("Tax {tax} account must be of type Control, not {account_type}")]
    InvalidTaxAccount {
        /// Tax name.
        tax: String,
        /// The type of the account given.
        account_type: AccountType,
    },

    /// Account category belongs to a different account type.
    #[error("Category of type {category_type} cannot hold an account of type {account_type}")]
    InvalidCategoryAccountType {
        /// The account's type.
        account_type: AccountType,
        /// The category's type.
        category_type: AccountType,
    },

    /// Compound transaction debits do not equal credits.
    #[error("Transaction is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedTransaction {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// Compound transaction without a main account amount.
    #[error("Compound transaction {transaction} requires a main account amount")]
    MissingMainAccountAmount {
        /// Display number of the transaction.
        transaction: String,
    },

    /// Tax charged on a compound transaction line item.
    #[error("Line Item {line_item} of compound transaction cannot be charged Tax")]
    InvalidTaxCharge {
        /// The offending line item.
        line_item: LineItemId,
    },

    /// Line item posts to the transaction's main account.
    #[error("Line Item {line_item} account is the transaction's main account")]
    RedundantTransaction {
        /// The offending line item.
        line_item: LineItemId,
    },

    /// Transaction date lies outside the reporting period.
    #[error("Transaction date {date} is outside the reporting period {start} to {end}")]
    InvalidTransactionDate {
        /// The transaction date.
        date: NaiveDate,
        /// Period start.
        start: NaiveDate,
        /// Period end.
        end: NaiveDate,
    },

    /// Main account type not allowed for the transaction type.
    #[error("{transaction_type} main account must be one of its allowed types, not {account_type}")]
    InvalidMainAccount {
        /// The transaction type.
        transaction_type: TransactionType,
        /// The type of the account given.
        account_type: AccountType,
    },

    /// Line item account type not allowed for the transaction type.
    #[error("{transaction_type} Line Item account cannot be of type {account_type}")]
    InvalidLineItemAccount {
        /// The transaction type.
        transaction_type: TransactionType,
        /// The type of the account given.
        account_type: AccountType,
    },

    /// The transaction type has a fixed main account polarity.
    #[error("{0} main account polarity is fixed and cannot be changed")]
    FixedPolarity(TransactionType),

    /// Opening balance transaction type not allowed.
    #[error("Opening Balance cannot be of type {0}")]
    InvalidBalanceTransaction(TransactionType),

    /// Income statement accounts cannot carry opening balances.
    #[error("Income Statement account of type {0} cannot have an Opening Balance")]
    InvalidBalanceAccount(AccountType),

    /// Opening balance dated inside the reporting period.
    #[error("Opening Balance date {date} must be before the reporting period start {start}")]
    InvalidBalanceDate {
        /// The balance date.
        date: NaiveDate,
        /// Period start.
        start: NaiveDate,
    },

    /// Reporting period is closed.
    #[error("Reporting period {0} is closed, no posting allowed")]
    ClosedReportingPeriod(i32),

    /// Reporting period is adjusting and the transaction is not a journal entry.
    #[error("Reporting period {year} is adjusting, only Journal Entries can be posted, not {transaction_type}")]
    AdjustingReportingPeriod {
        /// Calendar year of the period.
        year: i32,
        /// The rejected transaction type.
        transaction_type: TransactionType,
    },

    // ========== State Errors ==========
    /// Posted transactions cannot be modified, deleted or added to.
    #[error("Transaction {0} is posted and cannot be modified, deleted or added to")]
    PostedTransaction(String),

    /// An assignment side has not been posted.
    #[error("Transaction {0} has not been posted and cannot be used for clearance")]
    UnpostedAssignment(String),

    /// A transaction cannot act as both assigner and assigned.
    #[error("Transaction {transaction} has already been {previous} and cannot now be {attempted}")]
    MixedAssignment {
        /// Display number of the transaction.
        transaction: String,
        /// Role it already played.
        previous: &'static str,
        /// Role it was asked to play.
        attempted: &'static str,
    },

    // ========== Referential Errors ==========
    /// Transaction type cannot clear other transactions.
    #[error("{0} Transactions cannot be assigned to clear other transactions")]
    UnassignableTransaction(TransactionType),

    /// Transaction type cannot be cleared.
    #[error("{0} Transactions cannot be cleared")]
    UnclearableTransaction(TransactionType),

    /// Both sides of an assignment must share a main account.
    #[error("Transaction {transaction} cannot clear {assigned}: main accounts differ")]
    InvalidAssignmentAccount {
        /// Assigning transaction.
        transaction: String,
        /// Assigned transaction.
        assigned: String,
    },

    /// A transaction cannot clear itself.
    #[error("Transaction {0} cannot clear itself")]
    SelfClearance(String),

    /// Compound transactions cannot take part in clearance.
    #[error("Compound Transaction {0} cannot be used for clearance")]
    CompoundTransactionAssignment(String),

    /// Both sides of the assignment move the main account the same way.
    #[error("A {0} entry cannot clear another {0} entry on the same account")]
    InvalidClearanceEntryType(EntryType),

    // ========== Capacity Errors ==========
    /// Assigning transaction does not have enough balance left.
    #[error("Transaction {transaction} has a balance of {available}, cannot assign {requested}")]
    InsufficientBalance {
        /// Display number of the assigning transaction.
        transaction: String,
        /// Remaining balance.
        available: Decimal,
        /// Requested assignment amount.
        requested: Decimal,
    },

    /// Assignment would clear more than the outstanding amount.
    #[error("Transaction {transaction} has {uncleared} uncleared, cannot clear {requested}")]
    Overclearance {
        /// Display number of the assigned transaction.
        transaction: String,
        /// Uncleared amount.
        uncleared: Decimal,
        /// Requested assignment amount.
        requested: Decimal,
    },

    // ========== Not Found Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Category not found.
    #[error("Category not found: {0}")]
    CategoryNotFound(CategoryId),

    /// Tax not found.
    #[error("Tax not found: {0}")]
    TaxNotFound(TaxId),

    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    /// Line item not found.
    #[error("Line Item not found: {0}")]
    LineItemNotFound(LineItemId),

    /// Opening balance not found.
    #[error("Opening Balance not found: {0}")]
    BalanceNotFound(BalanceId),

    // ========== Concurrency / Internal Errors ==========
    /// The ledger tail moved while the operation was running.
    #[error("Concurrent modification detected: expected ledger tail {expected}, found {actual}")]
    ConcurrentModification {
        /// Tail hash the operation started from.
        expected: String,
        /// Tail hash actually found.
        actual: String,
    },

    /// A ledger row does not match its recomputed hash or its predecessor.
    #[error("Ledger hash chain broken at position {sequence} (ledger {ledger_id})")]
    ChainBroken {
        /// Chain position of the first bad row.
        sequence: u64,
        /// The bad row.
        ledger_id: LedgerId,
    },
}

impl LedgerError {
    /// Returns the broad kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingLineItem { .. }
            | Self::ZeroAmount(_)
            | Self::NegativeAmount(_)
            | Self::Money(_)
            | Self::MissingTaxAccount { .. }
            | Self::InvalidTaxAccount { .. }
            | Self::InvalidCategoryAccountType { .. }
            | Self::UnbalancedTransaction { .. }
            | Self::MissingMainAccountAmount { .. }
            | Self::InvalidTaxCharge { .. }
            | Self::RedundantTransaction { .. }
            | Self::InvalidTransactionDate { .. }
            | Self::InvalidMainAccount { .. }
            | Self::InvalidLineItemAccount { .. }
            | Self::FixedPolarity(_)
            | Self::InvalidBalanceTransaction(_)
            | Self::InvalidBalanceAccount(_)
            | Self::InvalidBalanceDate { .. }
            | Self::ClosedReportingPeriod(_)
            | Self::AdjustingReportingPeriod { .. } => ErrorKind::Validation,

            Self::PostedTransaction(_)
            | Self::UnpostedAssignment(_)
            | Self::MixedAssignment { .. } => ErrorKind::State,

            Self::UnassignableTransaction(_)
            | Self::UnclearableTransaction(_)
            | Self::InvalidAssignmentAccount { .. }
            | Self::SelfClearance(_)
            | Self::CompoundTransactionAssignment(_)
            | Self::InvalidClearanceEntryType(_) => ErrorKind::Referential,

            Self::InsufficientBalance { .. } | Self::Overclearance { .. } => ErrorKind::Capacity,

            Self::AccountNotFound(_)
            | Self::CategoryNotFound(_)
            | Self::TaxNotFound(_)
            | Self::TransactionNotFound(_)
            | Self::LineItemNotFound(_)
            | Self::BalanceNotFound(_) => ErrorKind::NotFound,

            Self::ConcurrentModification { .. } => ErrorKind::Concurrency,
            Self::ChainBroken { .. } => ErrorKind::Internal,
        }
    }

    /// Returns the error code for machine readable output.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingLineItem { .. } => "MISSING_LINE_ITEM",
            Self::ZeroAmount(_) => "ZERO_AMOUNT",
            Self::NegativeAmount(_) => "NEGATIVE_AMOUNT",
            Self::Money(_) => "AMOUNT_OVERFLOW",
            Self::MissingTaxAccount { .. } => "MISSING_TAX_ACCOUNT",
            Self::InvalidTaxAccount { .. } => "INVALID_TAX_ACCOUNT",
            Self::InvalidCategoryAccountType { .. } => "INVALID_CATEGORY_ACCOUNT_TYPE",
            Self::UnbalancedTransaction { .. } => "UNBALANCED_TRANSACTION",
            Self::MissingMainAccountAmount { .. } => "MISSING_MAIN_ACCOUNT_AMOUNT",
            Self::InvalidTaxCharge { .. } => "INVALID_TAX_CHARGE",
            Self::RedundantTransaction { .. } => "REDUNDANT_TRANSACTION",
            Self::InvalidTransactionDate { .. } => "INVALID_TRANSACTION_DATE",
            Self::InvalidMainAccount { .. } => "INVALID_MAIN_ACCOUNT",
            Self::InvalidLineItemAccount { .. } => "INVALID_LINE_ITEM_ACCOUNT",
            Self::FixedPolarity(_) => "FIXED_POLARITY",
            Self::InvalidBalanceTransaction(_) => "INVALID_BALANCE_TRANSACTION",
            Self::InvalidBalanceAccount(_) => "INVALID_BALANCE_ACCOUNT",
            Self::InvalidBalanceDate { .. } => "INVALID_BALANCE_DATE",
            Self::ClosedReportingPeriod(_) => "CLOSED_REPORTING_PERIOD",
            Self::AdjustingReportingPeriod { .. } => "ADJUSTING_REPORTING_PERIOD",
            Self::PostedTransaction(_) => "POSTED_TRANSACTION",
            Self::UnpostedAssignment(_) => "UNPOSTED_ASSIGNMENT",
            Self::MixedAssignment { .. } => "MIXED_ASSIGNMENT",
            Self::UnassignableTransaction(_) => "UNASSIGNABLE_TRANSACTION",
            Self::UnclearableTransaction(_) => "UNCLEARABLE_TRANSACTION",
            Self::InvalidAssignmentAccount { .. } => "INVALID_ASSIGNMENT_ACCOUNT",
            Self::SelfClearance(_) => "SELF_CLEARANCE",
            Self::CompoundTransactionAssignment(_) => "COMPOUND_TRANSACTION_ASSIGNMENT",
            Self::InvalidClearanceEntryType(_) => "INVALID_CLEARANCE_ENTRY_TYPE",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::Overclearance { .. } => "OVERCLEARANCE",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::CategoryNotFound(_) => "CATEGORY_NOT_FOUND",
            Self::TaxNotFound(_) => "TAX_NOT_FOUND",
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::LineItemNotFound(_) => "LINE_ITEM_NOT_FOUND",
            Self::BalanceNotFound(_) => "BALANCE_NOT_FOUND",
            Self::ConcurrentModification { .. } => "CONCURRENT_MODIFICATION",
            Self::ChainBroken { .. } => "CHAIN_BROKEN",
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification { .. })
    }
}

impl From<LedgerError> for AppError {
    fn from(value: LedgerError) -> Self {
        let message = value.to_string();
        match value.kind() {
            ErrorKind::Validation => Self::Validation(message),
            ErrorKind::State => Self::State(message),
            ErrorKind::Referential => Self::Referential(message),
            ErrorKind::Capacity => Self::Capacity(message),
            ErrorKind::NotFound => Self::NotFound(message),
            ErrorKind::Concurrency => Self::Conflict(message),
            ErrorKind::Internal => Self::Internal(message),
        }
    }
}
