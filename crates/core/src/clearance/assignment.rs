//! Assignment records and the uniform view of what they clear.

use chrono::NaiveDate;
use folio_shared::types::{
    AccountId, AssignmentId, BalanceId, EntityId, TransactionId, TransactionType,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::error::LedgerError;
use crate::ledger::opening::Balance;
use crate::ledger::transaction::Transaction;

/// Reference to the cleared side of an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "assigned_type", content = "assigned_id", rename_all = "snake_case")]
pub enum AssignedRef {
    /// A posted transaction.
    Transaction(TransactionId),
    /// An opening balance.
    Balance(BalanceId),
}

impl AssignedRef {
    /// The referenced transaction, if this points at one.
    #[must_use]
    pub fn transaction_id(self) -> Option<TransactionId> {
        match self {
            Self::Transaction(id) => Some(id),
            Self::Balance(_) => None,
        }
    }
}

impl From<TransactionId> for AssignedRef {
    fn from(id: TransactionId) -> Self {
        Self::Transaction(id)
    }
}

impl From<BalanceId> for AssignedRef {
    fn from(id: BalanceId) -> Self {
        Self::Balance(id)
    }
}

/// Allocation of part of a transaction's balance to clear another
/// transaction or an opening balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Unique identifier.
    pub id: AssignmentId,
    /// Entity this assignment belongs to.
    pub entity_id: EntityId,
    /// Date of the allocation.
    pub assignment_date: NaiveDate,
    /// The assigning transaction.
    pub transaction_id: TransactionId,
    /// The cleared side.
    pub assigned: AssignedRef,
    /// Amount allocated, always positive.
    pub amount: Decimal,
    /// Display number of the cleared side at the time of assignment.
    pub assigned_no: String,
}

/// A request to create an assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssignment {
    /// Date of the allocation.
    pub assignment_date: NaiveDate,
    /// The assigning transaction.
    pub transaction_id: TransactionId,
    /// The side to clear.
    pub assigned: AssignedRef,
    /// Amount to allocate.
    pub amount: Decimal,
}

/// Capabilities shared by both kinds of cleared side, so clearance rules
/// never branch on which kind they look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counterpart {
    /// The referenced record.
    pub reference: AssignedRef,
    /// Transaction type, for balances the type they stand in for.
    pub transaction_type: TransactionType,
    /// Display number.
    pub transaction_no: String,
    /// Document date.
    pub transaction_date: NaiveDate,
    /// Main account.
    pub account_id: AccountId,
    /// Whether the record is posted. Balances always are.
    pub is_posted: bool,
    /// Whether the main account is credited.
    pub credited: bool,
    /// Whether the record is a compound entry. Balances never are.
    pub compound: bool,
    /// Face value.
    pub amount: Decimal,
}

impl TryFrom<&Transaction> for Counterpart {
    type Error = LedgerError;

    fn try_from(transaction: &Transaction) -> Result<Self, LedgerError> {
        Ok(Self {
            reference: AssignedRef::Transaction(transaction.id()),
            transaction_type: transaction.transaction_type(),
            transaction_no: transaction.display_no(),
            transaction_date: transaction.transaction_date(),
            account_id: transaction.account_id(),
            is_posted: transaction.is_posted(),
            credited: transaction.credited(),
            compound: transaction.compound(),
            amount: transaction.amount()?,
        })
    }
}

impl From<&Balance> for Counterpart {
    fn from(balance: &Balance) -> Self {
        Self {
            reference: AssignedRef::Balance(balance.id),
            transaction_type: balance.transaction_type,
            transaction_no: balance.transaction_no.clone(),
            transaction_date: balance.transaction_date,
            account_id: balance.account_id,
            is_posted: true,
            credited: balance.credited(),
            compound: false,
            amount: balance.amount,
        }
    }
}
