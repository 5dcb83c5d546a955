//! The books of one entity.

use std::collections::HashMap;

use folio_core::accounts::{Account, AccountDirectory, Category, Entity};
use folio_core::clearance::{AssignedRef, Assignment, ClearanceContext};
use folio_core::ledger::{
    Balance, ChainTail, LedgerEntry, LedgerError, ReportingPeriod, Tax, Transaction,
    TransactionStatus,
};
use folio_shared::types::{
    AccountId, BalanceId, CategoryId, TaxId, TransactionId, TransactionType,
};

/// Everything recorded for one entity.
///
/// Cloned into a working copy at the start of each unit of work; the copy
/// replaces the committed book when the unit of work succeeds.
#[derive(Debug, Clone)]
pub struct EntityBook {
    pub(crate) entity: Entity,
    pub(crate) period: ReportingPeriod,
    pub(crate) categories: HashMap<CategoryId, Category>,
    pub(crate) accounts: HashMap<AccountId, Account>,
    pub(crate) taxes: HashMap<TaxId, Tax>,
    pub(crate) transactions: HashMap<TransactionId, Transaction>,
    pub(crate) balances: HashMap<BalanceId, Balance>,
    pub(crate) ledger: Vec<LedgerEntry>,
    pub(crate) assignments: Vec<Assignment>,
    pub(crate) tail: ChainTail,
    /// Creation order of transactions and balances.
    pub(crate) sequences: HashMap<AssignedRef, u64>,
    pub(crate) next_sequence: u64,
    /// Posted transactions per type, for numbering.
    pub(crate) posted_counts: HashMap<TransactionType, u64>,
}

impl EntityBook {
    /// Creates empty books whose chain starts at `genesis`.
    #[must_use]
    pub fn new(entity: Entity, period: ReportingPeriod, genesis: ChainTail) -> Self {
        Self {
            entity,
            period,
            categories: HashMap::new(),
            accounts: HashMap::new(),
            taxes: HashMap::new(),
            transactions: HashMap::new(),
            balances: HashMap::new(),
            ledger: Vec::new(),
            assignments: Vec::new(),
            tail: genesis,
            sequences: HashMap::new(),
            next_sequence: 0,
            posted_counts: HashMap::new(),
        }
    }

    /// Allocates the next creation sequence for `reference`.
    pub(crate) fn record_creation(&mut self, reference: AssignedRef) -> u64 {
        self.next_sequence += 1;
        self.sequences.insert(reference, self.next_sequence);
        self.next_sequence
    }

    /// Creation sequence of a transaction or balance.
    pub(crate) fn sequence_of(&self, reference: AssignedRef) -> u64 {
        self.sequences.get(&reference).copied().unwrap_or(u64::MAX)
    }

    /// Looks up a transaction including recycled ones.
    pub(crate) fn any_transaction_mut(
        &mut self,
        id: TransactionId,
    ) -> Result<&mut Transaction, LedgerError> {
        self.transactions
            .get_mut(&id)
            .ok_or(LedgerError::TransactionNotFound(id))
    }

    /// Looks up a live transaction for mutation.
    pub(crate) fn live_transaction_mut(
        &mut self,
        id: TransactionId,
    ) -> Result<&mut Transaction, LedgerError> {
        match self.transactions.get_mut(&id) {
            Some(tx) if tx.status() != TransactionStatus::Recycled => Ok(tx),
            _ => Err(LedgerError::TransactionNotFound(id)),
        }
    }

    /// Appends posted rows if the chain still ends at `expected`.
    ///
    /// # Errors
    ///
    /// Returns `ConcurrentModification` when the tail moved.
    pub(crate) fn append_ledger(
        &mut self,
        expected: &ChainTail,
        entries: Vec<LedgerEntry>,
        tail: ChainTail,
    ) -> Result<(), LedgerError> {
        if self.tail != *expected {
            return Err(LedgerError::ConcurrentModification {
                expected: expected.hash.clone(),
                actual: self.tail.hash.clone(),
            });
        }
        self.ledger.extend(entries);
        self.tail = tail;
        Ok(())
    }

    /// Replaces these books with `working` if no rows were appended since
    /// `started_from` was read.
    ///
    /// # Errors
    ///
    /// Returns `ConcurrentModification` when the committed tail moved.
    pub(crate) fn commit(&mut self, working: Self, started_from: &ChainTail) -> Result<(), LedgerError> {
        if self.tail != *started_from {
            return Err(LedgerError::ConcurrentModification {
                expected: started_from.hash.clone(),
                actual: self.tail.hash.clone(),
            });
        }
        *self = working;
        Ok(())
    }
}

impl AccountDirectory for EntityBook {
    fn account(&self, id: AccountId) -> Result<&Account, LedgerError> {
        self.accounts.get(&id).ok_or(LedgerError::AccountNotFound(id))
    }

    fn tax(&self, id: TaxId) -> Result<&Tax, LedgerError> {
        self.taxes.get(&id).ok_or(LedgerError::TaxNotFound(id))
    }
}

impl ClearanceContext for EntityBook {
    fn transaction(&self, id: TransactionId) -> Result<&Transaction, LedgerError> {
        match self.transactions.get(&id) {
            Some(tx) if tx.status() != TransactionStatus::Recycled => Ok(tx),
            _ => Err(LedgerError::TransactionNotFound(id)),
        }
    }

    fn opening_balance(&self, id: BalanceId) -> Result<&Balance, LedgerError> {
        self.balances.get(&id).ok_or(LedgerError::BalanceNotFound(id))
    }

    fn assignments(&self) -> Box<dyn Iterator<Item = &Assignment> + '_> {
        Box::new(self.assignments.iter())
    }
}
