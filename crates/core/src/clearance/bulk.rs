//! FIFO bulk assignment.
//!
//! Allocates an assigning transaction's remaining balance across the
//! outstanding targets on its main account, oldest first. Same-day targets
//! are ordered by creation sequence so the result never depends on storage
//! order.

use chrono::NaiveDate;
use folio_shared::types::{BalanceId, TransactionId};
use rust_decimal::Decimal;

use super::assignment::{AssignedRef, Assignment, Counterpart, NewAssignment};
use super::service::{ClearanceContext, ClearanceService};
use crate::ledger::error::LedgerError;
use crate::ledger::opening::Balance;
use crate::ledger::transaction::Transaction;

/// A clearance target with its outstanding amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outstanding {
    /// The target.
    pub counterpart: Counterpart,
    /// Creation sequence, the same-day tie-break.
    pub sequence: u64,
    /// Amount not yet cleared.
    pub uncleared: Decimal,
}

/// Splits `available` across `targets` in order, each allocation capped at
/// the target's uncleared amount.
#[must_use]
pub fn plan_fifo(available: Decimal, targets: &[Outstanding]) -> Vec<(AssignedRef, Decimal)> {
    let mut remaining = available;
    let mut plan = Vec::new();
    for target in targets {
        if remaining <= Decimal::ZERO {
            break;
        }
        let amount = remaining.min(target.uncleared);
        if amount > Decimal::ZERO {
            plan.push((target.counterpart.reference, amount));
            remaining -= amount;
        }
    }
    plan
}

/// A context with assignments that are planned but not yet committed.
struct Pending<'a, C: ?Sized> {
    base: &'a C,
    added: Vec<Assignment>,
}

impl<C: ClearanceContext + ?Sized> ClearanceContext for Pending<'_, C> {
    fn transaction(&self, id: TransactionId) -> Result<&Transaction, LedgerError> {
        self.base.transaction(id)
    }

    fn opening_balance(&self, id: BalanceId) -> Result<&Balance, LedgerError> {
        self.base.opening_balance(id)
    }

    fn assignments(&self) -> Box<dyn Iterator<Item = &Assignment> + '_> {
        Box::new(self.base.assignments().chain(self.added.iter()))
    }
}

impl ClearanceService<'_> {
    /// Filters and orders bulk assignment targets for `assigner`.
    ///
    /// Keeps posted, non-compound targets on the assigner's main account
    /// with opposite polarity and something left to clear. Transactions must
    /// be of a clearable type and must never have acted as an assigner.
    /// The result is ordered by (date, sequence).
    pub fn outstanding<C, I>(&self, context: &C, assigner: &Transaction, candidates: I) -> Vec<Outstanding>
    where
        C: ClearanceContext + ?Sized,
        I: IntoIterator<Item = (Counterpart, u64)>,
    {
        let mut targets: Vec<Outstanding> = candidates
            .into_iter()
            .filter(|(counterpart, _)| {
                counterpart.account_id == assigner.account_id()
                    && counterpart.is_posted
                    && !counterpart.compound
                    && counterpart.credited != assigner.credited()
            })
            .filter(|(counterpart, _)| match counterpart.reference {
                AssignedRef::Transaction(id) => {
                    id != assigner.id()
                        && self.policy.is_clearable(counterpart.transaction_type)
                        && !context.has_assigned(id)
                }
                AssignedRef::Balance(_) => true,
            })
            .filter_map(|(counterpart, sequence)| {
                let uncleared = counterpart.amount - context.cleared_total(counterpart.reference);
                (uncleared > Decimal::ZERO).then_some(Outstanding {
                    counterpart,
                    sequence,
                    uncleared,
                })
            })
            .collect();
        targets.sort_by_key(|target| (target.counterpart.transaction_date, target.sequence));
        targets
    }

    /// Allocates the remaining balance of `transaction_id` across
    /// `candidates` oldest first.
    ///
    /// Every planned assignment is validated against the assignments planned
    /// before it. Nothing is returned unless all of them pass.
    ///
    /// # Errors
    ///
    /// Returns the first validation error of any planned assignment.
    pub fn bulk_assign<C, I>(
        &self,
        context: &C,
        transaction_id: TransactionId,
        assignment_date: NaiveDate,
        candidates: I,
    ) -> Result<Vec<Assignment>, LedgerError>
    where
        C: ClearanceContext + ?Sized,
        I: IntoIterator<Item = (Counterpart, u64)>,
    {
        let assigner = context.transaction(transaction_id)?;
        let available = Self::balance(context, transaction_id)?;
        let targets = self.outstanding(context, assigner, candidates);

        let mut pending = Pending {
            base: context,
            added: Vec::new(),
        };
        for (assigned, amount) in plan_fifo(available, &targets) {
            let assignment = self.create(
                &pending,
                NewAssignment {
                    assignment_date,
                    transaction_id,
                    assigned,
                    amount,
                },
            )?;
            pending.added.push(assignment);
        }
        Ok(pending.added)
    }
}
