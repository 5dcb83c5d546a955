//! Assignment validation and clearance aggregates.
//!
//! `balance(tx)` is what an assigning transaction has left to allocate;
//! `cleared(target)` is what has been allocated against a target. Both are
//! derived from assignment rows on every read and never stored.

use folio_shared::types::{AssignmentId, BalanceId, EntryType, TransactionId};
use rust_decimal::Decimal;

use super::assignment::{AssignedRef, Assignment, Counterpart, NewAssignment};
use crate::ledger::error::LedgerError;
use crate::ledger::opening::Balance;
use crate::ledger::transaction::Transaction;
use crate::policy::PolicyTable;

/// Read access to the state clearance rules depend on.
///
/// Implementors supply lookups and the assignment rows; the aggregates are
/// derived from them.
pub trait ClearanceContext {
    /// Looks up a live transaction.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` if it does not exist or is recycled.
    fn transaction(&self, id: TransactionId) -> Result<&Transaction, LedgerError>;

    /// Looks up an opening balance.
    ///
    /// # Errors
    ///
    /// Returns `BalanceNotFound` if it does not exist.
    fn opening_balance(&self, id: BalanceId) -> Result<&Balance, LedgerError>;

    /// Every assignment of the entity.
    fn assignments(&self) -> Box<dyn Iterator<Item = &Assignment> + '_>;

    /// Resolves either kind of cleared side to its uniform view.
    ///
    /// # Errors
    ///
    /// Returns the lookup error for the referenced kind.
    fn counterpart(&self, reference: AssignedRef) -> Result<Counterpart, LedgerError> {
        match reference {
            AssignedRef::Transaction(id) => Counterpart::try_from(self.transaction(id)?),
            AssignedRef::Balance(id) => self.opening_balance(id).map(Counterpart::from),
        }
    }

    /// Sum of assignments where `id` is the assigning side.
    fn assigned_total(&self, id: TransactionId) -> Decimal {
        self.assignments()
            .filter(|assignment| assignment.transaction_id == id)
            .map(|assignment| assignment.amount)
            .sum()
    }

    /// Sum of assignments clearing `target`.
    fn cleared_total(&self, target: AssignedRef) -> Decimal {
        self.assignments()
            .filter(|assignment| assignment.assigned == target)
            .map(|assignment| assignment.amount)
            .sum()
    }

    /// Returns true if `id` has acted as an assigning side.
    fn has_assigned(&self, id: TransactionId) -> bool {
        self.assignments()
            .any(|assignment| assignment.transaction_id == id)
    }

    /// Returns true if `id` has been cleared by some assignment.
    fn has_been_cleared(&self, id: TransactionId) -> bool {
        self.assignments()
            .any(|assignment| assignment.assigned == AssignedRef::Transaction(id))
    }
}

/// Assignment / clearance service.
pub struct ClearanceService<'a> {
    pub(super) policy: &'a PolicyTable,
}

impl<'a> ClearanceService<'a> {
    /// Creates a service reading assignable and clearable sets from `policy`.
    #[must_use]
    pub fn new(policy: &'a PolicyTable) -> Self {
        Self { policy }
    }

    /// Remaining balance of an assigning transaction.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` if the transaction does not exist.
    pub fn balance<C: ClearanceContext + ?Sized>(
        context: &C,
        id: TransactionId,
    ) -> Result<Decimal, LedgerError> {
        let transaction = context.transaction(id)?;
        Ok(transaction.amount()? - context.assigned_total(id))
    }

    /// Amount cleared against a target.
    #[must_use]
    pub fn cleared<C: ClearanceContext + ?Sized>(context: &C, target: AssignedRef) -> Decimal {
        context.cleared_total(target)
    }

    /// Amount of a target still outstanding.
    ///
    /// # Errors
    ///
    /// Returns the lookup error if the target does not exist.
    pub fn uncleared<C: ClearanceContext + ?Sized>(
        context: &C,
        target: AssignedRef,
    ) -> Result<Decimal, LedgerError> {
        let counterpart = context.counterpart(target)?;
        Ok(counterpart.amount - context.cleared_total(target))
    }

    /// Validates an assignment request.
    ///
    /// Rules run in a fixed order and the first violation is returned.
    /// On success, returns the resolved cleared side.
    ///
    /// # Errors
    ///
    /// 1. `NegativeAmount` / `ZeroAmount`
    /// 2. `UnassignableTransaction` (or `TransactionNotFound`)
    /// 3. `UnclearableTransaction` (or `TransactionNotFound` / `BalanceNotFound`)
    /// 4. `UnpostedAssignment`
    /// 5. `InsufficientBalance`
    /// 6. `Overclearance`
    /// 7. `CompoundTransactionAssignment`
    /// 8. `SelfClearance`
    /// 9. `InvalidAssignmentAccount`
    /// 10. `InvalidClearanceEntryType`
    /// 11. `MixedAssignment`
    pub fn validate<C: ClearanceContext + ?Sized>(
        &self,
        context: &C,
        request: &NewAssignment,
    ) -> Result<Counterpart, LedgerError> {
        if request.amount < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount("Assignment".to_string()));
        }
        if request.amount.is_zero() {
            return Err(LedgerError::ZeroAmount("Assignment".to_string()));
        }

        let transaction = context.transaction(request.transaction_id)?;
        if !self.policy.is_assignable(transaction.transaction_type()) {
            return Err(LedgerError::UnassignableTransaction(
                transaction.transaction_type(),
            ));
        }

        let target = context.counterpart(request.assigned)?;
        if request.assigned.transaction_id().is_some()
            && !self.policy.is_clearable(target.transaction_type)
        {
            return Err(LedgerError::UnclearableTransaction(target.transaction_type));
        }

        if !transaction.is_posted() {
            return Err(LedgerError::UnpostedAssignment(transaction.display_no()));
        }
        if !target.is_posted {
            return Err(LedgerError::UnpostedAssignment(target.transaction_no));
        }

        let available = transaction.amount()? - context.assigned_total(transaction.id());
        if available < request.amount {
            return Err(LedgerError::InsufficientBalance {
                transaction: transaction.display_no(),
                available,
                requested: request.amount,
            });
        }

        let uncleared = target.amount - context.cleared_total(request.assigned);
        if request.amount > uncleared {
            return Err(LedgerError::Overclearance {
                transaction: target.transaction_no,
                uncleared,
                requested: request.amount,
            });
        }

        if transaction.compound() {
            return Err(LedgerError::CompoundTransactionAssignment(
                transaction.display_no(),
            ));
        }
        if target.compound {
            return Err(LedgerError::CompoundTransactionAssignment(target.transaction_no));
        }

        if request.assigned == AssignedRef::Transaction(transaction.id()) {
            return Err(LedgerError::SelfClearance(transaction.display_no()));
        }

        if target.account_id != transaction.account_id() {
            return Err(LedgerError::InvalidAssignmentAccount {
                transaction: transaction.display_no(),
                assigned: target.transaction_no,
            });
        }

        if target.credited == transaction.credited() {
            return Err(LedgerError::InvalidClearanceEntryType(
                EntryType::from_credited(transaction.credited()),
            ));
        }

        if context.has_been_cleared(transaction.id()) {
            return Err(LedgerError::MixedAssignment {
                transaction: transaction.display_no(),
                previous: "Cleared",
                attempted: "Assigned",
            });
        }
        if let Some(assigned_id) = request.assigned.transaction_id()
            && self.policy.is_assignable(target.transaction_type)
            && context.has_assigned(assigned_id)
        {
            return Err(LedgerError::MixedAssignment {
                transaction: target.transaction_no,
                previous: "Assigned",
                attempted: "Cleared",
            });
        }

        Ok(target)
    }

    /// Validates a request and builds the assignment row.
    ///
    /// # Errors
    ///
    /// See [`Self::validate`].
    pub fn create<C: ClearanceContext + ?Sized>(
        &self,
        context: &C,
        request: NewAssignment,
    ) -> Result<Assignment, LedgerError> {
        let target = self.validate(context, &request)?;
        let entity_id = context.transaction(request.transaction_id)?.entity_id();
        Ok(Assignment {
            id: AssignmentId::new(),
            entity_id,
            assignment_date: request.assignment_date,
            transaction_id: request.transaction_id,
            assigned: request.assigned,
            amount: request.amount,
            assigned_no: target.transaction_no,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Workbook;
    use folio_shared::types::{EntryType, TransactionType};
    use rust_decimal_macros::dec;

    #[test]
    fn test_receipt_clears_invoice() {
        let mut books = Workbook::new();
        let invoice = books.posted_invoice(dec!(100));
        let receipt = books.posted_receipt(dec!(60));

        let assignment = books.assign(receipt, invoice.into(), dec!(60)).unwrap();
        assert_eq!(assignment.amount, dec!(60));
        assert!(assignment.assigned_no.starts_with("IN01/"));
        assert_eq!(ClearanceService::balance(&books, receipt), Ok(dec!(0)));
        assert_eq!(ClearanceService::cleared(&books, invoice.into()), dec!(60));
        assert_eq!(ClearanceService::uncleared(&books, invoice.into()), Ok(dec!(40)));
    }

    #[test]
    fn test_negative_and_zero_amounts() {
        let mut books = Workbook::new();
        let invoice = books.posted_invoice(dec!(100));
        let receipt = books.posted_receipt(dec!(60));

        assert_eq!(
            books.assign(receipt, invoice.into(), dec!(-1)),
            Err(LedgerError::NegativeAmount("Assignment".to_string()))
        );
        assert_eq!(
            books.assign(receipt, invoice.into(), dec!(0)),
            Err(LedgerError::ZeroAmount("Assignment".to_string()))
        );
    }

    #[test]
    fn test_unassignable_transaction() {
        let mut books = Workbook::new();
        let invoice = books.posted_invoice(dec!(100));
        let other = books.posted_invoice(dec!(100));
        assert_eq!(
            books.assign(other, invoice.into(), dec!(10)),
            Err(LedgerError::UnassignableTransaction(TransactionType::ClientInvoice))
        );
    }

    #[test]
    fn test_unclearable_transaction() {
        let mut books = Workbook::new();
        let receipt = books.posted_receipt(dec!(50));
        let other = books.posted_receipt(dec!(50));
        assert_eq!(
            books.assign(receipt, other.into(), dec!(10)),
            Err(LedgerError::UnclearableTransaction(TransactionType::ClientReceipt))
        );
    }

    #[test]
    fn test_missing_target_is_not_found() {
        let mut books = Workbook::new();
        let receipt = books.posted_receipt(dec!(50));
        let missing = BalanceId::new();
        assert_eq!(
            books.assign(receipt, missing.into(), dec!(10)),
            Err(LedgerError::BalanceNotFound(missing))
        );
    }

    #[test]
    fn test_unposted_sides() {
        let mut books = Workbook::new();
        let invoice = books.posted_invoice(dec!(100));
        let draft = books.draft_receipt(dec!(50));
        assert!(matches!(
            books.assign(draft, invoice.into(), dec!(10)),
            Err(LedgerError::UnpostedAssignment(_))
        ));
    }

    #[test]
    fn test_insufficient_balance() {
        let mut books = Workbook::new();
        let first = books.posted_invoice(dec!(100));
        let second = books.posted_invoice(dec!(100));
        let receipt = books.posted_receipt(dec!(50));
        books.assign(receipt, first.into(), dec!(30)).unwrap();

        assert_eq!(
            books.assign(receipt, second.into(), dec!(30)),
            Err(LedgerError::InsufficientBalance {
                transaction: books.display_no(receipt),
                available: dec!(20),
                requested: dec!(30),
            })
        );
    }

    #[test]
    fn test_overclearance() {
        let mut books = Workbook::new();
        let invoice = books.posted_invoice(dec!(40));
        let receipt = books.posted_receipt(dec!(100));
        assert_eq!(
            books.assign(receipt, invoice.into(), dec!(50)),
            Err(LedgerError::Overclearance {
                transaction: books.display_no(invoice),
                uncleared: dec!(40),
                requested: dec!(50),
            })
        );
    }

    #[test]
    fn test_self_clearance() {
        let mut books = Workbook::new();
        let journal = books.posted_journal(dec!(100), true);
        assert_eq!(
            books.assign(journal, journal.into(), dec!(10)),
            Err(LedgerError::SelfClearance(books.display_no(journal)))
        );
    }

    #[test]
    fn test_compound_assignment() {
        let mut books = Workbook::new();
        let invoice = books.posted_invoice(dec!(100));
        let compound = books.posted_compound_journal(dec!(50));
        assert!(matches!(
            books.assign(compound, invoice.into(), dec!(10)),
            Err(LedgerError::CompoundTransactionAssignment(_))
        ));
    }

    #[test]
    fn test_accounts_must_match() {
        let mut books = Workbook::new();
        let invoice = books.posted_invoice(dec!(100));
        let journal = books.posted_journal_on(books.chart.bank, dec!(50), true);
        assert!(matches!(
            books.assign(journal, invoice.into(), dec!(10)),
            Err(LedgerError::InvalidAssignmentAccount { .. })
        ));
    }

    #[test]
    fn test_same_polarity_rejected() {
        let mut books = Workbook::new();
        let invoice = books.posted_invoice(dec!(100));
        // Debited journal on the receivable account moves it the same way as the invoice
        let journal = books.posted_journal(dec!(50), false);
        assert_eq!(
            books.assign(journal, invoice.into(), dec!(10)),
            Err(LedgerError::InvalidClearanceEntryType(EntryType::Debit))
        );
    }

    #[test]
    fn test_mixed_assignment_both_ways() {
        let mut books = Workbook::new();
        let a = books.posted_journal(dec!(100), true);
        let b = books.posted_journal(dec!(100), false);
        books.assign(a, b.into(), dec!(5)).unwrap();

        assert_eq!(
            books.assign(b, a.into(), dec!(1)),
            Err(LedgerError::MixedAssignment {
                transaction: books.display_no(b),
                previous: "Cleared",
                attempted: "Assigned",
            })
        );

        // A has assigned; a fresh journal may not clear it
        let c = books.posted_journal(dec!(100), false);
        assert_eq!(
            books.assign(c, a.into(), dec!(1)),
            Err(LedgerError::MixedAssignment {
                transaction: books.display_no(a),
                previous: "Assigned",
                attempted: "Cleared",
            })
        );
    }

    #[test]
    fn test_receipt_clears_opening_balance() {
        let mut books = Workbook::new();
        let balance = books.opening_invoice_balance(dec!(70));
        let receipt = books.posted_receipt(dec!(100));

        let assignment = books.assign(receipt, balance.into(), dec!(70)).unwrap();
        assert_eq!(assignment.assigned, AssignedRef::Balance(balance));
        assert_eq!(ClearanceService::uncleared(&books, balance.into()), Ok(dec!(0)));
        assert!(matches!(
            books.assign(receipt, balance.into(), dec!(1)),
            Err(LedgerError::Overclearance { .. })
        ));
    }
}
