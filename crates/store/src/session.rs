//! The entity-scoped session a unit of work runs in.
//!
//! Writes in a session land in a working copy of the entity's books. They
//! become visible to readers only when the unit of work commits.

use chrono::NaiveDate;
use tracing::{debug, info};

use folio_core::accounts::{Account, AccountDirectory, Category};
use folio_core::clearance::{
    AssignedRef, Assignment, ClearanceContext, ClearanceService, Counterpart, NewAssignment,
};
use folio_core::ledger::{
    Balance, HashChain, LedgerError, PeriodStatus, PostingBatch, PostingService, Tax, Transaction,
    TransactionValidator,
};
use folio_core::policy::PolicyTable;
use folio_shared::types::{AccountId, AccountType, BalanceId, CategoryId, EntityId, TaxId, TransactionId};

use crate::book::EntityBook;
use crate::error::{StoreError, StoreResult};
use crate::query::View;

/// A unit of work bound to one entity and its active reporting period.
pub struct Session<'a> {
    pub(crate) book: EntityBook,
    policy: &'a PolicyTable,
    chain: &'a HashChain,
}

impl<'a> Session<'a> {
    pub(crate) fn new(book: EntityBook, policy: &'a PolicyTable, chain: &'a HashChain) -> Self {
        Self { book, policy, chain }
    }

    /// The entity this session is bound to.
    #[must_use]
    pub fn entity_id(&self) -> EntityId {
        self.book.entity.id
    }

    /// Reads the working copy, uncommitted writes included.
    #[must_use]
    pub fn view(&self) -> View<'_> {
        View::new(&self.book, self.policy, self.chain)
    }

    fn ensure_entity(&self, actual: EntityId) -> StoreResult<()> {
        let expected = self.entity_id();
        if expected == actual {
            Ok(())
        } else {
            Err(StoreError::WrongEntity { expected, actual })
        }
    }

    /// Moves the active reporting period to `status`.
    pub fn set_period_status(&mut self, status: PeriodStatus) {
        info!(
            entity_id = %self.entity_id(),
            year = self.book.period.calendar_year,
            ?status,
            "Reporting period status changed"
        );
        self.book.period.status = status;
    }

    // ========== Chart of accounts ==========

    /// Adds a category.
    pub fn add_category(&mut self, name: &str, account_type: AccountType) -> CategoryId {
        let category = Category::new(self.entity_id(), name, account_type);
        let id = category.id;
        self.book.categories.insert(id, category);
        id
    }

    /// Adds an account, allocating its code from the account type's base.
    ///
    /// # Errors
    ///
    /// - `WrongEntity` if the account belongs to another entity
    /// - `CategoryNotFound` / `InvalidCategoryAccountType` for a bad category
    pub fn add_account(&mut self, mut account: Account) -> StoreResult<AccountId> {
        self.ensure_entity(account.entity_id)?;
        if let Some(category_id) = account.category_id {
            let category = self
                .book
                .categories
                .get(&category_id)
                .ok_or(LedgerError::CategoryNotFound(category_id))?;
            account.validate_category(category)?;
        }

        let existing = self
            .book
            .accounts
            .values()
            .filter(|other| other.account_type == account.account_type)
            .count();
        account.account_code = self.policy.next_account_code(account.account_type, existing);
        debug!(
            entity_id = %self.entity_id(),
            account_id = %account.id,
            account_code = account.account_code,
            "Account added"
        );
        let id = account.id;
        self.book.accounts.insert(id, account);
        Ok(id)
    }

    /// Adds a tax.
    ///
    /// # Errors
    ///
    /// - `WrongEntity` if the tax belongs to another entity
    /// - `NegativeAmount`, `MissingTaxAccount`, `InvalidTaxAccount`
    pub fn add_tax(&mut self, tax: Tax) -> StoreResult<TaxId> {
        self.ensure_entity(tax.entity_id)?;
        tax.validate(&self.book)?;
        let id = tax.id;
        self.book.taxes.insert(id, tax);
        Ok(id)
    }

    // ========== Transactions ==========

    /// Stores a draft transaction.
    ///
    /// # Errors
    ///
    /// - `WrongEntity` if the transaction belongs to another entity
    /// - `PostedTransaction` / `TransactionNotFound` if it is not a draft
    pub fn create_transaction(&mut self, transaction: Transaction) -> StoreResult<TransactionId> {
        self.ensure_entity(transaction.entity_id())?;
        transaction.ensure_editable()?;
        let id = transaction.id();
        self.book.record_creation(id.into());
        self.book.transactions.insert(id, transaction);
        debug!(entity_id = %self.entity_id(), transaction_id = %id, "Transaction created");
        Ok(id)
    }

    /// Edits a live transaction in place.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` for missing or recycled transactions,
    /// and any error `edit` returns.
    pub fn update_transaction<T, F>(&mut self, id: TransactionId, edit: F) -> StoreResult<T>
    where
        F: FnOnce(&mut Transaction) -> Result<T, LedgerError>,
    {
        let transaction = self.book.live_transaction_mut(id)?;
        Ok(edit(transaction)?)
    }

    /// Runs every posting rule against a transaction without posting it.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate_transaction(&self, id: TransactionId) -> StoreResult<()> {
        let transaction = ClearanceContext::transaction(&self.book, id)?;
        TransactionValidator::validate(transaction, &self.book, &self.book.period, self.policy)?;
        Ok(())
    }

    /// Validates, numbers and posts a transaction, appending its rows to the
    /// entity's chain.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule; nothing is written in that case.
    pub fn post_transaction(&mut self, id: TransactionId) -> StoreResult<PostingBatch> {
        let mut transaction = ClearanceContext::transaction(&self.book, id)?.clone();
        TransactionValidator::validate(&transaction, &self.book, &self.book.period, self.policy)?;

        let transaction_type = transaction.transaction_type();
        let count = self
            .book
            .posted_counts
            .get(&transaction_type)
            .copied()
            .unwrap_or_default()
            + 1;
        let transaction_no =
            self.policy
                .transaction_no(transaction_type, self.book.period.period_count, count);
        transaction.assign_number(transaction_no.clone())?;

        let start = self.book.tail.clone();
        let batch = PostingService::post(&mut transaction, &self.book, self.chain, &start)?;
        self.book
            .append_ledger(&start, batch.entries.clone(), batch.tail.clone())?;
        self.book.posted_counts.insert(transaction_type, count);
        self.book.transactions.insert(id, transaction);

        info!(
            entity_id = %self.entity_id(),
            transaction_id = %id,
            transaction_no = %transaction_no,
            amount = %batch.amount,
            tax = %batch.tax,
            rows = batch.entries.len(),
            "Transaction posted"
        );
        Ok(batch)
    }

    /// Soft deletes a draft.
    ///
    /// # Errors
    ///
    /// - `PostedTransaction` if posted
    /// - `TransactionNotFound` if missing or already recycled
    pub fn recycle_transaction(&mut self, id: TransactionId) -> StoreResult<()> {
        self.book.live_transaction_mut(id)?.recycle()?;
        info!(entity_id = %self.entity_id(), transaction_id = %id, "Transaction recycled");
        Ok(())
    }

    /// Brings a recycled transaction back as a draft.
    ///
    /// # Errors
    ///
    /// - `TransactionNotFound` if missing
    /// - `PostedTransaction` if posted
    pub fn restore_transaction(&mut self, id: TransactionId) -> StoreResult<()> {
        self.book.any_transaction_mut(id)?.restore()?;
        info!(entity_id = %self.entity_id(), transaction_id = %id, "Transaction restored");
        Ok(())
    }

    /// Permanently removes a draft or recycled transaction.
    ///
    /// # Errors
    ///
    /// - `TransactionNotFound` if missing
    /// - `PostedTransaction` if posted
    pub fn destroy_transaction(&mut self, id: TransactionId) -> StoreResult<Transaction> {
        self.book.any_transaction_mut(id)?.ensure_destroyable()?;
        self.book.sequences.remove(&AssignedRef::Transaction(id));
        let transaction = self
            .book
            .transactions
            .remove(&id)
            .ok_or(LedgerError::TransactionNotFound(id))?;
        info!(entity_id = %self.entity_id(), transaction_id = %id, "Transaction destroyed");
        Ok(transaction)
    }

    // ========== Opening balances ==========

    /// Validates and stores an opening balance for the active period.
    ///
    /// # Errors
    ///
    /// - `WrongEntity` if the balance belongs to another entity
    /// - `AccountNotFound`
    /// - any rule of [`Balance::validate`]
    pub fn add_opening_balance(&mut self, balance: Balance) -> StoreResult<BalanceId> {
        self.ensure_entity(balance.entity_id)?;
        let account = self.book.account(balance.account_id)?;
        let mut balance = balance.validate(account, &self.book.period, self.policy)?;
        balance.reporting_period_id = self.book.period.id;

        let id = balance.id;
        self.book.record_creation(id.into());
        info!(
            entity_id = %self.entity_id(),
            balance_id = %id,
            transaction_no = %balance.transaction_no,
            amount = %balance.amount,
            "Opening balance added"
        );
        self.book.balances.insert(id, balance);
        Ok(id)
    }

    // ========== Assignments ==========

    /// Validates and records one assignment.
    ///
    /// # Errors
    ///
    /// Returns the first violated clearance rule.
    pub fn assign(&mut self, request: NewAssignment) -> StoreResult<Assignment> {
        let assignment = ClearanceService::new(self.policy).create(&self.book, request)?;
        info!(
            entity_id = %self.entity_id(),
            transaction_id = %assignment.transaction_id,
            assigned_no = %assignment.assigned_no,
            amount = %assignment.amount,
            "Assignment created"
        );
        self.book.assignments.push(assignment.clone());
        Ok(assignment)
    }

    /// Removes every assignment made by `transaction_id`.
    ///
    /// Returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` if the transaction does not exist.
    pub fn unassign(&mut self, transaction_id: TransactionId) -> StoreResult<usize> {
        ClearanceContext::transaction(&self.book, transaction_id)?;
        let before = self.book.assignments.len();
        self.book
            .assignments
            .retain(|assignment| assignment.transaction_id != transaction_id);
        let removed = before - self.book.assignments.len();
        info!(
            entity_id = %self.entity_id(),
            transaction_id = %transaction_id,
            removed,
            "Assignments removed"
        );
        Ok(removed)
    }

    /// Removes every assignment clearing `target`.
    ///
    /// Returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns the lookup error if the target does not exist.
    pub fn unclear(&mut self, target: AssignedRef) -> StoreResult<usize> {
        self.book.counterpart(target)?;
        let before = self.book.assignments.len();
        self.book
            .assignments
            .retain(|assignment| assignment.assigned != target);
        let removed = before - self.book.assignments.len();
        info!(entity_id = %self.entity_id(), ?target, removed, "Clearances removed");
        Ok(removed)
    }

    /// Allocates the remaining balance of `transaction_id` across the
    /// outstanding targets on its main account, oldest first.
    ///
    /// # Errors
    ///
    /// Returns the first violated clearance rule; no assignment is kept in
    /// that case.
    pub fn bulk_assign(
        &mut self,
        transaction_id: TransactionId,
        assignment_date: NaiveDate,
    ) -> StoreResult<Vec<Assignment>> {
        let book = &self.book;
        let candidates = book
            .transactions
            .values()
            .filter(|tx| tx.is_posted())
            .map(|tx| Ok((Counterpart::try_from(tx)?, book.sequence_of(tx.id().into()))))
            .chain(
                book.balances
                    .values()
                    .map(|balance| Ok((Counterpart::from(balance), book.sequence_of(balance.id.into())))),
            )
            .collect::<Result<Vec<_>, LedgerError>>()?;

        let assignments = ClearanceService::new(self.policy).bulk_assign(
            book,
            transaction_id,
            assignment_date,
            candidates,
        )?;
        info!(
            entity_id = %self.entity_id(),
            transaction_id = %transaction_id,
            count = assignments.len(),
            "Bulk assignment completed"
        );
        self.book.assignments.extend(assignments.iter().cloned());
        Ok(assignments)
    }
}
