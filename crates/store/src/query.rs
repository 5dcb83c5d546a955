//! Read access to committed books.
//!
//! Reporting reads ledger rows by account, date and currency, and derives
//! clearance aggregates from assignment rows on every call.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use folio_core::accounts::{Account, AccountBalance, AccountDirectory, Category, Entity, closing_balance};
use folio_core::clearance::{AssignedRef, Assignment, ClearanceContext, ClearanceService};
use folio_core::ledger::{
    Balance, ChainTail, HashChain, LedgerEntry, ReportingPeriod, Tax, Transaction,
    TransactionStatus,
};
use folio_core::policy::PolicyTable;
use folio_shared::types::{AccountId, BalanceId, CurrencyId, TaxId, TransactionId};

use crate::book::EntityBook;
use crate::error::StoreResult;

/// Filter for ledger reads. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerFilter {
    /// Rows posted to this account.
    pub account_id: Option<AccountId>,
    /// Rows dated on or after this day.
    pub from: Option<NaiveDate>,
    /// Rows dated on or before this day.
    pub to: Option<NaiveDate>,
    /// Rows in this currency.
    pub currency_id: Option<CurrencyId>,
}

impl LedgerFilter {
    /// Restricts to rows posted to `account_id`.
    #[must_use]
    pub fn account(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    /// Restricts to rows dated within `from..=to`.
    #[must_use]
    pub fn between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    /// Restricts to rows in `currency_id`.
    #[must_use]
    pub fn currency(mut self, currency_id: CurrencyId) -> Self {
        self.currency_id = Some(currency_id);
        self
    }

    /// Returns true if `entry` passes every set criterion.
    #[must_use]
    pub fn matches(&self, entry: &LedgerEntry) -> bool {
        self.account_id.is_none_or(|id| entry.post_account_id == id)
            && self.from.is_none_or(|from| entry.transaction_date >= from)
            && self.to.is_none_or(|to| entry.transaction_date <= to)
            && self.currency_id.is_none_or(|id| entry.currency_id == id)
    }
}

/// A read-only view of one entity's books.
#[derive(Clone, Copy)]
pub struct View<'a> {
    book: &'a EntityBook,
    policy: &'a PolicyTable,
    chain: &'a HashChain,
}

impl<'a> View<'a> {
    pub(crate) fn new(book: &'a EntityBook, policy: &'a PolicyTable, chain: &'a HashChain) -> Self {
        Self { book, policy, chain }
    }

    /// The entity.
    #[must_use]
    pub fn entity(&self) -> &'a Entity {
        &self.book.entity
    }

    /// The active reporting period.
    #[must_use]
    pub fn period(&self) -> &'a ReportingPeriod {
        &self.book.period
    }

    /// The policy the books were opened with.
    #[must_use]
    pub fn policy(&self) -> &'a PolicyTable {
        self.policy
    }

    /// Looks up an account.
    pub fn account(&self, id: AccountId) -> StoreResult<&'a Account> {
        Ok(self.book.account(id)?)
    }

    /// All accounts ordered by code.
    #[must_use]
    pub fn accounts(&self) -> Vec<&'a Account> {
        let mut accounts: Vec<_> = self.book.accounts.values().collect();
        accounts.sort_by_key(|account| (account.account_code, account.id));
        accounts
    }

    /// All categories ordered by name.
    #[must_use]
    pub fn categories(&self) -> Vec<&'a Category> {
        let mut categories: Vec<_> = self.book.categories.values().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        categories
    }

    /// Looks up a tax.
    pub fn tax(&self, id: TaxId) -> StoreResult<&'a Tax> {
        Ok(self.book.tax(id)?)
    }

    /// Looks up a live transaction. Recycled transactions are not found.
    pub fn transaction(&self, id: TransactionId) -> StoreResult<&'a Transaction> {
        Ok(ClearanceContext::transaction(self.book, id)?)
    }

    /// Live transactions in creation order.
    #[must_use]
    pub fn transactions(&self) -> Vec<&'a Transaction> {
        self.by_creation(|tx| tx.status() != TransactionStatus::Recycled)
    }

    /// Recycled transactions in creation order.
    #[must_use]
    pub fn recycled(&self) -> Vec<&'a Transaction> {
        self.by_creation(|tx| tx.status() == TransactionStatus::Recycled)
    }

    fn by_creation(&self, keep: impl Fn(&Transaction) -> bool) -> Vec<&'a Transaction> {
        let mut transactions: Vec<_> = self
            .book
            .transactions
            .values()
            .filter(|tx| keep(*tx))
            .collect();
        transactions.sort_by_key(|tx| self.book.sequence_of(tx.id().into()));
        transactions
    }

    /// Looks up an opening balance.
    pub fn opening_balance(&self, id: BalanceId) -> StoreResult<&'a Balance> {
        Ok(self.book.opening_balance(id)?)
    }

    /// Opening balances in creation order.
    #[must_use]
    pub fn opening_balances(&self) -> Vec<&'a Balance> {
        let mut balances: Vec<_> = self.book.balances.values().collect();
        balances.sort_by_key(|balance| self.book.sequence_of(balance.id.into()));
        balances
    }

    /// Ledger rows matching `filter`, in chain order.
    #[must_use]
    pub fn ledger(&self, filter: &LedgerFilter) -> Vec<&'a LedgerEntry> {
        self.book
            .ledger
            .iter()
            .filter(|entry| filter.matches(entry))
            .collect()
    }

    /// Ledger rows produced by posting `id`.
    #[must_use]
    pub fn transaction_ledger(&self, id: TransactionId) -> Vec<&'a LedgerEntry> {
        self.book
            .ledger
            .iter()
            .filter(|entry| entry.transaction_id == id)
            .collect()
    }

    /// Every assignment, in creation order.
    #[must_use]
    pub fn assignments(&self) -> &'a [Assignment] {
        &self.book.assignments
    }

    /// Remaining balance of an assigning transaction.
    pub fn balance(&self, id: TransactionId) -> StoreResult<Decimal> {
        Ok(ClearanceService::balance(self.book, id)?)
    }

    /// Amount cleared against a target.
    #[must_use]
    pub fn cleared(&self, target: AssignedRef) -> Decimal {
        ClearanceService::cleared(self.book, target)
    }

    /// Amount of a target still outstanding.
    pub fn uncleared(&self, target: AssignedRef) -> StoreResult<Decimal> {
        Ok(ClearanceService::uncleared(self.book, target)?)
    }

    /// Closing balance of `account_id` as of `as_of`, opening balances
    /// included.
    pub fn closing_balance(&self, account_id: AccountId, as_of: NaiveDate) -> StoreResult<AccountBalance> {
        self.account(account_id)?;
        Ok(closing_balance(
            account_id,
            as_of,
            self.book.balances.values(),
            &self.book.ledger,
        ))
    }

    /// Tail of the committed chain.
    #[must_use]
    pub fn tail(&self) -> &'a ChainTail {
        &self.book.tail
    }

    /// Recomputes every row hash of the entity's chain.
    pub fn verify_chain(&self) -> StoreResult<ChainTail> {
        Ok(self.chain.verify(&self.book.ledger)?)
    }
}
