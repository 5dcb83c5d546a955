//! Shared fixtures for unit tests: a small chart of accounts with an open
//! 2024 reporting period, and an in-memory workbook for clearance tests.

use std::collections::HashMap;

use chrono::NaiveDate;
use folio_shared::HashAlgorithm;
use folio_shared::types::{
    AccountId, AccountType, BalanceId, CurrencyId, EntityId, EntryType, TaxId, TransactionId,
    TransactionType,
};
use rust_decimal::Decimal;

use crate::accounts::{Account, AccountDirectory};
use crate::clearance::{AssignedRef, Assignment, ClearanceContext, ClearanceService, Counterpart, NewAssignment};
use crate::ledger::error::LedgerError;
use crate::ledger::hash::{ChainTail, HashChain};
use crate::ledger::opening::Balance;
use crate::ledger::period::ReportingPeriod;
use crate::ledger::posting::PostingService;
use crate::ledger::transaction::Transaction;
use crate::ledger::types::{LineItem, Tax};
use crate::policy::PolicyTable;

pub(crate) struct Chart {
    pub entity: EntityId,
    pub currency: CurrencyId,
    pub period: ReportingPeriod,
    pub policy: PolicyTable,
    pub accounts: HashMap<AccountId, Account>,
    pub taxes: HashMap<TaxId, Tax>,
    pub bank: AccountId,
    pub receivable: AccountId,
    pub payable: AccountId,
    pub revenue: AccountId,
    pub expense: AccountId,
    pub control: AccountId,
}

impl Chart {
    pub fn new() -> Self {
        let entity = EntityId::new();
        let currency = CurrencyId::new();
        let mut accounts = HashMap::new();
        let mut open = |name: &str, account_type: AccountType| {
            let account = Account::new(entity, name, account_type, currency);
            let id = account.id;
            accounts.insert(id, account);
            id
        };
        let bank = open("Bank", AccountType::Bank);
        let receivable = open("Debtors", AccountType::Receivable);
        let payable = open("Creditors", AccountType::Payable);
        let revenue = open("Sales", AccountType::OperatingRevenue);
        let expense = open("Office Supplies", AccountType::OperatingExpense);
        let control = open("VAT Control", AccountType::Control);

        Self {
            entity,
            currency,
            period: ReportingPeriod::calendar(entity, 2024, 1).unwrap(),
            policy: PolicyTable::default(),
            accounts,
            taxes: HashMap::new(),
            bank,
            receivable,
            payable,
            revenue,
            expense,
            control,
        }
    }

    pub fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    pub fn add_tax(&mut self, rate: Decimal, with_account: bool) -> TaxId {
        let account = with_account.then_some(self.control);
        self.add_tax_on(rate, account)
    }

    pub fn add_tax_on(&mut self, rate: Decimal, account: Option<AccountId>) -> TaxId {
        let tax = Tax::new(self.entity, "Value Added Tax", "VAT", rate, account);
        let id = tax.id;
        self.taxes.insert(id, tax);
        id
    }

    pub fn transaction(&self, transaction_type: TransactionType, account: AccountId) -> Transaction {
        Transaction::new(
            self.entity,
            self.currency,
            transaction_type,
            Self::date(),
            account,
            "Test transaction",
        )
    }

    pub fn invoice(&self, amount: Decimal) -> Transaction {
        let mut tx = self.transaction(TransactionType::ClientInvoice, self.receivable);
        tx.add_line_item(LineItem::new(self.revenue, amount)).unwrap();
        tx
    }

    pub fn compound_journal(&self, main_amount: Decimal, credited: bool) -> Transaction {
        let mut tx = self.transaction(TransactionType::JournalEntry, self.bank);
        tx.set_credited(credited).unwrap();
        tx.set_compound(Some(main_amount)).unwrap();
        tx
    }
}

impl AccountDirectory for Chart {
    fn account(&self, id: AccountId) -> Result<&Account, LedgerError> {
        self.accounts.get(&id).ok_or(LedgerError::AccountNotFound(id))
    }

    fn tax(&self, id: TaxId) -> Result<&Tax, LedgerError> {
        self.taxes.get(&id).ok_or(LedgerError::TaxNotFound(id))
    }
}

/// Posted transactions, opening balances and assignments over a [`Chart`].
pub(crate) struct Workbook {
    pub chart: Chart,
    pub chain: HashChain,
    pub tail: ChainTail,
    pub transactions: HashMap<TransactionId, Transaction>,
    pub balances: HashMap<BalanceId, Balance>,
    pub assignments: Vec<Assignment>,
    /// Creation order of transactions and balances.
    pub created: Vec<AssignedRef>,
    numbers: HashMap<TransactionType, u64>,
}

impl Workbook {
    pub fn new() -> Self {
        let chain = HashChain::new(HashAlgorithm::Sha256, "folio", 4);
        let tail = chain.genesis();
        Self {
            chart: Chart::new(),
            chain,
            tail,
            transactions: HashMap::new(),
            balances: HashMap::new(),
            assignments: Vec::new(),
            created: Vec::new(),
            numbers: HashMap::new(),
        }
    }

    pub fn date_of(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    fn store(&mut self, tx: Transaction) -> TransactionId {
        let id = tx.id();
        self.created.push(id.into());
        self.transactions.insert(id, tx);
        id
    }

    fn post(&mut self, mut tx: Transaction) -> TransactionId {
        let sequence = self.numbers.entry(tx.transaction_type()).or_default();
        *sequence += 1;
        let number = self
            .chart
            .policy
            .transaction_no(tx.transaction_type(), self.chart.period.period_count, *sequence);
        tx.assign_number(number).unwrap();
        let batch = PostingService::post(&mut tx, &self.chart, &self.chain, &self.tail).unwrap();
        self.tail = batch.tail;
        self.store(tx)
    }

    fn dated(&self, transaction_type: TransactionType, account: AccountId, date: NaiveDate) -> Transaction {
        let mut tx = self.chart.transaction(transaction_type, account);
        tx.set_transaction_date(date).unwrap();
        tx
    }

    pub fn posted_invoice(&mut self, amount: Decimal) -> TransactionId {
        self.posted_invoice_on(Chart::date(), amount)
    }

    pub fn posted_invoice_on(&mut self, date: NaiveDate, amount: Decimal) -> TransactionId {
        let mut tx = self.dated(TransactionType::ClientInvoice, self.chart.receivable, date);
        tx.add_line_item(LineItem::new(self.chart.revenue, amount)).unwrap();
        self.post(tx)
    }

    fn receipt(&self, amount: Decimal) -> Transaction {
        let mut tx = self.dated(TransactionType::ClientReceipt, self.chart.receivable, Self::date_of(6, 1));
        tx.add_line_item(LineItem::new(self.chart.bank, amount)).unwrap();
        tx
    }

    pub fn posted_receipt(&mut self, amount: Decimal) -> TransactionId {
        let tx = self.receipt(amount);
        self.post(tx)
    }

    pub fn draft_receipt(&mut self, amount: Decimal) -> TransactionId {
        let tx = self.receipt(amount);
        self.store(tx)
    }

    pub fn posted_journal(&mut self, amount: Decimal, credited: bool) -> TransactionId {
        self.posted_journal_on(self.chart.receivable, amount, credited)
    }

    pub fn posted_journal_on(&mut self, account: AccountId, amount: Decimal, credited: bool) -> TransactionId {
        let mut tx = self.dated(TransactionType::JournalEntry, account, Chart::date());
        tx.set_credited(credited).unwrap();
        tx.add_line_item(LineItem::new(self.chart.expense, amount).credited(!credited))
            .unwrap();
        self.post(tx)
    }

    pub fn posted_compound_journal(&mut self, amount: Decimal) -> TransactionId {
        let mut tx = self.dated(TransactionType::JournalEntry, self.chart.receivable, Chart::date());
        tx.set_credited(true).unwrap();
        tx.set_compound(Some(amount)).unwrap();
        tx.add_line_item(LineItem::new(self.chart.expense, amount).credited(false))
            .unwrap();
        self.post(tx)
    }

    pub fn opening_invoice_balance(&mut self, amount: Decimal) -> BalanceId {
        let account = &self.chart.accounts[&self.chart.receivable];
        let balance = Balance::new(
            account,
            &self.chart.period,
            TransactionType::ClientInvoice,
            NaiveDate::from_ymd_opt(2023, 12, 1).unwrap(),
            "IN-2023-1",
            amount,
            EntryType::Debit,
        );
        let id = balance.id;
        self.created.push(id.into());
        self.balances.insert(id, balance);
        id
    }

    pub fn assign(
        &mut self,
        transaction_id: TransactionId,
        assigned: AssignedRef,
        amount: Decimal,
    ) -> Result<Assignment, LedgerError> {
        let assignment = ClearanceService::new(&self.chart.policy).create(
            &*self,
            NewAssignment {
                assignment_date: Self::date_of(6, 30),
                transaction_id,
                assigned,
                amount,
            },
        )?;
        self.assignments.push(assignment.clone());
        Ok(assignment)
    }

    pub fn bulk_assign(&mut self, transaction_id: TransactionId) -> Result<Vec<Assignment>, LedgerError> {
        let candidates: Vec<(Counterpart, u64)> = self
            .created
            .iter()
            .zip(0u64..)
            .map(|(reference, sequence)| (self.counterpart(*reference).unwrap(), sequence))
            .collect();
        let assignments = ClearanceService::new(&self.chart.policy).bulk_assign(
            &*self,
            transaction_id,
            Self::date_of(6, 30),
            candidates,
        )?;
        self.assignments.extend(assignments.iter().cloned());
        Ok(assignments)
    }

    pub fn display_no(&self, id: TransactionId) -> String {
        self.transactions[&id].display_no()
    }
}

impl ClearanceContext for Workbook {
    fn transaction(&self, id: TransactionId) -> Result<&Transaction, LedgerError> {
        self.transactions
            .get(&id)
            .ok_or(LedgerError::TransactionNotFound(id))
    }

    fn opening_balance(&self, id: BalanceId) -> Result<&Balance, LedgerError> {
        self.balances.get(&id).ok_or(LedgerError::BalanceNotFound(id))
    }

    fn assignments(&self) -> Box<dyn Iterator<Item = &Assignment> + '_> {
        Box::new(self.assignments.iter())
    }
}
