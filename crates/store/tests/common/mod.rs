//! Shared fixture: one entity with a small chart of accounts and a 10% VAT.

#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal::Decimal;

use folio_core::accounts::{Account, Entity};
use folio_core::ledger::{LineItem, ReportingPeriod, Tax, Transaction};
use folio_shared::AccountingConfig;
use folio_shared::types::{AccountId, AccountType, CurrencyId, EntityId, TaxId, TransactionId, TransactionType};
use folio_store::{Books, Session, StoreResult};

pub struct Fixture {
    pub books: Books,
    pub entity: EntityId,
    pub currency: CurrencyId,
    pub bank: AccountId,
    pub receivable: AccountId,
    pub payable: AccountId,
    pub revenue: AccountId,
    pub expense: AccountId,
    pub control: AccountId,
    pub vat: TaxId,
}

pub fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap()
}

pub fn fixture() -> Fixture {
    fixture_with(&AccountingConfig::default())
}

pub fn fixture_with(config: &AccountingConfig) -> Fixture {
    let books = Books::new(config);
    let currency = CurrencyId::new();
    let entity = Entity::new("Acme Trading Ltd", currency);
    let entity_id = entity.id;
    let period = ReportingPeriod::calendar(entity_id, 2024, 1).unwrap();
    books.register_entity(entity, period).unwrap();

    let (bank, receivable, payable, revenue, expense, control, vat) = books
        .unit_of_work(entity_id, |session| {
            let mut open = |name: &str, account_type: AccountType| {
                session.add_account(Account::new(entity_id, name, account_type, currency))
            };
            let bank = open("Bank", AccountType::Bank)?;
            let receivable = open("Debtors", AccountType::Receivable)?;
            let payable = open("Creditors", AccountType::Payable)?;
            let revenue = open("Sales", AccountType::OperatingRevenue)?;
            let expense = open("Office Supplies", AccountType::OperatingExpense)?;
            let control = open("VAT Control", AccountType::Control)?;
            let vat = session.add_tax(Tax::new(
                entity_id,
                "Value Added Tax",
                "VAT",
                Decimal::TEN,
                Some(control),
            ))?;
            Ok((bank, receivable, payable, revenue, expense, control, vat))
        })
        .unwrap();

    Fixture {
        books,
        entity: entity_id,
        currency,
        bank,
        receivable,
        payable,
        revenue,
        expense,
        control,
        vat,
    }
}

impl Fixture {
    pub fn transaction(&self, transaction_type: TransactionType, account: AccountId, on: NaiveDate) -> Transaction {
        Transaction::new(
            self.entity,
            self.currency,
            transaction_type,
            on,
            account,
            "Fixture transaction",
        )
    }

    pub fn draft_invoice(&self, on: NaiveDate, amount: Decimal) -> Transaction {
        let mut tx = self.transaction(TransactionType::ClientInvoice, self.receivable, on);
        tx.add_line_item(LineItem::new(self.revenue, amount)).unwrap();
        tx
    }

    pub fn draft_receipt(&self, on: NaiveDate, amount: Decimal) -> Transaction {
        let mut tx = self.transaction(TransactionType::ClientReceipt, self.receivable, on);
        tx.add_line_item(LineItem::new(self.bank, amount)).unwrap();
        tx
    }

    /// Creates and posts `transaction` in its own unit of work.
    pub fn post(&self, transaction: Transaction) -> StoreResult<TransactionId> {
        self.books.unit_of_work(self.entity, |session| {
            let id = session.create_transaction(transaction)?;
            session.post_transaction(id)?;
            Ok(id)
        })
    }

    pub fn invoice_on(&self, on: NaiveDate, amount: Decimal) -> TransactionId {
        self.post(self.draft_invoice(on, amount)).unwrap()
    }

    pub fn invoice(&self, amount: Decimal) -> TransactionId {
        self.invoice_on(date(3, 1), amount)
    }

    pub fn receipt(&self, amount: Decimal) -> TransactionId {
        self.post(self.draft_receipt(date(6, 1), amount)).unwrap()
    }

    pub fn work<T>(&self, work: impl FnOnce(&mut Session<'_>) -> StoreResult<T>) -> StoreResult<T> {
        self.books.unit_of_work(self.entity, work)
    }
}
