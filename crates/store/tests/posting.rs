//! Posting through the store: numbering, balance, atomicity and period rules.

mod common;

use std::panic::{self, AssertUnwindSafe};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use common::{date, fixture};
use folio_core::ledger::{LedgerError, LineItem, PeriodStatus, TransactionStatus};
use folio_shared::types::{EntryType, MoneyError, TransactionType};
use folio_store::{LedgerFilter, StoreError, StoreResult};

#[test]
fn test_invoice_with_inclusive_tax() {
    let f = fixture();
    let mut tx = f.transaction(TransactionType::ClientInvoice, f.receivable, date(3, 15));
    tx.add_line_item(LineItem::new(f.revenue, dec!(100)).with_tax(f.vat, true))
        .unwrap();

    let batch = f
        .work(|session| {
            let id = session.create_transaction(tx)?;
            session.post_transaction(id)
        })
        .unwrap();

    assert_eq!(batch.amount, dec!(100));
    assert_eq!(batch.tax, dec!(9.0909));
    assert_eq!(batch.entries.len(), 4);

    f.books
        .read(f.entity, |view| {
            let as_of = date(12, 31);
            let receivable = view.closing_balance(f.receivable, as_of).unwrap();
            let revenue = view.closing_balance(f.revenue, as_of).unwrap();
            let control = view.closing_balance(f.control, as_of).unwrap();
            assert_eq!(receivable.balance, dec!(100));
            assert_eq!(revenue.balance, dec!(-90.9091));
            assert_eq!(control.balance, dec!(-9.0909));
        })
        .unwrap();
}

#[test]
fn test_every_posting_balances() {
    let f = fixture();
    let invoice = f.invoice(dec!(250.5));
    let receipt = f.receipt(dec!(80));

    f.books
        .read(f.entity, |view| {
            for id in [invoice, receipt] {
                let rows = view.transaction_ledger(id);
                let debit: Decimal = rows
                    .iter()
                    .filter(|row| row.entry_type == EntryType::Debit)
                    .map(|row| row.amount)
                    .sum();
                let credit: Decimal = rows
                    .iter()
                    .filter(|row| row.entry_type == EntryType::Credit)
                    .map(|row| row.amount)
                    .sum();
                assert_eq!(debit, credit);
            }
        })
        .unwrap();
}

#[test]
fn test_numbers_are_assigned_per_type() {
    let f = fixture();
    let first = f.invoice(dec!(10));
    let second = f.invoice(dec!(20));
    let receipt = f.receipt(dec!(5));

    f.books
        .read(f.entity, |view| {
            assert_eq!(view.transaction(first).unwrap().transaction_no(), Some("IN01/0001"));
            assert_eq!(view.transaction(second).unwrap().transaction_no(), Some("IN01/0002"));
            assert_eq!(view.transaction(receipt).unwrap().transaction_no(), Some("RC01/0001"));
        })
        .unwrap();
}

#[test]
fn test_posting_twice_fails_without_rows() {
    let f = fixture();
    let id = f.invoice(dec!(100));
    let rows_before = f.books.read(f.entity, |view| view.tail().sequence).unwrap();

    let result = f.work(|session| session.post_transaction(id));
    assert!(matches!(
        result,
        Err(StoreError::Ledger(LedgerError::PostedTransaction(_)))
    ));
    let rows_after = f.books.read(f.entity, |view| view.tail().sequence).unwrap();
    assert_eq!(rows_before, rows_after);
}

#[test]
fn test_failed_posting_leaves_draft_untouched() {
    let f = fixture();
    let mut tx = f.transaction(TransactionType::ClientInvoice, f.receivable, date(3, 15));
    tx.add_line_item(LineItem::new(f.bank, dec!(100))).unwrap();
    let id = f.work(|session| session.create_transaction(tx)).unwrap();

    let result = f.work(|session| session.post_transaction(id));
    assert!(matches!(
        result,
        Err(StoreError::Ledger(LedgerError::InvalidLineItemAccount { .. }))
    ));

    f.books
        .read(f.entity, |view| {
            let tx = view.transaction(id).unwrap();
            assert_eq!(tx.status(), TransactionStatus::Draft);
            assert_eq!(tx.transaction_no(), None);
            assert!(view.ledger(&LedgerFilter::default()).is_empty());
        })
        .unwrap();
}

#[test]
fn test_unit_of_work_is_all_or_nothing() {
    let f = fixture();
    let good = f.draft_invoice(date(3, 1), dec!(40));
    let mut bad = f.transaction(TransactionType::ClientInvoice, f.receivable, date(3, 2));
    bad.add_line_item(LineItem::new(f.revenue, dec!(-5))).unwrap();

    let result = f.work(|session| {
        let first = session.create_transaction(good)?;
        session.post_transaction(first)?;
        let second = session.create_transaction(bad)?;
        session.post_transaction(second)?;
        Ok(())
    });
    assert!(result.is_err());

    f.books
        .read(f.entity, |view| {
            assert!(view.transactions().is_empty());
            assert_eq!(view.tail().sequence, 0);
        })
        .unwrap();
}

#[test]
fn test_closed_and_adjusting_periods() {
    let f = fixture();
    let draft = f.work(|session| session.create_transaction(f.draft_invoice(date(3, 1), dec!(10))))
        .unwrap();

    f.work(|session| {
        session.set_period_status(PeriodStatus::Adjusting);
        Ok(())
    })
    .unwrap();
    assert!(matches!(
        f.work(|session| session.post_transaction(draft)),
        Err(StoreError::Ledger(LedgerError::AdjustingReportingPeriod { .. }))
    ));

    let mut journal = f.transaction(TransactionType::JournalEntry, f.receivable, date(12, 31));
    journal
        .add_line_item(LineItem::new(f.revenue, dec!(10)))
        .unwrap();
    assert!(f.post(journal).is_ok());

    f.work(|session| {
        session.set_period_status(PeriodStatus::Closed);
        Ok(())
    })
    .unwrap();
    assert_eq!(
        f.work(|session| session.post_transaction(draft)),
        Err(StoreError::Ledger(LedgerError::ClosedReportingPeriod(2024)))
    );
}

#[test]
fn test_ledger_filters() {
    let f = fixture();
    f.invoice_on(date(2, 1), dec!(10));
    f.invoice_on(date(5, 1), dec!(20));

    f.books
        .read(f.entity, |view| {
            let receivable = LedgerFilter::default().account(f.receivable);
            assert_eq!(view.ledger(&receivable).len(), 2);

            let spring = receivable.clone().between(date(4, 1), date(6, 30));
            let rows = view.ledger(&spring);
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].amount, dec!(20));

            let everything = LedgerFilter::default().currency(f.currency);
            assert_eq!(view.ledger(&everything).len(), 4);
        })
        .unwrap();
}

#[test]
fn test_out_of_range_line_is_rejected_and_books_stay_usable() {
    let f = fixture();
    let mut tx = f.transaction(TransactionType::ClientInvoice, f.receivable, date(3, 1));
    tx.add_line_item(LineItem::new(f.revenue, Decimal::MAX).with_quantity(dec!(2)))
        .unwrap();

    assert!(matches!(
        f.post(tx),
        Err(StoreError::Ledger(LedgerError::Money(MoneyError::Overflow { .. })))
    ));

    let invoice = f.post(f.draft_invoice(date(3, 2), dec!(10))).unwrap();
    let rows = f
        .books
        .read(f.entity, |view| view.transaction_ledger(invoice).len())
        .unwrap();
    assert_eq!(rows, 2);
}

#[test]
fn test_panicking_unit_of_work_leaves_books_usable() {
    let f = fixture();
    f.invoice(dec!(10));

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        f.work(|session| -> StoreResult<()> {
            session.set_period_status(PeriodStatus::Closed);
            panic!("unit of work interrupted");
        })
    }));
    assert!(outcome.is_err());

    let status = f.books.read(f.entity, |view| view.period().status).unwrap();
    assert_eq!(status, PeriodStatus::Open);
    assert!(f.post(f.draft_invoice(date(3, 2), dec!(20))).is_ok());
    let rows = f
        .books
        .read(f.entity, |view| view.ledger(&LedgerFilter::default()).len())
        .unwrap();
    assert_eq!(rows, 4);
}
