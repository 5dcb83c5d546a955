//! Seeds a demonstration set of books.
//!
//! Opens one entity, posts sales and purchases, clears them with receipts
//! and payments, verifies the ledger hash chain and prints a summary.
//!
//! Usage: cargo run --bin seeder -- --invoices 6 --json

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use folio_core::accounts::{Account, Entity};
use folio_core::clearance::NewAssignment;
use folio_core::ledger::{Balance, LineItem, ReportingPeriod, Tax, Transaction};
use folio_shared::types::{AccountId, AccountType, CurrencyId, EntryType, TaxId, TransactionType};
use folio_shared::{AppConfig, LoggingConfig};
use folio_store::{Books, LedgerFilter, Session, StoreResult};

/// Seed demonstration books and verify their ledger
#[derive(Parser, Debug)]
#[command(name = "seeder")]
#[command(about = "Seed demonstration books and verify their ledger", long_about = None)]
struct Args {
    /// Number of client invoices to post
    #[arg(long, value_name = "COUNT", default_value_t = 4)]
    invoices: u32,

    /// Calendar year of the reporting period
    #[arg(long, value_name = "YEAR", default_value_t = 2024)]
    year: i32,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct Summary {
    entity: String,
    transactions: usize,
    ledger_rows: usize,
    assignments: usize,
    chain_sequence: u64,
    chain_hash: String,
    receivable_balance: Decimal,
    payable_balance: Decimal,
    outstanding: Vec<Outstanding>,
}

#[derive(Debug, Serialize)]
struct Outstanding {
    transaction_no: String,
    amount: Decimal,
    uncleared: Decimal,
}

struct Chart {
    currency: CurrencyId,
    bank: AccountId,
    receivable: AccountId,
    payable: AccountId,
    sales: AccountId,
    supplies: AccountId,
    vat: TaxId,
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| logging.filter.as_str().into());
    let json = logging.json.then(|| fmt::layer().json());
    let plain = (!logging.json).then(fmt::layer);
    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(plain)
        .init();
}

fn day(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).with_context(|| format!("invalid date {year}-{month}-{day}"))
}

fn open_chart(session: &mut Session<'_>, currency: CurrencyId) -> StoreResult<Chart> {
    let entity = session.entity_id();
    let mut open = |name: &str, account_type: AccountType| {
        session.add_account(Account::new(entity, name, account_type, currency))
    };
    let bank = open("Main Bank Account", AccountType::Bank)?;
    let receivable = open("Trade Debtors", AccountType::Receivable)?;
    let payable = open("Trade Creditors", AccountType::Payable)?;
    let sales = open("Sales", AccountType::OperatingRevenue)?;
    let supplies = open("Office Supplies", AccountType::OperatingExpense)?;
    let control = open("VAT Control", AccountType::Control)?;
    let vat = session.add_tax(Tax::new(entity, "Value Added Tax", "VAT", Decimal::from(16), Some(control)))?;
    Ok(Chart {
        currency,
        bank,
        receivable,
        payable,
        sales,
        supplies,
        vat,
    })
}

fn post(session: &mut Session<'_>, transaction: Transaction) -> StoreResult<folio_shared::types::TransactionId> {
    let id = session.create_transaction(transaction)?;
    session.post_transaction(id)?;
    Ok(id)
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config.logging);

    let books = Books::new(&config.accounting);
    let currency = CurrencyId::new();
    let entity = Entity::new("Folio Demo Trading", currency);
    let entity_id = entity.id;
    let period = ReportingPeriod::calendar(entity_id, args.year, 1)
        .with_context(|| format!("invalid reporting year {}", args.year))?;
    books.register_entity(entity, period)?;
    info!(entity_id = %entity_id, year = args.year, "Books opened");

    let chart = books.unit_of_work(entity_id, |session| open_chart(session, currency))?;

    let opening_date = day(args.year - 1, 12, 15)?;
    books.unit_of_work(entity_id, |session| {
        let account = session.view().account(chart.receivable)?.clone();
        let period = session.view().period().clone();
        session.add_opening_balance(Balance::new(
            &account,
            &period,
            TransactionType::ClientInvoice,
            opening_date,
            format!("OB-{}", args.year - 1),
            Decimal::from(1_250),
            EntryType::Debit,
        ))
    })?;

    let mut invoice_dates = Vec::new();
    for month in 1..=args.invoices.min(12) {
        invoice_dates.push(day(args.year, month, 10)?);
    }
    let receipt_date = day(args.year, 12, 1)?;
    let assignment_date = day(args.year, 12, 2)?;

    let receipt = books.unit_of_work(entity_id, |session| {
        for (index, date) in (1u32..).zip(&invoice_dates) {
            let mut invoice = Transaction::new(
                entity_id,
                chart.currency,
                TransactionType::ClientInvoice,
                *date,
                chart.receivable,
                format!("Consulting services, month {index}"),
            );
            let line = LineItem::new(chart.sales, Decimal::from(500 * index))
                .with_narration("Consulting hours")
                .with_tax(chart.vat, index % 2 == 0);
            invoice.add_line_item(line)?;
            post(session, invoice)?;
        }

        let mut receipt = Transaction::new(
            entity_id,
            chart.currency,
            TransactionType::ClientReceipt,
            receipt_date,
            chart.receivable,
            "Customer settlement",
        );
        receipt.add_line_item(LineItem::new(chart.bank, Decimal::from(3_000)))?;
        let receipt = post(session, receipt)?;
        session.bulk_assign(receipt, assignment_date)?;
        Ok(receipt)
    })?;

    let bill_date = day(args.year, 2, 20)?;
    let payment_date = day(args.year, 3, 5)?;
    books.unit_of_work(entity_id, |session| {
        let mut bill = Transaction::new(
            entity_id,
            chart.currency,
            TransactionType::SupplierBill,
            bill_date,
            chart.payable,
            "Stationery",
        );
        bill.add_line_item(
            LineItem::new(chart.supplies, Decimal::new(4_250, 2)).with_quantity(Decimal::from(4)),
        )?;
        let bill = post(session, bill)?;

        let mut payment = Transaction::new(
            entity_id,
            chart.currency,
            TransactionType::SupplierPayment,
            payment_date,
            chart.payable,
            "Stationery payment",
        );
        payment.add_line_item(LineItem::new(chart.bank, Decimal::from(100)))?;
        let payment = post(session, payment)?;
        session.assign(NewAssignment {
            assignment_date: payment_date,
            transaction_id: payment,
            assigned: bill.into(),
            amount: Decimal::from(100),
        })?;
        Ok(())
    })?;

    let year_end = day(args.year, 12, 31)?;
    let summary = books.read(entity_id, |view| -> Result<Summary> {
        let tail = view.verify_chain().context("ledger hash chain failed verification")?;
        let outstanding = view
            .transactions()
            .into_iter()
            .filter(|tx| view.policy().is_clearable(tx.transaction_type()))
            .map(|tx| {
                Ok(Outstanding {
                    transaction_no: tx.display_no(),
                    amount: tx.amount()?,
                    uncleared: view.uncleared(tx.id().into())?,
                })
            })
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(Summary {
            entity: view.entity().name.clone(),
            transactions: view.transactions().len(),
            ledger_rows: view.ledger(&LedgerFilter::default()).len(),
            assignments: view.assignments().len(),
            chain_sequence: tail.sequence,
            chain_hash: tail.hash,
            receivable_balance: view.closing_balance(chart.receivable, year_end)?.balance,
            payable_balance: view.closing_balance(chart.payable, year_end)?.natural(AccountType::Payable),
            outstanding,
        })
    })??;
    info!(entity_id = %entity_id, receipt = %receipt, rows = summary.ledger_rows, "Seeding complete");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Entity:        {}", summary.entity);
        println!("Transactions:  {}", summary.transactions);
        println!("Ledger rows:   {}", summary.ledger_rows);
        println!("Assignments:   {}", summary.assignments);
        println!("Chain tail:    #{} {}", summary.chain_sequence, summary.chain_hash);
        println!("Receivables:   {}", summary.receivable_balance);
        println!("Payables:      {}", summary.payable_balance);
        for item in &summary.outstanding {
            println!(
                "  {:<12} amount {:>12} uncleared {:>12}",
                item.transaction_no, item.amount, item.uncleared
            );
        }
    }
    Ok(())
}
