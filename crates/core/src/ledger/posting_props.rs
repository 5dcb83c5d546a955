//! Property-based tests for the posting engine.
//!
//! - Balance invariant: debits equal credits for every posted transaction
//! - Double-entry symmetry: every row has a mirrored partner
//! - Hash chain integrity: chains verify, and tampering is detected

use folio_shared::HashAlgorithm;
use folio_shared::types::{EntryType, TransactionType};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::entry::LedgerEntry;
use super::error::LedgerError;
use super::hash::HashChain;
use super::posting::PostingService;
use super::types::LineItem;
use crate::testing::Chart;

/// Strategy for generating positive amounts with four decimal places.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|n| Decimal::new(n, 4))
}

fn quantity() -> impl Strategy<Value = Decimal> {
    (1i64..20i64).prop_map(Decimal::from)
}

fn rate() -> impl Strategy<Value = Decimal> {
    (0i64..3000i64).prop_map(|n| Decimal::new(n, 2))
}

fn algorithm() -> impl Strategy<Value = HashAlgorithm> {
    prop_oneof![
        Just(HashAlgorithm::Sha256),
        Just(HashAlgorithm::Sha512),
        Just(HashAlgorithm::Blake3),
    ]
}

/// (amount, quantity, optional (rate, inclusive)) per line.
fn lines() -> impl Strategy<Value = Vec<(Decimal, Decimal, Option<(Decimal, bool)>)>> {
    prop::collection::vec(
        (
            positive_amount(),
            quantity(),
            prop::option::of((rate(), any::<bool>())),
        ),
        1..6,
    )
}

fn post_invoice(
    lines: &[(Decimal, Decimal, Option<(Decimal, bool)>)],
    chain: &HashChain,
) -> Vec<LedgerEntry> {
    let mut chart = Chart::new();
    let mut tx = chart.transaction(TransactionType::ClientInvoice, chart.receivable);
    for (amount, quantity, tax) in lines {
        let mut item = LineItem::new(chart.revenue, *amount).with_quantity(*quantity);
        if let Some((rate, inclusive)) = tax {
            let tax_id = chart.add_tax(*rate, true);
            item = item.with_tax(tax_id, *inclusive);
        }
        tx.add_line_item(item).unwrap();
    }
    PostingService::post(&mut tx, &chart, chain, &chain.genesis())
        .unwrap()
        .entries
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Debits equal credits for every posted transaction.
    #[test]
    fn prop_posting_is_balanced(lines in lines()) {
        let chain = HashChain::new(HashAlgorithm::Sha256, "folio", 4);
        let entries = post_invoice(&lines, &chain);

        let debit: Decimal = entries
            .iter()
            .filter(|e| e.entry_type == EntryType::Debit)
            .map(|e| e.amount)
            .sum();
        let credit: Decimal = entries
            .iter()
            .filter(|e| e.entry_type == EntryType::Credit)
            .map(|e| e.amount)
            .sum();
        prop_assert_eq!(debit, credit);
        prop_assert!(entries.iter().all(|e| e.amount > Decimal::ZERO));
    }

    /// Every row is followed by its mirror: swapped accounts, opposite type, same amount.
    #[test]
    fn prop_double_entry_symmetry(lines in lines()) {
        let chain = HashChain::new(HashAlgorithm::Sha256, "folio", 4);
        let entries = post_invoice(&lines, &chain);

        prop_assert_eq!(entries.len() % 2, 0);
        for pair in entries.chunks(2) {
            let (post, folio) = (&pair[0], &pair[1]);
            prop_assert_eq!(post.post_account_id, folio.folio_account_id);
            prop_assert_eq!(post.folio_account_id, folio.post_account_id);
            prop_assert_eq!(post.entry_type.opposite(), folio.entry_type);
            prop_assert_eq!(post.amount, folio.amount);
            prop_assert_eq!(post.line_item_id, folio.line_item_id);
            prop_assert_eq!(post.tax_id, folio.tax_id);
        }
    }

    /// Posted chains verify for every algorithm.
    #[test]
    fn prop_chain_verifies(lines in lines(), algorithm in algorithm()) {
        let chain = HashChain::new(algorithm, "folio", 4);
        let entries = post_invoice(&lines, &chain);
        let tail = chain.verify(&entries).unwrap();
        prop_assert_eq!(tail.sequence, entries.len() as u64);
    }

    /// Changing any row's amount breaks the chain at that row.
    #[test]
    fn prop_tampering_detected(lines in lines(), index in any::<prop::sample::Index>()) {
        let chain = HashChain::new(HashAlgorithm::Sha256, "folio", 4);
        let mut entries = post_invoice(&lines, &chain);
        let target = index.index(entries.len());
        entries[target].amount += Decimal::ONE;

        let expected = Err(LedgerError::ChainBroken {
            sequence: entries[target].sequence,
            ledger_id: entries[target].id,
        });
        prop_assert_eq!(chain.verify(&entries), expected);
    }

    /// A posted transaction cannot be posted again.
    #[test]
    fn prop_posting_guard(amount in positive_amount()) {
        let chart = Chart::new();
        let chain = HashChain::new(HashAlgorithm::Sha256, "folio", 4);
        let mut tx = chart.invoice(amount);
        let first = PostingService::post(&mut tx, &chart, &chain, &chain.genesis()).unwrap();
        let second = PostingService::post(&mut tx, &chart, &chain, &first.tail);
        prop_assert!(
            matches!(second, Err(LedgerError::PostedTransaction(_))),
            "second posting must fail"
        );
    }
}
