//! Property-based tests for transaction validation.

use folio_shared::types::TransactionType;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::LineItem;
use super::validation::TransactionValidator;
use crate::testing::Chart;

/// Strategy for generating positive amounts (0.01 to 100,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for generating negative amounts.
fn negative_amount() -> impl Strategy<Value = Decimal> {
    (-10_000_000i64..-1i64).prop_map(|n| Decimal::new(n, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Negative line item amounts are rejected.
    #[test]
    fn prop_negative_amount_rejected(amount in negative_amount()) {
        let chart = Chart::new();
        let tx = chart.invoice(amount);
        let result = TransactionValidator::validate(&tx, &chart, &chart.period, &chart.policy);
        prop_assert!(
            matches!(result, Err(LedgerError::NegativeAmount(_))),
            "Expected NegativeAmount, got {:?}",
            result
        );
    }

    /// Simple transactions with positive amounts on allowed accounts validate.
    #[test]
    fn prop_valid_invoice_accepted(
        amounts in prop::collection::vec(positive_amount(), 1..8),
    ) {
        let chart = Chart::new();
        let mut tx = chart.transaction(TransactionType::ClientInvoice, chart.receivable);
        for amount in &amounts {
            tx.add_line_item(LineItem::new(chart.revenue, *amount)).unwrap();
        }
        let result = TransactionValidator::validate(&tx, &chart, &chart.period, &chart.policy);
        prop_assert!(result.is_ok(), "Expected Ok, got {:?}", result);
        prop_assert_eq!(tx.amount(), Ok(amounts.iter().copied().sum::<Decimal>()));
    }

    /// A compound entry validates exactly when its debit and credit sides agree.
    #[test]
    fn prop_compound_balance(
        main in positive_amount(),
        debit_lines in prop::collection::vec(positive_amount(), 0..4),
        credit_lines in prop::collection::vec(positive_amount(), 1..4),
    ) {
        let chart = Chart::new();
        let mut tx = chart.compound_journal(main, false);
        for amount in &debit_lines {
            tx.add_line_item(LineItem::new(chart.expense, *amount)).unwrap();
        }
        for amount in &credit_lines {
            tx.add_line_item(LineItem::new(chart.revenue, *amount).credited(true)).unwrap();
        }

        let debit = main + debit_lines.iter().copied().sum::<Decimal>();
        let credit: Decimal = credit_lines.iter().copied().sum();
        let result = TransactionValidator::validate(&tx, &chart, &chart.period, &chart.policy);
        if debit == credit {
            prop_assert!(result.is_ok(), "Expected Ok, got {:?}", result);
        } else {
            prop_assert_eq!(result, Err(LedgerError::UnbalancedTransaction { debit, credit }));
        }
    }

    /// Balancing the credit side always makes a compound entry valid.
    #[test]
    fn prop_balanced_compound_accepted(
        main in positive_amount(),
        debit_lines in prop::collection::vec(positive_amount(), 0..4),
    ) {
        let chart = Chart::new();
        let mut tx = chart.compound_journal(main, false);
        for amount in &debit_lines {
            tx.add_line_item(LineItem::new(chart.expense, *amount)).unwrap();
        }
        let total = main + debit_lines.iter().copied().sum::<Decimal>();
        tx.add_line_item(LineItem::new(chart.revenue, total).credited(true)).unwrap();

        let result = TransactionValidator::validate(&tx, &chart, &chart.period, &chart.policy);
        prop_assert!(result.is_ok(), "Expected Ok, got {:?}", result);
    }
}
