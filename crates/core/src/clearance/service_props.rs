//! Property-based tests for clearance.
//!
//! - Conservation: no sequence of requests over-assigns or over-clears
//! - FIFO determinism: bulk allocation ignores candidate order

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::assignment::{AssignedRef, Counterpart};
use super::service::{ClearanceContext, ClearanceService};
use crate::testing::Workbook;

fn amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000i64).prop_map(|n| Decimal::new(n, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Whatever is accepted, assigned totals never exceed the assigner's
    /// amount and cleared totals never exceed the target's amount.
    #[test]
    fn prop_assignments_conserve_amounts(
        invoices in prop::collection::vec(amount(), 1..5),
        receipts in prop::collection::vec(amount(), 1..4),
        requests in prop::collection::vec((0usize..8, 0usize..8, amount()), 0..20),
    ) {
        let mut books = Workbook::new();
        let invoices: Vec<_> = invoices.into_iter().map(|a| books.posted_invoice(a)).collect();
        let receipts: Vec<_> = receipts.into_iter().map(|a| books.posted_receipt(a)).collect();

        for (r, i, requested) in requests {
            let receipt = receipts[r % receipts.len()];
            let invoice = invoices[i % invoices.len()];
            let _ = books.assign(receipt, invoice.into(), requested);
        }

        for receipt in &receipts {
            let remaining = ClearanceService::balance(&books, *receipt).unwrap();
            prop_assert!(remaining >= Decimal::ZERO);
        }
        for invoice in &invoices {
            let uncleared = ClearanceService::uncleared(&books, (*invoice).into()).unwrap();
            prop_assert!(uncleared >= Decimal::ZERO);
        }
        prop_assert!(books.assignments.iter().all(|a| a.amount > Decimal::ZERO));
    }

    /// Bulk allocation is the same however candidates are ordered, and
    /// allocates min(available, total outstanding).
    #[test]
    fn prop_fifo_is_deterministic(
        invoices in prop::collection::vec((1u32..28, amount()), 1..6),
        available in amount(),
    ) {
        let mut books = Workbook::new();
        for (day, value) in &invoices {
            books.posted_invoice_on(Workbook::date_of(2, *day), *value);
        }
        let receipt = books.posted_receipt(available);

        let candidates: Vec<(Counterpart, u64)> = books
            .created
            .iter()
            .zip(0u64..)
            .map(|(reference, sequence)| (books.counterpart(*reference).unwrap(), sequence))
            .collect();
        let mut reversed = candidates.clone();
        reversed.reverse();

        let service = ClearanceService::new(&books.chart.policy);
        let date = Workbook::date_of(6, 30);
        let forward = service.bulk_assign(&books, receipt, date, candidates).unwrap();
        let backward = service.bulk_assign(&books, receipt, date, reversed).unwrap();

        let plan = |list: &[super::assignment::Assignment]| -> Vec<(AssignedRef, Decimal)> {
            list.iter().map(|a| (a.assigned, a.amount)).collect()
        };
        prop_assert_eq!(plan(&forward), plan(&backward));

        let outstanding: Decimal = invoices.iter().map(|(_, value)| *value).sum();
        let allocated: Decimal = forward.iter().map(|a| a.amount).sum();
        prop_assert_eq!(allocated, available.min(outstanding));
    }
}
