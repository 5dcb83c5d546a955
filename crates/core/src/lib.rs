//! Core bookkeeping logic for Folio.
//!
//! This crate contains pure business logic with ZERO storage dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `accounts` - Chart of accounts, categories, entities and account balances
//! - `ledger` - Transactions, validation, double-entry posting and the hash chain
//! - `clearance` - Assignment of receipts/payments against invoices/bills
//! - `policy` - Per transaction type posting policy and configuration lookups

pub mod accounts;
pub mod clearance;
pub mod ledger;
pub mod policy;

#[cfg(test)]
pub(crate) mod testing;
