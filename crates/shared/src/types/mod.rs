//! Common types used across the application.

pub mod id;
pub mod kinds;
pub mod money;

pub use id::*;
pub use kinds::{AccountType, EntryType, TransactionType};
pub use money::{Money, MoneyError};
