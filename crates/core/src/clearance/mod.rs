//! Assignment and clearance.
//!
//! An assignment allocates part of a posted assigning transaction (a
//! receipt, payment, note or journal) to clear a posted target or an
//! opening balance. Cleared and remaining amounts are always derived from
//! the assignment rows.

pub mod assignment;
pub mod bulk;
pub mod service;

#[cfg(test)]
mod service_props;

pub use assignment::{AssignedRef, Assignment, Counterpart, NewAssignment};
pub use bulk::{Outstanding, plan_fifo};
pub use service::{ClearanceContext, ClearanceService};
