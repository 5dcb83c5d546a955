//! Shared types, errors, and configuration for Folio.
//!
//! This crate provides common types used across all other crates:
//! - Money helpers with fixed-point decimal precision
//! - Typed IDs for type-safe entity references
//! - The closed accounting enumerations (account, transaction and entry types)
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AccountingConfig, AppConfig, HashAlgorithm, LoggingConfig};
pub use error::{AppError, AppResult};
