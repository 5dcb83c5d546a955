//! Application configuration management.

use std::collections::HashMap;

use serde::Deserialize;

use crate::types::money::{MONEY_PRECISION, MONEY_SCALE};
use crate::types::{AccountType, TransactionType};

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Accounting policy tables.
    #[serde(default)]
    pub accounting: AccountingConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Digest used to chain ledger rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// SHA-256.
    #[default]
    Sha256,
    /// SHA-512.
    Sha512,
    /// BLAKE3.
    Blake3,
}

/// Accounting policy, loaded once at start-up and read-only afterwards.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountingConfig {
    /// Digest algorithm for the ledger hash chain.
    #[serde(default)]
    pub hash_algorithm: HashAlgorithm,
    /// Previous hash used by the first ledger row of an entity.
    #[serde(default = "default_hash_salt")]
    pub hash_salt: String,
    /// Fractional digits kept on monetary amounts.
    #[serde(default = "default_money_scale")]
    pub money_scale: u32,
    /// Total digits allowed on monetary amounts.
    #[serde(default = "default_money_precision")]
    pub money_precision: u32,
    /// Whether opening balances may be dated inside the reporting period.
    #[serde(default)]
    pub allow_mid_year_balances: bool,
    /// Transaction number prefix per transaction type.
    #[serde(default = "default_transaction_prefixes")]
    pub transaction_prefixes: HashMap<TransactionType, String>,
    /// Base account code per account type.
    #[serde(default = "default_account_codes")]
    pub account_codes: HashMap<AccountType, u32>,
    /// Transaction types allowed to clear other transactions.
    #[serde(default = "default_assignables")]
    pub assignables: Vec<TransactionType>,
    /// Transaction types allowed to be cleared.
    #[serde(default = "default_clearables")]
    pub clearables: Vec<TransactionType>,
}

fn default_hash_salt() -> String {
    "folio".to_string()
}

fn default_money_scale() -> u32 {
    MONEY_SCALE
}

fn default_money_precision() -> u32 {
    MONEY_PRECISION
}

fn default_transaction_prefixes() -> HashMap<TransactionType, String> {
    [
        (TransactionType::JournalEntry, "JN"),
        (TransactionType::ClientInvoice, "IN"),
        (TransactionType::CashSale, "CS"),
        (TransactionType::CreditNote, "CN"),
        (TransactionType::SupplierBill, "BL"),
        (TransactionType::CashPurchase, "CP"),
        (TransactionType::DebitNote, "DN"),
        (TransactionType::ClientReceipt, "RC"),
        (TransactionType::SupplierPayment, "PY"),
        (TransactionType::ContraEntry, "CE"),
    ]
    .into_iter()
    .map(|(kind, prefix)| (kind, prefix.to_string()))
    .collect()
}

fn default_account_codes() -> HashMap<AccountType, u32> {
    HashMap::from([
        (AccountType::NonCurrentAsset, 0),
        (AccountType::ContraAsset, 1000),
        (AccountType::Inventory, 1100),
        (AccountType::Bank, 2000),
        (AccountType::CurrentAsset, 3000),
        (AccountType::Receivable, 4000),
        (AccountType::NonCurrentLiability, 5000),
        (AccountType::Control, 6000),
        (AccountType::CurrentLiability, 6500),
        (AccountType::Payable, 7000),
        (AccountType::Reconciliation, 8000),
        (AccountType::Equity, 9000),
        (AccountType::OperatingRevenue, 11000),
        (AccountType::OperatingExpense, 12000),
        (AccountType::NonOperatingRevenue, 13000),
        (AccountType::DirectExpense, 14000),
        (AccountType::OverheadExpense, 15000),
        (AccountType::OtherExpense, 16000),
    ])
}

fn default_assignables() -> Vec<TransactionType> {
    vec![
        TransactionType::ClientReceipt,
        TransactionType::SupplierPayment,
        TransactionType::CreditNote,
        TransactionType::DebitNote,
        TransactionType::JournalEntry,
    ]
}

fn default_clearables() -> Vec<TransactionType> {
    vec![
        TransactionType::ClientInvoice,
        TransactionType::SupplierBill,
        TransactionType::JournalEntry,
    ]
}

impl Default for AccountingConfig {
    fn default() -> Self {
        Self {
            hash_algorithm: HashAlgorithm::default(),
            hash_salt: default_hash_salt(),
            money_scale: default_money_scale(),
            money_precision: default_money_precision(),
            allow_mid_year_balances: false,
            transaction_prefixes: default_transaction_prefixes(),
            account_codes: default_account_codes(),
            assignables: default_assignables(),
            clearables: default_clearables(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "folio=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FOLIO").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
