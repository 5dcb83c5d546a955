//! Ledger hash chain.
//!
//! Every ledger row is digested over its content and the hash of the row
//! before it. The first row of an entity chains to the configured salt.
//! Altering any historical row changes its digest and breaks the link of
//! every row after it.

use folio_shared::{AccountingConfig, HashAlgorithm};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};

use super::entry::LedgerEntry;
use super::error::LedgerError;

/// Position and hash of the last row of an entity's chain.
///
/// Used as the optimistic concurrency token when appending rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainTail {
    /// Sequence of the last row, zero for an empty chain.
    pub sequence: u64,
    /// Hash of the last row, or the salt for an empty chain.
    pub hash: String,
}

/// Computes and verifies ledger row hashes.
#[derive(Debug, Clone)]
pub struct HashChain {
    algorithm: HashAlgorithm,
    salt: String,
    scale: u32,
}

impl HashChain {
    /// Creates a chain hasher.
    #[must_use]
    pub fn new(algorithm: HashAlgorithm, salt: impl Into<String>, scale: u32) -> Self {
        Self {
            algorithm,
            salt: salt.into(),
            scale,
        }
    }

    /// Creates a chain hasher from configuration.
    #[must_use]
    pub fn from_config(config: &AccountingConfig) -> Self {
        Self::new(config.hash_algorithm, config.hash_salt.clone(), config.money_scale)
    }

    /// The tail of an empty chain.
    #[must_use]
    pub fn genesis(&self) -> ChainTail {
        ChainTail {
            sequence: 0,
            hash: self.salt.clone(),
        }
    }

    /// Canonical payload of a row: its content fields in fixed order, joined by `|`.
    #[must_use]
    pub fn payload(&self, entry: &LedgerEntry) -> String {
        let optional = |value: Option<String>| value.unwrap_or_default();
        [
            entry.transaction_date.to_string(),
            entry.entry_type.as_str().to_string(),
            self.render_amount(entry.amount),
            entry.previous_hash.clone(),
            entry.entity_id.to_string(),
            entry.transaction_id.to_string(),
            entry.currency_id.to_string(),
            entry.post_account_id.to_string(),
            entry.folio_account_id.to_string(),
            optional(entry.line_item_id.map(|id| id.to_string())),
            optional(entry.tax_id.map(|id| id.to_string())),
        ]
        .join("|")
    }

    /// Renders an amount with at least `scale` fractional digits. Digits
    /// beyond the scale are kept so every stored digit is covered by the
    /// digest.
    fn render_amount(&self, amount: Decimal) -> String {
        let mut canonical = amount.normalize();
        if canonical.scale() < self.scale {
            canonical.rescale(self.scale);
        }
        canonical.to_string()
    }

    /// Hex digest of a row.
    #[must_use]
    pub fn digest(&self, entry: &LedgerEntry) -> String {
        let payload = self.payload(entry);
        match self.algorithm {
            HashAlgorithm::Sha256 => {
                let mut hasher = Sha256::new();
                hasher.update(payload.as_bytes());
                format!("{:x}", hasher.finalize())
            }
            HashAlgorithm::Sha512 => {
                let mut hasher = Sha512::new();
                hasher.update(payload.as_bytes());
                format!("{:x}", hasher.finalize())
            }
            HashAlgorithm::Blake3 => blake3::hash(payload.as_bytes()).to_hex().to_string(),
        }
    }

    /// Links `entry` after `tail`: sets its sequence, previous hash and hash,
    /// then advances `tail` to it.
    #[must_use]
    pub fn link(&self, tail: &mut ChainTail, mut entry: LedgerEntry) -> LedgerEntry {
        entry.sequence = tail.sequence + 1;
        entry.previous_hash = tail.hash.clone();
        entry.hash = self.digest(&entry);
        tail.sequence = entry.sequence;
        tail.hash = entry.hash.clone();
        entry
    }

    /// Recomputes the whole chain from genesis.
    ///
    /// Returns the tail of the verified chain.
    ///
    /// # Errors
    ///
    /// Returns `ChainBroken` naming the first row whose sequence, link or
    /// digest does not match.
    pub fn verify(&self, entries: &[LedgerEntry]) -> Result<ChainTail, LedgerError> {
        let mut tail = self.genesis();
        for entry in entries {
            let intact = entry.sequence == tail.sequence + 1
                && entry.previous_hash == tail.hash
                && self.digest(entry) == entry.hash;
            if !intact {
                return Err(LedgerError::ChainBroken {
                    sequence: tail.sequence + 1,
                    ledger_id: entry.id,
                });
            }
            tail.sequence = entry.sequence;
            tail.hash.clone_from(&entry.hash);
        }
        Ok(tail)
    }
}
