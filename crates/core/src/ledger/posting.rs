//! Ledger posting engine.
//!
//! Turns a validated draft transaction into balanced, hash-chained ledger
//! rows and freezes it. Rows are always produced in pairs: the post row
//! moves `post_account_id`, the folio row moves the counter account by the
//! same amount in the opposite direction.

use folio_shared::types::money::checked_sum;
use folio_shared::types::{AccountId, EntryType, LedgerId, LineItemId, TaxId};
use rust_decimal::Decimal;

use super::entry::LedgerEntry;
use super::error::LedgerError;
use super::hash::{ChainTail, HashChain};
use super::transaction::Transaction;
use super::validation::validate_entries;
use crate::accounts::AccountDirectory;

/// One debit/credit pair before it is hashed into ledger rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingPair {
    /// Account moved by the post row.
    pub post_account_id: AccountId,
    /// Account moved by the folio row.
    pub folio_account_id: AccountId,
    /// Entry type of the post row; the folio row takes the opposite.
    pub post_type: EntryType,
    /// Amount of both rows.
    pub amount: Decimal,
    /// Originating line item.
    pub line_item_id: Option<LineItemId>,
    /// Tax carried by the pair.
    pub tax_id: Option<TaxId>,
}

/// The outcome of posting one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingBatch {
    /// Ledger rows in chain order.
    pub entries: Vec<LedgerEntry>,
    /// Chain tail after the last row.
    pub tail: ChainTail,
    /// Face value of the transaction, tax excluded.
    pub amount: Decimal,
    /// Tax posted.
    pub tax: Decimal,
}

#[derive(Debug, Clone, Copy)]
struct Leg {
    account_id: AccountId,
    amount: Decimal,
    line_item_id: Option<LineItemId>,
}

/// Ledger posting service.
///
/// Pure business logic: it reads accounts and taxes through an
/// [`AccountDirectory`] and chains rows after a caller supplied tail.
pub struct PostingService;

impl PostingService {
    /// Posts a transaction.
    ///
    /// The transaction is marked posted only when every row was produced.
    ///
    /// # Errors
    ///
    /// - `PostedTransaction` if already posted
    /// - `TransactionNotFound` if recycled
    /// - `MissingLineItem` if there are no line items
    /// - `MissingMainAccountAmount`, `InvalidTaxCharge`, `UnbalancedTransaction`
    ///   for malformed compound transactions
    pub fn post<D: AccountDirectory + ?Sized>(
        transaction: &mut Transaction,
        directory: &D,
        chain: &HashChain,
        tail: &ChainTail,
    ) -> Result<PostingBatch, LedgerError> {
        transaction.ensure_editable()?;
        if transaction.line_items().is_empty() {
            return Err(LedgerError::MissingLineItem {
                transaction: transaction.display_no(),
            });
        }

        let pairs = Self::plan(transaction, directory)?;
        let mut next = tail.clone();
        let mut entries = Vec::with_capacity(pairs.len() * 2);
        for pair in &pairs {
            let (post, folio) = Self::rows(transaction, pair);
            entries.push(chain.link(&mut next, post));
            entries.push(chain.link(&mut next, folio));
        }
        validate_entries(&entries)?;

        let amount = transaction.amount()?;
        let tax = transaction.tax(directory)?;
        transaction.mark_posted();

        Ok(PostingBatch {
            entries,
            tail: next,
            amount,
            tax,
        })
    }

    /// Computes the pairs a transaction posts, in posting order.
    ///
    /// # Errors
    ///
    /// See [`Self::post`].
    pub fn plan<D: AccountDirectory + ?Sized>(
        transaction: &Transaction,
        directory: &D,
    ) -> Result<Vec<PostingPair>, LedgerError> {
        if transaction.compound() {
            Self::compound_pairs(transaction)
        } else {
            Self::simple_pairs(transaction, directory)
        }
    }

    fn simple_pairs<D: AccountDirectory + ?Sized>(
        transaction: &Transaction,
        directory: &D,
    ) -> Result<Vec<PostingPair>, LedgerError> {
        let main_type = EntryType::from_credited(transaction.credited());
        let mut pairs = Vec::new();

        for item in transaction.line_items() {
            // Tax pairs go first
            if let Some(tax_id) = item.tax_id {
                let tax = directory.tax(tax_id)?;
                if tax.is_chargeable() {
                    let control = tax.account_id.ok_or_else(|| LedgerError::MissingTaxAccount {
                        tax: tax.name.clone(),
                    })?;
                    let target = if item.tax_inclusive {
                        item.account_id
                    } else {
                        transaction.account_id()
                    };
                    pairs.push(PostingPair {
                        post_account_id: target,
                        folio_account_id: control,
                        post_type: main_type,
                        amount: item.tax_amount(tax)?,
                        line_item_id: Some(item.id),
                        tax_id: Some(tax_id),
                    });
                }
            }

            pairs.push(PostingPair {
                post_account_id: transaction.account_id(),
                folio_account_id: item.account_id,
                post_type: main_type,
                amount: item.contribution()?,
                line_item_id: Some(item.id),
                tax_id: None,
            });
        }

        pairs.retain(|pair| !pair.amount.is_zero());
        Ok(pairs)
    }

    fn compound_pairs(transaction: &Transaction) -> Result<Vec<PostingPair>, LedgerError> {
        if transaction.main_account_amount().is_none() {
            return Err(LedgerError::MissingMainAccountAmount {
                transaction: transaction.display_no(),
            });
        }

        let main = Leg {
            account_id: transaction.account_id(),
            amount: transaction.amount()?,
            line_item_id: None,
        };
        let (mut debits, mut credits) = if transaction.credited() {
            (Vec::new(), vec![main])
        } else {
            (vec![main], Vec::new())
        };
        for item in transaction.line_items() {
            if item.tax_id.is_some() {
                return Err(LedgerError::InvalidTaxCharge { line_item: item.id });
            }
            let leg = Leg {
                account_id: item.account_id,
                amount: item.contribution()?,
                line_item_id: Some(item.id),
            };
            if item.credited {
                credits.push(leg);
            } else {
                debits.push(leg);
            }
        }

        let debit = debits.iter().try_fold(Decimal::ZERO, |total, leg| checked_sum(total, leg.amount))?;
        let credit = credits.iter().try_fold(Decimal::ZERO, |total, leg| checked_sum(total, leg.amount))?;
        if debit != credit {
            return Err(LedgerError::UnbalancedTransaction { debit, credit });
        }

        // Greedy matching: each step settles the smaller of the two open legs
        let mut pairs = Vec::new();
        let (mut d, mut c) = (0, 0);
        while d < debits.len() && c < credits.len() {
            if debits[d].amount.is_zero() {
                d += 1;
                continue;
            }
            if credits[c].amount.is_zero() {
                c += 1;
                continue;
            }
            let amount = debits[d].amount.min(credits[c].amount);
            pairs.push(PostingPair {
                post_account_id: debits[d].account_id,
                folio_account_id: credits[c].account_id,
                post_type: EntryType::Debit,
                amount,
                line_item_id: debits[d].line_item_id.or(credits[c].line_item_id),
                tax_id: None,
            });
            debits[d].amount -= amount;
            credits[c].amount -= amount;
        }
        Ok(pairs)
    }

    fn rows(transaction: &Transaction, pair: &PostingPair) -> (LedgerEntry, LedgerEntry) {
        let post = LedgerEntry {
            id: LedgerId::new(),
            entity_id: transaction.entity_id(),
            currency_id: transaction.currency_id(),
            transaction_id: transaction.id(),
            line_item_id: pair.line_item_id,
            tax_id: pair.tax_id,
            transaction_date: transaction.transaction_date(),
            entry_type: pair.post_type,
            amount: pair.amount,
            post_account_id: pair.post_account_id,
            folio_account_id: pair.folio_account_id,
            sequence: 0,
            previous_hash: String::new(),
            hash: String::new(),
        };
        let folio = LedgerEntry {
            id: LedgerId::new(),
            entry_type: pair.post_type.opposite(),
            post_account_id: pair.folio_account_id,
            folio_account_id: pair.post_account_id,
            ..post.clone()
        };
        (post, folio)
    }
}
