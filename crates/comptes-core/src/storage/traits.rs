//! Ledger store trait definition.
//!
//! The `LedgerStore` trait is the only way the core touches persistent
//! state. Every collection is read whole and written whole; there is no
//! partial update, which keeps backends (JSON files, SQLite, memory)
//! interchangeable.

use rust_decimal::Decimal;

use super::types::{Account, Category, Tag, Transaction, TransactionBatch};
use crate::balance::balance_of;
use crate::error::{LedgerError, ReferenceKind, Result};

/// Storage interface for the ledger and its reference catalogs.
///
/// All implementations must ensure:
/// - A missing or empty collection reads as an empty `Vec`, not an error
/// - Each `save_*` replaces the whole collection, or fails without a
///   visible partial write
/// - Insertion order is preserved on read
///
/// There is no locking. Two processes writing the same store race and the
/// last whole-collection write wins; only single-process use is supported.
pub trait LedgerStore {
    // --- Reference catalogs ---

    fn accounts(&self) -> Result<Vec<Account>>;

    fn save_accounts(&mut self, accounts: &[Account]) -> Result<()>;

    fn categories(&self) -> Result<Vec<Category>>;

    fn save_categories(&mut self, categories: &[Category]) -> Result<()>;

    fn tags(&self) -> Result<Vec<Tag>>;

    fn save_tags(&mut self, tags: &[Tag]) -> Result<()>;

    // --- Ledger ---

    /// Every transaction, active and inactive, in storage order.
    fn ledger(&self) -> Result<Vec<Transaction>>;

    fn save_ledger(&mut self, transactions: &[Transaction]) -> Result<()>;

    // --- Batches ---

    fn pending_batches(&self) -> Result<Vec<TransactionBatch>>;

    fn save_pending_batches(&mut self, batches: &[TransactionBatch]) -> Result<()>;

    fn committed_batches(&self) -> Result<Vec<TransactionBatch>>;

    fn save_committed_batches(&mut self, batches: &[TransactionBatch]) -> Result<()>;

    fn rolled_back_batches(&self) -> Result<Vec<TransactionBatch>>;

    fn save_rolled_back_batches(&mut self, batches: &[TransactionBatch]) -> Result<()>;

    // --- Derived values ---

    /// Current balance of an account.
    ///
    /// Backends may override this, but the result must equal the initial
    /// balance plus the amounts of the account's active transactions.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::ReferenceNotFound` if the account is unknown.
    fn account_balance(&self, account_id: &str) -> Result<Decimal> {
        let accounts = self.accounts()?;
        let account = accounts
            .iter()
            .find(|account| account.id == account_id)
            .ok_or_else(|| LedgerError::reference(ReferenceKind::Account, account_id))?;
        Ok(balance_of(account, &self.ledger()?))
    }
}

/// Lets drivers pick a backend at runtime and still use `Ledger<S>`.
impl<S: LedgerStore + ?Sized> LedgerStore for Box<S> {
    fn accounts(&self) -> Result<Vec<Account>> {
        (**self).accounts()
    }

    fn save_accounts(&mut self, accounts: &[Account]) -> Result<()> {
        (**self).save_accounts(accounts)
    }

    fn categories(&self) -> Result<Vec<Category>> {
        (**self).categories()
    }

    fn save_categories(&mut self, categories: &[Category]) -> Result<()> {
        (**self).save_categories(categories)
    }

    fn tags(&self) -> Result<Vec<Tag>> {
        (**self).tags()
    }

    fn save_tags(&mut self, tags: &[Tag]) -> Result<()> {
        (**self).save_tags(tags)
    }

    fn ledger(&self) -> Result<Vec<Transaction>> {
        (**self).ledger()
    }

    fn save_ledger(&mut self, transactions: &[Transaction]) -> Result<()> {
        (**self).save_ledger(transactions)
    }

    fn pending_batches(&self) -> Result<Vec<TransactionBatch>> {
        (**self).pending_batches()
    }

    fn save_pending_batches(&mut self, batches: &[TransactionBatch]) -> Result<()> {
        (**self).save_pending_batches(batches)
    }

    fn committed_batches(&self) -> Result<Vec<TransactionBatch>> {
        (**self).committed_batches()
    }

    fn save_committed_batches(&mut self, batches: &[TransactionBatch]) -> Result<()> {
        (**self).save_committed_batches(batches)
    }

    fn rolled_back_batches(&self) -> Result<Vec<TransactionBatch>> {
        (**self).rolled_back_batches()
    }

    fn save_rolled_back_batches(&mut self, batches: &[TransactionBatch]) -> Result<()> {
        (**self).save_rolled_back_batches(batches)
    }

    fn account_balance(&self, account_id: &str) -> Result<Decimal> {
        (**self).account_balance(account_id)
    }
}
