//! In-memory storage backend.
//!
//! Holds every collection in process memory. Used by the unit tests and by
//! callers that want to run the ledger without touching disk.

use std::collections::HashSet;

use super::traits::LedgerStore;
use super::types::{Account, Category, Tag, Transaction, TransactionBatch};
use super::Collection;
use crate::error::{LedgerError, Result};

/// In-memory ledger store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    accounts: Vec<Account>,
    categories: Vec<Category>,
    tags: Vec<Tag>,
    ledger: Vec<Transaction>,
    pending: Vec<TransactionBatch>,
    committed: Vec<TransactionBatch>,
    rolled_back: Vec<TransactionBatch>,
    failing: HashSet<Collection>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_accounts(mut self, accounts: Vec<Account>) -> Self {
        self.accounts = accounts;
        self
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_ledger(mut self, ledger: Vec<Transaction>) -> Self {
        self.ledger = ledger;
        self
    }

    /// Make every save of `collection` fail with a storage error.
    pub fn failing_on(mut self, collection: Collection) -> Self {
        self.set_failing(collection, true);
        self
    }

    /// Arm or clear write failures on an already populated store.
    pub fn set_failing(&mut self, collection: Collection, failing: bool) {
        if failing {
            self.failing.insert(collection);
        } else {
            self.failing.remove(&collection);
        }
    }

    fn check_writable(&self, collection: Collection) -> Result<()> {
        if self.failing.contains(&collection) {
            return Err(LedgerError::storage(
                format!("write {}", collection.name()),
                "simulated write failure",
            ));
        }
        Ok(())
    }
}

impl LedgerStore for MemoryStore {
    fn accounts(&self) -> Result<Vec<Account>> {
        Ok(self.accounts.clone())
    }

    fn save_accounts(&mut self, accounts: &[Account]) -> Result<()> {
        self.check_writable(Collection::Accounts)?;
        self.accounts = accounts.to_vec();
        Ok(())
    }

    fn categories(&self) -> Result<Vec<Category>> {
        Ok(self.categories.clone())
    }

    fn save_categories(&mut self, categories: &[Category]) -> Result<()> {
        self.check_writable(Collection::Categories)?;
        self.categories = categories.to_vec();
        Ok(())
    }

    fn tags(&self) -> Result<Vec<Tag>> {
        Ok(self.tags.clone())
    }

    fn save_tags(&mut self, tags: &[Tag]) -> Result<()> {
        self.check_writable(Collection::Tags)?;
        self.tags = tags.to_vec();
        Ok(())
    }

    fn ledger(&self) -> Result<Vec<Transaction>> {
        Ok(self.ledger.clone())
    }

    fn save_ledger(&mut self, transactions: &[Transaction]) -> Result<()> {
        self.check_writable(Collection::Ledger)?;
        self.ledger = transactions.to_vec();
        Ok(())
    }

    fn pending_batches(&self) -> Result<Vec<TransactionBatch>> {
        Ok(self.pending.clone())
    }

    fn save_pending_batches(&mut self, batches: &[TransactionBatch]) -> Result<()> {
        self.check_writable(Collection::PendingBatches)?;
        self.pending = batches.to_vec();
        Ok(())
    }

    fn committed_batches(&self) -> Result<Vec<TransactionBatch>> {
        Ok(self.committed.clone())
    }

    fn save_committed_batches(&mut self, batches: &[TransactionBatch]) -> Result<()> {
        self.check_writable(Collection::CommittedBatches)?;
        self.committed = batches.to_vec();
        Ok(())
    }

    fn rolled_back_batches(&self) -> Result<Vec<TransactionBatch>> {
        Ok(self.rolled_back.clone())
    }

    fn save_rolled_back_batches(&mut self, batches: &[TransactionBatch]) -> Result<()> {
        self.check_writable(Collection::RolledBackBatches)?;
        self.rolled_back = batches.to_vec();
        Ok(())
    }
}
