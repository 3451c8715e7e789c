//! JSON file storage backend.
//!
//! Each collection lives in its own pretty-printed JSON file inside a data
//! directory. Reads load the whole file; writes replace the whole file via
//! a temp file and rename.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use super::traits::LedgerStore;
use super::types::{Account, Category, Tag, Transaction, TransactionBatch};
use super::Collection;
use crate::error::{LedgerError, Result};
use crate::fs::{read_optional, write_atomic};

/// Ledger file name used before transactions were renamed to movements.
const LEGACY_LEDGER_FILE: &str = "transactions.json";

/// Flat-file JSON store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct JsonStore {
    data_dir: PathBuf,
}

impl JsonStore {
    /// Open a store in `data_dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if the directory cannot be created.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).map_err(|e| {
            LedgerError::storage(format!("create data dir {}", data_dir.display()), e)
        })?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(collection.file_name())
    }

    fn read<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>> {
        self.read_file(&self.path(collection), collection)
    }

    fn read_file<T: DeserializeOwned>(&self, path: &Path, collection: Collection) -> Result<Vec<T>> {
        let operation = || format!("read {}", collection.name());
        let bytes = match read_optional(path).map_err(|e| LedgerError::storage(operation(), e))? {
            Some(bytes) => bytes,
            None => return Ok(Vec::new()),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        // A file holding `null` is treated like an empty collection.
        let items: Option<Vec<T>> =
            serde_json::from_slice(&bytes).map_err(|e| LedgerError::storage(operation(), e))?;
        let items = items.unwrap_or_default();
        debug!(collection = collection.name(), count = items.len(), "read collection");
        Ok(items)
    }

    fn write<T: Serialize>(&self, collection: Collection, items: &[T]) -> Result<()> {
        let operation = || format!("write {}", collection.name());
        let contents =
            serde_json::to_vec_pretty(items).map_err(|e| LedgerError::storage(operation(), e))?;
        write_atomic(&self.path(collection), &contents)
            .map_err(|e| LedgerError::storage(operation(), e))?;
        debug!(collection = collection.name(), count = items.len(), "wrote collection");
        Ok(())
    }
}

impl LedgerStore for JsonStore {
    fn accounts(&self) -> Result<Vec<Account>> {
        self.read(Collection::Accounts)
    }

    fn save_accounts(&mut self, accounts: &[Account]) -> Result<()> {
        self.write(Collection::Accounts, accounts)
    }

    fn categories(&self) -> Result<Vec<Category>> {
        self.read(Collection::Categories)
    }

    fn save_categories(&mut self, categories: &[Category]) -> Result<()> {
        self.write(Collection::Categories, categories)
    }

    fn tags(&self) -> Result<Vec<Tag>> {
        self.read(Collection::Tags)
    }

    fn save_tags(&mut self, tags: &[Tag]) -> Result<()> {
        self.write(Collection::Tags, tags)
    }

    fn ledger(&self) -> Result<Vec<Transaction>> {
        let current = self.path(Collection::Ledger);
        if current.exists() {
            return self.read_file(&current, Collection::Ledger);
        }

        let legacy = self.data_dir.join(LEGACY_LEDGER_FILE);
        if !legacy.exists() {
            return Ok(Vec::new());
        }

        let transactions = self.read_file(&legacy, Collection::Ledger)?;
        fs::rename(&legacy, &current).map_err(|e| {
            LedgerError::storage(
                format!("migrate {} to {}", LEGACY_LEDGER_FILE, current.display()),
                e,
            )
        })?;
        info!(
            from = LEGACY_LEDGER_FILE,
            to = %current.display(),
            "migrated legacy ledger file"
        );
        Ok(transactions)
    }

    fn save_ledger(&mut self, transactions: &[Transaction]) -> Result<()> {
        self.write(Collection::Ledger, transactions)
    }

    fn pending_batches(&self) -> Result<Vec<TransactionBatch>> {
        self.read(Collection::PendingBatches)
    }

    fn save_pending_batches(&mut self, batches: &[TransactionBatch]) -> Result<()> {
        self.write(Collection::PendingBatches, batches)
    }

    fn committed_batches(&self) -> Result<Vec<TransactionBatch>> {
        self.read(Collection::CommittedBatches)
    }

    fn save_committed_batches(&mut self, batches: &[TransactionBatch]) -> Result<()> {
        self.write(Collection::CommittedBatches, batches)
    }

    fn rolled_back_batches(&self) -> Result<Vec<TransactionBatch>> {
        self.read(Collection::RolledBackBatches)
    }

    fn save_rolled_back_batches(&mut self, batches: &[TransactionBatch]) -> Result<()> {
        self.write(Collection::RolledBackBatches, batches)
    }
}
