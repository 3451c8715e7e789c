//! Batch coordinator: stage transactions, then commit or roll back as a whole.
//!
//! A batch lives in exactly one of the pending, committed or rolled-back
//! collections. Only pending batches can be resolved by prefix; committed
//! and rolled-back batches are kept for audit and never reopened.

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::ledger::Ledger;
use crate::resolve::{ensure_distinct, resolve_prefix};
use crate::storage::{new_id, LedgerStore, NewTransaction, Transaction, TransactionBatch};

impl<S: LedgerStore> Ledger<S> {
    /// Open a new, empty pending batch.
    pub fn begin(&mut self, description: Option<&str>) -> Result<TransactionBatch> {
        let batch = TransactionBatch {
            id: new_id(),
            description: description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            created_at: self.now(),
            transactions: Vec::new(),
            committed_at: None,
            rolled_back_at: None,
        };

        let mut pending = self.store().pending_batches()?;
        pending.push(batch.clone());
        self.store_mut().save_pending_batches(&pending)?;

        info!(batch = %batch.id, "began batch");
        Ok(batch)
    }

    /// Stage a transaction in the pending batch matching `prefix`.
    ///
    /// Neither the ledger nor the catalogs are touched; references are
    /// checked at commit time. The id must stay distinct from the ledger
    /// and from the batch's other staged transactions.
    pub fn add_to_batch(&mut self, prefix: &str, new: NewTransaction) -> Result<Transaction> {
        let mut pending = self.store().pending_batches()?;
        let index = resolve_prefix(&pending, prefix)?;
        let tx = new.into_transaction(self.now());

        ensure_distinct(&self.store().ledger()?, &tx.id)?;
        ensure_distinct(&pending[index].transactions, &tx.id)?;

        let batch = &mut pending[index];
        batch.transactions.push(tx.clone());
        let batch_id = batch.id.clone();
        self.store_mut().save_pending_batches(&pending)?;

        info!(batch = %batch_id, id = %tx.id, "staged transaction");
        Ok(tx)
    }

    /// Validate every staged transaction and move them into the ledger.
    ///
    /// Validation runs over the whole batch before anything is written: on
    /// the first unknown reference or clashing id nothing changes and the
    /// batch stays pending. If a later write fails, the ledger and the
    /// pending batches are written back as they were.
    pub fn commit(&mut self, prefix: &str) -> Result<TransactionBatch> {
        let before_pending = self.store().pending_batches()?;
        let index = resolve_prefix(&before_pending, prefix)?;

        let catalog = self.catalog()?;
        let before_ledger = self.store().ledger()?;
        let mut ledger = before_ledger.clone();
        for tx in &before_pending[index].transactions {
            catalog.validate(tx)?;
            ensure_distinct(&ledger, &tx.id)?;
            ledger.push(tx.clone());
        }

        let mut pending = before_pending.clone();
        let mut batch = pending.remove(index);
        batch.committed_at = Some(self.now());

        self.store_mut().save_ledger(&ledger)?;
        if let Err(err) = self.record_commit(&pending, &batch) {
            self.restore_ledger(&before_ledger);
            self.restore_pending(&before_pending);
            return Err(err);
        }

        info!(
            batch = %batch.id,
            count = batch.transactions.len(),
            "committed batch"
        );
        Ok(batch)
    }

    /// Discard the pending batch matching `prefix`.
    ///
    /// If the rolled-back collection cannot be written, the batch is put
    /// back in the pending collection.
    pub fn rollback(&mut self, prefix: &str) -> Result<TransactionBatch> {
        let before_pending = self.store().pending_batches()?;
        let index = resolve_prefix(&before_pending, prefix)?;

        let mut pending = before_pending.clone();
        let mut batch = pending.remove(index);
        batch.rolled_back_at = Some(self.now());

        self.store_mut().save_pending_batches(&pending)?;
        if let Err(err) = self.record_rollback(&batch) {
            self.restore_pending(&before_pending);
            return Err(err);
        }

        info!(
            batch = %batch.id,
            discarded = batch.transactions.len(),
            "rolled back batch"
        );
        Ok(batch)
    }

    fn record_commit(&mut self, pending: &[TransactionBatch], batch: &TransactionBatch) -> Result<()> {
        self.store_mut().save_pending_batches(pending)?;
        let mut committed = self.store().committed_batches()?;
        committed.push(batch.clone());
        self.store_mut().save_committed_batches(&committed)
    }

    fn record_rollback(&mut self, batch: &TransactionBatch) -> Result<()> {
        let mut rolled_back = self.store().rolled_back_batches()?;
        rolled_back.push(batch.clone());
        self.store_mut().save_rolled_back_batches(&rolled_back)
    }

    fn restore_ledger(&mut self, ledger: &[Transaction]) {
        if let Err(err) = self.store_mut().save_ledger(ledger) {
            warn!(error = %err, "could not restore ledger after failed batch write");
        }
    }

    fn restore_pending(&mut self, pending: &[TransactionBatch]) {
        if let Err(err) = self.store_mut().save_pending_batches(pending) {
            warn!(error = %err, "could not restore pending batches after failed batch write");
        }
    }

    /// The pending batch matching `prefix`.
    pub fn pending_batch(&self, prefix: &str) -> Result<TransactionBatch> {
        let mut pending = self.store().pending_batches()?;
        let index = resolve_prefix(&pending, prefix)?;
        debug!(batch = %pending[index].id, "resolved pending batch");
        Ok(pending.swap_remove(index))
    }

    pub fn pending_batches(&self) -> Result<Vec<TransactionBatch>> {
        self.store().pending_batches()
    }

    pub fn committed_batches(&self) -> Result<Vec<TransactionBatch>> {
        self.store().committed_batches()
    }

    pub fn rolled_back_batches(&self) -> Result<Vec<TransactionBatch>> {
        self.store().rolled_back_batches()
    }
}
