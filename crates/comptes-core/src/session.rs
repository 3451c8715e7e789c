//! Caller-held session state: the current batch and transaction defaults.
//!
//! Nothing in the core reads a session implicitly. Drivers load one, pass
//! it to the operations that need it, and persist it themselves.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LedgerError, Result};
use crate::storage::NewTransaction;
use crate::validation::Catalog;

/// Default references applied to new transactions while a batch is open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDefaults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl TransactionDefaults {
    pub fn is_empty(&self) -> bool {
        self.account.is_none() && self.categories.is_empty() && self.tags.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_batch: Option<String>,
    #[serde(default)]
    pub defaults: TransactionDefaults,
}

impl Session {
    /// The batch an operation should target: an explicit prefix wins over
    /// the current batch.
    pub fn resolve_batch<'a>(&'a self, explicit: Option<&'a str>) -> Option<&'a str> {
        explicit
            .filter(|prefix| !prefix.is_empty())
            .or(self.current_batch.as_deref())
    }

    /// Fill the fields `new` leaves empty from the defaults.
    ///
    /// Defaults only apply while a batch is current.
    pub fn apply_defaults(&self, mut new: NewTransaction) -> NewTransaction {
        if self.current_batch.is_none() {
            return new;
        }
        if new.account.is_empty() {
            if let Some(account) = &self.defaults.account {
                new.account = account.clone();
            }
        }
        if new.categories.is_empty() {
            new.categories = self.defaults.categories.clone();
        }
        if new.tags.is_empty() {
            new.tags = self.defaults.tags.clone();
        }
        new
    }

    /// Make `batch_id` the current batch.
    pub fn begin(&mut self, batch_id: impl Into<String>) {
        self.current_batch = Some(batch_id.into());
    }

    /// Forget the current batch and its defaults if `batch_id` is it.
    ///
    /// Returns whether anything was cleared.
    pub fn finish(&mut self, batch_id: &str) -> bool {
        if self.current_batch.as_deref() != Some(batch_id) {
            return false;
        }
        debug!(batch = batch_id, "cleared current batch and defaults");
        *self = Session::default();
        true
    }

    pub fn clear_defaults(&mut self) {
        self.defaults = TransactionDefaults::default();
    }

    pub fn set_account(&mut self, catalog: &Catalog, account: &str) -> Result<()> {
        self.require_batch()?;
        catalog.check_account(account)?;
        self.defaults.account = Some(account.to_string());
        Ok(())
    }

    pub fn set_categories(&mut self, catalog: &Catalog, codes: Vec<String>) -> Result<()> {
        self.require_batch()?;
        catalog.check_categories(&codes)?;
        self.defaults.categories = codes;
        Ok(())
    }

    pub fn set_tags(&mut self, catalog: &Catalog, codes: Vec<String>) -> Result<()> {
        self.require_batch()?;
        catalog.check_tags(&codes)?;
        self.defaults.tags = codes;
        Ok(())
    }

    fn require_batch(&self) -> Result<()> {
        match self.current_batch {
            Some(_) => Ok(()),
            None => Err(LedgerError::NoCurrentBatch),
        }
    }
}
