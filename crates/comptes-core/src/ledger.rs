//! The `Ledger` facade.
//!
//! `Ledger` owns a store and exposes every core operation. The operations
//! themselves live next to their domain: transaction lifecycle in
//! `transactions`, batch handling in `batches`, balances in `balance`.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::storage::LedgerStore;
use crate::validation::Catalog;

/// Entry point for all ledger operations over a store `S`.
#[derive(Debug)]
pub struct Ledger<S> {
    store: S,
}

impl<S: LedgerStore> Ledger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Load the reference catalogs as they are right now.
    pub fn catalog(&self) -> Result<Catalog> {
        Catalog::load(&self.store)
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
