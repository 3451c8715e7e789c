//! Backend selection.

use std::path::Path;

use comptes_core::storage::{sqlite::DATABASE_FILE, JsonStore, SqliteStore};
use comptes_core::{Ledger, LedgerStore};
use tracing::debug;

use crate::config::Backend;

/// Ledger over whichever backend the config selects.
pub type DynLedger = Ledger<Box<dyn LedgerStore>>;

pub fn open_store(backend: Backend, data_dir: &Path) -> comptes_core::Result<Box<dyn LedgerStore>> {
    debug!(?backend, data_dir = %data_dir.display(), "opening store");
    let store: Box<dyn LedgerStore> = match backend {
        Backend::Json => Box::new(JsonStore::open(data_dir)?),
        Backend::Sqlite => Box::new(SqliteStore::open(data_dir.join(DATABASE_FILE))?),
    };
    Ok(store)
}
