//! Storage abstraction for Comptes.
//!
//! This module defines the `LedgerStore` trait, the persisted data model,
//! and the bundled backends.
//!
//! ## Architecture
//!
//! The storage layer is backend-agnostic:
//! - `JsonStore`: one pretty-printed JSON file per collection
//! - `SqliteStore`: a single SQLite file, one row per collection item
//! - `MemoryStore`: in-process collections (tests, embedding)
//!
//! Every backend reads and writes whole collections. Atomicity is per
//! collection only: an operation that touches several collections (a batch
//! commit writes the ledger, then the pending and committed batches) can be
//! interrupted between writes.

pub mod json;
pub mod memory;
pub mod sqlite;
pub mod traits;
pub mod types;

// Re-export public types
pub use json::JsonStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::LedgerStore;
pub use types::{
    new_id, Account, Category, NewTransaction, Tag, Transaction, TransactionBatch,
    TransactionPatch,
};

/// The persisted collections, shared by every backend for naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Accounts,
    Categories,
    Tags,
    Ledger,
    PendingBatches,
    CommittedBatches,
    RolledBackBatches,
}

impl Collection {
    pub const ALL: [Collection; 7] = [
        Collection::Accounts,
        Collection::Categories,
        Collection::Tags,
        Collection::Ledger,
        Collection::PendingBatches,
        Collection::CommittedBatches,
        Collection::RolledBackBatches,
    ];

    /// Stable collection name used as a key by the backends.
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Accounts => "accounts",
            Collection::Categories => "categories",
            Collection::Tags => "tags",
            Collection::Ledger => "movements",
            Collection::PendingBatches => "pending_transactions",
            Collection::CommittedBatches => "committed_transactions",
            Collection::RolledBackBatches => "rolled_back_transactions",
        }
    }

    /// File name used by the JSON backend.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.name())
    }
}
