//! # Comptes Core
//!
//! Core library for Comptes - a personal bookkeeping ledger with batched
//! entry and reversible edits.
//!
//! This crate provides the domain logic, storage abstractions, and data
//! models independent of the CLI interface.
//!
//! ## Architecture
//!
//! - **storage**: `LedgerStore` trait, data model, JSON/SQLite/memory backends
//! - **transactions**: add, edit, delete and undo against the ledger
//! - **batches**: staging, commit and rollback of transaction batches
//! - **validation**: account/category/tag reference checks
//! - **balance**: balances derived from the ledger
//! - **session**: current batch and transaction defaults held by the caller
//!
//! There is no locking: a store must only be written by one process at a time.

pub mod balance;
pub mod batches;
pub mod error;
pub mod fs;
pub mod ledger;
pub mod resolve;
pub mod session;
pub mod storage;
pub mod transactions;
pub mod validation;

pub use error::{ErrorKind, LedgerError, ReferenceKind, Result};
pub use ledger::Ledger;
pub use session::{Session, TransactionDefaults};
pub use storage::LedgerStore;
pub use transactions::UNDO_ADD_MARKER;
pub use validation::Catalog;

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
