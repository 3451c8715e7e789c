//! SQLite storage backend.
//!
//! Every collection item is stored as one JSON document row in a single
//! `documents` table, keyed by collection name and position. A save deletes
//! the collection's rows and reinserts them inside one SQL transaction, so
//! readers never observe a half-written collection.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::traits::LedgerStore;
use super::types::{Account, Category, Tag, Transaction, TransactionBatch};
use super::Collection;
use crate::error::{LedgerError, Result};

/// Default database file name inside a data directory.
pub const DATABASE_FILE: &str = "comptes.db";

const SCHEMA_VERSION: &str = "1";

/// Raw row from the documents table, before decoding.
#[derive(Debug)]
struct DocumentRow {
    position: i64,
    body: String,
}

/// Single-file SQLite store.
pub struct SqliteStore {
    path: PathBuf,
    conn: Connection,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Open (or create) the database at `path` and make sure the schema exists.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if the file cannot be opened, the schema
    /// cannot be created, or the file was written by a newer schema.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                LedgerError::storage(format!("create data dir {}", parent.display()), e)
            })?;
        }
        let conn = Connection::open(&path)
            .map_err(|e| LedgerError::storage(format!("open {}", path.display()), e))?;
        Self::init_schema(&conn)?;
        debug!(path = %path.display(), "opened sqlite store");
        Ok(Self { path, conn })
    }

    /// Open an in-memory database. Nothing survives the store being dropped.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL,
                position INTEGER NOT NULL,
                body TEXT NOT NULL,
                PRIMARY KEY (collection, position)
            );
            "#,
        )
        .map_err(|e| LedgerError::storage("create schema", e))?;

        let version: Option<String> = conn
            .query_row(
                "SELECT value FROM meta WHERE key = 'schema_version'",
                [],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| LedgerError::storage("read schema version", e))?;

        match version.as_deref() {
            None => {
                conn.execute(
                    "INSERT INTO meta (key, value) VALUES ('schema_version', ?1)",
                    [SCHEMA_VERSION],
                )
                .map_err(|e| LedgerError::storage("write schema version", e))?;
            }
            Some(SCHEMA_VERSION) => {}
            Some(other) => {
                return Err(LedgerError::storage(
                    "read schema version",
                    format!("unsupported schema version {other}"),
                ));
            }
        }
        Ok(())
    }

    fn read<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>> {
        let operation = || format!("read {}", collection.name());
        let mut stmt = self
            .conn
            .prepare("SELECT position, body FROM documents WHERE collection = ?1 ORDER BY position")
            .map_err(|e| LedgerError::storage(operation(), e))?;
        let rows = stmt
            .query_map([collection.name()], |row| {
                Ok(DocumentRow {
                    position: row.get(0)?,
                    body: row.get(1)?,
                })
            })
            .map_err(|e| LedgerError::storage(operation(), e))?;

        let mut items = Vec::new();
        for row in rows {
            let row = row.map_err(|e| LedgerError::storage(operation(), e))?;
            let item = serde_json::from_str(&row.body).map_err(|e| {
                LedgerError::storage(
                    format!("decode {} row {}", collection.name(), row.position),
                    e,
                )
            })?;
            items.push(item);
        }
        Ok(items)
    }

    fn write<T: Serialize>(&mut self, collection: Collection, items: &[T]) -> Result<()> {
        let operation = || format!("write {}", collection.name());
        let bodies = items
            .iter()
            .map(serde_json::to_string)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| LedgerError::storage(operation(), e))?;

        let tx = self
            .conn
            .transaction()
            .map_err(|e| LedgerError::storage(operation(), e))?;
        tx.execute(
            "DELETE FROM documents WHERE collection = ?1",
            [collection.name()],
        )
        .map_err(|e| LedgerError::storage(operation(), e))?;
        {
            let mut insert = tx
                .prepare(
                    "INSERT INTO documents (collection, position, body) VALUES (?1, ?2, ?3)",
                )
                .map_err(|e| LedgerError::storage(operation(), e))?;
            for (position, body) in bodies.iter().enumerate() {
                insert
                    .execute(params![collection.name(), position as i64, body])
                    .map_err(|e| LedgerError::storage(operation(), e))?;
            }
        }
        tx.commit()
            .map_err(|e| LedgerError::storage(operation(), e))?;

        debug!(collection = collection.name(), count = items.len(), "wrote collection");
        Ok(())
    }
}

impl LedgerStore for SqliteStore {
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
        self.read(Collection::Ledger)
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
