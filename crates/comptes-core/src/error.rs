//! Error types for Comptes core operations.
//!
//! This module defines the error hierarchy for all core operations.
//! Errors carry the offending value (an id, a prefix, a code) so the CLI
//! layer can map them to precise, actionable messages.

use std::fmt;

use thiserror::Error;

/// Result type alias for Comptes operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Boxed cause carried by storage failures.
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The kind of catalog reference that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Account,
    Category,
    Tag,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReferenceKind::Account => "account",
            ReferenceKind::Category => "category",
            ReferenceKind::Tag => "tag",
        };
        f.write_str(name)
    }
}

/// Coarse classification of an error, used for exit codes and messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A reference or identifier could not be found.
    Validation,
    /// The operation is not allowed in the record's current state.
    Business,
    /// The caller supplied incomplete or malformed input.
    UserInput,
    /// The backing store failed to read or write.
    Storage,
}

/// Core error type for Comptes operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// An account, category or tag referenced by a transaction does not exist.
    #[error("{kind} not found: {value}")]
    ReferenceNotFound { kind: ReferenceKind, value: String },

    /// No transaction or batch id starts with the given prefix.
    #[error("Transaction not found: {id}")]
    TransactionNotFound { id: String },

    /// More than one id starts with the given prefix.
    #[error("Multiple transactions found with ID starting with: {prefix} (be more specific)")]
    AmbiguousId { prefix: String },

    /// A caller-supplied id collides with an existing id or prefix.
    #[error("Transaction ID {id} clashes with an existing transaction")]
    DuplicateId { id: String },

    /// The transaction is already inactive.
    #[error("Transaction {id} is already deleted")]
    TransactionAlreadyDeleted { id: String },

    /// Undo cannot tell which operation last touched the record.
    #[error("Cannot determine operation type for transaction {id}")]
    InvalidOperation { id: String },

    /// The parent of an edited transaction is no longer in the ledger.
    #[error("Parent transaction {id} not found")]
    ParentNotFound { id: String },

    /// A mandatory comment was not supplied.
    #[error("Message is mandatory for {operation} operations")]
    MissingMessage { operation: String },

    /// Session defaults can only be set while a batch is current.
    #[error("No active transaction batch. Use 'comptes begin' to start a batch first")]
    NoCurrentBatch,

    /// Invalid user input (dates, amounts, JSON payloads)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Storage backend error
    #[error("Storage error ({operation}): {source}")]
    Storage {
        operation: String,
        #[source]
        source: BoxedCause,
    },
}

impl LedgerError {
    /// Wrap a backend failure with the operation that triggered it.
    pub fn storage(operation: impl Into<String>, cause: impl Into<BoxedCause>) -> Self {
        LedgerError::Storage {
            operation: operation.into(),
            source: cause.into(),
        }
    }

    pub(crate) fn reference(kind: ReferenceKind, value: impl Into<String>) -> Self {
        LedgerError::ReferenceNotFound {
            kind,
            value: value.into(),
        }
    }

    pub(crate) fn missing_message(operation: &str) -> Self {
        LedgerError::MissingMessage {
            operation: operation.to_string(),
        }
    }

    /// Coarse kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::ReferenceNotFound { .. }
            | LedgerError::TransactionNotFound { .. }
            | LedgerError::AmbiguousId { .. } => ErrorKind::Validation,
            LedgerError::TransactionAlreadyDeleted { .. }
            | LedgerError::DuplicateId { .. }
            | LedgerError::InvalidOperation { .. }
            | LedgerError::ParentNotFound { .. } => ErrorKind::Business,
            LedgerError::MissingMessage { .. }
            | LedgerError::NoCurrentBatch
            | LedgerError::InvalidInput(_) => ErrorKind::UserInput,
            LedgerError::Storage { .. } => ErrorKind::Storage,
        }
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::storage("io", err)
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::storage("json", err)
    }
}

impl From<rusqlite::Error> for LedgerError {
    fn from(err: rusqlite::Error) -> Self {
        LedgerError::storage("sqlite", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_message_names_kind_and_value() {
        let err = LedgerError::reference(ReferenceKind::Category, "XYZ");
        assert_eq!(err.to_string(), "category not found: XYZ");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_storage_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = LedgerError::storage("write movements.json", io);
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert!(err.to_string().contains("write movements.json"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_kinds() {
        assert_eq!(
            LedgerError::InvalidOperation { id: "a".into() }.kind(),
            ErrorKind::Business
        );
        assert_eq!(
            LedgerError::missing_message("edit").kind(),
            ErrorKind::UserInput
        );
        assert_eq!(
            LedgerError::missing_message("delete").to_string(),
            "Message is mandatory for delete operations"
        );
    }
}
