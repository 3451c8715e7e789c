//! CLI error types for structured error handling.
//!
//! Core errors are classified by [`ErrorKind`] and mapped to exit codes
//! here, so scripts can tell "not found" from "refused" from "disk broke".

use std::fmt;

use comptes_core::{ErrorKind, LedgerError};

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Unknown id, prefix or catalog reference
    NotFound {
        message: String,
        hint: Option<String>,
    },

    /// Invalid user input
    InvalidInput {
        message: String,
        hint: Option<String>,
    },

    /// Operation not allowed in the current state
    BusinessRule(String),

    /// Store failure
    Storage(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, .. } | CliError::InvalidInput { message, .. } => {
                write!(f, "{}", message)
            }
            CliError::BusinessRule(message) | CliError::Storage(message) => {
                write!(f, "{}", message)
            }
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput {
            message: message.into(),
            hint: None,
        }
    }

    pub fn invalid_input_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::InvalidInput {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Classify a core error and attach a hint where one helps.
    pub fn from_ledger(err: &LedgerError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::Validation => CliError::NotFound {
                message,
                hint: ledger_hint(err).map(str::to_string),
            },
            ErrorKind::UserInput => CliError::InvalidInput {
                message,
                hint: ledger_hint(err).map(str::to_string),
            },
            ErrorKind::Business => CliError::BusinessRule(message),
            ErrorKind::Storage => CliError::Storage(message),
        }
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::InvalidInput { .. } => exit_codes::INVALID_INPUT,
            CliError::BusinessRule(_) => exit_codes::BUSINESS_RULE,
            CliError::Storage(_) => exit_codes::STORAGE,
        }
    }

    pub fn hint(&self) -> Option<&str> {
        match self {
            CliError::NotFound { hint, .. } | CliError::InvalidInput { hint, .. } => {
                hint.as_deref()
            }
            CliError::BusinessRule(_) | CliError::Storage(_) => None,
        }
    }
}

fn ledger_hint(err: &LedgerError) -> Option<&'static str> {
    match err {
        LedgerError::TransactionNotFound { .. } => {
            Some("Run `comptes list --history` to see transaction IDs.")
        }
        LedgerError::AmbiguousId { .. } => Some("Type more characters of the ID."),
        LedgerError::ReferenceNotFound { .. } => {
            Some("Run `comptes list --accounts`, `--categories` or `--tags` to see valid codes.")
        }
        LedgerError::MissingMessage { .. } => Some("Pass a reason with -m/--message."),
        LedgerError::NoCurrentBatch => Some("Run `comptes begin` first."),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_follow_error_kind() {
        let not_found = CliError::from_ledger(&LedgerError::TransactionNotFound { id: "ab".into() });
        assert_eq!(not_found.exit_code(), exit_codes::NOT_FOUND);
        assert!(not_found.hint().is_some());

        let refused = CliError::from_ledger(&LedgerError::TransactionAlreadyDeleted {
            id: "ab".into(),
        });
        assert_eq!(refused.exit_code(), exit_codes::BUSINESS_RULE);

        let clash = CliError::from_ledger(&LedgerError::DuplicateId { id: "dup".into() });
        assert_eq!(clash.exit_code(), exit_codes::BUSINESS_RULE);

        let missing = CliError::from_ledger(&LedgerError::MissingMessage {
            operation: "edit".into(),
        });
        assert_eq!(missing.exit_code(), exit_codes::INVALID_INPUT);
        assert_eq!(missing.to_string(), "Message is mandatory for edit operations");

        let storage = CliError::from_ledger(&LedgerError::storage("write movements", "disk full"));
        assert_eq!(storage.exit_code(), exit_codes::STORAGE);
    }
}
