//! Prefix lookup shared by transactions and batches.
//!
//! Users refer to records by the first few characters of their id. A prefix
//! resolves only when exactly one id starts with it.

use crate::error::{LedgerError, Result};
use crate::storage::{Transaction, TransactionBatch};

/// Anything addressable by a text id.
pub trait Identified {
    fn id(&self) -> &str;
}

impl Identified for Transaction {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for TransactionBatch {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Find the single item whose id starts with `prefix` and return its index.
///
/// # Errors
///
/// - `TransactionNotFound` when nothing matches
/// - `AmbiguousId` when two or more ids match
pub fn resolve_prefix<T: Identified>(items: &[T], prefix: &str) -> Result<usize> {
    let mut matches = items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.id().starts_with(prefix))
        .map(|(index, _)| index);

    match (matches.next(), matches.next()) {
        (Some(index), None) => Ok(index),
        (None, _) => Err(LedgerError::TransactionNotFound {
            id: prefix.to_string(),
        }),
        (Some(_), Some(_)) => Err(LedgerError::AmbiguousId {
            prefix: prefix.to_string(),
        }),
    }
}

/// Fail when adding `id` would stop some id in `items` from resolving.
///
/// An id that equals, extends or is extended by an existing id makes the
/// full id of one of them ambiguous.
///
/// # Errors
///
/// - `DuplicateId` on any such overlap
pub fn ensure_distinct<'a, T, I>(items: I, id: &str) -> Result<()>
where
    T: Identified + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let clash = items
        .into_iter()
        .any(|item| item.id().starts_with(id) || id.starts_with(item.id()));
    if clash {
        return Err(LedgerError::DuplicateId { id: id.to_string() });
    }
    Ok(())
}
