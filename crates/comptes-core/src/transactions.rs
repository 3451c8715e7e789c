//! Transaction lifecycle: add, edit, delete, undo.
//!
//! Records are never rewritten into something else. An edit deactivates the
//! target and appends a child whose `parent_id` points back at it; a delete
//! only deactivates. `undo` walks exactly one of those steps back, so it has
//! to classify what last happened to a record from its flags alone.

use tracing::{debug, info, warn};

use crate::error::{LedgerError, Result};
use crate::ledger::Ledger;
use crate::resolve::{ensure_distinct, resolve_prefix};
use crate::storage::{LedgerStore, NewTransaction, Transaction, TransactionPatch};

/// Comment stored on a record whose addition was undone.
pub const UNDO_ADD_MARKER: &str = "Undo add operation";

/// What last happened to a record, as far as undo is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LastOperation {
    /// The record is the live child of an edit of `parent`.
    Edit { parent: String },
    /// The record was added and never touched.
    Add,
    /// The record was soft-deleted.
    Delete,
}

fn classify(tx: &Transaction, ledger: &[Transaction]) -> Result<LastOperation> {
    // An inactive record that some other record names as parent was edited
    // away; only its child can be undone.
    let has_child = || {
        ledger
            .iter()
            .any(|other| other.parent() == Some(tx.id.as_str()))
    };

    match (tx.active, tx.parent(), tx.comment()) {
        (true, Some(parent), _) => Ok(LastOperation::Edit {
            parent: parent.to_string(),
        }),
        (true, None, None) => Ok(LastOperation::Add),
        (false, _, Some(_)) if !has_child() => Ok(LastOperation::Delete),
        _ => Err(LedgerError::InvalidOperation { id: tx.id.clone() }),
    }
}

fn require_comment(comment: &str, operation: &str) -> Result<()> {
    if comment.trim().is_empty() {
        return Err(LedgerError::missing_message(operation));
    }
    Ok(())
}

impl<S: LedgerStore> Ledger<S> {
    /// Every transaction, active and inactive, in storage order.
    pub fn transactions(&self) -> Result<Vec<Transaction>> {
        self.store().ledger()
    }

    /// The transaction whose id starts with `prefix`.
    pub fn transaction(&self, prefix: &str) -> Result<Transaction> {
        let mut ledger = self.store().ledger()?;
        let index = resolve_prefix(&ledger, prefix)?;
        Ok(ledger.swap_remove(index))
    }

    /// Validate and append a transaction directly to the ledger.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::ReferenceNotFound` if the account, a category or
    /// a tag is unknown, and `LedgerError::DuplicateId` if an explicit id
    /// overlaps an id already in the ledger.
    pub fn add(&mut self, new: NewTransaction) -> Result<Transaction> {
        let tx = new.into_transaction(self.now());
        self.catalog()?.validate(&tx)?;

        let mut ledger = self.store().ledger()?;
        ensure_distinct(&ledger, &tx.id)?;
        ledger.push(tx.clone());
        self.store_mut().save_ledger(&ledger)?;

        info!(id = %tx.id, account = %tx.account, amount = %tx.amount, "added transaction");
        Ok(tx)
    }

    /// Replace the transaction matching `prefix` with an edited copy.
    ///
    /// The target is deactivated with `comment` as its edit comment and the
    /// returned child carries `parent_id = target.id`.
    pub fn edit(&mut self, prefix: &str, patch: TransactionPatch, comment: &str) -> Result<Transaction> {
        require_comment(comment, "edit")?;

        let mut ledger = self.store().ledger()?;
        let index = resolve_prefix(&ledger, prefix)?;
        let now = self.now();

        let target = &mut ledger[index];
        if !target.active {
            return Err(LedgerError::TransactionAlreadyDeleted {
                id: target.id.clone(),
            });
        }
        let child = patch.apply_to(target, now);
        self.catalog()?.validate(&child)?;

        target.active = false;
        target.edit_comment = Some(comment.to_string());
        target.updated_at = now;
        let parent_id = target.id.clone();

        ledger.push(child.clone());
        self.store_mut().save_ledger(&ledger)?;

        info!(id = %child.id, parent = %parent_id, comment, "edited transaction");
        Ok(child)
    }

    /// Deactivate the transaction matching `prefix`.
    pub fn delete(&mut self, prefix: &str, comment: &str) -> Result<Transaction> {
        require_comment(comment, "delete")?;

        let mut ledger = self.store().ledger()?;
        let index = resolve_prefix(&ledger, prefix)?;
        let tx = &mut ledger[index];
        if !tx.active {
            return Err(LedgerError::TransactionAlreadyDeleted { id: tx.id.clone() });
        }
        tx.active = false;
        tx.edit_comment = Some(comment.to_string());
        tx.updated_at = self.now();
        let deleted = tx.clone();

        self.store_mut().save_ledger(&ledger)?;
        info!(id = %deleted.id, comment, "deleted transaction");
        Ok(deleted)
    }

    /// Remove the transaction matching `prefix` from the ledger for good.
    ///
    /// The comment is only logged.
    pub fn delete_hard(&mut self, prefix: &str, comment: &str) -> Result<Transaction> {
        require_comment(comment, "delete")?;

        let mut ledger = self.store().ledger()?;
        let index = resolve_prefix(&ledger, prefix)?;
        let removed = ledger.remove(index);

        self.store_mut().save_ledger(&ledger)?;
        warn!(id = %removed.id, comment, "permanently removed transaction");
        Ok(removed)
    }

    /// Reverse the last operation applied to the transaction matching `prefix`.
    ///
    /// Returns the record that is active (or, for an undone addition,
    /// deactivated) afterwards.
    ///
    /// # Errors
    ///
    /// - `InvalidOperation` if the last operation cannot be determined
    /// - `ParentNotFound` if an edit's parent is no longer in the ledger
    pub fn undo(&mut self, prefix: &str) -> Result<Transaction> {
        let mut ledger = self.store().ledger()?;
        let index = resolve_prefix(&ledger, prefix)?;
        let operation = classify(&ledger[index], &ledger)?;
        debug!(id = %ledger[index].id, ?operation, "classified last operation");
        let now = self.now();

        let restored = match operation {
            LastOperation::Edit { parent } => {
                let parent_index = ledger
                    .iter()
                    .position(|tx| tx.id == parent)
                    .ok_or(LedgerError::ParentNotFound { id: parent })?;
                let parent = &mut ledger[parent_index];
                parent.active = true;
                parent.edit_comment = None;
                parent.updated_at = now;
                let restored = parent.clone();
                ledger.remove(index);
                restored
            }
            LastOperation::Add => {
                let tx = &mut ledger[index];
                tx.active = false;
                tx.edit_comment = Some(UNDO_ADD_MARKER.to_string());
                tx.updated_at = now;
                tx.clone()
            }
            LastOperation::Delete => {
                let tx = &mut ledger[index];
                tx.active = true;
                tx.edit_comment = None;
                tx.updated_at = now;
                tx.clone()
            }
        };

        self.store_mut().save_ledger(&ledger)?;
        info!(id = %restored.id, active = restored.active, "undid last operation");
        Ok(restored)
    }

    /// Undo an addition or a soft delete by removing the record entirely.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` for edit children and unclassifiable records.
    pub fn undo_hard(&mut self, prefix: &str) -> Result<Transaction> {
        let mut ledger = self.store().ledger()?;
        let index = resolve_prefix(&ledger, prefix)?;
        match classify(&ledger[index], &ledger)? {
            LastOperation::Add | LastOperation::Delete => {}
            LastOperation::Edit { .. } => {
                return Err(LedgerError::InvalidOperation {
                    id: ledger[index].id.clone(),
                })
            }
        }
        let removed = ledger.remove(index);

        self.store_mut().save_ledger(&ledger)?;
        warn!(id = %removed.id, "permanently removed transaction on undo");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReferenceKind;
    use crate::storage::{Account, Category, Collection, MemoryStore, Tag};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn store() -> MemoryStore {
        MemoryStore::new()
            .with_accounts(vec![Account {
                id: "BANQUE".into(),
                name: "Compte Courant Principal".into(),
                kind: "checking".into(),
                currency: "EUR".into(),
                initial_balance: dec!(1500.00),
                active: true,
                created_at: Utc::now(),
            }])
            .with_categories(vec![Category {
                code: "ALM".into(),
                name: "Alimentation".into(),
                parent: None,
                children: Vec::new(),
                description: "Courses et repas".into(),
            }])
            .with_tags(vec![Tag {
                code: "REC".into(),
                name: "Récurrent".into(),
                parent: None,
                children: Vec::new(),
                description: String::new(),
            }])
    }

    fn groceries() -> NewTransaction {
        NewTransaction::new("BANQUE", dec!(-25.50), "Courses")
            .with_categories(vec!["ALM".to_string()])
    }

    #[test]
    fn test_add_appends_active_record() {
        let mut ledger = Ledger::new(store());
        let tx = ledger.add(groceries()).unwrap();

        assert!(tx.active);
        assert_eq!(ledger.transactions().unwrap(), vec![tx]);
        assert_eq!(ledger.balance("BANQUE").unwrap(), dec!(1474.50));
    }

    #[test]
    fn test_add_rejects_unknown_references() {
        let mut ledger = Ledger::new(store());
        let err = ledger
            .add(NewTransaction::new("NOPE", dec!(1), "x"))
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::ReferenceNotFound { kind: ReferenceKind::Account, .. }
        ));

        let err = ledger
            .add(groceries().with_tags(vec!["ZZZ".to_string()]))
            .unwrap_err();
        assert_eq!(err.to_string(), "tag not found: ZZZ");
        assert!(ledger.transactions().unwrap().is_empty());
    }

    #[test]
    fn test_add_rejects_clashing_explicit_id() {
        let mut ledger = Ledger::new(store());
        ledger.add(groceries().with_id("dup-1")).unwrap();

        for id in ["dup-1", "dup", "dup-10"] {
            let err = ledger.add(groceries().with_id(id)).unwrap_err();
            assert!(matches!(err, LedgerError::DuplicateId { .. }), "{}", id);
        }
        assert_eq!(ledger.transactions().unwrap().len(), 1);
        assert!(ledger.delete("dup-1", "doublon").is_ok());
    }

    #[test]
    fn test_edit_then_undo_scenario() {
        let mut ledger = Ledger::new(store());
        let original = ledger.add(groceries()).unwrap();
        assert_eq!(ledger.balance("BANQUE").unwrap(), dec!(1474.50));

        let child = ledger
            .edit(&original.id, TransactionPatch::new().amount(dec!(-30.00)), "fix")
            .unwrap();
        assert_eq!(child.parent_id.as_deref(), Some(original.id.as_str()));
        assert_eq!(child.description, "Courses");
        assert_eq!(ledger.balance("BANQUE").unwrap(), dec!(1470.00));

        let parent = ledger.transaction(&original.id).unwrap();
        assert!(!parent.active);
        assert_eq!(parent.comment(), Some("fix"));

        let restored = ledger.undo(&child.id).unwrap();
        assert_eq!(restored.id, original.id);
        assert_eq!(ledger.balance("BANQUE").unwrap(), dec!(1474.50));

        let all = ledger.transactions().unwrap();
        assert_eq!(all.len(), 1);
        let back = &all[0];
        assert_eq!(
            Transaction {
                updated_at: original.updated_at,
                ..back.clone()
            },
            original
        );
    }

    #[test]
    fn test_edit_requires_comment_and_active_target() {
        let mut ledger = Ledger::new(store());
        let tx = ledger.add(groceries()).unwrap();

        let err = ledger
            .edit(&tx.id, TransactionPatch::new().amount(dec!(1)), "  ")
            .unwrap_err();
        assert_eq!(err.to_string(), "Message is mandatory for edit operations");

        ledger.delete(&tx.id, "gone").unwrap();
        let err = ledger
            .edit(&tx.id, TransactionPatch::new().amount(dec!(1)), "fix")
            .unwrap_err();
        assert!(matches!(err, LedgerError::TransactionAlreadyDeleted { .. }));
    }

    #[test]
    fn test_edit_validates_new_record() {
        let mut ledger = Ledger::new(store());
        let tx = ledger.add(groceries()).unwrap();

        let err = ledger
            .edit(&tx.id, TransactionPatch::new().account("LIVRET"), "move")
            .unwrap_err();
        assert!(matches!(err, LedgerError::ReferenceNotFound { .. }));
        assert!(ledger.transaction(&tx.id).unwrap().active);
        assert_eq!(ledger.transactions().unwrap().len(), 1);
    }

    #[test]
    fn test_delete_round_trip() {
        let mut ledger = Ledger::new(store());
        let tx = ledger.add(groceries()).unwrap();

        let deleted = ledger.delete(&tx.id[..8], "doublon").unwrap();
        assert!(!deleted.active);
        assert_eq!(deleted.comment(), Some("doublon"));
        assert_eq!(ledger.balance("BANQUE").unwrap(), dec!(1500.00));

        let err = ledger.delete(&tx.id, "again").unwrap_err();
        assert!(matches!(err, LedgerError::TransactionAlreadyDeleted { .. }));

        let restored = ledger.undo(&tx.id).unwrap();
        assert!(restored.active);
        assert!(restored.edit_comment.is_none());
        assert_eq!(ledger.transactions().unwrap().len(), 1);
    }

    #[test]
    fn test_delete_requires_comment() {
        let mut ledger = Ledger::new(store());
        let tx = ledger.add(groceries()).unwrap();
        assert!(matches!(
            ledger.delete(&tx.id, ""),
            Err(LedgerError::MissingMessage { .. })
        ));
        assert!(matches!(
            ledger.delete_hard(&tx.id, ""),
            Err(LedgerError::MissingMessage { .. })
        ));
    }

    #[test]
    fn test_undo_add_sets_marker() {
        let mut ledger = Ledger::new(store());
        let tx = ledger.add(groceries()).unwrap();

        let undone = ledger.undo(&tx.id).unwrap();
        assert!(!undone.active);
        assert_eq!(undone.comment(), Some(UNDO_ADD_MARKER));
        assert_eq!(ledger.balance("BANQUE").unwrap(), dec!(1500.00));
    }

    #[test]
    fn test_undo_edited_parent_is_invalid() {
        let mut ledger = Ledger::new(store());
        let tx = ledger.add(groceries()).unwrap();
        ledger
            .edit(&tx.id, TransactionPatch::new().description("Marché"), "rename")
            .unwrap();

        let err = ledger.undo(&tx.id).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidOperation { id } if id == tx.id));
    }

    #[test]
    fn test_undo_unclassifiable_records() {
        let mut silent = groceries().into_transaction(Utc::now());
        silent.active = false;
        let mut commented = groceries().into_transaction(Utc::now());
        commented.edit_comment = Some("odd".into());
        let mut ledger = Ledger::new(store().with_ledger(vec![silent.clone(), commented.clone()]));

        assert!(matches!(
            ledger.undo(&silent.id),
            Err(LedgerError::InvalidOperation { .. })
        ));
        assert!(matches!(
            ledger.undo(&commented.id),
            Err(LedgerError::InvalidOperation { .. })
        ));
    }

    #[test]
    fn test_undo_edit_with_missing_parent() {
        let mut orphan = groceries().into_transaction(Utc::now());
        orphan.parent_id = Some("vanished".into());
        let mut ledger = Ledger::new(store().with_ledger(vec![orphan.clone()]));

        let err = ledger.undo(&orphan.id).unwrap_err();
        assert!(matches!(err, LedgerError::ParentNotFound { id } if id == "vanished"));
    }

    #[test]
    fn test_delete_hard_removes_record() {
        let mut ledger = Ledger::new(store());
        let keep = ledger.add(groceries()).unwrap();
        let drop = ledger.add(groceries()).unwrap();

        let removed = ledger.delete_hard(&drop.id, "mistake").unwrap();
        assert_eq!(removed.id, drop.id);
        assert_eq!(ledger.transactions().unwrap(), vec![keep]);
        assert!(matches!(
            ledger.delete_hard(&drop.id, "mistake"),
            Err(LedgerError::TransactionNotFound { .. })
        ));
    }

    #[test]
    fn test_undo_hard_handles_add_and_delete_only() {
        let mut ledger = Ledger::new(store());
        let added = ledger.add(groceries()).unwrap();
        let deleted = ledger.add(groceries()).unwrap();
        ledger.delete(&deleted.id, "oops").unwrap();
        let edited = ledger.add(groceries()).unwrap();
        let child = ledger
            .edit(&edited.id, TransactionPatch::new().amount(dec!(-1)), "fix")
            .unwrap();

        ledger.undo_hard(&added.id).unwrap();
        ledger.undo_hard(&deleted.id).unwrap();
        assert!(matches!(
            ledger.undo_hard(&child.id),
            Err(LedgerError::InvalidOperation { .. })
        ));

        let ids: Vec<_> = ledger
            .transactions()
            .unwrap()
            .into_iter()
            .map(|tx| tx.id)
            .collect();
        assert_eq!(ids, vec![edited.id, child.id]);
    }

    #[test]
    fn test_ambiguous_prefix_is_reported() {
        let a = groceries().with_id("abc-1").into_transaction(Utc::now());
        let b = groceries().with_id("abc-2").into_transaction(Utc::now());
        let mut ledger = Ledger::new(store().with_ledger(vec![a, b]));

        let err = ledger.delete("abc", "x").unwrap_err();
        assert!(matches!(err, LedgerError::AmbiguousId { prefix } if prefix == "abc"));
        assert!(ledger.delete("abc-2", "x").is_ok());
    }

    #[test]
    fn test_storage_failure_propagates() {
        let mut ledger = Ledger::new(store().failing_on(Collection::Ledger));
        let err = ledger.add(groceries()).unwrap_err();
        assert!(matches!(err, LedgerError::Storage { .. }));
    }
}
