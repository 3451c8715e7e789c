//! Core data types persisted by every storage backend.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generate a fresh identifier (UUID v4 rendered as text).
///
/// No collision check is performed.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// A bank account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Stable identifier (e.g. "BANQUE")
    pub id: String,

    /// Display name
    pub name: String,

    /// Free-form type tag (checking, savings, ...)
    #[serde(rename = "type")]
    pub kind: String,

    /// Currency code (e.g. "EUR")
    pub currency: String,

    /// Balance before any ledger transaction
    pub initial_balance: Decimal,

    #[serde(rename = "is_active")]
    pub active: bool,

    pub created_at: DateTime<Utc>,
}

/// A transaction category.
///
/// `parent` and `children` are carried as-is; nothing walks the hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default)]
    pub children: Vec<String>,
    #[serde(default)]
    pub description: String,
}

/// A transaction tag. Same shape as [`Category`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default)]
    pub children: Vec<String>,
    #[serde(default)]
    pub description: String,
}

/// A ledger record.
///
/// Records are never rewritten into something else: an edit deactivates the
/// record and appends a child pointing back at it through `parent_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,

    /// Account id this transaction belongs to
    pub account: String,

    pub date: DateTime<Utc>,

    /// Signed amount (negative for spending)
    pub amount: Decimal,

    pub description: String,

    #[serde(default)]
    pub categories: Vec<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(rename = "is_active")]
    pub active: bool,

    /// Why the record was deactivated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_comment: Option<String>,

    /// Record this one replaced (set only by edits)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// The edit comment, treating an empty string as absent.
    pub fn comment(&self) -> Option<&str> {
        self.edit_comment.as_deref().filter(|c| !c.is_empty())
    }

    /// The parent id, treating an empty string as absent.
    pub fn parent(&self) -> Option<&str> {
        self.parent_id.as_deref().filter(|p| !p.is_empty())
    }
}

/// A group of staged transactions that is committed or discarded as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionBatch {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub created_at: DateTime<Utc>,

    /// Staged transactions, in insertion order
    #[serde(default)]
    pub transactions: Vec<Transaction>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committed_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rolled_back_at: Option<DateTime<Utc>>,
}

/// Builder for creating new transactions.
///
/// Anything left unset (id, date, timestamps) is filled in when the
/// transaction is accepted by the ledger or staged in a batch.
#[derive(Debug, Clone, Default)]
pub struct NewTransaction {
    pub id: Option<String>,
    pub account: String,
    pub date: Option<DateTime<Utc>>,
    pub amount: Decimal,
    pub description: String,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl NewTransaction {
    pub fn new(account: impl Into<String>, amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            amount,
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Materialize the record, filling missing fields from `now`.
    pub fn into_transaction(self, now: DateTime<Utc>) -> Transaction {
        Transaction {
            id: self.id.filter(|id| !id.is_empty()).unwrap_or_else(new_id),
            account: self.account,
            date: self.date.unwrap_or(now),
            amount: self.amount,
            description: self.description,
            categories: self.categories,
            tags: self.tags,
            active: true,
            edit_comment: None,
            parent_id: None,
            created_at: self.created_at.unwrap_or(now),
            updated_at: self.updated_at.unwrap_or(now),
        }
    }
}

/// Field changes applied by an edit. `None` keeps the original value.
#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub account: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub categories: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

impl TransactionPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn categories(mut self, categories: Vec<String>) -> Self {
        self.categories = Some(categories);
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.account.is_none()
            && self.date.is_none()
            && self.amount.is_none()
            && self.description.is_none()
            && self.categories.is_none()
            && self.tags.is_none()
    }

    /// Build the child record that replaces `parent`.
    pub(crate) fn apply_to(self, parent: &Transaction, now: DateTime<Utc>) -> Transaction {
        Transaction {
            id: new_id(),
            account: self.account.unwrap_or_else(|| parent.account.clone()),
            date: self.date.unwrap_or(parent.date),
            amount: self.amount.unwrap_or(parent.amount),
            description: self
                .description
                .unwrap_or_else(|| parent.description.clone()),
            categories: self
                .categories
                .unwrap_or_else(|| parent.categories.clone()),
            tags: self.tags.unwrap_or_else(|| parent.tags.clone()),
            active: true,
            edit_comment: None,
            parent_id: Some(parent.id.clone()),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_transaction_builder() {
        let now = Utc::now();
        let tx = NewTransaction::new("BANQUE", dec!(-12.30), "Boulangerie")
            .with_categories(vec!["ALM".to_string()])
            .with_tags(vec!["REC".to_string()])
            .into_transaction(now);

        assert_eq!(tx.account, "BANQUE");
        assert_eq!(tx.amount, dec!(-12.30));
        assert_eq!(tx.categories, vec!["ALM"]);
        assert_eq!(tx.tags, vec!["REC"]);
        assert!(tx.active);
        assert_eq!(tx.date, now);
        assert_eq!(tx.created_at, now);
        assert!(Uuid::parse_str(&tx.id).is_ok());
    }

    #[test]
    fn test_new_transaction_keeps_explicit_id() {
        let tx = NewTransaction::new("BANQUE", dec!(1), "x")
            .with_id("abc123")
            .into_transaction(Utc::now());
        assert_eq!(tx.id, "abc123");
    }

    #[test]
    fn test_patch_inherits_unset_fields() {
        let now = Utc::now();
        let parent = NewTransaction::new("BANQUE", dec!(-25.50), "Courses")
            .with_categories(vec!["ALM".to_string()])
            .into_transaction(now);

        let child = TransactionPatch::new()
            .amount(dec!(-30.00))
            .apply_to(&parent, now);

        assert_ne!(child.id, parent.id);
        assert_eq!(child.parent_id.as_deref(), Some(parent.id.as_str()));
        assert_eq!(child.amount, dec!(-30.00));
        assert_eq!(child.description, "Courses");
        assert_eq!(child.categories, vec!["ALM"]);
        assert!(child.active);
    }

    #[test]
    fn test_empty_comment_is_absent() {
        let mut tx = NewTransaction::new("BANQUE", dec!(1), "x").into_transaction(Utc::now());
        tx.edit_comment = Some(String::new());
        assert!(tx.comment().is_none());
        tx.parent_id = Some(String::new());
        assert!(tx.parent().is_none());
    }

    #[test]
    fn test_transaction_json_field_names() {
        let tx = NewTransaction::new("BANQUE", dec!(-25.50), "Courses").into_transaction(Utc::now());
        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["is_active"], serde_json::json!(true));
        assert_eq!(value["account"], serde_json::json!("BANQUE"));
        assert!(value.get("edit_comment").is_none());
        assert!(value.get("parent_id").is_none());
    }

    #[test]
    fn test_account_reads_numeric_initial_balance() {
        let json = r#"{
            "id": "BANQUE",
            "name": "Compte Courant Principal",
            "type": "checking",
            "currency": "EUR",
            "initial_balance": 1500.0,
            "is_active": true,
            "created_at": "2024-01-01T00:00:00Z"
        }"#;
        let account: Account = serde_json::from_str(json).unwrap();
        assert_eq!(account.initial_balance, dec!(1500));
        assert_eq!(account.kind, "checking");
    }
}
