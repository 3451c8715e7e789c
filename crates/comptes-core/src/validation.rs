//! Reference checks against the account, category and tag catalogs.

use std::collections::HashSet;

use crate::error::{LedgerError, ReferenceKind, Result};
use crate::storage::{LedgerStore, Transaction};

/// Snapshot of the known reference codes.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    accounts: HashSet<String>,
    categories: HashSet<String>,
    tags: HashSet<String>,
}

impl Catalog {
    /// Read the three catalogs from the store.
    pub fn load<S: LedgerStore + ?Sized>(store: &S) -> Result<Self> {
        Ok(Self {
            accounts: store.accounts()?.into_iter().map(|a| a.id).collect(),
            categories: store.categories()?.into_iter().map(|c| c.code).collect(),
            tags: store.tags()?.into_iter().map(|t| t.code).collect(),
        })
    }

    pub fn check_account(&self, id: &str) -> Result<()> {
        check(&self.accounts, ReferenceKind::Account, id)
    }

    pub fn check_categories<I, T>(&self, codes: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        codes
            .into_iter()
            .try_for_each(|code| check(&self.categories, ReferenceKind::Category, code.as_ref()))
    }

    pub fn check_tags<I, T>(&self, codes: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        codes
            .into_iter()
            .try_for_each(|code| check(&self.tags, ReferenceKind::Tag, code.as_ref()))
    }

    /// Check the account, then each category, then each tag. The first
    /// unknown reference is reported.
    pub fn validate(&self, tx: &Transaction) -> Result<()> {
        self.check_account(&tx.account)?;
        self.check_categories(&tx.categories)?;
        self.check_tags(&tx.tags)
    }
}

fn check(known: &HashSet<String>, kind: ReferenceKind, value: &str) -> Result<()> {
    if known.contains(value) {
        Ok(())
    } else {
        Err(LedgerError::reference(kind, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Account, Category, MemoryStore, NewTransaction, Tag};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn catalog() -> Catalog {
        let store = MemoryStore::new()
            .with_accounts(vec![Account {
                id: "BANQUE".into(),
                name: "Compte Courant Principal".into(),
                kind: "checking".into(),
                currency: "EUR".into(),
                initial_balance: dec!(1500),
                active: false,
                created_at: Utc::now(),
            }])
            .with_categories(vec![Category {
                code: "ALM".into(),
                name: "Alimentation".into(),
                parent: None,
                children: Vec::new(),
                description: String::new(),
            }])
            .with_tags(vec![Tag {
                code: "URG".into(),
                name: "Urgent".into(),
                parent: None,
                children: Vec::new(),
                description: String::new(),
            }]);
        Catalog::load(&store).unwrap()
    }

    fn tx(account: &str, categories: &[&str], tags: &[&str]) -> Transaction {
        NewTransaction::new(account, dec!(-1), "t")
            .with_categories(categories.iter().map(|c| c.to_string()).collect())
            .with_tags(tags.iter().map(|t| t.to_string()).collect())
            .into_transaction(Utc::now())
    }

    #[test]
    fn test_valid_references_pass() {
        // Inactive accounts still count as known.
        assert!(catalog().validate(&tx("BANQUE", &["ALM"], &["URG"])).is_ok());
        assert!(catalog().validate(&tx("BANQUE", &[], &[])).is_ok());
    }

    #[test]
    fn test_first_failure_is_reported() {
        let err = catalog()
            .validate(&tx("NOPE", &["XXX"], &["YYY"]))
            .unwrap_err();
        assert_eq!(err.to_string(), "account not found: NOPE");

        let err = catalog()
            .validate(&tx("BANQUE", &["ALM", "XXX"], &["YYY"]))
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::ReferenceNotFound { kind: ReferenceKind::Category, value } if value == "XXX"
        ));

        let err = catalog()
            .validate(&tx("BANQUE", &["ALM"], &["YYY"]))
            .unwrap_err();
        assert_eq!(err.to_string(), "tag not found: YYY");
    }
}
