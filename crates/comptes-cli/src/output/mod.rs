//! Output formatting for listings.
//!
//! Every listing comes in three shapes: text (plain lines or a table on a
//! TTY), JSON, and CSV. [`Labels`] turns stored codes into display names.

mod csv;
mod json;
mod text;

use std::collections::HashMap;

use comptes_core::{LedgerStore, Result};

use crate::constants::DEFAULT_CURRENCY;

pub use self::csv::{write_accounts_csv, write_batches_csv, write_codes_csv, write_transactions_csv};
pub use json::{accounts_json, batches_json, transactions_json};
pub use text::{account_lines, account_rows, batch_rows, code_lines, transaction_lines, transaction_rows};

/// Which batch collection a batch came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Pending,
    Committed,
    RolledBack,
}

impl BatchState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchState::Pending => "pending",
            BatchState::Committed => "committed",
            BatchState::RolledBack => "rolled_back",
        }
    }
}

/// Display names for category and tag codes, and currencies per account.
#[derive(Debug, Default)]
pub struct Labels {
    categories: HashMap<String, String>,
    tags: HashMap<String, String>,
    currencies: HashMap<String, String>,
    show_codes: bool,
}

impl Labels {
    pub fn load(store: &dyn LedgerStore, show_codes: bool) -> Result<Self> {
        Ok(Self {
            categories: store
                .categories()?
                .into_iter()
                .map(|c| (c.code, c.name))
                .collect(),
            tags: store.tags()?.into_iter().map(|t| (t.code, t.name)).collect(),
            currencies: store
                .accounts()?
                .into_iter()
                .map(|a| (a.id, a.currency))
                .collect(),
            show_codes,
        })
    }

    /// Category names, falling back to the code for unknown entries.
    pub fn categories(&self, codes: &[String]) -> Vec<String> {
        self.names(&self.categories, codes)
    }

    pub fn tags(&self, codes: &[String]) -> Vec<String> {
        self.names(&self.tags, codes)
    }

    pub fn currency(&self, account: &str) -> &str {
        self.currencies
            .get(account)
            .map(String::as_str)
            .unwrap_or(DEFAULT_CURRENCY)
    }

    fn names(&self, map: &HashMap<String, String>, codes: &[String]) -> Vec<String> {
        if self.show_codes {
            return codes.to_vec();
        }
        codes
            .iter()
            .map(|code| map.get(code).cloned().unwrap_or_else(|| code.clone()))
            .collect()
    }
}
