//! Account balances derived from the ledger.

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::Result;
use crate::ledger::Ledger;
use crate::storage::{Account, LedgerStore, Transaction};

/// Initial balance plus the amounts of the account's active transactions.
pub fn balance_of(account: &Account, ledger: &[Transaction]) -> Decimal {
    ledger
        .iter()
        .filter(|tx| tx.active && tx.account == account.id)
        .fold(account.initial_balance, |total, tx| total + tx.amount)
}

impl<S: LedgerStore> Ledger<S> {
    /// Current balance of `account_id`, scanned fresh from the store.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::ReferenceNotFound` if the account is unknown.
    pub fn balance(&self, account_id: &str) -> Result<Decimal> {
        let balance = self.store().account_balance(account_id)?;
        debug!(account = account_id, %balance, "computed balance");
        Ok(balance)
    }

    /// Balances of every active account, in catalog order.
    pub fn balances(&self) -> Result<Vec<(Account, Decimal)>> {
        let ledger = self.store().ledger()?;
        Ok(self
            .store()
            .accounts()?
            .into_iter()
            .filter(|account| account.active)
            .map(|account| {
                let balance = balance_of(&account, &ledger);
                (account, balance)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LedgerError, ReferenceKind};
    use crate::storage::{MemoryStore, NewTransaction};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn account(id: &str, initial: Decimal, active: bool) -> Account {
        Account {
            id: id.to_string(),
            name: id.to_string(),
            kind: "checking".to_string(),
            currency: "EUR".to_string(),
            initial_balance: initial,
            active,
            created_at: Utc::now(),
        }
    }

    fn tx(account: &str, amount: Decimal, active: bool) -> Transaction {
        let mut tx = NewTransaction::new(account, amount, "t").into_transaction(Utc::now());
        tx.active = active;
        tx
    }

    #[test]
    fn test_inactive_and_foreign_transactions_are_ignored() {
        let banque = account("BANQUE", dec!(1500.00), true);
        let ledger = vec![
            tx("BANQUE", dec!(-25.50), true),
            tx("BANQUE", dec!(-1000), false),
            tx("LIVRET", dec!(200), true),
            tx("BANQUE", dec!(10.25), true),
        ];
        assert_eq!(balance_of(&banque, &ledger), dec!(1484.75));
    }

    #[test]
    fn test_balances_skip_inactive_accounts() {
        let store = MemoryStore::new()
            .with_accounts(vec![
                account("BANQUE", dec!(100), true),
                account("OLD", dec!(5), false),
                account("LIVRET", dec!(0), true),
            ])
            .with_ledger(vec![tx("LIVRET", dec!(42), true)]);
        let ledger = Ledger::new(store);

        let balances = ledger.balances().unwrap();
        let summary: Vec<_> = balances
            .iter()
            .map(|(account, balance)| (account.id.as_str(), *balance))
            .collect();
        assert_eq!(summary, vec![("BANQUE", dec!(100)), ("LIVRET", dec!(42))]);
    }

    #[test]
    fn test_unknown_account_balance() {
        let ledger = Ledger::new(MemoryStore::new());
        let err = ledger.balance("NOPE").unwrap_err();
        assert!(matches!(
            err,
            LedgerError::ReferenceNotFound { kind: ReferenceKind::Account, value } if value == "NOPE"
        ));
    }
}
