//! JSON output for listings.

use comptes_core::storage::{Account, Transaction, TransactionBatch};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use super::{BatchState, Labels};
use crate::ui::format_date;

/// Transactions as JSON. `is_active` is only included with `history`.
///
/// Amounts stay decimal strings so no precision is lost.
pub fn transactions_json(transactions: &[Transaction], labels: &Labels, history: bool) -> Value {
    Value::Array(
        transactions
            .iter()
            .map(|tx| {
                let mut value = json!({
                    "id": tx.id,
                    "date": format_date(&tx.date),
                    "account": tx.account,
                    "amount": tx.amount,
                    "description": tx.description,
                    "categories": labels.categories(&tx.categories),
                    "tags": labels.tags(&tx.tags),
                });
                if history {
                    value["is_active"] = json!(tx.active);
                }
                if let Some(comment) = tx.comment() {
                    value["edit_comment"] = json!(comment);
                }
                if let Some(parent) = tx.parent() {
                    value["parent_id"] = json!(parent);
                }
                value
            })
            .collect(),
    )
}

pub fn accounts_json(accounts: &[(Account, Decimal)]) -> Value {
    Value::Array(
        accounts
            .iter()
            .map(|(account, balance)| {
                json!({
                    "id": account.id,
                    "name": account.name,
                    "type": account.kind,
                    "currency": account.currency,
                    "initial_balance": account.initial_balance,
                    "current_balance": balance,
                    "is_active": account.active,
                    "created_at": account.created_at,
                })
            })
            .collect(),
    )
}

pub fn batches_json(batches: &[(BatchState, TransactionBatch)]) -> Value {
    Value::Array(
        batches
            .iter()
            .map(|(state, batch)| {
                json!({
                    "id": batch.id,
                    "state": state.as_str(),
                    "description": batch.description,
                    "created_at": batch.created_at,
                    "committed_at": batch.committed_at,
                    "rolled_back_at": batch.rolled_back_at,
                    "transactions": batch.transactions,
                })
            })
            .collect(),
    )
}
