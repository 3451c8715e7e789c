//! Text and table output for listings.

use comptes_core::storage::{Account, Transaction, TransactionBatch};
use rust_decimal::Decimal;

use super::{BatchState, Labels};
use crate::ui::theme::status_marker;
use crate::ui::{format_amount, format_date, format_datetime, format_list, short_id, truncate};

/// One line per transaction, for plain output.
///
/// `- [id] 2024-01-15: -25.50 EUR - Courses (Categories: [Alimentation]), Tags: [Urgent] | Edit: why`
pub fn transaction_lines(
    transactions: &[Transaction],
    labels: &Labels,
    history: bool,
    unicode: bool,
) -> Vec<String> {
    transactions
        .iter()
        .map(|tx| {
            let status = if history {
                format!(" {}", status_marker(tx.active, unicode))
            } else {
                String::new()
            };
            let mut line = format!(
                "- [{}]{} {}: {} - {} (Categories: [{}])",
                tx.id,
                status,
                format_date(&tx.date),
                format_amount(tx.amount, labels.currency(&tx.account)),
                tx.description,
                labels.categories(&tx.categories).join(", ")
            );
            if !tx.tags.is_empty() {
                line.push_str(&format!(", Tags: [{}]", labels.tags(&tx.tags).join(", ")));
            }
            if let Some(comment) = tx.comment() {
                line.push_str(&format!(" | Edit: {}", comment));
            }
            line
        })
        .collect()
}

/// Table rows: ID, Date, Amount, Description, Categories, Tags, then
/// Status and Comment when `history` is set.
pub fn transaction_rows(
    transactions: &[Transaction],
    labels: &Labels,
    history: bool,
    unicode: bool,
) -> Vec<Vec<String>> {
    transactions
        .iter()
        .map(|tx| {
            let mut row = vec![
                short_id(&tx.id).to_string(),
                format_date(&tx.date),
                format_amount(tx.amount, labels.currency(&tx.account)),
                truncate(&tx.description, 40),
                format_list(&labels.categories(&tx.categories)),
                format_list(&labels.tags(&tx.tags)),
            ];
            if history {
                row.push(status_marker(tx.active, unicode).to_string());
                row.push(tx.comment().unwrap_or("").to_string());
            }
            row
        })
        .collect()
}

/// `✅ Compte Courant Principal (BANQUE) - 1474.50 EUR (initial: 1500.00 EUR)`
pub fn account_lines(accounts: &[(Account, Decimal)], unicode: bool) -> Vec<String> {
    accounts
        .iter()
        .map(|(account, balance)| {
            let mut line = format!(
                "{} {} ({}) - {}",
                status_marker(account.active, unicode),
                account.name,
                account.id,
                format_amount(*balance, &account.currency)
            );
            if account.initial_balance != *balance {
                line.push_str(&format!(
                    " (initial: {})",
                    format_amount(account.initial_balance, &account.currency)
                ));
            }
            line
        })
        .collect()
}

/// Table rows: ID, Name, Type, Initial, Balance, Active.
pub fn account_rows(accounts: &[(Account, Decimal)]) -> Vec<Vec<String>> {
    accounts
        .iter()
        .map(|(account, balance)| {
            vec![
                account.id.clone(),
                account.name.clone(),
                account.kind.clone(),
                format_amount(account.initial_balance, &account.currency),
                format_amount(*balance, &account.currency),
                if account.active { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect()
}

/// `• Alimentation (ALM) - Courses et repas`
pub fn code_lines<'a, I>(entries: I, unicode: bool) -> Vec<String>
where
    I: IntoIterator<Item = (&'a str, &'a str, &'a str)>,
{
    let bullet = if unicode { "\u{2022}" } else { "*" };
    entries
        .into_iter()
        .map(|(code, name, description)| format!("{} {} ({}) - {}", bullet, name, code, description))
        .collect()
}

/// Table rows: ID, State, Description, Count, Created, Closed.
pub fn batch_rows(batches: &[(BatchState, TransactionBatch)], pretty: bool) -> Vec<Vec<String>> {
    batches
        .iter()
        .map(|(state, batch)| {
            let closed = batch.committed_at.or(batch.rolled_back_at);
            vec![
                if pretty {
                    short_id(&batch.id).to_string()
                } else {
                    batch.id.clone()
                },
                state.as_str().to_string(),
                batch.description.clone().unwrap_or_default(),
                batch.transactions.len().to_string(),
                format_datetime(&batch.created_at, pretty),
                closed
                    .map(|at| format_datetime(&at, pretty))
                    .unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect()
}
