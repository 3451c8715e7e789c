//! CSV output for listings.
//!
//! List fields (categories, tags) are joined with `;` inside one cell.

use std::io::Write;

use ::csv::Writer;
use comptes_core::storage::{Account, Transaction, TransactionBatch};
use rust_decimal::Decimal;

use super::{BatchState, Labels};
use crate::ui::format_date;

fn amount(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

pub fn write_transactions_csv<W: Write>(
    out: W,
    transactions: &[Transaction],
    labels: &Labels,
    history: bool,
) -> anyhow::Result<()> {
    let mut writer = Writer::from_writer(out);
    let mut header = vec!["id", "date", "amount", "description", "categories", "tags"];
    if history {
        header.extend(["is_active", "edit_comment"]);
    }
    writer.write_record(&header)?;

    for tx in transactions {
        let mut record = vec![
            tx.id.clone(),
            format_date(&tx.date),
            amount(tx.amount),
            tx.description.clone(),
            labels.categories(&tx.categories).join(";"),
            labels.tags(&tx.tags).join(";"),
        ];
        if history {
            record.push(tx.active.to_string());
            record.push(tx.comment().unwrap_or("").to_string());
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_accounts_csv<W: Write>(out: W, accounts: &[(Account, Decimal)]) -> anyhow::Result<()> {
    let mut writer = Writer::from_writer(out);
    writer.write_record([
        "id",
        "name",
        "type",
        "currency",
        "initial_balance",
        "current_balance",
        "is_active",
    ])?;
    for (account, balance) in accounts {
        writer.write_record([
            account.id.as_str(),
            account.name.as_str(),
            account.kind.as_str(),
            account.currency.as_str(),
            amount(account.initial_balance).as_str(),
            amount(*balance).as_str(),
            if account.active { "true" } else { "false" },
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Categories or tags as `code,name,description`.
pub fn write_codes_csv<'a, W, I>(out: W, entries: I) -> anyhow::Result<()>
where
    W: Write,
    I: IntoIterator<Item = (&'a str, &'a str, &'a str)>,
{
    let mut writer = Writer::from_writer(out);
    writer.write_record(["code", "name", "description"])?;
    for (code, name, description) in entries {
        writer.write_record([code, name, description])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_batches_csv<W: Write>(
    out: W,
    batches: &[(BatchState, TransactionBatch)],
) -> anyhow::Result<()> {
    let mut writer = Writer::from_writer(out);
    writer.write_record([
        "id",
        "state",
        "description",
        "transactions",
        "created_at",
        "closed_at",
    ])?;
    for (state, batch) in batches {
        let closed = batch
            .committed_at
            .or(batch.rolled_back_at)
            .map(|at| at.to_rfc3339())
            .unwrap_or_default();
        writer.write_record([
            batch.id.as_str(),
            state.as_str(),
            batch.description.as_deref().unwrap_or(""),
            batch.transactions.len().to_string().as_str(),
            batch.created_at.to_rfc3339().as_str(),
            closed.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
