//! `list`: transactions by default, or one of the catalogs or batch sets.

use std::io;

use comptes_core::balance::balance_of;
use comptes_core::storage::{Category, Tag, Transaction, TransactionBatch};
use comptes_core::LedgerStore;

use crate::app::{AppContext, DynLedger};
use crate::cli::{ListArgs, ListFormat};
use crate::output::{
    account_lines, account_rows, accounts_json, batch_rows, batches_json, code_lines,
    transaction_lines, transaction_rows, transactions_json, write_accounts_csv, write_batches_csv,
    write_codes_csv, write_transactions_csv, BatchState, Labels,
};
use crate::ui::{blank_line, header, print, table, Column, UiContext};

pub fn handle_list(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let format = if ctx.ui().mode.is_json() {
        ListFormat::Json
    } else {
        args.format
    };
    let ui = ctx.ui_with_json(format == ListFormat::Json);
    let ledger = ctx.open_ledger()?;

    if args.accounts {
        list_accounts(&ui, &ledger, format)
    } else if args.categories {
        let categories = ledger.store().categories()?;
        list_codes(&ui, "categories", "No categories found.", &category_entries(&categories), format)
    } else if args.tags {
        let tags = ledger.store().tags()?;
        list_codes(&ui, "tags", "No tags found.", &tag_entries(&tags), format)
    } else if args.batches {
        list_batches(&ui, &ledger, format)
    } else {
        list_transactions(&ui, &ledger, args, format)
    }
}

fn list_transactions(
    ui: &UiContext,
    ledger: &DynLedger,
    args: &ListArgs,
    format: ListFormat,
) -> anyhow::Result<()> {
    let transactions: Vec<Transaction> = ledger
        .transactions()?
        .into_iter()
        .filter(|tx| args.history || tx.active)
        .collect();
    let labels = Labels::load(&**ledger.store(), args.codes)?;

    match format {
        ListFormat::Json => {
            let value = transactions_json(&transactions, &labels, args.history);
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        ListFormat::Csv => {
            write_transactions_csv(io::stdout().lock(), &transactions, &labels, args.history)?
        }
        ListFormat::Text => {
            if transactions.is_empty() {
                print(ui, "No transactions found.");
                return Ok(());
            }
            if ui.mode.is_pretty() {
                let context = if args.history { Some("history") } else { None };
                print(ui, &header(ui, "list", context));
                blank_line(ui);
                let mut columns = vec![
                    Column::new("ID"),
                    Column::new("Date"),
                    Column::numeric("Amount"),
                    Column::new("Description"),
                    Column::new("Categories"),
                    Column::new("Tags"),
                ];
                if args.history {
                    columns.push(Column::new("Status"));
                    columns.push(Column::new("Comment"));
                }
                let rows = transaction_rows(&transactions, &labels, args.history, ui.unicode);
                print(ui, &table(ui, &columns, &rows));
            } else {
                let title = if args.history {
                    "Transaction History:"
                } else {
                    "Active Transactions:"
                };
                print(ui, title);
                for line in transaction_lines(&transactions, &labels, args.history, ui.unicode) {
                    print(ui, &line);
                }
            }
        }
    }
    Ok(())
}

/// Every account, active or not, with its balance over the whole ledger.
fn list_accounts(ui: &UiContext, ledger: &DynLedger, format: ListFormat) -> anyhow::Result<()> {
    let all = ledger.store().ledger()?;
    let accounts: Vec<_> = ledger
        .store()
        .accounts()?
        .into_iter()
        .map(|account| {
            let balance = balance_of(&account, &all);
            (account, balance)
        })
        .collect();

    match format {
        ListFormat::Json => println!("{}", serde_json::to_string_pretty(&accounts_json(&accounts))?),
        ListFormat::Csv => write_accounts_csv(io::stdout().lock(), &accounts)?,
        ListFormat::Text => {
            if accounts.is_empty() {
                print(ui, "No accounts found.");
            } else if ui.mode.is_pretty() {
                print(ui, &header(ui, "list", Some("accounts")));
                blank_line(ui);
                let columns = [
                    Column::new("ID"),
                    Column::new("Name"),
                    Column::new("Type"),
                    Column::numeric("Initial"),
                    Column::numeric("Balance"),
                    Column::new("Active"),
                ];
                print(ui, &table(ui, &columns, &account_rows(&accounts)));
            } else {
                print(ui, "Accounts:");
                for line in account_lines(&accounts, ui.unicode) {
                    print(ui, &line);
                }
            }
        }
    }
    Ok(())
}

type CodeEntry<'a> = (&'a str, &'a str, &'a str);

fn category_entries(categories: &[Category]) -> Vec<CodeEntry<'_>> {
    categories
        .iter()
        .map(|c| (c.code.as_str(), c.name.as_str(), c.description.as_str()))
        .collect()
}

fn tag_entries(tags: &[Tag]) -> Vec<CodeEntry<'_>> {
    tags.iter()
        .map(|t| (t.code.as_str(), t.name.as_str(), t.description.as_str()))
        .collect()
}

fn list_codes(
    ui: &UiContext,
    what: &str,
    empty: &str,
    entries: &[CodeEntry<'_>],
    format: ListFormat,
) -> anyhow::Result<()> {
    match format {
        ListFormat::Json => {
            let value: Vec<_> = entries
                .iter()
                .map(|(code, name, description)| {
                    serde_json::json!({ "code": code, "name": name, "description": description })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        ListFormat::Csv => write_codes_csv(io::stdout().lock(), entries.iter().copied())?,
        ListFormat::Text => {
            if entries.is_empty() {
                print(ui, empty);
                return Ok(());
            }
            if ui.mode.is_pretty() {
                print(ui, &header(ui, "list", Some(what)));
                blank_line(ui);
            } else {
                let mut title = what.to_string();
                if let Some(first) = title.get_mut(0..1) {
                    first.make_ascii_uppercase();
                }
                print(ui, &format!("{}:", title));
            }
            for line in code_lines(entries.iter().copied(), ui.unicode) {
                print(ui, &line);
            }
        }
    }
    Ok(())
}

fn list_batches(ui: &UiContext, ledger: &DynLedger, format: ListFormat) -> anyhow::Result<()> {
    let mut batches: Vec<(BatchState, TransactionBatch)> = Vec::new();
    let sets = [
        (BatchState::Pending, ledger.pending_batches()?),
        (BatchState::Committed, ledger.committed_batches()?),
        (BatchState::RolledBack, ledger.rolled_back_batches()?),
    ];
    for (state, set) in sets {
        batches.extend(set.into_iter().map(|batch| (state, batch)));
    }

    match format {
        ListFormat::Json => println!("{}", serde_json::to_string_pretty(&batches_json(&batches))?),
        ListFormat::Csv => write_batches_csv(io::stdout().lock(), &batches)?,
        ListFormat::Text => {
            if batches.is_empty() {
                print(ui, "No batches found.");
                return Ok(());
            }
            let pretty = ui.mode.is_pretty();
            if pretty {
                print(ui, &header(ui, "list", Some("batches")));
                blank_line(ui);
            }
            let columns = [
                Column::new("ID"),
                Column::new("State"),
                Column::new("Description"),
                Column::numeric("Count"),
                Column::new("Created"),
                Column::new("Closed"),
            ];
            print(ui, &table(ui, &columns, &batch_rows(&batches, pretty)));
        }
    }
    Ok(())
}
