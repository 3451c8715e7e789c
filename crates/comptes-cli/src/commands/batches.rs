//! `begin`, `commit` and `rollback`.

use serde_json::json;
use tracing::debug;

use comptes_core::Session;

use crate::app::AppContext;
use crate::cli::{BatchArgs, BeginArgs};
use crate::errors::CliError;
use crate::ui::{hint, print, short_id};

use super::report;

pub fn handle_begin(ctx: &AppContext, args: &BeginArgs) -> anyhow::Result<()> {
    let description = args.description.join(" ");
    let description = Some(description.trim()).filter(|d| !d.is_empty());

    let mut ledger = ctx.open_ledger()?;
    let batch = ledger.begin(description)?;

    if let Some(previous) = ctx.load_session()?.current_batch {
        debug!(%previous, "replacing current batch");
    }
    // A new batch starts without the previous batch's defaults.
    let mut session = Session::default();
    session.begin(batch.id.clone());
    ctx.save_session(&session)?;

    let ui = ctx.ui();
    let mut items = vec![("ID", batch.id.as_str())];
    if let Some(description) = batch.description.as_deref() {
        items.push(("Description", description));
    }
    report(
        ctx,
        &ui,
        "Started transaction batch",
        &items,
        json!({ "status": "ok", "batch": batch }),
    )?;

    if !ctx.quiet() && !ui.mode.is_json() {
        print(&ui, &hint(&ui, "Use `comptes account/category/tags` to set defaults for this batch."));
        print(&ui, &hint(&ui, "Use `comptes commit` or `comptes rollback` when done."));
    }
    Ok(())
}

pub fn handle_commit(ctx: &AppContext, args: &BatchArgs) -> anyhow::Result<()> {
    let mut session = ctx.load_session()?;
    let prefix = batch_prefix(&session, args)?;

    let mut ledger = ctx.open_ledger()?;
    let batch = ledger.commit(&prefix)?;
    if session.finish(&batch.id) {
        ctx.save_session(&session)?;
    }

    let ui = ctx.ui();
    let count = batch.transactions.len().to_string();
    report(
        ctx,
        &ui,
        &format!("Committed batch {}", short_id(&batch.id)),
        &[("ID", &batch.id), ("Transactions", &count)],
        json!({ "status": "ok", "batch": batch.id, "committed": batch.transactions.len() }),
    )
}

pub fn handle_rollback(ctx: &AppContext, args: &BatchArgs) -> anyhow::Result<()> {
    let mut session = ctx.load_session()?;
    let prefix = batch_prefix(&session, args)?;

    let mut ledger = ctx.open_ledger()?;
    let batch = ledger.rollback(&prefix)?;
    if session.finish(&batch.id) {
        ctx.save_session(&session)?;
    }

    let ui = ctx.ui();
    let count = batch.transactions.len().to_string();
    report(
        ctx,
        &ui,
        &format!("Rolled back batch {}", short_id(&batch.id)),
        &[("ID", &batch.id), ("Discarded", &count)],
        json!({ "status": "ok", "batch": batch.id, "discarded": batch.transactions.len() }),
    )
}

/// The explicit batch argument, or the current batch.
fn batch_prefix(session: &Session, args: &BatchArgs) -> anyhow::Result<String> {
    session
        .resolve_batch(args.batch.as_deref())
        .map(str::to_string)
        .ok_or_else(|| {
            CliError::invalid_input_with_hint(
                "no batch ID provided and no current batch set",
                "Use 'comptes begin' first or provide a batch ID.",
            )
            .into()
        })
}
