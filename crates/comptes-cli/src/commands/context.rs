//! Batch context: the current batch and its transaction defaults.
//!
//! `account`, `category` and `tags` print the default when called without
//! arguments and replace it otherwise.

use serde_json::json;

use comptes_core::Session;

use crate::app::AppContext;
use crate::cli::{AccountArgs, CodesArgs, ContextAction};
use crate::helpers::parse_list;
use crate::ui::{badge, format_list, kv, print, Badge};

use super::report;

pub fn handle_account(ctx: &AppContext, args: &AccountArgs) -> anyhow::Result<()> {
    let mut session = ctx.load_session()?;
    let Some(account) = args.id.as_deref().map(str::trim) else {
        let current = session.defaults.account.as_deref().unwrap_or("-");
        return show(ctx, &session, "Account", current);
    };

    let catalog = ctx.open_ledger()?.catalog()?;
    session.set_account(&catalog, account)?;
    ctx.save_session(&session)?;
    report(
        ctx,
        &ctx.ui(),
        "Default account set",
        &[("Account", account)],
        json!({ "status": "ok", "account": account }),
    )
}

pub fn handle_categories(ctx: &AppContext, args: &CodesArgs) -> anyhow::Result<()> {
    let mut session = ctx.load_session()?;
    if args.codes.is_empty() {
        let current = format_list(&session.defaults.categories);
        return show(ctx, &session, "Categories", &current);
    }

    let codes = split_codes(&args.codes);
    let catalog = ctx.open_ledger()?.catalog()?;
    session.set_categories(&catalog, codes.clone())?;
    ctx.save_session(&session)?;
    let listed = codes.join(", ");
    report(
        ctx,
        &ctx.ui(),
        "Default categories set",
        &[("Categories", &listed)],
        json!({ "status": "ok", "categories": codes }),
    )
}

pub fn handle_tags(ctx: &AppContext, args: &CodesArgs) -> anyhow::Result<()> {
    let mut session = ctx.load_session()?;
    if args.codes.is_empty() {
        let current = format_list(&session.defaults.tags);
        return show(ctx, &session, "Tags", &current);
    }

    let codes = split_codes(&args.codes);
    let catalog = ctx.open_ledger()?.catalog()?;
    session.set_tags(&catalog, codes.clone())?;
    ctx.save_session(&session)?;
    let listed = codes.join(", ");
    report(
        ctx,
        &ctx.ui(),
        "Default tags set",
        &[("Tags", &listed)],
        json!({ "status": "ok", "tags": codes }),
    )
}

pub fn handle_context(ctx: &AppContext, action: Option<ContextAction>) -> anyhow::Result<()> {
    let mut session = ctx.load_session()?;
    let ui = ctx.ui();

    match action.unwrap_or(ContextAction::Show) {
        ContextAction::Show => {
            if ui.mode.is_json() {
                println!("{}", serde_json::to_string_pretty(&session)?);
                return Ok(());
            }
            let Some(batch) = session.current_batch.as_deref() else {
                print(&ui, "No active transaction batch.");
                return Ok(());
            };
            print(&ui, &kv(&ui, "Batch", batch));
            let account = session.defaults.account.as_deref().unwrap_or("-");
            print(&ui, &kv(&ui, "Account", account));
            print(&ui, &kv(&ui, "Categories", &format_list(&session.defaults.categories)));
            print(&ui, &kv(&ui, "Tags", &format_list(&session.defaults.tags)));
            Ok(())
        }
        ContextAction::Clear => {
            session.clear_defaults();
            ctx.save_session(&session)?;
            report(
                ctx,
                &ui,
                "Cleared batch defaults",
                &[],
                json!({ "status": "ok" }),
            )
        }
    }
}

/// Print one default. Without a batch there are no defaults to show.
fn show(ctx: &AppContext, session: &Session, label: &str, value: &str) -> anyhow::Result<()> {
    let ui = ctx.ui();
    if ui.mode.is_json() {
        println!("{}", serde_json::to_string_pretty(&session.defaults)?);
        return Ok(());
    }
    if session.current_batch.is_none() {
        print(&ui, &badge(&ui, Badge::Info, "No active transaction batch."));
        return Ok(());
    }
    print(&ui, &kv(&ui, label, value));
    Ok(())
}

/// Codes may be given as separate arguments or comma-separated.
fn split_codes(values: &[String]) -> Vec<String> {
    values.iter().flat_map(|value| parse_list(value)).collect()
}
