//! `add`, `edit`, `delete` and `undo`.

use serde_json::json;

use comptes_core::storage::{NewTransaction, Transaction};
use comptes_core::{LedgerError, LedgerStore, Session};

use crate::app::{AppContext, DynLedger};
use crate::cli::{AddArgs, DeleteArgs, EditArgs, UndoArgs};
use crate::constants::DEFAULT_CURRENCY;
use crate::errors::CliError;
use crate::helpers::{confirm, parse_amount, parse_date, parse_list, TransactionInput};
use crate::ui::{format_amount, short_id};

use super::{report, report_cancelled};

pub fn handle_add(ctx: &AppContext, args: &AddArgs) -> anyhow::Result<()> {
    let input = match &args.payload {
        Some(json) => TransactionInput::from_json(json)?,
        None => TransactionInput::default(),
    };
    let has_amount = input.amount.is_some() || args.amount.is_some();
    let new = apply_flags(input.into_new()?, args)?;

    let mut ledger = ctx.open_ledger()?;
    let session = ctx.load_session()?;
    let new = session.apply_defaults(new);
    check_required(&new, has_amount, &session)?;

    let target = if args.immediate {
        None
    } else {
        session.resolve_batch(args.batch.as_deref())
    };

    let ui = ctx.ui();
    match target {
        Some(batch) => {
            let tx = ledger.add_to_batch(batch, new)?;
            let batch = ledger.pending_batch(batch)?;
            let amount = format_amount(tx.amount, &currency_of(&ledger, &tx)?);
            report(
                ctx,
                &ui,
                &format!("Transaction added to batch {}", short_id(&batch.id)),
                &[("ID", &tx.id), ("Batch", &batch.id), ("Amount", &amount)],
                json!({ "status": "ok", "batch": batch.id, "transaction": tx }),
            )
        }
        None => {
            let tx = ledger.add(new)?;
            let amount = format_amount(tx.amount, &currency_of(&ledger, &tx)?);
            report(
                ctx,
                &ui,
                "Transaction added",
                &[("ID", &tx.id), ("Amount", &amount)],
                json!({ "status": "ok", "transaction": tx }),
            )
        }
    }
}

/// Flags win over the JSON payload.
fn apply_flags(mut new: NewTransaction, args: &AddArgs) -> anyhow::Result<NewTransaction> {
    if let Some(account) = &args.account {
        new.account = account.trim().to_string();
    }
    if let Some(amount) = &args.amount {
        new.amount = parse_amount(amount)?;
    }
    if let Some(description) = &args.description {
        new.description = description.clone();
    }
    if let Some(categories) = &args.categories {
        new.categories = parse_list(categories);
    }
    if let Some(tags) = &args.tags {
        new.tags = parse_list(tags);
    }
    if let Some(date) = &args.date {
        new.date = Some(parse_date(date)?);
    }
    Ok(new)
}

fn check_required(new: &NewTransaction, has_amount: bool, session: &Session) -> anyhow::Result<()> {
    if new.account.is_empty() {
        let message = if session.current_batch.is_some() {
            "account is required (use -a/--account or set context with 'comptes account <id>')"
        } else {
            "account is required (use -a/--account)"
        };
        return Err(CliError::invalid_input(message).into());
    }
    if !has_amount {
        return Err(CliError::invalid_input("amount is required (use -m/--amount)").into());
    }
    if new.description.trim().is_empty() {
        return Err(
            CliError::invalid_input("description is required (use --desc/--description)").into(),
        );
    }
    Ok(())
}

fn currency_of(ledger: &DynLedger, tx: &Transaction) -> anyhow::Result<String> {
    Ok(ledger
        .store()
        .accounts()?
        .into_iter()
        .find(|a| a.id == tx.account)
        .map(|a| a.currency)
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()))
}

pub fn handle_edit(ctx: &AppContext, args: &EditArgs) -> anyhow::Result<()> {
    let patch = TransactionInput::from_json(&args.changes)?.into_patch()?;
    if patch.is_empty() {
        return Err(CliError::invalid_input_with_hint(
            "nothing to change",
            r#"Pass the fields to change, e.g. '{"amount":-30.00}'"#,
        )
        .into());
    }

    let mut ledger = ctx.open_ledger()?;
    let original = ledger.transaction(&args.id)?;
    let comment = args.message.as_deref().unwrap_or_default();
    let edited = ledger.edit(&args.id, patch, comment)?;

    let ui = ctx.ui();
    report(
        ctx,
        &ui,
        &format!(
            "Edited transaction {} -> {}",
            short_id(&original.id),
            short_id(&edited.id)
        ),
        &[("Replaced", &original.id), ("ID", &edited.id)],
        json!({ "status": "ok", "replaced": original.id, "transaction": edited }),
    )
}

pub fn handle_delete(ctx: &AppContext, args: &DeleteArgs) -> anyhow::Result<()> {
    let comment = required_message(args.message.as_deref(), "delete")?;
    let mut ledger = ctx.open_ledger()?;
    let ui = ctx.ui();

    if args.hard {
        let tx = ledger.transaction(&args.id)?;
        let prompt = format!(
            "Permanently delete transaction {} ({})? This cannot be undone",
            short_id(&tx.id),
            tx.description
        );
        if !confirm(&ui, &prompt, args.force)? {
            report_cancelled(ctx, &ui);
            return Ok(());
        }
        let removed = ledger.delete_hard(&args.id, comment)?;
        return report(
            ctx,
            &ui,
            &format!("Permanently deleted transaction {}", short_id(&removed.id)),
            &[("ID", &removed.id), ("Reason", comment)],
            json!({ "status": "ok", "removed": removed.id }),
        );
    }

    let deleted = ledger.delete(&args.id, comment)?;
    report(
        ctx,
        &ui,
        &format!("Deleted transaction {}", short_id(&deleted.id)),
        &[("ID", &deleted.id), ("Reason", comment)],
        json!({ "status": "ok", "transaction": deleted }),
    )
}

pub fn handle_undo(ctx: &AppContext, args: &UndoArgs) -> anyhow::Result<()> {
    let mut ledger = ctx.open_ledger()?;
    let ui = ctx.ui();

    if args.hard {
        let tx = ledger.transaction(&args.id)?;
        let prompt = format!(
            "Permanently remove transaction {} ({})? This cannot be undone",
            short_id(&tx.id),
            tx.description
        );
        if !confirm(&ui, &prompt, args.force)? {
            report_cancelled(ctx, &ui);
            return Ok(());
        }
        let removed = ledger.undo_hard(&args.id)?;
        return report(
            ctx,
            &ui,
            &format!("Permanently removed transaction {}", short_id(&removed.id)),
            &[("ID", &removed.id)],
            json!({ "status": "ok", "removed": removed.id }),
        );
    }

    let restored = ledger.undo(&args.id)?;
    let state = if restored.active { "active" } else { "inactive" };
    report(
        ctx,
        &ui,
        &format!("Undid last operation on transaction {}", short_id(&restored.id)),
        &[("ID", &restored.id), ("State", state)],
        json!({ "status": "ok", "transaction": restored }),
    )
}

/// Fail before any prompt when a mandatory reason is missing.
fn required_message<'a>(message: Option<&'a str>, operation: &str) -> anyhow::Result<&'a str> {
    match message.map(str::trim).filter(|m| !m.is_empty()) {
        Some(message) => Ok(message),
        None => Err(LedgerError::MissingMessage {
            operation: operation.to_string(),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn args() -> AddArgs {
        AddArgs {
            payload: None,
            batch: None,
            account: None,
            amount: None,
            description: None,
            categories: None,
            tags: None,
            date: None,
            immediate: false,
        }
    }

    #[test]
    fn test_flags_override_json_fields() {
        let input = TransactionInput::from_json(
            r#"{"account":"BANQUE","amount":-10,"description":"json","tags":["URG"]}"#,
        )
        .unwrap();
        let mut flags = args();
        flags.amount = Some("-12.40".into());
        flags.categories = Some("ALM,SLR".into());

        let new = apply_flags(input.into_new().unwrap(), &flags).unwrap();
        assert_eq!(new.amount, dec!(-12.40));
        assert_eq!(new.description, "json");
        assert_eq!(new.categories, vec!["ALM", "SLR"]);
        assert_eq!(new.tags, vec!["URG"]);
    }

    #[test]
    fn test_missing_account_mentions_context_inside_batch() {
        let mut session = Session::default();
        let new = NewTransaction::new("", dec!(-1), "x");
        let outside = check_required(&new, true, &session).unwrap_err();
        assert_eq!(outside.to_string(), "account is required (use -a/--account)");

        session.begin("b1");
        let inside = check_required(&new, true, &session).unwrap_err();
        assert!(inside.to_string().contains("comptes account <id>"));
    }

    #[test]
    fn test_missing_amount_and_description() {
        let session = Session::default();
        let new = NewTransaction::new("BANQUE", dec!(0), "x");
        assert!(check_required(&new, false, &session)
            .unwrap_err()
            .to_string()
            .contains("amount is required"));

        let blank = NewTransaction::new("BANQUE", dec!(-1), "  ");
        assert!(check_required(&blank, true, &session)
            .unwrap_err()
            .to_string()
            .contains("description is required"));
    }

    #[test]
    fn test_required_message() {
        assert_eq!(required_message(Some(" doublon "), "delete").unwrap(), "doublon");
        let err = required_message(Some("  "), "delete").unwrap_err();
        assert!(err.downcast_ref::<LedgerError>().is_some());
    }
}
