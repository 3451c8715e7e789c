//! Comptes CLI - personal bookkeeping with batched entry and reversible edits
//!
//! This is the command-line interface for Comptes. It maps subcommands to
//! the core ledger operations and formats their results.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod output;
mod ui;

use clap::{CommandFactory, Parser};
use comptes_core::LedgerError;
use tracing_subscriber::EnvFilter;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{balance, batches, context, init, list, misc, transactions};
use crate::constants::{DEFAULT_LOG_LEVEL, LOG_ENV};
use crate::errors::CliError;
use crate::ui::print_error;

fn main() {
    let cli = Cli::parse();
    let ctx = AppContext::new(&cli);
    init_logging(&ctx);

    if let Err(e) = run(&ctx, &cli) {
        let ui = ctx.ui();
        let (message, hint, code) = classify(&e);
        print_error(&ui, &message, hint.as_deref());
        std::process::exit(code);
    }
}

/// Logs go to stderr. `COMPTES_LOG` wins over `[logging] level` in the
/// config file.
fn init_logging(ctx: &AppContext) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        let level = ctx
            .configured_log_level()
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Message, hint and exit code for a failed command.
fn classify(err: &anyhow::Error) -> (String, Option<String>, i32) {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        return (
            cli_err.to_string(),
            cli_err.hint().map(str::to_string),
            cli_err.exit_code(),
        );
    }
    if let Some(ledger_err) = err.downcast_ref::<LedgerError>() {
        let cli_err = CliError::from_ledger(ledger_err);
        return (
            cli_err.to_string(),
            cli_err.hint().map(str::to_string),
            cli_err.exit_code(),
        );
    }
    (format!("{:#}", err), None, 1)
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Init(args)) => init::handle_init(ctx, args)?,
        Some(Commands::Add(args)) => transactions::handle_add(ctx, args)?,
        Some(Commands::List(args)) => list::handle_list(ctx, args)?,
        Some(Commands::Edit(args)) => transactions::handle_edit(ctx, args)?,
        Some(Commands::Delete(args)) => transactions::handle_delete(ctx, args)?,
        Some(Commands::Undo(args)) => transactions::handle_undo(ctx, args)?,
        Some(Commands::Balance) => balance::handle_balance(ctx)?,
        Some(Commands::Begin(args)) => batches::handle_begin(ctx, args)?,
        Some(Commands::Commit(args)) => batches::handle_commit(ctx, args)?,
        Some(Commands::Rollback(args)) => batches::handle_rollback(ctx, args)?,
        Some(Commands::Account(args)) => context::handle_account(ctx, args)?,
        Some(Commands::Category(args)) => context::handle_categories(ctx, args)?,
        Some(Commands::Tags(args)) => context::handle_tags(ctx, args)?,
        Some(Commands::Context { action }) => context::handle_context(ctx, *action)?,
        Some(Commands::Completions { shell }) => misc::handle_completions(*shell)?,
        None => {
            Cli::command().print_help()?;
            println!();
        }
    }
    Ok(())
}
