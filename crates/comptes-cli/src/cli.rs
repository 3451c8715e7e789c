use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use comptes_core::VERSION;

use crate::config::Backend;

/// Comptes - personal bookkeeping with batched entry and reversible edits
#[derive(Parser)]
#[command(name = "comptes")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = "Comptes assumes a single writer: concurrent runs against the same data directory race and the last write wins.")]
pub struct Cli {
    /// Path to the config file
    #[arg(long, global = true, env = "COMPTES_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding the ledger data
    #[arg(long, global = true, env = "COMPTES_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colors
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Use ASCII symbols only
    #[arg(long, global = true)]
    pub ascii: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default config if missing and seed the catalogs
    Init(InitArgs),

    /// Add a transaction (to the current batch if one is open)
    Add(AddArgs),

    /// List transactions, accounts, categories, tags or batches
    List(ListArgs),

    /// Replace a transaction with an edited copy
    Edit(EditArgs),

    /// Delete a transaction (soft by default)
    Delete(DeleteArgs),

    /// Undo the last operation on a transaction
    Undo(UndoArgs),

    /// Show balances of active accounts
    Balance,

    /// Open a new transaction batch
    Begin(BeginArgs),

    /// Commit a pending batch into the ledger
    Commit(BatchArgs),

    /// Discard a pending batch
    Rollback(BatchArgs),

    /// Show or set the default account for the current batch
    Account(AccountArgs),

    /// Show or set the default categories for the current batch
    #[command(alias = "categories")]
    Category(CodesArgs),

    /// Show or set the default tags for the current batch
    #[command(alias = "tag")]
    Tags(CodesArgs),

    /// Show or clear the batch context
    Context {
        #[command(subcommand)]
        action: Option<ContextAction>,
    },

    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Storage backend written to a new config
    #[arg(long, value_enum)]
    pub backend: Option<Backend>,
}

/// Arguments for the `add` command
#[derive(Args)]
pub struct AddArgs {
    /// Transaction as a JSON object; flags override its fields
    #[arg(value_name = "JSON")]
    pub payload: Option<String>,

    /// Batch to stage into (ID or prefix), instead of the current batch
    #[arg(short, long, value_name = "BATCH")]
    pub batch: Option<String>,

    /// Account ID
    #[arg(short, long)]
    pub account: Option<String>,

    /// Signed amount (negative for spending)
    #[arg(short = 'm', long, allow_hyphen_values = true)]
    pub amount: Option<String>,

    /// Description
    #[arg(short, long, visible_alias = "desc")]
    pub description: Option<String>,

    /// Comma-separated category codes
    #[arg(short, long)]
    pub categories: Option<String>,

    /// Comma-separated tag codes
    #[arg(short, long)]
    pub tags: Option<String>,

    /// Date (today, yesterday, YYYY-MM-DD, DD/MM/YYYY, ...)
    #[arg(short = 'o', long, visible_alias = "on")]
    pub date: Option<String>,

    /// Write to the ledger directly even if a batch is open
    #[arg(short, long)]
    pub immediate: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    #[default]
    Text,
    Json,
    Csv,
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    /// Include inactive transactions
    #[arg(long)]
    pub history: bool,

    /// List accounts with their balances
    #[arg(long, conflicts_with_all = ["categories", "tags", "batches"])]
    pub accounts: bool,

    /// List categories
    #[arg(long, conflicts_with_all = ["tags", "batches"])]
    pub categories: bool,

    /// List tags
    #[arg(long, conflicts_with = "batches")]
    pub tags: bool,

    /// List pending, committed and rolled back batches
    #[arg(long)]
    pub batches: bool,

    /// Show category and tag codes instead of names
    #[arg(short = 'k', long)]
    pub codes: bool,

    /// Output format
    #[arg(short = 'F', long, value_enum, default_value_t = ListFormat::Text)]
    pub format: ListFormat,
}

/// Arguments for the `edit` command
#[derive(Args)]
pub struct EditArgs {
    /// Transaction ID or prefix
    pub id: String,

    /// Fields to change, as a JSON object
    #[arg(value_name = "JSON")]
    pub changes: String,

    /// Why the transaction is being edited
    #[arg(short, long)]
    pub message: Option<String>,
}

/// Arguments for the `delete` command
#[derive(Args)]
pub struct DeleteArgs {
    /// Transaction ID or prefix
    pub id: String,

    /// Why the transaction is being deleted
    #[arg(short, long)]
    pub message: Option<String>,

    /// Remove the record permanently
    #[arg(short = 'H', long)]
    pub hard: bool,

    /// Skip confirmation
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for the `undo` command
#[derive(Args)]
pub struct UndoArgs {
    /// Transaction ID or prefix
    pub id: String,

    /// Remove the record instead of reactivating it
    #[arg(short = 'H', long)]
    pub hard: bool,

    /// Skip confirmation
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for the `begin` command
#[derive(Args)]
pub struct BeginArgs {
    /// Optional description
    #[arg(trailing_var_arg = true)]
    pub description: Vec<String>,
}

/// Arguments for `commit` and `rollback`
#[derive(Args)]
pub struct BatchArgs {
    /// Batch ID or prefix (defaults to the current batch)
    pub batch: Option<String>,
}

/// Arguments for the `account` command
#[derive(Args)]
pub struct AccountArgs {
    /// Account ID to use by default
    pub id: Option<String>,
}

/// Arguments for the `category` and `tags` commands
#[derive(Args)]
pub struct CodesArgs {
    /// Codes to use by default
    pub codes: Vec<String>,
}

#[derive(Subcommand, Clone, Copy)]
pub enum ContextAction {
    /// Show the current batch and defaults
    Show,
    /// Clear the defaults
    Clear,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_add_accepts_negative_amount() {
        let cli = Cli::try_parse_from([
            "comptes", "add", "-a", "BANQUE", "-m", "-25.50", "--desc", "Courses",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Add(args)) => {
                assert_eq!(args.amount.as_deref(), Some("-25.50"));
                assert_eq!(args.description.as_deref(), Some("Courses"));
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_list_format_csv() {
        let cli = Cli::try_parse_from(["comptes", "list", "--history", "--format", "csv"]).unwrap();
        match cli.command {
            Some(Commands::List(args)) => {
                assert!(args.history);
                assert_eq!(args.format, ListFormat::Csv);
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_delete_hard_flags() {
        let cli =
            Cli::try_parse_from(["comptes", "delete", "ab12", "-m", "doublon", "-H", "-f"]).unwrap();
        match cli.command {
            Some(Commands::Delete(args)) => {
                assert!(args.hard && args.force);
                assert_eq!(args.message.as_deref(), Some("doublon"));
            }
            _ => panic!("expected delete"),
        }
    }
}
