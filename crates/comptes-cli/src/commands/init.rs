use chrono::Utc;
use serde_json::json;
use tracing::info;

use comptes_core::{LedgerStore, VERSION};

use crate::app::AppContext;
use crate::cli::InitArgs;
use crate::config::{write_config, ComptesConfig};
use crate::ui::theme::{styled, styles};
use crate::ui::{hint, print};

use super::report;

/// Write a starter config when none exists, then seed the catalogs from it.
///
/// Catalogs are overwritten from the config every time. The ledger is only
/// created when it is empty, so re-running `init` never loses transactions.
pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let ui = ctx.ui();
    let config_path = ctx.config_path()?.to_path_buf();

    let created_config = !config_path.exists();
    let config = if created_config {
        let mut config = ComptesConfig::starter();
        if let Some(backend) = args.backend {
            config.storage.backend = backend;
        }
        write_config(&config_path, &config)?;
        info!(path = %config_path.display(), "wrote starter config");
        ctx.set_config(config)
    } else {
        ctx.config()?
    };

    if !ctx.quiet() && ui.mode.is_pretty() {
        let version_line = format!("Comptes v{}", VERSION);
        println!("{}", styled(&version_line, styles::dim(), ui.color));
    }

    let mut ledger = ctx.open_ledger()?;
    let accounts = config.accounts(Utc::now());
    let store = ledger.store_mut();
    store.save_accounts(&accounts)?;
    store.save_categories(&config.categories)?;
    store.save_tags(&config.tags)?;

    let created_ledger = store.ledger()?.is_empty();
    if created_ledger {
        store.save_ledger(&[])?;
    }

    let data_dir = ctx.data_dir()?.display().to_string();
    let config_display = config_path.display().to_string();
    let counts = format!(
        "{} accounts, {} categories, {} tags",
        accounts.len(),
        config.categories.len(),
        config.tags.len()
    );
    report(
        ctx,
        &ui,
        "Initialized",
        &[
            ("Config", &config_display),
            ("Data", &data_dir),
            ("Catalogs", &counts),
        ],
        json!({
            "status": "ok",
            "config": config_display,
            "data_dir": data_dir,
            "created_config": created_config,
            "accounts": accounts.len(),
            "categories": config.categories.len(),
            "tags": config.tags.len(),
        }),
    )?;

    if created_config && !ctx.quiet() && !ui.mode.is_json() {
        print(
            &ui,
            &hint(&ui, &format!("Edit {} to add accounts, then run `comptes init` again.", config_display)),
        );
    }
    Ok(())
}
