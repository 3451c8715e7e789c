use crate::app::AppContext;
use crate::output::accounts_json;
use crate::ui::{blank_line, format_amount, header, print, table, Column};

/// Balances of the active accounts.
pub fn handle_balance(ctx: &AppContext) -> anyhow::Result<()> {
    let ui = ctx.ui();
    let balances = ctx.open_ledger()?.balances()?;

    if ui.mode.is_json() {
        println!("{}", serde_json::to_string_pretty(&accounts_json(&balances))?);
        return Ok(());
    }
    if balances.is_empty() {
        print(&ui, "No active accounts.");
        return Ok(());
    }

    if ui.mode.is_pretty() {
        print(&ui, &header(&ui, "balance", None));
        blank_line(&ui);
        let rows: Vec<Vec<String>> = balances
            .iter()
            .map(|(account, balance)| {
                vec![
                    account.id.clone(),
                    account.name.clone(),
                    format_amount(*balance, &account.currency),
                ]
            })
            .collect();
        let columns = [
            Column::new("ID"),
            Column::new("Account"),
            Column::numeric("Balance"),
        ];
        print(&ui, &table(&ui, &columns, &rows));
    } else {
        print(&ui, "Account Balances:");
        for (account, balance) in &balances {
            print(
                &ui,
                &format!("- {}: {}", account.name, format_amount(*balance, &account.currency)),
            );
        }
    }
    Ok(())
}
