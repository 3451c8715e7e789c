//! Command handlers. Each takes the `AppContext` plus its parsed args.

pub mod balance;
pub mod batches;
pub mod context;
pub mod init;
pub mod list;
pub mod misc;
pub mod transactions;

use serde_json::Value;

use crate::app::AppContext;
use crate::ui::{badge, print, receipt, Badge, UiContext};

/// Report a finished mutation: a receipt on text output, `value` on JSON.
pub(crate) fn report(
    ctx: &AppContext,
    ui: &UiContext,
    title: &str,
    items: &[(&str, &str)],
    value: Value,
) -> anyhow::Result<()> {
    if ctx.quiet() {
        return Ok(());
    }
    if ui.mode.is_json() {
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print(ui, &receipt(ui, title, items));
    }
    Ok(())
}

/// Report a declined confirmation.
pub(crate) fn report_cancelled(ctx: &AppContext, ui: &UiContext) {
    if ctx.quiet() {
        return;
    }
    if ui.mode.is_pretty() {
        print(ui, &badge(ui, Badge::Info, "Cancelled"));
    } else if ui.mode.is_json() {
        println!("{}", serde_json::json!({ "status": "cancelled" }));
    } else {
        println!("status=cancelled");
    }
}
