//! Interactive confirmation for irreversible operations.

use dialoguer::Confirm;

use crate::errors::CliError;
use crate::ui::{badge, Badge, UiContext};

/// Ask before an irreversible operation.
///
/// `--force` skips the prompt. Without a terminal to ask on, the operation
/// is refused rather than assumed.
pub fn confirm(ui: &UiContext, prompt: &str, force: bool) -> anyhow::Result<bool> {
    if force {
        return Ok(true);
    }
    if !ui.is_interactive() {
        return Err(CliError::invalid_input_with_hint(
            format!("{} (confirmation required)", prompt),
            "Pass --force to skip confirmation in non-interactive mode.",
        )
        .into());
    }
    let confirmed = Confirm::new()
        .with_prompt(warning_prompt(ui, prompt))
        .default(false)
        .interact()?;
    Ok(confirmed)
}

fn warning_prompt(ui: &UiContext, prompt: &str) -> String {
    badge(ui, Badge::Warn, prompt)
}
