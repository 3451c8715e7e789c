//! Input and parsing helper functions for the CLI.
//!
//! - Confirmation prompts (`input`)
//! - Dates, amounts, lists and JSON payloads (`parsing`)

mod input;
mod parsing;

pub use input::confirm;
pub use parsing::{parse_amount, parse_date, parse_list, TransactionInput};
