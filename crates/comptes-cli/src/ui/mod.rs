//! UI primitives for the Comptes CLI.
//!
//! - **Context**: Environment detection (TTY, width, color, unicode)
//! - **Mode**: Output mode resolution (json, plain, pretty)
//! - **Theme**: Badges and owo-colors styles
//! - **Render**: Tables, headers, receipts, hints
//! - **Format**: Amounts, dates, ids

mod context;
pub mod format;
mod mode;
pub mod render;
pub mod theme;

pub use context::UiContext;
pub use mode::OutputMode;
pub use theme::Badge;

pub use render::{badge, blank_line, header, hint, kv, print, print_error, receipt, table, Column};

pub use format::{format_amount, format_date, format_datetime, format_list, short_id, truncate};
