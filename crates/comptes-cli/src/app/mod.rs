//! Application-level plumbing for the Comptes CLI.
//!
//! - Path resolution for config and data directory
//! - Backend selection
//! - Session persistence
//! - The per-invocation `AppContext`

mod context;
mod resolver;
mod session;
mod store;

pub use context::AppContext;
pub use store::DynLedger;
