//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (config, parsing, anything not classified below)
/// - 2: Misuse of shell command (reserved by clap)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Unknown transaction, batch, account, category or tag.
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Operation refused in the record's current state.
    pub const BUSINESS_RULE: i32 = 5;

    /// The store could not be read or written.
    pub const STORAGE: i32 = 6;
}

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "COMPTES_LOG";

/// Log level used when neither the environment nor the config sets one.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Session file stored next to the data.
pub const SESSION_FILE: &str = "session.json";

/// Currency assumed when an account does not name one.
pub const DEFAULT_CURRENCY: &str = "EUR";
