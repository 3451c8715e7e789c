//! Application context for the Comptes CLI.
//!
//! Bundles the parsed arguments with the lazily-loaded config so handlers
//! take one parameter instead of re-resolving paths.

use std::path::{Path, PathBuf};

use once_cell::unsync::OnceCell;

use comptes_core::{Ledger, Session};

use crate::cli::Cli;
use crate::config::{read_config, ComptesConfig};
use crate::ui::UiContext;

use super::resolver::{missing_config, resolve_config_path, resolve_data_dir};
use super::session::{load_session, save_session};
use super::store::{open_store, DynLedger};

pub struct AppContext<'a> {
    cli: &'a Cli,
    config_path: OnceCell<PathBuf>,
    config: OnceCell<ComptesConfig>,
    data_dir: OnceCell<PathBuf>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config_path: OnceCell::new(),
            config: OnceCell::new(),
            data_dir: OnceCell::new(),
        }
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    pub fn config_path(&self) -> anyhow::Result<&Path> {
        self.config_path
            .get_or_try_init(|| resolve_config_path(self.cli))
            .map(PathBuf::as_path)
    }

    /// The config file, loaded once. A missing file is a not-found error
    /// pointing at `comptes init`.
    pub fn config(&self) -> anyhow::Result<&ComptesConfig> {
        self.config.get_or_try_init(|| {
            let path = self.config_path()?;
            if !path.exists() {
                return Err(missing_config(path).into());
            }
            read_config(path)
        })
    }

    /// Use `config` instead of reading the file (after `init` writes it).
    pub fn set_config(&self, config: ComptesConfig) -> &ComptesConfig {
        match self.config.try_insert(config) {
            Ok(config) => config,
            Err((existing, _)) => existing,
        }
    }

    /// Log level from the config file, if the file exists and names one.
    pub fn configured_log_level(&self) -> Option<String> {
        let path = self.config_path().ok()?;
        if !path.exists() {
            return None;
        }
        self.config().ok()?.logging.level.clone()
    }

    pub fn data_dir(&self) -> anyhow::Result<&Path> {
        self.data_dir
            .get_or_try_init(|| resolve_data_dir(self.cli, self.config()?))
            .map(PathBuf::as_path)
    }

    pub fn open_ledger(&self) -> anyhow::Result<DynLedger> {
        let backend = self.config()?.storage.backend;
        let store = open_store(backend, self.data_dir()?)?;
        Ok(Ledger::new(store))
    }

    pub fn load_session(&self) -> anyhow::Result<Session> {
        load_session(self.data_dir()?)
    }

    pub fn save_session(&self, session: &Session) -> anyhow::Result<()> {
        save_session(self.data_dir()?, session)
    }

    /// UI context from the global flags.
    pub fn ui(&self) -> UiContext {
        self.ui_with_json(false)
    }

    /// UI context, forcing JSON when a command-level flag asks for it.
    pub fn ui_with_json(&self, json: bool) -> UiContext {
        UiContext::from_env(self.cli.json || json, self.cli.no_color, self.cli.ascii)
    }
}
