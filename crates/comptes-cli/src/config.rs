use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use comptes_core::storage::{Account, Category, Tag};

use crate::constants::DEFAULT_CURRENCY;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComptesConfig {
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub logging: LoggingSection,
    #[serde(default)]
    pub accounts: Vec<AccountEntry>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSection {
    #[serde(default)]
    pub backend: Backend,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Json,
    Sqlite,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

/// Account as written in the config file. Missing fields are filled in by
/// [`AccountEntry::to_account`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default)]
    pub initial_balance: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl AccountEntry {
    pub fn to_account(&self, now: DateTime<Utc>) -> Account {
        Account {
            id: self.id.clone(),
            name: self.name.clone(),
            kind: self.kind.clone(),
            currency: self
                .currency
                .clone()
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            initial_balance: self.initial_balance,
            active: true,
            created_at: self.created_at.unwrap_or(now),
        }
    }
}

impl ComptesConfig {
    /// Starter config written by `comptes init`.
    pub fn starter() -> Self {
        let category = |code: &str, name: &str, description: &str| Category {
            code: code.to_string(),
            name: name.to_string(),
            parent: None,
            children: Vec::new(),
            description: description.to_string(),
        };
        let tag = |code: &str, name: &str, description: &str| Tag {
            code: code.to_string(),
            name: name.to_string(),
            parent: None,
            children: Vec::new(),
            description: description.to_string(),
        };

        Self {
            storage: StorageSection::default(),
            logging: LoggingSection::default(),
            accounts: vec![AccountEntry {
                id: "BANQUE".to_string(),
                name: "Compte Courant Principal".to_string(),
                kind: "checking".to_string(),
                currency: Some(DEFAULT_CURRENCY.to_string()),
                initial_balance: Decimal::new(150000, 2),
                created_at: None,
            }],
            categories: vec![
                category("ALM", "Alimentation", "Courses et repas"),
                category("SLR", "Salaire", "Revenus professionnels"),
                category("LGT", "Logement", "Loyer, charges, etc."),
            ],
            tags: vec![
                tag("URG", "Urgent", "Transaction urgente"),
                tag("REC", "Récurrent", "Transaction récurrente"),
            ],
        }
    }

    /// Accounts with defaults applied.
    pub fn accounts(&self, now: DateTime<Utc>) -> Vec<Account> {
        self.accounts.iter().map(|a| a.to_account(now)).collect()
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn read_config(path: &Path) -> anyhow::Result<ComptesConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    parse_config(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

fn parse_config(contents: &str) -> anyhow::Result<ComptesConfig> {
    let config: ComptesConfig = toml::from_str(contents)?;
    if let Some(position) = config.accounts.iter().position(|a| a.id.trim().is_empty()) {
        anyhow::bail!("account #{} has no id (account ID is required)", position + 1);
    }
    Ok(config)
}

pub fn write_config(path: &Path, config: &ComptesConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("comptes"));
        }
    }
    Ok(home_dir()?.join(".config").join("comptes"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("comptes"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("comptes"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
