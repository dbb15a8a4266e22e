//! Typed settings for the Marea ledger tools.
//!
//! Settings come from an optional TOML file merged with `MAREA_`-prefixed
//! environment variables; every field has a default matching the layout
//! the business has always used, so running with no configuration works.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

/// File layout and naming for the ledger, menu and backups.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the live tables.
    pub data_dir: PathBuf,
    /// Menu table file name, relative to `data_dir`.
    pub menu_file: String,
    /// Live ledger table file name, relative to `data_dir`.
    pub ledger_file: String,
    /// Backup directory name, relative to `data_dir`; created at startup.
    pub backup_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            menu_file: "menu.csv".to_string(),
            ledger_file: "consumos.csv".to_string(),
            backup_dir: "In".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from `path` (or `marea.toml` in the working directory
    /// when absent), then apply `MAREA_*` environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        builder = match path {
            Some(path) => builder.add_source(File::from(path)),
            None => builder.add_source(File::with_name("marea").required(false)),
        };
        builder = builder.add_source(Environment::with_prefix("MAREA"));
        let settings = builder
            .build()
            .context("failed to read configuration")?
            .try_deserialize()
            .context("invalid configuration")?;
        Ok(settings)
    }

    pub fn menu_path(&self) -> PathBuf {
        self.data_dir.join(&self.menu_file)
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir.join(&self.ledger_file)
    }

    pub fn backup_path(&self) -> PathBuf {
        self.data_dir.join(&self.backup_dir)
    }
}
