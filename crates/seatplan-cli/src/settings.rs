//! Layered configuration
//!
//! Defaults, then a TOML file, then `SEATPLAN__*` environment variables,
//! then command-line overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use config::{Config, Environment, File};
use seatplan_core::logging_facility::Profile;
use serde::Deserialize;

pub const DEFAULT_DB_PATH: &str = ".seatplan/seatplan.db";
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;
const DEFAULT_CONFIG_NAME: &str = "seatplan";
const ENV_PREFIX: &str = "SEATPLAN";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub path: PathBuf,
    pub busy_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// `development` or `production`
    pub profile: String,
}

impl Settings {
    /// Build settings from every layer
    ///
    /// An explicit `config_file` must exist; the default `seatplan.toml`
    /// is optional.
    pub fn load(config_file: Option<&Path>, db_override: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = Config::builder()
            .set_default("database.path", DEFAULT_DB_PATH)?
            .set_default("database.busy_timeout_ms", DEFAULT_BUSY_TIMEOUT_MS)?
            .set_default("log.profile", "development")?;

        builder = match config_file {
            Some(path) => builder.add_source(File::from(path.to_path_buf()).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_NAME).required(false)),
        };

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        if let Some(db) = db_override {
            builder = builder.set_override("database.path", db.to_string_lossy().into_owned())?;
        }

        builder
            .build()
            .context("failed to load configuration")?
            .try_deserialize()
            .context("invalid configuration")
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.database.busy_timeout_ms)
    }

    pub fn log_profile(&self) -> anyhow::Result<Profile> {
        self.log
            .profile
            .parse::<Profile>()
            .map_err(anyhow::Error::msg)
            .context("invalid log.profile")
    }
}
