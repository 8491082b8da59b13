//! CLI configuration

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::Cli;

/// Optional config file, looked up in the working directory.
const CONFIG_FILE: &str = "strata.toml";

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    database: Option<PathBuf>,
    migrations: Option<PathBuf>,
}

/// Resolved configuration: flags override the config file, the config
/// file overrides defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub database: PathBuf,
    pub migrations: PathBuf,
}

impl Config {
    pub fn resolve(cli: &Cli) -> anyhow::Result<Self> {
        Self::resolve_from(cli, Path::new(CONFIG_FILE))
    }

    fn resolve_from(cli: &Cli, config_path: &Path) -> anyhow::Result<Self> {
        let file: FileConfig = if config_path.is_file() {
            let raw = std::fs::read_to_string(config_path)?;
            toml::from_str(&raw)?
        } else {
            FileConfig::default()
        };

        Ok(Self {
            database: cli
                .database
                .clone()
                .or(file.database)
                .unwrap_or_else(|| PathBuf::from("strata.db")),
            migrations: cli
                .migrations
                .clone()
                .or(file.migrations)
                .unwrap_or_else(|| PathBuf::from("migrations")),
        })
    }
}
