//! CLI command implementations.

pub mod config;
pub mod enrich;
pub mod index;
pub mod init;
pub mod integration;
pub mod meetings;
pub mod search;
pub mod status;
pub mod sync;
pub mod tags;

use anyhow::{Context, Result};
use quorum_config::{AppPaths, Config};
use quorum_db::Database;
use std::path::PathBuf;

/// Get the application paths.
pub fn get_paths() -> Result<AppPaths> {
    AppPaths::new().context("Failed to determine application directories")
}

/// Get the loaded configuration.
pub fn get_config() -> Result<Config> {
    Config::load().context("Failed to load configuration")
}

/// Resolve the database file, honoring a configured data_dir override.
pub fn database_path(config: &Config, paths: &AppPaths) -> PathBuf {
    match config.general.data_dir {
        Some(ref dir) => PathBuf::from(dir).join("quorum.db"),
        None => paths.database_file.clone(),
    }
}

/// Get a database connection, ensuring quorum is initialized.
pub fn get_database() -> Result<Database> {
    let paths = get_paths()?;

    if !paths.is_initialized() {
        anyhow::bail!("Quorum is not initialized. Run 'quorum init' first.");
    }

    let config = get_config()?;
    Database::open(database_path(&config, &paths)).context("Failed to open database")
}
