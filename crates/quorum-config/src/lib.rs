//! Quorum Config - Configuration structures and platform paths.

mod config;
mod error;
mod paths;

pub use config::{Config, GeneralConfig, OllamaConfig, StorageConfig, SyncConfig};
pub use error::{ConfigError, ConfigResult};
pub use paths::AppPaths;
