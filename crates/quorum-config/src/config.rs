//! Configuration structures and loading.

use crate::error::{ConfigError, ConfigResult};
use crate::paths::AppPaths;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub ollama: OllamaConfig,

    #[serde(default)]
    pub sync: SyncConfig,
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> ConfigResult<Self> {
        let paths = AppPaths::new().ok_or(ConfigError::NoConfigDir)?;
        Self::load_from(&paths.config_file)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &PathBuf) -> ConfigResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> ConfigResult<()> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Create a default config file with comments.
    pub fn create_default_file(path: &PathBuf) -> ConfigResult<()> {
        let default_config = Self::default_config_string();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, default_config)?;
        Ok(())
    }

    /// Generate a default config file with helpful comments.
    pub fn default_config_string() -> String {
        r#"# Quorum Configuration
# Multi-tenant document hub for member organizations

[general]
# Data directory for the database
# data_dir = "~/.local/share/quorum"

[storage]
# Base URL of the cloud drive API gateway
base_url = "http://localhost:8900"

# API token (also read from QUORUM_STORAGE_TOKEN)
# api_token = ""

# Request timeout in seconds
timeout_seconds = 30

[ollama]
# Ollama server address
host = "http://localhost:11434"

# Model used for document analysis
model = "llama3.1:8b"

# Request timeout in seconds
timeout_seconds = 120

[sync]
# Documents analyzed concurrently per enrichment batch
batch_size = 5

# Pause between enrichment batches (rate-limit compliance)
batch_delay_ms = 2000

# Extracted text is truncated at this many characters
max_content_chars = 50000

# Crawl depth used when an integration does not specify one
default_max_depth = 3
"#
        .to_string()
    }
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    pub data_dir: Option<String>,
}

/// Cloud drive API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub base_url: String,
    pub api_token: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8900".to_string(),
            api_token: None,
            timeout_seconds: 30,
        }
    }
}

/// Ollama LLM settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub host: String,
    pub model: String,
    pub timeout_seconds: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost:11434".to_string(),
            model: "llama3.1:8b".to_string(),
            timeout_seconds: 120,
        }
    }
}

/// Crawl and enrichment pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub batch_size: usize,
    pub batch_delay_ms: u64,
    pub max_content_chars: usize,
    pub default_max_depth: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            batch_size: 5,
            batch_delay_ms: 2000,
            max_content_chars: 50_000,
            default_max_depth: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.ollama.host, "http://localhost:11434");
        assert_eq!(config.sync.batch_size, 5);
        assert_eq!(config.sync.batch_delay_ms, 2000);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(config.storage.base_url, deserialized.storage.base_url);
        assert_eq!(config.sync.batch_size, deserialized.sync.batch_size);
    }

    #[test]
    fn test_load_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
            [sync]
            batch_size = 10
            "#
        )
        .unwrap();

        let path = temp_file.path().to_path_buf();
        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.sync.batch_size, 10);
        // Defaults should still apply to other fields
        assert_eq!(config.sync.batch_delay_ms, 2000);
        assert_eq!(config.ollama.host, "http://localhost:11434");
    }
}
