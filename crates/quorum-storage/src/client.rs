//! Drive gateway HTTP client.

use crate::error::{StorageError, StorageResult};
use crate::types::ListChildrenResponse;
use async_trait::async_trait;
use quorum_config::StorageConfig;
use quorum_core::{FileListing, StorageBrowser};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Environment variable consulted when no API token is configured.
const TOKEN_ENV_VAR: &str = "QUORUM_STORAGE_TOKEN";

/// Client for the drive gateway's REST API.
#[derive(Clone)]
pub struct DriveClient {
    client: Client,
    base_url: String,
    api_token: Option<String>,
    timeout: Duration,
}

impl DriveClient {
    /// Create a new client from configuration.
    pub fn from_config(config: &StorageConfig) -> StorageResult<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds);

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(StorageError::Http)?;

        let api_token = config
            .api_token
            .clone()
            .or_else(|| std::env::var(TOKEN_ENV_VAR).ok());

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token,
            timeout,
        })
    }

    /// Whether the tenant has usable credentials configured.
    pub fn has_credentials(&self) -> bool {
        self.api_token.is_some()
    }

    /// Check if the gateway is reachable.
    pub async fn is_available(&self) -> bool {
        let url = format!("{}/v1/health", self.base_url);
        match self.client.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let mut builder = self.client.get(url);
        if let Some(ref token) = self.api_token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    fn map_transport_error(&self, e: reqwest::Error) -> StorageError {
        if e.is_connect() {
            StorageError::Unreachable {
                host: self.base_url.clone(),
            }
        } else if e.is_timeout() {
            StorageError::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else {
            StorageError::Http(e)
        }
    }

    /// Fetch one page of a folder listing.
    pub async fn list_children_page(
        &self,
        folder_id: &str,
        page_token: Option<&str>,
    ) -> StorageResult<FileListing> {
        let mut url = format!("{}/v1/folders/{}/children", self.base_url, folder_id);
        if let Some(token) = page_token {
            url = format!("{}?page_token={}", url, token);
        }
        debug!("Listing folder {} (token: {:?})", folder_id, page_token);

        let response = self
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StorageError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: ListChildrenResponse = response.json().await?;
        Ok(FileListing {
            entries: body.items,
            next_page_token: body.next_page_token,
        })
    }

    /// Export a file's content as plain text.
    pub async fn export_file_text(&self, file_id: &str, mime_type: &str) -> StorageResult<String> {
        let url = format!(
            "{}/v1/files/{}/export?mime_type={}",
            self.base_url, file_id, mime_type
        );
        debug!("Exporting file {} ({})", file_id, mime_type);

        let response = self
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if status.as_u16() == 415 {
            return Err(StorageError::UnsupportedExport {
                mime_type: mime_type.to_string(),
            });
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StorageError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await?;
        Ok(text)
    }
}

#[async_trait]
impl StorageBrowser for DriveClient {
    async fn list_children(
        &self,
        folder_id: &str,
        page_token: Option<&str>,
    ) -> anyhow::Result<FileListing> {
        Ok(self.list_children_page(folder_id, page_token).await?)
    }

    async fn export_text(&self, file_id: &str, mime_type: &str) -> anyhow::Result<String> {
        Ok(self.export_file_text(file_id, mime_type).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = StorageConfig::default();
        let client = DriveClient::from_config(&config);
        assert!(client.is_ok());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = StorageConfig {
            base_url: "http://localhost:8900/".to_string(),
            ..Default::default()
        };
        let client = DriveClient::from_config(&config).unwrap();
        assert_eq!(client.base_url, "http://localhost:8900");
    }
}
