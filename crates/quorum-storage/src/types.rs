//! Wire types for the drive gateway API.

use quorum_core::RemoteEntry;
use serde::Deserialize;

/// Response body of `GET /v1/folders/{id}/children`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListChildrenResponse {
    #[serde(default)]
    pub items: Vec<RemoteEntry>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}
