//! Capability traits consumed by the sync pipeline.
//!
//! The cloud storage service and the AI enricher are injected at pipeline
//! construction. Production implementations live in `quorum-storage` and
//! `quorum-enrich`; tests substitute in-memory fakes.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::DateConfidence;

/// MIME type marking a container node in the external storage tree.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.storage.folder";

/// A single entry returned by a folder listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteEntry {
    pub id: String,
    pub name: String,
    pub mime_type: String,
}

/// Whether a remote entry is a container node.
pub fn is_folder(entry: &RemoteEntry) -> bool {
    entry.mime_type == FOLDER_MIME_TYPE
}

/// One page of a folder listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileListing {
    pub entries: Vec<RemoteEntry>,
    pub next_page_token: Option<String>,
}

/// Structured result of analyzing one document's text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentAnalysis {
    pub summary: String,
    pub key_items: Vec<String>,
    pub action_items: Vec<String>,
    pub improvements: Option<String>,
    pub suggested_tags: Vec<String>,
    pub extracted_date: Option<NaiveDate>,
    pub date_confidence: DateConfidence,
}

/// Paginated read access to an external cloud storage tree.
#[async_trait]
pub trait StorageBrowser: Send + Sync {
    /// List one page of a folder's children. Pass the previous page's
    /// `next_page_token` to continue; `None` starts from the beginning.
    async fn list_children(
        &self,
        folder_id: &str,
        page_token: Option<&str>,
    ) -> Result<FileListing>;

    /// Export a file's content as plain text. Errors on unsupported types
    /// and transport failures; callers decide whether that is fatal.
    async fn export_text(&self, file_id: &str, mime_type: &str) -> Result<String>;
}

/// AI analysis of document text into a summary, task lists, tags, and an
/// inferred meeting date.
#[async_trait]
pub trait Enricher: Send + Sync {
    async fn analyze(
        &self,
        text: &str,
        file_name: &str,
        known_tags: &[String],
    ) -> Result<EnrichmentAnalysis>;
}
