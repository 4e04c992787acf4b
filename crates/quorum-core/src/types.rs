//! Core domain types for Quorum.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for folder integrations.
pub type IntegrationId = String;

/// Unique identifier for documents (indexed and meeting).
pub type DocumentId = String;

/// Unique identifier for tags.
pub type TagId = String;

/// Tenant slug scoping all records.
pub type TenantId = String;

/// Generate a new unique ID.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Kind of a folder integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationKind {
    /// Crawled into the generic searchable index only.
    General,
    /// Crawled into the generic index and the meeting-minutes pipeline.
    Minutes,
}

impl IntegrationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrationKind::General => "general",
            IntegrationKind::Minutes => "minutes",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "general" => Some(IntegrationKind::General),
            "minutes" => Some(IntegrationKind::Minutes),
            _ => None,
        }
    }
}

impl std::fmt::Display for IntegrationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An admin-configured pointer to an external storage folder plus crawl
/// parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderIntegration {
    pub id: IntegrationId,
    pub tenant_id: TenantId,
    pub name: String,
    pub external_folder_id: String,
    pub kind: IntegrationKind,
    pub max_depth: u32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl FolderIntegration {
    pub fn new(
        tenant_id: impl Into<String>,
        name: impl Into<String>,
        external_folder_id: impl Into<String>,
        kind: IntegrationKind,
    ) -> Self {
        Self {
            id: new_id(),
            tenant_id: tenant_id.into(),
            name: name.into(),
            external_folder_id: external_folder_id.into(),
            kind,
            max_depth: 3,
            active: true,
            created_at: Utc::now(),
        }
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// A leaf (non-container) file discovered by the crawler.
#[derive(Debug, Clone)]
pub struct LeafFile {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub parent_folder_id: String,
}

/// A document row in the generic searchable index. Fully overwritten on each
/// crawl; deleted when the remote file vanishes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedDocument {
    pub id: DocumentId,
    pub tenant_id: TenantId,
    pub external_file_id: String,
    pub file_name: String,
    pub mime_type: String,
    pub parent_folder_id: Option<String>,
    pub text_content: Option<String>,
    pub content_hash: String,
    pub integration_id: IntegrationId,
    pub integration_name: String,
    pub last_indexed_at: DateTime<Utc>,
}

impl IndexedDocument {
    pub fn new(
        tenant_id: impl Into<String>,
        external_file_id: impl Into<String>,
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            id: new_id(),
            tenant_id: tenant_id.into(),
            external_file_id: external_file_id.into(),
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            parent_folder_id: None,
            text_content: None,
            content_hash: String::new(),
            integration_id: String::new(),
            integration_name: String::new(),
            last_indexed_at: Utc::now(),
        }
    }

    pub fn with_integration(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.integration_id = id.into();
        self.integration_name = name.into();
        self
    }

    pub fn with_parent_folder(mut self, folder_id: impl Into<String>) -> Self {
        self.parent_folder_id = Some(folder_id.into());
        self
    }

    pub fn with_text_content(mut self, content: Option<String>) -> Self {
        self.text_content = content;
        self
    }

    pub fn with_content_hash(mut self, hash: impl Into<String>) -> Self {
        self.content_hash = hash.into();
        self
    }
}

/// Classification of a file in a minutes folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Minutes,
    Agenda,
}

impl DocumentType {
    /// Classify a file by name. Agendas are recognized by substring; anything
    /// else in a minutes folder is treated as minutes.
    pub fn classify(file_name: &str) -> Self {
        if file_name.to_lowercase().contains("agenda") {
            DocumentType::Agenda
        } else {
            DocumentType::Minutes
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Minutes => "minutes",
            DocumentType::Agenda => "agenda",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "minutes" => Some(DocumentType::Minutes),
            "agenda" => Some(DocumentType::Agenda),
            _ => None,
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Approval status of a meeting document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    #[default]
    Pending,
    Approved,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "pending",
            DocumentStatus::Approved => "approved",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(DocumentStatus::Pending),
            "approved" => Some(DocumentStatus::Approved),
            _ => None,
        }
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Confidence attached to an AI-extracted meeting date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateConfidence {
    High,
    Medium,
    Low,
}

impl DateConfidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateConfidence::High => "high",
            DateConfidence::Medium => "medium",
            DateConfidence::Low => "low",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "high" => Some(DateConfidence::High),
            "medium" => Some(DateConfidence::Medium),
            "low" => Some(DateConfidence::Low),
            _ => None,
        }
    }
}

/// A meeting document flowing through the specialized minutes pipeline.
///
/// Once `status` is `Approved`, sync never mutates content or metadata; the
/// record still counts as "seen" for staleness purposes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingDocument {
    pub id: DocumentId,
    pub tenant_id: TenantId,
    pub external_file_id: String,
    pub file_name: String,
    pub document_type: DocumentType,
    pub meeting_date: Option<NaiveDate>,
    pub meeting_month: Option<u32>,
    pub meeting_year: Option<i32>,
    pub school_year: String,
    pub text_content: Option<String>,
    pub status: DocumentStatus,
    pub summary: Option<String>,
    pub key_items: Vec<String>,
    pub action_items: Vec<String>,
    pub improvements: Option<String>,
    pub tags: Vec<String>,
    pub extracted_date: Option<NaiveDate>,
    pub date_confidence: Option<DateConfidence>,
    pub last_synced_at: DateTime<Utc>,
}

impl MeetingDocument {
    pub fn new(
        tenant_id: impl Into<String>,
        external_file_id: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        let file_name = file_name.into();
        let document_type = DocumentType::classify(&file_name);
        Self {
            id: new_id(),
            tenant_id: tenant_id.into(),
            external_file_id: external_file_id.into(),
            file_name,
            document_type,
            meeting_date: None,
            meeting_month: None,
            meeting_year: None,
            school_year: String::new(),
            text_content: None,
            status: DocumentStatus::Pending,
            summary: None,
            key_items: Vec::new(),
            action_items: Vec::new(),
            improvements: None,
            tags: Vec::new(),
            extracted_date: None,
            date_confidence: None,
            last_synced_at: Utc::now(),
        }
    }

    pub fn is_approved(&self) -> bool {
        self.status == DocumentStatus::Approved
    }

    pub fn is_enriched(&self) -> bool {
        self.summary.is_some()
    }
}

/// Format the school year containing the given calendar month and year.
/// The school year rolls over in July.
pub fn school_year(year: i32, month: u32) -> String {
    if month >= 7 {
        format!("{}-{}", year, year + 1)
    } else {
        format!("{}-{}", year - 1, year)
    }
}

/// Normalize a tag name: trimmed, lowercased, internal whitespace collapsed
/// to single hyphens.
pub fn normalize_tag_name(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// A per-tenant tag with a denormalized usage count. Usage counts are an
/// approximate signal, never negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub tenant_id: TenantId,
    pub name: String,
    pub display_name: String,
    pub usage_count: i64,
}

impl Tag {
    pub fn new(tenant_id: impl Into<String>, raw_name: &str) -> Self {
        Self {
            id: new_id(),
            tenant_id: tenant_id.into(),
            name: normalize_tag_name(raw_name),
            display_name: raw_name.trim().to_string(),
            usage_count: 0,
        }
    }
}

/// Counters returned by a generic-index crawl.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexOutcome {
    pub indexed: usize,
    pub errors: usize,
    pub deleted: usize,
}

impl IndexOutcome {
    pub fn absorb(&mut self, other: IndexOutcome) {
        self.indexed += other.indexed;
        self.errors += other.errors;
        self.deleted += other.deleted;
    }
}

/// Counters returned by a meeting-document sync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncOutcome {
    pub synced: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl SyncOutcome {
    pub fn absorb(&mut self, other: SyncOutcome) {
        self.synced += other.synced;
        self.skipped += other.skipped;
        self.errors += other.errors;
    }
}

/// Counters returned by an enrichment scheduler pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EnrichOutcome {
    pub processed: usize,
    pub errors: usize,
    pub total: usize,
}

impl EnrichOutcome {
    pub fn absorb(&mut self, other: EnrichOutcome) {
        self.processed += other.processed;
        self.errors += other.errors;
        self.total += other.total;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_document_type() {
        assert_eq!(
            DocumentType::classify("2024-03-07 Board Agenda.pdf"),
            DocumentType::Agenda
        );
        assert_eq!(
            DocumentType::classify("2024-03-07 Minutes.pdf"),
            DocumentType::Minutes
        );
        // Anything without the substring falls into the minutes pipeline.
        assert_eq!(
            DocumentType::classify("Budget notes.docx"),
            DocumentType::Minutes
        );
    }

    #[test]
    fn test_school_year_rollover() {
        assert_eq!(school_year(2024, 9), "2024-2025");
        assert_eq!(school_year(2024, 12), "2024-2025");
        assert_eq!(school_year(2025, 3), "2024-2025");
        assert_eq!(school_year(2025, 6), "2024-2025");
        assert_eq!(school_year(2025, 7), "2025-2026");
    }

    #[test]
    fn test_normalize_tag_name() {
        assert_eq!(normalize_tag_name("  Fall Carnival  "), "fall-carnival");
        assert_eq!(normalize_tag_name("Fundraising"), "fundraising");
        assert_eq!(normalize_tag_name("book   fair"), "book-fair");
    }

    #[test]
    fn test_integration_builder() {
        let integration =
            FolderIntegration::new("pta-lincoln", "Board Minutes", "folder-123", IntegrationKind::Minutes)
                .with_max_depth(2);

        assert_eq!(integration.tenant_id, "pta-lincoln");
        assert_eq!(integration.max_depth, 2);
        assert!(integration.active);
        assert!(!integration.id.is_empty());
    }
}
