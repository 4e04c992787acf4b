//! In-memory capability fakes for pipeline tests.

use anyhow::bail;
use async_trait::async_trait;
use chrono::NaiveDate;
use quorum_core::{
    DateConfidence, EnrichmentAnalysis, Enricher, FileListing, RemoteEntry, StorageBrowser,
    FOLDER_MIME_TYPE,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A scripted folder tree with configurable pagination and failure injection.
pub struct FakeBrowser {
    folders: HashMap<String, Vec<RemoteEntry>>,
    contents: HashMap<String, String>,
    page_size: usize,
    fail_listings: HashSet<String>,
    fail_exports: HashSet<String>,
    listing_calls: AtomicUsize,
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self {
            folders: HashMap::new(),
            contents: HashMap::new(),
            page_size: 100,
            fail_listings: HashSet::new(),
            fail_exports: HashSet::new(),
            listing_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size;
    }

    pub fn add_folder(&mut self, parent_id: &str, id: &str, name: &str) {
        self.folders
            .entry(parent_id.to_string())
            .or_default()
            .push(RemoteEntry {
                id: id.to_string(),
                name: name.to_string(),
                mime_type: FOLDER_MIME_TYPE.to_string(),
            });
        self.folders.entry(id.to_string()).or_default();
    }

    pub fn add_file(
        &mut self,
        parent_id: &str,
        id: &str,
        name: &str,
        mime_type: &str,
        content: Option<&str>,
    ) {
        self.folders
            .entry(parent_id.to_string())
            .or_default()
            .push(RemoteEntry {
                id: id.to_string(),
                name: name.to_string(),
                mime_type: mime_type.to_string(),
            });
        if let Some(content) = content {
            self.contents.insert(id.to_string(), content.to_string());
        }
    }

    pub fn fail_listing(&mut self, folder_id: &str) {
        self.fail_listings.insert(folder_id.to_string());
    }

    pub fn fail_export(&mut self, file_id: &str) {
        self.fail_exports.insert(file_id.to_string());
    }

    pub fn listing_calls(&self) -> usize {
        self.listing_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StorageBrowser for FakeBrowser {
    async fn list_children(
        &self,
        folder_id: &str,
        page_token: Option<&str>,
    ) -> anyhow::Result<FileListing> {
        self.listing_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_listings.contains(folder_id) {
            bail!("listing failed for folder {}", folder_id);
        }

        let entries = self.folders.get(folder_id).cloned().unwrap_or_default();
        let offset: usize = page_token.and_then(|t| t.parse().ok()).unwrap_or(0);
        let end = (offset + self.page_size).min(entries.len());

        let next_page_token = if end < entries.len() {
            Some(end.to_string())
        } else {
            None
        };

        Ok(FileListing {
            entries: entries[offset..end].to_vec(),
            next_page_token,
        })
    }

    async fn export_text(&self, file_id: &str, _mime_type: &str) -> anyhow::Result<String> {
        if self.fail_exports.contains(file_id) {
            bail!("export failed for file {}", file_id);
        }

        match self.contents.get(file_id) {
            Some(content) => Ok(content.clone()),
            None => bail!("no exportable text for file {}", file_id),
        }
    }
}

/// A scripted enricher with per-file failure injection and a call log.
pub struct FakeEnricher {
    fail_names: HashSet<String>,
    extracted_date: Option<NaiveDate>,
    date_confidence: DateConfidence,
    suggested_tags: Vec<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeEnricher {
    pub fn new() -> Self {
        Self {
            fail_names: HashSet::new(),
            extracted_date: None,
            date_confidence: DateConfidence::Low,
            suggested_tags: vec!["budget".to_string(), "events".to_string()],
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_for(&mut self, file_name: &str) {
        self.fail_names.insert(file_name.to_string());
    }

    pub fn with_extracted_date(mut self, date: NaiveDate, confidence: DateConfidence) -> Self {
        self.extracted_date = Some(date);
        self.date_confidence = confidence;
        self
    }

    pub fn with_suggested_tags(mut self, tags: &[&str]) -> Self {
        self.suggested_tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Enricher for FakeEnricher {
    async fn analyze(
        &self,
        _text: &str,
        file_name: &str,
        _known_tags: &[String],
    ) -> anyhow::Result<EnrichmentAnalysis> {
        self.calls.lock().unwrap().push(file_name.to_string());

        if self.fail_names.contains(file_name) {
            bail!("analysis failed for {}", file_name);
        }

        Ok(EnrichmentAnalysis {
            summary: format!("Summary of {}", file_name),
            key_items: vec!["budget vote".to_string()],
            action_items: vec!["follow up with treasurer".to_string()],
            improvements: None,
            suggested_tags: self.suggested_tags.clone(),
            extracted_date: self.extracted_date,
            date_confidence: self.date_confidence,
        })
    }
}
