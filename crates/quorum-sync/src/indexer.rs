//! Index upsert engine.
//!
//! Walks every active integration for a tenant, upserts the generic index
//! keyed on (tenant, external file ID), and prunes records whose remote file
//! vanished. The meeting-document path runs the same crawl but protects
//! approved records and never auto-deletes.

use crate::crawler;
use crate::error::SyncResult;
use crate::extract;
use crate::metadata;
use chrono::{Datelike, Utc};
use quorum_core::{
    school_year, DocumentType, FolderIntegration, IndexOutcome, IndexedDocument, IntegrationKind,
    LeafFile, MeetingDocument, StorageBrowser, SyncOutcome,
};
use quorum_db::Database;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Crawls tenant folders into the local index.
pub struct Indexer {
    db: Database,
    browser: Arc<dyn StorageBrowser>,
    max_content_chars: usize,
}

impl Indexer {
    pub fn new(db: Database, browser: Arc<dyn StorageBrowser>, max_content_chars: usize) -> Self {
        Self {
            db,
            browser,
            max_content_chars,
        }
    }

    /// Crawl every active integration for one tenant into the generic index,
    /// then prune records whose remote file was absent from the crawl.
    pub async fn index_tenant(&self, tenant_id: &str) -> SyncResult<IndexOutcome> {
        let integrations = self.db.list_active_integrations(tenant_id)?;
        let mut outcome = IndexOutcome::default();

        if integrations.is_empty() {
            info!("No active integrations for tenant {}", tenant_id);
            return Ok(outcome);
        }

        let mut seen: HashSet<String> = HashSet::new();
        let mut failed_integrations = 0;

        for integration in &integrations {
            let files = match crawler::crawl(
                self.browser.as_ref(),
                &integration.external_folder_id,
                integration.max_depth,
            )
            .await
            {
                Ok(files) => files,
                Err(e) => {
                    warn!("Integration '{}' failed: {}", integration.name, e);
                    outcome.errors += 1;
                    failed_integrations += 1;
                    continue;
                }
            };

            for file in files {
                seen.insert(file.id.clone());
                match self.index_file(tenant_id, integration, &file).await {
                    Ok(()) => outcome.indexed += 1,
                    Err(e) => {
                        warn!("Failed to index '{}': {}", file.name, e);
                        outcome.errors += 1;
                    }
                }
            }
        }

        // The remote folder is authoritative; anything it no longer lists is
        // pruned. A run in which nothing listed successfully observed nothing,
        // so it must not prune.
        if failed_integrations < integrations.len() {
            outcome.deleted = self.db.delete_stale_indexed(tenant_id, &seen)?;
        } else {
            warn!(
                "Every integration failed for tenant {}; skipping staleness pruning",
                tenant_id
            );
        }

        info!(
            "Indexed tenant {}: {} indexed, {} errors, {} deleted",
            tenant_id, outcome.indexed, outcome.errors, outcome.deleted
        );
        Ok(outcome)
    }

    /// Run the meeting-document pipeline for one tenant: minutes-kind
    /// integrations only, agendas excluded, approved records protected.
    pub async fn sync_tenant(&self, tenant_id: &str) -> SyncResult<SyncOutcome> {
        let integrations: Vec<FolderIntegration> = self
            .db
            .list_active_integrations(tenant_id)?
            .into_iter()
            .filter(|i| i.kind == IntegrationKind::Minutes)
            .collect();

        let mut outcome = SyncOutcome::default();

        if integrations.is_empty() {
            info!("No active minutes integrations for tenant {}", tenant_id);
            return Ok(outcome);
        }

        for integration in &integrations {
            let files = match crawler::crawl(
                self.browser.as_ref(),
                &integration.external_folder_id,
                integration.max_depth,
            )
            .await
            {
                Ok(files) => files,
                Err(e) => {
                    warn!("Integration '{}' failed: {}", integration.name, e);
                    outcome.errors += 1;
                    continue;
                }
            };

            for file in files {
                if DocumentType::classify(&file.name) == DocumentType::Agenda {
                    debug!("Skipping agenda '{}'", file.name);
                    outcome.skipped += 1;
                    continue;
                }

                match self.sync_file(tenant_id, &file).await {
                    Ok(true) => outcome.synced += 1,
                    Ok(false) => outcome.skipped += 1,
                    Err(e) => {
                        warn!("Failed to sync '{}': {}", file.name, e);
                        outcome.errors += 1;
                    }
                }
            }
        }

        info!(
            "Synced tenant {}: {} synced, {} skipped, {} errors",
            tenant_id, outcome.synced, outcome.skipped, outcome.errors
        );
        Ok(outcome)
    }

    /// Generic-index drivers over every tenant with an active integration.
    /// Tenants run sequentially; one tenant's failure never stops the rest.
    pub async fn index_all_tenants(&self) -> SyncResult<IndexOutcome> {
        let mut total = IndexOutcome::default();

        for tenant_id in self.db.list_tenants()? {
            match self.index_tenant(&tenant_id).await {
                Ok(outcome) => total.absorb(outcome),
                Err(e) => {
                    error!("Indexing failed for tenant {}: {}", tenant_id, e);
                    total.errors += 1;
                }
            }
        }

        Ok(total)
    }

    /// Meeting-pipeline driver over every tenant.
    pub async fn sync_all_tenants(&self) -> SyncResult<SyncOutcome> {
        let mut total = SyncOutcome::default();

        for tenant_id in self.db.list_tenants()? {
            match self.sync_tenant(&tenant_id).await {
                Ok(outcome) => total.absorb(outcome),
                Err(e) => {
                    error!("Sync failed for tenant {}: {}", tenant_id, e);
                    total.errors += 1;
                }
            }
        }

        Ok(total)
    }

    async fn index_file(
        &self,
        tenant_id: &str,
        integration: &FolderIntegration,
        file: &LeafFile,
    ) -> SyncResult<()> {
        let text = extract::extract_text(
            self.browser.as_ref(),
            &file.id,
            &file.mime_type,
            self.max_content_chars,
        )
        .await;

        let hash = content_hash(file, text.as_deref());

        if let Some(existing) = self.db.find_indexed_by_external_id(tenant_id, &file.id)? {
            if existing.content_hash == hash {
                debug!("'{}' unchanged, skipping write", file.name);
                return Ok(());
            }
        }

        let doc = IndexedDocument::new(tenant_id, &file.id, &file.name, &file.mime_type)
            .with_parent_folder(&file.parent_folder_id)
            .with_integration(&integration.id, &integration.name)
            .with_text_content(text)
            .with_content_hash(hash);

        self.db.upsert_indexed_document(&doc)?;
        Ok(())
    }

    /// Returns `Ok(true)` if the document was written, `Ok(false)` if it was
    /// skipped because an approved record already holds this external ID.
    async fn sync_file(&self, tenant_id: &str, file: &LeafFile) -> SyncResult<bool> {
        let existing = self.db.find_meeting_by_external_id(tenant_id, &file.id)?;

        if let Some(ref doc) = existing {
            if doc.is_approved() {
                debug!("'{}' is approved, leaving untouched", file.name);
                return Ok(false);
            }
        }

        let text = extract::extract_text(
            self.browser.as_ref(),
            &file.id,
            &file.mime_type,
            self.max_content_chars,
        )
        .await;

        let parsed = metadata::parse_meeting_date(&file.name, text.as_deref());
        let now = Utc::now();

        let is_update = existing.is_some();
        let mut doc = existing
            .unwrap_or_else(|| MeetingDocument::new(tenant_id, &file.id, &file.name));

        doc.file_name = file.name.clone();
        doc.document_type = DocumentType::classify(&file.name);
        doc.text_content = text;
        doc.last_synced_at = now;

        // Heuristic values win; a prior value (possibly AI-derived) is only
        // kept when the heuristics found nothing.
        if !parsed.is_empty() {
            doc.meeting_date = parsed.date;
            doc.meeting_month = parsed.month;
            doc.meeting_year = parsed.year;
        }

        doc.school_year = match (doc.meeting_year, doc.meeting_month) {
            (Some(year), Some(month)) => school_year(year, month),
            _ => school_year(now.year(), now.month()),
        };

        if is_update {
            self.db.update_meeting_from_sync(&doc)?;
        } else {
            self.db.create_meeting(&doc)?;
        }

        Ok(true)
    }
}

fn content_hash(file: &LeafFile, text: Option<&str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(file.name.as_bytes());
    hasher.update(file.mime_type.as_bytes());
    if let Some(text) = text {
        hasher.update(text.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}
