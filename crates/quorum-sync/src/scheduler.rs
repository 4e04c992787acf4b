//! Enrichment batch scheduler.
//!
//! Pending documents are processed in fixed-size concurrent batches with a
//! fixed pause between batches so sustained throughput stays under the AI
//! provider's rate limit. Batch K's join barrier completes before batch K+1
//! starts. Failed items are counted and left unenriched for a future pass.

use crate::error::{SyncError, SyncResult};
use futures_util::future::join_all;
use quorum_core::{
    normalize_tag_name, school_year, DateConfidence, EnrichOutcome, Enricher, MeetingDocument,
};
use quorum_db::Database;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Runs enrichment passes over newly-discovered meeting documents.
pub struct EnrichmentScheduler {
    db: Database,
    enricher: Arc<dyn Enricher>,
    batch_size: usize,
    batch_delay: Duration,
}

impl EnrichmentScheduler {
    pub fn new(
        db: Database,
        enricher: Arc<dyn Enricher>,
        batch_size: usize,
        batch_delay: Duration,
    ) -> Self {
        Self {
            db,
            enricher,
            batch_size: batch_size.max(1),
            batch_delay,
        }
    }

    /// Enrich every pending document for one tenant.
    pub async fn enrich_tenant(&self, tenant_id: &str) -> SyncResult<EnrichOutcome> {
        let pending = self.db.list_pending_enrichment(tenant_id)?;
        let mut outcome = EnrichOutcome {
            total: pending.len(),
            ..Default::default()
        };

        if pending.is_empty() {
            return Ok(outcome);
        }

        let known_tags: Vec<String> = self
            .db
            .list_tags(tenant_id)?
            .into_iter()
            .map(|t| t.name)
            .collect();

        info!(
            "Enriching {} documents for tenant {} in batches of {}",
            pending.len(),
            tenant_id,
            self.batch_size
        );

        for (batch_index, batch) in pending.chunks(self.batch_size).enumerate() {
            if batch_index > 0 {
                tokio::time::sleep(self.batch_delay).await;
            }

            let results = join_all(
                batch
                    .iter()
                    .map(|doc| self.enrich_one(doc, &known_tags)),
            )
            .await;

            for (doc, result) in batch.iter().zip(results) {
                match result {
                    Ok(()) => outcome.processed += 1,
                    Err(e) => {
                        warn!("Enrichment failed for '{}': {}", doc.file_name, e);
                        outcome.errors += 1;
                    }
                }
            }
        }

        info!(
            "Enriched tenant {}: {} processed, {} errors, {} total",
            tenant_id, outcome.processed, outcome.errors, outcome.total
        );
        Ok(outcome)
    }

    /// Scheduler driver over every tenant. Tenants run sequentially; one
    /// tenant's failure never stops the rest.
    pub async fn enrich_all_tenants(&self) -> SyncResult<EnrichOutcome> {
        let mut total = EnrichOutcome::default();

        for tenant_id in self.db.list_tenants()? {
            match self.enrich_tenant(&tenant_id).await {
                Ok(outcome) => total.absorb(outcome),
                Err(e) => {
                    error!("Enrichment failed for tenant {}: {}", tenant_id, e);
                    total.errors += 1;
                }
            }
        }

        Ok(total)
    }

    async fn enrich_one(&self, doc: &MeetingDocument, known_tags: &[String]) -> SyncResult<()> {
        let text = doc
            .text_content
            .as_deref()
            .ok_or_else(|| SyncError::Enrichment("document has no text".to_string()))?;

        let analysis = self
            .enricher
            .analyze(text, &doc.file_name, known_tags)
            .await
            .map_err(|e| SyncError::Enrichment(e.to_string()))?;

        let mut updated = doc.clone();
        updated.summary = Some(analysis.summary);
        updated.key_items = analysis.key_items;
        updated.action_items = analysis.action_items;
        updated.improvements = analysis.improvements;
        updated.extracted_date = analysis.extracted_date;
        updated.date_confidence = Some(analysis.date_confidence);

        updated.tags = Vec::new();
        for raw in &analysis.suggested_tags {
            let name = normalize_tag_name(raw);
            if !name.is_empty() && !updated.tags.contains(&name) {
                updated.tags.push(name);
            }
        }

        // A heuristic (or prior) date always wins; the AI date only fills a
        // gap, and only when the model is confident.
        if updated.meeting_date.is_none() && analysis.date_confidence == DateConfidence::High {
            if let Some(date) = analysis.extracted_date {
                use chrono::Datelike;
                updated.meeting_date = Some(date);
                updated.meeting_month = Some(date.month());
                updated.meeting_year = Some(date.year());
                updated.school_year = school_year(date.year(), date.month());
            }
        }

        self.db.update_meeting_enrichment(&updated)?;
        self.db.ensure_tags(&doc.tenant_id, &updated.tags)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::FakeEnricher;
    use chrono::NaiveDate;

    fn pending_doc(tenant: &str, n: usize) -> MeetingDocument {
        let mut doc = MeetingDocument::new(
            tenant,
            format!("file-{}", n),
            format!("Meeting {} Minutes.pdf", n),
        );
        doc.school_year = "2023-2024".to_string();
        doc.text_content = Some(format!("minutes text {}", n));
        doc
    }

    fn scheduler(db: &Database, enricher: FakeEnricher) -> EnrichmentScheduler {
        EnrichmentScheduler::new(
            db.clone(),
            Arc::new(enricher),
            5,
            Duration::from_millis(2000),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_partitioning_and_delays() {
        let db = Database::open_in_memory().unwrap();
        for n in 0..12 {
            db.create_meeting(&pending_doc("pta", n)).unwrap();
        }

        let enricher = Arc::new(FakeEnricher::new());
        let sched = EnrichmentScheduler::new(
            db.clone(),
            enricher.clone(),
            5,
            Duration::from_millis(2000),
        );

        let start = tokio::time::Instant::now();
        let outcome = sched.enrich_tenant("pta").await.unwrap();

        assert_eq!(outcome.processed, 12);
        assert_eq!(outcome.errors, 0);
        assert_eq!(outcome.total, 12);
        assert_eq!(enricher.call_count(), 12);
        // 12 items at batch size 5 -> 3 batches -> exactly 2 inter-batch delays
        assert_eq!(start.elapsed(), Duration::from_millis(4000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_delay_after_final_batch() {
        let db = Database::open_in_memory().unwrap();
        for n in 0..5 {
            db.create_meeting(&pending_doc("pta", n)).unwrap();
        }

        let start = tokio::time::Instant::now();
        scheduler(&db, FakeEnricher::new())
            .enrich_tenant("pta")
            .await
            .unwrap();

        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_partial_batch_failure() {
        let db = Database::open_in_memory().unwrap();
        for n in 0..5 {
            db.create_meeting(&pending_doc("pta", n)).unwrap();
        }

        let mut enricher = FakeEnricher::new();
        enricher.fail_for("Meeting 2 Minutes.pdf");

        let outcome = scheduler(&db, enricher).enrich_tenant("pta").await.unwrap();
        assert_eq!(outcome.processed, 4);
        assert_eq!(outcome.errors, 1);
        assert_eq!(outcome.total, 5);

        for doc in db.list_meetings("pta").unwrap() {
            if doc.file_name == "Meeting 2 Minutes.pdf" {
                assert!(doc.summary.is_none());
            } else {
                assert_eq!(
                    doc.summary.as_deref(),
                    Some(format!("Summary of {}", doc.file_name).as_str())
                );
            }
        }
    }

    #[tokio::test]
    async fn test_failed_items_retry_on_next_pass() {
        let db = Database::open_in_memory().unwrap();
        for n in 0..3 {
            db.create_meeting(&pending_doc("pta", n)).unwrap();
        }

        let mut enricher = FakeEnricher::new();
        enricher.fail_for("Meeting 1 Minutes.pdf");
        scheduler(&db, enricher).enrich_tenant("pta").await.unwrap();

        // The failed item is the only one still pending
        let outcome = scheduler(&db, FakeEnricher::new())
            .enrich_tenant("pta")
            .await
            .unwrap();
        assert_eq!(outcome.total, 1);
        assert_eq!(outcome.processed, 1);
    }

    #[tokio::test]
    async fn test_suggested_tags_feed_the_ledger() {
        let db = Database::open_in_memory().unwrap();
        db.create_meeting(&pending_doc("pta", 0)).unwrap();
        db.create_meeting(&pending_doc("pta", 1)).unwrap();

        let enricher = FakeEnricher::new().with_suggested_tags(&["Budget", "book fair"]);
        scheduler(&db, enricher).enrich_tenant("pta").await.unwrap();

        let budget = db.get_tag_by_name("pta", "budget").unwrap().unwrap();
        assert_eq!(budget.usage_count, 2);
        let fair = db.get_tag_by_name("pta", "book-fair").unwrap().unwrap();
        assert_eq!(fair.usage_count, 2);

        let doc = db.find_meeting_by_external_id("pta", "file-0").unwrap().unwrap();
        assert_eq!(doc.tags, vec!["budget", "book-fair"]);
    }

    #[tokio::test]
    async fn test_high_confidence_date_fills_gap_only() {
        let db = Database::open_in_memory().unwrap();

        // Document with no heuristic date
        db.create_meeting(&pending_doc("pta", 0)).unwrap();

        // Document that already carries a heuristic date
        let mut dated = pending_doc("pta", 1);
        dated.meeting_date = NaiveDate::from_ymd_opt(2024, 3, 7);
        dated.meeting_month = Some(3);
        dated.meeting_year = Some(2024);
        db.create_meeting(&dated).unwrap();

        let ai_date = NaiveDate::from_ymd_opt(2023, 11, 2).unwrap();
        let enricher = FakeEnricher::new().with_extracted_date(ai_date, DateConfidence::High);
        scheduler(&db, enricher).enrich_tenant("pta").await.unwrap();

        let filled = db.find_meeting_by_external_id("pta", "file-0").unwrap().unwrap();
        assert_eq!(filled.meeting_date, Some(ai_date));
        assert_eq!(filled.school_year, "2023-2024");

        let kept = db.find_meeting_by_external_id("pta", "file-1").unwrap().unwrap();
        assert_eq!(kept.meeting_date, NaiveDate::from_ymd_opt(2024, 3, 7));
    }

    #[tokio::test]
    async fn test_low_confidence_date_never_applied() {
        let db = Database::open_in_memory().unwrap();
        db.create_meeting(&pending_doc("pta", 0)).unwrap();

        let ai_date = NaiveDate::from_ymd_opt(2023, 11, 2).unwrap();
        let enricher = FakeEnricher::new().with_extracted_date(ai_date, DateConfidence::Medium);
        scheduler(&db, enricher).enrich_tenant("pta").await.unwrap();

        let doc = db.find_meeting_by_external_id("pta", "file-0").unwrap().unwrap();
        assert!(doc.meeting_date.is_none());
        // The extraction itself is still recorded
        assert_eq!(doc.extracted_date, Some(ai_date));
        assert_eq!(doc.date_confidence, Some(DateConfidence::Medium));
    }

    #[tokio::test]
    async fn test_empty_tenant_short_circuits() {
        let db = Database::open_in_memory().unwrap();
        let enricher = FakeEnricher::new();
        let outcome = scheduler(&db, enricher).enrich_tenant("pta").await.unwrap();
        assert_eq!(outcome, EnrichOutcome::default());
    }
}
