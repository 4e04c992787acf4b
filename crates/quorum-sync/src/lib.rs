//! Quorum Sync - External document ingestion and enrichment pipeline.
//!
//! This crate provides:
//! - Bounded recursive crawling of cloud drive folders
//! - Heuristic meeting-date extraction from file names and content
//! - Per-MIME-type text extraction with size capping
//! - Idempotent index upserts with staleness pruning
//! - The rate-limited enrichment batch scheduler

mod crawler;
mod error;
mod extract;
mod indexer;
mod metadata;
mod scheduler;

#[cfg(test)]
pub(crate) mod fakes;

pub use crawler::crawl;
pub use error::{SyncError, SyncResult};
pub use extract::extract_text;
pub use indexer::Indexer;
pub use metadata::{parse_meeting_date, ParsedMeetingDate};
pub use scheduler::EnrichmentScheduler;
