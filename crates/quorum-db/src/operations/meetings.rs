//! Meeting document operations.
//!
//! Meeting documents are never auto-pruned. An approved record's content and
//! metadata are frozen; only explicit user actions (approve, remove) change
//! its lifecycle.

use crate::database::Database;
use crate::error::{DbError, DbResult};
use chrono::{DateTime, NaiveDate, Utc};
use quorum_core::{DateConfidence, DocumentStatus, DocumentType, MeetingDocument};
use rusqlite::params;

impl Database {
    /// Create a new meeting document.
    pub fn create_meeting(&self, doc: &MeetingDocument) -> DbResult<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO meeting_documents
                (id, tenant_id, external_file_id, file_name, document_type, meeting_date,
                 meeting_month, meeting_year, school_year, text_content, status, summary,
                 key_items, action_items, improvements, tags, extracted_date, date_confidence,
                 last_synced_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)
            "#,
            params![
                doc.id,
                doc.tenant_id,
                doc.external_file_id,
                doc.file_name,
                doc.document_type.as_str(),
                doc.meeting_date.map(|d| d.to_string()),
                doc.meeting_month,
                doc.meeting_year,
                doc.school_year,
                doc.text_content,
                doc.status.as_str(),
                doc.summary,
                serde_json::to_string(&doc.key_items)?,
                serde_json::to_string(&doc.action_items)?,
                doc.improvements,
                serde_json::to_string(&doc.tags)?,
                doc.extracted_date.map(|d| d.to_string()),
                doc.date_confidence.map(|c| c.as_str()),
                doc.last_synced_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get a meeting document by ID.
    pub fn get_meeting(&self, id: &str) -> DbResult<MeetingDocument> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("{} WHERE id = ?1", SELECT_MEETING),
            params![id],
            row_to_meeting,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                DbError::NotFound(format!("Meeting document not found: {}", id))
            }
            _ => DbError::from(e),
        })
    }

    /// Find a meeting document by its external file ID.
    pub fn find_meeting_by_external_id(
        &self,
        tenant_id: &str,
        external_file_id: &str,
    ) -> DbResult<Option<MeetingDocument>> {
        let conn = self.conn()?;
        let result = conn.query_row(
            &format!(
                "{} WHERE tenant_id = ?1 AND external_file_id = ?2",
                SELECT_MEETING
            ),
            params![tenant_id, external_file_id],
            row_to_meeting,
        );

        match result {
            Ok(doc) => Ok(Some(doc)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DbError::from(e)),
        }
    }

    /// Overwrite the crawl-derived fields of an existing meeting document.
    /// Status and enrichment fields are left untouched.
    pub fn update_meeting_from_sync(&self, doc: &MeetingDocument) -> DbResult<()> {
        let conn = self.conn()?;
        let rows = conn.execute(
            r#"
            UPDATE meeting_documents
            SET file_name = ?2, document_type = ?3, meeting_date = ?4, meeting_month = ?5,
                meeting_year = ?6, school_year = ?7, text_content = ?8, last_synced_at = ?9
            WHERE id = ?1
            "#,
            params![
                doc.id,
                doc.file_name,
                doc.document_type.as_str(),
                doc.meeting_date.map(|d| d.to_string()),
                doc.meeting_month,
                doc.meeting_year,
                doc.school_year,
                doc.text_content,
                doc.last_synced_at.to_rfc3339(),
            ],
        )?;

        if rows == 0 {
            return Err(DbError::NotFound(format!(
                "Meeting document not found: {}",
                doc.id
            )));
        }

        Ok(())
    }

    /// Write the enrichment fields of a meeting document in place.
    pub fn update_meeting_enrichment(&self, doc: &MeetingDocument) -> DbResult<()> {
        let conn = self.conn()?;
        let rows = conn.execute(
            r#"
            UPDATE meeting_documents
            SET summary = ?2, key_items = ?3, action_items = ?4, improvements = ?5, tags = ?6,
                extracted_date = ?7, date_confidence = ?8, meeting_date = ?9, meeting_month = ?10,
                meeting_year = ?11, school_year = ?12
            WHERE id = ?1
            "#,
            params![
                doc.id,
                doc.summary,
                serde_json::to_string(&doc.key_items)?,
                serde_json::to_string(&doc.action_items)?,
                doc.improvements,
                serde_json::to_string(&doc.tags)?,
                doc.extracted_date.map(|d| d.to_string()),
                doc.date_confidence.map(|c| c.as_str()),
                doc.meeting_date.map(|d| d.to_string()),
                doc.meeting_month,
                doc.meeting_year,
                doc.school_year,
            ],
        )?;

        if rows == 0 {
            return Err(DbError::NotFound(format!(
                "Meeting document not found: {}",
                doc.id
            )));
        }

        Ok(())
    }

    /// Replace a meeting document's tag list.
    pub fn update_meeting_tags(&self, id: &str, tags: &[String]) -> DbResult<()> {
        let conn = self.conn()?;
        let rows = conn.execute(
            "UPDATE meeting_documents SET tags = ?2 WHERE id = ?1",
            params![id, serde_json::to_string(tags)?],
        )?;

        if rows == 0 {
            return Err(DbError::NotFound(format!(
                "Meeting document not found: {}",
                id
            )));
        }

        Ok(())
    }

    /// Set a meeting document's approval status.
    pub fn set_meeting_status(&self, id: &str, status: DocumentStatus) -> DbResult<()> {
        let conn = self.conn()?;
        let rows = conn.execute(
            "UPDATE meeting_documents SET status = ?2 WHERE id = ?1",
            params![id, status.as_str()],
        )?;

        if rows == 0 {
            return Err(DbError::NotFound(format!(
                "Meeting document not found: {}",
                id
            )));
        }

        Ok(())
    }

    /// Delete a meeting document. This is the only deletion path; sync never
    /// removes meeting documents.
    pub fn delete_meeting(&self, id: &str) -> DbResult<()> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM meeting_documents WHERE id = ?1", params![id])?;

        if rows == 0 {
            return Err(DbError::NotFound(format!(
                "Meeting document not found: {}",
                id
            )));
        }

        Ok(())
    }

    /// List a tenant's meeting documents, newest school year first.
    pub fn list_meetings(&self, tenant_id: &str) -> DbResult<Vec<MeetingDocument>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE tenant_id = ?1 ORDER BY school_year DESC, meeting_date DESC",
            SELECT_MEETING
        ))?;

        let docs = stmt.query_map(params![tenant_id], row_to_meeting)?;
        docs.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    /// List meeting documents awaiting enrichment: no summary yet, and text
    /// was extractable. Ordered by sync time so older discoveries go first.
    pub fn list_pending_enrichment(&self, tenant_id: &str) -> DbResult<Vec<MeetingDocument>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE tenant_id = ?1 AND summary IS NULL AND text_content IS NOT NULL
             ORDER BY last_synced_at",
            SELECT_MEETING
        ))?;

        let docs = stmt.query_map(params![tenant_id], row_to_meeting)?;
        docs.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    /// Count meeting documents for a tenant, optionally by status.
    pub fn count_meetings(&self, tenant_id: &str, status: Option<DocumentStatus>) -> DbResult<i64> {
        let conn = self.conn()?;
        let count = match status {
            Some(s) => conn.query_row(
                "SELECT COUNT(*) FROM meeting_documents WHERE tenant_id = ?1 AND status = ?2",
                params![tenant_id, s.as_str()],
                |row| row.get(0),
            )?,
            None => conn.query_row(
                "SELECT COUNT(*) FROM meeting_documents WHERE tenant_id = ?1",
                params![tenant_id],
                |row| row.get(0),
            )?,
        };
        Ok(count)
    }
}

const SELECT_MEETING: &str = "SELECT id, tenant_id, external_file_id, file_name, document_type, \
     meeting_date, meeting_month, meeting_year, school_year, text_content, status, summary, \
     key_items, action_items, improvements, tags, extracted_date, date_confidence, last_synced_at \
     FROM meeting_documents";

fn row_to_meeting(row: &rusqlite::Row<'_>) -> rusqlite::Result<MeetingDocument> {
    let document_type_str: String = row.get(4)?;
    let meeting_date_str: Option<String> = row.get(5)?;
    let status_str: String = row.get(10)?;
    let key_items_str: String = row.get(12)?;
    let action_items_str: String = row.get(13)?;
    let tags_str: String = row.get(15)?;
    let extracted_date_str: Option<String> = row.get(16)?;
    let confidence_str: Option<String> = row.get(17)?;
    let last_synced_str: String = row.get(18)?;

    Ok(MeetingDocument {
        id: row.get(0)?,
        tenant_id: row.get(1)?,
        external_file_id: row.get(2)?,
        file_name: row.get(3)?,
        document_type: DocumentType::from_str(&document_type_str).unwrap_or(DocumentType::Minutes),
        meeting_date: meeting_date_str.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
        meeting_month: row.get(6)?,
        meeting_year: row.get(7)?,
        school_year: row.get(8)?,
        text_content: row.get(9)?,
        status: DocumentStatus::from_str(&status_str).unwrap_or(DocumentStatus::Pending),
        summary: row.get(11)?,
        key_items: serde_json::from_str(&key_items_str).unwrap_or_default(),
        action_items: serde_json::from_str(&action_items_str).unwrap_or_default(),
        improvements: row.get(14)?,
        tags: serde_json::from_str(&tags_str).unwrap_or_default(),
        extracted_date: extracted_date_str
            .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
        date_confidence: confidence_str.and_then(|s| DateConfidence::from_str(&s)),
        last_synced_at: DateTime::parse_from_rfc3339(&last_synced_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_meeting(tenant: &str, external_id: &str) -> MeetingDocument {
        let mut doc = MeetingDocument::new(tenant, external_id, "2024-03-07 Minutes.pdf");
        doc.meeting_date = NaiveDate::from_ymd_opt(2024, 3, 7);
        doc.meeting_month = Some(3);
        doc.meeting_year = Some(2024);
        doc.school_year = "2023-2024".to_string();
        doc.text_content = Some("Call to order at 7pm".to_string());
        doc
    }

    #[test]
    fn test_meeting_roundtrip() {
        let db = Database::open_in_memory().unwrap();

        let mut doc = sample_meeting("pta", "file-1");
        doc.key_items = vec!["budget vote".to_string(), "carnival planning".to_string()];
        doc.tags = vec!["fundraising".to_string()];
        db.create_meeting(&doc).unwrap();

        let fetched = db.get_meeting(&doc.id).unwrap();
        assert_eq!(fetched.document_type, DocumentType::Minutes);
        assert_eq!(fetched.meeting_date, NaiveDate::from_ymd_opt(2024, 3, 7));
        assert_eq!(fetched.key_items.len(), 2);
        assert_eq!(fetched.tags, vec!["fundraising"]);
        assert_eq!(fetched.status, DocumentStatus::Pending);
    }

    #[test]
    fn test_sync_update_preserves_enrichment() {
        let db = Database::open_in_memory().unwrap();

        let mut doc = sample_meeting("pta", "file-1");
        db.create_meeting(&doc).unwrap();

        doc.summary = Some("A productive meeting.".to_string());
        doc.tags = vec!["budget".to_string()];
        db.update_meeting_enrichment(&doc).unwrap();

        // Re-sync with new content; summary and tags must survive
        doc.text_content = Some("Amended minutes text".to_string());
        db.update_meeting_from_sync(&doc).unwrap();

        let fetched = db.get_meeting(&doc.id).unwrap();
        assert_eq!(fetched.summary.as_deref(), Some("A productive meeting."));
        assert_eq!(fetched.tags, vec!["budget"]);
        assert_eq!(fetched.text_content.as_deref(), Some("Amended minutes text"));
    }

    #[test]
    fn test_pending_enrichment_requires_text() {
        let db = Database::open_in_memory().unwrap();

        let with_text = sample_meeting("pta", "file-1");
        db.create_meeting(&with_text).unwrap();

        let mut no_text = sample_meeting("pta", "file-2");
        no_text.text_content = None;
        db.create_meeting(&no_text).unwrap();

        let mut enriched = sample_meeting("pta", "file-3");
        enriched.summary = Some("done".to_string());
        db.create_meeting(&enriched).unwrap();

        let pending = db.list_pending_enrichment("pta").unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].external_file_id, "file-1");
    }

    #[test]
    fn test_status_and_delete() {
        let db = Database::open_in_memory().unwrap();

        let doc = sample_meeting("pta", "file-1");
        db.create_meeting(&doc).unwrap();

        db.set_meeting_status(&doc.id, DocumentStatus::Approved)
            .unwrap();
        assert!(db.get_meeting(&doc.id).unwrap().is_approved());
        assert_eq!(
            db.count_meetings("pta", Some(DocumentStatus::Approved))
                .unwrap(),
            1
        );

        db.delete_meeting(&doc.id).unwrap();
        assert!(db.get_meeting(&doc.id).is_err());
    }
}
