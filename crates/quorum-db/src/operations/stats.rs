//! Tenant statistics queries.

use crate::database::Database;
use crate::error::DbResult;
use quorum_core::DocumentStatus;
use rusqlite::params;

/// Aggregate counts for one tenant.
#[derive(Debug, Clone, Default)]
pub struct TenantStats {
    pub integrations: i64,
    pub indexed_documents: i64,
    pub meeting_documents: i64,
    pub approved_meetings: i64,
    pub pending_enrichment: i64,
    pub tags: i64,
}

impl Database {
    /// Collect aggregate counts for a tenant.
    pub fn tenant_stats(&self, tenant_id: &str) -> DbResult<TenantStats> {
        let conn = self.conn()?;

        let integrations: i64 = conn.query_row(
            "SELECT COUNT(*) FROM folder_integrations WHERE tenant_id = ?1",
            params![tenant_id],
            |row| row.get(0),
        )?;

        let pending_enrichment: i64 = conn.query_row(
            "SELECT COUNT(*) FROM meeting_documents
             WHERE tenant_id = ?1 AND summary IS NULL AND text_content IS NOT NULL",
            params![tenant_id],
            |row| row.get(0),
        )?;

        let tags: i64 = conn.query_row(
            "SELECT COUNT(*) FROM tags WHERE tenant_id = ?1",
            params![tenant_id],
            |row| row.get(0),
        )?;

        drop(conn);

        Ok(TenantStats {
            integrations,
            indexed_documents: self.count_indexed(tenant_id)?,
            meeting_documents: self.count_meetings(tenant_id, None)?,
            approved_meetings: self.count_meetings(tenant_id, Some(DocumentStatus::Approved))?,
            pending_enrichment,
            tags,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quorum_core::{FolderIntegration, IntegrationKind, MeetingDocument};

    #[test]
    fn test_tenant_stats() {
        let db = Database::open_in_memory().unwrap();

        db.create_integration(&FolderIntegration::new(
            "pta",
            "Minutes",
            "folder-1",
            IntegrationKind::Minutes,
        ))
        .unwrap();

        let mut doc = MeetingDocument::new("pta", "file-1", "Minutes.pdf");
        doc.school_year = "2023-2024".to_string();
        doc.text_content = Some("text".to_string());
        db.create_meeting(&doc).unwrap();

        db.ensure_tags("pta", &["budget".to_string()]).unwrap();

        let stats = db.tenant_stats("pta").unwrap();
        assert_eq!(stats.integrations, 1);
        assert_eq!(stats.meeting_documents, 1);
        assert_eq!(stats.pending_enrichment, 1);
        assert_eq!(stats.tags, 1);
        assert_eq!(stats.indexed_documents, 0);
    }
}
