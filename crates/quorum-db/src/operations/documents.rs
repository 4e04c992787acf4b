//! Generic index operations.
//!
//! The remote folder is authoritative: rows here are a cache, fully
//! overwritten on each crawl and pruned when the remote file vanishes.

use crate::database::Database;
use crate::error::{DbError, DbResult};
use chrono::{DateTime, Utc};
use quorum_core::IndexedDocument;
use rusqlite::params;
use std::collections::HashSet;

impl Database {
    /// Insert or fully overwrite an indexed document, keyed on
    /// (tenant_id, external_file_id).
    pub fn upsert_indexed_document(&self, doc: &IndexedDocument) -> DbResult<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO indexed_documents
                (id, tenant_id, external_file_id, file_name, mime_type, parent_folder_id,
                 text_content, content_hash, integration_id, integration_name, last_indexed_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            ON CONFLICT(tenant_id, external_file_id) DO UPDATE SET
                file_name = excluded.file_name,
                mime_type = excluded.mime_type,
                parent_folder_id = excluded.parent_folder_id,
                text_content = excluded.text_content,
                content_hash = excluded.content_hash,
                integration_id = excluded.integration_id,
                integration_name = excluded.integration_name,
                last_indexed_at = excluded.last_indexed_at
            "#,
            params![
                doc.id,
                doc.tenant_id,
                doc.external_file_id,
                doc.file_name,
                doc.mime_type,
                doc.parent_folder_id,
                doc.text_content,
                doc.content_hash,
                doc.integration_id,
                doc.integration_name,
                doc.last_indexed_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Find an indexed document by its external file ID.
    pub fn find_indexed_by_external_id(
        &self,
        tenant_id: &str,
        external_file_id: &str,
    ) -> DbResult<Option<IndexedDocument>> {
        let conn = self.conn()?;
        let result = conn.query_row(
            "SELECT id, tenant_id, external_file_id, file_name, mime_type, parent_folder_id,
                    text_content, content_hash, integration_id, integration_name, last_indexed_at
             FROM indexed_documents WHERE tenant_id = ?1 AND external_file_id = ?2",
            params![tenant_id, external_file_id],
            row_to_indexed_document,
        );

        match result {
            Ok(doc) => Ok(Some(doc)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DbError::from(e)),
        }
    }

    /// List all external file IDs currently indexed for a tenant.
    pub fn list_indexed_external_ids(&self, tenant_id: &str) -> DbResult<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT external_file_id FROM indexed_documents WHERE tenant_id = ?1")?;

        let ids = stmt.query_map(params![tenant_id], |row| row.get(0))?;
        ids.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    /// Delete every indexed document whose external file was absent from the
    /// just-crawled set. Returns the number of rows pruned.
    pub fn delete_stale_indexed(
        &self,
        tenant_id: &str,
        seen: &HashSet<String>,
    ) -> DbResult<usize> {
        let stale: Vec<String> = self
            .list_indexed_external_ids(tenant_id)?
            .into_iter()
            .filter(|id| !seen.contains(id))
            .collect();

        let conn = self.conn()?;
        let mut deleted = 0;
        for external_id in &stale {
            deleted += conn.execute(
                "DELETE FROM indexed_documents WHERE tenant_id = ?1 AND external_file_id = ?2",
                params![tenant_id, external_id],
            )?;
        }

        Ok(deleted)
    }

    /// Full-text search over the tenant's index, weighted
    /// file name > integration name > content.
    pub fn search_indexed(
        &self,
        tenant_id: &str,
        query: &str,
        limit: i64,
    ) -> DbResult<Vec<IndexedDocument>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT d.id, d.tenant_id, d.external_file_id, d.file_name, d.mime_type,
                    d.parent_folder_id, d.text_content, d.content_hash, d.integration_id,
                    d.integration_name, d.last_indexed_at
             FROM indexed_documents d
             JOIN indexed_documents_fts f ON f.rowid = d.rowid
             WHERE indexed_documents_fts MATCH ?2 AND d.tenant_id = ?1
             ORDER BY bm25(indexed_documents_fts, 10.0, 4.0, 1.0)
             LIMIT ?3",
        )?;

        let docs = stmt.query_map(params![tenant_id, query, limit], row_to_indexed_document)?;
        docs.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    /// Count a tenant's indexed documents.
    pub fn count_indexed(&self, tenant_id: &str) -> DbResult<i64> {
        let conn = self.conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM indexed_documents WHERE tenant_id = ?1",
            params![tenant_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn row_to_indexed_document(row: &rusqlite::Row<'_>) -> rusqlite::Result<IndexedDocument> {
    let last_indexed_str: String = row.get(10)?;

    Ok(IndexedDocument {
        id: row.get(0)?,
        tenant_id: row.get(1)?,
        external_file_id: row.get(2)?,
        file_name: row.get(3)?,
        mime_type: row.get(4)?,
        parent_folder_id: row.get(5)?,
        text_content: row.get(6)?,
        content_hash: row.get(7)?,
        integration_id: row.get(8)?,
        integration_name: row.get(9)?,
        last_indexed_at: DateTime::parse_from_rfc3339(&last_indexed_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}
