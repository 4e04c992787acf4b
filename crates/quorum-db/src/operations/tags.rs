//! Tag ledger operations.
//!
//! Usage counts are a denormalized, eventually-consistent signal. Races on
//! first use are resolved by treating a losing insert as "someone else
//! already created it" and retrying the increment.

use crate::database::Database;
use crate::error::{DbError, DbResult};
use quorum_core::{normalize_tag_name, new_id, Tag};
use rusqlite::params;
use tracing::debug;

impl Database {
    /// Ensure each named tag exists, incrementing its usage count. Names are
    /// normalized; blanks are ignored.
    pub fn ensure_tags(&self, tenant_id: &str, names: &[String]) -> DbResult<()> {
        let conn = self.conn()?;

        for raw in names {
            let name = normalize_tag_name(raw);
            if name.is_empty() {
                continue;
            }

            let updated = conn.execute(
                "UPDATE tags SET usage_count = usage_count + 1 WHERE tenant_id = ?1 AND name = ?2",
                params![tenant_id, name],
            )?;
            if updated > 0 {
                continue;
            }

            let insert = conn.execute(
                "INSERT INTO tags (id, tenant_id, name, display_name, usage_count) VALUES (?1, ?2, ?3, ?4, 1)",
                params![new_id(), tenant_id, name, raw.trim()],
            );

            match insert {
                Ok(_) => {}
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    // Lost the insert race; the winner's row takes the increment.
                    debug!("Tag '{}' created concurrently, incrementing instead", name);
                    conn.execute(
                        "UPDATE tags SET usage_count = usage_count + 1 WHERE tenant_id = ?1 AND name = ?2",
                        params![tenant_id, name],
                    )?;
                }
                Err(e) => return Err(DbError::from(e)),
            }
        }

        Ok(())
    }

    /// Decrement each named tag's usage count, floored at zero. Unknown names
    /// are ignored.
    pub fn decrement_tags(&self, tenant_id: &str, names: &[String]) -> DbResult<()> {
        let conn = self.conn()?;

        for raw in names {
            let name = normalize_tag_name(raw);
            if name.is_empty() {
                continue;
            }

            conn.execute(
                "UPDATE tags SET usage_count = MAX(usage_count - 1, 0)
                 WHERE tenant_id = ?1 AND name = ?2",
                params![tenant_id, name],
            )?;
        }

        Ok(())
    }

    /// Get a tag by ID.
    pub fn get_tag(&self, id: &str) -> DbResult<Tag> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, tenant_id, name, display_name, usage_count FROM tags WHERE id = ?1",
            params![id],
            row_to_tag,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                DbError::NotFound(format!("Tag not found: {}", id))
            }
            _ => DbError::from(e),
        })
    }

    /// Get a tag by normalized name.
    pub fn get_tag_by_name(&self, tenant_id: &str, name: &str) -> DbResult<Option<Tag>> {
        let conn = self.conn()?;
        let result = conn.query_row(
            "SELECT id, tenant_id, name, display_name, usage_count FROM tags
             WHERE tenant_id = ?1 AND name = ?2",
            params![tenant_id, normalize_tag_name(name)],
            row_to_tag,
        );

        match result {
            Ok(tag) => Ok(Some(tag)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DbError::from(e)),
        }
    }

    /// List a tenant's tags, ordered by name.
    pub fn list_tags(&self, tenant_id: &str) -> DbResult<Vec<Tag>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, tenant_id, name, display_name, usage_count FROM tags
             WHERE tenant_id = ?1 ORDER BY name",
        )?;

        let tags = stmt.query_map(params![tenant_id], row_to_tag)?;
        tags.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    /// Delete a tag by ID.
    pub fn delete_tag(&self, id: &str) -> DbResult<()> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM tags WHERE id = ?1", params![id])?;

        if rows == 0 {
            return Err(DbError::NotFound(format!("Tag not found: {}", id)));
        }

        Ok(())
    }

    /// Merge the source tag into the target: every meeting document carrying
    /// the source name is rewritten to carry the target name exactly once,
    /// the source's usage count is added onto the target, and the source row
    /// is deleted. Returns the number of documents touched.
    ///
    /// No cross-table transaction is taken; re-running after a partial
    /// completion converges to the same state.
    pub fn merge_tags(&self, tenant_id: &str, source_id: &str, target_id: &str) -> DbResult<usize> {
        if source_id == target_id {
            return Err(DbError::Other(
                "Cannot merge a tag into itself".to_string(),
            ));
        }

        let source = self.get_tag(source_id)?;
        let target = self.get_tag(target_id)?;

        if source.tenant_id != tenant_id || target.tenant_id != tenant_id {
            return Err(DbError::Other(format!(
                "Tags do not belong to tenant {}",
                tenant_id
            )));
        }

        let mut touched = 0;
        for doc in self.list_meetings(tenant_id)? {
            if !doc.tags.iter().any(|t| t == &source.name) {
                continue;
            }

            let mut tags: Vec<String> = doc
                .tags
                .iter()
                .filter(|t| *t != &source.name)
                .cloned()
                .collect();
            if !tags.iter().any(|t| t == &target.name) {
                tags.push(target.name.clone());
            }

            self.update_meeting_tags(&doc.id, &tags)?;
            touched += 1;
        }

        let conn = self.conn()?;
        conn.execute(
            "UPDATE tags SET usage_count = usage_count + ?2 WHERE id = ?1",
            params![target.id, source.usage_count],
        )?;
        conn.execute("DELETE FROM tags WHERE id = ?1", params![source.id])?;

        Ok(touched)
    }
}

fn row_to_tag(row: &rusqlite::Row<'_>) -> rusqlite::Result<Tag> {
    Ok(Tag {
        id: row.get(0)?,
        tenant_id: row.get(1)?,
        name: row.get(2)?,
        display_name: row.get(3)?,
        usage_count: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use quorum_core::MeetingDocument;

    fn tag_names(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_ensure_creates_then_increments() {
        let db = Database::open_in_memory().unwrap();

        db.ensure_tags("pta", &tag_names(&["Fundraising"])).unwrap();
        db.ensure_tags("pta", &tag_names(&["fundraising"])).unwrap();

        let tag = db.get_tag_by_name("pta", "fundraising").unwrap().unwrap();
        assert_eq!(tag.usage_count, 2);
        assert_eq!(tag.display_name, "Fundraising");
    }

    #[test]
    fn test_decrement_floors_at_zero() {
        let db = Database::open_in_memory().unwrap();

        db.ensure_tags("pta", &tag_names(&["budget"])).unwrap();
        db.decrement_tags("pta", &tag_names(&["budget"])).unwrap();
        db.decrement_tags("pta", &tag_names(&["budget"])).unwrap();

        let tag = db.get_tag_by_name("pta", "budget").unwrap().unwrap();
        assert_eq!(tag.usage_count, 0);
    }

    #[test]
    fn test_tags_are_tenant_scoped() {
        let db = Database::open_in_memory().unwrap();

        db.ensure_tags("pta", &tag_names(&["events"])).unwrap();
        db.ensure_tags("boosters", &tag_names(&["events"])).unwrap();
        db.ensure_tags("boosters", &tag_names(&["events"])).unwrap();

        assert_eq!(
            db.get_tag_by_name("pta", "events").unwrap().unwrap().usage_count,
            1
        );
        assert_eq!(
            db.get_tag_by_name("boosters", "events")
                .unwrap()
                .unwrap()
                .usage_count,
            2
        );
    }

    #[test]
    fn test_merge_tags() {
        let db = Database::open_in_memory().unwrap();

        // Source tag used 3 times, target 10
        db.ensure_tags("pta", &tag_names(&["fall-carnival", "fall-carnival", "fall-carnival"]))
            .unwrap();
        for _ in 0..10 {
            db.ensure_tags("pta", &tag_names(&["fundraising"])).unwrap();
        }

        // Five documents carry the source tag; two already carry the target
        for i in 0..5 {
            let mut doc =
                MeetingDocument::new("pta", format!("file-{}", i), "2024-03-07 Minutes.pdf");
            doc.school_year = "2023-2024".to_string();
            doc.tags = if i < 2 {
                tag_names(&["fall-carnival", "fundraising"])
            } else {
                tag_names(&["fall-carnival"])
            };
            db.create_meeting(&doc).unwrap();
        }

        let source = db.get_tag_by_name("pta", "fall-carnival").unwrap().unwrap();
        let target = db.get_tag_by_name("pta", "fundraising").unwrap().unwrap();

        let touched = db.merge_tags("pta", &source.id, &target.id).unwrap();
        assert_eq!(touched, 5);

        let merged = db.get_tag_by_name("pta", "fundraising").unwrap().unwrap();
        assert_eq!(merged.usage_count, 13);
        assert!(db.get_tag_by_name("pta", "fall-carnival").unwrap().is_none());

        for doc in db.list_meetings("pta").unwrap() {
            let count = doc.tags.iter().filter(|t| *t == "fundraising").count();
            assert_eq!(count, 1, "document {} should carry the target exactly once", doc.id);
            assert!(!doc.tags.iter().any(|t| t == "fall-carnival"));
        }
    }
}
