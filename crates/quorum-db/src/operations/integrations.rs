//! Folder integration CRUD operations.

use crate::database::Database;
use crate::error::{DbError, DbResult};
use chrono::{DateTime, Utc};
use quorum_core::{FolderIntegration, IntegrationKind};
use rusqlite::params;

impl Database {
    /// Create a new folder integration.
    pub fn create_integration(&self, integration: &FolderIntegration) -> DbResult<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO folder_integrations (id, tenant_id, name, external_folder_id, kind, max_depth, active, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                integration.id,
                integration.tenant_id,
                integration.name,
                integration.external_folder_id,
                integration.kind.as_str(),
                integration.max_depth,
                integration.active as i32,
                integration.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get an integration by ID.
    pub fn get_integration(&self, id: &str) -> DbResult<FolderIntegration> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, tenant_id, name, external_folder_id, kind, max_depth, active, created_at
             FROM folder_integrations WHERE id = ?1",
            params![id],
            row_to_integration,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                DbError::NotFound(format!("Integration not found: {}", id))
            }
            _ => DbError::from(e),
        })
    }

    /// List a tenant's active integrations, in creation order.
    pub fn list_active_integrations(&self, tenant_id: &str) -> DbResult<Vec<FolderIntegration>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, tenant_id, name, external_folder_id, kind, max_depth, active, created_at
             FROM folder_integrations WHERE tenant_id = ?1 AND active = 1 ORDER BY created_at",
        )?;

        let integrations = stmt.query_map(params![tenant_id], row_to_integration)?;
        integrations
            .collect::<Result<Vec<_>, _>>()
            .map_err(DbError::from)
    }

    /// List all of a tenant's integrations, active or not.
    pub fn list_integrations(&self, tenant_id: &str) -> DbResult<Vec<FolderIntegration>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, tenant_id, name, external_folder_id, kind, max_depth, active, created_at
             FROM folder_integrations WHERE tenant_id = ?1 ORDER BY created_at",
        )?;

        let integrations = stmt.query_map(params![tenant_id], row_to_integration)?;
        integrations
            .collect::<Result<Vec<_>, _>>()
            .map_err(DbError::from)
    }

    /// Set an integration's active flag.
    pub fn set_integration_active(&self, id: &str, active: bool) -> DbResult<()> {
        let conn = self.conn()?;
        let rows = conn.execute(
            "UPDATE folder_integrations SET active = ?2 WHERE id = ?1",
            params![id, active as i32],
        )?;

        if rows == 0 {
            return Err(DbError::NotFound(format!("Integration not found: {}", id)));
        }

        Ok(())
    }

    /// Delete an integration.
    pub fn delete_integration(&self, id: &str) -> DbResult<()> {
        let conn = self.conn()?;
        let rows = conn.execute(
            "DELETE FROM folder_integrations WHERE id = ?1",
            params![id],
        )?;

        if rows == 0 {
            return Err(DbError::NotFound(format!("Integration not found: {}", id)));
        }

        Ok(())
    }

    /// List the distinct tenants that have at least one active integration.
    pub fn list_tenants(&self) -> DbResult<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT tenant_id FROM folder_integrations WHERE active = 1 ORDER BY tenant_id",
        )?;

        let tenants = stmt.query_map([], |row| row.get(0))?;
        tenants.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }
}

fn row_to_integration(row: &rusqlite::Row<'_>) -> rusqlite::Result<FolderIntegration> {
    let kind_str: String = row.get(4)?;
    let active: i32 = row.get(6)?;
    let created_at_str: String = row.get(7)?;

    Ok(FolderIntegration {
        id: row.get(0)?,
        tenant_id: row.get(1)?,
        name: row.get(2)?,
        external_folder_id: row.get(3)?,
        kind: IntegrationKind::from_str(&kind_str).unwrap_or(IntegrationKind::General),
        max_depth: row.get(5)?,
        active: active != 0,
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integration_crud() {
        let db = Database::open_in_memory().unwrap();

        let integration = FolderIntegration::new(
            "pta-lincoln",
            "Board Minutes",
            "folder-root",
            IntegrationKind::Minutes,
        );
        db.create_integration(&integration).unwrap();

        let fetched = db.get_integration(&integration.id).unwrap();
        assert_eq!(fetched.name, "Board Minutes");
        assert_eq!(fetched.kind, IntegrationKind::Minutes);
        assert!(fetched.active);

        db.set_integration_active(&integration.id, false).unwrap();
        assert!(db.list_active_integrations("pta-lincoln").unwrap().is_empty());
        assert_eq!(db.list_integrations("pta-lincoln").unwrap().len(), 1);

        db.delete_integration(&integration.id).unwrap();
        assert!(db.get_integration(&integration.id).is_err());
    }

    #[test]
    fn test_list_tenants_distinct() {
        let db = Database::open_in_memory().unwrap();

        for (tenant, name) in [
            ("pta-lincoln", "Minutes"),
            ("pta-lincoln", "Newsletters"),
            ("boosters-east", "Docs"),
        ] {
            db.create_integration(&FolderIntegration::new(
                tenant,
                name,
                "folder-x",
                IntegrationKind::General,
            ))
            .unwrap();
        }

        let tenants = db.list_tenants().unwrap();
        assert_eq!(tenants, vec!["boosters-east", "pta-lincoln"]);
    }
}
