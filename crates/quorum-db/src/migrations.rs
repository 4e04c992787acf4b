//! Database migrations and schema management.

use crate::error::DbResult;
use rusqlite::Connection;
use tracing::info;

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema.
pub fn initialize_schema(conn: &Connection) -> DbResult<()> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        info!("Creating initial database schema...");
        create_initial_schema(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if current_version < SCHEMA_VERSION {
        info!(
            "Migrating database from version {} to {}",
            current_version, SCHEMA_VERSION
        );
        run_migrations(conn, current_version)?;
    }

    Ok(())
}

fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i32) -> DbResult<()> {
    conn.pragma_update(None, "user_version", version)?;
    Ok(())
}

fn create_initial_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- Admin-managed folder integrations
        CREATE TABLE IF NOT EXISTS folder_integrations (
            id TEXT PRIMARY KEY,
            tenant_id TEXT NOT NULL,
            name TEXT NOT NULL,
            external_folder_id TEXT NOT NULL,
            kind TEXT NOT NULL,
            max_depth INTEGER NOT NULL DEFAULT 3,
            active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_integrations_tenant ON folder_integrations(tenant_id);

        -- Generic searchable document index, one row per remote file
        CREATE TABLE IF NOT EXISTS indexed_documents (
            id TEXT PRIMARY KEY,
            tenant_id TEXT NOT NULL,
            external_file_id TEXT NOT NULL,
            file_name TEXT NOT NULL,
            mime_type TEXT NOT NULL,
            parent_folder_id TEXT,
            text_content TEXT,
            content_hash TEXT NOT NULL DEFAULT '',
            integration_id TEXT NOT NULL,
            integration_name TEXT NOT NULL,
            last_indexed_at TEXT NOT NULL,
            UNIQUE (tenant_id, external_file_id)
        );

        CREATE INDEX IF NOT EXISTS idx_indexed_tenant ON indexed_documents(tenant_id);
        CREATE INDEX IF NOT EXISTS idx_indexed_integration ON indexed_documents(integration_id);

        -- Full-text search over the generic index
        CREATE VIRTUAL TABLE IF NOT EXISTS indexed_documents_fts USING fts5(
            file_name,
            integration_name,
            text_content,
            content='indexed_documents',
            content_rowid='rowid'
        );

        -- Triggers to keep FTS in sync
        CREATE TRIGGER IF NOT EXISTS indexed_documents_ai AFTER INSERT ON indexed_documents BEGIN
            INSERT INTO indexed_documents_fts(rowid, file_name, integration_name, text_content)
            VALUES (NEW.rowid, NEW.file_name, NEW.integration_name, NEW.text_content);
        END;

        CREATE TRIGGER IF NOT EXISTS indexed_documents_ad AFTER DELETE ON indexed_documents BEGIN
            INSERT INTO indexed_documents_fts(indexed_documents_fts, rowid, file_name, integration_name, text_content)
            VALUES('delete', OLD.rowid, OLD.file_name, OLD.integration_name, OLD.text_content);
        END;

        CREATE TRIGGER IF NOT EXISTS indexed_documents_au AFTER UPDATE ON indexed_documents BEGIN
            INSERT INTO indexed_documents_fts(indexed_documents_fts, rowid, file_name, integration_name, text_content)
            VALUES('delete', OLD.rowid, OLD.file_name, OLD.integration_name, OLD.text_content);
            INSERT INTO indexed_documents_fts(rowid, file_name, integration_name, text_content)
            VALUES (NEW.rowid, NEW.file_name, NEW.integration_name, NEW.text_content);
        END;

        -- Meeting-minutes pipeline documents
        CREATE TABLE IF NOT EXISTS meeting_documents (
            id TEXT PRIMARY KEY,
            tenant_id TEXT NOT NULL,
            external_file_id TEXT NOT NULL,
            file_name TEXT NOT NULL,
            document_type TEXT NOT NULL,
            meeting_date TEXT,
            meeting_month INTEGER,
            meeting_year INTEGER,
            school_year TEXT NOT NULL,
            text_content TEXT,
            status TEXT NOT NULL DEFAULT 'pending',
            summary TEXT,
            key_items TEXT NOT NULL DEFAULT '[]',
            action_items TEXT NOT NULL DEFAULT '[]',
            improvements TEXT,
            tags TEXT NOT NULL DEFAULT '[]',
            extracted_date TEXT,
            date_confidence TEXT,
            last_synced_at TEXT NOT NULL,
            UNIQUE (tenant_id, external_file_id)
        );

        CREATE INDEX IF NOT EXISTS idx_meetings_tenant ON meeting_documents(tenant_id);
        CREATE INDEX IF NOT EXISTS idx_meetings_status ON meeting_documents(status);
        CREATE INDEX IF NOT EXISTS idx_meetings_school_year ON meeting_documents(school_year);

        -- Per-tenant tag registry with denormalized usage counts
        CREATE TABLE IF NOT EXISTS tags (
            id TEXT PRIMARY KEY,
            tenant_id TEXT NOT NULL,
            name TEXT NOT NULL,
            display_name TEXT NOT NULL,
            usage_count INTEGER NOT NULL DEFAULT 0,
            UNIQUE (tenant_id, name)
        );

        CREATE INDEX IF NOT EXISTS idx_tags_tenant ON tags(tenant_id);

        -- Enable foreign keys
        PRAGMA foreign_keys = ON;
        "#,
    )?;

    Ok(())
}

fn run_migrations(conn: &Connection, from_version: i32) -> DbResult<()> {
    // Future migrations go here
    let _ = (conn, from_version);

    set_schema_version(conn, SCHEMA_VERSION)?;
    Ok(())
}
