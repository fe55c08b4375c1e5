//! SQLite storage implementation

use std::path::Path;
use rusqlite::{Connection, params, OptionalExtension};
use crate::{Result, Error};
use crate::namespace::{Namespace, NewNamespace};
use crate::snippet::{Snippet, NewSnippet, SnippetUpdate, encode_input_parameters};
use crate::timestamp::{millis_or_now, now_millis};
use super::schema;

/// SQLite-backed storage for snippets and namespaces
pub struct SnippetStore {
    conn: Connection,
}

impl SnippetStore {
    /// Open a database file (creates and initializes if needed)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    /// Ensure the schema exists with the current column set.
    ///
    /// The legacy-shape check runs before any create or seed, so a
    /// doomed table is never seeded first. Any error here is propagated
    /// and treated as fatal by the caller.
    fn initialize(&mut self) -> Result<()> {
        if self.needs_migration()? {
            tracing::info!("legacy schema detected, rebuilding tables with namespace support");
            return self.rebuild_schema();
        }
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        self.seed_default_namespace()
    }

    /// A schema is legacy when a snippets table exists without a
    /// namespaceId column, or without a namespaces table beside it.
    /// No snippets table at all means a fresh database, not a legacy one.
    fn needs_migration(&self) -> Result<bool> {
        if !self.table_exists("snippets")? {
            return Ok(false);
        }
        if !self.table_exists("namespaces")? {
            return Ok(true);
        }
        Ok(!self.snippets_has_namespace_column()?)
    }

    fn table_exists(&self, name: &str) -> Result<bool> {
        let found: Option<String> = self
            .conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn snippets_has_namespace_column(&self) -> Result<bool> {
        let mut stmt = self.conn.prepare("PRAGMA table_info(snippets)")?;
        let mut columns = stmt.query_map([], |row| row.get::<_, String>(1))?;
        Ok(columns.any(|name| matches!(name.as_deref(), Ok("namespaceId"))))
    }

    /// Drop both tables, recreate them with the current shape, and
    /// reseed the default namespace, all in one transaction.
    fn rebuild_schema(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        for stmt in schema::DROP_STATEMENTS {
            tx.execute(stmt, [])?;
        }
        for stmt in schema::all_schema_statements() {
            tx.execute(stmt, [])?;
        }
        tx.execute(
            "INSERT INTO namespaces (id, name, createdAt, isDefault) VALUES ('default', 'Default', ?1, 1)",
            params![now_millis()],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Insert the default namespace if no row is flagged default
    fn seed_default_namespace(&self) -> Result<()> {
        let defaults: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM namespaces WHERE isDefault = 1",
            [],
            |row| row.get(0),
        )?;
        if defaults == 0 {
            self.conn.execute(
                "INSERT INTO namespaces (id, name, createdAt, isDefault) VALUES ('default', 'Default', ?1, 1)",
                params![now_millis()],
            )?;
        }
        Ok(())
    }

    // ========== Snippet Operations ==========

    /// List all snippets, most recently updated first
    pub fn list_snippets(&self) -> Result<Vec<Snippet>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, code, language, category, namespaceId, hasPreview, functionName, inputParameters, createdAt, updatedAt \
             FROM snippets ORDER BY updatedAt DESC",
        )?;

        let snippets = stmt
            .query_map([], |row| self.row_to_snippet(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(snippets)
    }

    /// Get a snippet by id
    pub fn get_snippet(&self, id: &str) -> Result<Option<Snippet>> {
        self.conn
            .query_row(
                "SELECT id, title, description, code, language, category, namespaceId, hasPreview, functionName, inputParameters, createdAt, updatedAt \
                 FROM snippets WHERE id = ?1",
                [id],
                |row| self.row_to_snippet(row),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Insert a new snippet, normalizing timestamps to epoch milliseconds
    pub fn insert_snippet(&self, snippet: &NewSnippet) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO snippets (id, title, description, code, language, category, namespaceId, hasPreview, functionName, inputParameters, createdAt, updatedAt)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                snippet.id,
                snippet.title,
                snippet.description,
                snippet.code,
                snippet.language,
                snippet.category,
                snippet.namespace_id,
                snippet.has_preview as i64,
                snippet.function_name,
                encode_input_parameters(snippet.input_parameters.as_ref()),
                millis_or_now(snippet.created_at.as_ref())?,
                millis_or_now(snippet.updated_at.as_ref())?,
            ],
        )?;
        Ok(())
    }

    /// Replace all mutable fields of a snippet. `id` and `createdAt`
    /// are untouched. Returns false if no row matched.
    pub fn update_snippet(&self, id: &str, update: &SnippetUpdate) -> Result<bool> {
        let changed = self.conn.execute(
            r#"
            UPDATE snippets
            SET title = ?1, description = ?2, code = ?3, language = ?4, category = ?5, namespaceId = ?6, hasPreview = ?7, functionName = ?8, inputParameters = ?9, updatedAt = ?10
            WHERE id = ?11
            "#,
            params![
                update.title,
                update.description,
                update.code,
                update.language,
                update.category,
                update.namespace_id,
                update.has_preview as i64,
                update.function_name,
                encode_input_parameters(update.input_parameters.as_ref()),
                millis_or_now(update.updated_at.as_ref())?,
                id,
            ],
        )?;
        Ok(changed > 0)
    }

    /// Delete a snippet by id. Returns false if no row matched.
    pub fn delete_snippet(&self, id: &str) -> Result<bool> {
        let changed = self.conn.execute("DELETE FROM snippets WHERE id = ?1", [id])?;
        Ok(changed > 0)
    }

    /// Helper to convert a row to a Snippet
    fn row_to_snippet(&self, row: &rusqlite::Row) -> rusqlite::Result<Snippet> {
        let has_preview: Option<i64> = row.get(7)?;
        let raw_params: Option<String> = row.get(9)?;

        Ok(Snippet {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            code: row.get(3)?,
            language: row.get(4)?,
            category: row.get(5)?,
            namespace_id: row.get(6)?,
            has_preview: has_preview.unwrap_or(0) != 0,
            function_name: row.get(8)?,
            // Undecodable stored parameters read back as absent, not as an error
            input_parameters: raw_params.and_then(|text| serde_json::from_str(&text).ok()),
            created_at: row.get(10)?,
            updated_at: row.get(11)?,
        })
    }

    // ========== Namespace Operations ==========

    /// List all namespaces, default first, then alphabetically by name
    pub fn list_namespaces(&self) -> Result<Vec<Namespace>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, createdAt, isDefault FROM namespaces ORDER BY isDefault DESC, name ASC",
        )?;

        let namespaces = stmt
            .query_map([], |row| self.row_to_namespace(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(namespaces)
    }

    /// Insert a new namespace
    pub fn insert_namespace(&self, namespace: &NewNamespace) -> Result<()> {
        self.conn.execute(
            "INSERT INTO namespaces (id, name, createdAt, isDefault) VALUES (?1, ?2, ?3, ?4)",
            params![
                namespace.id,
                namespace.name,
                millis_or_now(namespace.created_at.as_ref())?,
                namespace.is_default as i64,
            ],
        )?;
        Ok(())
    }

    /// Delete a namespace, reassigning its snippets to the default
    /// namespace first. Both statements commit together; the default
    /// namespace itself is protected.
    pub fn delete_namespace(&mut self, id: &str) -> Result<()> {
        let tx = self.conn.transaction()?;

        let flag: Option<Option<i64>> = tx
            .query_row(
                "SELECT isDefault FROM namespaces WHERE id = ?1",
                [id],
                |row| row.get(0),
            )
            .optional()?;

        let is_default = match flag {
            None => return Err(Error::NamespaceNotFound(id.to_string())),
            Some(value) => value.unwrap_or(0) != 0,
        };
        if is_default {
            return Err(Error::DefaultNamespaceProtected);
        }

        let default_id: String = tx
            .query_row(
                "SELECT id FROM namespaces WHERE isDefault = 1",
                [],
                |row| row.get(0),
            )
            .optional()?
            .unwrap_or_else(|| "default".to_string());

        tx.execute(
            "UPDATE snippets SET namespaceId = ?1 WHERE namespaceId = ?2",
            params![default_id, id],
        )?;
        tx.execute("DELETE FROM namespaces WHERE id = ?1", [id])?;
        tx.commit()?;
        Ok(())
    }

    /// Helper to convert a row to a Namespace
    fn row_to_namespace(&self, row: &rusqlite::Row) -> rusqlite::Result<Namespace> {
        let is_default: Option<i64> = row.get(3)?;
        Ok(Namespace {
            id: row.get(0)?,
            name: row.get(1)?,
            created_at: row.get(2)?,
            is_default: is_default.unwrap_or(0) != 0,
        })
    }

    // ========== Administrative Operations ==========

    /// Drop everything and reinitialize to the seeded state
    pub fn wipe(&mut self) -> Result<()> {
        self.rebuild_schema()
    }

    /// Count all snippets
    pub fn count_snippets(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM snippets", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Count all namespaces
    pub fn count_namespaces(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM namespaces", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            snippets: self.count_snippets()?,
            namespaces: self.count_namespaces()?,
        })
    }
}

/// Database statistics
#[derive(Debug, Clone)]
pub struct DbStats {
    pub snippets: usize,
    pub namespaces: usize,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Snippets: {}", self.snippets)?;
        writeln!(f, "  Namespaces: {}", self.namespaces)
    }
}
