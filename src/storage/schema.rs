//! Database schema definitions
//!
//! Column names are the camelCase identifiers the API exposes; the
//! migrator introspects for `namespaceId` by that exact name to detect
//! the legacy pre-namespace table shape.

/// SQL to create the namespaces table
pub const CREATE_NAMESPACES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS namespaces (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    createdAt INTEGER NOT NULL,
    isDefault INTEGER DEFAULT 0
)
"#;

/// SQL to create the snippets table
pub const CREATE_SNIPPETS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS snippets (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT,
    code TEXT NOT NULL,
    language TEXT NOT NULL,
    category TEXT NOT NULL,
    namespaceId TEXT,
    hasPreview INTEGER DEFAULT 0,
    functionName TEXT,
    inputParameters TEXT,
    createdAt INTEGER NOT NULL,
    updatedAt INTEGER NOT NULL,
    FOREIGN KEY (namespaceId) REFERENCES namespaces(id)
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_snippets_updated ON snippets(updatedAt)",
    "CREATE INDEX IF NOT EXISTS idx_snippets_namespace ON snippets(namespaceId)",
];

/// SQL to drop the tables, child table first
pub const DROP_STATEMENTS: &[&str] = &[
    "DROP TABLE IF EXISTS snippets",
    "DROP TABLE IF EXISTS namespaces",
];

/// All schema creation statements, in dependency order
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_NAMESPACES_TABLE, CREATE_SNIPPETS_TABLE];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
