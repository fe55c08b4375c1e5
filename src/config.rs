//! Configuration resolution
//!
//! Runtime settings come from CLI flags, the process environment
//! (`DATABASE_PATH`, `PORT`, `CORS_ALLOWED_ORIGINS`) and an optional
//! `snipstore.toml` file, in that order of precedence. Everything is
//! resolved once at startup and passed into the server explicitly;
//! handlers never read ambient environment state.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: u16 = 5000;

/// Settings read from snipstore.toml; every field optional
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SnipstoreConfig {
    pub database: Option<String>,
    pub port: Option<u16>,
    pub cors_origins: Option<String>,
}

/// CORS origin allow-list.
///
/// `*` (or unset) grants any origin without credentials; an explicit
/// comma-separated list grants exactly those origins with credentials.
#[derive(Debug, Clone, PartialEq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

impl CorsOrigins {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw == "*" {
            return CorsOrigins::Any;
        }
        CorsOrigins::List(
            raw.split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
        )
    }
}

/// Fully resolved runtime settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub database: PathBuf,
    pub port: u16,
    pub cors: CorsOrigins,
}

impl Settings {
    /// Merge flag > environment > config file > default
    pub fn resolve(
        database: Option<PathBuf>,
        port: Option<u16>,
        cors_origins: Option<String>,
        file: Option<SnipstoreConfig>,
    ) -> Self {
        let file = file.unwrap_or_default();

        let database = database
            .or_else(|| std::env::var("DATABASE_PATH").ok().map(PathBuf::from))
            .or_else(|| file.database.as_ref().map(PathBuf::from))
            .unwrap_or_else(default_database_path);

        let port = port
            .or_else(|| std::env::var("PORT").ok().and_then(|p| p.parse().ok()))
            .or(file.port)
            .unwrap_or(DEFAULT_PORT);

        let cors = cors_origins
            .or_else(|| std::env::var("CORS_ALLOWED_ORIGINS").ok())
            .or(file.cors_origins)
            .map(|raw| CorsOrigins::parse(&raw))
            .unwrap_or(CorsOrigins::Any);

        Settings { database, port, cors }
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("snipstore.toml")
}

pub fn default_database_path() -> PathBuf {
    PathBuf::from("snippets.db")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<SnipstoreConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: SnipstoreConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
