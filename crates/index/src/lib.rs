// crates/index/src/lib.rs
//! SQLite-backed searchable index for Work and Job records.
//!
//! One table holds both record kinds, discriminated by `entity_type`. The
//! table name is injected configuration ([`IndexSettings`]), not a module
//! global, so tests and multi-tenant deployments can point the same code at
//! different indexes.

mod aggregate;
mod bootstrap;
mod store;

pub use store::{FilterField, ListQuery, OrderMode};

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("SQLite error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Invalid messages payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed record {id}: {message}")]
    Malformed { id: String, message: String },

    #[error("Invalid index name: {0:?} (expected [A-Za-z0-9_]+)")]
    InvalidIndexName(String),

    #[error("Failed to determine data directory")]
    NoDataDir,

    #[error("Failed to create index directory: {0}")]
    CreateDir(#[from] std::io::Error),
}

pub type IndexResult<T> = Result<T, IndexError>;

/// Default index (table) name.
pub const DEFAULT_INDEX_NAME: &str = "connector_works";

/// Name of the legacy index migrated into the configured one at bootstrap.
pub const LEGACY_INDEX_NAME: &str = "work_jobs_index";

/// Construction-time configuration for a [`WorkIndex`].
#[derive(Debug, Clone)]
pub struct IndexSettings {
    /// Table holding Work and Job records.
    pub index_name: String,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            index_name: DEFAULT_INDEX_NAME.to_string(),
        }
    }
}

impl IndexSettings {
    /// Index names are interpolated into SQL, so only identifier
    /// characters are accepted.
    fn validate(&self) -> IndexResult<()> {
        let ok = !self.index_name.is_empty()
            && self
                .index_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if ok {
            Ok(())
        } else {
            Err(IndexError::InvalidIndexName(self.index_name.clone()))
        }
    }
}

/// Handle to the Work/Job index, wrapping a SQLite connection pool.
#[derive(Debug, Clone)]
pub struct WorkIndex {
    pool: SqlitePool,
    settings: IndexSettings,
    db_path: PathBuf,
}

impl WorkIndex {
    /// Open (or create) the index at the given path and run bootstrap.
    pub async fn new(path: &Path, settings: IndexSettings) -> IndexResult<Self> {
        settings.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        let index = Self {
            pool,
            settings,
            db_path: path.to_owned(),
        };
        index.bootstrap().await?;

        info!(
            index = %index.settings.index_name,
            "Work index opened at {}",
            path.display()
        );
        Ok(index)
    }

    /// Create an in-memory index (for testing).
    ///
    /// Uses `shared_cache(true)` so all pool connections share the same
    /// in-memory database; without it each connection would see its own
    /// empty table.
    pub async fn new_in_memory() -> IndexResult<Self> {
        let settings = IndexSettings::default();
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?
            .shared_cache(true)
            .busy_timeout(std::time::Duration::from_secs(5));
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;
        let index = Self {
            pool,
            settings,
            db_path: PathBuf::new(),
        };
        index.bootstrap().await?;
        Ok(index)
    }

    /// Open the index at the default location:
    /// `<data dir>/worktrack/worktrack.db`.
    pub async fn open_default() -> IndexResult<Self> {
        let path = default_index_path()?;
        Self::new(&path, IndexSettings::default()).await
    }

    /// Get a reference to the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// The configured index (table) name.
    pub fn index_name(&self) -> &str {
        &self.settings.index_name
    }

    /// Path to the backing database file. Empty for in-memory indexes.
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

/// Returns the default index path: `<data dir>/worktrack/worktrack.db`.
pub fn default_index_path() -> IndexResult<PathBuf> {
    dirs::data_dir()
        .map(|d| d.join("worktrack").join("worktrack.db"))
        .ok_or(IndexError::NoDataDir)
}
