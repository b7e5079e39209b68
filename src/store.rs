//! SQLite-backed data store: connection pool, schema/view creation, and the
//! one-shot bootstrap sequence.

use std::path::{Path, PathBuf};

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

use crate::error::{Error, Result};
use crate::loader::{load_all, LoadSummary};
use crate::schema::{
    generate_create_table, generate_create_view, generate_indexes, ALL_TABLES, ALL_VIEWS,
};

const DEFAULT_MAX_CONNECTIONS: u32 = 4;

/// Store configuration: where the database lives and how many pooled
/// connections readers may hold at once.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub max_connections: u32,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

/// Handle to the analytics database.
///
/// Readers check a connection out of the pool per call and return it on
/// drop, so concurrent report queries never share or block on a session.
pub struct Store {
    pool: Pool<SqliteConnectionManager>,
    path: PathBuf,
}

impl Store {
    /// Open the database at the configured path, creating the file if it
    /// does not exist yet.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let manager = SqliteConnectionManager::file(&config.path).with_init(|conn| {
            // WAL keeps concurrent readers from blocking each other
            conn.execute_batch(
                "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA foreign_keys = ON;
                 PRAGMA busy_timeout = 5000;",
            )
        });

        let pool = Pool::builder()
            .max_size(config.max_connections)
            .build(manager)?;

        Ok(Self {
            pool,
            path: config.path.clone(),
        })
    }

    /// Check a connection out of the pool; it returns to the pool on drop.
    pub fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
        Ok(self.pool.get()?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create all base tables and their foreign-key indexes.
    ///
    /// Fails with `Error::Schema` if any base table already exists: the
    /// bootstrap sequence is single-invocation from an empty store.
    pub fn create_schema(&self) -> Result<()> {
        let conn = self.conn()?;

        for table in ALL_TABLES {
            if table_exists(&conn, table.name)? {
                return Err(Error::Schema(format!(
                    "base table '{}' already exists",
                    table.name
                )));
            }
        }

        for table in ALL_TABLES {
            conn.execute(&generate_create_table(table), [])?;
            for index_sql in generate_indexes(table) {
                conn.execute(&index_sql, [])?;
            }
        }

        Ok(())
    }

    /// Create all derived views.
    ///
    /// Fails with `Error::ViewDefinition` if a view's base table is missing,
    /// so a bootstrap that skipped `create_schema` is caught here.
    pub fn create_views(&self) -> Result<()> {
        let conn = self.conn()?;

        for view in ALL_VIEWS {
            for dep in view.depends_on {
                if !table_exists(&conn, dep)? {
                    return Err(Error::ViewDefinition {
                        view: view.name,
                        missing: dep,
                    });
                }
            }
            conn.execute(&generate_create_view(view), [])?;
        }

        Ok(())
    }
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        [name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// One-shot bootstrap: create the schema, load every source table, then
/// create the derived views. Must complete before any report query runs.
pub fn bootstrap(config: &StoreConfig, source_dir: &Path) -> Result<(Store, LoadSummary)> {
    let store = Store::open(config)?;
    store.create_schema()?;
    let summary = load_all(&store, source_dir)?;
    store.create_views()?;
    Ok((store, summary))
}
