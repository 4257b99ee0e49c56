//! `SQLite` storage implementation
//!
//! All methods are synchronous and take a connection from the pool for the
//! duration of the call.

// SQLite uses i64 for counts/limits, Rust uses usize/u32 - conversions stay within DB row counts
#![allow(
    clippy::as_conversions,
    clippy::cast_possible_wrap,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "SQLite i64 <-> Rust integer conversions are safe within DB row counts"
)]

mod documents;
mod search;
mod spellfix;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use regex::Regex;
use rusqlite::Connection;
use spellfix_core::{env_parse_at_least, env_parse_with_default};
use std::path::Path;
use std::sync::LazyLock;

use crate::error::Result;
use crate::migrations;

pub use search::{build_fts_query, split_highlights};

/// Type alias for pooled connection
pub(crate) type PooledConn = PooledConnection<SqliteConnectionManager>;

/// Default connection pool size.
pub const DEFAULT_POOL_SIZE: u32 = 8;
/// Default upper bound on the edit distance of a correction.
pub const DEFAULT_MAX_DISTANCE: i64 = 400;

/// Runs of non-word characters, the separators between query words.
pub(crate) static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W+").unwrap());

/// Main storage struct wrapping `SQLite` connection pool
#[derive(Clone, Debug)]
pub struct Storage {
    pub(crate) pool: Pool<SqliteConnectionManager>,
    pub(crate) max_distance: i64,
    pub(crate) scope: i64,
}

/// Get a connection from the pool
pub(crate) fn get_conn(pool: &Pool<SqliteConnectionManager>) -> Result<PooledConn> {
    Ok(pool.get()?)
}

/// Log row read errors and filter them out
pub(crate) fn log_row_error<T>(result: rusqlite::Result<T>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!("Row read error: {}", e);
            None
        },
    }
}

/// Concurrency settings for every pooled connection
fn init_connection(conn: &mut Connection) -> std::result::Result<(), rusqlite::Error> {
    conn.execute_batch(
        "PRAGMA busy_timeout = 30000;
         PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;",
    )?;
    Ok(())
}

fn db_pool_size() -> u32 {
    env_parse_at_least("SPELLFIX_DB_POOL_SIZE", DEFAULT_POOL_SIZE, 1)
}

impl Storage {
    /// Create new storage instance with `SQLite` connection pool
    ///
    /// # Errors
    /// Returns error if spellfix1 cannot be registered, the pool cannot be built
    /// or migrations fail.
    pub fn new(db_path: &Path) -> Result<Self> {
        // auto-extensions apply when a connection opens, so this precedes the pool
        spellfix_ext::auto()?;

        let manager = SqliteConnectionManager::file(db_path).with_init(init_connection);

        let pool_size = db_pool_size();
        let pool = Pool::builder().max_size(pool_size).build(manager)?;

        let storage = Self::from_pool(pool)?;
        tracing::info!(
            pool_size,
            path = %db_path.display(),
            "Storage initialized with connection pool"
        );
        Ok(storage)
    }

    /// Create storage backed by a private in-memory database.
    ///
    /// Every connection to `:memory:` is a separate database, so the pool
    /// holds a single connection.
    ///
    /// # Errors
    /// Returns error if spellfix1 cannot be registered, the pool cannot be built
    /// or migrations fail.
    pub fn in_memory() -> Result<Self> {
        spellfix_ext::auto()?;

        let manager = SqliteConnectionManager::memory().with_init(init_connection);
        let pool = Pool::builder().max_size(1).build(manager)?;
        Self::from_pool(pool)
    }

    fn from_pool(pool: Pool<SqliteConnectionManager>) -> Result<Self> {
        // Run migrations on first connection
        let conn = get_conn(&pool)?;
        migrations::run_migrations(&conn)?;
        drop(conn);

        Ok(Self {
            pool,
            max_distance: env_parse_with_default("SPELLFIX_MAX_DISTANCE", DEFAULT_MAX_DISTANCE),
            scope: env_parse_at_least("SPELLFIX_SCOPE", spellfix_ext::DEFAULT_SCOPE as i64, 1),
        })
    }

    /// Override the largest edit distance [`Storage::spellfix`] accepts.
    #[must_use]
    pub fn with_max_distance(mut self, max_distance: i64) -> Self {
        self.max_distance = max_distance;
        self
    }
}
