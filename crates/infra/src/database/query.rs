//! Paged query source over a local SQLite database.

use std::path::{Path, PathBuf};

use rowsync_core::PagedQuery;
use rowsync_domain::{Result, RowData};
use rusqlite::Connection;

use super::values::{map_db_error, read_rows};

/// A SQL text paged with `LIMIT`/`OFFSET`, for walking local tables.
///
/// The statement must not carry its own `LIMIT` clause; the walker appends
/// one per page. Ordering the statement (`ORDER BY id`) keeps pages stable
/// across fetches.
pub struct SqliteQuery {
    path: PathBuf,
    conn: Connection,
    sql: String,
    limit: Option<usize>,
}

impl SqliteQuery {
    /// Open the database and wrap the given statement text.
    pub fn open(path: impl AsRef<Path>, sql: impl Into<String>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path).map_err(map_db_error)?;
        Ok(Self { path, conn, sql: sql.into(), limit: None })
    }

    /// Configure a page size on the query itself.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl PagedQuery for SqliteQuery {
    fn configured_limit(&self) -> Option<usize> {
        self.limit
    }

    fn fetch_page(&mut self, offset: usize, limit: usize) -> Result<Vec<RowData>> {
        // SQLite treats a negative limit as "no limit"; used for the
        // unbounded sentinel.
        let paged = if limit == usize::MAX {
            format!("{} LIMIT -1 OFFSET {}", self.sql, offset)
        } else {
            format!("{} LIMIT {} OFFSET {}", self.sql, limit, offset)
        };
        let mut stmt = self.conn.prepare(&paged).map_err(map_db_error)?;
        read_rows(&mut stmt, []).map_err(map_db_error)
    }

    fn reconnect(&mut self) -> Result<()> {
        self.conn = Connection::open(&self.path).map_err(map_db_error)?;
        Ok(())
    }
}
