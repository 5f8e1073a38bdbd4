//! Data provider reading pages from a source SQLite database.

use std::path::{Path, PathBuf};

use rowsync_core::DataProvider;
use rowsync_domain::{PeriodFilter, Result, RowData, TIMESTAMP_FORMAT};
use rusqlite::{params, Connection};
use tracing::debug;

use super::values::{map_fetch_error, read_rows};

/// Pages remote rows out of a source SQLite database for one sync run.
///
/// The statement text must bind the period bounds as `?1` (inclusive start)
/// and `?2` (exclusive end) and must order its rows deterministically. A
/// short page clears the continue-flag: the source is exhausted and the
/// orchestrator moves on.
pub struct SqliteDataProvider {
    path: PathBuf,
    conn: Connection,
    sql: String,
    continue_fetch: bool,
}

impl SqliteDataProvider {
    /// Open the source database and wrap the given statement text.
    pub fn open(path: impl AsRef<Path>, sql: impl Into<String>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path).map_err(map_fetch_error)?;
        Ok(Self { path, conn, sql: sql.into(), continue_fetch: true })
    }

    /// Re-open the source connection.
    pub fn reconnect(&mut self) -> Result<()> {
        self.conn = Connection::open(&self.path).map_err(map_fetch_error)?;
        Ok(())
    }
}

impl DataProvider<PeriodFilter> for SqliteDataProvider {
    fn fetch(&mut self, filter: &PeriodFilter, offset: usize, limit: usize) -> Result<Vec<RowData>> {
        let paged = format!("{} LIMIT {} OFFSET {}", self.sql, limit, offset);
        let mut stmt = self.conn.prepare(&paged).map_err(map_fetch_error)?;
        let from = filter.from().format(TIMESTAMP_FORMAT).to_string();
        let to = filter.to().format(TIMESTAMP_FORMAT).to_string();
        let rows = read_rows(&mut stmt, params![from, to]).map_err(map_fetch_error)?;

        self.continue_fetch = rows.len() >= limit;
        debug!(offset, rows = rows.len(), continue_fetch = self.continue_fetch, "source page read");
        Ok(rows)
    }

    fn is_continue_fetch(&self) -> bool {
        self.continue_fetch
    }
}
