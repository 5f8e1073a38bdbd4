//! Local row lookup for change detection.

use std::path::Path;

use rowsync_core::{LocalIndex, LocalMatch};
use rowsync_domain::{Result, RowData, SyncError};
use rusqlite::{params, Connection};

use super::values::{field_from_value_ref, map_db_error, to_sql_value};

/// Resolves a remote row to its local counterpart by one key column.
///
/// The remote row must carry the key column; a row without it violates the
/// provider's data contract. The returned local row holds exactly the
/// configured field columns, which should cover every declared check column.
pub struct SqliteLocalIndex {
    conn: Connection,
    table: String,
    key_column: String,
    columns: Vec<String>,
}

impl SqliteLocalIndex {
    /// Open the local store and configure the lookup.
    pub fn open(
        path: impl AsRef<Path>,
        table: impl Into<String>,
        key_column: impl Into<String>,
        columns: &[&str],
    ) -> Result<Self> {
        let conn = Connection::open(path.as_ref()).map_err(map_db_error)?;
        Ok(Self {
            conn,
            table: table.into(),
            key_column: key_column.into(),
            columns: columns.iter().map(|name| (*name).to_string()).collect(),
        })
    }
}

impl LocalIndex for SqliteLocalIndex {
    fn find_local(&mut self, remote: &RowData) -> Result<Option<LocalMatch>> {
        let key = remote.get(&self.key_column).ok_or_else(|| {
            SyncError::data_contract(format!(
                "remote row is missing key column {}",
                self.key_column
            ))
        })?;

        let sql = format!(
            "SELECT id, {} FROM {} WHERE {} = ?1 LIMIT 1",
            self.columns.join(", "),
            self.table,
            self.key_column
        );
        let mut stmt = self.conn.prepare(&sql).map_err(map_db_error)?;
        let mut rows = stmt.query(params![to_sql_value(key)]).map_err(map_db_error)?;

        match rows.next().map_err(map_db_error)? {
            None => Ok(None),
            Some(db_row) => {
                let id: i64 = db_row.get(0).map_err(map_db_error)?;
                let mut row = RowData::new();
                for (index, name) in self.columns.iter().enumerate() {
                    let value = db_row.get_ref(index + 1).map_err(map_db_error)?;
                    row.insert(name.clone(), field_from_value_ref(value));
                }
                Ok(Some(LocalMatch { id, row }))
            }
        }
    }
}
