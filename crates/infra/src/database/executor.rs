//! SQLite implementation of the execution port.

use std::path::{Path, PathBuf};

use bigdecimal::BigDecimal;
use rowsync_core::SqlExecutor;
use rowsync_domain::{ColumnKind, FieldValue, Result};
use rusqlite::Connection;
use tracing::info;

use super::values::map_db_error;

/// Execution port over one file-backed SQLite connection.
///
/// Transactions are explicit (`BEGIN IMMEDIATE`), and a statement may contain
/// several `;`-separated statements which execute as one unit. `reconnect`
/// reopens the database from its path, so the target must live on disk.
pub struct SqliteExecutor {
    path: PathBuf,
    conn: Connection,
}

impl SqliteExecutor {
    /// Open the local store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path).map_err(map_db_error)?;
        info!(db_path = %path.display(), "local store opened");
        Ok(Self { path, conn })
    }
}

impl SqlExecutor for SqliteExecutor {
    fn begin_transaction(&mut self) -> Result<()> {
        self.conn.execute_batch("BEGIN IMMEDIATE").map_err(map_db_error)
    }

    fn execute(&mut self, statement: &str) -> Result<u64> {
        self.conn.execute_batch(statement).map_err(map_db_error)?;
        Ok(self.conn.changes())
    }

    fn commit(&mut self) -> Result<()> {
        self.conn.execute_batch("COMMIT").map_err(map_db_error)
    }

    fn rollback(&mut self) -> Result<()> {
        self.conn.execute_batch("ROLLBACK").map_err(map_db_error)
    }

    fn quote(&self, value: &FieldValue, kind: ColumnKind) -> String {
        sqlite_literal(value, kind)
    }

    fn reconnect(&mut self) -> Result<()> {
        self.conn = Connection::open(&self.path).map_err(map_db_error)?;
        info!(db_path = %self.path.display(), "local store reopened");
        Ok(())
    }
}

/// Render a value as a SQLite literal for the declared column kind.
///
/// NULL, booleans, and timestamps have fixed forms regardless of the kind;
/// for the rest the kind decides: numeric kinds render an exact decimal
/// literal when the value has a numeric view and fall back to a quoted
/// string otherwise, text kinds always quote.
fn sqlite_literal(value: &FieldValue, kind: ColumnKind) -> String {
    match value {
        FieldValue::Null => "NULL".to_string(),
        FieldValue::Boolean(flag) => if *flag { "1" } else { "0" }.to_string(),
        FieldValue::Timestamp(_) => quote_text(&value.render().unwrap_or_default()),
        other => match kind {
            ColumnKind::Integer | ColumnKind::Decimal => match other.as_decimal() {
                Some(number) => number.to_string(),
                None => quote_text(&other.render().unwrap_or_default()),
            },
            ColumnKind::Boolean => match other.as_decimal() {
                Some(number) if number != BigDecimal::from(0) => "1".to_string(),
                _ => "0".to_string(),
            },
            ColumnKind::Text | ColumnKind::Timestamp => {
                quote_text(&other.render().unwrap_or_default())
            }
        },
    }
}

fn quote_text(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoting_escapes_embedded_quotes() {
        assert_eq!(
            sqlite_literal(&FieldValue::from("o'brien"), ColumnKind::Text),
            "'o''brien'"
        );
    }

    #[test]
    fn numeric_kinds_render_bare_literals() {
        assert_eq!(sqlite_literal(&FieldValue::Integer(42), ColumnKind::Integer), "42");
        assert_eq!(sqlite_literal(&FieldValue::from("10.00"), ColumnKind::Decimal), "10.00");
        assert_eq!(sqlite_literal(&FieldValue::Float(12.5), ColumnKind::Decimal), "12.5");
    }

    #[test]
    fn non_numeric_text_under_a_numeric_kind_is_still_quoted() {
        assert_eq!(
            sqlite_literal(&FieldValue::from("12; DROP TABLE t"), ColumnKind::Integer),
            "'12; DROP TABLE t'"
        );
    }

    #[test]
    fn booleans_and_null_have_fixed_forms() {
        assert_eq!(sqlite_literal(&FieldValue::Boolean(true), ColumnKind::Text), "1");
        assert_eq!(sqlite_literal(&FieldValue::Boolean(false), ColumnKind::Boolean), "0");
        assert_eq!(sqlite_literal(&FieldValue::Null, ColumnKind::Decimal), "NULL");
    }

    #[test]
    fn boolean_kind_coerces_numeric_values() {
        assert_eq!(sqlite_literal(&FieldValue::Integer(3), ColumnKind::Boolean), "1");
        assert_eq!(sqlite_literal(&FieldValue::from("0"), ColumnKind::Boolean), "0");
    }

    #[test]
    fn integers_under_a_text_kind_are_quoted() {
        assert_eq!(sqlite_literal(&FieldValue::Integer(7), ColumnKind::Text), "'7'");
    }
}
