//! Conversions between SQLite driver values and pipeline field values.

use rowsync_domain::{FieldValue, RowData, SyncError, TIMESTAMP_FORMAT};
use rusqlite::types::{Value, ValueRef};
use rusqlite::{ErrorCode, Params, Statement};

/// Whether a driver error is worth retrying after a reconnect.
fn is_transient(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => {
            matches!(failure.code, ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
        }
        _ => false,
    }
}

/// Map a driver error to a database error, preserving transience.
pub(crate) fn map_db_error(err: rusqlite::Error) -> SyncError {
    if is_transient(&err) {
        SyncError::transient_database(err.to_string())
    } else {
        SyncError::database(err.to_string())
    }
}

/// Map a driver error to a fetch error, preserving transience.
pub(crate) fn map_fetch_error(err: rusqlite::Error) -> SyncError {
    if is_transient(&err) {
        SyncError::transient_fetch(err.to_string())
    } else {
        SyncError::fetch(err.to_string())
    }
}

/// Convert one driver cell to a field value.
pub(crate) fn field_from_value_ref(value: ValueRef<'_>) -> FieldValue {
    match value {
        ValueRef::Null => FieldValue::Null,
        ValueRef::Integer(v) => FieldValue::Integer(v),
        ValueRef::Real(v) => FieldValue::Float(v),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            FieldValue::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

/// Convert a field value to a driver parameter.
pub(crate) fn to_sql_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => Value::Null,
        FieldValue::Boolean(flag) => Value::Integer((*flag).into()),
        FieldValue::Integer(v) => Value::Integer(*v),
        FieldValue::Float(v) => Value::Real(*v),
        FieldValue::Text(text) => Value::Text(text.clone()),
        FieldValue::Timestamp(ts) => Value::Text(ts.format(TIMESTAMP_FORMAT).to_string()),
    }
}

/// Run a prepared statement and collect every result row as a field map.
pub(crate) fn read_rows<P: Params>(
    stmt: &mut Statement<'_>,
    params: P,
) -> rusqlite::Result<Vec<RowData>> {
    let names: Vec<String> = stmt.column_names().iter().map(|name| (*name).to_string()).collect();
    let mut rows = stmt.query(params)?;
    let mut result = Vec::new();
    while let Some(row) = rows.next()? {
        let mut data = RowData::new();
        for (index, name) in names.iter().enumerate() {
            data.insert(name.clone(), field_from_value_ref(row.get_ref(index)?));
        }
        result.push(data);
    }
    Ok(result)
}
