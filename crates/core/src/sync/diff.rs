//! Remote-vs-local change detection.
//!
//! Only declared check columns participate: a field outside the check set is
//! never compared and never triggers an update. Date/time values normalize to
//! the canonical string form and numeric-looking values compare as exact
//! decimals, so `"10.00"` against `10.0` is not a change.

use rowsync_domain::{ColumnSet, FieldValue, Result, RowData, SyncError};

/// One detected difference, kept for diagnostic logging only.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    /// Check column the difference was found in.
    pub column: String,
    /// Value on the local side.
    pub local: FieldValue,
    /// Value on the remote side.
    pub remote: FieldValue,
}

/// Result of diffing one remote row against its local counterpart.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    /// Update payload: raw remote values of exactly the differing columns.
    pub values: RowData,
    /// Per-column local/remote pairs for logging.
    pub changes: Vec<FieldChange>,
}

impl ChangeSet {
    /// Whether the row needs an update.
    pub fn is_changed(&self) -> bool {
        !self.values.is_empty()
    }
}

/// Diff every declared check column of `remote` against `local`.
///
/// A check column missing from the local row is a contract violation and
/// fails fast naming the column - unless the remote value for it is an empty
/// string, which is treated as "no value" and tolerated silently. Columns the
/// remote row does not carry are not compared.
pub fn detect_changes(
    check_columns: &ColumnSet,
    local: &RowData,
    remote: &RowData,
) -> Result<ChangeSet> {
    let mut result = ChangeSet::default();
    for (name, _kind) in check_columns.iter() {
        let Some(local_value) = local.get(name) else {
            match remote.get(name) {
                Some(FieldValue::Text(text)) if text.is_empty() => continue,
                _ => return Err(SyncError::MissingCheckColumn(name.to_string())),
            }
        };
        let Some(remote_value) = remote.get(name) else {
            continue;
        };
        if values_differ(local_value, remote_value) {
            result.values.insert(name.to_string(), remote_value.clone());
            result.changes.push(FieldChange {
                column: name.to_string(),
                local: local_value.clone(),
                remote: remote_value.clone(),
            });
        }
    }
    Ok(result)
}

/// Whether two field values differ after normalization.
///
/// Numeric-looking pairs compare as exact decimals; date/time values compare
/// by their canonical string form; everything else by value equality.
pub fn values_differ(local: &FieldValue, remote: &FieldValue) -> bool {
    if let (Some(local_num), Some(remote_num)) = (local.as_decimal(), remote.as_decimal()) {
        return local_num != remote_num;
    }
    normalized(local) != normalized(remote)
}

fn normalized(value: &FieldValue) -> FieldValue {
    match value {
        FieldValue::Timestamp(_) => {
            FieldValue::Text(value.render().unwrap_or_default())
        }
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rowsync_domain::ColumnKind;

    use super::*;

    fn check_columns() -> ColumnSet {
        ColumnSet::new()
            .with("name", ColumnKind::Text)
            .with("amount", ColumnKind::Decimal)
            .with("status", ColumnKind::Text)
    }

    fn row(pairs: &[(&str, FieldValue)]) -> RowData {
        pairs.iter().map(|(k, v)| ((*k).to_string(), v.clone())).collect()
    }

    #[test]
    fn converged_rows_yield_an_empty_change_set() {
        let local = row(&[
            ("name", FieldValue::from("acme")),
            ("amount", FieldValue::from("10.00")),
            ("status", FieldValue::from("active")),
        ]);
        let remote = row(&[
            ("name", FieldValue::from("acme")),
            ("amount", FieldValue::Float(10.0)),
            ("status", FieldValue::from("active")),
        ]);

        let change_set = detect_changes(&check_columns(), &local, &remote).unwrap();

        assert!(!change_set.is_changed());
        assert!(change_set.changes.is_empty());
    }

    #[test]
    fn only_differing_columns_enter_the_update_payload() {
        let local = row(&[
            ("name", FieldValue::from("acme")),
            ("amount", FieldValue::from("10.00")),
            ("status", FieldValue::from("active")),
        ]);
        let remote = row(&[
            ("name", FieldValue::from("acme")),
            ("amount", FieldValue::Float(12.5)),
            ("status", FieldValue::from("active")),
        ]);

        let change_set = detect_changes(&check_columns(), &local, &remote).unwrap();

        assert!(change_set.is_changed());
        assert_eq!(change_set.values.len(), 1);
        // The payload carries the raw remote value, not a normalized form.
        assert_eq!(change_set.values.get("amount"), Some(&FieldValue::Float(12.5)));
        assert_eq!(change_set.changes.len(), 1);
        assert_eq!(change_set.changes[0].column, "amount");
        assert_eq!(change_set.changes[0].local, FieldValue::from("10.00"));
        assert_eq!(change_set.changes[0].remote, FieldValue::Float(12.5));
    }

    #[test]
    fn missing_local_column_with_empty_remote_text_is_tolerated() {
        let local = row(&[("name", FieldValue::from("acme")), ("amount", FieldValue::from("1"))]);
        let remote = row(&[
            ("name", FieldValue::from("acme")),
            ("amount", FieldValue::from("1")),
            ("status", FieldValue::from("")),
        ]);

        let change_set = detect_changes(&check_columns(), &local, &remote).unwrap();

        assert!(!change_set.is_changed());
        assert!(!change_set.values.contains_key("status"));
    }

    #[test]
    fn missing_local_column_with_non_empty_remote_fails_naming_it() {
        let local = row(&[("name", FieldValue::from("acme")), ("amount", FieldValue::from("1"))]);
        let remote = row(&[
            ("name", FieldValue::from("acme")),
            ("amount", FieldValue::from("1")),
            ("status", FieldValue::from("active")),
        ]);

        let result = detect_changes(&check_columns(), &local, &remote);

        match result {
            Err(SyncError::MissingCheckColumn(column)) => assert_eq!(column, "status"),
            other => panic!("expected missing check column error, got {other:?}"),
        }
    }

    #[test]
    fn columns_absent_from_the_remote_row_are_not_compared() {
        let local = row(&[
            ("name", FieldValue::from("acme")),
            ("amount", FieldValue::from("1")),
            ("status", FieldValue::from("active")),
        ]);
        let remote = row(&[("name", FieldValue::from("other"))]);

        let change_set = detect_changes(&check_columns(), &local, &remote).unwrap();

        assert_eq!(change_set.values.len(), 1);
        assert!(change_set.values.contains_key("name"));
    }

    #[test]
    fn fields_outside_the_check_set_never_trigger_updates() {
        let local = row(&[
            ("name", FieldValue::from("acme")),
            ("amount", FieldValue::from("1")),
            ("status", FieldValue::from("active")),
            ("comment", FieldValue::from("local note")),
        ]);
        let mut remote = local.clone();
        remote.insert("comment".into(), FieldValue::from("remote note"));

        let change_set = detect_changes(&check_columns(), &local, &remote).unwrap();

        assert!(!change_set.is_changed());
    }

    #[test]
    fn decimal_equality_spans_representations() {
        assert!(!values_differ(&FieldValue::from("10.00"), &FieldValue::Float(10.0)));
        assert!(!values_differ(&FieldValue::Integer(10), &FieldValue::from("10.000")));
        assert!(!values_differ(&FieldValue::Float(0.1), &FieldValue::from("0.1")));
        assert!(values_differ(&FieldValue::from("10.001"), &FieldValue::Float(10.0)));
    }

    #[test]
    fn timestamps_compare_by_canonical_string() {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap().and_hms_opt(8, 15, 0).unwrap();
        let as_value = FieldValue::Timestamp(ts);
        let as_text = FieldValue::from("2024-03-07 08:15:00");

        assert!(!values_differ(&as_value, &as_text));
        assert!(values_differ(&as_value, &FieldValue::from("2024-03-07 08:15:01")));
    }

    #[test]
    fn plain_values_compare_by_equality() {
        assert!(values_differ(&FieldValue::from("a"), &FieldValue::from("b")));
        assert!(!values_differ(&FieldValue::Null, &FieldValue::Null));
        assert!(values_differ(&FieldValue::Boolean(true), &FieldValue::Boolean(false)));
        assert!(values_differ(&FieldValue::Null, &FieldValue::from("a")));
    }
}
