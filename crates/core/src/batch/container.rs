//! Per-entity buffer of rows pending persistence.

use std::collections::BTreeMap;

use rowsync_domain::{ColumnSet, RowData};

/// Pending inserts and updates for one target entity type.
///
/// Insert rows are kept in arrival order; update rows are keyed by the local
/// identifier, so adding the same id twice keeps the last row. The declared
/// column layouts decide what is persisted: row keys outside the layout are
/// ignored, declared columns absent from a row persist as NULL.
///
/// A container lives for one flush: populated during diffing, consumed by one
/// saver invocation, then discarded.
#[derive(Debug, Clone)]
pub struct BatchContainer {
    entity: String,
    insert_columns: ColumnSet,
    update_columns: ColumnSet,
    insert_rows: Vec<RowData>,
    update_rows: BTreeMap<i64, RowData>,
}

impl BatchContainer {
    /// Create an empty container for the given entity type and layouts.
    pub fn new(entity: impl Into<String>, insert_columns: ColumnSet, update_columns: ColumnSet) -> Self {
        Self {
            entity: entity.into(),
            insert_columns,
            update_columns,
            insert_rows: Vec::new(),
            update_rows: BTreeMap::new(),
        }
    }

    /// Queue a row: with an id it becomes a keyed update, without one an
    /// insert.
    pub fn add(&mut self, row: RowData, id: Option<i64>) {
        match id {
            Some(id) => {
                self.update_rows.insert(id, row);
            }
            None => self.insert_rows.push(row),
        }
    }

    /// Logical entity type name this container targets.
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Column layout for insert statements.
    pub fn insert_columns(&self) -> &ColumnSet {
        &self.insert_columns
    }

    /// Column layout for update statements.
    pub fn update_columns(&self) -> &ColumnSet {
        &self.update_columns
    }

    /// Rows queued for insertion, in arrival order.
    pub fn insert_rows(&self) -> &[RowData] {
        &self.insert_rows
    }

    /// Rows queued for update, keyed by local identifier.
    pub fn update_rows(&self) -> &BTreeMap<i64, RowData> {
        &self.update_rows
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.insert_rows.is_empty() && self.update_rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rowsync_domain::{ColumnKind, FieldValue};

    use super::*;

    fn row(name: &str) -> RowData {
        let mut r = RowData::new();
        r.insert("name".into(), FieldValue::from(name));
        r
    }

    fn container() -> BatchContainer {
        let columns = ColumnSet::new().with("name", ColumnKind::Text);
        BatchContainer::new("Account", columns.clone(), columns)
    }

    #[test]
    fn rows_without_id_queue_as_inserts() {
        let mut c = container();
        c.add(row("a"), None);
        c.add(row("b"), None);

        assert_eq!(c.insert_rows().len(), 2);
        assert!(c.update_rows().is_empty());
    }

    #[test]
    fn rows_with_id_queue_as_keyed_updates() {
        let mut c = container();
        c.add(row("a"), Some(7));

        assert!(c.insert_rows().is_empty());
        assert_eq!(c.update_rows().len(), 1);
        assert!(c.update_rows().contains_key(&7));
    }

    #[test]
    fn last_write_wins_for_a_given_id() {
        let mut c = container();
        c.add(row("first"), Some(7));
        c.add(row("second"), Some(7));

        assert_eq!(c.update_rows().len(), 1);
        assert_eq!(c.update_rows()[&7].get("name"), Some(&FieldValue::from("second")));
    }

    #[test]
    fn empty_container_reports_empty() {
        let mut c = container();
        assert!(c.is_empty());
        c.add(row("a"), None);
        assert!(!c.is_empty());
    }
}
