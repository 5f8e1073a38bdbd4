//! Standard per-entity sync step: diff, classify, accumulate, flush.

use rowsync_domain::{ColumnSet, Result, RowData};
use tracing::debug;

use super::diff::detect_changes;
use super::ports::LocalIndex;
use super::runner::SyncHandler;
use crate::batch::{BatchContainer, BatchReport, BatchSaver};

/// Replicates one entity type: remote rows either insert, update the matched
/// local row, or skip when every checked column already agrees.
///
/// Each page gets a fresh [`BatchContainer`]; the owned saver flushes it at
/// the end of the page, so at most one page of decided rows is buffered.
pub struct EntitySyncHandler {
    entity: String,
    insert_columns: ColumnSet,
    update_columns: ColumnSet,
    check_columns: ColumnSet,
    index: Box<dyn LocalIndex>,
    saver: BatchSaver,
    report: BatchReport,
}

impl EntitySyncHandler {
    /// Create a handler for one entity type.
    ///
    /// `check_columns` decides which fields participate in change detection;
    /// `insert_columns`/`update_columns` decide what is persisted.
    pub fn new(
        entity: impl Into<String>,
        insert_columns: ColumnSet,
        update_columns: ColumnSet,
        check_columns: ColumnSet,
        index: Box<dyn LocalIndex>,
        saver: BatchSaver,
    ) -> Self {
        Self {
            entity: entity.into(),
            insert_columns,
            update_columns,
            check_columns,
            index,
            saver,
            report: BatchReport::new(),
        }
    }

    /// Running totals across every flushed page.
    pub fn report(&self) -> &BatchReport {
        &self.report
    }

    /// Consume the handler, yielding the final report.
    pub fn into_report(self) -> BatchReport {
        self.report
    }
}

impl SyncHandler for EntitySyncHandler {
    fn sync(&mut self, rows: Vec<RowData>) -> Result<()> {
        let mut container = BatchContainer::new(
            self.entity.clone(),
            self.insert_columns.clone(),
            self.update_columns.clone(),
        );

        for remote in rows {
            match self.index.find_local(&remote)? {
                None => container.add(remote, None),
                Some(local) => {
                    let change_set = detect_changes(&self.check_columns, &local.row, &remote)?;
                    if change_set.is_changed() {
                        for change in &change_set.changes {
                            debug!(
                                column = %change.column,
                                local = ?change.local,
                                remote = ?change.remote,
                                "detected change"
                            );
                        }
                        container.add(change_set.values, Some(local.id));
                    } else {
                        self.report.add_skipped(1);
                    }
                }
            }
        }

        self.saver.save(&container, &mut self.report)
    }
}
