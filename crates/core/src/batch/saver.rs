//! Size-bounded statement generation and transactional execution.

use rowsync_domain::{ColumnKind, ColumnSet, FieldValue, Result, RowData, TIMESTAMP_FORMAT};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::container::BatchContainer;
use super::ports::{SqlExecutor, TableResolver};
use super::report::BatchReport;

/// Batch saver tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaverConfig {
    /// Maximum rows per insert statement / update transaction.
    pub batch_size: usize,
    /// Total execution attempts per statement, transient failures included.
    pub number_of_retries: u32,
    /// When false, pending updates are counted as skipped instead of issued.
    pub update_enabled: bool,
}

impl Default for SaverConfig {
    fn default() -> Self {
        Self { batch_size: 100, number_of_retries: 1, update_enabled: true }
    }
}

/// Consumes a [`BatchContainer`] and flushes it through the execution port.
///
/// Insert rows become multi-row `INSERT` statements of at most
/// `batch_size` rows; update rows become per-row `UPDATE` statements
/// concatenated into one multi-statement execution per chunk. Each execution
/// runs in an explicit transaction and transient failures retry the identical
/// statement up to `number_of_retries` total attempts.
pub struct BatchSaver {
    executor: Box<dyn SqlExecutor>,
    resolver: Box<dyn TableResolver>,
    config: SaverConfig,
}

impl BatchSaver {
    /// Create a saver over the given execution port and table resolver.
    pub fn new(executor: Box<dyn SqlExecutor>, resolver: Box<dyn TableResolver>) -> Self {
        Self { executor, resolver, config: SaverConfig::default() }
    }

    /// Replace the default configuration.
    #[must_use]
    pub fn with_config(mut self, config: SaverConfig) -> Self {
        self.config = config;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &SaverConfig {
        &self.config
    }

    /// Flush the container: inserts first, then updates.
    pub fn save(&mut self, container: &BatchContainer, report: &mut BatchReport) -> Result<()> {
        self.save_insert(container, report)?;
        self.save_update(container, report)?;
        Ok(())
    }

    /// Flush pending insert rows, returning the affected-row total.
    pub fn save_insert(
        &mut self,
        container: &BatchContainer,
        report: &mut BatchReport,
    ) -> Result<u64> {
        let rows = container.insert_rows();
        if rows.is_empty() {
            return Ok(0);
        }

        let table = self.resolver.resolve_table_name(container.entity())?;
        let columns = container.insert_columns();
        let header = insert_header(&table, columns);
        let total_batches = rows.len().div_ceil(self.config.batch_size);
        info!(rows = rows.len(), batch_size = self.config.batch_size, "begin insert batch");

        let mut affected = 0;
        for (index, chunk) in rows.chunks(self.config.batch_size).enumerate() {
            let values: Vec<String> =
                chunk.iter().map(|row| self.insert_values(columns, row)).collect();
            let statement = format!("{}\n{};", header, values.join(",\n"));
            affected += self.exec(&statement)?;
            report.add_inserted(chunk.len() as u64);
            info!(batch = index + 1, total = total_batches, "complete insert batch");
        }
        Ok(affected)
    }

    /// Flush pending update rows, returning the affected-row total.
    ///
    /// With updates disabled every pending row is counted as skipped and no
    /// statement is issued. Updated counts are per row attempted: the chunk
    /// executes as one unit, so per-row outcomes are not visible.
    pub fn save_update(
        &mut self,
        container: &BatchContainer,
        report: &mut BatchReport,
    ) -> Result<u64> {
        let rows = container.update_rows();
        if rows.is_empty() {
            return Ok(0);
        }

        if !self.config.update_enabled {
            debug!(rows = rows.len(), "updates disabled, counting rows as skipped");
            report.add_skipped(rows.len() as u64);
            return Ok(0);
        }

        let table = self.resolver.resolve_table_name(container.entity())?;
        let columns = container.update_columns();
        let pairs: Vec<(i64, &RowData)> = rows.iter().map(|(id, row)| (*id, row)).collect();
        let total_batches = pairs.len().div_ceil(self.config.batch_size);
        info!(rows = pairs.len(), batch_size = self.config.batch_size, "begin update batch");

        let mut affected = 0;
        for (index, chunk) in pairs.chunks(self.config.batch_size).enumerate() {
            let statements: Vec<String> = chunk
                .iter()
                .map(|(id, row)| self.update_statement(&table, columns, *id, row))
                .collect();
            report.add_updated(chunk.len() as u64);
            affected += self.exec(&statements.join(";\n"))?;
            info!(batch = index + 1, total = total_batches, "complete update batch");
        }
        Ok(affected)
    }

    /// Execute one statement inside an explicit transaction with bounded
    /// retry. Transient failures roll back and retry the identical statement;
    /// anything else surfaces immediately.
    fn exec(&mut self, statement: &str) -> Result<u64> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            debug!(attempt, statement, "executing statement");

            self.executor.begin_transaction()?;
            let outcome = self.executor.execute(statement).and_then(|affected| {
                self.executor.commit()?;
                Ok(affected)
            });

            match outcome {
                Ok(affected) => return Ok(affected),
                Err(err) => {
                    if let Err(rollback_err) = self.executor.rollback() {
                        warn!(error = %rollback_err, "rollback failed");
                    }
                    if self.executor.is_transient(&err) && attempt < self.config.number_of_retries {
                        warn!(attempt, error = %err, "transient execution failure, retrying");
                    } else {
                        error!(error = %err, "statement execution failed");
                        return Err(err);
                    }
                }
            }
        }
    }

    fn insert_values(&self, columns: &ColumnSet, row: &RowData) -> String {
        let rendered: Vec<String> =
            columns.iter().map(|(name, kind)| self.render(row.get(name), kind)).collect();
        format!("({})", rendered.join(", "))
    }

    fn update_statement(
        &self,
        table: &str,
        columns: &ColumnSet,
        id: i64,
        row: &RowData,
    ) -> String {
        let assignments: Vec<String> = columns
            .iter()
            .filter_map(|(name, kind)| {
                row.get(name).map(|value| format!("{} = {}", name, self.render(Some(value), kind)))
            })
            .collect();
        format!(
            "UPDATE {} SET {} WHERE id = {}",
            table,
            assignments.join(", "),
            self.executor.quote(&FieldValue::Integer(id), ColumnKind::Integer)
        )
    }

    /// Render one value: NULL and booleans have fixed forms, timestamps
    /// normalize to the canonical string, everything else goes through the
    /// quoting port with the column's declared kind.
    fn render(&self, value: Option<&FieldValue>, kind: ColumnKind) -> String {
        match value {
            None | Some(FieldValue::Null) => "NULL".to_string(),
            Some(FieldValue::Boolean(flag)) => if *flag { "1" } else { "0" }.to_string(),
            Some(FieldValue::Timestamp(ts)) => {
                let text = FieldValue::Text(ts.format(TIMESTAMP_FORMAT).to_string());
                self.executor.quote(&text, kind)
            }
            Some(other) => self.executor.quote(other, kind),
        }
    }
}

fn insert_header(table: &str, columns: &ColumnSet) -> String {
    let names: Vec<&str> = columns.names().collect();
    format!("INSERT INTO {} ({}) VALUES ", table, names.join(", "))
}
