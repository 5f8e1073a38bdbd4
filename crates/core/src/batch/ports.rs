//! Port interfaces for batch persistence

use rowsync_domain::{ColumnKind, FieldValue, Result, SyncError};

/// Execution side of the local store.
///
/// One implementation wraps one database connection; the pipeline uses it
/// exclusively and sequentially. A statement passed to [`execute`] may contain
/// several `;`-separated statements which execute as one unit.
///
/// [`execute`]: SqlExecutor::execute
pub trait SqlExecutor: Send {
    /// Open an explicit transaction.
    fn begin_transaction(&mut self) -> Result<()>;

    /// Execute a raw statement, returning the affected-row count.
    fn execute(&mut self, statement: &str) -> Result<u64>;

    /// Commit the open transaction.
    fn commit(&mut self) -> Result<()>;

    /// Roll back the open transaction.
    fn rollback(&mut self) -> Result<()>;

    /// Render a value as a safely embeddable literal for the given column
    /// kind.
    fn quote(&self, value: &FieldValue, kind: ColumnKind) -> String;

    /// Whether a failure reported by this executor is worth retrying.
    fn is_transient(&self, error: &SyncError) -> bool {
        error.is_retryable()
    }

    /// Re-establish the underlying connection after a transient failure.
    fn reconnect(&mut self) -> Result<()>;
}

/// Entity/table metadata resolution.
pub trait TableResolver: Send {
    /// Map a logical entity type name to its physical table name.
    fn resolve_table_name(&self, entity: &str) -> Result<String>;
}
