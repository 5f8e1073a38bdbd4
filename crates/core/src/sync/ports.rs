//! Port interfaces for sync operations

use rowsync_domain::{Result, RowData};

/// A source of remote rows for one logical dataset, queried by offset/limit.
///
/// Providers are stateful only in their continue-flag: fetching a short page
/// clears it, which tells the orchestrator this source is exhausted and the
/// next one should become current.
pub trait DataProvider<F>: Send {
    /// Fetch the next page of remote rows for the given filter.
    fn fetch(&mut self, filter: &F, offset: usize, limit: usize) -> Result<Vec<RowData>>;

    /// Whether this source still has data. Queried after each fetch.
    fn is_continue_fetch(&self) -> bool;
}

/// A local row matched to a remote one.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalMatch {
    /// Local store identifier, used as the update key.
    pub id: i64,
    /// The local row's fields, at least every declared check column.
    pub row: RowData,
}

/// Caller-defined lookup of the local row matching a remote row.
pub trait LocalIndex: Send {
    /// Locate the local counterpart of `remote`, or `None` when the remote
    /// row is new to the local store.
    fn find_local(&mut self, remote: &RowData) -> Result<Option<LocalMatch>>;
}
