//! # Rowsync Core
//!
//! Pure replication logic - no infrastructure dependencies.
//!
//! This crate contains:
//! - The paginated fetch walker with transient-failure retry
//! - The sync orchestrator: provider sequencing, change detection, row routing
//! - Batch accumulation and persistence: container, report, saver
//! - Port/adapter interfaces (traits) for everything external
//!
//! ## Architecture Principles
//! - Only depends on `rowsync-domain`
//! - No database or network code
//! - All external dependencies via traits
//! - Pure, testable replication logic

pub mod batch;
pub mod sync;
pub mod walker;

// Re-export specific items to avoid ambiguity
pub use batch::ports::{SqlExecutor, TableResolver};
pub use batch::{BatchContainer, BatchReport, BatchSaver, SaverConfig};
pub use sync::ports::{DataProvider, LocalIndex, LocalMatch};
pub use sync::{
    detect_changes, handler_fn, values_differ, ChangeSet, EntitySyncHandler, FieldChange,
    SyncHandler, SyncRunner, DEFAULT_PAGE_LIMIT,
};
pub use walker::{PagedQuery, Walker};
