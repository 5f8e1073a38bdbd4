//! Change-detection and synchronization orchestration
//!
//! This module sequences data providers, diffs remote rows against local
//! state, and routes changed or brand-new rows into batch persistence.

pub mod diff;
pub mod entity;
pub mod ports;
pub mod runner;

pub use diff::{detect_changes, values_differ, ChangeSet, FieldChange};
pub use entity::EntitySyncHandler;
pub use ports::{DataProvider, LocalIndex, LocalMatch};
pub use runner::{handler_fn, SyncHandler, SyncRunner, DEFAULT_PAGE_LIMIT};
