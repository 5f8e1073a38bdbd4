//! # Rowsync Infrastructure
//!
//! SQLite implementations of the core replication ports.
//!
//! This crate contains:
//! - The execution port (transactions, raw statements, literal quoting)
//! - A paged query source for walking local tables
//! - A data provider reading pages from a source SQLite database
//! - A local row index and a static table resolver
//!
//! ## Architecture
//! - Implements traits defined in `rowsync-core`
//! - Depends on `rowsync-domain` and `rowsync-core`
//! - Contains all I/O

pub mod database;

// Re-export commonly used items
pub use database::{
    SqliteDataProvider, SqliteExecutor, SqliteLocalIndex, SqliteQuery, StaticTableResolver,
};
