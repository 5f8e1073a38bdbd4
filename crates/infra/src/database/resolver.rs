//! Static entity-to-table resolution.

use std::collections::HashMap;

use rowsync_core::TableResolver;
use rowsync_domain::{Result, SyncError};

/// In-memory mapping of logical entity type names to physical table names.
#[derive(Debug, Clone, Default)]
pub struct StaticTableResolver {
    tables: HashMap<String, String>,
}

impl StaticTableResolver {
    /// Create an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mapping.
    #[must_use]
    pub fn with(mut self, entity: impl Into<String>, table: impl Into<String>) -> Self {
        self.tables.insert(entity.into(), table.into());
        self
    }
}

impl TableResolver for StaticTableResolver {
    fn resolve_table_name(&self, entity: &str) -> Result<String> {
        self.tables
            .get(entity)
            .cloned()
            .ok_or_else(|| SyncError::config(format!("no table mapping for entity {entity}")))
    }
}
