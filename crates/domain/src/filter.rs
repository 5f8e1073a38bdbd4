//! Sync filter value objects.
//!
//! A filter describes the query constraint passed uniformly to every data
//! provider of one sync run. The pipeline is generic over the filter type;
//! [`PeriodFilter`] is the stock time-range variant.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, SyncError};

/// Immutable from/to time-range constraint for one sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodFilter {
    from: NaiveDateTime,
    to: NaiveDateTime,
}

impl PeriodFilter {
    /// Create a period filter. The range is inclusive of `from`, exclusive of
    /// `to`; an inverted range is a configuration error.
    pub fn new(from: NaiveDateTime, to: NaiveDateTime) -> Result<Self> {
        if from > to {
            return Err(SyncError::config(format!(
                "period filter range is inverted: {from} > {to}"
            )));
        }
        Ok(Self { from, to })
    }

    /// Start of the period (inclusive).
    pub fn from(&self) -> NaiveDateTime {
        self.from
    }

    /// End of the period (exclusive).
    pub fn to(&self) -> NaiveDateTime {
        self.to
    }
}
