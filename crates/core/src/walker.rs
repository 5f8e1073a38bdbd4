//! Offset-paginated fetch loop with transient-failure retry.
//!
//! Streams result pages from a query source into a callback, one page in
//! memory at a time. Transient fetch failures reconnect and retry the same
//! offset; a short page signals end of data.

use rowsync_domain::{Result, RowData, SyncError};
use tracing::{debug, warn};

/// A query source the walker can page over.
pub trait PagedQuery {
    /// Page size configured on the query itself, used when the caller passes
    /// no explicit limit.
    fn configured_limit(&self) -> Option<usize> {
        None
    }

    /// Fetch one page of rows at the given offset.
    fn fetch_page(&mut self, offset: usize, limit: usize) -> Result<Vec<RowData>>;

    /// Re-establish the underlying connection after a transient failure.
    fn reconnect(&mut self) -> Result<()>;
}

/// Drives an offset-based pagination loop over a [`PagedQuery`].
#[derive(Debug, Clone, Copy)]
pub struct Walker {
    max_attempts: u32,
}

impl Default for Walker {
    fn default() -> Self {
        Self { max_attempts: 10 }
    }
}

impl Walker {
    /// Create a walker with the default retry budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a walker allowing `max_attempts` retries per failing fetch.
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self { max_attempts }
    }

    /// Walk the query page by page, invoking `on_page(rows, offset, limit)`
    /// for every fetched page.
    ///
    /// The effective limit is the explicit argument, else the query's
    /// configured limit, else unbounded (a single full fetch). A limit of
    /// zero is a configuration error raised before any I/O. The loop stops
    /// after the first page shorter than the limit; a page exactly equal to
    /// the limit always triggers one more fetch at the next offset.
    pub fn run<Q, C>(&self, query: &mut Q, limit: Option<usize>, mut on_page: C) -> Result<()>
    where
        Q: PagedQuery + ?Sized,
        C: FnMut(&[RowData], usize, usize) -> Result<()>,
    {
        let limit = limit.or_else(|| query.configured_limit()).unwrap_or(usize::MAX);
        if limit == 0 {
            return Err(SyncError::config("page limit must be greater than zero"));
        }

        let mut offset = 0;
        loop {
            let rows = self.fetch_with_retry(query, offset, limit)?;
            debug!(offset, rows = rows.len(), "fetched page");
            on_page(&rows, offset, limit)?;
            if rows.len() < limit {
                return Ok(());
            }
            offset += limit;
        }
    }

    /// Fetch one page, reconnecting and retrying the same offset on transient
    /// failure until the retry budget is spent.
    fn fetch_with_retry<Q>(&self, query: &mut Q, offset: usize, limit: usize) -> Result<Vec<RowData>>
    where
        Q: PagedQuery + ?Sized,
    {
        let mut remaining = self.max_attempts;
        loop {
            match query.fetch_page(offset, limit) {
                Ok(rows) => return Ok(rows),
                Err(err) if err.is_retryable() && remaining > 0 => {
                    remaining -= 1;
                    warn!(offset, remaining, error = %err, "transient fetch failure, reconnecting");
                    query.reconnect()?;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rowsync_domain::FieldValue;

    use super::*;

    /// In-memory query source with a scriptable failure sequence.
    struct FakeQuery {
        total_rows: usize,
        configured_limit: Option<usize>,
        /// One entry per upcoming fetch call; `true` makes that call fail
        /// transiently.
        failures: Vec<bool>,
        fetch_calls: u32,
        reconnects: u32,
    }

    impl FakeQuery {
        fn with_rows(total_rows: usize) -> Self {
            Self {
                total_rows,
                configured_limit: None,
                failures: Vec::new(),
                fetch_calls: 0,
                reconnects: 0,
            }
        }
    }

    impl PagedQuery for FakeQuery {
        fn configured_limit(&self) -> Option<usize> {
            self.configured_limit
        }

        fn fetch_page(&mut self, offset: usize, limit: usize) -> Result<Vec<RowData>> {
            self.fetch_calls += 1;
            if !self.failures.is_empty() && self.failures.remove(0) {
                return Err(SyncError::transient_database("server has gone away"));
            }
            let end = self.total_rows.min(offset.saturating_add(limit));
            let rows = (offset..end)
                .map(|i| {
                    let mut row = RowData::new();
                    row.insert("id".into(), FieldValue::Integer(i as i64));
                    row
                })
                .collect();
            Ok(rows)
        }

        fn reconnect(&mut self) -> Result<()> {
            self.reconnects += 1;
            Ok(())
        }
    }

    #[test]
    fn fetches_every_page_in_offset_order() {
        let mut query = FakeQuery::with_rows(9);
        let mut pages: Vec<(usize, usize)> = Vec::new();

        Walker::new()
            .run(&mut query, Some(5), |rows, offset, limit| {
                pages.push((offset, rows.len()));
                assert_eq!(limit, 5);
                Ok(())
            })
            .unwrap();

        assert_eq!(pages, vec![(0, 5), (5, 4)]);
        assert_eq!(query.fetch_calls, 2);
    }

    #[test]
    fn full_final_page_triggers_exactly_one_more_fetch() {
        let mut query = FakeQuery::with_rows(10);
        let mut pages = 0;

        Walker::new()
            .run(&mut query, Some(5), |_, _, _| {
                pages += 1;
                Ok(())
            })
            .unwrap();

        // 5 + 5 + 0: the trailing empty page is fetched and delivered.
        assert_eq!(query.fetch_calls, 3);
        assert_eq!(pages, 3);
    }

    #[test]
    fn falls_back_to_the_query_configured_limit() {
        let mut query = FakeQuery::with_rows(4);
        query.configured_limit = Some(3);
        let mut pages: Vec<usize> = Vec::new();

        Walker::new()
            .run(&mut query, None, |rows, _, limit| {
                assert_eq!(limit, 3);
                pages.push(rows.len());
                Ok(())
            })
            .unwrap();

        assert_eq!(pages, vec![3, 1]);
    }

    #[test]
    fn unbounded_limit_fetches_once() {
        let mut query = FakeQuery::with_rows(7);
        let mut pages: Vec<usize> = Vec::new();

        Walker::new()
            .run(&mut query, None, |rows, _, _| {
                pages.push(rows.len());
                Ok(())
            })
            .unwrap();

        assert_eq!(pages, vec![7]);
        assert_eq!(query.fetch_calls, 1);
    }

    #[test]
    fn zero_limit_is_a_configuration_error_before_any_io() {
        let mut query = FakeQuery::with_rows(7);

        let result = Walker::new().run(&mut query, Some(0), |_, _, _| Ok(()));

        assert!(matches!(result, Err(SyncError::Config(_))));
        assert_eq!(query.fetch_calls, 0);
    }

    #[test]
    fn transient_failure_reconnects_and_retries_the_same_offset() {
        let mut query = FakeQuery::with_rows(3);
        query.failures = vec![true, true, false];
        let mut offsets: Vec<usize> = Vec::new();

        Walker::new()
            .run(&mut query, Some(5), |_, offset, _| {
                offsets.push(offset);
                Ok(())
            })
            .unwrap();

        assert_eq!(offsets, vec![0]);
        assert_eq!(query.fetch_calls, 3);
        assert_eq!(query.reconnects, 2);
    }

    #[test]
    fn retry_exhaustion_propagates_the_underlying_error() {
        let mut query = FakeQuery::with_rows(3);
        query.failures = vec![true; 4];

        let result = Walker::with_max_attempts(3).run(&mut query, Some(5), |_, _, _| Ok(()));

        assert!(matches!(result, Err(SyncError::Database { transient: true, .. })));
        // Initial attempt plus three retries.
        assert_eq!(query.fetch_calls, 4);
        assert_eq!(query.reconnects, 3);
    }

    #[test]
    fn fatal_fetch_errors_do_not_retry() {
        struct FatalQuery;

        impl PagedQuery for FatalQuery {
            fn fetch_page(&mut self, _offset: usize, _limit: usize) -> Result<Vec<RowData>> {
                Err(SyncError::database("no such table"))
            }

            fn reconnect(&mut self) -> Result<()> {
                unreachable!("fatal errors must not reconnect")
            }
        }

        let result = Walker::new().run(&mut FatalQuery, Some(5), |_, _, _| Ok(()));
        assert!(matches!(result, Err(SyncError::Database { transient: false, .. })));
    }

    #[test]
    fn callback_errors_stop_the_walk() {
        let mut query = FakeQuery::with_rows(10);
        let mut pages = 0;

        let result = Walker::new().run(&mut query, Some(5), |_, _, _| {
            pages += 1;
            Err(SyncError::data_contract("bad page"))
        });

        assert!(matches!(result, Err(SyncError::DataContract(_))));
        assert_eq!(pages, 1);
        assert_eq!(query.fetch_calls, 1);
    }
}
