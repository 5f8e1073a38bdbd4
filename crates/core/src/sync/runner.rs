//! Provider sequencing for one sync run.

use rowsync_domain::{Result, RowData};
use tracing::{debug, info};

use super::ports::DataProvider;

/// Default page size for provider fetches.
pub const DEFAULT_PAGE_LIMIT: usize = 500;

/// Per-page sync step: the override point of the pipeline.
///
/// Implemented by [`EntitySyncHandler`](super::EntitySyncHandler) for the
/// standard diff-and-accumulate flow; [`handler_fn`] adapts a closure for
/// custom steps.
pub trait SyncHandler {
    /// Process one non-empty page of remote rows.
    fn sync(&mut self, rows: Vec<RowData>) -> Result<()>;
}

/// Adapt a closure into a [`SyncHandler`].
pub fn handler_fn<C>(callback: C) -> impl SyncHandler
where
    C: FnMut(Vec<RowData>) -> Result<()>,
{
    struct FnHandler<C>(C);

    impl<C> SyncHandler for FnHandler<C>
    where
        C: FnMut(Vec<RowData>) -> Result<()>,
    {
        fn sync(&mut self, rows: Vec<RowData>) -> Result<()> {
            (self.0)(rows)
        }
    }

    FnHandler(callback)
}

/// Walks an ordered list of data providers, one page at a time.
///
/// Providers are consumed in list order and never revisited; the list itself
/// stays intact behind an index cursor. The fetch offset is provider-local:
/// it resets to zero whenever the next provider becomes current. The run ends
/// once no provider remains and the current one has signalled stop.
pub struct SyncRunner<F> {
    providers: Vec<Box<dyn DataProvider<F>>>,
    limit: usize,
}

impl<F> Default for SyncRunner<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> SyncRunner<F> {
    /// Create a runner with the default page limit.
    pub fn new() -> Self {
        Self { providers: Vec::new(), limit: DEFAULT_PAGE_LIMIT }
    }

    /// Create a runner with an explicit page limit.
    pub fn with_limit(limit: usize) -> Self {
        Self { providers: Vec::new(), limit }
    }

    /// Append a provider to the end of the list.
    pub fn add_provider(&mut self, provider: Box<dyn DataProvider<F>>) -> &mut Self {
        self.providers.push(provider);
        self
    }

    /// Page size used for every fetch.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of registered providers.
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Run to completion: fetch pages from the current provider, hand every
    /// non-empty page to the handler, advance to the next provider when the
    /// current one signals stop.
    pub fn run(&mut self, filter: &F, handler: &mut dyn SyncHandler) -> Result<()> {
        info!(providers = self.providers.len(), "initialized data providers");
        if self.providers.is_empty() {
            return Ok(());
        }

        let mut current = 0;
        let mut offset = 0;
        loop {
            let provider = &mut self.providers[current];
            let rows = provider.fetch(filter, offset, self.limit)?;
            let proceed = provider.is_continue_fetch();
            debug!(provider = current, offset, rows = rows.len(), "fetched provider page");

            if !rows.is_empty() {
                handler.sync(rows)?;
            }

            if proceed {
                offset += self.limit;
            } else if current + 1 < self.providers.len() {
                current += 1;
                offset = 0;
            } else {
                break;
            }
        }
        info!("sync run complete");
        Ok(())
    }
}
