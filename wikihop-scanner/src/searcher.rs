use crate::coordinator::Coordinator;
use crate::dedup::DedupSet;
use crate::error::Result;
use crate::extract::Extractor;
use crate::fetch::Fetcher;
use crate::frontier::PagePath;
use crate::result::{Discovery, DiscoveryKind, SearchOutcome};
use crate::stats::{SearchStats, StatsSnapshot};
use crate::workers::{RetryPolicy, SearchContext, fetch_worker, parse_worker};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

pub const DEFAULT_FETCH_WORKERS: usize = 8;
pub const DEFAULT_PARSE_WORKERS: usize = 4;

/// Observable state of a [`SearchRun`]. Seeding happens inside
/// [`Searcher::start`], so a run is `Running` from the moment it exists and
/// never returns to it once `Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Running,
    Stopped,
}

/// Configures and launches searches from one page to another.
pub struct Searcher {
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn Extractor>,
    fetch_workers: usize,
    parse_workers: usize,
    retry: RetryPolicy,
}

impl Searcher {
    pub fn new(fetcher: impl Fetcher + 'static, extractor: impl Extractor + 'static) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            extractor: Arc::new(extractor),
            fetch_workers: DEFAULT_FETCH_WORKERS,
            parse_workers: DEFAULT_PARSE_WORKERS,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_fetch_workers(mut self, workers: usize) -> Self {
        self.fetch_workers = workers.max(1);
        self
    }

    pub fn with_parse_workers(mut self, workers: usize) -> Self {
        self.parse_workers = workers.max(1);
        self
    }

    pub fn with_max_fetch_attempts(mut self, attempts: Option<u32>) -> Self {
        self.retry.max_attempts = attempts.map(|n| n.max(1));
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry.delay = delay;
        self
    }

    /// Seed the frontier with `source` and spawn both worker pools.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, source: &str, destination: &str) -> SearchRun {
        info!(
            "Starting search {} -> {} with {} fetch / {} parse workers",
            source, destination, self.fetch_workers, self.parse_workers
        );

        let context = Arc::new(SearchContext {
            coordinator: Coordinator::new(),
            visited: DedupSet::new(),
            stats: SearchStats::new(),
            fetcher: self.fetcher.clone(),
            extractor: self.extractor.clone(),
            destination: destination.to_string(),
            retry: self.retry,
        });

        if source == destination {
            context.coordinator.stop(SearchOutcome::Found(Discovery {
                path: PagePath::new(source),
                via: DiscoveryKind::Origin,
            }));
            return SearchRun {
                context,
                workers: Vec::new(),
            };
        }

        context.visited.insert_if_absent(source.to_string());
        context.coordinator.schedule(PagePath::new(source));
        debug!("Seeded frontier with {}", source);

        let mut workers = Vec::with_capacity(self.fetch_workers + self.parse_workers);
        for worker_id in 0..self.fetch_workers {
            workers.push(tokio::spawn(fetch_worker(worker_id, context.clone())));
        }
        for worker_id in 0..self.parse_workers {
            workers.push(tokio::spawn(parse_worker(worker_id, context.clone())));
        }
        debug!("Spawned {} worker(s)", workers.len());

        SearchRun { context, workers }
    }

    /// Run a search to completion.
    pub async fn search(&self, source: &str, destination: &str) -> Result<SearchOutcome> {
        self.start(source, destination).wait().await
    }
}

/// A search in progress.
pub struct SearchRun {
    context: Arc<SearchContext>,
    workers: Vec<JoinHandle<()>>,
}

impl SearchRun {
    pub fn phase(&self) -> RunPhase {
        if self.context.coordinator.is_running() {
            RunPhase::Running
        } else {
            RunPhase::Stopped
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            context: self.context.clone(),
        }
    }

    pub fn monitor(&self) -> SearchMonitor {
        SearchMonitor {
            context: self.context.clone(),
        }
    }

    /// Wait for the run to stop, join every worker and return the outcome.
    pub async fn wait(self) -> Result<SearchOutcome> {
        let outcome = self.context.coordinator.wait_finished().await;
        debug!("Run phase: {:?}", RunPhase::Stopped);

        for joined in join_all(self.workers).await {
            joined?;
        }

        info!(
            "Search finished after discovering {} page(s)",
            self.context.visited.size()
        );
        Ok(outcome)
    }
}

/// Requests an external stop of a run. Cheap to clone.
#[derive(Clone)]
pub struct StopHandle {
    context: Arc<SearchContext>,
}

impl StopHandle {
    /// Returns `true` if this call ended the run.
    pub fn stop(&self) -> bool {
        self.context.coordinator.stop(SearchOutcome::Stopped)
    }

    pub fn is_running(&self) -> bool {
        self.context.coordinator.is_running()
    }
}

/// Read-only view of a run for periodic reporters.
#[derive(Clone)]
pub struct SearchMonitor {
    context: Arc<SearchContext>,
}

impl SearchMonitor {
    /// Current queue depths and page count, plus fetch/parse counts since the
    /// previous snapshot.
    pub fn snapshot(&self) -> StatsSnapshot {
        self.context.snapshot()
    }

    pub fn is_running(&self) -> bool {
        self.context.coordinator.is_running()
    }
}
