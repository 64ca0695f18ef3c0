use crate::frontier::{FetchedItem, FrontierItem, PagePath};
use crate::queue::WorkQueue;
use crate::result::SearchOutcome;
use crate::state::SearchState;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;
use tracing::{debug, info};

/// Owns the run's shared queues and decides when, and how, the run ends.
///
/// The first call to [`Coordinator::stop`] wins: it records the outcome, flips
/// the running flag and wakes every waiter. Later calls are no-ops.
pub struct Coordinator {
    state: Arc<SearchState>,
    frontier: WorkQueue<FrontierItem>,
    parse_queue: WorkQueue<FetchedItem>,
    outcome: Mutex<Option<SearchOutcome>>,
    finished: Notify,
    // Frontier items that have been scheduled but not yet retired.
    pending: AtomicUsize,
}

impl Coordinator {
    pub fn new() -> Self {
        let state = Arc::new(SearchState::new());
        Self {
            frontier: WorkQueue::new(state.clone()),
            parse_queue: WorkQueue::new(state.clone()),
            state,
            outcome: Mutex::new(None),
            finished: Notify::new(),
            pending: AtomicUsize::new(0),
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn frontier(&self) -> &WorkQueue<FrontierItem> {
        &self.frontier
    }

    pub fn parse_queue(&self) -> &WorkQueue<FetchedItem> {
        &self.parse_queue
    }

    /// Number of frontier items still being worked on somewhere.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    /// Push `path` onto the frontier and count it as pending work.
    pub fn schedule(&self, path: PagePath) {
        self.pending.fetch_add(1, Ordering::AcqRel);
        self.frontier.push(FrontierItem::new(path));
    }

    /// Mark one scheduled item as fully handled. Retiring the last one means
    /// nothing reachable is left to expand.
    pub fn retire(&self) {
        if self.pending.fetch_sub(1, Ordering::AcqRel) == 1 {
            debug!("Frontier drained with no pending work");
            self.stop(SearchOutcome::Exhausted);
        }
    }

    /// End the run with `outcome`. Returns `true` if this call ended it.
    pub fn stop(&self, outcome: SearchOutcome) -> bool {
        {
            // Hold the slot while flipping the flag so anyone who sees the
            // flag down also sees the outcome.
            let mut slot = self.lock_outcome();
            if !self.state.finish() {
                return false;
            }
            info!("Search stopping: {:?}", outcome);
            *slot = Some(outcome);
        }

        self.frontier.notify_all();
        self.parse_queue.notify_all();
        self.finished.notify_waiters();
        true
    }

    /// Block until some caller has stopped the run and return its outcome.
    pub async fn wait_finished(&self) -> SearchOutcome {
        loop {
            let notified = self.finished.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if !self.state.is_running() {
                return self
                    .lock_outcome()
                    .clone()
                    .unwrap_or(SearchOutcome::Stopped);
            }

            notified.await;
        }
    }

    fn lock_outcome(&self) -> MutexGuard<'_, Option<SearchOutcome>> {
        self.outcome.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}
