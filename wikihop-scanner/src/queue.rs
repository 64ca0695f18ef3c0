use crate::state::SearchState;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

/// Result of a blocking dequeue.
#[derive(Debug, PartialEq, Eq)]
pub enum Recv<T> {
    Item(T),
    /// The search stopped while (or before) waiting. Not a work item.
    Cancelled,
}

/// FIFO shared between a producer pool and a consumer pool.
///
/// Consumers block in [`WorkQueue::wait_for_element`] until an item arrives or
/// the run's [`SearchState`] is finished. Once the run is finished, queued items
/// are left in place and never handed out.
pub struct WorkQueue<T> {
    items: Mutex<VecDeque<T>>,
    available: Notify,
    state: Arc<SearchState>,
}

impl<T> WorkQueue<T> {
    pub fn new(state: Arc<SearchState>) -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            available: Notify::new(),
            state,
        }
    }

    /// Enqueue `item` and wake at most one waiting consumer.
    pub fn push(&self, item: T) {
        self.lock().push_back(item);
        self.available.notify_one();
    }

    pub fn size(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Wake every blocked consumer without supplying an item.
    pub fn notify_all(&self) {
        self.available.notify_waiters();
    }

    /// Wait for the next item, or for the search to stop.
    pub async fn wait_for_element(&self) -> Recv<T> {
        loop {
            let notified = self.available.notified();
            tokio::pin!(notified);
            // Register before checking so a notify_all racing with the checks
            // below is not lost.
            notified.as_mut().enable();

            if !self.state.is_running() {
                return Recv::Cancelled;
            }

            let next = self.lock().pop_front();
            if let Some(item) = next {
                return Recv::Item(item);
            }

            notified.await;
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
