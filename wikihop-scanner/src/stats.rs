use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Advisory throughput counters. Reset every time a snapshot is taken.
#[derive(Debug, Default)]
pub struct SearchStats {
    fetched: AtomicUsize,
    parsed: AtomicUsize,
}

impl SearchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_fetch(&self) {
        self.fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_parse(&self) {
        self.parsed.fetch_add(1, Ordering::Relaxed);
    }

    /// Read and zero both counters, returning `(fetched, parsed)`.
    pub fn take(&self) -> (usize, usize) {
        (
            self.fetched.swap(0, Ordering::Relaxed),
            self.parsed.swap(0, Ordering::Relaxed),
        )
    }
}

/// Point-in-time view of a running search, for reporters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub frontier_depth: usize,
    pub parse_depth: usize,
    pub known_pages: usize,
    /// Pages fetched since the previous snapshot.
    pub fetched: usize,
    /// Pages parsed since the previous snapshot.
    pub parsed: usize,
}
