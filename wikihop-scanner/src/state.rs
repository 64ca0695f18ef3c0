use std::sync::atomic::{AtomicBool, Ordering};

/// The per-run "still searching" flag.
///
/// Starts out `true` and flips to `false` exactly once; there is no way back.
#[derive(Debug)]
pub struct SearchState {
    running: AtomicBool,
}

impl SearchState {
    pub fn new() -> Self {
        Self {
            running: AtomicBool::new(true),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Flip the flag to `false`. Returns `true` only for the caller that
    /// performed the transition.
    pub fn finish(&self) -> bool {
        self.running
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new()
    }
}
