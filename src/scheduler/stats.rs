use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Final tally of a run. Every task handed to a worker ends up in exactly
/// one of `success` or `fail`; tasks never dispatched are in neither.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStatistics {
    pub success: usize,
    pub fail: usize,
    pub total: usize,
}

impl RunStatistics {
    /// Tasks that ran to a success or failure verdict.
    pub fn processed(&self) -> usize {
        self.success + self.fail
    }

    /// Tasks never handed to a worker, which only happens after a stop.
    pub fn not_started(&self) -> usize {
        self.total.saturating_sub(self.processed())
    }
}

/// Lock-free counters updated by workers as tasks finish.
#[derive(Debug, Default)]
pub struct StatsCounter {
    success: AtomicUsize,
    fail: AtomicUsize,
    total: AtomicUsize,
}

impl StatsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_total(&self, total: usize) {
        self.total.store(total, Ordering::SeqCst);
    }

    pub fn record_success(&self) {
        self.success.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_failure(&self) {
        self.fail.fetch_add(1, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> RunStatistics {
        RunStatistics {
            success: self.success.load(Ordering::SeqCst),
            fail: self.fail.load(Ordering::SeqCst),
            total: self.total.load(Ordering::SeqCst),
        }
    }
}
