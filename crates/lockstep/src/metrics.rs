//! Optional per-captor metrics.
//!
//! Counters are `CachePadded` atomics so a shared captor's inject path
//! (producer thread) and capture path (consumer thread) do not contend on
//! one cache line.

use crossbeam_utils::CachePadded;
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe capture counters for one captor.
#[derive(Debug, Default)]
pub struct Metrics {
    injected: CachePadded<AtomicU64>,
    evicted: CachePadded<AtomicU64>,
    primed: CachePadded<AtomicU64>,
    retries: CachePadded<AtomicU64>,
    aborts: CachePadded<AtomicU64>,
}

impl Metrics {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn add_injected(&self, n: u64) {
        self.injected.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_evicted(&self, n: u64) {
        self.evicted.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_primed(&self) {
        self.primed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_retry(&self) {
        self.retries.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_abort(&self) {
        self.aborts.fetch_add(1, Ordering::Relaxed);
    }

    /// Takes a point-in-time snapshot of all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            injected: self.injected.load(Ordering::Relaxed),
            evicted: self.evicted.load(Ordering::Relaxed),
            primed_captures: self.primed.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            aborts: self.aborts.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time metrics snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Elements fed in via `inject`/`inject_range`.
    pub injected: u64,
    /// Elements dropped by the bounded-queue eviction rule.
    pub evicted: u64,
    /// Capture attempts that produced output.
    pub primed_captures: u64,
    /// Capture attempts that returned `Retry`.
    pub retries: u64,
    /// Abort signals applied to this captor.
    pub aborts: u64,
}
