//! Per-captor configuration.

use std::num::NonZeroUsize;

/// Configuration for a single captor's buffer and instrumentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaptorConfig {
    /// Queue capacity. `None` means unbounded. When bounded, an insert into
    /// a full queue drops the oldest element first — producers are never
    /// blocked on insertion.
    pub capacity: Option<NonZeroUsize>,
    /// Enable metrics collection (slight overhead).
    pub enable_metrics: bool,
}

impl CaptorConfig {
    /// Unbounded queue, metrics off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a queue capacity bound.
    pub fn with_capacity(mut self, capacity: NonZeroUsize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Enables metrics collection.
    pub fn with_metrics(mut self) -> Self {
        self.enable_metrics = true;
        self
    }
}
