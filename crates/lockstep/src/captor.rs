//! Captors: one buffered stream plus its capture policy.
//!
//! A captor pairs a [`DispatchQueue`] with a policy and owns the stream's
//! capture lifecycle: `inject` feeds data in, `capture`/`dry_capture` take
//! frames out, `abort`/`reset` discard state. The plain captors here run on
//! the caller thread with `&mut self` access and no synchronization; the
//! wrappers in [`crate::shared`] add the mutex/condvar layer with the same
//! surface.
//!
//! The `*Probe`/`*Ops` traits mirror the inherent surface so the group
//! orchestrator can fold over heterogeneous tuples of captors, plain or
//! shared.

use crate::config::CaptorConfig;
use crate::dispatch::Dispatch;
use crate::metrics::{Metrics, MetricsSnapshot};
use crate::policy::{DriverPolicy, FollowerPolicy};
use crate::queue::DispatchQueue;
use crate::range::CaptureRange;
use crate::sink::Sink;
use crate::stamp::Stamp;
use crate::state::{CaptureState, GroupCapture};
use std::num::NonZeroUsize;

// ---------------------------------------------------------------------
// OPS TRAITS
// ---------------------------------------------------------------------

/// Sink-free driver surface: readiness, abort, reset.
pub trait DriverProbe {
    /// The stamp type driving the group.
    type Stamp: Stamp;

    /// Evaluates readiness and the candidate range without mutating.
    fn dry_capture(&self) -> GroupCapture<Self::Stamp>;

    /// Drops state up to the abort stamp.
    fn abort(&mut self, stamp: Self::Stamp);

    /// Clears the queue and policy state.
    fn reset(&mut self);
}

/// Driver capture surface for a given sink type.
pub trait DriveOps<K>: DriverProbe {
    /// Emits a frame's worth of elements to `sink` and returns the driving
    /// range.
    fn capture(&mut self, sink: &mut K) -> GroupCapture<Self::Stamp>;
}

/// Sink-free follower surface: readiness, abort, reset.
pub trait FollowerProbe {
    /// The stamp type shared with the driver.
    type Stamp: Stamp;

    /// Evaluates readiness against the driving range without mutating.
    fn dry_capture(&self, range: CaptureRange<Self::Stamp>) -> CaptureState;

    /// Drops state up to this policy's boundary for the abort stamp.
    fn abort(&mut self, stamp: Self::Stamp);

    /// Clears the queue and policy state.
    fn reset(&mut self);
}

/// Follower capture surface for a given sink type.
pub trait FollowOps<K>: FollowerProbe {
    /// Emits this stream's selection for `range` to `sink`.
    fn capture(&mut self, sink: &mut K, range: CaptureRange<Self::Stamp>) -> CaptureState;
}

// ---------------------------------------------------------------------
// DRIVER CAPTOR
// ---------------------------------------------------------------------

/// A single-threaded driver captor: queue + driver policy.
#[derive(Debug)]
pub struct DriverCaptor<P, D: Dispatch> {
    queue: DispatchQueue<D>,
    policy: P,
    metrics: Option<Metrics>,
}

impl<P, D> DriverCaptor<P, D>
where
    P: DriverPolicy<D>,
    D: Dispatch,
{
    /// Creates a captor with an unbounded queue.
    pub fn new(policy: P) -> Self {
        Self::with_config(policy, CaptorConfig::default())
    }

    /// Creates a captor with the given buffer configuration.
    pub fn with_config(policy: P, config: CaptorConfig) -> Self {
        Self {
            queue: DispatchQueue::from_config(&config),
            policy,
            metrics: config.enable_metrics.then(Metrics::new),
        }
    }

    /// Feeds one element in, repositioning out-of-order stamps.
    pub fn inject(&mut self, dispatch: D) {
        let evicted = self.queue.insert(dispatch);
        if let Some(m) = &self.metrics {
            m.add_injected(1);
            if evicted.is_some() {
                m.add_evicted(1);
            }
        }
    }

    /// Feeds a batch of elements in.
    pub fn inject_range<I: IntoIterator<Item = D>>(&mut self, dispatches: I) {
        for d in dispatches {
            self.inject(d);
        }
    }

    /// Evaluates readiness without mutating the queue.
    pub fn dry_capture(&self) -> GroupCapture<D::Stamp> {
        match self.policy.dry_capture(&self.queue) {
            Some(range) => GroupCapture::primed(range),
            None => GroupCapture::state_only(CaptureState::Retry),
        }
    }

    /// Captures a frame into `sink`, returning the driving range.
    pub fn capture<K: Sink<D>>(&mut self, sink: &mut K) -> GroupCapture<D::Stamp> {
        match self.policy.capture(&mut self.queue, sink) {
            Some(range) => {
                if let Some(m) = &self.metrics {
                    m.add_primed();
                }
                GroupCapture::primed(range)
            }
            None => {
                if let Some(m) = &self.metrics {
                    m.add_retry();
                }
                GroupCapture::state_only(CaptureState::Retry)
            }
        }
    }

    /// Drops state up to the abort stamp.
    pub fn abort(&mut self, stamp: D::Stamp) {
        self.policy.abort(&mut self.queue, stamp);
        if let Some(m) = &self.metrics {
            m.add_abort();
        }
    }

    /// Clears the queue and policy state.
    pub fn reset(&mut self) {
        self.queue.clear();
        self.policy.reset();
    }

    /// Number of queued elements.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// The configured queue bound, if any.
    pub fn capacity(&self) -> Option<NonZeroUsize> {
        self.queue.capacity()
    }

    /// Stamp of the oldest queued element.
    pub fn oldest_stamp(&self) -> Option<D::Stamp> {
        self.queue.oldest_stamp()
    }

    /// Metrics snapshot; zeros when metrics are disabled.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics
            .as_ref()
            .map(Metrics::snapshot)
            .unwrap_or_default()
    }
}

impl<P, D> DriverProbe for DriverCaptor<P, D>
where
    P: DriverPolicy<D>,
    D: Dispatch,
{
    type Stamp = D::Stamp;

    fn dry_capture(&self) -> GroupCapture<D::Stamp> {
        DriverCaptor::dry_capture(self)
    }

    fn abort(&mut self, stamp: D::Stamp) {
        DriverCaptor::abort(self, stamp);
    }

    fn reset(&mut self) {
        DriverCaptor::reset(self);
    }
}

impl<P, D, K> DriveOps<K> for DriverCaptor<P, D>
where
    P: DriverPolicy<D>,
    D: Dispatch,
    K: Sink<D>,
{
    fn capture(&mut self, sink: &mut K) -> GroupCapture<D::Stamp> {
        DriverCaptor::capture(self, sink)
    }
}

// ---------------------------------------------------------------------
// FOLLOWER CAPTOR
// ---------------------------------------------------------------------

/// A single-threaded follower captor: queue + follower policy.
#[derive(Debug)]
pub struct FollowerCaptor<P, D: Dispatch> {
    queue: DispatchQueue<D>,
    policy: P,
    metrics: Option<Metrics>,
}

impl<P, D> FollowerCaptor<P, D>
where
    P: FollowerPolicy<D>,
    D: Dispatch,
{
    /// Creates a captor with an unbounded queue.
    pub fn new(policy: P) -> Self {
        Self::with_config(policy, CaptorConfig::default())
    }

    /// Creates a captor with the given buffer configuration.
    pub fn with_config(policy: P, config: CaptorConfig) -> Self {
        Self {
            queue: DispatchQueue::from_config(&config),
            policy,
            metrics: config.enable_metrics.then(Metrics::new),
        }
    }

    /// Feeds one element in, repositioning out-of-order stamps.
    pub fn inject(&mut self, dispatch: D) {
        let evicted = self.queue.insert(dispatch);
        if let Some(m) = &self.metrics {
            m.add_injected(1);
            if evicted.is_some() {
                m.add_evicted(1);
            }
        }
    }

    /// Feeds a batch of elements in.
    pub fn inject_range<I: IntoIterator<Item = D>>(&mut self, dispatches: I) {
        for d in dispatches {
            self.inject(d);
        }
    }

    /// Evaluates readiness against `range` without mutating the queue.
    pub fn dry_capture(&self, range: CaptureRange<D::Stamp>) -> CaptureState {
        self.policy.dry_capture(&self.queue, range)
    }

    /// Captures this stream's selection for `range` into `sink`.
    pub fn capture<K: Sink<D>>(
        &mut self,
        sink: &mut K,
        range: CaptureRange<D::Stamp>,
    ) -> CaptureState {
        let state = self.policy.capture(&mut self.queue, range, sink);
        if let Some(m) = &self.metrics {
            match state {
                CaptureState::Primed => m.add_primed(),
                CaptureState::Retry => m.add_retry(),
                CaptureState::Abort => m.add_abort(),
                CaptureState::Timeout => {}
            }
        }
        state
    }

    /// Drops state up to this policy's boundary for the abort stamp.
    pub fn abort(&mut self, stamp: D::Stamp) {
        self.policy.abort(&mut self.queue, stamp);
        if let Some(m) = &self.metrics {
            m.add_abort();
        }
    }

    /// Clears the queue and policy state (latched elements included).
    pub fn reset(&mut self) {
        self.queue.clear();
        self.policy.reset();
    }

    /// Number of queued elements.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// The configured queue bound, if any.
    pub fn capacity(&self) -> Option<NonZeroUsize> {
        self.queue.capacity()
    }

    /// Stamp of the oldest queued element.
    pub fn oldest_stamp(&self) -> Option<D::Stamp> {
        self.queue.oldest_stamp()
    }

    /// Metrics snapshot; zeros when metrics are disabled.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics
            .as_ref()
            .map(Metrics::snapshot)
            .unwrap_or_default()
    }
}

impl<P, D> FollowerProbe for FollowerCaptor<P, D>
where
    P: FollowerPolicy<D>,
    D: Dispatch,
{
    type Stamp = D::Stamp;

    fn dry_capture(&self, range: CaptureRange<D::Stamp>) -> CaptureState {
        FollowerCaptor::dry_capture(self, range)
    }

    fn abort(&mut self, stamp: D::Stamp) {
        FollowerCaptor::abort(self, stamp);
    }

    fn reset(&mut self) {
        FollowerCaptor::reset(self);
    }
}

impl<P, D, K> FollowOps<K> for FollowerCaptor<P, D>
where
    P: FollowerPolicy<D>,
    D: Dispatch,
    K: Sink<D>,
{
    fn capture(&mut self, sink: &mut K, range: CaptureRange<D::Stamp>) -> CaptureState {
        FollowerCaptor::capture(self, sink, range)
    }
}
