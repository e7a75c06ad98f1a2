//! Mutexed captor handles for multi-threaded pipelines.
//!
//! [`SharedDriver`] and [`SharedFollower`] are clonable handles over a
//! mutex-guarded captor plus a group-wide [`CaptureSignal`]. Producer
//! threads `inject` through their own clones while a consumer thread runs
//! blocking captures; each operation acquires the captor's mutex
//! transiently, and the signal's condition variable carries wakeups between
//! them.
//!
//! Wire every captor of one group to the same signal — a waiter parked on
//! the group must wake when *any* member stream receives data.

use crate::captor::{
    DriveOps, DriverCaptor, DriverProbe, FollowOps, FollowerCaptor, FollowerProbe,
};
use crate::dispatch::Dispatch;
use crate::lock::{CaptureSignal, CaptureWait, SignalPhase, WaitOutcome};
use crate::metrics::MetricsSnapshot;
use crate::policy::{DriverPolicy, FollowerPolicy};
use crate::range::CaptureRange;
use crate::sink::Sink;
use crate::state::{CaptureState, GroupCapture};
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

// A panicked peer must not wedge the group: poisoning is absorbed.
fn lock_core<T>(core: &Mutex<T>) -> MutexGuard<'_, T> {
    core.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------
// SHARED DRIVER
// ---------------------------------------------------------------------

/// Clonable, mutex-guarded driver captor handle.
pub struct SharedDriver<P, D: Dispatch> {
    core: Arc<Mutex<DriverCaptor<P, D>>>,
    signal: Arc<CaptureSignal>,
}

impl<P, D> SharedDriver<P, D>
where
    P: DriverPolicy<D>,
    D: Dispatch,
{
    /// Wraps a captor, wiring it to the group's signal.
    pub fn new(captor: DriverCaptor<P, D>, signal: &Arc<CaptureSignal>) -> Self {
        Self {
            core: Arc::new(Mutex::new(captor)),
            signal: Arc::clone(signal),
        }
    }

    /// The wait domain this captor notifies.
    pub fn signal(&self) -> &Arc<CaptureSignal> {
        &self.signal
    }

    /// Feeds one element in and wakes waiters.
    pub fn inject(&self, dispatch: D) {
        lock_core(&self.core).inject(dispatch);
        self.signal.notify_data();
    }

    /// Feeds a batch in, waking waiters once.
    pub fn inject_range<I: IntoIterator<Item = D>>(&self, dispatches: I) {
        lock_core(&self.core).inject_range(dispatches);
        self.signal.notify_data();
    }

    /// Evaluates readiness without mutating the queue.
    pub fn dry_capture(&self) -> GroupCapture<D::Stamp> {
        lock_core(&self.core).dry_capture()
    }

    /// Captures a frame into `sink`, returning the driving range.
    pub fn capture<K: Sink<D>>(&self, sink: &mut K) -> GroupCapture<D::Stamp> {
        lock_core(&self.core).capture(sink)
    }

    /// Blocks until a frame is captured, the deadline passes, or the group
    /// is aborted/reset.
    pub fn capture_until<K: Sink<D>>(
        &self,
        sink: &mut K,
        deadline: Instant,
    ) -> GroupCapture<D::Stamp> {
        loop {
            let seen = self.signal.phase();
            let result = self.capture(sink);
            if result.state != CaptureState::Retry {
                return result;
            }
            match self.signal.wait_until(seen, deadline) {
                WaitOutcome::Notified => {}
                WaitOutcome::Interrupted => {
                    return GroupCapture::state_only(CaptureState::Abort)
                }
                WaitOutcome::TimedOut => {
                    return GroupCapture::state_only(CaptureState::Timeout)
                }
            }
        }
    }

    /// Drops state up to the abort stamp and interrupts waiters.
    pub fn abort(&self, stamp: D::Stamp) {
        lock_core(&self.core).abort(stamp);
        self.signal.notify_interrupt();
    }

    /// Clears the queue and policy state and interrupts waiters.
    pub fn reset(&self) {
        lock_core(&self.core).reset();
        self.signal.notify_interrupt();
    }

    /// Number of queued elements.
    pub fn len(&self) -> usize {
        lock_core(&self.core).len()
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        lock_core(&self.core).is_empty()
    }

    /// The configured queue bound, if any.
    pub fn capacity(&self) -> Option<NonZeroUsize> {
        lock_core(&self.core).capacity()
    }

    /// Metrics snapshot; zeros when metrics are disabled.
    pub fn metrics(&self) -> MetricsSnapshot {
        lock_core(&self.core).metrics()
    }
}

impl<P, D: Dispatch> Clone for SharedDriver<P, D> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
            signal: Arc::clone(&self.signal),
        }
    }
}

impl<P, D> DriverProbe for SharedDriver<P, D>
where
    P: DriverPolicy<D>,
    D: Dispatch,
{
    type Stamp = D::Stamp;

    fn dry_capture(&self) -> GroupCapture<D::Stamp> {
        SharedDriver::dry_capture(self)
    }

    fn abort(&mut self, stamp: D::Stamp) {
        SharedDriver::abort(self, stamp);
    }

    fn reset(&mut self) {
        SharedDriver::reset(self);
    }
}

impl<P, D, K> DriveOps<K> for SharedDriver<P, D>
where
    P: DriverPolicy<D>,
    D: Dispatch,
    K: Sink<D>,
{
    fn capture(&mut self, sink: &mut K) -> GroupCapture<D::Stamp> {
        SharedDriver::capture(self, sink)
    }
}

impl<P, D> CaptureWait for SharedDriver<P, D>
where
    P: DriverPolicy<D>,
    D: Dispatch,
{
    fn phase(&self) -> SignalPhase {
        self.signal.phase()
    }

    fn wait_phase_until(&self, seen: SignalPhase, deadline: Instant) -> WaitOutcome {
        self.signal.wait_until(seen, deadline)
    }
}

// ---------------------------------------------------------------------
// SHARED FOLLOWER
// ---------------------------------------------------------------------

/// Clonable, mutex-guarded follower captor handle.
pub struct SharedFollower<P, D: Dispatch> {
    core: Arc<Mutex<FollowerCaptor<P, D>>>,
    signal: Arc<CaptureSignal>,
}

impl<P, D> SharedFollower<P, D>
where
    P: FollowerPolicy<D>,
    D: Dispatch,
{
    /// Wraps a captor, wiring it to the group's signal.
    pub fn new(captor: FollowerCaptor<P, D>, signal: &Arc<CaptureSignal>) -> Self {
        Self {
            core: Arc::new(Mutex::new(captor)),
            signal: Arc::clone(signal),
        }
    }

    /// The wait domain this captor notifies.
    pub fn signal(&self) -> &Arc<CaptureSignal> {
        &self.signal
    }

    /// Feeds one element in and wakes waiters.
    pub fn inject(&self, dispatch: D) {
        lock_core(&self.core).inject(dispatch);
        self.signal.notify_data();
    }

    /// Feeds a batch in, waking waiters once.
    pub fn inject_range<I: IntoIterator<Item = D>>(&self, dispatches: I) {
        lock_core(&self.core).inject_range(dispatches);
        self.signal.notify_data();
    }

    /// Evaluates readiness against `range` without mutating the queue.
    pub fn dry_capture(&self, range: CaptureRange<D::Stamp>) -> CaptureState {
        lock_core(&self.core).dry_capture(range)
    }

    /// Captures this stream's selection for `range` into `sink`.
    pub fn capture<K: Sink<D>>(
        &self,
        sink: &mut K,
        range: CaptureRange<D::Stamp>,
    ) -> CaptureState {
        lock_core(&self.core).capture(sink, range)
    }

    /// Blocks until the selection for `range` is captured, the deadline
    /// passes, or the group is aborted/reset.
    pub fn capture_until<K: Sink<D>>(
        &self,
        sink: &mut K,
        range: CaptureRange<D::Stamp>,
        deadline: Instant,
    ) -> CaptureState {
        loop {
            let seen = self.signal.phase();
            let state = self.capture(sink, range);
            if state != CaptureState::Retry {
                return state;
            }
            match self.signal.wait_until(seen, deadline) {
                WaitOutcome::Notified => {}
                WaitOutcome::Interrupted => return CaptureState::Abort,
                WaitOutcome::TimedOut => return CaptureState::Timeout,
            }
        }
    }

    /// Drops state up to this policy's boundary and interrupts waiters.
    pub fn abort(&self, stamp: D::Stamp) {
        lock_core(&self.core).abort(stamp);
        self.signal.notify_interrupt();
    }

    /// Clears the queue and policy state and interrupts waiters.
    pub fn reset(&self) {
        lock_core(&self.core).reset();
        self.signal.notify_interrupt();
    }

    /// Number of queued elements.
    pub fn len(&self) -> usize {
        lock_core(&self.core).len()
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        lock_core(&self.core).is_empty()
    }

    /// The configured queue bound, if any.
    pub fn capacity(&self) -> Option<NonZeroUsize> {
        lock_core(&self.core).capacity()
    }

    /// Metrics snapshot; zeros when metrics are disabled.
    pub fn metrics(&self) -> MetricsSnapshot {
        lock_core(&self.core).metrics()
    }
}

impl<P, D: Dispatch> Clone for SharedFollower<P, D> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
            signal: Arc::clone(&self.signal),
        }
    }
}

impl<P, D> FollowerProbe for SharedFollower<P, D>
where
    P: FollowerPolicy<D>,
    D: Dispatch,
{
    type Stamp = D::Stamp;

    fn dry_capture(&self, range: CaptureRange<D::Stamp>) -> CaptureState {
        SharedFollower::dry_capture(self, range)
    }

    fn abort(&mut self, stamp: D::Stamp) {
        SharedFollower::abort(self, stamp);
    }

    fn reset(&mut self) {
        SharedFollower::reset(self);
    }
}

impl<P, D, K> FollowOps<K> for SharedFollower<P, D>
where
    P: FollowerPolicy<D>,
    D: Dispatch,
    K: Sink<D>,
{
    fn capture(&mut self, sink: &mut K, range: CaptureRange<D::Stamp>) -> CaptureState {
        SharedFollower::capture(self, sink, range)
    }
}

impl<P, D> CaptureWait for SharedFollower<P, D>
where
    P: FollowerPolicy<D>,
    D: Dispatch,
{
    fn phase(&self) -> SignalPhase {
        self.signal.phase()
    }

    fn wait_phase_until(&self, seen: SignalPhase, deadline: Instant) -> WaitOutcome {
        self.signal.wait_until(seen, deadline)
    }
}
