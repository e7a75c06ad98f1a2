//! Capture policy traits.
//!
//! A captor is (queue, policy, lock wrapper). The policy is the small state
//! machine that decides, for a driving range, which buffered elements to
//! emit and which to retire. Policies come in two families: **drivers**
//! produce the group's `CaptureRange` from their own queue; **followers**
//! consume that range against theirs.
//!
//! Every policy separates a non-mutating `dry_capture` (readiness) from the
//! mutating `capture` (emit + retire). On a quiescent captor the two agree:
//! `capture` returns exactly the state `dry_capture` reported, and on
//! `Primed` emits exactly the elements the dry run selected.

use crate::dispatch::Dispatch;
use crate::queue::DispatchQueue;
use crate::range::CaptureRange;
use crate::sink::Sink;
use crate::state::CaptureState;
use thiserror::Error;

/// Policy construction errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// A count parameter (batch/chunk size, element count) was zero.
    #[error("count parameter must be nonzero")]
    ZeroCount,
    /// A period parameter was zero or negative.
    #[error("period must be a positive offset")]
    NonPositivePeriod,
}

/// A driver capture rule.
///
/// Drivers never self-abort: their dry check is `Primed` (with a candidate
/// range) or `Retry`. `abort` is reached only through the group-level abort
/// path.
pub trait DriverPolicy<D: Dispatch> {
    /// Evaluates readiness without mutating the queue. Returns the candidate
    /// range when ready, `None` when more data is needed.
    fn dry_capture(&self, queue: &DispatchQueue<D>) -> Option<CaptureRange<D::Stamp>>;

    /// Emits to `sink`, retires per the policy's retention rule, and returns
    /// the driving range. Returns `None` (and leaves the queue untouched)
    /// when not ready.
    fn capture<K: Sink<D>>(
        &mut self,
        queue: &mut DispatchQueue<D>,
        sink: &mut K,
    ) -> Option<CaptureRange<D::Stamp>>;

    /// Drops queue state up to the abort stamp so the next capture resumes
    /// from the following range.
    fn abort(&mut self, queue: &mut DispatchQueue<D>, stamp: D::Stamp);

    /// Clears policy state (throttle gates and the like).
    fn reset(&mut self) {}
}

/// A follower capture rule.
pub trait FollowerPolicy<D: Dispatch> {
    /// Evaluates readiness against `range` without mutating the queue.
    fn dry_capture(
        &self,
        queue: &DispatchQueue<D>,
        range: CaptureRange<D::Stamp>,
    ) -> CaptureState;

    /// Emits to `sink` and retires per the policy's retention rule. On a
    /// non-`Primed` dry state, mutates nothing and returns that state.
    fn capture<K: Sink<D>>(
        &mut self,
        queue: &mut DispatchQueue<D>,
        range: CaptureRange<D::Stamp>,
        sink: &mut K,
    ) -> CaptureState;

    /// Drops queue state up to this policy's boundary for the abort stamp.
    fn abort(&mut self, queue: &mut DispatchQueue<D>, stamp: D::Stamp);

    /// Clears policy state (latched elements and the like).
    fn reset(&mut self) {}
}
