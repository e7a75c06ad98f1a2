//! Capture the freshest sample within a period of the boundary.

use crate::dispatch::Dispatch;
use crate::policy::{FollowerPolicy, PolicyError};
use crate::queue::DispatchQueue;
use crate::range::CaptureRange;
use crate::sink::Sink;
use crate::stamp::Stamp;
use crate::state::CaptureState;

/// Emits the one element whose stamp is the largest inside the open window
/// `(boundary - period, boundary)`, where `boundary = lower - delay`.
///
/// Suits streams sampled at a known rate: the window admits only samples
/// recent enough to pair with the frame. A witness at or past the boundary
/// is required before emitting; if a witness exists but the window is empty,
/// the pairing can never be made and the follower aborts.
#[derive(Debug, Clone, Copy)]
pub struct ClosestBefore<S: Stamp> {
    delay: S::Offset,
    period: S::Offset,
}

impl<S: Stamp> ClosestBefore<S> {
    /// Creates the policy. `period` must be strictly positive.
    pub fn new(delay: S::Offset, period: S::Offset) -> Result<Self, PolicyError> {
        if period <= S::ZERO_OFFSET {
            return Err(PolicyError::NonPositivePeriod);
        }
        Ok(Self { delay, period })
    }

    fn boundary(&self, range: CaptureRange<S>) -> S {
        range.lower.sub_offset(self.delay)
    }

    /// Index of the window's best candidate, when one exists.
    fn locate<D>(&self, queue: &DispatchQueue<D>, boundary: S) -> Location
    where
        D: Dispatch<Stamp = S>,
    {
        let k = queue.partition_before(boundary);
        let witness = k < queue.len();
        let window_open = boundary.sub_offset(self.period);
        let candidate = k
            .checked_sub(1)
            .filter(|&i| queue.stamp_at(i).is_some_and(|s| s > window_open));

        match (candidate, witness) {
            (Some(idx), true) => Location::Candidate(idx),
            (None, true) => Location::Unreachable,
            _ => Location::Pending,
        }
    }
}

enum Location {
    /// Window candidate at this index, witness present.
    Candidate(usize),
    /// Witness present but the window is empty: no pairing will ever exist.
    Unreachable,
    /// Not enough data to decide.
    Pending,
}

impl<S, D> FollowerPolicy<D> for ClosestBefore<S>
where
    S: Stamp,
    D: Dispatch<Stamp = S>,
{
    fn dry_capture(&self, queue: &DispatchQueue<D>, range: CaptureRange<S>) -> CaptureState {
        match self.locate(queue, self.boundary(range)) {
            Location::Candidate(_) => CaptureState::Primed,
            Location::Unreachable => CaptureState::Abort,
            Location::Pending => CaptureState::Retry,
        }
    }

    fn capture<K: Sink<D>>(
        &mut self,
        queue: &mut DispatchQueue<D>,
        range: CaptureRange<S>,
        sink: &mut K,
    ) -> CaptureState {
        let boundary = self.boundary(range);
        match self.locate(queue, boundary) {
            Location::Candidate(idx) => {
                let Some(stamp) = queue.stamp_at(idx) else {
                    return CaptureState::Retry;
                };
                queue.remove_before(stamp);
                if let Some(d) = queue.pop_oldest() {
                    sink.accept(d);
                }
                queue.remove_at_before(stamp);
                CaptureState::Primed
            }
            Location::Unreachable => CaptureState::Abort,
            Location::Pending => CaptureState::Retry,
        }
    }

    fn abort(&mut self, queue: &mut DispatchQueue<D>, stamp: S) {
        queue.remove_before(stamp.sub_offset(self.delay));
    }
}
