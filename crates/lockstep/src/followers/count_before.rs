//! Capture a fixed-depth history window before the boundary.

use crate::dispatch::Dispatch;
use crate::policy::{FollowerPolicy, PolicyError};
use crate::queue::DispatchQueue;
use crate::range::CaptureRange;
use crate::sink::Sink;
use crate::stamp::Stamp;
use crate::state::CaptureState;
use std::num::NonZeroUsize;

/// Emits the N newest elements with `stamp < lower - delay`, once a witness
/// at or past the boundary proves the prefix is complete.
///
/// Stream stamps are non-decreasing, so a witness arriving before N
/// predecessors have accumulated proves the window can never fill for this
/// frame: the follower aborts and the group advances.
#[derive(Debug, Clone, Copy)]
pub struct CountBefore<S: Stamp> {
    count: NonZeroUsize,
    delay: S::Offset,
}

impl<S: Stamp> CountBefore<S> {
    /// Creates the policy. `count` must be nonzero.
    pub fn new(count: usize, delay: S::Offset) -> Result<Self, PolicyError> {
        NonZeroUsize::new(count)
            .map(|count| Self { count, delay })
            .ok_or(PolicyError::ZeroCount)
    }

    fn boundary(&self, range: CaptureRange<S>) -> S {
        range.lower.sub_offset(self.delay)
    }
}

impl<S, D> FollowerPolicy<D> for CountBefore<S>
where
    S: Stamp,
    D: Dispatch<Stamp = S>,
{
    fn dry_capture(&self, queue: &DispatchQueue<D>, range: CaptureRange<S>) -> CaptureState {
        let k = queue.partition_before(self.boundary(range));
        let witness = k < queue.len();
        if !witness {
            CaptureState::Retry
        } else if k >= self.count.get() {
            CaptureState::Primed
        } else {
            CaptureState::Abort
        }
    }

    fn capture<K: Sink<D>>(
        &mut self,
        queue: &mut DispatchQueue<D>,
        range: CaptureRange<S>,
        sink: &mut K,
    ) -> CaptureState {
        let state = self.dry_capture(queue, range);
        if state != CaptureState::Primed {
            return state;
        }
        let boundary = self.boundary(range);
        let k = queue.partition_before(boundary);
        let n = self.count.get();
        // The N newest below the boundary, still in stamp order.
        for idx in (k - n)..k {
            if let Some(d) = queue.get(idx) {
                sink.accept(d.clone());
            }
        }
        queue.remove_before(boundary);
        CaptureState::Primed
    }

    fn abort(&mut self, queue: &mut DispatchQueue<D>, stamp: S) {
        queue.remove_before(stamp.sub_offset(self.delay));
    }
}
