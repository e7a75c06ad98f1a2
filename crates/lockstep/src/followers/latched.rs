//! Sample-and-hold capture.

use crate::dispatch::Dispatch;
use crate::policy::FollowerPolicy;
use crate::queue::DispatchQueue;
use crate::range::CaptureRange;
use crate::sink::Sink;
use crate::stamp::Stamp;
use crate::state::CaptureState;

/// Emits the newest element with `stamp <= lower - min_period`; when no new
/// candidate exists, re-emits the previously latched element.
///
/// This is the one policy allowed to emit an element more than once (never
/// more than once per capture). It suits slow configuration-like streams
/// whose latest value remains valid until replaced. The latch survives
/// aborts and is cleared only by `reset`.
#[derive(Debug, Clone)]
pub struct Latched<D: Dispatch> {
    min_period: <D::Stamp as Stamp>::Offset,
    latched: Option<D>,
}

impl<D: Dispatch> Latched<D> {
    /// Creates the policy with the given minimum lead period.
    pub fn new(min_period: <D::Stamp as Stamp>::Offset) -> Self {
        Self {
            min_period,
            latched: None,
        }
    }

    /// The currently latched element, if any.
    pub fn latched(&self) -> Option<&D> {
        self.latched.as_ref()
    }

    fn boundary(&self, range: CaptureRange<D::Stamp>) -> D::Stamp {
        range.lower.sub_offset(self.min_period)
    }

    /// Index of the newest element at or before the boundary.
    fn candidate(&self, queue: &DispatchQueue<D>, boundary: D::Stamp) -> Option<usize> {
        queue.partition_at_before(boundary).checked_sub(1)
    }
}

impl<D: Dispatch> FollowerPolicy<D> for Latched<D> {
    fn dry_capture(&self, queue: &DispatchQueue<D>, range: CaptureRange<D::Stamp>) -> CaptureState {
        if self.candidate(queue, self.boundary(range)).is_some() || self.latched.is_some() {
            CaptureState::Primed
        } else {
            CaptureState::Retry
        }
    }

    fn capture<K: Sink<D>>(
        &mut self,
        queue: &mut DispatchQueue<D>,
        range: CaptureRange<D::Stamp>,
        sink: &mut K,
    ) -> CaptureState {
        let boundary = self.boundary(range);
        if let Some(idx) = self.candidate(queue, boundary) {
            let Some(d) = queue.get(idx).cloned() else {
                return CaptureState::Retry;
            };
            queue.remove_before(d.stamp());
            sink.accept(d.clone());
            self.latched = Some(d);
            CaptureState::Primed
        } else if let Some(held) = self.latched.clone() {
            sink.accept(held);
            CaptureState::Primed
        } else {
            CaptureState::Retry
        }
    }

    fn abort(&mut self, queue: &mut DispatchQueue<D>, stamp: D::Stamp) {
        // The latch survives aborts; only queued state is dropped.
        queue.remove_before(stamp.sub_offset(self.min_period));
    }

    fn reset(&mut self) {
        self.latched = None;
    }
}
