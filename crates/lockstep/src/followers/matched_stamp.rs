//! Exact stamp matching.

use crate::dispatch::Dispatch;
use crate::policy::FollowerPolicy;
use crate::queue::DispatchQueue;
use crate::range::CaptureRange;
use crate::sink::Sink;
use crate::state::CaptureState;

/// Emits the single element whose stamp equals the range's lower stamp.
///
/// For streams that share a clock with the driver. If the queue's oldest
/// stamp already exceeds the target, the match can never be made (the
/// element was dropped or never existed) and the follower aborts so the
/// group can advance.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchedStamp;

impl MatchedStamp {
    /// Creates the policy.
    pub fn new() -> Self {
        Self
    }
}

impl<D: Dispatch> FollowerPolicy<D> for MatchedStamp {
    fn dry_capture(&self, queue: &DispatchQueue<D>, range: CaptureRange<D::Stamp>) -> CaptureState {
        let target = range.lower;
        let k = queue.partition_before(target);
        if queue.stamp_at(k).is_some_and(|s| s == target) {
            CaptureState::Primed
        } else if queue.oldest_stamp().is_some_and(|s| s > target) {
            CaptureState::Abort
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
        let state = self.dry_capture(queue, range);
        if state != CaptureState::Primed {
            return state;
        }
        let target = range.lower;
        queue.remove_before(target);
        if let Some(d) = queue.pop_oldest() {
            sink.accept(d);
        }
        queue.remove_at_before(target);
        CaptureState::Primed
    }

    fn abort(&mut self, queue: &mut DispatchQueue<D>, stamp: D::Stamp) {
        queue.remove_before(stamp);
    }
}
