//! Unconditional capture of everything before the range.

use crate::dispatch::Dispatch;
use crate::policy::FollowerPolicy;
use crate::queue::DispatchQueue;
use crate::range::CaptureRange;
use crate::sink::Sink;
use crate::stamp::Stamp;
use crate::state::CaptureState;

/// Emits every element with `stamp < upper - delay`, unconditionally.
///
/// This is the optional-stream policy: the dry check is always `Primed`,
/// even on an empty queue, so a stream wired through `AnyBefore` can never
/// hold the group back.
#[derive(Debug, Clone, Copy)]
pub struct AnyBefore<S: Stamp> {
    delay: S::Offset,
}

impl<S: Stamp> AnyBefore<S> {
    /// Creates the policy with the given boundary delay.
    pub fn new(delay: S::Offset) -> Self {
        Self { delay }
    }

    fn boundary(&self, range: CaptureRange<S>) -> S {
        range.upper.sub_offset(self.delay)
    }
}

impl<S, D> FollowerPolicy<D> for AnyBefore<S>
where
    S: Stamp,
    D: Dispatch<Stamp = S>,
{
    fn dry_capture(&self, _queue: &DispatchQueue<D>, _range: CaptureRange<S>) -> CaptureState {
        CaptureState::Primed
    }

    fn capture<K: Sink<D>>(
        &mut self,
        queue: &mut DispatchQueue<D>,
        range: CaptureRange<S>,
        sink: &mut K,
    ) -> CaptureState {
        let boundary = self.boundary(range);
        while queue.oldest_stamp().is_some_and(|s| s < boundary) {
            if let Some(d) = queue.pop_oldest() {
                sink.accept(d);
            }
        }
        CaptureState::Primed
    }

    fn abort(&mut self, queue: &mut DispatchQueue<D>, stamp: S) {
        queue.remove_before(stamp.sub_offset(self.delay));
    }
}
