//! Capture everything before the frame, once the stream has caught up.

use crate::dispatch::Dispatch;
use crate::policy::FollowerPolicy;
use crate::queue::DispatchQueue;
use crate::range::CaptureRange;
use crate::sink::Sink;
use crate::stamp::Stamp;
use crate::state::CaptureState;

/// Emits every element with `stamp < lower - delay`, but only once a
/// witness element at or past that boundary proves the prefix is complete.
///
/// Without the witness the follower returns `Retry`: an element below the
/// boundary could still arrive, and emitting early would break order.
#[derive(Debug, Clone, Copy)]
pub struct Before<S: Stamp> {
    delay: S::Offset,
}

impl<S: Stamp> Before<S> {
    /// Creates the policy with the given boundary delay.
    pub fn new(delay: S::Offset) -> Self {
        Self { delay }
    }

    fn boundary(&self, range: CaptureRange<S>) -> S {
        range.lower.sub_offset(self.delay)
    }
}

impl<S, D> FollowerPolicy<D> for Before<S>
where
    S: Stamp,
    D: Dispatch<Stamp = S>,
{
    fn dry_capture(&self, queue: &DispatchQueue<D>, range: CaptureRange<S>) -> CaptureState {
        let boundary = self.boundary(range);
        if queue.partition_before(boundary) < queue.len() {
            CaptureState::Primed
        } else {
            CaptureState::Retry
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

#[cfg(test)]
mod tests {
    use super::*;

    fn queue_of(stamps: &[i64]) -> DispatchQueue<i64> {
        let mut q = DispatchQueue::new();
        for &s in stamps {
            q.insert(s);
        }
        q
    }

    #[test]
    fn test_retry_without_witness() {
        let mut q = queue_of(&[0]);
        let mut policy = Before::<i64>::new(0);
        let range = CaptureRange::new(1, 3);

        assert_eq!(policy.dry_capture(&q, range), CaptureState::Retry);

        let mut out = Vec::new();
        assert_eq!(policy.capture(&mut q, range, &mut out), CaptureState::Retry);
        assert!(out.is_empty());
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn test_emits_prefix_with_witness() {
        let mut q = queue_of(&[0, 1, 2, 3, 4, 5]);
        let mut policy = Before::<i64>::new(0);
        let range = CaptureRange::new(1, 3);

        let mut out = Vec::new();
        // Boundary is 1; the element at 1 is the witness.
        assert_eq!(policy.capture(&mut q, range, &mut out), CaptureState::Primed);
        assert_eq!(out, vec![0]);
        let held: Vec<i64> = q.iter().copied().collect();
        assert_eq!(held, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_primed_with_witness_but_empty_prefix() {
        let mut q = queue_of(&[7, 8]);
        let mut policy = Before::<i64>::new(0);
        let range = CaptureRange::new(5, 6);

        let mut out = Vec::new();
        assert_eq!(policy.capture(&mut q, range, &mut out), CaptureState::Primed);
        assert!(out.is_empty());
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn test_delay_shifts_boundary() {
        let mut q = queue_of(&[0, 1, 2, 9]);
        let mut policy = Before::<i64>::new(2);
        let range = CaptureRange::new(4, 6);

        let mut out = Vec::new();
        // Boundary is 4 - 2 = 2.
        assert_eq!(policy.capture(&mut q, range, &mut out), CaptureState::Primed);
        assert_eq!(out, vec![0, 1]);
    }
}
