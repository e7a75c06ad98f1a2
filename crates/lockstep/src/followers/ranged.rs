//! Bracketed interval capture.

use crate::dispatch::Dispatch;
use crate::policy::FollowerPolicy;
use crate::queue::DispatchQueue;
use crate::range::CaptureRange;
use crate::sink::Sink;
use crate::stamp::Stamp;
use crate::state::CaptureState;

/// Emits the interval `[lower - delay, upper - delay]` together with one
/// bracketing element on each side: the largest stamp below the interval
/// and the smallest above it.
///
/// The brackets let downstream consumers evaluate the frame's edges (e.g.
/// for interpolation) without the engine doing any value-level work. Both
/// brackets must exist before the capture is primed; if the stream has
/// advanced past the lower side without ever providing a bracket there, the
/// frame can never be completed and the follower aborts.
#[derive(Debug, Clone, Copy)]
pub struct Ranged<S: Stamp> {
    delay: S::Offset,
}

impl<S: Stamp> Ranged<S> {
    /// Creates the policy with the given boundary delay.
    pub fn new(delay: S::Offset) -> Self {
        Self { delay }
    }

    fn bounds(&self, range: CaptureRange<S>) -> (S, S) {
        (
            range.lower.sub_offset(self.delay),
            range.upper.sub_offset(self.delay),
        )
    }
}

impl<S, D> FollowerPolicy<D> for Ranged<S>
where
    S: Stamp,
    D: Dispatch<Stamp = S>,
{
    fn dry_capture(&self, queue: &DispatchQueue<D>, range: CaptureRange<S>) -> CaptureState {
        let (lo, hi) = self.bounds(range);
        let kl = queue.partition_before(lo);
        let ku = queue.partition_at_before(hi);
        let lower_bracket = kl > 0;
        let upper_bracket = ku < queue.len();

        if lower_bracket && upper_bracket {
            CaptureState::Primed
        } else if !lower_bracket && queue.oldest_stamp().is_some_and(|s| s > lo) {
            CaptureState::Abort
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
        let (lo, hi) = self.bounds(range);
        let kl = queue.partition_before(lo);
        let ku = queue.partition_at_before(hi);

        // Lower bracket, interior, upper bracket — one pass in stamp order.
        for idx in (kl - 1)..=ku {
            if let Some(d) = queue.get(idx) {
                sink.accept(d.clone());
            }
        }
        // Everything through the interval retires; the upper bracket stays
        // to serve as the next frame's lower bracket.
        queue.remove_at_before(hi);
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
    fn test_emits_interval_with_brackets() {
        let mut q = queue_of(&[1, 4, 5, 6, 9]);
        let mut policy = Ranged::<i64>::new(0);
        let range = CaptureRange::new(4, 6);

        assert_eq!(policy.dry_capture(&q, range), CaptureState::Primed);

        let mut out = Vec::new();
        assert_eq!(policy.capture(&mut q, range, &mut out), CaptureState::Primed);
        assert_eq!(out, vec![1, 4, 5, 6, 9]);
        // The upper bracket survives for the next frame.
        let held: Vec<i64> = q.iter().copied().collect();
        assert_eq!(held, vec![9]);
    }

    #[test]
    fn test_empty_interior_still_primes() {
        let mut q = queue_of(&[1, 9]);
        let mut policy = Ranged::<i64>::new(0);
        let range = CaptureRange::new(4, 6);

        let mut out = Vec::new();
        assert_eq!(policy.capture(&mut q, range, &mut out), CaptureState::Primed);
        assert_eq!(out, vec![1, 9]);
    }

    #[test]
    fn test_retry_without_upper_bracket() {
        let mut q = queue_of(&[1, 5]);
        let mut policy = Ranged::<i64>::new(0);
        let range = CaptureRange::new(4, 6);

        assert_eq!(policy.dry_capture(&q, range), CaptureState::Retry);
        let mut out = Vec::new();
        assert_eq!(policy.capture(&mut q, range, &mut out), CaptureState::Retry);
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn test_retry_on_empty_queue() {
        let q: DispatchQueue<i64> = DispatchQueue::new();
        let policy = Ranged::<i64>::new(0);
        assert_eq!(
            policy.dry_capture(&q, CaptureRange::new(4, 6)),
            CaptureState::Retry,
        );
    }

    #[test]
    fn test_abort_when_lower_bracket_impossible() {
        // Oldest is already past the lower side with no bracket below it.
        let mut q = queue_of(&[5, 9]);
        let mut policy = Ranged::<i64>::new(0);
        let range = CaptureRange::new(4, 6);

        assert_eq!(policy.dry_capture(&q, range), CaptureState::Abort);
        let mut out = Vec::new();
        assert_eq!(policy.capture(&mut q, range, &mut out), CaptureState::Abort);
        assert!(out.is_empty());
    }

    #[test]
    fn test_delay_shifts_both_bounds() {
        let mut q = queue_of(&[0, 3, 5, 8]);
        let mut policy = Ranged::<i64>::new(1);
        // Effective interval [3, 5].
        let range = CaptureRange::new(4, 6);

        let mut out = Vec::new();
        assert_eq!(policy.capture(&mut q, range, &mut out), CaptureState::Primed);
        assert_eq!(out, vec![0, 3, 5, 8]);
    }

    #[test]
    fn test_oldest_exactly_at_lower_side_retries() {
        // No bracket below, but the abort rule requires oldest to strictly
        // exceed the lower side.
        let q = queue_of(&[4, 9]);
        let policy = Ranged::<i64>::new(0);
        assert_eq!(
            policy.dry_capture(&q, CaptureRange::new(4, 6)),
            CaptureState::Retry,
        );
    }
}
