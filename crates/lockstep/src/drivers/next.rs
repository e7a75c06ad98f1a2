//! Emit the single oldest element.

use crate::dispatch::Dispatch;
use crate::policy::DriverPolicy;
use crate::queue::DispatchQueue;
use crate::range::CaptureRange;
use crate::sink::Sink;

/// Drives the group one element at a time: emits the oldest queued element
/// with the degenerate range `[s, s]`.
///
/// The simplest pacing rule — every arrival becomes one frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct Next;

impl Next {
    /// Creates the policy.
    pub fn new() -> Self {
        Self
    }
}

impl<D: Dispatch> DriverPolicy<D> for Next {
    fn dry_capture(&self, queue: &DispatchQueue<D>) -> Option<CaptureRange<D::Stamp>> {
        queue.oldest_stamp().map(CaptureRange::point)
    }

    fn capture<K: Sink<D>>(
        &mut self,
        queue: &mut DispatchQueue<D>,
        sink: &mut K,
    ) -> Option<CaptureRange<D::Stamp>> {
        let d = queue.pop_oldest()?;
        let range = CaptureRange::point(d.stamp());
        sink.accept(d);
        Some(range)
    }

    fn abort(&mut self, queue: &mut DispatchQueue<D>, stamp: D::Stamp) {
        queue.remove_at_before(stamp);
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
    fn test_next_emits_oldest() {
        let mut q = queue_of(&[10, 11]);
        let mut policy = Next::new();

        assert_eq!(
            policy.dry_capture(&q),
            Some(CaptureRange::point(10)),
        );

        let mut out = Vec::new();
        let range = policy.capture(&mut q, &mut out);
        assert_eq!(range, Some(CaptureRange::point(10)));
        assert_eq!(out, vec![10]);
        assert_eq!(q.len(), 1);
        assert_eq!(q.oldest_stamp(), Some(11));
    }

    #[test]
    fn test_next_empty_queue_retries() {
        let mut q: DispatchQueue<i64> = DispatchQueue::new();
        let mut policy = Next::new();
        assert!(policy.dry_capture(&q).is_none());

        let mut out = Vec::new();
        assert!(policy.capture(&mut q, &mut out).is_none());
        assert!(out.is_empty());
    }

    #[test]
    fn test_next_abort_drops_through_stamp() {
        let mut q = queue_of(&[10, 10, 11]);
        let mut policy = Next::new();
        DriverPolicy::<i64>::abort(&mut policy, &mut q, 10);
        assert_eq!(q.oldest_stamp(), Some(11));
    }
}
