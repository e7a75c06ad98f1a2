//! Rate-limited single-element emission.

use crate::dispatch::Dispatch;
use crate::policy::{DriverPolicy, PolicyError};
use crate::queue::DispatchQueue;
use crate::range::CaptureRange;
use crate::sink::Sink;
use crate::stamp::Stamp;

/// Emits the oldest element whose stamp is at least `period` past the
/// previously emitted stamp, retiring anything older than it.
///
/// Elements closer than `period` to the last emission can never be emitted
/// without violating the spacing rule, so a primed capture retires them
/// along with the emitted element. When several elements past the gate
/// qualify at once, only the oldest is emitted; the later ones are retained
/// for subsequent periods. The gate advances only on a primed capture;
/// retried or aborted attempts leave it in place.
#[derive(Debug, Clone, Copy)]
pub struct Throttled<S: Stamp> {
    period: S::Offset,
    last_emitted: Option<S>,
}

impl<S: Stamp> Throttled<S> {
    /// Creates the policy with the given minimum stamp spacing. `period`
    /// must be strictly positive.
    pub fn new(period: S::Offset) -> Result<Self, PolicyError> {
        if period <= S::ZERO_OFFSET {
            return Err(PolicyError::NonPositivePeriod);
        }
        Ok(Self {
            period,
            last_emitted: None,
        })
    }

    /// Stamp of the oldest queued element past the throttle gate.
    fn next_emittable<D>(&self, queue: &DispatchQueue<D>) -> Option<S>
    where
        D: Dispatch<Stamp = S>,
    {
        match self.last_emitted {
            Some(last) => {
                let gate = last.add_offset(self.period);
                queue.stamp_at(queue.partition_before(gate))
            }
            None => queue.oldest_stamp(),
        }
    }
}

impl<S, D> DriverPolicy<D> for Throttled<S>
where
    S: Stamp,
    D: Dispatch<Stamp = S>,
{
    fn dry_capture(&self, queue: &DispatchQueue<D>) -> Option<CaptureRange<S>> {
        self.next_emittable(queue).map(CaptureRange::point)
    }

    fn capture<K: Sink<D>>(
        &mut self,
        queue: &mut DispatchQueue<D>,
        sink: &mut K,
    ) -> Option<CaptureRange<S>> {
        let stamp = self.next_emittable(queue)?;
        queue.remove_before(stamp);
        if let Some(d) = queue.pop_oldest() {
            sink.accept(d);
        }
        // Equal-stamped stragglers fall with the emitted element.
        queue.remove_at_before(stamp);
        self.last_emitted = Some(stamp);
        Some(CaptureRange::point(stamp))
    }

    fn abort(&mut self, queue: &mut DispatchQueue<D>, stamp: S) {
        // The gate advances only on primed captures.
        queue.remove_at_before(stamp);
    }

    fn reset(&mut self) {
        self.last_emitted = None;
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
    fn test_throttled_rejects_non_positive_period() {
        assert_eq!(
            Throttled::<i64>::new(0).unwrap_err(),
            PolicyError::NonPositivePeriod,
        );
        assert_eq!(
            Throttled::<i64>::new(-2).unwrap_err(),
            PolicyError::NonPositivePeriod,
        );
    }

    #[test]
    fn test_first_emission_is_ungated() {
        let mut q = queue_of(&[3]);
        let mut policy = Throttled::<i64>::new(5).unwrap();
        let mut out = Vec::new();
        assert_eq!(
            policy.capture(&mut q, &mut out),
            Some(CaptureRange::point(3)),
        );
        assert_eq!(out, vec![3]);
        assert!(q.is_empty());
    }

    #[test]
    fn test_sub_gate_elements_are_skipped_and_retired() {
        let mut q = queue_of(&[10, 12, 15, 21]);
        let mut policy = Throttled::<i64>::new(5).unwrap();
        let mut out = Vec::new();

        assert_eq!(
            policy.capture(&mut q, &mut out),
            Some(CaptureRange::point(10)),
        );
        // 12 < 15 = 10 + 5 can never satisfy the spacing rule; 15 can.
        assert_eq!(
            policy.capture(&mut q, &mut out),
            Some(CaptureRange::point(15)),
        );
        assert_eq!(out, vec![10, 15]);
        // 12 was retired along the way, 21 is retained for the next period.
        let held: Vec<i64> = q.iter().copied().collect();
        assert_eq!(held, vec![21]);
    }

    #[test]
    fn test_retry_when_nothing_clears_gate() {
        let mut q = queue_of(&[10]);
        let mut policy = Throttled::<i64>::new(5).unwrap();
        let mut out = Vec::new();
        policy.capture(&mut q, &mut out).unwrap();

        q.insert(12);
        assert!(policy.dry_capture(&q).is_none());
        assert!(policy.capture(&mut q, &mut out).is_none());
        // A failed attempt retires nothing.
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn test_multiple_qualifying_retains_later_ones() {
        let mut q = queue_of(&[10, 15, 16, 17]);
        let mut policy = Throttled::<i64>::new(5).unwrap();
        let mut out = Vec::new();
        policy.capture(&mut q, &mut out).unwrap(); // 10

        // 15, 16, 17 all clear the gate; only the oldest is emitted.
        assert_eq!(
            policy.capture(&mut q, &mut out),
            Some(CaptureRange::point(15)),
        );
        let held: Vec<i64> = q.iter().copied().collect();
        assert_eq!(held, vec![16, 17]);
    }

    #[test]
    fn test_reset_clears_gate() {
        let mut q = queue_of(&[10]);
        let mut policy = Throttled::<i64>::new(100).unwrap();
        let mut out = Vec::new();
        policy.capture(&mut q, &mut out).unwrap();

        DriverPolicy::<i64>::reset(&mut policy);
        q.insert(11);
        assert_eq!(
            policy.capture(&mut q, &mut out),
            Some(CaptureRange::point(11)),
        );
    }

    #[test]
    fn test_equal_stamp_stragglers_retired_with_emission() {
        let mut q: DispatchQueue<(i64, u32)> = DispatchQueue::new();
        q.insert((10, 0));
        q.insert((10, 1));
        q.insert((11, 2));
        let mut policy = Throttled::<i64>::new(5).unwrap();
        let mut out: Vec<(i64, u32)> = Vec::new();

        assert!(policy.capture(&mut q, &mut out).is_some());
        assert_eq!(out, vec![(10, 0)]);
        // The duplicate stamp-10 element is retired, not re-emitted later.
        assert_eq!(q.len(), 1);
        assert_eq!(q.oldest_stamp(), Some(11));
    }
}
