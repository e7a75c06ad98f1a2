//! Sliding-window batches of the N oldest elements.

use crate::dispatch::Dispatch;
use crate::policy::{DriverPolicy, PolicyError};
use crate::queue::DispatchQueue;
use crate::range::CaptureRange;
use crate::sink::Sink;
use std::num::NonZeroUsize;

/// Emits the N oldest elements but retires only the single oldest, so
/// successive captures overlap by N-1 elements — a sliding window.
///
/// Ready once `len >= N`; the range spans the window's first and last
/// stamps.
#[derive(Debug, Clone, Copy)]
pub struct Batch {
    size: NonZeroUsize,
}

impl Batch {
    /// Creates a window of `size` elements. `size` must be nonzero.
    pub fn new(size: usize) -> Result<Self, PolicyError> {
        NonZeroUsize::new(size)
            .map(|size| Self { size })
            .ok_or(PolicyError::ZeroCount)
    }

    /// The window size.
    pub fn size(&self) -> usize {
        self.size.get()
    }

    fn window_range<D: Dispatch>(
        &self,
        queue: &DispatchQueue<D>,
    ) -> Option<CaptureRange<D::Stamp>> {
        let n = self.size.get();
        if queue.len() < n {
            return None;
        }
        let lower = queue.stamp_at(0)?;
        let upper = queue.stamp_at(n - 1)?;
        Some(CaptureRange::new(lower, upper))
    }
}

impl<D: Dispatch> DriverPolicy<D> for Batch {
    fn dry_capture(&self, queue: &DispatchQueue<D>) -> Option<CaptureRange<D::Stamp>> {
        self.window_range(queue)
    }

    fn capture<K: Sink<D>>(
        &mut self,
        queue: &mut DispatchQueue<D>,
        sink: &mut K,
    ) -> Option<CaptureRange<D::Stamp>> {
        let range = self.window_range(queue)?;
        for idx in 0..self.size.get() {
            if let Some(d) = queue.get(idx) {
                sink.accept(d.clone());
            }
        }
        // Slide: only the oldest element leaves the window.
        queue.pop_oldest();
        Some(range)
    }

    fn abort(&mut self, queue: &mut DispatchQueue<D>, stamp: D::Stamp) {
        queue.remove_at_before(stamp);
    }
}
