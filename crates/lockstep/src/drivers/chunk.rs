//! Non-overlapping chunks of N elements.

use crate::dispatch::Dispatch;
use crate::policy::{DriverPolicy, PolicyError};
use crate::queue::DispatchQueue;
use crate::range::CaptureRange;
use crate::sink::Sink;
use std::num::NonZeroUsize;

/// Emits and retires the N oldest elements together: consecutive captures
/// partition the stream into disjoint chunks.
#[derive(Debug, Clone, Copy)]
pub struct Chunk {
    size: NonZeroUsize,
}

impl Chunk {
    /// Creates a chunk of `size` elements. `size` must be nonzero.
    pub fn new(size: usize) -> Result<Self, PolicyError> {
        NonZeroUsize::new(size)
            .map(|size| Self { size })
            .ok_or(PolicyError::ZeroCount)
    }

    /// The chunk size.
    pub fn size(&self) -> usize {
        self.size.get()
    }

    fn chunk_range<D: Dispatch>(
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

impl<D: Dispatch> DriverPolicy<D> for Chunk {
    fn dry_capture(&self, queue: &DispatchQueue<D>) -> Option<CaptureRange<D::Stamp>> {
        self.chunk_range(queue)
    }

    fn capture<K: Sink<D>>(
        &mut self,
        queue: &mut DispatchQueue<D>,
        sink: &mut K,
    ) -> Option<CaptureRange<D::Stamp>> {
        let range = self.chunk_range(queue)?;
        for _ in 0..self.size.get() {
            if let Some(d) = queue.pop_oldest() {
                sink.accept(d);
            }
        }
        Some(range)
    }

    fn abort(&mut self, queue: &mut DispatchQueue<D>, stamp: D::Stamp) {
        queue.remove_at_before(stamp);
    }
}
