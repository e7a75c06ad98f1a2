//! Stamp-ordered capture queue.
//!
//! An ordered multiset of dispatches keyed by stamp, with fast oldest
//! access and prefix removal. Sorted arrivals insert at the back in O(1);
//! out-of-order arrivals fall back to a positional insert. Boundary
//! searches use `partition_point`, so policy dry-checks stay O(log n).

use crate::config::CaptorConfig;
use crate::dispatch::Dispatch;
use crate::invariants::{
    debug_assert_bounded_size, debug_assert_retention, debug_assert_stamp_ordered,
};
use std::collections::VecDeque;
use std::num::NonZeroUsize;

/// Stamp-ordered storage for one stream's pending dispatches.
///
/// Elements are kept in non-decreasing stamp order; equal stamps preserve
/// insertion order. When capacity-bounded, an insert into a full queue drops
/// the oldest element *before* inserting the new one, so the surviving
/// elements are always the newest `capacity` inserted.
#[derive(Debug, Clone)]
pub struct DispatchQueue<D> {
    items: VecDeque<D>,
    capacity: Option<NonZeroUsize>,
}

impl<D: Dispatch> DispatchQueue<D> {
    /// An unbounded queue.
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
            capacity: None,
        }
    }

    /// A queue bounded to `capacity` elements.
    pub fn bounded(capacity: NonZeroUsize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity.get()),
            capacity: Some(capacity),
        }
    }

    pub(crate) fn from_config(config: &CaptorConfig) -> Self {
        match config.capacity {
            Some(capacity) => Self::bounded(capacity),
            None => Self::new(),
        }
    }

    /// Places `d` at its stamp-ordered position.
    ///
    /// Returns the element evicted by the capacity bound, if any. Equal
    /// stamps land after their predecessors, preserving insertion order.
    pub fn insert(&mut self, d: D) -> Option<D> {
        let evicted = match self.capacity {
            Some(cap) if self.items.len() >= cap.get() => self.items.pop_front(),
            _ => None,
        };

        let stamp = d.stamp();
        let pos = match self.items.back() {
            // Hot path: arrivals already in order.
            Some(back) if back.stamp() <= stamp => {
                self.items.push_back(d);
                self.items.len() - 1
            }
            None => {
                self.items.push_back(d);
                0
            }
            Some(_) => {
                let pos = self.items.partition_point(|e| e.stamp() <= stamp);
                self.items.insert(pos, d);
                pos
            }
        };

        if let Some(cap) = self.capacity {
            debug_assert_bounded_size!(self.items.len(), cap.get());
        }
        if pos > 0 {
            debug_assert_stamp_ordered!(self.items[pos - 1].stamp(), stamp);
        }
        if pos + 1 < self.items.len() {
            debug_assert_stamp_ordered!(stamp, self.items[pos + 1].stamp());
        }

        evicted
    }

    /// Stamp of the front (oldest) element.
    #[inline]
    pub fn oldest_stamp(&self) -> Option<D::Stamp> {
        self.items.front().map(Dispatch::stamp)
    }

    /// Stamp of the back (newest) element.
    #[inline]
    pub fn newest_stamp(&self) -> Option<D::Stamp> {
        self.items.back().map(Dispatch::stamp)
    }

    /// Removes and returns the front element.
    #[inline]
    pub fn pop_oldest(&mut self) -> Option<D> {
        self.items.pop_front()
    }

    /// Retires every element with `stamp < boundary`. Returns the count
    /// removed.
    pub fn remove_before(&mut self, boundary: D::Stamp) -> usize {
        let k = self.items.partition_point(|e| e.stamp() < boundary);
        self.items.drain(..k);
        if let Some(oldest) = self.oldest_stamp() {
            debug_assert_retention!(oldest, boundary);
        }
        k
    }

    /// Retires every element with `stamp <= boundary`. Returns the count
    /// removed.
    pub fn remove_at_before(&mut self, boundary: D::Stamp) -> usize {
        let k = self.items.partition_point(|e| e.stamp() <= boundary);
        self.items.drain(..k);
        if let Some(oldest) = self.oldest_stamp() {
            debug_assert_retention!(oldest, boundary);
        }
        k
    }

    /// Index of the first element with `stamp >= boundary`; equivalently the
    /// number of elements strictly before `boundary`.
    #[inline]
    pub(crate) fn partition_before(&self, boundary: D::Stamp) -> usize {
        self.items.partition_point(|e| e.stamp() < boundary)
    }

    /// Index of the first element with `stamp > boundary`.
    #[inline]
    pub(crate) fn partition_at_before(&self, boundary: D::Stamp) -> usize {
        self.items.partition_point(|e| e.stamp() <= boundary)
    }

    /// The element at `idx` in stamp order.
    #[inline]
    pub fn get(&self, idx: usize) -> Option<&D> {
        self.items.get(idx)
    }

    /// The stamp at `idx` in stamp order.
    #[inline]
    pub(crate) fn stamp_at(&self, idx: usize) -> Option<D::Stamp> {
        self.items.get(idx).map(Dispatch::stamp)
    }

    /// Number of queued elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if no elements are queued.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drops all queued elements.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// The configured capacity bound, if any.
    #[inline]
    pub fn capacity(&self) -> Option<NonZeroUsize> {
        self.capacity
    }

    /// Iterates elements oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &D> {
        self.items.iter()
    }
}

impl<D: Dispatch> Default for DispatchQueue<D> {
    fn default() -> Self {
        Self::new()
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

    fn stamps(q: &DispatchQueue<i64>) -> Vec<i64> {
        q.iter().copied().collect()
    }

    #[test]
    fn test_insert_sorted_fast_path() {
        let q = queue_of(&[1, 2, 3]);
        assert_eq!(stamps(&q), vec![1, 2, 3]);
        assert_eq!(q.oldest_stamp(), Some(1));
        assert_eq!(q.newest_stamp(), Some(3));
    }

    #[test]
    fn test_insert_out_of_order_repositions() {
        let q = queue_of(&[1, 5, 3, 2, 4]);
        assert_eq!(stamps(&q), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_equal_stamps_preserve_insertion_order() {
        let mut q: DispatchQueue<(i64, u32)> = DispatchQueue::new();
        q.insert((2, 0));
        q.insert((1, 1));
        q.insert((2, 2));
        q.insert((2, 3));
        let order: Vec<u32> = q.iter().map(|d| d.1).collect();
        assert_eq!(order, vec![1, 0, 2, 3]);
    }

    #[test]
    fn test_remove_before_is_strict() {
        let mut q = queue_of(&[1, 2, 3, 4]);
        assert_eq!(q.remove_before(3), 2);
        assert_eq!(stamps(&q), vec![3, 4]);
    }

    #[test]
    fn test_remove_at_before_is_inclusive() {
        let mut q = queue_of(&[1, 2, 3, 4]);
        assert_eq!(q.remove_at_before(3), 3);
        assert_eq!(stamps(&q), vec![4]);
    }

    #[test]
    fn test_pop_oldest() {
        let mut q = queue_of(&[2, 1]);
        assert_eq!(q.pop_oldest(), Some(1));
        assert_eq!(q.pop_oldest(), Some(2));
        assert_eq!(q.pop_oldest(), None);
        assert!(q.is_empty());
    }

    #[test]
    fn test_bounded_drops_oldest_before_insert() {
        let mut q: DispatchQueue<i64> = DispatchQueue::bounded(NonZeroUsize::new(3).unwrap());
        for s in 1..=5 {
            let evicted = q.insert(s);
            if s > 3 {
                assert_eq!(evicted, Some(s - 3));
            } else {
                assert!(evicted.is_none());
            }
        }
        assert_eq!(stamps(&q), vec![3, 4, 5]);
        assert_eq!(q.len(), 3);
    }

    #[test]
    fn test_bounded_eviction_with_disordered_insert() {
        let mut q: DispatchQueue<i64> = DispatchQueue::bounded(NonZeroUsize::new(2).unwrap());
        q.insert(10);
        q.insert(20);
        // Oldest (10) is dropped first, then 15 is positioned before 20.
        assert_eq!(q.insert(15), Some(10));
        assert_eq!(stamps(&q), vec![15, 20]);
    }

    #[test]
    fn test_partition_helpers() {
        let q = queue_of(&[1, 3, 3, 5]);
        assert_eq!(q.partition_before(3), 1);
        assert_eq!(q.partition_at_before(3), 3);
        assert_eq!(q.partition_before(0), 0);
        assert_eq!(q.partition_at_before(9), 4);
    }
}
