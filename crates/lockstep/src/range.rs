//! The stamp window produced by a driver and consumed by followers.

use crate::invariants::debug_assert_range_ordered;
use crate::stamp::Stamp;

/// A closed stamp window `[lower, upper]` with `lower <= upper`.
///
/// One range is produced per group capture attempt by the driver captor and
/// shared, unmodified, by every follower in that attempt. Followers derive
/// their effective boundaries from it (usually `lower - delay`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CaptureRange<S: Stamp> {
    /// Stamp of the earliest element captured by the driver.
    pub lower: S,
    /// Stamp of the latest element captured by the driver.
    pub upper: S,
}

impl<S: Stamp> CaptureRange<S> {
    /// Creates a range. `lower <= upper` is required.
    #[inline]
    pub fn new(lower: S, upper: S) -> Self {
        debug_assert_range_ordered!(lower, upper);
        Self { lower, upper }
    }

    /// A degenerate range covering a single stamp.
    #[inline]
    pub fn point(stamp: S) -> Self {
        Self {
            lower: stamp,
            upper: stamp,
        }
    }

    /// Returns `true` if `stamp` falls within the closed window.
    #[inline]
    pub fn contains(&self, stamp: S) -> bool {
        self.lower <= stamp && stamp <= self.upper
    }
}
