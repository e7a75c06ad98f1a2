//! Debug assertion macros for queue and capture invariants.
//!
//! Active only in debug builds (`debug_assert!`), so there is zero overhead
//! in release builds. Used by the queue, the policies, and the group
//! orchestrator.

/// Assert that a capture range is ordered.
///
/// **Invariant**: `lower <= upper` for every range a driver produces.
macro_rules! debug_assert_range_ordered {
    ($lower:expr, $upper:expr) => {
        debug_assert!(
            $lower <= $upper,
            "capture range inverted: lower {:?} > upper {:?}",
            $lower,
            $upper
        )
    };
}

/// Assert stamp order between adjacent queue elements.
///
/// **Invariant**: queue stamps are non-decreasing front to back; equal
/// stamps keep insertion order.
macro_rules! debug_assert_stamp_ordered {
    ($prev:expr, $next:expr) => {
        debug_assert!(
            $prev <= $next,
            "queue order violated: stamp {:?} precedes {:?}",
            $prev,
            $next
        )
    };
}

/// Assert the bounded-queue size limit.
///
/// **Invariant**: a bounded queue never holds more than its capacity; the
/// oldest element is dropped before an over-capacity insert.
macro_rules! debug_assert_bounded_size {
    ($len:expr, $capacity:expr) => {
        debug_assert!(
            $len <= $capacity,
            "bounded queue overflow: len {} exceeds capacity {}",
            $len,
            $capacity
        )
    };
}

/// Assert the post-capture retention boundary.
///
/// **Invariant**: after a primed capture, no queued element's stamp lies
/// below the policy's retention boundary.
macro_rules! debug_assert_retention {
    ($oldest:expr, $boundary:expr) => {
        debug_assert!(
            $oldest >= $boundary,
            "retention violated: oldest stamp {:?} below boundary {:?}",
            $oldest,
            $boundary
        )
    };
}

pub(crate) use debug_assert_bounded_size;
pub(crate) use debug_assert_range_ordered;
pub(crate) use debug_assert_retention;
pub(crate) use debug_assert_stamp_ordered;
