//! Capture result states and the group capture result.

use crate::range::CaptureRange;
use crate::stamp::Stamp;

/// Outcome of a capture attempt on a captor or a captor group.
///
/// These are protocol states, not errors: a caller polling a group is
/// expected to see long runs of `Retry` between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureState {
    /// Output was produced (or, from a dry run, is producible).
    Primed,
    /// More data is needed; buffers are retained untouched.
    Retry,
    /// The driving sequence has advanced beyond the point where this captor
    /// could ever satisfy its rule; state up to the abort stamp is dropped.
    Abort,
    /// A blocking capture reached its deadline.
    Timeout,
}

impl CaptureState {
    /// Reduces two states to the group state: `Abort` dominates, then
    /// `Timeout`, then `Retry`; the group is `Primed` only when every
    /// member is.
    #[inline]
    pub fn combine(self, other: CaptureState) -> CaptureState {
        use CaptureState::{Abort, Primed, Retry, Timeout};
        match (self, other) {
            (Abort, _) | (_, Abort) => Abort,
            (Timeout, _) | (_, Timeout) => Timeout,
            (Retry, _) | (_, Retry) => Retry,
            (Primed, Primed) => Primed,
        }
    }

    /// Returns `true` for `Primed`.
    #[inline]
    pub fn is_primed(self) -> bool {
        self == CaptureState::Primed
    }
}

/// Result of a driver or group capture: the reduced state plus the driving
/// range, when one was computed.
///
/// `range` is `None` only when the driver itself was not ready (no candidate
/// range exists yet) or when a blocking wait ended in `Abort`/`Timeout`
/// before any attempt produced a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupCapture<S: Stamp> {
    /// The reduced capture state.
    pub state: CaptureState,
    /// The driving range of this attempt, when the driver produced one.
    pub range: Option<CaptureRange<S>>,
}

impl<S: Stamp> GroupCapture<S> {
    /// A result carrying a state but no range.
    #[inline]
    pub fn state_only(state: CaptureState) -> Self {
        Self { state, range: None }
    }

    /// A `Primed` result for the given range.
    #[inline]
    pub fn primed(range: CaptureRange<S>) -> Self {
        Self {
            state: CaptureState::Primed,
            range: Some(range),
        }
    }

    /// Returns `true` if the capture produced output.
    #[inline]
    pub fn is_primed(&self) -> bool {
        self.state.is_primed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_severity() {
        use CaptureState::*;

        assert_eq!(Primed.combine(Primed), Primed);
        assert_eq!(Primed.combine(Retry), Retry);
        assert_eq!(Retry.combine(Abort), Abort);
        assert_eq!(Abort.combine(Primed), Abort);
        assert_eq!(Timeout.combine(Retry), Timeout);
        assert_eq!(Abort.combine(Timeout), Abort);
    }

    #[test]
    fn test_state_only_has_no_range() {
        let r: GroupCapture<i64> = GroupCapture::state_only(CaptureState::Retry);
        assert_eq!(r.state, CaptureState::Retry);
        assert!(r.range.is_none());
        assert!(!r.is_primed());
    }
}
