//! Group orchestration: one driver, N followers, atomic frame capture.
//!
//! A captor group is a heterogeneous tuple `(driver, follower, ...)` paired
//! with a parallel tuple of sinks. The trait impls below are generated for
//! arities up to eight followers — a hand-written fold over the tuple, so
//! composition stays monomorphized and captors of different dispatch types
//! mix freely as long as they share the driver's stamp type.
//!
//! Group capture is two-pass: a dry pass over every captor first, then the
//! wet pass only when the whole group is ready. On any non-`Primed`
//! reduction no captor retires anything, so a `Retry` group is byte-for-byte
//! untouched and a poll loop can simply try again.

use crate::captor::{DriveOps, DriverProbe, FollowOps, FollowerProbe};
use crate::lock::{CaptureWait, WaitOutcome};
use crate::state::{CaptureState, GroupCapture};
use std::time::Instant;

/// Sink-free group surface: readiness, abort, reset.
pub trait GroupProbe {
    /// The stamp type shared across the group.
    type Stamp: crate::stamp::Stamp;

    /// Evaluates group readiness with no mutation anywhere.
    fn dry_capture(&self) -> GroupCapture<Self::Stamp>;

    /// Broadcasts an abort up to `stamp` to every captor.
    fn abort(&mut self, stamp: Self::Stamp);

    /// Clears every captor's queue and policy state.
    fn reset(&mut self);
}

/// Group capture surface for a parallel tuple of sinks.
pub trait CaptorGroup<Sinks>: GroupProbe {
    /// Attempts one atomic group capture into `sinks`.
    fn capture(&mut self, sinks: &mut Sinks) -> GroupCapture<Self::Stamp>;
}

/// Blocking group capture, available when the driver carries a wait domain
/// (shared captors wired to a common [`crate::CaptureSignal`]).
pub trait BlockingCaptorGroup<Sinks>: CaptorGroup<Sinks> {
    /// Re-attempts capture on every wakeup until a non-`Retry` reduction,
    /// the deadline (`Timeout`), or an interrupt (`Abort`).
    fn capture_until(&mut self, sinks: &mut Sinks, deadline: Instant)
        -> GroupCapture<Self::Stamp>;
}

macro_rules! impl_captor_group {
    ($(($F:ident, $FK:ident, $idx:tt)),*) => {
        impl<C0, $($F,)*> GroupProbe for (C0, $($F,)*)
        where
            C0: DriverProbe,
            $($F: FollowerProbe<Stamp = C0::Stamp>,)*
        {
            type Stamp = C0::Stamp;

            // Folds degenerate gracefully at zero followers.
            #[allow(unused_mut)]
            fn dry_capture(&self) -> GroupCapture<Self::Stamp> {
                let driver = self.0.dry_capture();
                let Some(range) = driver.range else { return driver };
                let mut state = driver.state;
                $( state = state.combine(self.$idx.dry_capture(range)); )*
                GroupCapture { state, range: Some(range) }
            }

            fn abort(&mut self, stamp: Self::Stamp) {
                self.0.abort(stamp);
                $( self.$idx.abort(stamp); )*
            }

            fn reset(&mut self) {
                self.0.reset();
                $( self.$idx.reset(); )*
            }
        }

        impl<C0, K0, $($F, $FK,)*> CaptorGroup<(K0, $($FK,)*)> for (C0, $($F,)*)
        where
            C0: DriveOps<K0>,
            $($F: FollowOps<$FK> + FollowerProbe<Stamp = <C0 as DriverProbe>::Stamp>,)*
        {
            #[allow(unused_mut)]
            fn capture(&mut self, sinks: &mut (K0, $($FK,)*)) -> GroupCapture<Self::Stamp> {
                // Dry pass: nothing mutates unless the whole group is ready.
                let driver = self.0.dry_capture();
                let Some(range) = driver.range else { return driver };
                let mut state = driver.state;
                $( state = state.combine(self.$idx.dry_capture(range)); )*

                match state {
                    CaptureState::Primed => {
                        // Wet pass, in tuple order: driver first.
                        let wet = self.0.capture(&mut sinks.0);
                        let Some(range) = wet.range else { return wet };
                        let mut state = wet.state;
                        $( state = state.combine(self.$idx.capture(&mut sinks.$idx, range)); )*
                        GroupCapture { state, range: Some(range) }
                    }
                    CaptureState::Abort => {
                        // Followers retire up to their own boundary for the
                        // failed range; the driver advances past it. No
                        // output is emitted.
                        self.0.abort(range.upper);
                        $( self.$idx.abort(range.upper); )*
                        GroupCapture { state: CaptureState::Abort, range: Some(range) }
                    }
                    state => GroupCapture { state, range: Some(range) },
                }
            }
        }

        impl<C0, K0, $($F, $FK,)*> BlockingCaptorGroup<(K0, $($FK,)*)> for (C0, $($F,)*)
        where
            C0: DriveOps<K0> + CaptureWait,
            $($F: FollowOps<$FK> + FollowerProbe<Stamp = <C0 as DriverProbe>::Stamp>,)*
        {
            fn capture_until(
                &mut self,
                sinks: &mut (K0, $($FK,)*),
                deadline: Instant,
            ) -> GroupCapture<Self::Stamp> {
                loop {
                    // Snapshot before attempting: an inject that lands
                    // between the attempt and the wait is never missed.
                    let seen = CaptureWait::phase(&self.0);
                    let result = CaptorGroup::capture(self, sinks);
                    if result.state != CaptureState::Retry {
                        return result;
                    }
                    match CaptureWait::wait_phase_until(&self.0, seen, deadline) {
                        WaitOutcome::Notified => {}
                        WaitOutcome::Interrupted => {
                            return GroupCapture::state_only(CaptureState::Abort)
                        }
                        WaitOutcome::TimedOut => {
                            return GroupCapture::state_only(CaptureState::Timeout)
                        }
                    }
                }
            }
        }
    };
}

impl_captor_group!();
impl_captor_group!((F1, K1, 1));
impl_captor_group!((F1, K1, 1), (F2, K2, 2));
impl_captor_group!((F1, K1, 1), (F2, K2, 2), (F3, K3, 3));
impl_captor_group!((F1, K1, 1), (F2, K2, 2), (F3, K3, 3), (F4, K4, 4));
impl_captor_group!((F1, K1, 1), (F2, K2, 2), (F3, K3, 3), (F4, K4, 4), (F5, K5, 5));
impl_captor_group!(
    (F1, K1, 1),
    (F2, K2, 2),
    (F3, K3, 3),
    (F4, K4, 4),
    (F5, K5, 5),
    (F6, K6, 6)
);
impl_captor_group!(
    (F1, K1, 1),
    (F2, K2, 2),
    (F3, K3, 3),
    (F4, K4, 4),
    (F5, K5, 5),
    (F6, K6, 6),
    (F7, K7, 7)
);
impl_captor_group!(
    (F1, K1, 1),
    (F2, K2, 2),
    (F3, K3, 3),
    (F4, K4, 4),
    (F5, K5, 5),
    (F6, K6, 6),
    (F7, K7, 7),
    (F8, K8, 8)
);

/// Stateless orchestrator over captor groups.
///
/// Thin associated functions over the group traits, for call sites that
/// read better with an explicit subject:
///
/// ```
/// use lockstep::{DriverCaptor, FollowerCaptor, Synchronizer};
/// use lockstep::drivers::Next;
/// use lockstep::followers::AnyBefore;
///
/// let mut group = (
///     DriverCaptor::new(Next::new()),
///     FollowerCaptor::new(AnyBefore::<i64>::new(0)),
/// );
/// let mut sinks = (Vec::new(), Vec::new());
///
/// group.0.inject(4i64);
/// group.1.inject(3i64);
///
/// let result = Synchronizer::capture(&mut group, &mut sinks);
/// assert!(result.is_primed());
/// assert_eq!(sinks.0, vec![4]);
/// assert_eq!(sinks.1, vec![3]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Synchronizer;

impl Synchronizer {
    /// Attempts one atomic group capture.
    pub fn capture<Sinks, G>(group: &mut G, sinks: &mut Sinks) -> GroupCapture<G::Stamp>
    where
        G: CaptorGroup<Sinks>,
    {
        group.capture(sinks)
    }

    /// Evaluates group readiness with no mutation anywhere.
    pub fn dry_capture<G: GroupProbe>(group: &G) -> GroupCapture<G::Stamp> {
        group.dry_capture()
    }

    /// Blocks until capture, deadline, or interrupt.
    pub fn capture_until<Sinks, G>(
        group: &mut G,
        sinks: &mut Sinks,
        deadline: Instant,
    ) -> GroupCapture<G::Stamp>
    where
        G: BlockingCaptorGroup<Sinks>,
    {
        group.capture_until(sinks, deadline)
    }

    /// Broadcasts an abort up to `stamp` to every captor in the group.
    pub fn abort<G: GroupProbe>(group: &mut G, stamp: G::Stamp) {
        group.abort(stamp);
    }

    /// Clears every captor in the group.
    pub fn reset<G: GroupProbe>(group: &mut G) {
        group.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::captor::{DriverCaptor, FollowerCaptor};
    use crate::drivers::{Batch, Next};
    use crate::followers::{Before, MatchedStamp};
    use crate::range::CaptureRange;

    #[test]
    fn test_group_capture_batch_before() {
        let mut group = (
            DriverCaptor::new(Batch::new(3).unwrap()),
            FollowerCaptor::new(Before::<i64>::new(0)),
        );
        group.0.inject_range([1i64, 2, 3, 4]);
        group.1.inject_range([0i64, 1, 2, 3, 4, 5]);

        let mut sinks = (Vec::new(), Vec::new());
        let result = Synchronizer::capture(&mut group, &mut sinks);

        assert!(result.is_primed());
        assert_eq!(result.range, Some(CaptureRange::new(1, 3)));
        assert_eq!(sinks.0, vec![1, 2, 3]);
        assert_eq!(sinks.1, vec![0]);
        assert_eq!(group.0.len(), 3);
        assert_eq!(group.1.len(), 5);
    }

    #[test]
    fn test_group_retry_leaves_state_untouched() {
        let mut group = (
            DriverCaptor::new(Next::new()),
            FollowerCaptor::new(MatchedStamp::new()),
        );
        group.0.inject(10i64);
        group.1.inject_range([9i64, 11]);

        let mut sinks = (Vec::new(), Vec::new());
        let result = Synchronizer::capture(&mut group, &mut sinks);

        // Follower's oldest (9) predates the target: a match may still come.
        assert_eq!(result.state, CaptureState::Retry);
        assert!(sinks.0.is_empty());
        assert!(sinks.1.is_empty());
        assert_eq!(group.0.len(), 1);
        assert_eq!(group.1.len(), 2);
    }

    #[test]
    fn test_group_abort_advances_all_captors() {
        let mut group = (
            DriverCaptor::new(Next::new()),
            FollowerCaptor::new(MatchedStamp::new()),
        );
        group.0.inject(10i64);
        group.1.inject_range([11i64, 12]);

        let mut sinks = (Vec::new(), Vec::new());
        let result = Synchronizer::capture(&mut group, &mut sinks);

        assert_eq!(result.state, CaptureState::Abort);
        assert!(sinks.0.is_empty());
        // The driver advanced past the failed range.
        assert!(group.0.is_empty());

        // With the stale range gone, the next frame can prime.
        group.0.inject(11i64);
        let result = Synchronizer::capture(&mut group, &mut sinks);
        assert!(result.is_primed());
        assert_eq!(sinks.1, vec![11]);
    }

    #[test]
    fn test_group_dry_capture_never_mutates() {
        let mut group = (
            DriverCaptor::new(Next::new()),
            FollowerCaptor::new(MatchedStamp::new()),
        );
        group.0.inject(10i64);
        group.1.inject(10i64);

        let dry = Synchronizer::dry_capture(&group);
        assert!(dry.is_primed());
        assert_eq!(group.0.len(), 1);
        assert_eq!(group.1.len(), 1);

        // Dry/wet agreement on a quiescent group.
        let mut sinks = (Vec::new(), Vec::new());
        let wet = Synchronizer::capture(&mut group, &mut sinks);
        assert_eq!(dry, wet);
    }

    #[test]
    fn test_driver_only_group() {
        let mut group = (DriverCaptor::new(Next::new()),);
        group.0.inject(5i64);

        let mut sinks = (Vec::new(),);
        let result = Synchronizer::capture(&mut group, &mut sinks);
        assert!(result.is_primed());
        assert_eq!(sinks.0, vec![5]);
    }

    #[test]
    fn test_group_reset_clears_everything() {
        let mut group = (
            DriverCaptor::new(Next::new()),
            FollowerCaptor::new(MatchedStamp::new()),
        );
        group.0.inject(1i64);
        group.1.inject(1i64);

        Synchronizer::reset(&mut group);
        assert!(group.0.is_empty());
        assert!(group.1.is_empty());
    }

    #[test]
    fn test_group_abort_facade() {
        let mut group = (
            DriverCaptor::new(Next::new()),
            FollowerCaptor::new(MatchedStamp::new()),
        );
        group.0.inject_range([1i64, 5]);
        group.1.inject_range([1i64, 5]);

        Synchronizer::abort(&mut group, 5);
        // Driver drops through the stamp; the follower keeps a possible
        // future match at the stamp itself.
        assert!(group.0.is_empty());
        assert_eq!(group.1.len(), 1);
    }
}
