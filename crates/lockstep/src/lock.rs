//! Capture wakeup signal for blocking captures.
//!
//! Shared captors wired to the same [`CaptureSignal`] form a wait domain:
//! every successful `inject` bumps the data generation and wakes waiters;
//! `abort` and `reset` bump the interrupt generation instead, so a thread
//! parked in a blocking capture observes cancellation immediately. Waiters
//! snapshot the phase *before* attempting a capture, which closes the
//! missed-wakeup window between an attempt and the wait that follows it.

use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Instant;

/// Generation counters observed by blocking captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SignalPhase {
    data: u64,
    interrupts: u64,
}

/// Why a phase wait returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// New data arrived somewhere in the wait domain.
    Notified,
    /// An abort or reset was broadcast.
    Interrupted,
    /// The deadline passed with no phase change.
    TimedOut,
}

/// Condition-variable wakeup channel shared by a group of captors.
#[derive(Debug, Default)]
pub struct CaptureSignal {
    phase: Mutex<SignalPhase>,
    cond: Condvar,
}

impl CaptureSignal {
    /// Creates a signal, ready to be shared across a captor group.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Snapshot of the current phase.
    pub fn phase(&self) -> SignalPhase {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records new data and wakes all waiters.
    pub fn notify_data(&self) {
        let mut phase = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
        phase.data = phase.data.wrapping_add(1);
        drop(phase);
        self.cond.notify_all();
    }

    /// Records an abort/reset and wakes all waiters.
    pub fn notify_interrupt(&self) {
        let mut phase = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
        phase.interrupts = phase.interrupts.wrapping_add(1);
        drop(phase);
        self.cond.notify_all();
    }

    /// Blocks until the phase moves past `seen` or `deadline` passes.
    ///
    /// Interrupts take precedence over data when both occurred during the
    /// wait.
    pub fn wait_until(&self, seen: SignalPhase, deadline: Instant) -> WaitOutcome {
        let mut phase = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            if phase.interrupts != seen.interrupts {
                return WaitOutcome::Interrupted;
            }
            if phase.data != seen.data {
                return WaitOutcome::Notified;
            }
            let now = Instant::now();
            if now >= deadline {
                return WaitOutcome::TimedOut;
            }
            let (guard, _timed_out) = self
                .cond
                .wait_timeout(phase, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            phase = guard;
        }
    }
}

/// Access to a captor's wait domain, for blocking group captures.
pub trait CaptureWait {
    /// Snapshot of the wait domain's phase.
    fn phase(&self) -> SignalPhase;

    /// Blocks until the phase moves past `seen` or `deadline` passes.
    fn wait_phase_until(&self, seen: SignalPhase, deadline: Instant) -> WaitOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_notify_data_changes_phase() {
        let signal = CaptureSignal::new();
        let seen = signal.phase();
        signal.notify_data();
        assert_ne!(signal.phase(), seen);
    }

    #[test]
    fn test_wait_returns_notified_on_data() {
        let signal = CaptureSignal::new();
        let seen = signal.phase();

        let waiter = {
            let signal = Arc::clone(&signal);
            thread::spawn(move || {
                signal.wait_until(seen, Instant::now() + Duration::from_secs(5))
            })
        };

        signal.notify_data();
        assert_eq!(waiter.join().unwrap(), WaitOutcome::Notified);
    }

    #[test]
    fn test_wait_returns_interrupted_on_abort() {
        let signal = CaptureSignal::new();
        let seen = signal.phase();

        let waiter = {
            let signal = Arc::clone(&signal);
            thread::spawn(move || {
                signal.wait_until(seen, Instant::now() + Duration::from_secs(5))
            })
        };

        signal.notify_interrupt();
        assert_eq!(waiter.join().unwrap(), WaitOutcome::Interrupted);
    }

    #[test]
    fn test_wait_times_out() {
        let signal = CaptureSignal::new();
        let seen = signal.phase();
        let outcome = signal.wait_until(seen, Instant::now() + Duration::from_millis(20));
        assert_eq!(outcome, WaitOutcome::TimedOut);
    }

    #[test]
    fn test_stale_snapshot_returns_immediately() {
        let signal = CaptureSignal::new();
        let seen = signal.phase();
        signal.notify_data();
        // The wakeup happened before the wait: no sleep, no missed signal.
        let outcome = signal.wait_until(seen, Instant::now() + Duration::from_secs(5));
        assert_eq!(outcome, WaitOutcome::Notified);
    }
}
