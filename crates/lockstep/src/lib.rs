//! Lockstep - Multi-Stream Frame Synchronization
//!
//! Synchronizes groups of timestamped elements drawn from independent input
//! streams into coherent frames: one **driver** captor produces a stamp
//! window per frame, N **follower** captors select their streams' elements
//! against it, and capture across the group is atomic and paced by the
//! slowest stream. Built for data-driven pipelines where the arrival of new
//! data paces execution.
//!
//! # Key Features
//!
//! - Eleven capture policies: four driver rules, seven follower rules,
//!   each with precise boundary and retention semantics
//! - Out-of-order tolerant, optionally bounded per-stream buffers
//! - Two concurrency modes with one surface: single-threaded polling
//!   captors and mutex/condvar shared handles with blocking capture
//! - Heterogeneous groups: captors of different dispatch types compose as
//!   plain tuples, monomorphized end to end
//!
//! The engine selects and emits elements verbatim — no interpolation,
//! resampling, or value-level transformation.
//!
//! # Example
//!
//! ```
//! use lockstep::drivers::Next;
//! use lockstep::followers::ClosestBefore;
//! use lockstep::{DriverCaptor, FollowerCaptor, Synchronizer};
//!
//! // Camera frames drive; the closest-in-time IMU sample follows.
//! let mut group = (
//!     DriverCaptor::new(Next::new()),
//!     FollowerCaptor::new(ClosestBefore::<i64>::new(1, 3).unwrap()),
//! );
//! let mut sinks = (Vec::new(), Vec::new());
//!
//! group.0.inject(10i64);
//! group.1.inject_range([4i64, 7, 8, 12]);
//!
//! let result = Synchronizer::capture(&mut group, &mut sinks);
//! assert!(result.is_primed());
//! assert_eq!(sinks.0, vec![10]);
//! assert_eq!(sinks.1, vec![8]);
//! ```

mod captor;
mod config;
mod dispatch;
pub mod drivers;
pub mod followers;
mod invariants;
mod lock;
mod metrics;
mod policy;
mod queue;
mod range;
mod shared;
mod sink;
mod stamp;
mod state;
mod sync;

pub use captor::{DriveOps, DriverCaptor, DriverProbe, FollowOps, FollowerCaptor, FollowerProbe};
pub use config::CaptorConfig;
pub use dispatch::{Dispatch, Stamped};
pub use lock::{CaptureSignal, CaptureWait, SignalPhase, WaitOutcome};
pub use metrics::{Metrics, MetricsSnapshot};
pub use policy::{DriverPolicy, FollowerPolicy, PolicyError};
pub use queue::DispatchQueue;
pub use range::CaptureRange;
pub use shared::{SharedDriver, SharedFollower};
pub use sink::{Discard, Latest, Sink};
pub use stamp::{MonoStamp, Stamp};
pub use state::{CaptureState, GroupCapture};
pub use sync::{BlockingCaptorGroup, CaptorGroup, GroupProbe, Synchronizer};
