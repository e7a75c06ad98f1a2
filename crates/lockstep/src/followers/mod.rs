//! Follower capture policies.
//!
//! A follower selects elements from its own queue against the group's
//! driving range. Each policy derives an effective boundary from the range
//! and a signed `delay`, emits in non-decreasing stamp order, and retires a
//! policy-specific prefix on every primed capture.
//!
//! | Policy | Boundary | Character |
//! |---|---|---|
//! | [`AnyBefore`] | `upper - delay` | optional stream; never blocks the group |
//! | [`Before`] | `lower - delay` | everything before the frame, once bounded |
//! | [`ClosestBefore`] | `lower - delay` | freshest sample within a period |
//! | [`CountBefore`] | `lower - delay` | fixed-depth history window |
//! | [`Latched`] | `lower - min period` | sample-and-hold |
//! | [`MatchedStamp`] | `lower` | exact stamp match |
//! | [`Ranged`] | `[lower - delay, upper - delay]` | bracketed interval |

mod any_before;
mod before;
mod closest_before;
mod count_before;
mod latched;
mod matched_stamp;
mod ranged;

pub use any_before::AnyBefore;
pub use before::Before;
pub use closest_before::ClosestBefore;
pub use count_before::CountBefore;
pub use latched::Latched;
pub use matched_stamp::MatchedStamp;
pub use ranged::Ranged;
