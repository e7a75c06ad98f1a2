//! Sequencing stamp traits and the built-in stamp types.
//!
//! A stamp is the totally ordered sequencing value attached to every element
//! of an input stream. Policies shift stamps by a signed offset (delays may
//! be negative), so every stamp type carries an associated `Offset` type
//! closed under `add_offset`/`sub_offset`.
//!
//! Arithmetic is saturating: the `MIN`/`MAX` sentinels are absorbing rather
//! than wrapping. Wrapping stamp arithmetic would silently break the
//! monotone ordering every policy depends on, so it is treated as a fatal
//! misuse and avoided structurally.

use std::fmt::Debug;
use std::time::Duration;

/// A totally ordered sequencing value with signed offset arithmetic.
pub trait Stamp: Copy + Ord + Debug {
    /// Signed offset type: policy delays and periods.
    type Offset: Copy + Ord + Debug;

    /// Smallest representable stamp.
    const MIN: Self;
    /// Largest representable stamp.
    const MAX: Self;
    /// The zero offset, for sign checks on policy parameters.
    const ZERO_OFFSET: Self::Offset;

    /// `self + delta`, saturating at the sentinels.
    fn add_offset(self, delta: Self::Offset) -> Self;

    /// `self - delta`, saturating at the sentinels.
    fn sub_offset(self, delta: Self::Offset) -> Self;

    /// `self - earlier` as an offset, saturating.
    fn offset_from(self, earlier: Self) -> Self::Offset;
}

macro_rules! impl_signed_stamp {
    ($($t:ty),*) => {
        $(
            impl Stamp for $t {
                type Offset = $t;

                const MIN: Self = <$t>::MIN;
                const MAX: Self = <$t>::MAX;
                const ZERO_OFFSET: Self::Offset = 0;

                #[inline]
                fn add_offset(self, delta: Self::Offset) -> Self {
                    self.saturating_add(delta)
                }

                #[inline]
                fn sub_offset(self, delta: Self::Offset) -> Self {
                    self.saturating_sub(delta)
                }

                #[inline]
                fn offset_from(self, earlier: Self) -> Self::Offset {
                    self.saturating_sub(earlier)
                }
            }
        )*
    };
}

impl_signed_stamp!(i32, i64);

macro_rules! impl_unsigned_stamp {
    ($($t:ty => $o:ty),*) => {
        $(
            impl Stamp for $t {
                type Offset = $o;

                const MIN: Self = <$t>::MIN;
                const MAX: Self = <$t>::MAX;
                const ZERO_OFFSET: Self::Offset = 0;

                #[inline]
                fn add_offset(self, delta: Self::Offset) -> Self {
                    if delta >= 0 {
                        self.saturating_add(<$t>::try_from(delta).unwrap_or(<$t>::MAX))
                    } else {
                        self.saturating_sub(
                            <$t>::try_from(delta.unsigned_abs()).unwrap_or(<$t>::MAX),
                        )
                    }
                }

                #[inline]
                fn sub_offset(self, delta: Self::Offset) -> Self {
                    if delta >= 0 {
                        self.saturating_sub(<$t>::try_from(delta).unwrap_or(<$t>::MAX))
                    } else {
                        self.saturating_add(
                            <$t>::try_from(delta.unsigned_abs()).unwrap_or(<$t>::MAX),
                        )
                    }
                }

                #[inline]
                fn offset_from(self, earlier: Self) -> Self::Offset {
                    if self >= earlier {
                        <$o>::try_from(self - earlier).unwrap_or(<$o>::MAX)
                    } else {
                        <$o>::try_from(earlier - self).map_or(<$o>::MIN, |d| -d)
                    }
                }
            }
        )*
    };
}

impl_unsigned_stamp!(u32 => i64, u64 => i64);

/// A monotonic time-point stamp in nanosecond ticks.
///
/// Represents time elapsed since some caller-chosen origin (typically the
/// process start or the first message of a session). Offsets are signed
/// nanoseconds, so delays of either sign compose naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MonoStamp {
    nanos: i64,
}

impl MonoStamp {
    /// A stamp at the given nanosecond tick.
    #[inline]
    pub const fn from_nanos(nanos: i64) -> Self {
        Self { nanos }
    }

    /// A stamp at a `Duration` past the origin. Saturates beyond ~292 years.
    #[inline]
    pub fn from_duration(since_origin: Duration) -> Self {
        Self {
            nanos: i64::try_from(since_origin.as_nanos()).unwrap_or(i64::MAX),
        }
    }

    /// The raw nanosecond tick.
    #[inline]
    pub const fn as_nanos(self) -> i64 {
        self.nanos
    }
}

impl Stamp for MonoStamp {
    type Offset = i64;

    const MIN: Self = MonoStamp { nanos: i64::MIN };
    const MAX: Self = MonoStamp { nanos: i64::MAX };
    const ZERO_OFFSET: i64 = 0;

    #[inline]
    fn add_offset(self, delta: i64) -> Self {
        MonoStamp {
            nanos: self.nanos.saturating_add(delta),
        }
    }

    #[inline]
    fn sub_offset(self, delta: i64) -> Self {
        MonoStamp {
            nanos: self.nanos.saturating_sub(delta),
        }
    }

    #[inline]
    fn offset_from(self, earlier: Self) -> i64 {
        self.nanos.saturating_sub(earlier.nanos)
    }
}
