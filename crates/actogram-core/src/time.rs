//! Wall-clock primitives for activity timelines
//!
//! A timeline lives on a discrete tick axis; these types anchor that axis
//! to wall-clock time:
//! - `DayTime`: time of day of tick 0 and of recurring day boundaries
//! - `Resolution`: wall-clock length of one tick

use std::fmt;

/// Seconds in one day.
pub const SECS_PER_DAY: i64 = 86_400;

/// Time of day as seconds since local midnight.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DayTime(i64);

impl DayTime {
    pub const MIDNIGHT: DayTime = DayTime(0);

    #[inline]
    pub const fn from_secs(secs: i64) -> Self {
        DayTime(secs)
    }

    #[inline]
    pub const fn from_minutes(minutes: i64) -> Self {
        DayTime(minutes * 60)
    }

    #[inline]
    pub const fn from_hours(hours: i64) -> Self {
        DayTime(hours * 3600)
    }

    #[inline]
    pub const fn from_hms(hours: i64, minutes: i64, secs: i64) -> Self {
        DayTime(hours * 3600 + minutes * 60 + secs)
    }

    #[inline]
    pub fn as_secs(self) -> i64 {
        self.0
    }

    /// Seconds from `earlier` to `self`; negative if `self` lies before it.
    #[inline]
    pub fn signed_secs_since(self, earlier: DayTime) -> i64 {
        self.0 - earlier.0
    }

    /// Advance by a signed number of ticks, wrapping around midnight.
    pub fn advanced_by_ticks(self, ticks: i64, resolution: Resolution) -> DayTime {
        let secs = (self.0 + ticks * resolution.as_secs() as i64).rem_euclid(SECS_PER_DAY);
        DayTime(secs)
    }
}

impl fmt::Display for DayTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.0.rem_euclid(SECS_PER_DAY);
        let (h, m, s) = (total / 3600, total % 3600 / 60, total % 60);
        if s == 0 {
            write!(f, "{:02}:{:02}", h, m)
        } else {
            write!(f, "{:02}:{:02}:{:02}", h, m, s)
        }
    }
}

impl fmt::Debug for DayTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DayTime({})", self)
    }
}

/// Wall-clock duration of a single tick, in seconds.
///
/// A zero resolution is never meaningful; all derived quantities
/// (`ticks_per_day`, `frame_length`, ...) treat it as invalid.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Resolution(u32);

impl Resolution {
    #[inline]
    pub const fn from_secs(secs: u32) -> Self {
        Resolution(secs)
    }

    #[inline]
    pub const fn from_minutes(minutes: u32) -> Self {
        Resolution(minutes * 60)
    }

    #[inline]
    pub const fn from_hours(hours: u32) -> Self {
        Resolution(hours * 3600)
    }

    #[inline]
    pub fn as_secs(self) -> u32 {
        self.0
    }

    /// Whether a whole number of ticks fits in one day.
    #[inline]
    pub fn divides_day(self) -> bool {
        self.0 > 0 && SECS_PER_DAY % self.0 as i64 == 0
    }

    /// Number of ticks in one day, if this resolution divides a day exactly.
    pub fn ticks_per_day(self) -> Option<usize> {
        if self.divides_day() {
            Some((SECS_PER_DAY / self.0 as i64) as usize)
        } else {
            None
        }
    }

    /// How many ticks of this resolution make up one tick of `target`.
    ///
    /// Returns `None` unless `target` is a positive integer multiple of
    /// this resolution.
    pub fn frame_length(self, target: Resolution) -> Option<usize> {
        if self.0 == 0 || target.0 == 0 || target.0 % self.0 != 0 {
            return None;
        }
        Some((target.0 / self.0) as usize)
    }

    /// Number of whole ticks covering a span of `secs` seconds, if the
    /// span is exactly tick-aligned.
    pub fn ticks_in(self, secs: i64) -> Option<i64> {
        if self.0 == 0 || secs % self.0 as i64 != 0 {
            return None;
        }
        Some(secs / self.0 as i64)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 > 0 && self.0 % 3600 == 0 {
            write!(f, "{}h", self.0 / 3600)
        } else if self.0 > 0 && self.0 % 60 == 0 {
            write!(f, "{}min", self.0 / 60)
        } else {
            write!(f, "{}s", self.0)
        }
    }
}

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Resolution({})", self)
    }
}
