//! Stream time.
//!
//! [`ClockTime`] is the timestamp carried by buffers. An unset timestamp is
//! represented by the [`ClockTime::NONE`] sentinel rather than an `Option`,
//! which keeps [`Metadata`](crate::metadata::Metadata) `Copy`-friendly and
//! mirrors how media hosts mark "no timestamp" on a buffer.

use std::time::Duration;

/// Time in nanoseconds since stream start.
///
/// # Examples
///
/// ```rust
/// use md5sum::clock::ClockTime;
///
/// let t = ClockTime::from_millis(1500);
/// assert!(t.is_some());
/// assert_eq!(t.to_string(), "1.500s");
/// assert!(ClockTime::NONE.to_option().is_none());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ClockTime(u64);

impl ClockTime {
    /// Zero time.
    pub const ZERO: Self = Self(0);

    /// Largest valid time.
    pub const MAX: Self = Self(u64::MAX - 1);

    /// Unset time.
    pub const NONE: Self = Self(u64::MAX);

    /// Create from nanoseconds.
    #[inline]
    pub const fn from_nanos(ns: u64) -> Self {
        Self(ns)
    }

    /// Create from milliseconds.
    #[inline]
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms.saturating_mul(1_000_000))
    }

    /// Create from seconds.
    #[inline]
    pub const fn from_secs(s: u64) -> Self {
        Self(s.saturating_mul(1_000_000_000))
    }

    /// Raw nanoseconds.
    #[inline]
    pub const fn nanos(self) -> u64 {
        self.0
    }

    /// Whole milliseconds.
    #[inline]
    pub const fn millis(self) -> u64 {
        self.0 / 1_000_000
    }

    /// True for the [`NONE`](Self::NONE) sentinel.
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u64::MAX
    }

    /// True for any valid time.
    #[inline]
    pub const fn is_some(self) -> bool {
        !self.is_none()
    }

    /// `None` for the sentinel, `Some(self)` otherwise.
    #[inline]
    pub const fn to_option(self) -> Option<Self> {
        if self.is_none() { None } else { Some(self) }
    }

    /// Add, never producing the sentinel. NONE stays NONE.
    #[inline]
    pub const fn saturating_add(self, rhs: Self) -> Self {
        if self.is_none() || rhs.is_none() {
            return Self::NONE;
        }
        let sum = self.0.saturating_add(rhs.0);
        if sum == u64::MAX { Self::MAX } else { Self(sum) }
    }

    /// Subtract, clamping at zero. NONE stays NONE.
    #[inline]
    pub const fn saturating_sub(self, rhs: Self) -> Self {
        if self.is_none() || rhs.is_none() {
            return Self::NONE;
        }
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl std::ops::Add for ClockTime {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.saturating_add(rhs)
    }
}

impl std::ops::Sub for ClockTime {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.saturating_sub(rhs)
    }
}

impl From<Duration> for ClockTime {
    fn from(d: Duration) -> Self {
        let ns = u64::try_from(d.as_nanos()).unwrap_or(u64::MAX);
        Self(ns.min(Self::MAX.0))
    }
}

impl std::fmt::Display for ClockTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "NONE")
        } else {
            write!(f, "{}.{:03}s", self.0 / 1_000_000_000, self.millis() % 1000)
        }
    }
}
