//! Microsecond quantities for the clock

use core::ops::{Add, AddAssign, Sub};
use core::time::Duration;

/// An instant on a [`Clock`](crate::player::Clock), or the signed gap
/// between two of them.
///
/// Gaps go negative when playback has fallen behind its schedule.
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy, Default)]
pub struct Micros(i64);

impl Micros {
    /// The clock origin
    pub const ZERO: Self = Self(0);

    /// Wrap a count of microseconds.
    pub const fn new(us: i64) -> Self {
        Self(us)
    }

    /// Raw count
    pub const fn us(&self) -> i64 {
        self.0
    }

    /// `None` for a negative gap.
    pub const fn to_unsigned(&self) -> Option<UMicros> {
        match self.0 {
            us if us < 0 => None,
            us => Some(UMicros(us as u64)),
        }
    }
}

/// A length of time that cannot be negative: sleeps, and offsets derived
/// from a tick count.
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy, Default)]
pub struct UMicros(u64);

impl UMicros {
    /// No time at all
    pub const ZERO: Self = Self(0);

    /// Wrap a count of microseconds.
    #[inline]
    pub const fn new(us: u64) -> Self {
        Self(us)
    }

    /// Raw count
    #[inline]
    pub const fn us(&self) -> u64 {
        self.0
    }

    /// The same length as a signed gap.
    #[inline]
    pub const fn to_micros(&self) -> Micros {
        Micros(self.0 as i64)
    }
}

impl Add<UMicros> for Micros {
    type Output = Self;
    fn add(self, rhs: UMicros) -> Self {
        Self(self.0 + rhs.to_micros().0)
    }
}

impl AddAssign<UMicros> for Micros {
    fn add_assign(&mut self, rhs: UMicros) {
        *self = *self + rhs;
    }
}

impl Sub for Micros {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Sub<UMicros> for Micros {
    type Output = Self;
    fn sub(self, rhs: UMicros) -> Self {
        self - rhs.to_micros()
    }
}

impl AddAssign for UMicros {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl From<UMicros> for Duration {
    fn from(length: UMicros) -> Self {
        Duration::from_micros(length.0)
    }
}

impl From<Duration> for Micros {
    fn from(elapsed: Duration) -> Self {
        Self(i64::try_from(elapsed.as_micros()).unwrap_or(i64::MAX))
    }
}

#[test]
fn negative_difference_has_no_unsigned_form() {
    let early = Micros::new(1_000);
    let late = early + UMicros::new(2_500);
    assert_eq!((late - early).to_unsigned(), Some(UMicros::new(2_500)));
    assert_eq!((early - late).to_unsigned(), None);
    assert_eq!(Duration::from(UMicros::new(1_500)), Duration::from_micros(1_500));
}
