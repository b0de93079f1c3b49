use crate::micros::{Micros, UMicros};
use std::cell::Cell;
use std::thread;
use std::time::Instant;

/// Time source the [`Scheduler`](super::Scheduler) paces against.
pub trait Clock {
    /// Monotonic instant.
    fn now(&self) -> Micros;
    /// Block for `duration`.
    fn sleep(&mut self, duration: UMicros);
}

/// Wall clock over [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// A clock reading zero now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Micros {
        self.origin.elapsed().into()
    }

    fn sleep(&mut self, duration: UMicros) {
        thread::sleep(duration.into());
    }
}

/// Virtual time: sleeping advances it instantly.
///
/// `lag` is added after every [`Clock::now`] reading, standing in for the
/// time the player spends decoding and writing.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Micros>,
    lag: UMicros,
    sleeps: Vec<UMicros>,
}

impl ManualClock {
    /// Starts at zero, without lag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every reading of the clock costs `lag`.
    pub fn with_lag(lag: UMicros) -> Self {
        Self {
            lag,
            ..Self::default()
        }
    }

    /// Move time forward without sleeping.
    pub fn advance(&self, duration: UMicros) {
        self.now.set(self.now.get() + duration);
    }

    /// Every sleep requested so far
    pub fn sleeps(&self) -> &[UMicros] {
        &self.sleeps
    }

    /// Sum of every sleep requested so far
    pub fn slept(&self) -> UMicros {
        let mut total = UMicros::ZERO;
        for sleep in &self.sleeps {
            total += *sleep;
        }
        total
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Micros {
        let now = self.now.get();
        self.now.set(now + self.lag);
        now
    }

    fn sleep(&mut self, duration: UMicros) {
        self.sleeps.push(duration);
        self.advance(duration);
    }
}

impl<C: Clock> Clock for &mut C {
    fn now(&self) -> Micros {
        (**self).now()
    }

    fn sleep(&mut self, duration: UMicros) {
        (**self).sleep(duration)
    }
}
