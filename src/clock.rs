//! Where time and randomness come from.
//!
//! The timer helpers never read the wall clock or a random generator
//! directly. They take a [`Clock`] and a [`Jitter`], which makes them
//! deterministic under test and usable without `std`.

use crate::time::Time;

/// A source of the current time.
pub trait Clock {
    /// The current instant.
    fn now(&self) -> Time;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Time {
        (**self).now()
    }
}

/// A source of random delays.
pub trait Jitter {
    /// A value in `[0, bound)`. Never called with a `bound` of 0.
    fn below(&mut self, bound: u32) -> u32;
}

/// Any `rand` generator is a jitter source.
///
/// Protocol jitter only needs to keep responders on the same link from
/// firing in lockstep, it doesn't need to be cryptographically strong.
impl<R: rand::RngCore> Jitter for R {
    fn below(&mut self, bound: u32) -> u32 {
        use rand::Rng;

        if bound == 0 {
            return 0;
        }
        self.gen_range(0..bound)
    }
}

/// Jitter that is always 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl Jitter for NoJitter {
    fn below(&mut self, _bound: u32) -> u32 {
        0
    }
}

/// The system wall clock.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[cfg(feature = "std")]
impl Clock for SystemClock {
    fn now(&self) -> Time {
        Time::from(std::time::SystemTime::now())
    }
}

/// A clock that only moves when told to.
///
/// ```
/// use mdns_core::{age_with, Clock, FixedClock, Time};
///
/// let mut clock = FixedClock::new(Time::new(10, 0));
/// let sent = clock.now();
/// clock.advance_millis(250);
/// assert_eq!(age_with(&clock, sent), 250_000);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedClock {
    now: Time,
}

impl FixedClock {
    /// A clock standing still at `now`.
    pub fn new(now: Time) -> Self {
        FixedClock { now }
    }

    /// Move the clock to `now`. It may go backwards.
    pub fn set(&mut self, now: Time) {
        self.now = now;
    }

    /// Move the clock `ms` milliseconds forward.
    pub fn advance_millis(&mut self, ms: u64) {
        self.now = self.now.add_millis(ms);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Time {
        self.now
    }
}

#[cfg(all(feature = "std", test))]
mod test {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn fixed_clock_moves_when_told() {
        let mut clock = FixedClock::new(Time::new(1, 0));
        assert_eq!(clock.now(), Time::new(1, 0));
        clock.advance_millis(1_500);
        assert_eq!(clock.now(), Time::new(2, 500_000));
        clock.set(Time::ZERO);
        assert_eq!(clock.now(), Time::ZERO);
    }

    #[test]
    fn clock_by_reference() {
        fn read<C: Clock>(c: C) -> Time {
            c.now()
        }
        let clock = FixedClock::new(Time::new(7, 7));
        assert_eq!(read(&clock), Time::new(7, 7));
    }

    #[test]
    fn system_clock_is_past_2020() {
        assert!(SystemClock.now() > Time::new(1_577_836_800, 0));
    }

    #[test]
    fn rng_jitter_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for bound in [1, 2, 10, 500] {
            for _ in 0..100 {
                assert!(rng.below(bound) < bound);
            }
        }
        assert_eq!(rng.below(0), 0);
        assert_eq!(StdRng::seed_from_u64(1).below(1), 0);
    }

    #[test]
    fn no_jitter() {
        assert_eq!(NoJitter.below(100), 0);
    }
}
