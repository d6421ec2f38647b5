//! Instants and the timer arithmetic built on them.

use core::cmp::Ordering;
use core::fmt;
use core::ops::Add;
use core::time::Duration;

use crate::clock::{Clock, Jitter};

const MICROS_PER_SEC: u64 = 1_000_000;

/// A point in time as whole seconds plus microseconds since the Unix epoch.
///
/// The microseconds are always below one second, constructors carry the
/// rest into the seconds.
///
/// ```
/// use mdns_core::Time;
///
/// assert_eq!(Time::new(1, 1_500_000), Time::new(2, 500_000));
/// assert!(Time::new(1, 999_999) < Time::new(2, 0));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Time {
    secs: u64,
    micros: u32,
}

impl Time {
    /// The epoch.
    pub const ZERO: Time = Time { secs: 0, micros: 0 };

    /// Create a time from seconds and microseconds.
    pub const fn new(secs: u64, micros: u32) -> Self {
        let carry = (micros as u64) / MICROS_PER_SEC;
        Time {
            secs: secs.saturating_add(carry),
            micros: ((micros as u64) % MICROS_PER_SEC) as u32,
        }
    }

    /// Create a time from a microsecond offset from the epoch.
    pub const fn from_micros(t: u64) -> Self {
        Time {
            secs: t / MICROS_PER_SEC,
            micros: (t % MICROS_PER_SEC) as u32,
        }
    }

    /// Create a time from a millisecond offset from the epoch.
    pub const fn from_millis(t: u64) -> Self {
        Time {
            secs: t / 1000,
            micros: ((t % 1000) * 1000) as u32,
        }
    }

    /// Whole seconds since the epoch.
    pub fn secs(&self) -> u64 {
        self.secs
    }

    /// The microseconds past the whole second.
    pub fn subsec_micros(&self) -> u32 {
        self.micros
    }

    /// Microseconds since the epoch, saturating at `u64::MAX`.
    pub fn as_micros(&self) -> u64 {
        self.secs
            .saturating_mul(MICROS_PER_SEC)
            .saturating_add(self.micros as u64)
    }

    /// This time moved `us` microseconds forward.
    pub fn add_micros(self, us: u64) -> Self {
        let micros = self.micros as u64 + us % MICROS_PER_SEC;
        let secs = self
            .secs
            .checked_add(us / MICROS_PER_SEC)
            .and_then(|s| s.checked_add(micros / MICROS_PER_SEC));

        match secs {
            Some(secs) => Time {
                secs,
                micros: (micros % MICROS_PER_SEC) as u32,
            },
            // Pinned at the end of time.
            None => Time {
                secs: u64::MAX,
                micros: (MICROS_PER_SEC - 1) as u32,
            },
        }
    }

    /// This time moved `ms` milliseconds forward.
    pub fn add_millis(self, ms: u64) -> Self {
        self.add_micros(ms.saturating_mul(1000))
    }

    /// Check how many milliseconds there is from this `Time` to some other `Time`.
    ///
    /// If other is in the past, this returns 0.
    pub fn millis_until(&self, other: Time) -> u64 {
        if other <= *self {
            return 0;
        }
        diff_instants(other, *self) as u64 / 1000
    }
}

impl PartialOrd for Time {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Time {
    fn cmp(&self, other: &Self) -> Ordering {
        self.secs
            .cmp(&other.secs)
            .then(self.micros.cmp(&other.micros))
    }
}

impl Add<Duration> for Time {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        let us = u64::try_from(rhs.as_micros()).unwrap_or(u64::MAX);
        self.add_micros(us)
    }
}

#[cfg(feature = "std")]
impl From<std::time::SystemTime> for Time {
    /// Times before the epoch become [`Time::ZERO`].
    fn from(t: std::time::SystemTime) -> Self {
        let since = t.duration_since(std::time::UNIX_EPOCH).unwrap_or_default();
        Time {
            secs: since.as_secs(),
            micros: since.subsec_micros(),
        }
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        core::write!(f, "{}.{:06}", self.secs, self.micros)
    }
}

impl fmt::Debug for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        core::write!(f, "Time({})", self)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Time {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Time({}s {}us)", self.secs, self.micros)
    }
}

/// Order two instants, seconds first, then microseconds.
pub fn compare_instants(a: Time, b: Time) -> Ordering {
    a.cmp(&b)
}

/// Microseconds between two instants, whichever comes first.
///
/// Never negative, `diff_instants(a, b) == diff_instants(b, a)`. Saturates
/// at `i64::MAX` for instants more than ~292k years apart.
///
/// ```
/// use mdns_core::{diff_instants, Time};
///
/// let a = Time::new(10, 900_000);
/// let b = Time::new(12, 100_000);
/// assert_eq!(diff_instants(a, b), 1_200_000);
/// assert_eq!(diff_instants(b, a), 1_200_000);
/// ```
pub fn diff_instants(a: Time, b: Time) -> i64 {
    let (later, earlier) = match compare_instants(a, b) {
        Ordering::Less => (b, a),
        _ => (a, b),
    };

    // Can be negative when the seconds differ, the total can't.
    let micros = later.micros as i64 - earlier.micros as i64;

    i64::try_from(later.secs - earlier.secs)
        .ok()
        .and_then(|secs| secs.checked_mul(MICROS_PER_SEC as i64))
        .and_then(|us| us.checked_add(micros))
        .unwrap_or(i64::MAX)
}

/// The instant `base_delay_ms` plus a random `[0, max_jitter_ms)` from now.
///
/// With `max_jitter_ms` of 0 there is no jitter, and `jitter` isn't used.
///
/// ```
/// use mdns_core::{elapse_with, FixedClock, NoJitter, Time};
///
/// let clock = FixedClock::new(Time::new(100, 0));
/// let at = elapse_with(&clock, &mut NoJitter, 1000, 0);
/// assert_eq!(at, Time::new(101, 0));
/// ```
pub fn elapse_with<C, J>(
    clock: &C,
    jitter: &mut J,
    base_delay_ms: u32,
    max_jitter_ms: u32,
) -> Time
where
    C: Clock + ?Sized,
    J: Jitter + ?Sized,
{
    let mut t = clock.now().add_millis(base_delay_ms as u64);

    if max_jitter_ms > 0 {
        let extra = jitter.below(max_jitter_ms);
        trace!(
            "Elapse {}ms with jitter {}ms (max {}ms)",
            base_delay_ms,
            extra,
            max_jitter_ms
        );
        t = t.add_millis(extra as u64);
    }

    t
}

/// [`elapse_with`] on the system clock and the thread-local random generator.
#[cfg(feature = "std")]
pub fn elapse(base_delay_ms: u32, max_jitter_ms: u32) -> Time {
    elapse_with(
        &crate::clock::SystemClock,
        &mut rand::thread_rng(),
        base_delay_ms,
        max_jitter_ms,
    )
}

/// Microseconds since `past`, read from `clock`.
///
/// A `past` that is actually in the future gives the distance to it,
/// still positive.
pub fn age_with<C: Clock + ?Sized>(clock: &C, past: Time) -> i64 {
    diff_instants(clock.now(), past)
}

/// [`age_with`] on the system clock.
#[cfg(feature = "std")]
pub fn age(past: Time) -> i64 {
    age_with(&crate::clock::SystemClock, past)
}

#[cfg(all(feature = "std", test))]
mod test {
    use std::time::SystemTime;

    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::clock::{FixedClock, NoJitter, SystemClock};
    use crate::test::init_test_log;

    use super::*;

    #[test]
    fn new_carries_micros() {
        let t = Time::new(1, 2_345_678);
        assert_eq!(t.secs(), 3);
        assert_eq!(t.subsec_micros(), 345_678);
    }

    #[test]
    fn from_millis_and_micros() {
        assert_eq!(Time::from_millis(1_234), Time::new(1, 234_000));
        assert_eq!(Time::from_micros(1_000_001), Time::new(1, 1));
        assert_eq!(Time::new(5, 6).as_micros(), 5_000_006);
    }

    #[test]
    fn add_carries() {
        assert_eq!(Time::new(1, 999_000).add_millis(2), Time::new(2, 1_000));
        assert_eq!(Time::new(1, 999_999).add_micros(1), Time::new(2, 0));
        assert_eq!(
            Time::new(0, 500_000) + Duration::from_millis(1_600),
            Time::new(2, 100_000)
        );
    }

    #[test]
    fn add_saturates() {
        let start = Time::new(u64::MAX, 0);
        let t = start.add_millis(5_000);
        assert!(t >= start);
        assert_eq!(t, Time::new(u64::MAX, 999_999));

        let edge = Time::new(u64::MAX, 999_999);
        assert_eq!(edge.add_micros(1), edge);
        assert_eq!(
            Time::new(u64::MAX, 500_000).add_micros(100),
            Time::new(u64::MAX, 500_100)
        );
    }

    #[test]
    fn compare_seconds_then_micros() {
        let a = Time::new(1, 999_999);
        let b = Time::new(2, 0);
        assert_eq!(compare_instants(a, b), Ordering::Less);
        assert_eq!(compare_instants(b, a), Ordering::Greater);
        assert_eq!(compare_instants(a, a), Ordering::Equal);
        assert_eq!(
            compare_instants(Time::new(3, 1), Time::new(3, 2)),
            Ordering::Less
        );
    }

    #[test]
    fn diff_is_symmetric() {
        let a = Time::new(10, 900_000);
        let b = Time::new(12, 100_000);
        assert_eq!(diff_instants(a, b), 1_200_000);
        assert_eq!(diff_instants(b, a), 1_200_000);
        assert_eq!(diff_instants(a, a), 0);
    }

    #[test]
    fn diff_saturates() {
        assert_eq!(diff_instants(Time::ZERO, Time::new(u64::MAX, 0)), i64::MAX);
    }

    #[test]
    fn millis_until() {
        let now = Time::new(10, 0);
        assert_eq!(now.millis_until(Time::new(11, 500_000)), 1_500);
        assert_eq!(now.millis_until(Time::new(9, 0)), 0);
        assert_eq!(now.millis_until(now), 0);
    }

    #[test]
    fn from_system_time() {
        let t = Time::from(SystemTime::UNIX_EPOCH + Duration::from_micros(3_000_004));
        assert_eq!(t, Time::new(3, 4));
        let before = SystemTime::UNIX_EPOCH - Duration::from_secs(1);
        assert_eq!(Time::from(before), Time::ZERO);
    }

    #[test]
    fn display() {
        assert_eq!(Time::new(12, 345).to_string(), "12.000345");
        assert_eq!(format!("{:?}", Time::new(1, 0)), "Time(1.000000)");
    }

    #[test]
    fn elapse_without_jitter() {
        let clock = FixedClock::new(Time::new(100, 250_000));
        // A jitter source that must not be consulted.
        struct Panics;
        impl Jitter for Panics {
            fn below(&mut self, _: u32) -> u32 {
                panic!("jitter used without max")
            }
        }
        assert_eq!(
            elapse_with(&clock, &mut Panics, 1000, 0),
            Time::new(101, 250_000)
        );
        assert_eq!(elapse_with(&clock, &mut NoJitter, 0, 0), clock.now());
    }

    #[test]
    fn elapse_jitter_is_bounded() {
        init_test_log();
        let clock = FixedClock::new(Time::new(100, 0));
        let mut rng = StdRng::seed_from_u64(42);

        let low = Time::new(101, 0);
        let high = Time::new(101, 500_000);

        let mut seen_jitter = false;
        for _ in 0..200 {
            let t = elapse_with(&clock, &mut rng, 1000, 500);
            assert!(t >= low && t < high, "{:?}", t);
            // Jitter has millisecond resolution.
            assert_eq!(t.subsec_micros() % 1000, 0);
            seen_jitter |= t > low;
        }
        assert!(seen_jitter);
    }

    #[test]
    fn elapse_on_system_clock() {
        let before = SystemClock.now();
        let t = elapse(1000, 500);
        let after = SystemClock.now();
        assert!(t >= before.add_millis(1000));
        assert!(t <= after.add_millis(1500));

        let t = elapse(1000, 0);
        assert!(t >= before.add_millis(1000));
        assert!(t <= SystemClock.now().add_millis(1000));
    }

    #[test]
    fn age_from_clock() {
        let mut clock = FixedClock::new(Time::new(50, 0));
        let past = clock.now();
        clock.advance_millis(1_250);
        assert_eq!(age_with(&clock, past), 1_250_000);

        // Future instants still give a positive distance.
        assert_eq!(age_with(&clock, Time::new(52, 0)), 750_000);
    }

    #[test]
    fn age_right_away_is_small() {
        let now = SystemClock.now();
        let a = age(now);
        assert!((0..50_000).contains(&a), "{}", a);
    }

    fn time_strategy() -> impl Strategy<Value = Time> {
        (0u64..1 << 40, 0u32..1_000_000).prop_map(|(s, us)| Time::new(s, us))
    }

    proptest! {
        #[test]
        fn diff_symmetric_and_non_negative(a in time_strategy(), b in time_strategy()) {
            let d = diff_instants(a, b);
            prop_assert_eq!(d, diff_instants(b, a));
            prop_assert!(d >= 0);
            prop_assert_eq!(diff_instants(a, a), 0);
        }

        #[test]
        fn diff_matches_micros(a in time_strategy(), b in time_strategy()) {
            let expected = (a.as_micros() as i128 - b.as_micros() as i128).abs();
            prop_assert_eq!(diff_instants(a, b) as i128, expected);
        }

        #[test]
        fn compare_is_antisymmetric(a in time_strategy(), b in time_strategy()) {
            prop_assert_eq!(compare_instants(a, b), compare_instants(b, a).reverse());
        }

        #[test]
        fn add_then_diff(a in time_strategy(), ms in 0u64..1 << 30) {
            prop_assert_eq!(diff_instants(a.add_millis(ms), a), ms as i64 * 1000);
        }
    }
}
