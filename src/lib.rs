//! mdns-core holds the small primitives an mDNS / DNS-SD responder leans on
//! everywhere: comparing domain names, and scheduling jittered timers.
//!
//! It is Sans-IO and no_std. Nothing here opens a socket or reads the clock
//! behind your back.
//!
//! # Domain names
//!
//! Names are in presentation form: dot separated, with `\` escaping the
//! next byte. Comparison works on the escape-resolved bytes and ignores a
//! single trailing dot.
//!
//! ```
//! use mdns_core::{hash_name, names_equal, normalize};
//!
//! // Trailing dot or not, it's the same name.
//! assert!(names_equal(b"nugget.local", b"nugget.local."));
//! assert_eq!(hash_name(b"nugget.local"), hash_name(b"nugget.local."));
//!
//! // An escaped dot belongs to the label.
//! assert!(!names_equal(b"my.printer.local", b"my\\.printer.local"));
//!
//! // Normalized names always end with a dot.
//! assert_eq!(normalize(b"nugget.local"), b"nugget.local.");
//! ```
//!
//! [`DomainName`] wraps a borrowed name with the same equality, ordering and
//! hashing, so it can key a `HashMap` or `BTreeMap`. [`NameBuf`] is the
//! owned version, with an explicit bound on its length.
//!
//! # Time and jitter
//!
//! A [`Time`] is seconds plus microseconds since the Unix epoch. Multicast
//! responders must delay their packets by a random amount, so that hosts
//! answering the same query don't all answer at once. [`elapse_with`]
//! computes such a deadline from a [`Clock`] and a [`Jitter`] source.
//!
//! ```
//! use mdns_core::{age_with, diff_instants, elapse_with, Clock, FixedClock, Time};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut clock = FixedClock::new(Time::new(1_000, 0));
//! let mut rng = StdRng::seed_from_u64(1);
//!
//! // Probe again in 250ms, plus up to 100ms of jitter.
//! let deadline = elapse_with(&clock, &mut rng, 250, 100);
//! let wait = diff_instants(deadline, clock.now());
//! assert!((250_000..350_000).contains(&wait));
//!
//! clock.set(deadline);
//! assert_eq!(age_with(&clock, deadline), 0);
//! ```
//!
//! With **std**, [`elapse`] and [`age`] do the same on the system clock and
//! the thread-local random generator.
//!
//! # Features
//!
//! * **std** (default) system clock, thread-local jitter, logging via `log`.
//! * **alloc** (default) [`NameBuf`] on the heap, otherwise `heapless`.
//! * **defmt** logging via `defmt` when **std** is off.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![deny(missing_docs)]

#[cfg(feature = "_log")]
#[macro_use]
extern crate log;

#[cfg(all(feature = "defmt", not(feature = "_log")))]
#[macro_use]
extern crate defmt;

#[cfg(not(any(feature = "defmt", feature = "_log")))]
#[macro_use]
mod log_poly;

#[cfg(feature = "alloc")]
extern crate alloc;

mod vec;

mod name;
pub use name::{compare_names, hash_name, host_name, names_equal, normalize};
pub use name::{DomainName, NameBuf, NormalizedName};
pub use name::{DEFAULT_NAME_CAP, MAX_HASH_LEN, MAX_HOST_NAME_LEN};

mod time;
pub use time::{age_with, compare_instants, diff_instants, elapse_with, Time};

#[cfg(feature = "std")]
pub use time::{age, elapse};

mod clock;
pub use clock::{Clock, FixedClock, Jitter, NoJitter};

#[cfg(feature = "std")]
pub use clock::SystemClock;

#[cfg(all(feature = "std", test))]
mod test {
    use std::sync::LazyLock;

    pub fn init_test_log() {
        static INIT_LOG: LazyLock<()> = LazyLock::new(env_logger::init);
        *INIT_LOG
    }
}
