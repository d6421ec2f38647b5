//! Prints the schedule an mDNS responder would follow when claiming a name:
//! three probes 250ms apart, each delayed by up to 250ms of jitter, then
//! announcements with doubling intervals.
//!
//! cargo run --example retransmit -- nugget.local

use std::thread;
use std::time::Duration;

use mdns_core::{age, diff_instants, elapse, Clock, NameBuf, SystemClock, Time};

const PROBE_COUNT: u32 = 3;
const PROBE_INTERVAL: u32 = 250;
const PROBE_JITTER: u32 = 250;
const ANNOUNCE_COUNT: u32 = 3;

fn main() {
    env_logger::init();

    let arg = std::env::args().nth(1).unwrap_or_else(|| "nugget.local".into());
    let name: NameBuf = match NameBuf::new(arg.as_bytes()) {
        Some(v) => v,
        None => {
            eprintln!("Name too long: {}", arg);
            return;
        }
    };

    let start = SystemClock.now();
    println!("Claiming {} at {}", name, start);

    let mut deadline = elapse(0, PROBE_JITTER);
    for probe in 0..PROBE_COUNT {
        wait_until(deadline);
        println!("  probe {} at +{}ms", probe + 1, age(start) / 1000);
        deadline = elapse(PROBE_INTERVAL, 0);
    }

    let mut interval = 1000;
    for announce in 0..ANNOUNCE_COUNT {
        wait_until(deadline);
        println!("  announce {} at +{}ms", announce + 1, age(start) / 1000);
        deadline = elapse(interval, 0);
        interval *= 2;
    }
}

fn wait_until(deadline: Time) {
    let now = SystemClock.now();
    if deadline > now {
        let us = diff_instants(deadline, now) as u64;
        thread::sleep(Duration::from_micros(us));
    }
}
