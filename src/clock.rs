//! Injectable wall clock. A first-class parameter rather than a global, so
//! that sealing and timestamping are deterministic under test and so
//! embedded hosts without a wall clock can supply their own source.

/// A monotonic-enough wall clock returning signed milliseconds since epoch.
///
/// One method, by design (see spec §9: "model them as small interfaces").
pub trait Clock {
    fn now_millis(&self) -> i64;
}

/// The default clock, backed by [`std::time::SystemTime`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_millis() as i64,
            Err(e) => -(e.duration().as_millis() as i64),
        }
    }
}

/// A deterministic clock for tests: starts at a fixed instant and advances
/// by a fixed step on every read, so a sequence of operations produces
/// predictable, strictly increasing timestamps.
pub struct FakeClock {
    current: std::cell::Cell<i64>,
    step_millis: i64,
}

impl FakeClock {
    pub fn new(start_millis: i64, step_millis: i64) -> Self {
        Self {
            current: std::cell::Cell::new(start_millis),
            step_millis,
        }
    }
}

impl Clock for FakeClock {
    fn now_millis(&self) -> i64 {
        let value = self.current.get();
        self.current.set(value + self.step_millis);
        value
    }
}
