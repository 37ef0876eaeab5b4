//! Time sources and the cadences that replace the game's interval timers.

use crate::types::Millis;
use std::{cell::Cell, rc::Rc};

pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now(&self) -> Millis;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Millis {
        chrono::Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to. Clones share the same time,
/// so a test can keep a handle after giving one to the engine.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Millis>>,
}

impl ManualClock {
    pub fn starting_at(now: Millis) -> Self {
        Self { now: Rc::new(Cell::new(now)) }
    }

    pub fn set(&self, now: Millis) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Millis) -> Millis {
        let now = self.now.get() + by;
        self.now.set(now);
        now
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Millis {
        self.now.get()
    }
}

/// Fires at most once per `interval`, measured from the last time it fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    pub interval: Millis,
    last_fired:   Millis,
}

impl Cadence {
    pub fn new(interval: Millis, now: Millis) -> Self {
        Self { interval, last_fired: now }
    }

    pub fn is_due(&self, now: Millis) -> bool {
        now.saturating_sub(self.last_fired) >= self.interval
    }

    pub fn mark(&mut self, now: Millis) {
        self.last_fired = now;
    }
}
