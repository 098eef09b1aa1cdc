//! Countdown driver.
//!
//! A tick-driven countdown with no internal thread: the host calls `tick()`
//! once per nominal second. Expiry is reported as [`Tick::Expired`] from the
//! tick that brings the counter to zero, and only from that tick. The owning
//! cycle reacts to it in the same call, which makes it the expiry callback.
//!
//! ```text
//! Stopped --start(d)--> Running --tick x d--> Stopped (Expired reported once)
//!    ^                     |
//!    +-------stop()--------+
//! ```

use serde::{Deserialize, Serialize};

/// Observable countdown state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CountdownState {
    pub remaining_secs: u64,
    pub running: bool,
}

/// Outcome of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The driver is not running; nothing happened.
    Idle,
    /// Decremented, still running.
    Running { remaining_secs: u64 },
    /// Reached zero on this tick. `run` identifies the run that expired.
    Expired { run: u64 },
}

impl Tick {
    pub fn is_expired(&self) -> bool {
        matches!(self, Tick::Expired { .. })
    }
}

#[derive(Debug, Clone, Default)]
pub struct Countdown {
    remaining_secs: u64,
    total_secs: u64,
    running: bool,
    /// Incremented by every `start`, so a superseded run can be told apart.
    run: u64,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> CountdownState {
        CountdownState {
            remaining_secs: self.remaining_secs,
            running: self.running,
        }
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Identifier of the current (or most recent) run.
    pub fn run(&self) -> u64 {
        self.run
    }

    /// 0.0 .. 1.0 progress within the current run.
    pub fn progress(&self) -> f64 {
        if self.total_secs == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_secs as f64 / self.total_secs as f64)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Arm the countdown for `duration_secs`, superseding any run in flight.
    ///
    /// A duration of zero expires on the first tick. Returns the new run id.
    pub fn start(&mut self, duration_secs: u64) -> u64 {
        self.stop();
        self.run = self.run.wrapping_add(1);
        self.total_secs = duration_secs;
        self.remaining_secs = duration_secs;
        self.running = true;
        self.run
    }

    /// Re-arm with a new duration. Same as [`Countdown::start`].
    pub fn reset(&mut self, duration_secs: u64) -> u64 {
        self.start(duration_secs)
    }

    /// Halt and zero the counter. Idempotent.
    pub fn stop(&mut self) {
        self.running = false;
        self.remaining_secs = 0;
    }

    /// Advance by one nominal second.
    pub fn tick(&mut self) -> Tick {
        if !self.running {
            return Tick::Idle;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.running = false;
            return Tick::Expired { run: self.run };
        }
        Tick::Running {
            remaining_secs: self.remaining_secs,
        }
    }
}
