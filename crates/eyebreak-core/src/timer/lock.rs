//! Lock mode: an unbounded focus/break cycle.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Focusing --expiry--> OnBreak --expiry--> Focusing ...
//!   ^                |                    |
//!   +------stop------+--------stop--------+
//! ```
//!
//! Every expiry plays the chime before the next phase is armed. A failing
//! chime never interrupts the cycle.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::countdown::{Countdown, Tick};
use crate::error::ValidationError;
use crate::events::Event;
use crate::hooks::{chime_quietly, Chime};

pub const FOCUS_MIN_MINUTES: u32 = 10;
pub const FOCUS_MAX_MINUTES: u32 = 90;
pub const FOCUS_STEP_MINUTES: u32 = 5;
pub const BREAK_MIN_MINUTES: u32 = 1;
pub const BREAK_MAX_MINUTES: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Focus,
    Break,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockState {
    Idle,
    Focusing,
    OnBreak,
}

impl LockState {
    pub fn phase(self) -> Option<Phase> {
        match self {
            LockState::Idle => None,
            LockState::Focusing => Some(Phase::Focus),
            LockState::OnBreak => Some(Phase::Break),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LockState::Idle => "Idle",
            LockState::Focusing => "Focus Time",
            LockState::OnBreak => "Break Time",
        }
    }
}

/// Validated focus/break durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockSettings {
    focus_minutes: u32,
    break_minutes: u32,
}

impl LockSettings {
    /// Build settings, rejecting anything outside the allowed ranges.
    pub fn new(focus_minutes: u32, break_minutes: u32) -> Result<Self, ValidationError> {
        Self::check_focus(focus_minutes)?;
        Self::check_break(break_minutes)?;
        Ok(Self {
            focus_minutes,
            break_minutes,
        })
    }

    pub fn check_focus(focus_minutes: u32) -> Result<(), ValidationError> {
        if !(FOCUS_MIN_MINUTES..=FOCUS_MAX_MINUTES).contains(&focus_minutes) {
            return Err(ValidationError::FocusOutOfRange {
                value: focus_minutes,
                min: FOCUS_MIN_MINUTES,
                max: FOCUS_MAX_MINUTES,
            });
        }
        if focus_minutes % FOCUS_STEP_MINUTES != 0 {
            return Err(ValidationError::FocusStep {
                value: focus_minutes,
                step: FOCUS_STEP_MINUTES,
            });
        }
        Ok(())
    }

    pub fn check_break(break_minutes: u32) -> Result<(), ValidationError> {
        if !(BREAK_MIN_MINUTES..=BREAK_MAX_MINUTES).contains(&break_minutes) {
            return Err(ValidationError::BreakOutOfRange {
                value: break_minutes,
                min: BREAK_MIN_MINUTES,
                max: BREAK_MAX_MINUTES,
            });
        }
        Ok(())
    }

    /// Snap arbitrary values onto the nearest valid settings.
    pub fn clamped(focus_minutes: u32, break_minutes: u32) -> Self {
        let focus = focus_minutes.clamp(FOCUS_MIN_MINUTES, FOCUS_MAX_MINUTES);
        // Round to the nearest step; the range bounds are themselves on-step.
        let focus = (focus + FOCUS_STEP_MINUTES / 2) / FOCUS_STEP_MINUTES * FOCUS_STEP_MINUTES;
        Self {
            focus_minutes: focus.min(FOCUS_MAX_MINUTES),
            break_minutes: break_minutes.clamp(BREAK_MIN_MINUTES, BREAK_MAX_MINUTES),
        }
    }

    pub fn focus_minutes(&self) -> u32 {
        self.focus_minutes
    }

    pub fn break_minutes(&self) -> u32 {
        self.break_minutes
    }

    pub fn focus_secs(&self) -> u64 {
        u64::from(self.focus_minutes) * 60
    }

    pub fn break_secs(&self) -> u64 {
        u64::from(self.break_minutes) * 60
    }
}

impl Default for LockSettings {
    fn default() -> Self {
        Self {
            focus_minutes: 30,
            break_minutes: 5,
        }
    }
}

pub struct LockCycle {
    settings: LockSettings,
    state: LockState,
    countdown: Countdown,
    /// Completed focus phases since the last start. Not persisted.
    focus_rounds: u64,
    chime: Box<dyn Chime>,
}

impl LockCycle {
    pub fn new(settings: LockSettings, chime: Box<dyn Chime>) -> Self {
        Self {
            settings,
            state: LockState::Idle,
            countdown: Countdown::new(),
            focus_rounds: 0,
            chime,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> LockState {
        self.state
    }

    pub fn remaining_secs(&self) -> u64 {
        self.countdown.remaining_secs()
    }

    pub fn settings(&self) -> LockSettings {
        self.settings
    }

    pub fn focus_rounds(&self) -> u64 {
        self.focus_rounds
    }

    pub fn snapshot(&self) -> Event {
        Event::LockSnapshot {
            state: self.state,
            remaining_secs: self.countdown.remaining_secs(),
            total_secs: self.countdown.total_secs(),
            progress: self.countdown.progress(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Change durations. Applies from the next armed phase.
    pub fn set_settings(&mut self, settings: LockSettings) {
        self.settings = settings;
    }

    /// (Re)start from a fresh focus phase.
    pub fn start(&mut self) -> Event {
        self.focus_rounds = 0;
        self.state = LockState::Focusing;
        self.countdown.start(self.settings.focus_secs());
        tracing::info!(
            focus_min = self.settings.focus_minutes,
            break_min = self.settings.break_minutes,
            "lock cycle started"
        );
        Event::LockStarted {
            focus_secs: self.settings.focus_secs(),
            break_secs: self.settings.break_secs(),
            at: Utc::now(),
        }
    }

    /// Returns `None` if the cycle was already idle.
    pub fn stop(&mut self) -> Option<Event> {
        self.countdown.stop();
        if self.state == LockState::Idle {
            return None;
        }
        self.state = LockState::Idle;
        tracing::info!("lock cycle stopped");
        Some(Event::LockStopped { at: Utc::now() })
    }

    /// Call once per second. Returns `Some(Event::PhaseChanged)` on a phase switch.
    pub fn tick(&mut self) -> Option<Event> {
        match self.countdown.tick() {
            Tick::Expired { .. } => Some(self.on_expired()),
            Tick::Idle | Tick::Running { .. } => None,
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn on_expired(&mut self) -> Event {
        chime_quietly(self.chime.as_ref());
        let (next, duration_secs) = match self.state {
            LockState::Focusing => {
                self.focus_rounds += 1;
                (LockState::OnBreak, self.settings.break_secs())
            }
            // Idle never has a running countdown, so treat it like a break end.
            LockState::OnBreak | LockState::Idle => {
                (LockState::Focusing, self.settings.focus_secs())
            }
        };
        self.state = next;
        self.countdown.start(duration_secs);
        tracing::debug!(state = ?next, duration_secs, "lock phase changed");
        Event::PhaseChanged {
            phase: next.phase().unwrap_or(Phase::Focus),
            duration_secs,
            focus_rounds: self.focus_rounds,
            at: Utc::now(),
        }
    }
}
