//! Single-shot countdown for one presented exercise.
//!
//! ```text
//! Ready --start--> Counting --expiry--> Grace --2 ticks--> Completed
//!   |                 |                   |
//!   +-----------------+------cancel-------+--> Cancelled
//! ```
//!
//! `Completed` and `Cancelled` are terminal and mutually exclusive: the
//! grace delay is its own countdown on the same tick substrate, and
//! `cancel()` stops it, so a cancelled session can never report completion.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::countdown::{Countdown, Tick};
use crate::events::Event;
use crate::hooks::{chime_quietly, Chime};
use crate::reminder::Exercise;

/// Delay between the exercise countdown expiring and the completion signal.
pub const GRACE_SECS: u64 = 2;

/// Identifies one exercise presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(pub u64);

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Ready,
    Counting,
    Grace,
    Completed,
    Cancelled,
}

pub struct ExerciseSession {
    token: SessionToken,
    exercise: Exercise,
    state: SessionState,
    countdown: Countdown,
    grace: Countdown,
    chime: Box<dyn Chime>,
}

impl ExerciseSession {
    pub fn new(token: SessionToken, exercise: Exercise, chime: Box<dyn Chime>) -> Self {
        Self {
            token,
            exercise,
            state: SessionState::Ready,
            countdown: Countdown::new(),
            grace: Countdown::new(),
            chime,
        }
    }

    pub fn token(&self) -> SessionToken {
        self.token
    }

    pub fn exercise(&self) -> &Exercise {
        &self.exercise
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Seconds left on the exercise countdown (0 once it has expired).
    pub fn remaining_secs(&self) -> u64 {
        self.countdown.remaining_secs()
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, SessionState::Completed | SessionState::Cancelled)
    }

    pub fn snapshot(&self) -> Event {
        Event::SessionSnapshot {
            token: self.token,
            state: self.state,
            remaining_secs: self.countdown.remaining_secs(),
            at: Utc::now(),
        }
    }

    /// Begin the exercise countdown. Only valid from `Ready`.
    pub fn start(&mut self) -> Option<Event> {
        if self.state != SessionState::Ready {
            return None;
        }
        chime_quietly(self.chime.as_ref());
        self.state = SessionState::Counting;
        self.countdown.start(self.exercise.duration_secs);
        tracing::debug!(token = %self.token, exercise = %self.exercise.name, "exercise session started");
        Some(Event::SessionStarted {
            token: self.token,
            exercise: self.exercise.name.to_string(),
            duration_secs: self.exercise.duration_secs,
            at: Utc::now(),
        })
    }

    /// Call once per second.
    ///
    /// Yields `SessionExpired` when the exercise ends and `SessionCompleted`
    /// once the grace delay has passed.
    pub fn tick(&mut self) -> Option<Event> {
        match self.state {
            SessionState::Counting => match self.countdown.tick() {
                Tick::Expired { .. } => {
                    chime_quietly(self.chime.as_ref());
                    self.state = SessionState::Grace;
                    self.grace.start(GRACE_SECS);
                    Some(Event::SessionExpired {
                        token: self.token,
                        grace_secs: GRACE_SECS,
                        at: Utc::now(),
                    })
                }
                _ => None,
            },
            SessionState::Grace => match self.grace.tick() {
                Tick::Expired { .. } => {
                    self.state = SessionState::Completed;
                    tracing::debug!(token = %self.token, "exercise session completed");
                    Some(Event::SessionCompleted {
                        token: self.token,
                        at: Utc::now(),
                    })
                }
                _ => None,
            },
            _ => None,
        }
    }

    /// Dismiss early. Idempotent; no effect once completed.
    pub fn cancel(&mut self) -> Option<Event> {
        if self.is_finished() {
            return None;
        }
        let from = self.state;
        self.countdown.stop();
        self.grace.stop();
        self.state = SessionState::Cancelled;
        tracing::debug!(token = %self.token, ?from, "exercise session cancelled");
        Some(Event::SessionCancelled {
            token: self.token,
            state: from,
            at: Utc::now(),
        })
    }
}
