use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::reminder::{Exercise, ReminderState};
use crate::timer::{LockState, Phase, SessionState, SessionToken};

/// Every state change in the system produces an Event.
/// The presentation layer renders them; the CLI can print them as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    LockStarted {
        focus_secs: u64,
        break_secs: u64,
        at: DateTime<Utc>,
    },
    /// A lock phase ran out and the next one was armed.
    PhaseChanged {
        phase: Phase,
        duration_secs: u64,
        focus_rounds: u64,
        at: DateTime<Utc>,
    },
    LockStopped {
        at: DateTime<Utc>,
    },
    /// Per-tick rendering state of the lock cycle.
    LockSnapshot {
        state: LockState,
        remaining_secs: u64,
        total_secs: u64,
        progress: f64,
        at: DateTime<Utc>,
    },
    /// Reminder loop armed, either by the user or after a finished exercise.
    ReminderStarted {
        interval: String,
        wait_secs: u64,
        restarted: bool,
        at: DateTime<Utc>,
    },
    ExercisePresented {
        token: SessionToken,
        exercise: Exercise,
        completed_count: u64,
        notified: bool,
        at: DateTime<Utc>,
    },
    ReminderStopped {
        at: DateTime<Utc>,
    },
    ReminderSnapshot {
        state: ReminderState,
        interval: String,
        remaining_secs: u64,
        completed_count: u64,
        at: DateTime<Utc>,
    },
    SessionStarted {
        token: SessionToken,
        exercise: String,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// Exercise countdown reached zero; completion follows after the grace delay.
    SessionExpired {
        token: SessionToken,
        grace_secs: u64,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        token: SessionToken,
        at: DateTime<Utc>,
    },
    SessionSnapshot {
        token: SessionToken,
        state: SessionState,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SessionCancelled {
        token: SessionToken,
        state: SessionState,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short machine name, matching the serde `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::LockStarted { .. } => "LockStarted",
            Event::PhaseChanged { .. } => "PhaseChanged",
            Event::LockStopped { .. } => "LockStopped",
            Event::LockSnapshot { .. } => "LockSnapshot",
            Event::ReminderStarted { .. } => "ReminderStarted",
            Event::ExercisePresented { .. } => "ExercisePresented",
            Event::ReminderStopped { .. } => "ReminderStopped",
            Event::ReminderSnapshot { .. } => "ReminderSnapshot",
            Event::SessionStarted { .. } => "SessionStarted",
            Event::SessionExpired { .. } => "SessionExpired",
            Event::SessionCompleted { .. } => "SessionCompleted",
            Event::SessionSnapshot { .. } => "SessionSnapshot",
            Event::SessionCancelled { .. } => "SessionCancelled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let event = Event::LockStopped { at: Utc::now() };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "LockStopped");
        assert_eq!(event.kind(), "LockStopped");
    }

    #[test]
    fn phase_changed_roundtrips() {
        let event = Event::PhaseChanged {
            phase: Phase::Break,
            duration_secs: 300,
            focus_rounds: 1,
            at: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"phase\":\"break\""));
        let back: Event = serde_json::from_str(&json).unwrap();
        assert!(matches!(
            back,
            Event::PhaseChanged {
                phase: Phase::Break,
                duration_secs: 300,
                ..
            }
        ));
    }
}
