//! Exercise mode: wait, present a random exercise, wait again.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Waiting --expiry--> Presenting --session ended(token)--> Waiting ...
//!   ^                |                    |
//!   +------stop------+--------stop--------+
//! ```
//!
//! No countdown runs while an exercise is presented. The loop resumes only
//! when the presentation layer reports the matching [`SessionToken`], and
//! only once per token.

use chrono::Utc;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

use super::catalog;
use super::presets::{self, IntervalPreset};
use crate::error::ValidationError;
use crate::events::Event;
use crate::hooks::{CounterStore, Notifier, Presence};
use crate::timer::{Countdown, SessionToken, Tick};

pub const NOTIFICATION_TITLE: &str = "Eye Exercise Time!";
pub const NOTIFICATION_BODY: &str = "Open the app to complete your eye break exercise.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderState {
    Idle,
    Waiting,
    Presenting,
}

/// Collaborators the reminder loop talks to.
pub struct ReminderHooks {
    pub counter: Box<dyn CounterStore>,
    pub notifier: Box<dyn Notifier>,
    pub presence: Box<dyn Presence>,
}

pub struct ReminderCycle {
    /// Preset used by the next start or restart.
    selected: &'static IntervalPreset,
    /// Preset the current wait was armed with.
    active: &'static IntervalPreset,
    state: ReminderState,
    countdown: Countdown,
    presenting: Option<SessionToken>,
    next_token: u64,
    completed: u64,
    hooks: ReminderHooks,
    rng: Box<dyn RngCore>,
}

impl ReminderCycle {
    pub fn new(selected: &'static IntervalPreset, hooks: ReminderHooks) -> Self {
        Self::with_rng(selected, hooks, Pcg64::from_entropy())
    }

    /// Same as [`ReminderCycle::new`] with a caller-supplied RNG.
    pub fn with_rng(
        selected: &'static IntervalPreset,
        hooks: ReminderHooks,
        rng: impl RngCore + 'static,
    ) -> Self {
        let completed = match hooks.counter.get() {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!("could not read completed count, starting from 0: {e}");
                0
            }
        };
        Self {
            selected,
            active: selected,
            state: ReminderState::Idle,
            countdown: Countdown::new(),
            presenting: None,
            next_token: 0,
            completed,
            hooks,
            rng: Box::new(rng),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> ReminderState {
        self.state
    }

    pub fn selected(&self) -> &'static IntervalPreset {
        self.selected
    }

    pub fn active(&self) -> &'static IntervalPreset {
        self.active
    }

    pub fn remaining_secs(&self) -> u64 {
        self.countdown.remaining_secs()
    }

    pub fn completed_count(&self) -> u64 {
        self.completed
    }

    pub fn snapshot(&self) -> Event {
        Event::ReminderSnapshot {
            state: self.state,
            interval: self.active.label.to_string(),
            remaining_secs: self.countdown.remaining_secs(),
            completed_count: self.completed,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Pick the preset for the next start or restart. A running wait keeps
    /// its current duration.
    pub fn select_index(&mut self, index: usize) -> Result<(), ValidationError> {
        self.selected = presets::preset(index)?;
        Ok(())
    }

    pub fn start(&mut self) -> Event {
        self.arm(false)
    }

    /// Returns `None` if the cycle was already idle.
    pub fn stop(&mut self) -> Option<Event> {
        self.countdown.stop();
        self.presenting = None;
        if self.state == ReminderState::Idle {
            return None;
        }
        self.state = ReminderState::Idle;
        tracing::info!("reminder cycle stopped");
        Some(Event::ReminderStopped { at: Utc::now() })
    }

    /// Call once per second. Returns `Some(Event::ExercisePresented)` when
    /// the wait runs out.
    pub fn tick(&mut self) -> Option<Event> {
        match self.countdown.tick() {
            Tick::Expired { .. } if self.state == ReminderState::Waiting => Some(self.trigger()),
            _ => None,
        }
    }

    /// Completion signal from the presentation layer.
    ///
    /// Restarts the wait if `token` is the exercise currently presented.
    /// Stale, repeated, or post-stop signals are ignored.
    pub fn exercise_session_ended(&mut self, token: SessionToken) -> Option<Event> {
        if self.state != ReminderState::Presenting || self.presenting != Some(token) {
            tracing::debug!(%token, state = ?self.state, "ignoring session end");
            return None;
        }
        Some(self.arm(true))
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn arm(&mut self, restarted: bool) -> Event {
        self.presenting = None;
        self.active = self.selected;
        self.state = ReminderState::Waiting;
        self.countdown.start(self.active.wait_secs);
        tracing::info!(interval = self.active.label, restarted, "reminder armed");
        Event::ReminderStarted {
            interval: self.active.label.to_string(),
            wait_secs: self.active.wait_secs,
            restarted,
            at: Utc::now(),
        }
    }

    fn trigger(&mut self) -> Event {
        let exercise = catalog::pick(&mut *self.rng).clone();

        self.completed = match self.hooks.counter.increment() {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!("could not persist completed count: {e}");
                self.completed.saturating_add(1)
            }
        };

        self.next_token += 1;
        let token = SessionToken(self.next_token);
        self.presenting = Some(token);
        self.state = ReminderState::Presenting;

        let notified = if self.hooks.presence.is_foreground() {
            false
        } else {
            match self
                .hooks
                .notifier
                .notify(NOTIFICATION_TITLE, NOTIFICATION_BODY)
            {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("break notification not delivered: {e}");
                    false
                }
            }
        };

        tracing::info!(%token, exercise = %exercise.name, completed = self.completed, "exercise presented");
        Event::ExercisePresented {
            token,
            exercise,
            completed_count: self.completed,
            notified,
            at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, HookError, Result};
    use crate::hooks::{FixedPresence, MemoryCounter, NullNotifier};
    use crate::reminder::INTERVAL_PRESETS;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct RecordingNotifier(Rc<RefCell<Vec<(String, String)>>>);

    impl Notifier for RecordingNotifier {
        fn notify(&self, title: &str, body: &str) -> Result<(), HookError> {
            self.0.borrow_mut().push((title.into(), body.into()));
            Ok(())
        }
    }

    struct DownNotifier;

    impl Notifier for DownNotifier {
        fn notify(&self, _: &str, _: &str) -> Result<(), HookError> {
            Err(HookError::Unavailable {
                service: "notifications".into(),
                message: "no daemon".into(),
            })
        }
    }

    struct BrokenCounter;

    impl CounterStore for BrokenCounter {
        fn get(&self) -> Result<u64> {
            Err(CoreError::Custom("disk gone".into()))
        }
        fn increment(&mut self) -> Result<u64> {
            Err(CoreError::Custom("disk gone".into()))
        }
        fn clear(&mut self) -> Result<()> {
            Ok(())
        }
    }

    fn hooks(counter: MemoryCounter, foreground: bool) -> ReminderHooks {
        ReminderHooks {
            counter: Box::new(counter),
            notifier: Box::new(NullNotifier),
            presence: Box::new(FixedPresence(foreground)),
        }
    }

    fn cycle(index: usize, counter: MemoryCounter) -> ReminderCycle {
        ReminderCycle::with_rng(
            &INTERVAL_PRESETS[index],
            hooks(counter, true),
            Pcg64::seed_from_u64(7),
        )
    }

    fn advance(c: &mut ReminderCycle, ticks: u64) -> Vec<Event> {
        (0..ticks).filter_map(|_| c.tick()).collect()
    }

    fn presented_token(event: &Event) -> SessionToken {
        match event {
            Event::ExercisePresented { token, .. } => *token,
            other => panic!("Expected ExercisePresented, got {other:?}"),
        }
    }

    #[test]
    fn test_preset_presents_after_ten_ticks() {
        let counter = MemoryCounter::new(0);
        let mut c = cycle(0, counter.clone());
        c.start();
        assert_eq!(c.state(), ReminderState::Waiting);
        assert!(advance(&mut c, 9).is_empty());
        let events = advance(&mut c, 1);
        assert_eq!(events.len(), 1);
        match &events[0] {
            Event::ExercisePresented {
                exercise,
                completed_count,
                ..
            } => {
                assert!(catalog::EXERCISES.contains(exercise));
                assert_eq!(*completed_count, 1);
            }
            other => panic!("Expected ExercisePresented, got {other:?}"),
        }
        assert_eq!(counter.get().unwrap(), 1);
        assert_eq!(c.state(), ReminderState::Presenting);
    }

    #[test]
    fn paused_while_presenting() {
        let mut c = cycle(0, MemoryCounter::new(0));
        c.start();
        advance(&mut c, 10);
        assert!(advance(&mut c, 1_000).is_empty());
        assert_eq!(c.completed_count(), 1);
        assert_eq!(c.remaining_secs(), 0);
    }

    #[test]
    fn session_end_restarts_exactly_once() {
        let mut c = cycle(0, MemoryCounter::new(0));
        c.start();
        let token = presented_token(&advance(&mut c, 10)[0]);
        match c.exercise_session_ended(token) {
            Some(Event::ReminderStarted {
                restarted, wait_secs, ..
            }) => {
                assert!(restarted);
                assert_eq!(wait_secs, 10);
            }
            other => panic!("Expected ReminderStarted, got {other:?}"),
        }
        assert_eq!(c.state(), ReminderState::Waiting);
        assert!(c.exercise_session_ended(token).is_none());
        assert_eq!(c.remaining_secs(), 10);
    }

    #[test]
    fn stale_token_is_ignored() {
        let mut c = cycle(0, MemoryCounter::new(0));
        c.start();
        let first = presented_token(&advance(&mut c, 10)[0]);
        c.exercise_session_ended(first);
        let second = presented_token(&advance(&mut c, 10)[0]);
        assert_ne!(first, second);
        assert!(c.exercise_session_ended(first).is_none());
        assert_eq!(c.state(), ReminderState::Presenting);
        assert!(c.exercise_session_ended(second).is_some());
    }

    #[test]
    fn stop_during_presentation_blocks_restart() {
        let mut c = cycle(0, MemoryCounter::new(0));
        c.start();
        let token = presented_token(&advance(&mut c, 10)[0]);
        assert!(c.stop().is_some());
        assert!(c.exercise_session_ended(token).is_none());
        assert_eq!(c.state(), ReminderState::Idle);
        assert!(advance(&mut c, 100).is_empty());
    }

    #[test]
    fn count_increases_by_one_per_trigger() {
        let counter = MemoryCounter::new(41);
        let mut c = cycle(0, counter.clone());
        assert_eq!(c.completed_count(), 41);
        c.start();
        for expected in 42..52 {
            let token = presented_token(&advance(&mut c, 10)[0]);
            assert_eq!(c.completed_count(), expected);
            c.exercise_session_ended(token);
        }
        assert_eq!(counter.get().unwrap(), 51);
    }

    #[test]
    fn interval_change_applies_on_restart_only() {
        let mut c = cycle(1, MemoryCounter::new(0));
        c.start();
        advance(&mut c, 100);
        c.select_index(0).unwrap();
        assert_eq!(c.remaining_secs(), 500);
        assert_eq!(c.active().label, "10 min");
        let events = advance(&mut c, 500);
        let token = presented_token(&events[0]);
        c.exercise_session_ended(token);
        assert_eq!(c.active().label, "10 sec (Test)");
        assert_eq!(c.remaining_secs(), 10);
    }

    #[test]
    fn snapshot_reports_wait_and_count() {
        let mut c = cycle(1, MemoryCounter::new(3));
        c.start();
        advance(&mut c, 25);
        match c.snapshot() {
            Event::ReminderSnapshot {
                state,
                interval,
                remaining_secs,
                completed_count,
                ..
            } => {
                assert_eq!(state, ReminderState::Waiting);
                assert_eq!(interval, "10 min");
                assert_eq!(remaining_secs, 575);
                assert_eq!(completed_count, 3);
            }
            other => panic!("Expected ReminderSnapshot, got {other:?}"),
        }
        c.stop();
        assert!(matches!(
            c.snapshot(),
            Event::ReminderSnapshot {
                state: ReminderState::Idle,
                remaining_secs: 0,
                ..
            }
        ));
    }

    #[test]
    fn select_index_rejects_unknown() {
        let mut c = cycle(0, MemoryCounter::new(0));
        assert!(c.select_index(8).is_err());
        assert_eq!(c.selected().label, "10 sec (Test)");
    }

    #[test]
    fn notifies_only_in_background() {
        let notes = RecordingNotifier::default();
        let mut c = ReminderCycle::with_rng(
            &INTERVAL_PRESETS[0],
            ReminderHooks {
                counter: Box::new(MemoryCounter::new(0)),
                notifier: Box::new(notes.clone()),
                presence: Box::new(FixedPresence(false)),
            },
            Pcg64::seed_from_u64(1),
        );
        c.start();
        let events = advance(&mut c, 10);
        assert!(matches!(events[0], Event::ExercisePresented { notified: true, .. }));
        assert_eq!(
            notes.0.borrow().as_slice(),
            &[(NOTIFICATION_TITLE.to_string(), NOTIFICATION_BODY.to_string())]
        );

        let mut fg = cycle(0, MemoryCounter::new(0));
        fg.start();
        let events = advance(&mut fg, 10);
        assert!(matches!(events[0], Event::ExercisePresented { notified: false, .. }));
    }

    #[test]
    fn failing_collaborators_do_not_break_the_loop() {
        let mut c = ReminderCycle::with_rng(
            &INTERVAL_PRESETS[0],
            ReminderHooks {
                counter: Box::new(BrokenCounter),
                notifier: Box::new(DownNotifier),
                presence: Box::new(FixedPresence(false)),
            },
            Pcg64::seed_from_u64(3),
        );
        c.start();
        let token = presented_token(&advance(&mut c, 10)[0]);
        assert_eq!(c.completed_count(), 1);
        assert!(c.exercise_session_ended(token).is_some());
        advance(&mut c, 10);
        assert_eq!(c.completed_count(), 2);
    }
}
