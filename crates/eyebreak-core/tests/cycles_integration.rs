//! Integration tests for the lock and reminder cycles.
//!
//! Drives the cycles the way a host loop does: one `tick()` per second,
//! with the presentation layer feeding exercise sessions back into the
//! reminder loop.

use eyebreak_core::{
    CounterStore, Database, Event, ExerciseSession, FixedPresence, LockCycle, LockSettings,
    LockState, MemoryCounter, NullNotifier, ReminderCycle, ReminderHooks, ReminderState,
    SessionToken, SilentChime, EXERCISES, INTERVAL_PRESETS,
};
use rand::SeedableRng;
use rand_pcg::Pcg64;

fn reminder(counter: Box<dyn CounterStore>, seed: u64) -> ReminderCycle {
    ReminderCycle::with_rng(
        &INTERVAL_PRESETS[0],
        ReminderHooks {
            counter,
            notifier: Box::new(NullNotifier),
            presence: Box::new(FixedPresence(true)),
        },
        Pcg64::seed_from_u64(seed),
    )
}

/// Tick the reminder until it presents, returning the presented session.
fn wait_for_exercise(cycle: &mut ReminderCycle, max_ticks: u64) -> ExerciseSession {
    for _ in 0..max_ticks {
        if let Some(Event::ExercisePresented {
            token, exercise, ..
        }) = cycle.tick()
        {
            return ExerciseSession::new(token, exercise, Box::new(SilentChime));
        }
    }
    panic!("no exercise presented within {max_ticks} ticks");
}

/// Run a session to its end, returning the completion token if any.
fn run_session(session: &mut ExerciseSession, max_ticks: u64) -> Option<SessionToken> {
    session.start();
    for _ in 0..max_ticks {
        if let Some(Event::SessionCompleted { token, .. }) = session.tick() {
            return Some(token);
        }
    }
    None
}

#[test]
fn lock_cycle_alternates_strictly() {
    let mut cycle = LockCycle::new(LockSettings::new(10, 3).unwrap(), Box::new(SilentChime));
    cycle.start();
    let mut visited = vec![cycle.state()];

    let pairs = 4;
    let total = pairs * (600 + 180);
    for _ in 0..total {
        if cycle.tick().is_some() {
            visited.push(cycle.state());
        }
    }

    // Start state plus 2N transitions; the last one lands back on Focusing.
    assert_eq!(visited.len() as u64, 2 * pairs + 1);
    for pair in visited.windows(2) {
        assert_ne!(pair[0], pair[1], "repeated state in {visited:?}");
    }
    assert_eq!(&visited[..4], &[
        LockState::Focusing,
        LockState::OnBreak,
        LockState::Focusing,
        LockState::OnBreak
    ]);
    assert_eq!(cycle.focus_rounds(), pairs);
}

#[test]
fn reminder_and_session_loop() {
    let counter = MemoryCounter::new(0);
    let mut cycle = reminder(Box::new(counter.clone()), 11);
    cycle.start();

    for round in 1..=5u64 {
        let mut session = wait_for_exercise(&mut cycle, 10);
        assert_eq!(cycle.state(), ReminderState::Presenting);
        assert!(EXERCISES.contains(session.exercise()));

        let duration = session.exercise().duration_secs;
        let token = run_session(&mut session, duration + 2).expect("session completed");
        assert!(cycle.exercise_session_ended(token).is_some());
        assert_eq!(cycle.state(), ReminderState::Waiting);
        assert_eq!(counter.get().unwrap(), round);
    }
}

#[test]
fn early_dismiss_sends_no_completion() {
    let mut cycle = reminder(Box::new(MemoryCounter::new(0)), 5);
    cycle.start();
    let mut session = wait_for_exercise(&mut cycle, 10);
    session.start();

    let duration = session.exercise().duration_secs;
    let mut signals = 0;
    for t in 0..duration * 3 {
        if t == duration - 1 {
            session.cancel();
        }
        if let Some(Event::SessionCompleted { token, .. }) = session.tick() {
            signals += 1;
            cycle.exercise_session_ended(token);
        }
    }

    assert_eq!(signals, 0);
    assert_eq!(cycle.state(), ReminderState::Presenting);

    // The presentation layer closes the sheet itself; only that resumes the loop.
    assert!(cycle.exercise_session_ended(session.token()).is_some());
    assert!(cycle.exercise_session_ended(session.token()).is_none());
}

#[test]
fn completion_after_stop_does_not_restart() {
    let mut cycle = reminder(Box::new(MemoryCounter::new(0)), 9);
    cycle.start();
    let mut session = wait_for_exercise(&mut cycle, 10);
    cycle.stop();

    let duration = session.exercise().duration_secs;
    let token = run_session(&mut session, duration + 2).expect("session completed");
    assert!(cycle.exercise_session_ended(token).is_none());
    assert_eq!(cycle.state(), ReminderState::Idle);
}

#[test]
fn completed_count_persists_across_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("eyebreak.db");

    {
        let mut cycle = reminder(Box::new(Database::open_at(&path).unwrap()), 1);
        cycle.start();
        let mut session = wait_for_exercise(&mut cycle, 10);
        let duration = session.exercise().duration_secs;
        let token = run_session(&mut session, duration + 2).unwrap();
        cycle.exercise_session_ended(token);
        wait_for_exercise(&mut cycle, 10);
        assert_eq!(cycle.completed_count(), 2);
    }

    let cycle = reminder(Box::new(Database::open_at(&path).unwrap()), 2);
    assert_eq!(cycle.completed_count(), 2);
}
