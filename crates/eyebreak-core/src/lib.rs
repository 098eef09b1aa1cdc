//! # EyeBreak Core Library
//!
//! Core logic for EyeBreak, a screen-break helper that interrupts screen use
//! with timed eye exercises or a focus/break lock cycle. The CLI binary is a
//! thin terminal host over this library.
//!
//! ## Architecture
//!
//! - **Countdown**: a tick-driven countdown with no internal thread. The host
//!   calls `tick()` once per second; expiry is reported from the tick that
//!   reaches zero.
//! - **Lock cycle**: focus → break → focus … until stopped.
//! - **Reminder cycle**: wait → present a random exercise → wait again once
//!   the exercise session reports completion.
//! - **Exercise session**: countdown for one exercise plus a cancellable
//!   grace delay before completion is signalled.
//! - **Storage**: TOML configuration and a SQLite key-value store holding the
//!   completed-exercise counter.
//!
//! Side effects (chime, notifications, foreground query, counter) are
//! injected through the traits in [`hooks`].
//!
//! ## Key Components
//!
//! - [`Countdown`]: the shared countdown driver
//! - [`LockCycle`], [`ReminderCycle`], [`ExerciseSession`]: the state machines
//! - [`Event`]: everything the presentation layer renders
//! - [`Config`], [`Database`]: configuration and persistence

pub mod error;
pub mod events;
pub mod hooks;
pub mod reminder;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, DatabaseError, HookError, ValidationError};
pub use events::Event;
pub use hooks::{Chime, CounterStore, FixedPresence, MemoryCounter, Notifier, NullNotifier, Presence, SilentChime};
pub use reminder::{Exercise, IntervalPreset, ReminderCycle, ReminderHooks, ReminderState, EXERCISES, INTERVAL_PRESETS};
pub use storage::{Config, Database};
pub use timer::{
    Countdown, CountdownState, ExerciseSession, LockCycle, LockSettings, LockState, Phase,
    SessionState, SessionToken, Tick,
};
