//! External collaborators consumed by the cycles.
//!
//! Chime and notification calls are fire-and-forget: a cycle logs the
//! returned [`HookError`] and carries on.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::{HookError, Result};

/// Plays the audible chime at phase changes and exercise start/end.
pub trait Chime {
    fn play(&self) -> Result<(), HookError>;
}

/// Posts a local notification.
pub trait Notifier {
    fn notify(&self, title: &str, body: &str) -> Result<(), HookError>;
}

/// Reports whether the host application currently has the user's attention.
pub trait Presence {
    fn is_foreground(&self) -> bool;
}

/// Persistent completed-exercise counter.
pub trait CounterStore {
    fn get(&self) -> Result<u64>;

    /// Add one and return the new value.
    fn increment(&mut self) -> Result<u64>;

    /// Reset to zero. Only used by explicit user action.
    fn clear(&mut self) -> Result<()>;
}

/// Chime that makes no sound.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentChime;

impl Chime for SilentChime {
    fn play(&self) -> Result<(), HookError> {
        Ok(())
    }
}

/// Notifier that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _title: &str, _body: &str) -> Result<(), HookError> {
        Ok(())
    }
}

/// Presence with a fixed answer.
#[derive(Debug, Clone, Copy)]
pub struct FixedPresence(pub bool);

impl Presence for FixedPresence {
    fn is_foreground(&self) -> bool {
        self.0
    }
}

/// In-memory counter. Clones share the same count.
#[derive(Debug, Default, Clone)]
pub struct MemoryCounter {
    count: Rc<Cell<u64>>,
}

impl MemoryCounter {
    pub fn new(start: u64) -> Self {
        Self {
            count: Rc::new(Cell::new(start)),
        }
    }
}

impl CounterStore for MemoryCounter {
    fn get(&self) -> Result<u64> {
        Ok(self.count.get())
    }

    fn increment(&mut self) -> Result<u64> {
        let next = self.count.get().saturating_add(1);
        self.count.set(next);
        Ok(next)
    }

    fn clear(&mut self) -> Result<()> {
        self.count.set(0);
        Ok(())
    }
}

/// Play a chime, logging and discarding any failure.
pub(crate) fn chime_quietly(chime: &dyn Chime) {
    if let Err(e) = chime.play() {
        tracing::debug!("chime skipped: {e}");
    }
}
