pub mod catalog;
mod cycle;
pub mod presets;

pub use catalog::{Exercise, EXERCISES};
pub use cycle::{ReminderCycle, ReminderHooks, ReminderState, NOTIFICATION_BODY, NOTIFICATION_TITLE};
pub use presets::{IntervalPreset, INTERVAL_PRESETS};
