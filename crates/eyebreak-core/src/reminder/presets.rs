//! Reminder interval presets, shortest first.

use serde::Serialize;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IntervalPreset {
    pub label: &'static str,
    pub wait_secs: u64,
    pub exercise_secs: u64,
}

impl IntervalPreset {
    const fn new(label: &'static str, wait_secs: u64, exercise_secs: u64) -> Self {
        Self {
            label,
            wait_secs,
            exercise_secs,
        }
    }

    /// Picker text, e.g. `"15 min ⟶ 15 sec"`.
    pub fn picker_label(&self) -> String {
        format!("{} ⟶ {} sec", self.label, self.exercise_secs)
    }
}

pub static INTERVAL_PRESETS: [IntervalPreset; 8] = [
    IntervalPreset::new("10 sec (Test)", 10, 10),
    IntervalPreset::new("10 min", 600, 10),
    IntervalPreset::new("15 min", 900, 15),
    IntervalPreset::new("20 min", 1200, 20),
    IntervalPreset::new("25 min", 1500, 25),
    IntervalPreset::new("30 min", 1800, 30),
    IntervalPreset::new("35 min", 2100, 35),
    IntervalPreset::new("40 min", 2400, 40),
];

/// Look up a preset by picker index.
pub fn preset(index: usize) -> Result<&'static IntervalPreset, ValidationError> {
    INTERVAL_PRESETS
        .get(index)
        .ok_or(ValidationError::UnknownInterval {
            index,
            len: INTERVAL_PRESETS.len(),
        })
}
