//! The fixed catalog of eye exercises.

use std::borrow::Cow;

use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: Cow<'static, str>,
    pub description: Cow<'static, str>,
    pub duration_secs: u64,
    /// Illustration asset name. Empty means "no illustration".
    #[serde(default)]
    pub illustration: Cow<'static, str>,
}

impl Exercise {
    const fn builtin(
        name: &'static str,
        description: &'static str,
        duration_secs: u64,
        illustration: &'static str,
    ) -> Self {
        Self {
            name: Cow::Borrowed(name),
            description: Cow::Borrowed(description),
            duration_secs,
            illustration: Cow::Borrowed(illustration),
        }
    }

    pub fn illustration(&self) -> Option<&str> {
        if self.illustration.is_empty() {
            None
        } else {
            Some(&self.illustration)
        }
    }
}

pub static EXERCISES: [Exercise; 6] = [
    Exercise::builtin(
        "Palming",
        "Rub hands, cup over eyes gently and breathe deeply.",
        60,
        "palming",
    ),
    Exercise::builtin(
        "Blinking",
        "Close eyes gently, pause, then open. Blink consciously.",
        10,
        "blinking",
    ),
    Exercise::builtin(
        "Near and Far Focus",
        "Alternate focus from 10 inches to 20 feet every 15 seconds.",
        30,
        "nearandfarfocus",
    ),
    Exercise::builtin(
        "Figure Eight",
        "Trace a figure 8 with your eyes on the floor.",
        30,
        "figure8",
    ),
    Exercise::builtin(
        "Eye Movements",
        "Move eyes up/down then left/right 3 times.",
        20,
        "eyemovements",
    ),
    Exercise::builtin(
        "Focus Workout",
        "Track your finger close and far while focusing.",
        20,
        "focusworkout1",
    ),
];

/// Uniform pick with replacement.
pub fn pick<R: Rng + ?Sized>(rng: &mut R) -> &'static Exercise {
    &EXERCISES[rng.gen_range(0..EXERCISES.len())]
}
