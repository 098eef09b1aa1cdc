mod countdown;
mod lock;
mod session;

pub use countdown::{Countdown, CountdownState, Tick};
pub use lock::{
    LockCycle, LockSettings, LockState, Phase, BREAK_MAX_MINUTES, BREAK_MIN_MINUTES,
    FOCUS_MAX_MINUTES, FOCUS_MIN_MINUTES, FOCUS_STEP_MINUTES,
};
pub use session::{ExerciseSession, SessionState, SessionToken, GRACE_SECS};
