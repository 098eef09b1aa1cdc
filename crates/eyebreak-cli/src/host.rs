//! Terminal implementations of the core collaborators, plus event output.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use eyebreak_core::storage::ChimeConfig;
use eyebreak_core::{
    Chime, Config, Event, FixedPresence, HookError, Notifier, NullNotifier, Presence, SilentChime,
};

/// Plays `sound_file` through an external player, or rings the terminal bell.
pub struct TerminalChime {
    player: String,
    sound_file: Option<PathBuf>,
}

impl TerminalChime {
    pub fn new(cfg: &ChimeConfig) -> Self {
        Self {
            player: cfg.player.clone(),
            sound_file: cfg.sound_file.as_ref().map(PathBuf::from),
        }
    }
}

impl Chime for TerminalChime {
    fn play(&self) -> Result<(), HookError> {
        let Some(file) = &self.sound_file else {
            // Bell goes to stderr so JSON on stdout stays clean.
            let mut err = std::io::stderr();
            let _ = err.write_all(b"\x07");
            let _ = err.flush();
            return Ok(());
        };
        if !file.exists() {
            return Err(HookError::ResourceMissing(file.display().to_string()));
        }
        let mut child = Command::new(&self.player)
            .arg(file)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| HookError::Unavailable {
                service: self.player.clone(),
                message: e.to_string(),
            })?;
        // Reap in the background; playback is fire-and-forget.
        std::thread::spawn(move || {
            let _ = child.wait();
        });
        Ok(())
    }
}

/// Desktop notifications via notify-rust.
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, body: &str) -> Result<(), HookError> {
        notify_rust::Notification::new()
            .summary(title)
            .body(body)
            .appname("eyebreak")
            .show()
            .map(|_| ())
            .map_err(|e| HookError::Unavailable {
                service: "notifications".into(),
                message: e.to_string(),
            })
    }
}

pub fn chime(cfg: &Config) -> Box<dyn Chime> {
    if cfg.chime.enabled {
        Box::new(TerminalChime::new(&cfg.chime))
    } else {
        Box::new(SilentChime)
    }
}

pub fn notifier(cfg: &Config) -> Box<dyn Notifier> {
    if cfg.notifications.enabled {
        Box::new(DesktopNotifier)
    } else {
        Box::new(NullNotifier)
    }
}

pub fn presence(cfg: &Config) -> Box<dyn Presence> {
    Box::new(FixedPresence(cfg.notifications.assume_foreground))
}

/// `MM:SS`
pub fn format_time(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Writes events either as JSON lines or as human-readable text.
pub struct Output {
    json: bool,
    status_shown: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self {
            json,
            status_shown: false,
        }
    }

    pub fn event(&mut self, event: &Event) {
        if self.json {
            match serde_json::to_string(event) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::error!("cannot serialize {}: {e}", event.kind()),
            }
            return;
        }
        self.end_status();
        if let Some(text) = describe(event) {
            println!("{text}");
        }
    }

    /// Per-tick rendering state: `snapshot` as a JSON line, or `text` on the
    /// status line.
    pub fn progress(&mut self, snapshot: &Event, text: &str) {
        if self.json {
            self.event(snapshot);
        } else {
            self.status(text);
        }
    }

    /// Overwrite the single status line. Text mode only.
    pub fn status(&mut self, text: &str) {
        if self.json {
            return;
        }
        let mut out = std::io::stdout();
        let _ = write!(out, "\r\x1b[2K{text}");
        let _ = out.flush();
        self.status_shown = true;
    }

    fn end_status(&mut self) {
        if self.status_shown {
            println!();
            self.status_shown = false;
        }
    }
}

fn describe(event: &Event) -> Option<String> {
    let text = match event {
        Event::LockStarted {
            focus_secs,
            break_secs,
            ..
        } => format!(
            "📵 Lock started: {} min focus / {} min break",
            focus_secs / 60,
            break_secs / 60
        ),
        Event::PhaseChanged {
            phase,
            duration_secs,
            ..
        } => format!("🔔 {phase:?} time: {}", format_time(*duration_secs)),
        Event::LockStopped { .. } => "Lock stopped.".into(),
        Event::ReminderStarted {
            interval,
            restarted: false,
            ..
        } => format!("🧘 Eye break reminders every {interval}"),
        Event::ReminderStarted { .. } => return None,
        Event::ExercisePresented {
            exercise,
            completed_count,
            ..
        } => format!(
            "\n👁️  {}\n   {}\n   ✅ Exercises Completed: {completed_count}\n   Press Enter to start, or type s and Enter to skip.",
            exercise.name, exercise.description
        ),
        Event::ReminderStopped { .. } => "Reminders stopped.".into(),
        Event::SessionStarted { duration_secs, .. } => {
            format!("   ⏱️  {duration_secs}s (press Enter to skip)")
        }
        Event::SessionExpired { .. } => "   ✅ Done! Returning to timer...".into(),
        Event::SessionCancelled { .. } => "   Skipped.".into(),
        Event::SessionCompleted { .. }
        | Event::LockSnapshot { .. }
        | Event::ReminderSnapshot { .. }
        | Event::SessionSnapshot { .. } => return None,
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_time_pads_minutes_and_seconds() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(65), "01:05");
        assert_eq!(format_time(2400), "40:00");
    }

    #[test]
    fn missing_sound_file_is_reported() {
        let chime = TerminalChime::new(&ChimeConfig {
            enabled: true,
            player: "paplay".into(),
            sound_file: Some("/definitely/not/here.wav".into()),
        });
        assert!(matches!(chime.play(), Err(HookError::ResourceMissing(_))));
    }

    #[test]
    fn snapshots_are_not_printed_as_text() {
        let event = Event::LockSnapshot {
            state: eyebreak_core::LockState::Idle,
            remaining_secs: 0,
            total_secs: 0,
            progress: 0.0,
            at: chrono::Utc::now(),
        };
        assert!(describe(&event).is_none());
    }
}
