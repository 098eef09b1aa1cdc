use clap::Args;
use eyebreak_core::reminder::presets;
use eyebreak_core::{
    Config, Database, Event, ExerciseSession, IntervalPreset, ReminderCycle, ReminderHooks,
    SessionState,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::LoopArgs;
use crate::host::{self, format_time, Output};

#[derive(Args, Debug)]
pub struct RemindArgs {
    /// Interval preset index (see `eyebreak intervals`)
    #[arg(long)]
    pub interval: Option<usize>,
    /// Start each exercise as soon as it is shown instead of waiting for Enter
    #[arg(long)]
    pub auto_start: bool,
    #[command(flatten)]
    pub run: LoopArgs,
}

pub fn preset(
    args: &RemindArgs,
    config: &Config,
) -> Result<&'static IntervalPreset, Box<dyn std::error::Error>> {
    match args.interval {
        Some(index) => Ok(presets::preset(index)?),
        None => Ok(config.interval()),
    }
}

pub fn run(args: RemindArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let preset = preset(&args, &config)?;
    let hooks = ReminderHooks {
        counter: Box::new(Database::open()?),
        notifier: host::notifier(&config),
        presence: host::presence(&config),
    };
    let mut cycle = ReminderCycle::new(preset, hooks);
    let mut out = Output::new(args.run.json);
    // The presentation layer: at most one exercise on screen.
    let mut session: Option<ExerciseSession> = None;

    let runtime = super::runtime()?;
    runtime.block_on(async {
        let mut ticker = tokio::time::interval(args.run.period());
        ticker.tick().await;

        out.event(&cycle.start());
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);
        let mut stdin = BufReader::new(tokio::io::stdin()).lines();
        let mut stdin_open = true;
        let mut elapsed = 0u64;

        while !args.run.done(elapsed) {
            tokio::select! {
                _ = &mut ctrl_c => break,
                line = stdin.next_line(), if stdin_open => {
                    match line {
                        Ok(Some(line)) => on_line(&line, &mut cycle, &mut session, &mut out),
                        Ok(None) | Err(_) => stdin_open = false,
                    }
                }
                _ = ticker.tick() => {
                    elapsed += 1;
                    on_tick(&mut cycle, &mut session, &config, args.auto_start, &mut out);
                }
            }
        }

        if let Some(event) = session.as_mut().and_then(ExerciseSession::cancel) {
            out.event(&event);
        }
        if let Some(event) = cycle.stop() {
            out.event(&event);
        }
    });
    // The stdin reader blocks on a thread that cannot be cancelled.
    runtime.shutdown_background();
    Ok(())
}

/// Enter starts a shown exercise; Enter while it runs, or `s`, skips it.
fn on_line(
    line: &str,
    cycle: &mut ReminderCycle,
    session: &mut Option<ExerciseSession>,
    out: &mut Output,
) {
    let Some(s) = session.as_mut() else {
        return;
    };
    let skip = line.trim().eq_ignore_ascii_case("s");
    if !skip && s.state() == SessionState::Ready {
        if let Some(event) = s.start() {
            out.event(&event);
        }
        return;
    }

    if let Some(event) = s.cancel() {
        out.event(&event);
    }
    // Closing the sheet is what resumes the loop.
    let token = s.token();
    *session = None;
    if let Some(event) = cycle.exercise_session_ended(token) {
        out.event(&event);
    }
}

fn on_tick(
    cycle: &mut ReminderCycle,
    session: &mut Option<ExerciseSession>,
    config: &Config,
    auto_start: bool,
    out: &mut Output,
) {
    if let Some(s) = session.as_mut() {
        match s.tick() {
            Some(Event::SessionCompleted { token, at }) => {
                out.event(&Event::SessionCompleted { token, at });
                *session = None;
                if let Some(event) = cycle.exercise_session_ended(token) {
                    out.event(&event);
                }
            }
            Some(event) => out.event(&event),
            None => {}
        }
    } else if let Some(event) = cycle.tick() {
        out.event(&event);
        if let Event::ExercisePresented {
            token, exercise, ..
        } = event
        {
            let mut s = ExerciseSession::new(token, exercise, host::chime(config));
            if auto_start {
                if let Some(started) = s.start() {
                    out.event(&started);
                }
            }
            *session = Some(s);
        }
    }

    match session.as_ref() {
        Some(s) => {
            let text = match s.state() {
                SessionState::Ready => "   Press Enter to start".to_string(),
                SessionState::Counting => format!("   ⏱️  {}s", s.remaining_secs()),
                _ => "   ✅ Done!".to_string(),
            };
            out.progress(&s.snapshot(), &text);
        }
        None => out.progress(
            &cycle.snapshot(),
            &format!("Next exercise in: {}", format_time(cycle.remaining_secs())),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyebreak_core::{FixedPresence, MemoryCounter, NullNotifier, ReminderState};

    fn args(interval: Option<usize>) -> RemindArgs {
        RemindArgs {
            interval,
            auto_start: false,
            run: LoopArgs {
                json: true,
                tick_ms: 1,
                ticks: None,
            },
        }
    }

    fn quiet_cycle() -> ReminderCycle {
        ReminderCycle::new(
            &eyebreak_core::INTERVAL_PRESETS[0],
            ReminderHooks {
                counter: Box::new(MemoryCounter::new(0)),
                notifier: Box::new(NullNotifier),
                presence: Box::new(FixedPresence(true)),
            },
        )
    }

    fn quiet_config() -> Config {
        let mut config = Config::default();
        config.chime.enabled = false;
        config
    }

    #[test]
    fn explicit_interval_is_validated() {
        let config = Config::default();
        assert_eq!(preset(&args(Some(2)), &config).unwrap().label, "15 min");
        assert!(preset(&args(Some(8)), &config).is_err());
        assert_eq!(preset(&args(None), &config).unwrap().label, "10 sec (Test)");
    }

    #[test]
    fn auto_start_runs_session_and_resumes() {
        let config = quiet_config();
        let mut cycle = quiet_cycle();
        let mut session = None;
        let mut out = Output::new(true);
        cycle.start();

        for _ in 0..10 {
            on_tick(&mut cycle, &mut session, &config, true, &mut out);
        }
        assert_eq!(cycle.state(), ReminderState::Presenting);
        let s = session.as_ref().unwrap();
        assert_eq!(s.state(), SessionState::Counting);
        let duration = s.exercise().duration_secs;

        for _ in 0..duration + 2 {
            on_tick(&mut cycle, &mut session, &config, true, &mut out);
        }
        assert!(session.is_none());
        assert_eq!(cycle.state(), ReminderState::Waiting);
        assert_eq!(cycle.completed_count(), 1);
    }

    #[test]
    fn shown_exercise_waits_for_enter() {
        let config = quiet_config();
        let mut cycle = quiet_cycle();
        let mut session = None;
        let mut out = Output::new(true);
        cycle.start();

        for _ in 0..100 {
            on_tick(&mut cycle, &mut session, &config, false, &mut out);
        }
        assert_eq!(session.as_ref().unwrap().state(), SessionState::Ready);
        assert_eq!(cycle.state(), ReminderState::Presenting);

        on_line("", &mut cycle, &mut session, &mut out);
        assert_eq!(session.as_ref().unwrap().state(), SessionState::Counting);
    }

    #[test]
    fn second_enter_skips_without_completion() {
        let config = quiet_config();
        let mut cycle = quiet_cycle();
        let mut session = None;
        let mut out = Output::new(true);
        cycle.start();
        for _ in 0..10 {
            on_tick(&mut cycle, &mut session, &config, false, &mut out);
        }

        on_line("", &mut cycle, &mut session, &mut out);
        on_tick(&mut cycle, &mut session, &config, false, &mut out);
        on_line("", &mut cycle, &mut session, &mut out);
        assert!(session.is_none());
        assert_eq!(cycle.state(), ReminderState::Waiting);
        assert_eq!(cycle.remaining_secs(), 10);
    }

    #[test]
    fn skip_works_before_start() {
        let config = quiet_config();
        let mut cycle = quiet_cycle();
        let mut session = None;
        let mut out = Output::new(true);
        cycle.start();
        for _ in 0..10 {
            on_tick(&mut cycle, &mut session, &config, false, &mut out);
        }

        on_line("s", &mut cycle, &mut session, &mut out);
        assert!(session.is_none());
        assert_eq!(cycle.state(), ReminderState::Waiting);
        // A stray Enter with nothing on screen does nothing.
        on_line("", &mut cycle, &mut session, &mut out);
        assert_eq!(cycle.state(), ReminderState::Waiting);
    }
}
