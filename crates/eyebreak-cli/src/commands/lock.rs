use clap::Args;
use eyebreak_core::{Config, LockCycle, LockSettings};

use super::LoopArgs;
use crate::host::{self, format_time, Output};

#[derive(Args, Debug)]
pub struct LockArgs {
    /// Focus duration in minutes (10-90, step 5)
    #[arg(long = "focus")]
    pub focus_minutes: Option<u32>,
    /// Break duration in minutes (1-30)
    #[arg(long = "break")]
    pub break_minutes: Option<u32>,
    #[command(flatten)]
    pub run: LoopArgs,
}

/// Resolve durations: explicit flags are validated strictly, config values
/// are clamped.
pub fn settings(args: &LockArgs, config: &Config) -> Result<LockSettings, Box<dyn std::error::Error>> {
    let base = config.lock_settings();
    if args.focus_minutes.is_none() && args.break_minutes.is_none() {
        return Ok(base);
    }
    Ok(LockSettings::new(
        args.focus_minutes.unwrap_or(base.focus_minutes()),
        args.break_minutes.unwrap_or(base.break_minutes()),
    )?)
}

pub fn run(args: LockArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let settings = settings(&args, &config)?;
    let mut cycle = LockCycle::new(settings, host::chime(&config));
    let mut out = Output::new(args.run.json);

    super::runtime()?.block_on(async {
        let mut ticker = tokio::time::interval(args.run.period());
        // First tick of a tokio interval completes immediately.
        ticker.tick().await;

        out.event(&cycle.start());
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);
        let mut elapsed = 0u64;

        while !args.run.done(elapsed) {
            tokio::select! {
                _ = &mut ctrl_c => break,
                _ = ticker.tick() => {
                    elapsed += 1;
                    on_tick(&mut cycle, &mut out);
                }
            }
        }

        if let Some(event) = cycle.stop() {
            out.event(&event);
        }
    });
    Ok(())
}

fn on_tick(cycle: &mut LockCycle, out: &mut Output) {
    if let Some(event) = cycle.tick() {
        out.event(&event);
    }
    out.progress(
        &cycle.snapshot(),
        &format!(
            "{} Remaining: {}",
            cycle.state().label(),
            format_time(cycle.remaining_secs())
        ),
    );
}
