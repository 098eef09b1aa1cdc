pub mod about;
pub mod catalog;
pub mod config;
pub mod lock;
pub mod remind;
pub mod stats;

use std::time::Duration;

use clap::Args;

/// Options shared by the foreground loops.
#[derive(Args, Debug, Clone)]
pub struct LoopArgs {
    /// Print events as JSON lines instead of text, with a snapshot per tick
    #[arg(long)]
    pub json: bool,
    /// Milliseconds per tick
    #[arg(long, default_value_t = 1000, hide = true)]
    pub tick_ms: u64,
    /// Stop after this many ticks
    #[arg(long, hide = true)]
    pub ticks: Option<u64>,
}

impl LoopArgs {
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }

    pub fn done(&self, elapsed: u64) -> bool {
        self.ticks.is_some_and(|max| elapsed >= max)
    }
}

/// The host loops are single-threaded: every tick and callback runs on one
/// current-thread runtime.
pub fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}
