use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod host;

#[derive(Parser)]
#[command(name = "eyebreak", version, about = "Eye break reminders and focus lock timer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the focus/break lock cycle until Ctrl+C
    Lock(commands::lock::LockArgs),
    /// Run eye exercise reminders until Ctrl+C
    Remind(commands::remind::RemindArgs),
    /// List the eye exercises
    Exercises {
        #[arg(long)]
        json: bool,
    },
    /// List the reminder interval presets
    Intervals {
        #[arg(long)]
        json: bool,
    },
    /// Completed exercise statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Why eye breaks help, and how to lock other apps away
    About {
        #[arg(value_enum)]
        topic: Option<commands::about::Topic>,
    },
    /// Print a shell completion script
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("EYEBREAK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Lock(args) => commands::lock::run(args),
        Commands::Remind(args) => commands::remind::run(args),
        Commands::Exercises { json } => commands::catalog::run_exercises(json),
        Commands::Intervals { json } => commands::catalog::run_intervals(json),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::About { topic } => commands::about::run(topic),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "eyebreak", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
