use clap::Subcommand;
use eyebreak_core::{CounterStore, Database};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Show the number of exercises completed
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Reset the completed counter to zero
    Reset,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut db = Database::open()?;
    match action {
        StatsAction::Show { json } => {
            let completed = db.get()?;
            if json {
                println!("{}", serde_json::json!({ "completed_exercises": completed }));
            } else {
                println!("✅ Exercises Completed: {completed}");
            }
        }
        StatsAction::Reset => {
            db.clear()?;
            println!("counter reset");
        }
    }
    Ok(())
}
