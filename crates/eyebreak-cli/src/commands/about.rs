use clap::ValueEnum;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    /// Why eye exercises matter
    Exercises,
    /// How to keep other apps out of the way during a lock session
    Lock,
}

const EXERCISES: &str = "\
🧘 Eye Break Exercises

Why Eye Exercises Matter
  • Helps prevent eye strain and fatigue from screen time.
  • Supports healthy eye focusing and tear production.
  • Relaxes muscles and reduces myopia risk.
  • Encourages better screen habits.

🔔 Turn on notifications so eyebreak can remind you to take breaks:
   eyebreak config set notifications.enabled true";

const LOCK: &str = "\
🔒 Lock yourself in

eyebreak lock alternates focus and break phases until Ctrl+C. To keep other
apps out of the way on an iPhone or iPad, enable Guided Access:
  1. Open iOS Settings
  2. Go to Accessibility → Guided Access
  3. Turn it ON and set a passcode
  4. Triple-click the Side/Power button while in the app
  5. Tap Start in top-right

You can now work distraction-free during your session.";

pub fn text(topic: Topic) -> &'static str {
    match topic {
        Topic::Exercises => EXERCISES,
        Topic::Lock => LOCK,
    }
}

pub fn run(topic: Option<Topic>) -> Result<(), Box<dyn std::error::Error>> {
    match topic {
        Some(topic) => println!("{}", text(topic)),
        None => println!("{}\n\n{}", EXERCISES, LOCK),
    }
    Ok(())
}
