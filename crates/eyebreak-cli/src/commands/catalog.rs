use eyebreak_core::{EXERCISES, INTERVAL_PRESETS};

pub fn run_exercises(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(&EXERCISES)?);
        return Ok(());
    }
    for (i, exercise) in EXERCISES.iter().enumerate() {
        println!("{i}. {} ({}s)", exercise.name, exercise.duration_secs);
        println!("   {}", exercise.description);
    }
    Ok(())
}

pub fn run_intervals(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(&INTERVAL_PRESETS)?);
        return Ok(());
    }
    for (i, preset) in INTERVAL_PRESETS.iter().enumerate() {
        println!("{i}. {}", preset.picker_label());
    }
    Ok(())
}
