//! Replay command implementation.

use super::output::{format_round, format_scenario, JsonReplay};
use super::{CliError, OutputFormat};
use connect_six::{GameRecord, Scenario};
use std::path::PathBuf;

/// Execute the replay command.
///
/// # Errors
///
/// Returns an error if the recording cannot be loaded or does not replay to
/// its recorded outcome.
pub(crate) fn execute(recording_path: PathBuf, format: OutputFormat) -> Result<(), CliError> {
    let record = GameRecord::load(&recording_path).map_err(|e| {
        CliError::new(format!("Failed to load recording {}: {e}", recording_path.display()))
    })?;
    let rounds = record.replay()?;

    match format {
        OutputFormat::Text => {
            let scenario = Scenario::generate(record.seed, record.player_hq)?;
            print!("{}", format_scenario(&scenario));
            for report in &rounds {
                println!();
                print!("{}", format_round(report));
            }
            if record.outcome.is_none() {
                println!("\nGame left unfinished after {} rounds", rounds.len());
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&JsonReplay::new(&record, &rounds))?);
        }
    }
    Ok(())
}
