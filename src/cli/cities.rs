//! Cities command implementation: preview a scenario without playing it.

use super::output::format_scenario;
use super::{CliError, OutputFormat};
use connect_six::Scenario;

/// Execute the cities command.
///
/// # Errors
///
/// Returns an error if the headquarters index is out of range.
pub(crate) fn execute(seed: u64, hq: usize, format: OutputFormat) -> Result<(), CliError> {
    let scenario = Scenario::generate(seed, hq)?;
    match format {
        OutputFormat::Text => print!("{}", format_scenario(&scenario)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&scenario)?),
    }
    Ok(())
}
