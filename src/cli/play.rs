//! Play command implementation.

use super::input::{parse_line, Input, HELP};
use super::output::{format_outcome, format_round_end, format_world};
use super::CliError;
use connect_six::{GameConfig, GameRecord, Phase, Scenario, TurnEngine};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Options for an interactive game.
#[derive(Debug, Clone)]
pub(crate) struct PlayOptions {
    /// Setup seed.
    pub(crate) seed: u64,
    /// Player headquarters index.
    pub(crate) hq: usize,
    /// Rules in force.
    pub(crate) config: GameConfig,
    /// Where to save the recording when the session ends.
    pub(crate) save: Option<PathBuf>,
}

/// Execute the play command on stdin/stdout.
///
/// # Errors
///
/// Returns an error if setup fails or the terminal or save file cannot be
/// used.
pub(crate) fn execute(options: &PlayOptions) -> Result<(), CliError> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let record = run_session(options, stdin.lock(), stdout.lock())?;

    if let Some(path) = &options.save {
        record.save(path).map_err(|e| {
            CliError::new(format!("Failed to save recording {}: {e}", path.display()))
        })?;
        println!("Recording saved to: {}", path.display());
    }
    Ok(())
}

/// Run a game against the given input and output until it ends, the player
/// quits, or input runs out.
pub(crate) fn run_session(
    options: &PlayOptions,
    mut input: impl BufRead,
    mut out: impl Write,
) -> Result<GameRecord, CliError> {
    let world = Scenario::generate(options.seed, options.hq)?.into_world()?;
    let mut engine = TurnEngine::new(world, options.config);
    let city_names: Vec<String> = engine.state().cities().iter().map(|c| c.name.clone()).collect();

    writeln!(out, "Connect Six (seed: {})", options.seed)?;
    writeln!(out, "{HELP}")?;

    let mut line = String::new();
    'rounds: while !engine.is_game_over() {
        let income = engine.start_round()?;
        writeln!(out, "\n=== Round {} ===", engine.round())?;
        writeln!(out, "Income: you +{}, opponent +{}", income.player, income.npc)?;
        write!(out, "{}", format_world(&engine.snapshot()))?;

        while engine.phase() == Phase::PlayerDecision {
            write!(out, "> ")?;
            out.flush()?;
            line.clear();
            if input.read_line(&mut line)? == 0 {
                break 'rounds;
            }

            match parse_line(&line, &city_names) {
                Ok(Input::Command(command)) => {
                    let outcome = engine.submit(command)?;
                    writeln!(out, "{}", format_outcome(&outcome, &engine.snapshot()))?;
                }
                Ok(Input::Map) => write!(out, "{}", format_world(&engine.snapshot()))?,
                Ok(Input::Help) => writeln!(out, "{HELP}")?,
                Ok(Input::Quit) => break 'rounds,
                Err(e) => writeln!(out, "{e}")?,
            }
        }

        let report = engine.finish_round()?;
        write!(out, "{}", format_round_end(&report))?;
    }

    if engine.is_game_over() {
        write!(out, "{}", format_world(&engine.snapshot()))?;
    } else {
        writeln!(out, "\nGame left unfinished after {} rounds", completed_rounds(&engine))?;
    }

    Ok(GameRecord::from_engine(options.seed, options.hq, &engine))
}

fn completed_rounds(engine: &TurnEngine) -> u32 {
    if engine.phase() == Phase::RoundStart {
        engine.round()
    } else {
        engine.round().saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use connect_six::{Command, HqCaptureRule};
    use std::io::Cursor;

    fn commands_of(record: &GameRecord) -> Vec<&Command> {
        record.rounds.iter().flatten().collect()
    }

    fn options(config: GameConfig) -> PlayOptions {
        PlayOptions {
            seed: 12,
            hq: 0,
            config,
            save: None,
        }
    }

    #[test]
    fn test_quit_before_any_round_completes() {
        let mut out = Vec::new();
        let record =
            run_session(&options(GameConfig::default()), Cursor::new("map\nquit\n"), &mut out)
                .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("=== Round 1 ==="));
        assert!(text.contains("Game left unfinished after 0 rounds"));
        assert!(record.rounds.is_empty());
        assert_eq!(record.outcome, None);
    }

    #[test]
    fn test_bad_input_reported_and_game_continues() {
        let mut out = Vec::new();
        let record = run_session(
            &options(GameConfig::default()),
            Cursor::new("fly away\nbuy tank 1 Atlantis\nend\nquit\n"),
            &mut out,
        )
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("unknown command"));
        assert!(text.contains("No effect: there is no city named \"Atlantis\""));
        assert_eq!(record.rounds.len(), 1);
        assert_eq!(commands_of(&record).len(), 2);
    }

    #[test]
    fn test_legacy_game_ends_and_replays() {
        let config = GameConfig {
            hq_rule: HqCaptureRule::Legacy,
            ..GameConfig::default()
        };
        let mut out = Vec::new();
        let record = run_session(&options(config), Cursor::new("end\n"), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Game over in round 1: Opponent win"));
        assert!(record.outcome.is_some());
        assert_eq!(record.replay().unwrap().len(), 1);
    }

    #[test]
    fn test_end_of_input_stops_session() {
        let mut out = Vec::new();
        let record =
            run_session(&options(GameConfig::default()), Cursor::new(""), &mut out).unwrap();
        assert!(record.rounds.is_empty());
    }
}
