//! Game recording and replay.
//!
//! Because games are fully deterministic, a recording only needs:
//! - `seed` and `player_hq` - regenerate the starting scenario
//! - `config` - the rules in force
//! - `rounds` - the player's command batch for every completed round
//!
//! No state deltas are stored. Replaying re-runs every round from the start
//! and checks that the recomputed outcome matches the recorded one.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write as IoWrite};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::engine::{GameOver, Phase, RoundReport, TurnEngine};
use crate::error::ReplayError;
use crate::game::{CityIndex, Command};
use crate::setup::Scenario;

/// Minimal recording of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Setup seed.
    pub seed: u64,
    /// Headquarters the player chose.
    pub player_hq: CityIndex,
    /// Rules in force.
    pub config: GameConfig,
    /// Player commands, one batch per completed round.
    pub rounds: Vec<Vec<Command>>,
    /// How the game ended, if it did.
    pub outcome: Option<GameOver>,
}

impl GameRecord {
    /// Record the completed rounds of a game in progress or finished.
    ///
    /// A round still under way is left out.
    #[must_use]
    pub fn from_engine(seed: u64, player_hq: CityIndex, engine: &TurnEngine) -> Self {
        let mut rounds = engine.command_log().to_vec();
        if !matches!(engine.phase(), Phase::RoundStart | Phase::GameOver) {
            rounds.pop();
        }
        Self {
            seed,
            player_hq,
            config: *engine.config(),
            rounds,
            outcome: engine.outcome(),
        }
    }

    /// Rebuild the starting engine for this recording.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Setup`] if the recorded headquarters is invalid.
    pub fn start(&self) -> Result<TurnEngine, ReplayError> {
        let world = Scenario::generate(self.seed, self.player_hq)?.into_world()?;
        Ok(TurnEngine::new(world, self.config))
    }

    /// Re-run every recorded round.
    ///
    /// Returns the round reports in order.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Engine`] if a batch is recorded after the game
    /// ended, or [`ReplayError::Diverged`] if the recomputed outcome differs
    /// from the recorded one.
    pub fn replay(&self) -> Result<Vec<RoundReport>, ReplayError> {
        let mut engine = self.start()?;
        let mut reports = Vec::with_capacity(self.rounds.len());
        for batch in &self.rounds {
            reports.push(engine.play_round(batch.iter().cloned())?);
        }

        if engine.outcome() != self.outcome {
            tracing::warn!(
                recorded = ?self.outcome,
                recomputed = ?engine.outcome(),
                "replay diverged"
            );
            return Err(ReplayError::Diverged);
        }
        Ok(reports)
    }

    /// Save the recording as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ReplayError> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Load a recording saved by [`GameRecord::save`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a recording.
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}
