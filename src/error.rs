//! Error types for game construction, the round engine and replays.

use thiserror::Error;

use crate::engine::Phase;
use crate::game::{CityIndex, CITY_COUNT};

/// Fatal problems with the initial city list or headquarters choice.
///
/// Raised only by [`WorldState::new`](crate::game::WorldState::new); no round
/// can run on a world that failed these checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    /// The map is a fixed line of six cities.
    #[error("expected exactly {expected} cities, got {0}", expected = CITY_COUNT)]
    WrongCityCount(usize),
    /// City names must be unique because commands address cities by name.
    #[error("duplicate city name: {0}")]
    DuplicateCityName(String),
    /// A headquarters index points past the end of the map.
    #[error("headquarters index {0} is out of range (0-{max})", max = CITY_COUNT - 1)]
    HeadquartersOutOfRange(CityIndex),
    /// Both factions picked the same city.
    #[error("both factions chose city {0} as headquarters")]
    SharedHeadquarters(CityIndex),
}

/// Misuse of the step-wise [`TurnEngine`](crate::engine::TurnEngine) API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A step was requested while the engine sat in a different phase.
    #[error("engine is in phase {actual:?}, expected {expected:?}")]
    OutOfPhase {
        /// Phase the requested step belongs to.
        expected: Phase,
        /// Phase the engine is actually in.
        actual: Phase,
    },
    /// A new round was requested after the game ended.
    #[error("the game is already over")]
    GameFinished,
}

/// Failures while saving, loading or re-simulating a recorded game.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// Reading or writing the record file failed.
    #[error("record I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The record file is not valid JSON for a [`GameRecord`](crate::replay::GameRecord).
    #[error("malformed record: {0}")]
    Json(#[from] serde_json::Error),
    /// The recorded seed and headquarters do not produce a valid world.
    #[error("recorded setup is invalid: {0}")]
    Setup(#[from] SetupError),
    /// Driving the engine failed (e.g. more rounds recorded than the game lasted).
    #[error("replay stopped: {0}")]
    Engine(#[from] EngineError),
    /// Re-simulation finished with a different outcome than the one recorded.
    #[error("replay diverged from the recorded outcome")]
    Diverged,
}
