// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Connect Six: a deterministic two-faction city conquest game.
//!
//! Six cities sit on a line. The player and a scripted opponent each hold a
//! headquarters, earn income from the cities they control, buy soldiers and
//! tanks, and push garrisons into neighboring cities. The game ends when a
//! headquarters falls.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   CLI (play / replay / cities)      │
//! ├─────────────────────────────────────┤
//! │   TurnEngine (phase state machine)  │
//! ├─────────────────────────────────────┤
//! │   Game rules (economy, commands,    │
//! │   opponent, combat)                 │
//! ├─────────────────────────────────────┤
//! │   WorldState (cities, factions)     │
//! └─────────────────────────────────────┘
//! ```
//!
//! Only [`setup`] draws random numbers, from an explicit seed. Everything
//! downstream is a pure function of the starting world and the player's
//! commands, which is what makes [`replay`] possible.

pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod replay;
pub mod setup;

#[cfg(test)]
pub(crate) mod testutil;

pub use config::{GameConfig, HqCaptureRule};
pub use engine::{GameOver, GameOverReason, Phase, RoundReport, TurnEngine};
pub use error::{EngineError, ReplayError, SetupError};

// Re-export key game types at crate root for convenience
pub use game::{City, Command, CommandRejection, FactionId, Garrison, UnitKind, WorldSnapshot, WorldState};
pub use replay::GameRecord;
pub use setup::Scenario;
