//! Game configuration.

use serde::{Deserialize, Serialize};

/// How the end of combat decides that a headquarters has fallen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HqCaptureRule {
    /// A headquarters falls when, after combat, the opposing garrison there
    /// outnumbers the defender's remaining units.
    #[default]
    Contested,
    /// The player's headquarters is flagged as captured after every combat
    /// phase, whatever happened, so every game ends after one round with
    /// the opponent winning.
    Legacy,
}

/// Rules knobs for a game. Recorded alongside replays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Headquarters capture rule.
    pub hq_rule: HqCaptureRule,
    /// Require player `Move` commands to target an adjacent city. The
    /// opponent always moves to neighbors; by default the player does not
    /// have to.
    pub player_moves_need_adjacency: bool,
    /// End the game without a winner after this many rounds.
    pub max_rounds: Option<u32>,
}
