//! Faction state management.

use serde::{Deserialize, Serialize};

use crate::game::CityIndex;

/// The two contesting parties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactionId {
    /// The human-controlled faction.
    Player,
    /// The scripted opponent.
    Npc,
}

impl FactionId {
    /// The other faction.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            FactionId::Player => FactionId::Npc,
            FactionId::Npc => FactionId::Player,
        }
    }

    /// Both factions, player first.
    pub const ALL: [FactionId; 2] = [FactionId::Player, FactionId::Npc];
}

/// State for a single faction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faction {
    /// Which faction this is.
    pub id: FactionId,
    /// Spendable money accumulated from income.
    pub treasury: u32,
    /// Index of the headquarters city.
    pub headquarters: CityIndex,
    /// Set once the headquarters has fallen. The game ends in that round.
    pub headquarters_captured: bool,
}

impl Faction {
    /// Create a faction with an empty treasury.
    #[must_use]
    pub const fn new(id: FactionId, headquarters: CityIndex) -> Self {
        Self {
            id,
            treasury: 0,
            headquarters,
            headquarters_captured: false,
        }
    }

    /// Credit income.
    pub fn deposit(&mut self, amount: u32) {
        self.treasury = self.treasury.saturating_add(amount);
    }

    /// Debit `amount` if the treasury covers it. Returns whether it did.
    pub fn try_spend(&mut self, amount: u32) -> bool {
        match self.treasury.checked_sub(amount) {
            Some(rest) => {
                self.treasury = rest;
                true
            }
            None => false,
        }
    }
}
