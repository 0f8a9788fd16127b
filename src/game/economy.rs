//! Economy system: per-round income.
//!
//! Every city pays its fixed `income_per_turn` to whichever faction controls
//! it, headquarters included. Unoccupied cities pay nobody. Income runs once
//! at the start of each round, before any spending, and never touches cities.

use serde::{Deserialize, Serialize};

use crate::game::{FactionId, WorldState};

/// Income credited to each faction in one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IncomeReport {
    /// Amount added to the player's treasury.
    pub player: u32,
    /// Amount added to the NPC's treasury.
    pub npc: u32,
}

impl IncomeReport {
    /// Income of one faction.
    #[must_use]
    pub const fn of(&self, faction: FactionId) -> u32 {
        match faction {
            FactionId::Player => self.player,
            FactionId::Npc => self.npc,
        }
    }
}

/// Income a faction earns from the cities it currently controls.
#[must_use]
pub fn income_of(state: &WorldState, faction: FactionId) -> u32 {
    state
        .cities()
        .iter()
        .filter(|city| city.controller.is(faction))
        .fold(0u32, |sum, city| sum.saturating_add(city.income_per_turn))
}

/// Credit each faction with the income of its controlled cities.
pub fn collect_income(state: &mut WorldState) -> IncomeReport {
    let report = IncomeReport {
        player: income_of(state, FactionId::Player),
        npc: income_of(state, FactionId::Npc),
    };

    for faction in FactionId::ALL {
        let amount = report.of(faction);
        state.faction_mut(faction).deposit(amount);
        tracing::debug!(
            ?faction,
            amount,
            treasury = state.faction(faction).treasury,
            "income credited"
        );
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Controller;
    use crate::testutil::sample_world;

    #[test]
    fn test_headquarters_only() {
        // Incomes are 10, 20, .., 60 by index.
        let mut world = sample_world(1, 4);
        let report = collect_income(&mut world);

        assert_eq!(report, IncomeReport { player: 20, npc: 50 });
        assert_eq!(world.faction(FactionId::Player).treasury, 20);
        assert_eq!(world.faction(FactionId::Npc).treasury, 50);
    }

    #[test]
    fn test_captured_cities_pay_their_controller() {
        let mut world = sample_world(1, 4);
        world.city_mut(0).unwrap().controller = Controller::Player;
        world.city_mut(5).unwrap().controller = Controller::Npc;

        let report = collect_income(&mut world);
        assert_eq!(report.player, 10 + 20);
        assert_eq!(report.npc, 50 + 60);
    }

    #[test]
    fn test_income_accumulates() {
        let mut world = sample_world(0, 5);
        collect_income(&mut world);
        collect_income(&mut world);
        assert_eq!(world.faction(FactionId::Player).treasury, 20);
        assert_eq!(world.faction(FactionId::Npc).treasury, 120);
    }

    #[test]
    fn test_cities_unchanged() {
        let mut world = sample_world(2, 3);
        let before = world.snapshot().cities;
        collect_income(&mut world);
        assert_eq!(world.snapshot().cities, before);
    }
}
