//! Scripted opponent.
//!
//! Once per round, if it can afford at least one unit, the opponent:
//! 1. picks its weakest city (fewest NPC units, first in map order on ties),
//! 2. spends everything on tanks, then the remainder on soldiers, stationing
//!    them there,
//! 3. looks at each neighbor of that city in index order and, when the
//!    city's force meets the neighbor's advance threshold and the neighbor is
//!    not already its own, moves the whole garrison in.
//!
//! Step 3 compares every neighbor against the force the city had before the
//! first relocation. A second qualifying neighbor therefore receives whatever
//! is left, which is nothing.

use serde::{Deserialize, Serialize};

use crate::game::{CityIndex, Controller, FactionId, UnitKind, WorldState};

/// Cheapest unit price; below this the opponent does nothing.
pub const MIN_PURCHASE_COST: u32 = UnitKind::Soldier.cost();

/// One relocation of the reinforced garrison into a neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relocation {
    /// City the units left.
    pub from: CityIndex,
    /// Neighbor they entered.
    pub to: CityIndex,
    /// Soldiers moved.
    pub soldiers: u32,
    /// Tanks moved.
    pub tanks: u32,
    /// Whether the neighbor changed hands to the opponent.
    pub captured: bool,
}

/// What the opponent did this round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpponentReport {
    /// Treasury below the cheapest unit, or no city to reinforce.
    Idle,
    /// The opponent reinforced a city and possibly advanced from it.
    Acted {
        /// City reinforced.
        target: CityIndex,
        /// Tanks bought.
        tanks_bought: u32,
        /// Soldiers bought.
        soldiers_bought: u32,
        /// Relocations in evaluation order.
        relocations: Vec<Relocation>,
    },
}

/// City the opponent reinforces: the NPC-controlled city with the fewest NPC
/// units, first in map order on ties.
#[must_use]
pub fn weakest_city(state: &WorldState) -> Option<CityIndex> {
    state
        .controlled_by(FactionId::Npc)
        .min_by_key(|&index| state.city(index).map_or(u32::MAX, |city| city.npc.total()))
}

/// Run the opponent's decision procedure against the world.
pub fn run_opponent(state: &mut WorldState) -> OpponentReport {
    if state.faction(FactionId::Npc).treasury < MIN_PURCHASE_COST {
        tracing::debug!("opponent cannot afford any unit");
        return OpponentReport::Idle;
    }
    let Some(target) = weakest_city(state) else {
        tracing::debug!("opponent controls no city");
        return OpponentReport::Idle;
    };

    let tanks_bought = buy_all(state, target, UnitKind::Tank);
    let soldiers_bought = buy_all(state, target, UnitKind::Soldier);
    let relocations = advance_from(state, target);

    OpponentReport::Acted {
        target,
        tanks_bought,
        soldiers_bought,
        relocations,
    }
}

/// Spend as much of the treasury as divides evenly into `unit`.
fn buy_all(state: &mut WorldState, target: CityIndex, unit: UnitKind) -> u32 {
    let npc = state.faction_mut(FactionId::Npc);
    let count = npc.treasury / unit.cost();
    if count == 0 {
        return 0;
    }
    npc.treasury -= count * unit.cost();

    if let Some(city) = state.city_mut(target) {
        city.npc.add(unit, count);
        tracing::debug!(city = %city.name, ?unit, count, "opponent purchased units");
    }
    count
}

fn advance_from(state: &mut WorldState, target: CityIndex) -> Vec<Relocation> {
    let force = state.city(target).map_or(0, |city| city.npc.total());
    let neighbors = state.adjacency().neighbors(target).to_vec();

    let mut relocations = Vec::new();
    for neighbor in neighbors {
        let Some(city) = state.city(neighbor) else {
            continue;
        };
        if city.controller == Controller::Npc || force < city.advance_threshold() {
            continue;
        }

        let units = state
            .city_mut(target)
            .map(|city| city.npc.take_all())
            .unwrap_or_default();
        let mut captured = false;
        if let Some(city) = state.city_mut(neighbor) {
            city.npc.absorb(units);
            if !units.is_empty() && city.controller == Controller::Unoccupied {
                city.controller = Controller::Npc;
                captured = true;
            }
            tracing::debug!(
                to = %city.name,
                soldiers = units.soldiers,
                tanks = units.tanks,
                captured,
                "opponent advanced"
            );
        }

        relocations.push(Relocation {
            from: target,
            to: neighbor,
            soldiers: units.soldiers,
            tanks: units.tanks,
            captured,
        });
    }
    relocations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Garrison;
    use crate::testutil::empty_world;

    #[test]
    fn test_idle_below_minimum_cost() {
        let mut world = empty_world(0, 3);
        world.faction_mut(FactionId::Npc).treasury = 19;
        let before = world.snapshot();

        assert_eq!(run_opponent(&mut world), OpponentReport::Idle);
        assert_eq!(world.snapshot(), before);
    }

    #[test]
    fn test_tanks_before_soldiers() {
        let mut world = empty_world(0, 3);
        // Keep the neighbors out of reach so nothing relocates.
        world.city_mut(2).unwrap().neutral = Garrison::new(10, 0);
        world.city_mut(4).unwrap().neutral = Garrison::new(10, 0);
        world.faction_mut(FactionId::Npc).treasury = 120;

        let report = run_opponent(&mut world);

        assert_eq!(
            report,
            OpponentReport::Acted {
                target: 3,
                tanks_bought: 2,
                soldiers_bought: 1,
                relocations: Vec::new(),
            }
        );
        assert_eq!(world.faction(FactionId::Npc).treasury, 0);
        assert_eq!(world.city(3).unwrap().npc, Garrison::new(1, 2));
    }

    #[test]
    fn test_soldiers_only_when_tanks_unaffordable() {
        let mut world = empty_world(0, 3);
        world.city_mut(2).unwrap().neutral = Garrison::new(10, 0);
        world.city_mut(4).unwrap().neutral = Garrison::new(10, 0);
        world.faction_mut(FactionId::Npc).treasury = 45;

        run_opponent(&mut world);
        assert_eq!(world.city(3).unwrap().npc, Garrison::new(2, 0));
        assert_eq!(world.faction(FactionId::Npc).treasury, 5);
    }

    #[test]
    fn test_weakest_city_first_on_ties() {
        let mut world = empty_world(0, 3);
        world.city_mut(1).unwrap().controller = Controller::Npc;
        world.city_mut(5).unwrap().controller = Controller::Npc;
        world.city_mut(3).unwrap().npc = Garrison::new(2, 0);
        world.city_mut(1).unwrap().npc = Garrison::new(0, 1);
        world.city_mut(5).unwrap().npc = Garrison::new(1, 0);

        assert_eq!(weakest_city(&world), Some(1));
    }

    #[test]
    fn test_advance_threshold_met() {
        let mut world = empty_world(0, 3);
        world.city_mut(3).unwrap().npc = Garrison::new(20, 10);
        // Right neighbor: threshold 3 * 5 + 10 = 25.
        let right = world.city_mut(4).unwrap();
        right.neutral = Garrison::new(3, 2);
        right.controller = Controller::Player;
        right.player = Garrison::new(6, 4);
        // Left neighbor out of reach.
        world.city_mut(2).unwrap().neutral = Garrison::new(20, 0);
        world.faction_mut(FactionId::Npc).treasury = 20;

        let report = run_opponent(&mut world);

        // One soldier bought first: force is 31.
        let OpponentReport::Acted { relocations, .. } = report else {
            panic!("opponent should act");
        };
        assert_eq!(
            relocations,
            vec![Relocation {
                from: 3,
                to: 4,
                soldiers: 21,
                tanks: 10,
                captured: false
            }]
        );
        assert!(world.city(3).unwrap().npc.is_empty());
        assert_eq!(world.city(4).unwrap().npc, Garrison::new(21, 10));
        assert_eq!(world.city(4).unwrap().controller, Controller::Player);
    }

    #[test]
    fn test_advance_threshold_exact_equality() {
        let mut world = empty_world(0, 3);
        world.city_mut(3).unwrap().npc = Garrison::new(5, 0);
        world.city_mut(2).unwrap().neutral = Garrison::new(2, 0);
        world.city_mut(4).unwrap().neutral = Garrison::new(9, 9);
        world.faction_mut(FactionId::Npc).treasury = 20;

        // Force 6 after buying a soldier; left threshold 3 * 2 = 6.
        run_opponent(&mut world);

        let left = world.city(2).unwrap();
        assert_eq!(left.npc, Garrison::new(6, 0));
        assert_eq!(left.controller, Controller::Npc);
    }

    #[test]
    fn test_second_relocation_moves_nothing() {
        let mut world = empty_world(0, 3);
        world.city_mut(3).unwrap().npc = Garrison::new(4, 1);
        world.faction_mut(FactionId::Npc).treasury = 20;

        let report = run_opponent(&mut world);

        // Both empty neighbors qualify against the original force of 6.
        let OpponentReport::Acted { relocations, .. } = report else {
            panic!("opponent should act");
        };
        assert_eq!(relocations.len(), 2);
        assert_eq!((relocations[0].to, relocations[0].soldiers, relocations[0].tanks), (2, 5, 1));
        assert!(relocations[0].captured);
        assert_eq!((relocations[1].to, relocations[1].soldiers, relocations[1].tanks), (4, 0, 0));
        assert!(!relocations[1].captured);

        assert_eq!(world.city(2).unwrap().controller, Controller::Npc);
        assert_eq!(world.city(4).unwrap().controller, Controller::Unoccupied);
        assert!(world.city(3).unwrap().npc.is_empty());
    }

    #[test]
    fn test_never_advances_into_own_city() {
        let mut world = empty_world(0, 5);
        world.city_mut(4).unwrap().controller = Controller::Npc;
        world.city_mut(4).unwrap().npc = Garrison::new(50, 0);
        world.faction_mut(FactionId::Npc).treasury = 20;

        // Target is the HQ at the end of the line; its only neighbor is its own.
        let report = run_opponent(&mut world);
        let OpponentReport::Acted { target, relocations, .. } = report else {
            panic!("opponent should act");
        };
        assert_eq!(target, 5);
        assert!(relocations.is_empty());
        assert_eq!(world.city(5).unwrap().npc, Garrison::new(1, 0));
    }

    #[test]
    fn test_advance_conserves_units() {
        let mut world = empty_world(0, 3);
        world.city_mut(3).unwrap().npc = Garrison::new(7, 3);
        let before = world.unit_totals();

        let relocations = advance_from(&mut world, 3);
        assert!(!relocations.is_empty());
        assert_eq!(world.unit_totals(), before);
    }
}
