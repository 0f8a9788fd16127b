//! Cities, garrisons and unit kinds.

use serde::{Deserialize, Serialize};

use crate::game::FactionId;

/// Kind of unit that can be bought and stationed in a city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    /// Infantry. Cheap, and never lost in combat.
    Soldier,
    /// Armour. Tanks are the only units that fight.
    Tank,
}

impl UnitKind {
    /// Purchase price of a single unit.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            UnitKind::Soldier => 20,
            UnitKind::Tank => 50,
        }
    }
}

/// Who holds a city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Controller {
    /// Nobody has captured the city yet.
    #[default]
    Unoccupied,
    /// Held by the human player.
    Player,
    /// Held by the scripted opponent.
    Npc,
}

impl Controller {
    /// Whether this controller is the given faction.
    #[must_use]
    pub const fn is(self, faction: FactionId) -> bool {
        matches!(
            (self, faction),
            (Controller::Player, FactionId::Player) | (Controller::Npc, FactionId::Npc)
        )
    }
}

impl From<FactionId> for Controller {
    fn from(faction: FactionId) -> Self {
        match faction {
            FactionId::Player => Controller::Player,
            FactionId::Npc => Controller::Npc,
        }
    }
}

/// Soldier and tank counts one party holds in a city.
///
/// Counts are unsigned; every decrement in the engine saturates at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Garrison {
    /// Number of soldiers.
    pub soldiers: u32,
    /// Number of tanks.
    pub tanks: u32,
}

impl Garrison {
    /// Create a garrison with the given counts.
    #[must_use]
    pub const fn new(soldiers: u32, tanks: u32) -> Self {
        Self { soldiers, tanks }
    }

    /// Soldiers plus tanks.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.soldiers.saturating_add(self.tanks)
    }

    /// Whether the garrison holds no units at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.soldiers == 0 && self.tanks == 0
    }

    /// Count of one unit kind.
    #[must_use]
    pub const fn count(&self, kind: UnitKind) -> u32 {
        match kind {
            UnitKind::Soldier => self.soldiers,
            UnitKind::Tank => self.tanks,
        }
    }

    /// Add `count` units of `kind`.
    pub fn add(&mut self, kind: UnitKind, count: u32) {
        match kind {
            UnitKind::Soldier => self.soldiers = self.soldiers.saturating_add(count),
            UnitKind::Tank => self.tanks = self.tanks.saturating_add(count),
        }
    }

    /// Merge another garrison into this one.
    pub fn absorb(&mut self, other: Garrison) {
        self.soldiers = self.soldiers.saturating_add(other.soldiers);
        self.tanks = self.tanks.saturating_add(other.tanks);
    }

    /// Take `count` units of one kind out of the garrison.
    ///
    /// # Errors
    ///
    /// Fails with nothing removed if fewer than `count` are present.
    pub fn remove(&mut self, unit: UnitKind, count: u32) -> Result<(), Shortage> {
        let available = self.count(unit);
        if count > available {
            return Err(Shortage {
                unit,
                requested: count,
                available,
            });
        }
        match unit {
            UnitKind::Soldier => self.soldiers = available - count,
            UnitKind::Tank => self.tanks = available - count,
        }
        Ok(())
    }

    /// Split off `soldiers` and `tanks` together.
    ///
    /// # Errors
    ///
    /// Fails with nothing removed if either count is short; soldiers are
    /// checked first.
    pub fn detach(&mut self, soldiers: u32, tanks: u32) -> Result<Garrison, Shortage> {
        for (unit, requested) in [(UnitKind::Soldier, soldiers), (UnitKind::Tank, tanks)] {
            let available = self.count(unit);
            if requested > available {
                return Err(Shortage {
                    unit,
                    requested,
                    available,
                });
            }
        }
        self.soldiers -= soldiers;
        self.tanks -= tanks;
        Ok(Garrison::new(soldiers, tanks))
    }

    /// Remove and return every unit, leaving the garrison empty.
    pub fn take_all(&mut self) -> Garrison {
        std::mem::take(self)
    }
}

/// A request for more units than a garrison holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortage {
    /// Kind of unit short.
    pub unit: UnitKind,
    /// Count asked for.
    pub requested: u32,
    /// Count present.
    pub available: u32,
}

/// One of the six cities on the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    /// Unique display name; commands address cities by it.
    pub name: String,
    /// Income credited to the controller every round.
    pub income_per_turn: u32,
    /// Units nobody commands. They never fight, but deter advances.
    pub neutral: Garrison,
    /// Units belonging to the player.
    pub player: Garrison,
    /// Units belonging to the scripted opponent.
    pub npc: Garrison,
    /// Current holder of the city.
    pub controller: Controller,
}

impl City {
    /// Create an unoccupied city with a neutral garrison.
    #[must_use]
    pub fn new(name: impl Into<String>, income_per_turn: u32, neutral: Garrison) -> Self {
        Self {
            name: name.into(),
            income_per_turn,
            neutral,
            player: Garrison::default(),
            npc: Garrison::default(),
            controller: Controller::Unoccupied,
        }
    }

    /// Garrison of a faction.
    #[must_use]
    pub const fn garrison(&self, faction: FactionId) -> &Garrison {
        match faction {
            FactionId::Player => &self.player,
            FactionId::Npc => &self.npc,
        }
    }

    /// Mutable garrison of a faction.
    pub fn garrison_mut(&mut self, faction: FactionId) -> &mut Garrison {
        match faction {
            FactionId::Player => &mut self.player,
            FactionId::Npc => &mut self.npc,
        }
    }

    /// Whether both factions have units here.
    #[must_use]
    pub const fn is_contested(&self) -> bool {
        self.player.total() > 0 && self.npc.total() > 0
    }

    /// Force needed to take this city from the neutrals alone.
    #[must_use]
    pub const fn neutral_deterrent(&self) -> u32 {
        self.neutral.total().saturating_mul(3)
    }

    /// Force the opponent needs to advance into this city: three times the
    /// neutral garrison plus everything the player holds here.
    #[must_use]
    pub const fn advance_threshold(&self) -> u32 {
        self.neutral_deterrent().saturating_add(self.player.total())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_costs() {
        assert_eq!(UnitKind::Soldier.cost(), 20);
        assert_eq!(UnitKind::Tank.cost(), 50);
    }

    #[test]
    fn test_garrison_detach_all_or_nothing() {
        let mut garrison = Garrison::new(5, 2);
        assert_eq!(
            garrison.detach(6, 0),
            Err(Shortage {
                unit: UnitKind::Soldier,
                requested: 6,
                available: 5
            })
        );
        assert_eq!(
            garrison.detach(1, 3),
            Err(Shortage {
                unit: UnitKind::Tank,
                requested: 3,
                available: 2
            })
        );
        assert_eq!(garrison, Garrison::new(5, 2));

        assert_eq!(garrison.detach(5, 1), Ok(Garrison::new(5, 1)));
        assert_eq!(garrison, Garrison::new(0, 1));
    }

    #[test]
    fn test_garrison_remove_one_kind() {
        let mut garrison = Garrison::new(4, 1);
        assert_eq!(garrison.remove(UnitKind::Soldier, 3), Ok(()));
        assert_eq!(
            garrison.remove(UnitKind::Tank, 2),
            Err(Shortage {
                unit: UnitKind::Tank,
                requested: 2,
                available: 1
            })
        );
        assert_eq!(garrison, Garrison::new(1, 1));
    }

    #[test]
    fn test_garrison_take_all() {
        let mut garrison = Garrison::new(3, 4);
        let taken = garrison.take_all();
        assert_eq!(taken.total(), 7);
        assert!(garrison.is_empty());
    }

    #[test]
    fn test_advance_threshold() {
        let mut city = City::new("Oz", 10, Garrison::new(3, 2));
        city.player = Garrison::new(6, 4);
        assert_eq!(city.advance_threshold(), 3 * 5 + 10);
    }

    #[test]
    fn test_controller_is() {
        assert!(Controller::Player.is(FactionId::Player));
        assert!(!Controller::Player.is(FactionId::Npc));
        assert!(!Controller::Unoccupied.is(FactionId::Npc));
        assert_eq!(Controller::from(FactionId::Npc), Controller::Npc);
    }
}
