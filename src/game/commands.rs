//! Player commands and their validation.
//!
//! Commands arrive already parsed. Each one is validated against the current
//! world and then applied, or rejected with no effect at all. A `Move` is two
//! sub-moves, soldiers and tanks, validated and applied independently; it is
//! only rejected when nothing could move. A rejection is an ordinary value
//! for the render layer to report; it never stops the round.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::{CityIndex, Controller, FactionId, Garrison, Shortage, UnitKind, WorldState};

/// A parsed player command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Command {
    /// Buy units and station them in one of the player's cities.
    Purchase {
        /// Kind of unit to buy.
        unit: UnitKind,
        /// How many to buy. Must be positive.
        count: u32,
        /// Player-controlled city receiving the units.
        city: String,
    },
    /// Shift units between two player-controlled cities. A sub-move asking
    /// for more units than the source holds is skipped on its own.
    Move {
        /// Source city.
        from: String,
        /// Destination city.
        to: String,
        /// Soldiers to move.
        soldiers: u32,
        /// Tanks to move.
        tanks: u32,
    },
    /// Send units from a player city into an adjacent city the player does
    /// not hold. Unoccupied cities are captured; NPC cities are entered and
    /// fought over in the combat phase.
    Advance {
        /// Source city.
        from: String,
        /// Adjacent destination city.
        to: String,
        /// Soldiers to send.
        soldiers: u32,
        /// Tanks to send.
        tanks: u32,
    },
    /// No more actions this round.
    EndTurn,
}

/// What an accepted command changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandEffect {
    /// Units bought.
    Purchased {
        /// Receiving city.
        city: CityIndex,
        /// Kind bought.
        unit: UnitKind,
        /// Number bought.
        count: u32,
        /// Amount debited from the treasury.
        cost: u32,
    },
    /// Units moved between player cities.
    Moved {
        /// Source city.
        from: CityIndex,
        /// Destination city.
        to: CityIndex,
        /// Soldiers moved; zero if that sub-move was skipped.
        soldiers: u32,
        /// Tanks moved; zero if that sub-move was skipped.
        tanks: u32,
    },
    /// Units advanced into a city the player did not hold.
    Advanced {
        /// Source city.
        from: CityIndex,
        /// Destination city.
        to: CityIndex,
        /// Soldiers sent.
        soldiers: u32,
        /// Tanks sent.
        tanks: u32,
        /// Whether the destination changed hands to the player.
        captured: bool,
    },
    /// The player finished the round.
    TurnEnded,
}

/// Why a command had no effect.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum CommandRejection {
    /// No city has this name.
    #[error("there is no city named {0:?}")]
    UnknownCity(String),
    /// The city is not held by the player.
    #[error("{0} is not one of your cities")]
    NotControlled(String),
    /// The destination of an advance is already the player's.
    #[error("{0} is already yours; use move instead")]
    AlreadyControlled(String),
    /// A purchase of zero units, or an advance sending nobody.
    #[error("quantity must be positive")]
    ZeroQuantity,
    /// The treasury cannot cover the purchase.
    #[error("costs {needed}, but only {available} is available")]
    InsufficientFunds {
        /// Price of the purchase.
        needed: u64,
        /// Current treasury.
        available: u32,
    },
    /// More units requested than the source city holds.
    #[error("only {available} {unit:?} units available, {requested} requested")]
    NotEnoughUnits {
        /// Kind of unit short.
        unit: UnitKind,
        /// Requested count.
        requested: u32,
        /// Count held at the source.
        available: u32,
    },
    /// The two cities do not share a border.
    #[error("{from} and {to} are not adjacent")]
    NotAdjacent {
        /// Source city name.
        from: String,
        /// Destination city name.
        to: String,
    },
    /// The advancing force is too small to displace the neutral garrison.
    #[error("advance of {sent} units needs at least {required}")]
    InsufficientForce {
        /// Units sent.
        sent: u32,
        /// Units required.
        required: u32,
    },
}

impl From<Shortage> for CommandRejection {
    fn from(shortage: Shortage) -> Self {
        Self::NotEnoughUnits {
            unit: shortage.unit,
            requested: shortage.requested,
            available: shortage.available,
        }
    }
}

/// Result of submitting one command.
pub type CommandOutcome = Result<CommandEffect, CommandRejection>;

/// Applies player commands to the world.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandProcessor {
    /// Require `Move` source and destination to be adjacent. Off by default:
    /// player moves may jump between any two of the player's cities.
    pub moves_need_adjacency: bool,
}

impl CommandProcessor {
    /// Create a processor.
    #[must_use]
    pub const fn new(moves_need_adjacency: bool) -> Self {
        Self {
            moves_need_adjacency,
        }
    }

    /// Validate and apply a single command.
    ///
    /// `EndTurn` is accepted and changes nothing; deciding that the round
    /// moves on is up to the caller.
    pub fn apply(&self, state: &mut WorldState, command: &Command) -> CommandOutcome {
        let outcome = match command {
            Command::Purchase { unit, count, city } => purchase(state, *unit, *count, city),
            Command::Move {
                from,
                to,
                soldiers,
                tanks,
            } => self.relocate(state, from, to, *soldiers, *tanks),
            Command::Advance {
                from,
                to,
                soldiers,
                tanks,
            } => advance(state, from, to, *soldiers, *tanks),
            Command::EndTurn => Ok(CommandEffect::TurnEnded),
        };

        match &outcome {
            Ok(effect) => tracing::debug!(?effect, "command applied"),
            Err(reason) => tracing::debug!(?command, %reason, "command rejected"),
        }
        outcome
    }

    /// Apply commands in order until `EndTurn`. Commands after it are not
    /// looked at. Returns one outcome per command processed, including the
    /// `EndTurn` itself when present.
    pub fn apply_batch<'a>(
        &self,
        state: &mut WorldState,
        commands: impl IntoIterator<Item = &'a Command>,
    ) -> Vec<CommandOutcome> {
        let mut outcomes = Vec::new();
        for command in commands {
            outcomes.push(self.apply(state, command));
            if matches!(command, Command::EndTurn) {
                break;
            }
        }
        outcomes
    }

    fn relocate(
        &self,
        state: &mut WorldState,
        from: &str,
        to: &str,
        soldiers: u32,
        tanks: u32,
    ) -> CommandOutcome {
        let source = player_city(state, from)?;
        let dest = player_city(state, to)?;
        let adjacent = source == dest || state.adjacency().are_adjacent(source, dest);
        if self.moves_need_adjacency && !adjacent {
            return Err(CommandRejection::NotAdjacent {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        let Some(city) = state.city_mut(source) else {
            return Err(CommandRejection::UnknownCity(from.to_string()));
        };
        let mut moved = Garrison::default();
        let mut skipped = None;
        for (unit, requested) in [(UnitKind::Soldier, soldiers), (UnitKind::Tank, tanks)] {
            match city.player.remove(unit, requested) {
                Ok(()) => moved.add(unit, requested),
                Err(shortage) => {
                    tracing::debug!(?shortage, "sub-move skipped");
                    skipped = skipped.or(Some(shortage));
                }
            }
        }
        // Every requested unit kind was short: nothing changed.
        if let (true, Some(shortage)) = (moved.is_empty(), skipped) {
            return Err(shortage.into());
        }
        if let Some(city) = state.city_mut(dest) {
            city.player.absorb(moved);
        }

        Ok(CommandEffect::Moved {
            from: source,
            to: dest,
            soldiers: moved.soldiers,
            tanks: moved.tanks,
        })
    }
}

fn lookup(state: &WorldState, name: &str) -> Result<CityIndex, CommandRejection> {
    state
        .index_of(name)
        .ok_or_else(|| CommandRejection::UnknownCity(name.to_string()))
}

fn player_city(state: &WorldState, name: &str) -> Result<CityIndex, CommandRejection> {
    let index = lookup(state, name)?;
    if state.controls(FactionId::Player, index) {
        Ok(index)
    } else {
        Err(CommandRejection::NotControlled(name.to_string()))
    }
}

fn purchase(state: &mut WorldState, unit: UnitKind, count: u32, name: &str) -> CommandOutcome {
    if count == 0 {
        return Err(CommandRejection::ZeroQuantity);
    }
    let city = player_city(state, name)?;

    let needed = u64::from(count) * u64::from(unit.cost());
    let available = state.faction(FactionId::Player).treasury;
    let cost = u32::try_from(needed)
        .ok()
        .filter(|&cost| cost <= available)
        .ok_or(CommandRejection::InsufficientFunds { needed, available })?;

    state.faction_mut(FactionId::Player).treasury -= cost;
    if let Some(target) = state.city_mut(city) {
        target.player.add(unit, count);
    }

    Ok(CommandEffect::Purchased {
        city,
        unit,
        count,
        cost,
    })
}

fn advance(state: &mut WorldState, from: &str, to: &str, soldiers: u32, tanks: u32) -> CommandOutcome {
    let source = player_city(state, from)?;
    let dest = lookup(state, to)?;
    let Some(target) = state.city(dest) else {
        return Err(CommandRejection::UnknownCity(to.to_string()));
    };
    if target.controller == Controller::Player {
        return Err(CommandRejection::AlreadyControlled(to.to_string()));
    }
    if !state.adjacency().are_adjacent(source, dest) {
        return Err(CommandRejection::NotAdjacent {
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    let sent = soldiers.saturating_add(tanks);
    if sent == 0 {
        return Err(CommandRejection::ZeroQuantity);
    }
    let capturing = target.controller == Controller::Unoccupied;
    let required = target.neutral_deterrent();
    if capturing && sent < required {
        return Err(CommandRejection::InsufficientForce { sent, required });
    }

    // Unlike a move, an advance goes out whole or not at all.
    let units = state
        .city_mut(source)
        .ok_or_else(|| CommandRejection::UnknownCity(from.to_string()))?
        .player
        .detach(soldiers, tanks)?;
    if let Some(city) = state.city_mut(dest) {
        city.player.absorb(units);
        if capturing {
            city.controller = Controller::Player;
        }
    }

    Ok(CommandEffect::Advanced {
        from: source,
        to: dest,
        soldiers,
        tanks,
        captured: capturing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{empty_world, sample_world};

    fn funded_world(treasury: u32) -> WorldState {
        // Player HQ Skyrim (1), NPC HQ Termina (4).
        let mut world = sample_world(1, 4);
        world.faction_mut(FactionId::Player).treasury = treasury;
        world
    }

    fn purchase_cmd(unit: UnitKind, count: u32, city: &str) -> Command {
        Command::Purchase {
            unit,
            count,
            city: city.to_string(),
        }
    }

    fn move_cmd(from: &str, to: &str, soldiers: u32, tanks: u32) -> Command {
        Command::Move {
            from: from.to_string(),
            to: to.to_string(),
            soldiers,
            tanks,
        }
    }

    fn advance_cmd(from: &str, to: &str, soldiers: u32, tanks: u32) -> Command {
        Command::Advance {
            from: from.to_string(),
            to: to.to_string(),
            soldiers,
            tanks,
        }
    }

    #[test]
    fn test_purchase_tanks() {
        let mut world = funded_world(120);
        let outcome = CommandProcessor::default().apply(&mut world, &purchase_cmd(UnitKind::Tank, 2, "Skyrim"));

        assert_eq!(
            outcome,
            Ok(CommandEffect::Purchased {
                city: 1,
                unit: UnitKind::Tank,
                count: 2,
                cost: 100
            })
        );
        assert_eq!(world.faction(FactionId::Player).treasury, 20);
        assert_eq!(world.city(1).unwrap().player, Garrison::new(2, 3));
    }

    #[test]
    fn test_purchase_exact_funds() {
        let mut world = funded_world(100);
        let outcome = CommandProcessor::default().apply(&mut world, &purchase_cmd(UnitKind::Soldier, 5, "Skyrim"));
        assert!(outcome.is_ok());
        assert_eq!(world.faction(FactionId::Player).treasury, 0);
    }

    #[test]
    fn test_purchase_in_npc_city_rejected() {
        let mut world = funded_world(500);
        let before = world.snapshot();

        let outcome = CommandProcessor::default().apply(&mut world, &purchase_cmd(UnitKind::Soldier, 5, "Termina"));

        assert_eq!(outcome, Err(CommandRejection::NotControlled("Termina".to_string())));
        assert_eq!(world.snapshot(), before);
    }

    #[test]
    fn test_purchase_rejections_leave_state_unchanged() {
        let processor = CommandProcessor::default();
        let mut world = funded_world(60);
        let before = world.snapshot();

        let rejected = [
            (purchase_cmd(UnitKind::Tank, 2, "Skyrim"), CommandRejection::InsufficientFunds { needed: 100, available: 60 }),
            (purchase_cmd(UnitKind::Tank, 0, "Skyrim"), CommandRejection::ZeroQuantity),
            (purchase_cmd(UnitKind::Soldier, 1, "Atlantis"), CommandRejection::UnknownCity("Atlantis".to_string())),
            (purchase_cmd(UnitKind::Soldier, 1, "Hyrule"), CommandRejection::NotControlled("Hyrule".to_string())),
        ];
        for (command, expected) in rejected {
            assert_eq!(processor.apply(&mut world, &command), Err(expected));
            assert_eq!(world.snapshot(), before);
        }
    }

    #[test]
    fn test_purchase_overflowing_cost_rejected() {
        let mut world = funded_world(u32::MAX);
        let outcome = CommandProcessor::default().apply(&mut world, &purchase_cmd(UnitKind::Tank, u32::MAX, "Skyrim"));
        assert!(matches!(outcome, Err(CommandRejection::InsufficientFunds { .. })));
        assert_eq!(world.faction(FactionId::Player).treasury, u32::MAX);
    }

    #[test]
    fn test_move_between_distant_player_cities() {
        let mut world = funded_world(0);
        world.city_mut(5).unwrap().controller = Controller::Player;

        // Skyrim (1) holds 2 soldiers, 1 tank. Oz (5) is not adjacent.
        let outcome = CommandProcessor::default().apply(&mut world, &move_cmd("Skyrim", "Oz", 2, 1));

        assert!(outcome.is_ok());
        assert!(world.city(1).unwrap().player.is_empty());
        assert_eq!(world.city(5).unwrap().player, Garrison::new(2, 1));
    }

    #[test]
    fn test_move_adjacency_when_required() {
        let mut world = funded_world(0);
        world.city_mut(5).unwrap().controller = Controller::Player;
        let before = world.snapshot();

        let outcome = CommandProcessor::new(true).apply(&mut world, &move_cmd("Skyrim", "Oz", 1, 0));

        assert!(matches!(outcome, Err(CommandRejection::NotAdjacent { .. })));
        assert_eq!(world.snapshot(), before);
    }

    #[test]
    fn test_move_skips_only_the_short_sub_move() {
        let mut world = funded_world(0);
        world.city_mut(0).unwrap().controller = Controller::Player;

        // Skyrim holds 2 soldiers and 1 tank: the soldier goes, the tanks stay.
        let outcome = CommandProcessor::default().apply(&mut world, &move_cmd("Skyrim", "Morrowind", 1, 5));

        assert_eq!(
            outcome,
            Ok(CommandEffect::Moved {
                from: 1,
                to: 0,
                soldiers: 1,
                tanks: 0
            })
        );
        assert_eq!(world.city(1).unwrap().player, Garrison::new(1, 1));
        assert_eq!(world.city(0).unwrap().player, Garrison::new(1, 0));
    }

    #[test]
    fn test_move_tanks_when_soldiers_short() {
        let mut world = funded_world(0);
        world.city_mut(0).unwrap().controller = Controller::Player;

        let outcome = CommandProcessor::default().apply(&mut world, &move_cmd("Skyrim", "Morrowind", 9, 1));

        assert!(matches!(outcome, Ok(CommandEffect::Moved { soldiers: 0, tanks: 1, .. })));
        assert_eq!(world.city(1).unwrap().player, Garrison::new(2, 0));
        assert_eq!(world.city(0).unwrap().player, Garrison::new(0, 1));
    }

    #[test]
    fn test_move_with_nothing_movable_rejected() {
        let mut world = funded_world(0);
        world.city_mut(0).unwrap().controller = Controller::Player;
        let before = world.snapshot();

        let outcome = CommandProcessor::default().apply(&mut world, &move_cmd("Skyrim", "Morrowind", 3, 5));

        assert_eq!(
            outcome,
            Err(CommandRejection::NotEnoughUnits {
                unit: UnitKind::Soldier,
                requested: 3,
                available: 2
            })
        );
        assert_eq!(world.snapshot(), before);

        // A zero sub-move beside a short one moves nothing either.
        let outcome = CommandProcessor::default().apply(&mut world, &move_cmd("Skyrim", "Morrowind", 0, 5));
        assert!(matches!(outcome, Err(CommandRejection::NotEnoughUnits { unit: UnitKind::Tank, .. })));
        assert_eq!(world.snapshot(), before);
    }

    #[test]
    fn test_move_into_npc_city_rejected() {
        let mut world = funded_world(0);
        let outcome = CommandProcessor::default().apply(&mut world, &move_cmd("Skyrim", "Termina", 1, 0));
        assert_eq!(outcome, Err(CommandRejection::NotControlled("Termina".to_string())));
    }

    #[test]
    fn test_move_zero_is_noop() {
        let mut world = funded_world(0);
        let before = world.snapshot();
        let outcome = CommandProcessor::default().apply(&mut world, &move_cmd("Skyrim", "Skyrim", 0, 0));
        assert!(outcome.is_ok());
        assert_eq!(world.snapshot(), before);
    }

    #[test]
    fn test_advance_captures_unoccupied_neighbor() {
        let mut world = empty_world(1, 4);
        world.city_mut(1).unwrap().player = Garrison::new(4, 2);
        world.city_mut(2).unwrap().neutral = Garrison::new(1, 1);

        let outcome = CommandProcessor::default().apply(&mut world, &advance_cmd("B", "C", 4, 2));

        assert_eq!(
            outcome,
            Ok(CommandEffect::Advanced {
                from: 1,
                to: 2,
                soldiers: 4,
                tanks: 2,
                captured: true
            })
        );
        let city = world.city(2).unwrap();
        assert_eq!(city.controller, Controller::Player);
        assert_eq!(city.player, Garrison::new(4, 2));
        assert_eq!(city.neutral, Garrison::new(1, 1));
    }

    #[test]
    fn test_advance_below_deterrent_rejected() {
        let mut world = empty_world(1, 4);
        world.city_mut(1).unwrap().player = Garrison::new(4, 1);
        world.city_mut(2).unwrap().neutral = Garrison::new(1, 1);

        let outcome = CommandProcessor::default().apply(&mut world, &advance_cmd("B", "C", 4, 1));
        assert_eq!(outcome, Err(CommandRejection::InsufficientForce { sent: 5, required: 6 }));
        assert_eq!(world.city(2).unwrap().controller, Controller::Unoccupied);
        assert_eq!(world.city(1).unwrap().player, Garrison::new(4, 1));
    }

    #[test]
    fn test_advance_into_npc_city_keeps_controller() {
        let mut world = empty_world(3, 4);
        world.city_mut(3).unwrap().player = Garrison::new(0, 3);
        world.city_mut(4).unwrap().npc = Garrison::new(10, 0);

        let outcome = CommandProcessor::default().apply(&mut world, &advance_cmd("D", "E", 0, 3));

        assert!(matches!(outcome, Ok(CommandEffect::Advanced { captured: false, .. })));
        let city = world.city(4).unwrap();
        assert_eq!(city.controller, Controller::Npc);
        assert_eq!(city.player, Garrison::new(0, 3));
        assert!(city.is_contested());
    }

    #[test]
    fn test_advance_rejections() {
        let processor = CommandProcessor::default();
        let mut world = empty_world(1, 4);
        world.city_mut(1).unwrap().player = Garrison::new(2, 0);
        world.city_mut(0).unwrap().controller = Controller::Player;

        assert!(matches!(
            processor.apply(&mut world, &advance_cmd("B", "D", 1, 0)),
            Err(CommandRejection::NotAdjacent { .. })
        ));
        assert_eq!(
            processor.apply(&mut world, &advance_cmd("B", "A", 1, 0)),
            Err(CommandRejection::AlreadyControlled("A".to_string()))
        );
        assert_eq!(
            processor.apply(&mut world, &advance_cmd("B", "C", 0, 0)),
            Err(CommandRejection::ZeroQuantity)
        );
        assert!(matches!(
            processor.apply(&mut world, &advance_cmd("B", "C", 3, 0)),
            Err(CommandRejection::NotEnoughUnits { .. })
        ));

        // An advance never goes out partially, even with enough soldiers.
        assert_eq!(
            processor.apply(&mut world, &advance_cmd("B", "C", 2, 1)),
            Err(CommandRejection::NotEnoughUnits {
                unit: UnitKind::Tank,
                requested: 1,
                available: 0
            })
        );
        assert_eq!(world.city(1).unwrap().player, Garrison::new(2, 0));
        assert!(world.city(2).unwrap().player.is_empty());
    }

    #[test]
    fn test_batch_stops_at_end_turn() {
        let mut world = funded_world(100);
        let commands = vec![
            purchase_cmd(UnitKind::Soldier, 1, "Skyrim"),
            purchase_cmd(UnitKind::Soldier, 1, "Nowhere"),
            Command::EndTurn,
            purchase_cmd(UnitKind::Soldier, 1, "Skyrim"),
        ];

        let outcomes = CommandProcessor::default().apply_batch(&mut world, &commands);

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].is_ok());
        assert!(outcomes[1].is_err());
        assert_eq!(outcomes[2], Ok(CommandEffect::TurnEnded));
        assert_eq!(world.faction(FactionId::Player).treasury, 80);
    }
}
