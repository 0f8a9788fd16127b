//! Game invariants - sanity checks that detect bugs.
//!
//! None of these should ever trigger in a correctly implemented game; they
//! are bug detectors, not gameplay limits. Non-negativity of unit counts and
//! treasuries is guaranteed by the unsigned types and needs no check here.

use std::fmt;

use crate::game::{Controller, FactionId, WorldState, CITY_COUNT};

/// Sanity bound: units one party holds in a single city.
/// Income tops out at a few hundred per round, so this is very generous.
pub const SANITY_MAX_UNITS_PER_GARRISON: u32 = 10_000_000;

/// Invariant violation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all world invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(state: &WorldState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    if state.cities().len() != CITY_COUNT {
        violations.push(InvariantViolation {
            message: format!("World has {} cities, expected {CITY_COUNT}", state.cities().len()),
        });
    }

    for (index, city) in state.cities().iter().enumerate() {
        // Name table must still resolve every city to its own slot.
        if state.index_of(&city.name) != Some(index) {
            violations.push(InvariantViolation {
                message: format!("City {index} ({}) is missing from the name table", city.name),
            });
        }

        for (party, garrison) in [("neutral", city.neutral), ("player", city.player), ("npc", city.npc)] {
            if garrison.soldiers > SANITY_MAX_UNITS_PER_GARRISON
                || garrison.tanks > SANITY_MAX_UNITS_PER_GARRISON
            {
                violations.push(InvariantViolation {
                    message: format!(
                        "City {} {party} garrison {:?} exceeds sanity max {SANITY_MAX_UNITS_PER_GARRISON} units",
                        city.name, garrison
                    ),
                });
            }
        }
    }

    // Headquarters never change hands; capture ends the game instead.
    for faction in FactionId::ALL {
        let hq = state.faction(faction).headquarters;
        match state.city(hq) {
            Some(city) if city.controller == Controller::from(faction) => {}
            Some(city) => violations.push(InvariantViolation {
                message: format!(
                    "{faction:?} headquarters {} is controlled by {:?}",
                    city.name, city.controller
                ),
            }),
            None => violations.push(InvariantViolation {
                message: format!("{faction:?} headquarters index {hq} is off the map"),
            }),
        }
    }

    if state.faction(FactionId::Player).headquarters == state.faction(FactionId::Npc).headquarters {
        violations.push(InvariantViolation {
            message: "Both factions share a headquarters".to_string(),
        });
    }

    violations
}

/// Assert all world invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(state: &WorldState) {
    let violations = check_invariants(state);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("World invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_state: &WorldState) {}
