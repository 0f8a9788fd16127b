//! Combat resolution.
//!
//! A city hosting units of both factions sees one round of tank attrition:
//! each side loses as many tanks as the other side fielded before the battle,
//! floored at zero. Soldiers never take losses, and a battle never changes who
//! controls the city.
//!
//! After the battles, [`assess_headquarters`] decides which headquarters
//! fell, which is what the win check reads.

use serde::{Deserialize, Serialize};

use crate::config::HqCaptureRule;
use crate::game::{City, CityIndex, FactionId, WorldState};

/// Losses in one contested city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleReport {
    /// Where the battle happened.
    pub city: CityIndex,
    /// Tanks the player lost.
    pub player_tanks_lost: u32,
    /// Tanks the opponent lost.
    pub npc_tanks_lost: u32,
}

/// Resolve one round of tank attrition in a single city.
///
/// Returns `None` if the city is not contested.
pub fn resolve_city_battle(city: &mut City) -> Option<(u32, u32)> {
    if !city.is_contested() {
        return None;
    }
    let player_tanks = city.player.tanks;
    let npc_tanks = city.npc.tanks;

    city.player.tanks = player_tanks.saturating_sub(npc_tanks);
    city.npc.tanks = npc_tanks.saturating_sub(player_tanks);

    Some((
        player_tanks - city.player.tanks,
        npc_tanks - city.npc.tanks,
    ))
}

/// Resolve combat in every contested city, in map order.
pub fn resolve_battles(state: &mut WorldState) -> Vec<BattleReport> {
    let mut reports = Vec::new();
    for (index, city) in state.cities_mut().iter_mut().enumerate() {
        if let Some((player_tanks_lost, npc_tanks_lost)) = resolve_city_battle(city) {
            tracing::debug!(
                city = %city.name,
                player_tanks_lost,
                npc_tanks_lost,
                "battle resolved"
            );
            reports.push(BattleReport {
                city: index,
                player_tanks_lost,
                npc_tanks_lost,
            });
        }
    }
    reports
}

/// Which headquarters fell this round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HeadquartersAssessment {
    /// The player's headquarters fell.
    pub player_falls: bool,
    /// The opponent's headquarters fell.
    pub npc_falls: bool,
}

impl HeadquartersAssessment {
    /// Whether the given faction's headquarters fell.
    #[must_use]
    pub const fn falls(&self, faction: FactionId) -> bool {
        match faction {
            FactionId::Player => self.player_falls,
            FactionId::Npc => self.npc_falls,
        }
    }
}

/// Whether the opposing garrison in `faction`'s headquarters outnumbers what
/// the defender has left there.
#[must_use]
pub fn headquarters_overrun(state: &WorldState, faction: FactionId) -> bool {
    let hq = state.faction(faction).headquarters;
    state.city(hq).is_some_and(|city| {
        city.garrison(faction.opponent()).total() > city.garrison(faction).total()
    })
}

/// Decide, after combat, which headquarters are captured under `rule`.
#[must_use]
pub fn assess_headquarters(state: &WorldState, rule: HqCaptureRule) -> HeadquartersAssessment {
    match rule {
        HqCaptureRule::Contested => HeadquartersAssessment {
            player_falls: headquarters_overrun(state, FactionId::Player),
            npc_falls: headquarters_overrun(state, FactionId::Npc),
        },
        HqCaptureRule::Legacy => HeadquartersAssessment {
            player_falls: true,
            npc_falls: false,
        },
    }
}
