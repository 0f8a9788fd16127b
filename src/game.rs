//! Game layer for Connect Six.
//!
//! Implements the world model and the per-phase rules of a round:
//! - Six cities on a line, each with neutral, player and NPC garrisons
//! - Two factions with a treasury and a headquarters
//! - Economy (income from controlled cities)
//! - Player commands (purchase, move, advance)
//! - The scripted opponent's purchase and advance policy
//! - Tank attrition combat and headquarters assessment

mod city;
mod combat;
mod commands;
mod economy;
mod faction;
pub mod invariants;
mod map;
mod opponent;
mod state;

pub use city::{City, Controller, Garrison, Shortage, UnitKind};
pub use combat::{
    assess_headquarters, headquarters_overrun, resolve_battles, resolve_city_battle, BattleReport,
    HeadquartersAssessment,
};
pub use commands::{Command, CommandEffect, CommandOutcome, CommandProcessor, CommandRejection};
pub use economy::{collect_income, income_of, IncomeReport};
pub use faction::{Faction, FactionId};
pub use invariants::{assert_invariants, check_invariants, InvariantViolation};
pub use map::{Adjacency, CityIndex, CITY_COUNT};
pub use opponent::{run_opponent, weakest_city, OpponentReport, Relocation, MIN_PURCHASE_COST};
pub use state::{CitySnapshot, FactionSnapshot, WorldSnapshot, WorldState};
