//! Seeded game setup.
//!
//! Picks six of sixteen city names, rolls each city's income and neutral
//! garrison, and draws the opponent's headquarters. Everything comes from a
//! single explicit seed, so the same seed and headquarters choice always give
//! the same scenario. The turn engine itself never draws random numbers.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::SetupError;
use crate::game::{City, CityIndex, Garrison, WorldState, CITY_COUNT};

/// Pool the six city names are drawn from.
pub const CITY_NAMES: [&str; 16] = [
    "Morrowind",
    "Skyrim",
    "Summerset Isles",
    "Hammerfell",
    "Narnia",
    "Elysium",
    "Hyrule",
    "Olympus",
    "Equestria",
    "Termina",
    "Konoha",
    "Paradis",
    "Oz",
    "Shijima",
    "Musubi",
    "Yosuga",
];

/// Income rolls fall in `0..MAX_INCOME`.
pub const MAX_INCOME: u32 = 100;
/// Neutral soldier rolls fall in `0..MAX_NEUTRAL_SOLDIERS`.
pub const MAX_NEUTRAL_SOLDIERS: u32 = 20;
/// Neutral tank rolls fall in `0..MAX_NEUTRAL_TANKS`.
pub const MAX_NEUTRAL_TANKS: u32 = 10;

/// Deterministic random source for setup.
#[derive(Clone, Debug)]
pub struct SetupRng {
    inner: ChaCha8Rng,
}

impl SetupRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Generate a random integer in `0..upper`.
    pub fn below(&mut self, upper: u32) -> u32 {
        self.inner.gen_range(0..upper)
    }

    /// Choose `amount` distinct elements, in draw order.
    pub fn choose_distinct<'a, T>(&mut self, slice: &'a [T], amount: usize) -> Vec<&'a T> {
        slice.choose_multiple(&mut self.inner, amount).collect()
    }

    /// Generate a random index in `0..len`. `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        self.inner.gen_range(0..len)
    }
}

/// A generated starting position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Seed the scenario was generated from.
    pub seed: u64,
    /// Cities in map order.
    pub cities: Vec<City>,
    /// Player headquarters, as chosen.
    pub player_hq: CityIndex,
    /// Opponent headquarters, as drawn.
    pub npc_hq: CityIndex,
}

impl Scenario {
    /// Generate the cities and draw the opponent's headquarters.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::HeadquartersOutOfRange`] if `player_hq` is not a
    /// city index.
    pub fn generate(seed: u64, player_hq: CityIndex) -> Result<Self, SetupError> {
        if player_hq >= CITY_COUNT {
            return Err(SetupError::HeadquartersOutOfRange(player_hq));
        }
        let mut rng = SetupRng::new(seed);

        let cities = rng
            .choose_distinct(&CITY_NAMES, CITY_COUNT)
            .into_iter()
            .map(|name| {
                let income = rng.below(MAX_INCOME);
                let soldiers = rng.below(MAX_NEUTRAL_SOLDIERS);
                let tanks = rng.below(MAX_NEUTRAL_TANKS);
                City::new(*name, income, Garrison::new(soldiers, tanks))
            })
            .collect();

        let candidates: Vec<CityIndex> = (0..CITY_COUNT).filter(|&i| i != player_hq).collect();
        let npc_hq = candidates[rng.index(candidates.len())];

        tracing::debug!(seed, player_hq, npc_hq, "scenario generated");
        Ok(Self {
            seed,
            cities,
            player_hq,
            npc_hq,
        })
    }

    /// Build the validated world for this scenario.
    ///
    /// # Errors
    ///
    /// Returns a [`SetupError`] if the scenario was edited into an invalid
    /// state.
    pub fn into_world(self) -> Result<WorldState, SetupError> {
        WorldState::new(self.cities, self.player_hq, self.npc_hq)
    }
}
