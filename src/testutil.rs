//! Shared fixtures for unit tests.

use crate::game::{City, CityIndex, Garrison, WorldState};

/// Six cities with small neutral garrisons and distinct incomes.
///
/// City `i` earns `10 * (i + 1)` and starts with `i + 1` soldiers and `i`
/// tanks.
pub(crate) fn sample_cities() -> Vec<City> {
    ["Morrowind", "Skyrim", "Hyrule", "Olympus", "Termina", "Oz"]
        .iter()
        .zip(1u32..)
        .map(|(name, n)| City::new(*name, 10 * n, Garrison::new(n, n - 1)))
        .collect()
}

/// A world over [`sample_cities`] with the given headquarters.
pub(crate) fn sample_world(player_hq: CityIndex, npc_hq: CityIndex) -> WorldState {
    WorldState::new(sample_cities(), player_hq, npc_hq).unwrap()
}

/// Six cities with no income and no neutral units.
pub(crate) fn empty_world(player_hq: CityIndex, npc_hq: CityIndex) -> WorldState {
    let cities = ["A", "B", "C", "D", "E", "F"]
        .iter()
        .map(|name| City::new(*name, 0, Garrison::default()))
        .collect();
    WorldState::new(cities, player_hq, npc_hq).unwrap()
}
