//! World state management.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::SetupError;
use crate::game::{Adjacency, City, CityIndex, Controller, Faction, FactionId, Garrison, CITY_COUNT};

/// The six cities plus both faction records.
///
/// Built once from the setup collaborator's output and owned by the
/// [`TurnEngine`](crate::engine::TurnEngine) for the whole game. Cities are
/// never added or removed; commands resolve names through a lookup table
/// built here.
#[derive(Debug, Clone)]
pub struct WorldState {
    cities: Vec<City>,
    player: Faction,
    npc: Faction,
    by_name: HashMap<String, CityIndex>,
    adjacency: Adjacency,
}

impl WorldState {
    /// Validate the setup and hand each headquarters to its faction.
    ///
    /// Each headquarters city becomes controlled by its faction, and the
    /// neutral units stationed there join that faction's garrison.
    ///
    /// # Errors
    ///
    /// Returns a [`SetupError`] if there are not exactly six cities, a name
    /// repeats, a headquarters index is out of range, or both factions chose
    /// the same city.
    pub fn new(
        mut cities: Vec<City>,
        player_hq: CityIndex,
        npc_hq: CityIndex,
    ) -> Result<Self, SetupError> {
        if cities.len() != CITY_COUNT {
            return Err(SetupError::WrongCityCount(cities.len()));
        }
        for hq in [player_hq, npc_hq] {
            if hq >= CITY_COUNT {
                return Err(SetupError::HeadquartersOutOfRange(hq));
            }
        }
        if player_hq == npc_hq {
            return Err(SetupError::SharedHeadquarters(player_hq));
        }

        let mut by_name = HashMap::with_capacity(CITY_COUNT);
        for (index, city) in cities.iter().enumerate() {
            if by_name.insert(city.name.clone(), index).is_some() {
                return Err(SetupError::DuplicateCityName(city.name.clone()));
            }
        }

        for (faction, hq) in [(FactionId::Player, player_hq), (FactionId::Npc, npc_hq)] {
            let city = &mut cities[hq];
            city.controller = Controller::from(faction);
            let garrison = city.neutral.take_all();
            city.garrison_mut(faction).absorb(garrison);
        }

        Ok(Self {
            cities,
            player: Faction::new(FactionId::Player, player_hq),
            npc: Faction::new(FactionId::Npc, npc_hq),
            by_name,
            adjacency: Adjacency::linear(CITY_COUNT),
        })
    }

    /// All cities in map order.
    #[must_use]
    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    /// Get a city by index.
    #[must_use]
    pub fn city(&self, index: CityIndex) -> Option<&City> {
        self.cities.get(index)
    }

    /// Get a mutable city by index.
    #[must_use]
    pub fn city_mut(&mut self, index: CityIndex) -> Option<&mut City> {
        self.cities.get_mut(index)
    }

    /// Mutable access to every city.
    pub fn cities_mut(&mut self) -> &mut [City] {
        &mut self.cities
    }

    /// Resolve a city name to its index.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<CityIndex> {
        self.by_name.get(name).copied()
    }

    /// The neighbor table.
    #[must_use]
    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    /// Get a faction record.
    #[must_use]
    pub const fn faction(&self, id: FactionId) -> &Faction {
        match id {
            FactionId::Player => &self.player,
            FactionId::Npc => &self.npc,
        }
    }

    /// Get a mutable faction record.
    pub fn faction_mut(&mut self, id: FactionId) -> &mut Faction {
        match id {
            FactionId::Player => &mut self.player,
            FactionId::Npc => &mut self.npc,
        }
    }

    /// Indices of the cities a faction controls, in map order.
    pub fn controlled_by(&self, faction: FactionId) -> impl Iterator<Item = CityIndex> + '_ {
        self.cities
            .iter()
            .enumerate()
            .filter(move |(_, city)| city.controller.is(faction))
            .map(|(index, _)| index)
    }

    /// Whether the city at `index` is controlled by `faction`.
    #[must_use]
    pub fn controls(&self, faction: FactionId, index: CityIndex) -> bool {
        self.city(index).is_some_and(|city| city.controller.is(faction))
    }

    /// Total soldiers and tanks on the map across all parties.
    #[must_use]
    pub fn unit_totals(&self) -> Garrison {
        self.cities.iter().fold(Garrison::default(), |mut acc, city| {
            acc.absorb(city.neutral);
            acc.absorb(city.player);
            acc.absorb(city.npc);
            acc
        })
    }

    /// Read-only copy of everything the render layer may show.
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            cities: self
                .cities
                .iter()
                .map(|city| CitySnapshot {
                    name: city.name.clone(),
                    income_per_turn: city.income_per_turn,
                    controller: city.controller,
                    neutral: city.neutral,
                    player: city.player,
                    npc: city.npc,
                })
                .collect(),
            player: FactionSnapshot::from(&self.player),
            npc: FactionSnapshot::from(&self.npc),
        }
    }
}

/// Frozen view of one city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitySnapshot {
    /// City name.
    pub name: String,
    /// Income credited to the controller each round.
    pub income_per_turn: u32,
    /// Current holder.
    pub controller: Controller,
    /// Neutral garrison.
    pub neutral: Garrison,
    /// Player garrison.
    pub player: Garrison,
    /// NPC garrison.
    pub npc: Garrison,
}

/// Frozen view of one faction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionSnapshot {
    /// Spendable money.
    pub treasury: u32,
    /// Headquarters city index.
    pub headquarters: CityIndex,
    /// Whether the headquarters has fallen.
    pub headquarters_captured: bool,
}

impl From<&Faction> for FactionSnapshot {
    fn from(faction: &Faction) -> Self {
        Self {
            treasury: faction.treasury,
            headquarters: faction.headquarters,
            headquarters_captured: faction.headquarters_captured,
        }
    }
}

/// Frozen view of the whole world, taken after a phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Cities in map order.
    pub cities: Vec<CitySnapshot>,
    /// Player faction.
    pub player: FactionSnapshot,
    /// NPC faction.
    pub npc: FactionSnapshot,
}

impl WorldSnapshot {
    /// Faction snapshot by id.
    #[must_use]
    pub const fn faction(&self, id: FactionId) -> &FactionSnapshot {
        match id {
            FactionId::Player => &self.player,
            FactionId::Npc => &self.npc,
        }
    }
}
