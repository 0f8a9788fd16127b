#![no_main]

//! Full round fuzzer.
//!
//! Builds a world from fuzzer-chosen incomes, neutral garrisons and
//! headquarters, then plays rounds of fuzzer-chosen commands through the
//! engine:
//! 1. Economy
//! 2. Player commands (purchase, move, advance, end)
//! 3. Opponent purchase and advance
//! 4. Combat and headquarters assessment
//! 5. Win check
//!
//! Invariants are checked after every round. This catches integration bugs
//! that the unit tests of each phase miss.

use arbitrary::Arbitrary;
use connect_six::game::{check_invariants, CITY_COUNT};
use connect_six::{City, Command, GameConfig, Garrison, HqCaptureRule, TurnEngine, UnitKind};
use libfuzzer_sys::fuzz_target;

const NAMES: [&str; CITY_COUNT] = ["Morrowind", "Skyrim", "Hyrule", "Olympus", "Termina", "Oz"];

/// A fuzzer-generated command. City indices wrap; 6 and 7 name no city.
#[derive(Arbitrary, Debug, Clone)]
enum FuzzCommand {
    Purchase { tank: bool, count: u16, city: u8 },
    Move { from: u8, to: u8, soldiers: u16, tanks: u16 },
    Advance { from: u8, to: u8, soldiers: u16, tanks: u16 },
    EndTurn,
}

/// Structured input for round fuzzing.
#[derive(Arbitrary, Debug)]
struct RoundInput {
    /// Income of each city.
    incomes: [u8; CITY_COUNT],
    /// Neutral soldiers and tanks of each city.
    neutrals: [(u8, u8); CITY_COUNT],
    /// Player and opponent headquarters.
    headquarters: (u8, u8),
    /// Use the legacy capture rule.
    legacy: bool,
    /// Require adjacency for player moves.
    adjacent_moves: bool,
    /// Player commands, one batch per round.
    rounds: Vec<Vec<FuzzCommand>>,
}

fn city_name(index: u8) -> String {
    NAMES
        .get(usize::from(index % 8))
        .map_or_else(|| "Atlantis".to_string(), |name| (*name).to_string())
}

fn to_command(cmd: &FuzzCommand) -> Command {
    match *cmd {
        FuzzCommand::Purchase { tank, count, city } => Command::Purchase {
            unit: if tank { UnitKind::Tank } else { UnitKind::Soldier },
            count: u32::from(count),
            city: city_name(city),
        },
        FuzzCommand::Move {
            from,
            to,
            soldiers,
            tanks,
        } => Command::Move {
            from: city_name(from),
            to: city_name(to),
            soldiers: u32::from(soldiers),
            tanks: u32::from(tanks),
        },
        FuzzCommand::Advance {
            from,
            to,
            soldiers,
            tanks,
        } => Command::Advance {
            from: city_name(from),
            to: city_name(to),
            soldiers: u32::from(soldiers),
            tanks: u32::from(tanks),
        },
        FuzzCommand::EndTurn => Command::EndTurn,
    }
}

fuzz_target!(|input: RoundInput| {
    let cities: Vec<City> = NAMES
        .iter()
        .zip(input.incomes)
        .zip(input.neutrals)
        .map(|((name, income), (soldiers, tanks))| {
            City::new(
                *name,
                u32::from(income),
                Garrison::new(u32::from(soldiers), u32::from(tanks)),
            )
        })
        .collect();

    let config = GameConfig {
        hq_rule: if input.legacy {
            HqCaptureRule::Legacy
        } else {
            HqCaptureRule::Contested
        },
        player_moves_need_adjacency: input.adjacent_moves,
        max_rounds: Some(20),
    };

    // Invalid headquarters are a setup error, not a crash.
    let (player_hq, npc_hq) = input.headquarters;
    let Ok(mut engine) =
        TurnEngine::from_setup(cities, usize::from(player_hq), usize::from(npc_hq), config)
    else {
        return;
    };

    for batch in input.rounds.iter().take(20) {
        if engine.is_game_over() {
            break;
        }
        let commands: Vec<Command> = batch.iter().take(16).map(to_command).collect();
        engine.play_round(commands).unwrap();

        let violations = check_invariants(engine.state());
        assert!(violations.is_empty(), "Invariants violated: {violations:?}");
    }
});
