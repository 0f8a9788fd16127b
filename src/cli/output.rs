//! Output formatting utilities for CLI.

use connect_six::engine::{GameOver, GameOverReason, RoundReport};
use connect_six::game::{
    CityIndex, CommandEffect, CommandOutcome, Controller, FactionId, Garrison, OpponentReport,
    WorldSnapshot,
};
use connect_six::{GameRecord, Scenario};
use serde::Serialize;

/// JSON-serializable replay: the recording plus every recomputed round.
#[derive(Debug, Serialize)]
pub(super) struct JsonReplay<'a> {
    /// Setup seed.
    pub(super) seed: u64,
    /// Final result (null if the game was left unfinished).
    pub(super) outcome: Option<GameOver>,
    /// Round reports in order.
    pub(super) rounds: &'a [RoundReport],
}

impl<'a> JsonReplay<'a> {
    /// Create from a recording and its replayed rounds.
    pub(super) fn new(record: &GameRecord, rounds: &'a [RoundReport]) -> Self {
        Self {
            seed: record.seed,
            outcome: record.outcome,
            rounds,
        }
    }
}

fn name(world: &WorldSnapshot, index: CityIndex) -> &str {
    world.cities.get(index).map_or("?", |city| city.name.as_str())
}

fn faction_label(faction: FactionId) -> &'static str {
    match faction {
        FactionId::Player => "You",
        FactionId::Npc => "Opponent",
    }
}

fn controller_label(controller: Controller) -> &'static str {
    match controller {
        Controller::Unoccupied => "-",
        Controller::Player => "you",
        Controller::Npc => "opponent",
    }
}

fn garrison_cell(garrison: Garrison) -> String {
    format!("{}/{}", garrison.soldiers, garrison.tanks)
}

/// Format the map as a table. Garrisons are soldiers/tanks.
pub(super) fn format_world(world: &WorldSnapshot) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "  {:<2} {:<16} {:<9} {:>6} {:>9} {:>9} {:>9}\n",
        "#", "City", "Held by", "Income", "Neutral", "Yours", "Opponent"
    ));
    for (i, city) in world.cities.iter().enumerate() {
        let mut marker = String::new();
        if i == world.player.headquarters {
            marker.push_str(" [your HQ]");
        }
        if i == world.npc.headquarters {
            marker.push_str(" [opponent HQ]");
        }
        output.push_str(&format!(
            "  {:<2} {:<16} {:<9} {:>6} {:>9} {:>9} {:>9}{marker}\n",
            i,
            city.name,
            controller_label(city.controller),
            city.income_per_turn,
            garrison_cell(city.neutral),
            garrison_cell(city.player),
            garrison_cell(city.npc),
        ));
    }
    output.push_str(&format!(
        "  Treasury: you {}, opponent {}\n",
        world.player.treasury, world.npc.treasury
    ));

    output
}

/// Format the effect of one command, or why it had none.
pub(super) fn format_outcome(outcome: &CommandOutcome, world: &WorldSnapshot) -> String {
    match outcome {
        Ok(CommandEffect::Purchased {
            city,
            unit,
            count,
            cost,
        }) => format!("Bought {count} {unit:?} for {cost} in {}", name(world, *city)),
        Ok(CommandEffect::Moved {
            from,
            to,
            soldiers,
            tanks,
        }) => format!(
            "Moved {soldiers} soldiers and {tanks} tanks from {} to {}",
            name(world, *from),
            name(world, *to)
        ),
        Ok(CommandEffect::Advanced {
            from,
            to,
            soldiers,
            tanks,
            captured,
        }) => {
            let mut line = format!(
                "Advanced {soldiers} soldiers and {tanks} tanks from {} into {}",
                name(world, *from),
                name(world, *to)
            );
            if *captured {
                line.push_str(" and took it");
            }
            line
        }
        Ok(CommandEffect::TurnEnded) => "Turn ended".to_string(),
        Err(rejection) => format!("No effect: {rejection}"),
    }
}

/// Format everything after the player's decisions: the opponent, battles and
/// the end of the game.
pub(super) fn format_round_end(report: &RoundReport) -> String {
    let Some(world) = report.snapshots.last().map(|s| &s.world) else {
        return String::new();
    };
    let mut output = String::new();

    match &report.opponent {
        OpponentReport::Idle => output.push_str("Opponent waits.\n"),
        OpponentReport::Acted {
            target,
            tanks_bought,
            soldiers_bought,
            relocations,
        } => {
            output.push_str(&format!(
                "Opponent bought {tanks_bought} tanks and {soldiers_bought} soldiers in {}\n",
                name(world, *target)
            ));
            for relocation in relocations {
                output.push_str(&format!(
                    "Opponent moved {} soldiers and {} tanks from {} to {}{}\n",
                    relocation.soldiers,
                    relocation.tanks,
                    name(world, relocation.from),
                    name(world, relocation.to),
                    if relocation.captured { " and took it" } else { "" }
                ));
            }
        }
    }

    for battle in &report.battles {
        output.push_str(&format!(
            "Battle in {}: you lost {} tanks, opponent lost {}\n",
            name(world, battle.city),
            battle.player_tanks_lost,
            battle.npc_tanks_lost
        ));
    }

    if let Some(over) = report.game_over {
        output.push_str(&format_game_over(&over));
        output.push('\n');
    }

    output
}

/// Format a whole round, for replays.
pub(super) fn format_round(report: &RoundReport) -> String {
    let mut output = format!(
        "=== Round {} ===\nIncome: you +{}, opponent +{}\n",
        report.round, report.income.player, report.income.npc
    );
    if let Some(world) = report.snapshots.first().map(|s| &s.world) {
        for record in &report.commands {
            output.push_str(&format_outcome(&record.outcome, world));
            output.push('\n');
        }
    }
    output.push_str(&format_round_end(report));
    if let Some(world) = report.snapshots.last().map(|s| &s.world) {
        output.push_str(&format_world(world));
    }
    output
}

/// One-line summary of how the game ended.
pub(super) fn format_game_over(over: &GameOver) -> String {
    match (over.reason, over.winner) {
        (GameOverReason::HeadquartersCaptured, Some(winner)) => format!(
            "Game over in round {}: {} win",
            over.round,
            faction_label(winner)
        ),
        (GameOverReason::HeadquartersCaptured, None) => format!(
            "Game over in round {}: both headquarters fell",
            over.round
        ),
        (GameOverReason::RoundLimit, _) => {
            format!("Game over: round limit reached after round {}", over.round)
        }
    }
}

/// Format a generated scenario before any round runs.
pub(super) fn format_scenario(scenario: &Scenario) -> String {
    let mut output = format!("Scenario (seed: {})\n", scenario.seed);
    for (i, city) in scenario.cities.iter().enumerate() {
        let marker = if i == scenario.player_hq {
            "  [your HQ]"
        } else if i == scenario.npc_hq {
            "  [opponent HQ]"
        } else {
            ""
        };
        output.push_str(&format!(
            "  {i} {:<16} income {:>2}, neutral {:>2} soldiers {:>2} tanks{marker}\n",
            city.name, city.income_per_turn, city.neutral.soldiers, city.neutral.tanks
        ));
    }
    output
}
