//! Round state machine.
//!
//! ```text
//! RoundStart -> Economy -> PlayerDecision -> OpponentDecision -> Combat -> WinCheck
//!      ^                                                                     |
//!      +---------------------------- continue ------------------------------+
//!                                                                            |
//!                                                                        GameOver
//! ```
//!
//! The engine owns the [`WorldState`] for the whole game. It can be driven a
//! whole round at a time with [`TurnEngine::play_round`], or step by step
//! ([`TurnEngine::start_round`], [`TurnEngine::submit`],
//! [`TurnEngine::finish_round`]) when commands arrive one at a time from an
//! interactive player. Everything here is deterministic: the same world and
//! the same commands always give the same rounds.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::{EngineError, SetupError};
use crate::game::{
    assert_invariants, assess_headquarters, collect_income, resolve_battles, run_opponent,
    BattleReport, City, CityIndex, Command, CommandOutcome, CommandProcessor, FactionId,
    HeadquartersAssessment, IncomeReport, OpponentReport, WorldSnapshot, WorldState,
};

/// Steps of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the next round to begin.
    RoundStart,
    /// Income is being credited.
    Economy,
    /// The player is issuing commands.
    PlayerDecision,
    /// The scripted opponent is acting.
    OpponentDecision,
    /// Contested cities are fighting.
    Combat,
    /// Headquarters status is being checked.
    WinCheck,
    /// The game has ended; no more rounds run.
    GameOver,
}

/// Why the game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    /// At least one headquarters fell.
    HeadquartersCaptured,
    /// The configured round cap was reached with both headquarters standing.
    RoundLimit,
}

/// Final result of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOver {
    /// The winning faction. `None` if both headquarters fell in the same
    /// round or the round limit was reached.
    pub winner: Option<FactionId>,
    /// Why the game ended.
    pub reason: GameOverReason,
    /// Round in which the game ended (1-based).
    pub round: u32,
}

/// Result of the win check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinCheck {
    /// Both headquarters stand.
    Continue,
    /// At least one headquarters fell.
    Over {
        /// The faction whose headquarters still stands, if exactly one does.
        winner: Option<FactionId>,
    },
}

/// Read the headquarters flags. Pure: the same world always gives the same
/// answer.
#[must_use]
pub fn win_check(state: &WorldState) -> WinCheck {
    let player_lost = state.faction(FactionId::Player).headquarters_captured;
    let npc_lost = state.faction(FactionId::Npc).headquarters_captured;
    match (player_lost, npc_lost) {
        (false, false) => WinCheck::Continue,
        (true, false) => WinCheck::Over {
            winner: Some(FactionId::Npc),
        },
        (false, true) => WinCheck::Over {
            winner: Some(FactionId::Player),
        },
        (true, true) => WinCheck::Over { winner: None },
    }
}

/// A submitted command and what came of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRecord {
    /// The command as submitted.
    pub command: Command,
    /// Its effect, or why it had none.
    pub outcome: CommandOutcome,
}

/// World as it stood at the end of a phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseSnapshot {
    /// The phase just completed.
    pub phase: Phase,
    /// World after that phase.
    pub world: WorldSnapshot,
}

/// Everything that happened in one round, for the render layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReport {
    /// Round number (1-based).
    pub round: u32,
    /// Income credited in the economy phase.
    pub income: IncomeReport,
    /// Player commands in submission order.
    pub commands: Vec<CommandRecord>,
    /// What the opponent did.
    pub opponent: OpponentReport,
    /// Battles in map order.
    pub battles: Vec<BattleReport>,
    /// Headquarters decided to have fallen after combat.
    pub headquarters: HeadquartersAssessment,
    /// World after each phase, in phase order.
    pub snapshots: Vec<PhaseSnapshot>,
    /// Set if this round ended the game.
    pub game_over: Option<GameOver>,
}

/// Parts of the report collected before the player finishes.
#[derive(Debug, Clone, Default)]
struct RoundInProgress {
    income: IncomeReport,
    commands: Vec<CommandRecord>,
    snapshots: Vec<PhaseSnapshot>,
}

/// Drives rounds over an owned world.
#[derive(Debug, Clone)]
pub struct TurnEngine {
    state: WorldState,
    config: GameConfig,
    processor: CommandProcessor,
    round: u32,
    phase: Phase,
    outcome: Option<GameOver>,
    current: RoundInProgress,
    command_log: Vec<Vec<Command>>,
}

impl TurnEngine {
    /// Create an engine over an already validated world.
    #[must_use]
    pub fn new(state: WorldState, config: GameConfig) -> Self {
        Self {
            state,
            config,
            processor: CommandProcessor::new(config.player_moves_need_adjacency),
            round: 0,
            phase: Phase::RoundStart,
            outcome: None,
            current: RoundInProgress::default(),
            command_log: Vec::new(),
        }
    }

    /// Validate the setup collaborator's output and create an engine over it.
    ///
    /// # Errors
    ///
    /// Returns a [`SetupError`] if the cities or headquarters are invalid.
    pub fn from_setup(
        cities: Vec<City>,
        player_hq: CityIndex,
        npc_hq: CityIndex,
        config: GameConfig,
    ) -> Result<Self, SetupError> {
        Ok(Self::new(WorldState::new(cities, player_hq, npc_hq)?, config))
    }

    /// Read-only world access.
    #[must_use]
    pub fn state(&self) -> &WorldState {
        &self.state
    }

    /// Frozen copy of the world for display.
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        self.state.snapshot()
    }

    /// Rules in force.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of the current round, or of the last one played (0 before the
    /// first round starts).
    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    /// Final result, once the game has ended.
    #[must_use]
    pub const fn outcome(&self) -> Option<GameOver> {
        self.outcome
    }

    /// Whether the game has ended.
    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Commands submitted so far, one batch per round.
    #[must_use]
    pub fn command_log(&self) -> &[Vec<Command>] {
        &self.command_log
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), EngineError> {
        if self.phase == Phase::GameOver {
            return Err(EngineError::GameFinished);
        }
        if self.phase != expected {
            return Err(EngineError::OutOfPhase {
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }

    fn record_phase(&mut self, phase: Phase) {
        self.current.snapshots.push(PhaseSnapshot {
            phase,
            world: self.state.snapshot(),
        });
    }

    /// Begin a round: credit income and open the player's decision phase.
    ///
    /// # Errors
    ///
    /// Fails if a round is already under way or the game is over.
    pub fn start_round(&mut self) -> Result<IncomeReport, EngineError> {
        self.expect_phase(Phase::RoundStart)?;
        self.round += 1;
        self.current = RoundInProgress::default();
        self.command_log.push(Vec::new());
        tracing::info!(round = self.round, "round started");

        self.phase = Phase::Economy;
        let income = collect_income(&mut self.state);
        self.current.income = income;
        self.record_phase(Phase::Economy);

        self.phase = Phase::PlayerDecision;
        Ok(income)
    }

    /// Submit one player command. Invalid commands are rejected with no
    /// effect and the decision phase stays open; `EndTurn` closes it.
    ///
    /// # Errors
    ///
    /// Fails if the player is not currently deciding.
    pub fn submit(&mut self, command: Command) -> Result<CommandOutcome, EngineError> {
        self.expect_phase(Phase::PlayerDecision)?;

        let outcome = self.processor.apply(&mut self.state, &command);
        if matches!(command, Command::EndTurn) {
            self.close_player_decision();
        }
        if let Some(batch) = self.command_log.last_mut() {
            batch.push(command.clone());
        }
        self.current.commands.push(CommandRecord {
            command,
            outcome: outcome.clone(),
        });
        Ok(outcome)
    }

    fn close_player_decision(&mut self) {
        self.record_phase(Phase::PlayerDecision);
        self.phase = Phase::OpponentDecision;
    }

    /// Run the rest of the round: opponent, combat and win check.
    ///
    /// Closes the player's decision phase if `EndTurn` was not submitted.
    ///
    /// # Errors
    ///
    /// Fails if no round is under way or the game is over.
    pub fn finish_round(&mut self) -> Result<RoundReport, EngineError> {
        if self.phase == Phase::PlayerDecision {
            self.close_player_decision();
        }
        self.expect_phase(Phase::OpponentDecision)?;

        let opponent = run_opponent(&mut self.state);
        self.record_phase(Phase::OpponentDecision);

        self.phase = Phase::Combat;
        let battles = resolve_battles(&mut self.state);
        let headquarters = assess_headquarters(&self.state, self.config.hq_rule);
        for faction in FactionId::ALL {
            if headquarters.falls(faction) {
                self.state.faction_mut(faction).headquarters_captured = true;
            }
        }
        self.record_phase(Phase::Combat);

        self.phase = Phase::WinCheck;
        let game_over = self.check_game_over();
        self.record_phase(Phase::WinCheck);

        assert_invariants(&self.state);

        if let Some(over) = game_over {
            tracing::info!(round = self.round, winner = ?over.winner, reason = ?over.reason, "game over");
            self.outcome = Some(over);
            self.phase = Phase::GameOver;
        } else {
            self.phase = Phase::RoundStart;
        }

        let current = std::mem::take(&mut self.current);
        Ok(RoundReport {
            round: self.round,
            income: current.income,
            commands: current.commands,
            opponent,
            battles,
            headquarters,
            snapshots: current.snapshots,
            game_over,
        })
    }

    fn check_game_over(&self) -> Option<GameOver> {
        match win_check(&self.state) {
            WinCheck::Over { winner } => Some(GameOver {
                winner,
                reason: GameOverReason::HeadquartersCaptured,
                round: self.round,
            }),
            WinCheck::Continue => self
                .config
                .max_rounds
                .filter(|&limit| self.round >= limit)
                .map(|_| GameOver {
                    winner: None,
                    reason: GameOverReason::RoundLimit,
                    round: self.round,
                }),
        }
    }

    /// Play a whole round with a batch of commands. Commands after the first
    /// `EndTurn` are ignored; a batch without one ends the turn implicitly.
    ///
    /// # Errors
    ///
    /// Fails if a round is already under way or the game is over.
    pub fn play_round(
        &mut self,
        commands: impl IntoIterator<Item = Command>,
    ) -> Result<RoundReport, EngineError> {
        self.start_round()?;
        for command in commands {
            let ends_turn = matches!(command, Command::EndTurn);
            let _outcome = self.submit(command)?;
            if ends_turn {
                break;
            }
        }
        self.finish_round()
    }
}
