//! Turn scheduler - sequences factions and suspends on external signals
//!
//! The scheduler is an explicit state machine. Each turn goes
//! `AwaitingCamera -> AwaitingInput -> Resolving` and every transition is
//! driven by a `SchedulerEvent`, either passed straight to [`TurnScheduler::handle`]
//! or queued with [`TurnScheduler::enqueue`] and drained by [`TurnScheduler::pump`].
//!
//! Only the active faction may act. The roster for a round is fixed when
//! the round starts; factions that die mid-round are skipped when their
//! slot comes up and dropped from the next round's roster.

use std::collections::VecDeque;

use super::events::{SchedulerEvent, Wait};
use super::observer::{GameObserver, SkipReason};
use super::resolution::{resolve_move, MoveReport, MoveRules};
use crate::combat::CombatRules;
use crate::core::config::GameConfig;
use crate::core::error::{contract_violation, ConquestError, Result};
use crate::core::types::{FactionId, Round};
use crate::core::GameRng;
use crate::faction::{Board, Faction};
use crate::hex::CellCoord;
use crate::movement::movement_range;
use crate::terrain::{GenerationReport, TerrainField};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnPhase {
    /// Built but not started
    Idle,
    AwaitingCamera {
        faction: FactionId,
    },
    AwaitingInput {
        faction: FactionId,
        /// Sorted
        legal: Vec<CellCoord>,
    },
    /// Move applied, waiting for the settle delay
    Resolving {
        faction: FactionId,
    },
    GameOver {
        winner: Option<FactionId>,
    },
}

impl TurnPhase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::AwaitingCamera { .. } => "AwaitingCamera",
            Self::AwaitingInput { .. } => "AwaitingInput",
            Self::Resolving { .. } => "Resolving",
            Self::GameOver { .. } => "GameOver",
        }
    }

    /// The faction holding the turn token
    pub fn active_faction(&self) -> Option<FactionId> {
        match self {
            Self::AwaitingCamera { faction }
            | Self::AwaitingInput { faction, .. }
            | Self::Resolving { faction } => Some(*faction),
            Self::Idle | Self::GameOver { .. } => None,
        }
    }
}

pub struct TurnScheduler<O: GameObserver> {
    config: GameConfig,
    combat: CombatRules,
    terrain: TerrainField,
    board: Board,
    rng: GameRng,
    observer: O,
    generation: GenerationReport,

    phase: TurnPhase,
    roster: Vec<FactionId>,
    cursor: usize,
    round: Round,
    queue: VecDeque<SchedulerEvent>,
    last_move: Option<MoveReport>,
}

impl<O: GameObserver> TurnScheduler<O> {
    pub fn new(
        config: GameConfig,
        terrain: TerrainField,
        board: Board,
        rng: GameRng,
        observer: O,
        generation: GenerationReport,
    ) -> Self {
        let roster = board.alive_ids();
        Self {
            combat: CombatRules::from_config(&config),
            config,
            terrain,
            board,
            rng,
            observer,
            generation,
            phase: TurnPhase::Idle,
            roster,
            cursor: 0,
            round: 0,
            queue: VecDeque::new(),
            last_move: None,
        }
    }

    /// Begin the first turn
    pub fn start(&mut self) -> Result<()> {
        match self.phase {
            TurnPhase::Idle => {
                if self.board.alive_count() <= 1 {
                    self.finish();
                } else {
                    self.begin_next_turn();
                }
                Ok(())
            }
            TurnPhase::GameOver { .. } => Err(ConquestError::GameAlreadyOver),
            _ => Err(self.unexpected("start")),
        }
    }

    pub fn enqueue(&mut self, event: SchedulerEvent) {
        self.queue.push_back(event);
    }

    /// Drain the event queue, stopping at the first rejected event.
    ///
    /// Returns how many events were applied. Events behind a rejected one
    /// stay queued.
    pub fn pump(&mut self) -> Result<usize> {
        let mut applied = 0;
        while let Some(event) = self.queue.pop_front() {
            self.handle(event)?;
            applied += 1;
        }
        Ok(applied)
    }

    /// Apply one event. A rejected event leaves the scheduler unchanged.
    pub fn handle(&mut self, event: SchedulerEvent) -> Result<()> {
        match (&self.phase, event) {
            (TurnPhase::GameOver { .. }, _) => Err(ConquestError::GameAlreadyOver),
            (TurnPhase::AwaitingCamera { faction }, SchedulerEvent::TimerElapsed) => {
                let faction = *faction;
                self.publish_moves(faction)
            }
            (TurnPhase::AwaitingInput { faction, legal }, SchedulerEvent::InputReceived(choice)) => {
                let faction = *faction;
                match choice {
                    None => {
                        tracing::debug!("{} passes", faction);
                        self.observer.turn_skipped(faction, SkipReason::Passed);
                        self.begin_next_turn();
                        Ok(())
                    }
                    Some(cell) if legal.binary_search(&cell).is_ok() => self.apply_move(faction, cell),
                    Some(cell) => Err(ConquestError::IllegalDestination { faction, cell }),
                }
            }
            (
                TurnPhase::Resolving { .. },
                SchedulerEvent::AnimationSettled | SchedulerEvent::TimerElapsed,
            ) => {
                self.begin_next_turn();
                Ok(())
            }
            (_, event) => Err(self.unexpected(event.name())),
        }
    }

    /// What the host has to deliver next, if anything
    pub fn pending_wait(&self) -> Option<Wait> {
        match &self.phase {
            TurnPhase::AwaitingCamera { faction } => Some(Wait::Camera {
                faction: *faction,
                delay: self.config.camera_delay(),
            }),
            TurnPhase::AwaitingInput { faction, legal } => Some(Wait::Input {
                faction: *faction,
                legal: legal.clone(),
            }),
            TurnPhase::Resolving { faction } => Some(Wait::Settle {
                faction: *faction,
                delay: self.config.settle_delay(),
            }),
            TurnPhase::Idle | TurnPhase::GameOver { .. } => None,
        }
    }

    /// Movement budget for a faction's next move
    pub fn budget_for(&self, id: FactionId) -> u32 {
        if self.board.garrisoned_stronghold(id).is_some() {
            self.config.stronghold_movement_budget
        } else {
            self.config.movement_budget
        }
    }

    /// Sorted legal destinations for a live faction
    pub fn movement_range_for(&self, id: FactionId) -> Result<Vec<CellCoord>> {
        let faction = match self.board.live_faction(id) {
            Ok(f) => f,
            Err(e) => {
                contract_violation(&format!("movement range requested for {}", id));
                return Err(e);
            }
        };
        let range = movement_range(
            &self.terrain,
            &self.board.occupancy(),
            id,
            faction.cell,
            self.budget_for(id),
        );
        let mut cells: Vec<CellCoord> = range.into_iter().collect();
        cells.sort_unstable();
        Ok(cells)
    }

    fn unexpected(&self, event: &str) -> ConquestError {
        ConquestError::UnexpectedEvent {
            phase: self.phase.name().to_string(),
            event: event.to_string(),
        }
    }

    /// Hand the token to the next live faction, closing rounds as needed
    fn begin_next_turn(&mut self) {
        loop {
            if self.cursor >= self.roster.len() {
                self.end_round();
                if self.is_over() {
                    return;
                }
            }

            let id = self.roster[self.cursor];
            self.cursor += 1;

            let Some(faction) = self.board.faction(id).filter(|f| f.alive) else {
                continue;
            };
            let position = self
                .terrain
                .world_position(&faction.cell)
                .unwrap_or_else(|| {
                    let (x, z) = faction.cell.world_position();
                    (x, 0.0, z)
                });

            tracing::debug!("Round {}: {} to move", self.round, id);
            self.observer.turn_started(faction);
            self.observer.camera_focus(id, position);
            self.phase = TurnPhase::AwaitingCamera { faction: id };
            return;
        }
    }

    fn end_round(&mut self) {
        self.board.reinforce_all(self.config.reinforcement_per_turn);
        self.observer.round_completed(self.round);
        self.round += 1;

        // Next round's roster is a filter over this one
        let board = &self.board;
        self.roster = self
            .roster
            .iter()
            .copied()
            .filter(|id| board.faction(*id).map(|f| f.alive).unwrap_or(false))
            .collect();
        self.cursor = 0;

        if self.roster.len() <= 1 {
            self.finish();
        }
    }

    fn publish_moves(&mut self, faction: FactionId) -> Result<()> {
        let legal = self.movement_range_for(faction)?;
        if legal.is_empty() {
            tracing::warn!("{} has no legal moves, skipping turn", faction);
            self.observer.turn_skipped(faction, SkipReason::NoLegalMoves);
            self.begin_next_turn();
            return Ok(());
        }

        self.observer.legal_moves(faction, &legal);
        self.phase = TurnPhase::AwaitingInput { faction, legal };
        Ok(())
    }

    fn apply_move(&mut self, faction: FactionId, destination: CellCoord) -> Result<()> {
        let rules = MoveRules {
            combat: &self.combat,
            garrison_left_behind: self.config.garrison_left_behind,
        };
        let report = resolve_move(&mut self.board, &rules, &mut self.rng, faction, destination)?;

        self.observer.move_resolved(&report);
        for (id, cell) in report.respawned() {
            self.observer.faction_respawned(id, cell);
        }
        for id in report.eliminated() {
            self.observer.faction_eliminated(id);
        }
        self.last_move = Some(report);

        if self.board.alive_count() <= 1 {
            self.finish();
        } else {
            self.phase = TurnPhase::Resolving { faction };
        }
        Ok(())
    }

    fn finish(&mut self) {
        let alive = self.board.alive_ids();
        let winner = match alive.as_slice() {
            [sole] => Some(*sole),
            _ => None,
        };

        match winner.and_then(|id| self.board.faction(id)) {
            Some(f) => tracing::info!(
                "Game over after {} rounds: {} ({}) wins",
                self.round,
                f.nickname,
                f.id
            ),
            None => tracing::info!("Game over after {} rounds with no survivor", self.round),
        }

        self.observer
            .game_over(winner.and_then(|id| self.board.faction(id)));
        self.phase = TurnPhase::GameOver { winner };
        self.queue.clear();
    }

    pub fn phase(&self) -> &TurnPhase {
        &self.phase
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, TurnPhase::GameOver { .. })
    }

    pub fn winner(&self) -> Option<FactionId> {
        match self.phase {
            TurnPhase::GameOver { winner } => winner,
            _ => None,
        }
    }

    pub fn active_faction(&self) -> Option<&Faction> {
        self.phase
            .active_faction()
            .and_then(|id| self.board.faction(id))
    }

    /// Current legal destinations, empty outside `AwaitingInput`
    pub fn legal_moves(&self) -> &[CellCoord] {
        match &self.phase {
            TurnPhase::AwaitingInput { legal, .. } => legal,
            _ => &[],
        }
    }

    /// Completed rounds
    pub fn round(&self) -> Round {
        self.round
    }

    pub fn last_move(&self) -> Option<&MoveReport> {
        self.last_move.as_ref()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn terrain(&self) -> &TerrainField {
        &self.terrain
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn generation_report(&self) -> &GenerationReport {
        &self.generation
    }

    pub fn seed(&self) -> u32 {
        self.rng.seed()
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }
}
