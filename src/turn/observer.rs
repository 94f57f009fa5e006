//! Observer hooks for hosts (UI, camera, logs)
//!
//! The scheduler reports everything outward through a `GameObserver` it
//! owns. Every method has a no-op default so hosts only implement what
//! they draw.

use serde::{Deserialize, Serialize};

use super::resolution::MoveReport;
use crate::core::types::{Color, FactionId, Round};
use crate::faction::Faction;
use crate::hex::CellCoord;

/// Why a turn ended without a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    NoLegalMoves,
    Passed,
}

pub trait GameObserver {
    fn turn_started(&mut self, _faction: &Faction) {}

    /// World position (x, height, z) the camera should pan to
    fn camera_focus(&mut self, _faction: FactionId, _position: (f32, f32, f32)) {}

    /// Destinations to highlight for the active faction
    fn legal_moves(&mut self, _faction: FactionId, _cells: &[CellCoord]) {}

    fn turn_skipped(&mut self, _faction: FactionId, _reason: SkipReason) {}

    fn move_resolved(&mut self, _report: &MoveReport) {}

    fn faction_respawned(&mut self, _faction: FactionId, _cell: CellCoord) {}

    fn faction_eliminated(&mut self, _faction: FactionId) {}

    fn round_completed(&mut self, _round: Round) {}

    /// `None` when no faction survived
    fn game_over(&mut self, _winner: Option<&Faction>) {}
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl GameObserver for NullObserver {}

/// One recorded notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObservedEvent {
    TurnStarted {
        faction: FactionId,
        color: Color,
        nickname: String,
    },
    CameraFocus {
        faction: FactionId,
        position: (f32, f32, f32),
    },
    LegalMoves {
        faction: FactionId,
        cells: Vec<CellCoord>,
    },
    TurnSkipped {
        faction: FactionId,
        reason: SkipReason,
    },
    MoveResolved(MoveReport),
    FactionRespawned {
        faction: FactionId,
        cell: CellCoord,
    },
    FactionEliminated(FactionId),
    RoundCompleted(Round),
    GameOver {
        winner: Option<FactionId>,
        nickname: Option<String>,
        color: Option<Color>,
    },
}

/// Observer that records every notification in order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    pub events: Vec<ObservedEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn moves(&self) -> impl Iterator<Item = &MoveReport> + '_ {
        self.events.iter().filter_map(|e| match e {
            ObservedEvent::MoveResolved(report) => Some(report),
            _ => None,
        })
    }

    pub fn eliminations(&self) -> Vec<FactionId> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ObservedEvent::FactionEliminated(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn skips(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, ObservedEvent::TurnSkipped { .. }))
            .count()
    }
}

impl GameObserver for EventLog {
    fn turn_started(&mut self, faction: &Faction) {
        self.events.push(ObservedEvent::TurnStarted {
            faction: faction.id,
            color: faction.color,
            nickname: faction.nickname.clone(),
        });
    }

    fn camera_focus(&mut self, faction: FactionId, position: (f32, f32, f32)) {
        self.events.push(ObservedEvent::CameraFocus { faction, position });
    }

    fn legal_moves(&mut self, faction: FactionId, cells: &[CellCoord]) {
        self.events.push(ObservedEvent::LegalMoves {
            faction,
            cells: cells.to_vec(),
        });
    }

    fn turn_skipped(&mut self, faction: FactionId, reason: SkipReason) {
        self.events.push(ObservedEvent::TurnSkipped { faction, reason });
    }

    fn move_resolved(&mut self, report: &MoveReport) {
        self.events.push(ObservedEvent::MoveResolved(report.clone()));
    }

    fn faction_respawned(&mut self, faction: FactionId, cell: CellCoord) {
        self.events.push(ObservedEvent::FactionRespawned { faction, cell });
    }

    fn faction_eliminated(&mut self, faction: FactionId) {
        self.events.push(ObservedEvent::FactionEliminated(faction));
    }

    fn round_completed(&mut self, round: Round) {
        self.events.push(ObservedEvent::RoundCompleted(round));
    }

    fn game_over(&mut self, winner: Option<&Faction>) {
        self.events.push(ObservedEvent::GameOver {
            winner: winner.map(|f| f.id),
            nickname: winner.map(|f| f.nickname.clone()),
            color: winner.map(|f| f.color),
        });
    }
}
