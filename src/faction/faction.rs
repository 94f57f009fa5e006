//! Faction state - a player-controlled actor on the island

use serde::{Deserialize, Serialize};

use crate::core::types::{Color, FactionId, FactionProfile};
use crate::hex::CellCoord;

/// A faction and its mutable per-game state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faction {
    pub id: FactionId,
    pub color: Color,
    pub nickname: String,
    pub cell: CellCoord,
    pub strength: u32,
    pub alive: bool,
    /// False while the faction sits inside a stronghold as its garrison
    pub on_field: bool,
}

impl Faction {
    pub fn new(profile: &FactionProfile, cell: CellCoord, strength: u32) -> Self {
        Self {
            id: FactionId::new(profile.id),
            color: profile.color,
            nickname: profile.nickname.clone(),
            cell,
            strength,
            alive: true,
            on_field: true,
        }
    }

    /// Alive and standing on the field (not inside a stronghold)
    pub fn is_field_active(&self) -> bool {
        self.alive && self.on_field
    }

    pub fn is_garrisoned(&self) -> bool {
        self.alive && !self.on_field
    }

    /// Move onto `destination` as a field unit
    pub fn relocate(&mut self, destination: CellCoord) {
        self.cell = destination;
        self.on_field = true;
    }

    /// Mark dead; a dead faction never acts again
    pub fn kill(&mut self) {
        self.alive = false;
        self.on_field = false;
        self.strength = 0;
    }
}
