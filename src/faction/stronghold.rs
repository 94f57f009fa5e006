//! Strongholds - home cities and enemy holdings with a strength pool
//!
//! Strongholds are created at game start and never destroyed. Their owner
//! changes through capture and falls back to unowned whenever the strength
//! pool empties outside of a capture.

use serde::{Deserialize, Serialize};

use super::faction::Faction;
use crate::core::error::{contract_violation, ConquestError, Result};
use crate::core::types::FactionId;
use crate::hex::CellCoord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrongholdKind {
    /// A faction's starting city, no strength cap
    HomeCity,
    /// Neutral holding with a strength cap while unowned
    Enemy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stronghold {
    pub cell: CellCoord,
    pub kind: StrongholdKind,
    pub strength: u32,
    /// Only enforced while unowned
    pub cap: Option<u32>,
    pub owner: Option<FactionId>,
}

impl Stronghold {
    pub fn home_city(cell: CellCoord) -> Self {
        Self {
            cell,
            kind: StrongholdKind::HomeCity,
            strength: 0,
            cap: None,
            owner: None,
        }
    }

    /// Enemy stronghold; initial strength is clamped to the cap
    pub fn enemy(cell: CellCoord, strength: u32, cap: u32) -> Self {
        Self {
            cell,
            kind: StrongholdKind::Enemy,
            strength: strength.min(cap),
            cap: Some(cap),
            owner: None,
        }
    }

    pub fn is_owned_by(&self, faction: FactionId) -> bool {
        self.owner == Some(faction)
    }

    /// Blocks `faction` from passing through (still attackable)
    pub fn is_hostile_to(&self, faction: FactionId) -> bool {
        self.strength > 0 && !self.is_owned_by(faction)
    }

    /// Move a faction inside as the garrison.
    ///
    /// Legal only when the pool is empty or the faction already owns the
    /// stronghold. The faction's strength joins the pool and the faction
    /// leaves the field.
    pub fn capture(&mut self, faction: &mut Faction) -> Result<()> {
        if self.strength > 0 && !self.is_owned_by(faction.id) {
            return Err(ConquestError::CaptureRejected {
                cell: self.cell,
                strength: self.strength,
            });
        }

        self.owner = Some(faction.id);
        self.strength = self.strength.saturating_add(faction.strength);
        faction.strength = 0;
        faction.cell = self.cell;
        faction.on_field = false;

        tracing::debug!(
            "{} garrisons {} with strength {}",
            faction.id,
            self.cell,
            self.strength
        );
        Ok(())
    }

    /// Walk a garrison out, taking `amount_to_take` with it.
    ///
    /// Taking less than the pool keeps ownership with the remainder;
    /// anything else takes the whole pool and the stronghold reverts to
    /// unowned. Returns the strength taken.
    pub fn leave(&mut self, faction: &mut Faction, amount_to_take: u32) -> u32 {
        if self.owner.is_some() && !self.is_owned_by(faction.id) {
            contract_violation(&format!(
                "{} tried to leave {} owned by someone else",
                faction.id, self.cell
            ));
            return 0;
        }

        let taken = if amount_to_take < self.strength {
            self.strength -= amount_to_take;
            self.owner = Some(faction.id);
            amount_to_take
        } else {
            let all = self.strength;
            self.strength = 0;
            self.owner = None;
            all
        };

        faction.strength = faction.strength.saturating_add(taken);
        faction.relocate(self.cell);
        taken
    }

    /// End-of-round growth.
    ///
    /// Owned strongholds grow without bound; unowned ones grow up to their
    /// cap. An abandoned (unowned, empty) stronghold stays empty.
    pub fn reinforce(&mut self, per_turn: u32) {
        match self.owner {
            Some(_) => self.strength = self.strength.saturating_add(per_turn),
            None if self.strength > 0 => {
                let grown = self.strength.saturating_add(per_turn);
                self.strength = match self.cap {
                    Some(cap) => grown.min(cap),
                    None => grown,
                };
            }
            None => {}
        }
    }

    /// Overwrite the pool after a clash; an empty pool has no owner
    pub fn set_strength(&mut self, strength: u32) {
        self.strength = strength;
        if strength == 0 {
            self.owner = None;
        }
    }
}
