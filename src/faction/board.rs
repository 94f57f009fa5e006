//! Board - the live factions and the strongholds of one game
//!
//! Factions and strongholds live in separate vectors so a faction and the
//! stronghold it enters can be borrowed mutably at the same time.

use serde::{Deserialize, Serialize};

use super::faction::Faction;
use super::stronghold::Stronghold;
use crate::core::error::{ConquestError, Result};
use crate::core::types::FactionId;
use crate::hex::CellCoord;
use crate::movement::{Occupancy, StrongholdView};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Board {
    factions: Vec<Faction>,
    strongholds: Vec<Stronghold>,
}

impl Board {
    pub fn new(factions: Vec<Faction>, strongholds: Vec<Stronghold>) -> Self {
        Self {
            factions,
            strongholds,
        }
    }

    /// All factions, dead ones included, in id order of creation
    pub fn factions(&self) -> &[Faction] {
        &self.factions
    }

    pub fn strongholds(&self) -> &[Stronghold] {
        &self.strongholds
    }

    pub fn faction(&self, id: FactionId) -> Option<&Faction> {
        self.factions.iter().find(|f| f.id == id)
    }

    pub fn faction_mut(&mut self, id: FactionId) -> Option<&mut Faction> {
        self.factions.iter_mut().find(|f| f.id == id)
    }

    /// Look up a faction that must still be alive
    pub fn live_faction(&self, id: FactionId) -> Result<&Faction> {
        match self.faction(id) {
            Some(f) if f.alive => Ok(f),
            Some(_) => Err(ConquestError::FactionDead(id)),
            None => Err(ConquestError::FactionNotFound(id)),
        }
    }

    pub fn stronghold_at(&self, cell: &CellCoord) -> Option<&Stronghold> {
        self.strongholds.iter().find(|s| s.cell == *cell)
    }

    pub fn stronghold_at_mut(&mut self, cell: &CellCoord) -> Option<&mut Stronghold> {
        self.strongholds.iter_mut().find(|s| s.cell == *cell)
    }

    /// The live faction standing on the field at `cell`, if any
    pub fn field_faction_at(&self, cell: &CellCoord) -> Option<&Faction> {
        self.factions
            .iter()
            .find(|f| f.is_field_active() && f.cell == *cell)
    }

    /// First stronghold owned by a faction, in creation order
    pub fn first_owned_stronghold(&self, id: FactionId) -> Option<CellCoord> {
        self.strongholds
            .iter()
            .find(|s| s.is_owned_by(id))
            .map(|s| s.cell)
    }

    /// The owned stronghold a faction currently sits in as garrison
    pub fn garrisoned_stronghold(&self, id: FactionId) -> Option<&Stronghold> {
        let faction = self.faction(id)?;
        if !faction.is_garrisoned() {
            return None;
        }
        self.stronghold_at(&faction.cell)
            .filter(|s| s.is_owned_by(id))
    }

    pub fn alive_ids(&self) -> Vec<FactionId> {
        self.factions
            .iter()
            .filter(|f| f.alive)
            .map(|f| f.id)
            .collect()
    }

    pub fn alive_count(&self) -> usize {
        self.factions.iter().filter(|f| f.alive).count()
    }

    pub fn owned_count(&self, id: FactionId) -> usize {
        self.strongholds.iter().filter(|s| s.is_owned_by(id)).count()
    }

    /// Snapshot for the movement search
    pub fn occupancy(&self) -> Occupancy {
        let occupancy = self
            .factions
            .iter()
            .filter(|f| f.is_field_active())
            .fold(Occupancy::new(), |occ, f| occ.with_faction(f.id, f.cell));
        self.strongholds.iter().fold(occupancy, |occ, s| {
            occ.with_stronghold(StrongholdView {
                cell: s.cell,
                strength: s.strength,
                owner: s.owner,
            })
        })
    }

    /// A faction and the stronghold at `cell`, both mutable
    fn pair_mut(&mut self, id: FactionId, cell: &CellCoord) -> Result<(&mut Faction, &mut Stronghold)> {
        let Self {
            factions,
            strongholds,
        } = self;
        let faction = factions
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(ConquestError::FactionNotFound(id))?;
        let stronghold = strongholds
            .iter_mut()
            .find(|s| s.cell == *cell)
            .ok_or(ConquestError::IllegalDestination {
                faction: id,
                cell: *cell,
            })?;
        Ok((faction, stronghold))
    }

    /// Faction `id` enters the stronghold at `cell` as its garrison
    pub fn capture(&mut self, cell: &CellCoord, id: FactionId) -> Result<()> {
        let (faction, stronghold) = self.pair_mut(id, cell)?;
        stronghold.capture(faction)
    }

    /// Faction `id` walks out of the stronghold at `cell`
    pub fn leave(&mut self, cell: &CellCoord, id: FactionId, amount_to_take: u32) -> Result<u32> {
        let (faction, stronghold) = self.pair_mut(id, cell)?;
        Ok(stronghold.leave(faction, amount_to_take))
    }

    /// End-of-round growth for every stronghold
    pub fn reinforce_all(&mut self, per_turn: u32) {
        for stronghold in self.strongholds.iter_mut() {
            stronghold.reinforce(per_turn);
        }
    }

    /// Strength held by a faction: on the field plus every owned pool
    pub fn total_strength(&self, id: FactionId) -> u32 {
        let field = self.faction(id).map(|f| f.strength).unwrap_or(0);
        self.strongholds
            .iter()
            .filter(|s| s.is_owned_by(id))
            .fold(field, |acc, s| acc.saturating_add(s.strength))
    }
}
