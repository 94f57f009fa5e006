//! Move resolution
//!
//! Applies one chosen destination to the board: walking out of a garrison,
//! combat against a rival or a stronghold, capture, relocation, and the
//! respawn or elimination of whoever lost.

use serde::{Deserialize, Serialize};

use crate::combat::{resolve_detailed, CombatOutcome, CombatRules};
use crate::core::error::{contract_violation, ConquestError, Result};
use crate::core::types::FactionId;
use crate::core::GameRng;
use crate::faction::Board;
use crate::hex::CellCoord;

/// Who the mover fought
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Defender {
    Faction(FactionId),
    Stronghold {
        cell: CellCoord,
        owner: Option<FactionId>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClashResult {
    DefenderDefeated,
    AttackerDefeated,
    /// Both sides survived, nobody moves
    Skirmish,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// Walked onto open terrain
    Moved,
    /// Entered an empty or friendly stronghold
    Garrisoned,
    Clash {
        defender: Defender,
        combat: CombatOutcome,
        result: ClashResult,
    },
    /// A zero-strength mover reached a contested cell and may not attack
    Stalled,
}

/// What happened to a faction that lost a clash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Defeat {
    Respawned(CellCoord),
    Eliminated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveReport {
    pub faction: FactionId,
    pub from: CellCoord,
    pub destination: CellCoord,
    /// Strength carried out of the origin stronghold, if the mover left one
    pub taken_from_origin: Option<u32>,
    pub outcome: MoveOutcome,
    /// Where the mover stands once everything is applied
    pub settled_at: CellCoord,
    pub defeats: Vec<(FactionId, Defeat)>,
}

impl MoveReport {
    pub fn eliminated(&self) -> impl Iterator<Item = FactionId> + '_ {
        self.defeats
            .iter()
            .filter(|(_, d)| *d == Defeat::Eliminated)
            .map(|(id, _)| *id)
    }

    pub fn respawned(&self) -> impl Iterator<Item = (FactionId, CellCoord)> + '_ {
        self.defeats.iter().filter_map(|(id, d)| match d {
            Defeat::Respawned(cell) => Some((*id, *cell)),
            Defeat::Eliminated => None,
        })
    }
}

/// Inputs to `resolve_move` beyond the board itself
pub struct MoveRules<'a> {
    pub combat: &'a CombatRules,
    /// Strength left inside a stronghold the mover walks out of
    pub garrison_left_behind: u32,
}

/// How much to take out of a garrison holding `pool`
fn amount_to_take(pool: u32, garrison_left_behind: u32) -> u32 {
    if pool > garrison_left_behind {
        pool - garrison_left_behind
    } else {
        pool
    }
}

/// Capture that the caller has already checked; a rejection is a broken contract
fn checked_capture(board: &mut Board, cell: &CellCoord, id: FactionId) -> Result<()> {
    board.capture(cell, id).map_err(|error| {
        if matches!(error, ConquestError::CaptureRejected { .. }) {
            contract_violation(&error.to_string());
        }
        error
    })
}

/// Put a defeated faction back into a stronghold it owns, or kill it
pub fn handle_defeat(board: &mut Board, id: FactionId) -> Result<Defeat> {
    if let Some(cell) = board.first_owned_stronghold(id) {
        checked_capture(board, &cell, id)?;
        tracing::info!("{} falls back to {}", id, cell);
        return Ok(Defeat::Respawned(cell));
    }

    board
        .faction_mut(id)
        .ok_or(ConquestError::FactionNotFound(id))?
        .kill();
    tracing::info!("{} has been eliminated", id);
    Ok(Defeat::Eliminated)
}

/// Another faction still garrisoned in an empty stronghold at `cell` loses it
fn evict_garrison(
    board: &mut Board,
    cell: CellCoord,
    mover: FactionId,
    defeats: &mut Vec<(FactionId, Defeat)>,
) -> Result<()> {
    let sheltered = board
        .factions()
        .iter()
        .find(|f| f.id != mover && f.is_garrisoned() && f.cell == cell)
        .map(|f| f.id);
    if let Some(id) = sheltered {
        if let Some(stronghold) = board.stronghold_at_mut(&cell) {
            stronghold.set_strength(0);
        }
        defeats.push((id, handle_defeat(board, id)?));
    }
    Ok(())
}

/// Move into `destination`, capturing it if it is a stronghold.
///
/// Returns `None` when a garrisoned rival stronghold occupies the cell.
fn occupy(
    board: &mut Board,
    mover: FactionId,
    destination: CellCoord,
    defeats: &mut Vec<(FactionId, Defeat)>,
) -> Result<Option<MoveOutcome>> {
    match board.stronghold_at(&destination) {
        Some(s) if s.is_hostile_to(mover) => Ok(None),
        Some(_) => {
            evict_garrison(board, destination, mover, defeats)?;
            checked_capture(board, &destination, mover)?;
            Ok(Some(MoveOutcome::Garrisoned))
        }
        None => {
            board
                .faction_mut(mover)
                .ok_or(ConquestError::FactionNotFound(mover))?
                .relocate(destination);
            Ok(Some(MoveOutcome::Moved))
        }
    }
}

fn set_faction_strength(board: &mut Board, id: FactionId, strength: u32) -> Result<()> {
    board
        .faction_mut(id)
        .ok_or(ConquestError::FactionNotFound(id))?
        .strength = strength;
    Ok(())
}

/// Apply one move for `mover` to the board.
///
/// `destination` must come from the mover's movement range. Combat draws
/// from `rng`. The resulting report lists every faction that lost a clash
/// and whether it respawned.
pub fn resolve_move(
    board: &mut Board,
    rules: &MoveRules<'_>,
    rng: &mut GameRng,
    mover: FactionId,
    destination: CellCoord,
) -> Result<MoveReport> {
    let from = board.live_faction(mover)?.cell;
    let mut defeats = Vec::new();

    let heading_to_friendly = board
        .stronghold_at(&destination)
        .map(|s| s.is_owned_by(mover))
        .unwrap_or(false);
    let origin = board
        .garrisoned_stronghold(mover)
        .map(|s| (s.cell, s.strength));

    // An empty garrison always walks out so the stronghold does not stay owned at zero
    let mut taken_from_origin = None;
    if let Some((cell, pool)) = origin.filter(|(_, pool)| !heading_to_friendly || *pool == 0) {
        let amount = amount_to_take(pool, rules.garrison_left_behind);
        taken_from_origin = Some(board.leave(&cell, mover, amount)?);
    }
    let attack = board.live_faction(mover)?.strength;

    let rival = board
        .field_faction_at(&destination)
        .filter(|f| f.id != mover)
        .map(|f| (f.id, f.strength));
    let hostile = board
        .stronghold_at(&destination)
        .filter(|s| s.is_hostile_to(mover))
        .map(|s| (s.strength, s.owner));

    let outcome = match (rival, hostile) {
        (Some(_), _) | (None, Some(_)) if attack == 0 => {
            tracing::warn!("{} has no strength to attack {}", mover, destination);
            MoveOutcome::Stalled
        }
        (Some((rival, defence)), _) => {
            let combat = resolve_detailed(defence, attack, rules.combat, rng);
            set_faction_strength(board, rival, combat.defender_strength)?;
            set_faction_strength(board, mover, combat.attacker_strength)?;

            let result = if combat.defender_defeated() {
                defeats.push((rival, handle_defeat(board, rival)?));
                occupy(board, mover, destination, &mut defeats)?;
                ClashResult::DefenderDefeated
            } else if combat.attacker_defeated() {
                defeats.push((mover, handle_defeat(board, mover)?));
                ClashResult::AttackerDefeated
            } else {
                ClashResult::Skirmish
            };
            MoveOutcome::Clash {
                defender: Defender::Faction(rival),
                combat,
                result,
            }
        }
        (None, Some((defence, owner))) => {
            let combat = resolve_detailed(defence, attack, rules.combat, rng);
            set_faction_strength(board, mover, combat.attacker_strength)?;

            if let Some(stronghold) = board.stronghold_at_mut(&destination) {
                stronghold.set_strength(combat.defender_strength);
            }

            let result = if combat.defender_defeated() {
                occupy(board, mover, destination, &mut defeats)?;
                ClashResult::DefenderDefeated
            } else if combat.attacker_defeated() {
                defeats.push((mover, handle_defeat(board, mover)?));
                ClashResult::AttackerDefeated
            } else {
                ClashResult::Skirmish
            };
            MoveOutcome::Clash {
                defender: Defender::Stronghold {
                    cell: destination,
                    owner,
                },
                combat,
                result,
            }
        }
        (None, None) => occupy(board, mover, destination, &mut defeats)?.unwrap_or(MoveOutcome::Stalled),
    };

    let settled_at = board
        .faction(mover)
        .map(|f| f.cell)
        .ok_or(ConquestError::FactionNotFound(mover))?;

    tracing::debug!("{} moved {} -> {}: {:?}", mover, from, destination, outcome);

    Ok(MoveReport {
        faction: mover,
        from,
        destination,
        taken_from_origin,
        outcome,
        settled_at,
        defeats,
    })
}
