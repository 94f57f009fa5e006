//! Movement range - the cells a faction may move into this turn
//!
//! A pure function of the mover's cell, the terrain, a snapshot of who
//! stands where and the movement budget. Recomputed every turn.

use ahash::{AHashMap, AHashSet};

use crate::core::types::FactionId;
use crate::hex::CellCoord;
use crate::terrain::TerrainField;

/// Stronghold as seen by the movement search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrongholdView {
    pub cell: CellCoord,
    pub strength: u32,
    pub owner: Option<FactionId>,
}

/// Snapshot of live occupancy at the start of a turn
#[derive(Debug, Clone, Default)]
pub struct Occupancy {
    field_factions: AHashMap<CellCoord, FactionId>,
    strongholds: AHashMap<CellCoord, StrongholdView>,
}

impl Occupancy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a live faction standing on the field
    pub fn with_faction(mut self, faction: FactionId, cell: CellCoord) -> Self {
        self.field_factions.insert(cell, faction);
        self
    }

    pub fn with_stronghold(mut self, view: StrongholdView) -> Self {
        self.strongholds.insert(view.cell, view);
        self
    }

    pub fn field_faction_at(&self, cell: &CellCoord) -> Option<FactionId> {
        self.field_factions.get(cell).copied()
    }

    pub fn stronghold_at(&self, cell: &CellCoord) -> Option<&StrongholdView> {
        self.strongholds.get(cell)
    }

    /// Whether `mover` may not pass through `cell`.
    ///
    /// Rival strongholds with a garrison and cells held by another field
    /// faction block pass-through; they stay valid final destinations when
    /// adjacent to the mover.
    pub fn blocks(&self, cell: &CellCoord, mover: FactionId) -> bool {
        let hostile_stronghold = self
            .stronghold_at(cell)
            .map(|s| s.strength > 0 && s.owner != Some(mover))
            .unwrap_or(false);
        let rival_present = self
            .field_faction_at(cell)
            .map(|f| f != mover)
            .unwrap_or(false);
        hostile_stronghold || rival_present
    }
}

/// Terrain half of the passability filter: a real cell at most one terrace away
fn terrain_allows(terrain: &TerrainField, from: &CellCoord, to: &CellCoord) -> bool {
    terrain.get(to).map(|h| h.is_passable()).unwrap_or(false) && terrain.within_step(from, to)
}

/// Cells reachable from `start` in at most `budget` hex steps.
///
/// The first ring is filtered by terrain only, so adjacent rivals and rival
/// strongholds are included as attack targets. Further rings expand only
/// from cells that pass the full filter. The start cell is never included
/// and an empty set means the mover has no legal move.
pub fn movement_range(
    terrain: &TerrainField,
    occupancy: &Occupancy,
    mover: FactionId,
    start: CellCoord,
    budget: u32,
) -> AHashSet<CellCoord> {
    let mut reachable = AHashSet::new();
    if budget == 0 {
        return reachable;
    }

    let mut frontier = Vec::new();
    for cell in terrain.existing_neighbors(&start) {
        if cell == start || !terrain_allows(terrain, &start, &cell) {
            continue;
        }
        reachable.insert(cell);
        if !occupancy.blocks(&cell, mover) {
            frontier.push(cell);
        }
    }

    for _ in 1..budget {
        let mut next = Vec::new();
        for from in &frontier {
            for cell in terrain.existing_neighbors(from) {
                if cell == start || reachable.contains(&cell) {
                    continue;
                }
                if !terrain_allows(terrain, from, &cell) || occupancy.blocks(&cell, mover) {
                    continue;
                }
                reachable.insert(cell);
                next.push(cell);
            }
        }
        if next.is_empty() {
            break;
        }
        frontier = next;
    }

    tracing::debug!(
        "{} at {} can reach {} cells with budget {}",
        mover,
        start,
        reachable.len(),
        budget
    );
    reachable
}
