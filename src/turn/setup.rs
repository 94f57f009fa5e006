//! Game setup - terrain, seating and the starting board
//!
//! Random draws happen in a fixed order on the single game stream:
//! terrain first, then one (cap, initial strength) pair per enemy
//! stronghold in layout order.

use super::observer::GameObserver;
use super::scheduler::TurnScheduler;
use crate::core::config::{clamp_player_count, GameConfig, MIN_PLAYERS};
use crate::core::error::{ConquestError, Result};
use crate::core::types::Seed;
use crate::core::GameRng;
use crate::faction::{Board, Faction, Stronghold};
use crate::hex::CellCoord;
use crate::terrain::{CellRole, Layout, TerrainField};

/// Seat order over six angle-sorted home cities for small games
fn seat_order(slots: usize, players: usize) -> Vec<usize> {
    if slots == 6 {
        match players {
            2 => return vec![0, 3, 1, 2, 4, 5],
            3 => return vec![0, 2, 4, 5, 1, 3],
            4 => return vec![0, 1, 3, 4, 5, 2],
            _ => {}
        }
    }
    (0..slots).collect()
}

/// Home-city slots ordered counter-clockwise around their centroid
pub fn sorted_home_slots(terrain: &TerrainField) -> Vec<CellCoord> {
    let mut slots = terrain.cells_with_role(CellRole::HomeCitySlot);
    if slots.is_empty() {
        return slots;
    }

    let n = slots.len() as f32;
    let (sx, sz) = slots.iter().fold((0.0, 0.0), |(sx, sz), c| {
        let (x, z) = c.world_position();
        (sx + x, sz + z)
    });
    let (cx, cz) = (sx / n, sz / n);

    // Stable: equal angles keep layout order
    slots.sort_by(|a, b| {
        let angle = |c: &CellCoord| {
            let (x, z) = c.world_position();
            (z - cz).atan2(x - cx)
        };
        angle(a).total_cmp(&angle(b))
    });
    slots
}

/// Seats to fill, and whether the home-city count is what limited it
fn seat_count(requested: u32, slots: usize) -> (usize, bool) {
    let seatable = clamp_player_count(requested) as usize;
    let players = seatable.min(slots);
    (players, players < seatable)
}

/// Home cities assigned to each seat, in faction id order
pub fn seat_players(terrain: &TerrainField, requested: u32) -> Result<Vec<CellCoord>> {
    let slots = sorted_home_slots(terrain);
    if slots.len() < MIN_PLAYERS as usize {
        return Err(ConquestError::InsufficientHomeCities {
            found: slots.len(),
            required: MIN_PLAYERS as usize,
        });
    }

    let (players, short_of_slots) = seat_count(requested, slots.len());
    if short_of_slots {
        tracing::warn!("Only {} home cities, seating {} players", slots.len(), players);
    }

    Ok(seat_order(slots.len(), players)
        .into_iter()
        .take(players)
        .map(|i| slots[i])
        .collect())
}

/// Build the starting board on generated terrain.
///
/// Seated factions garrison their home cities with their initial
/// strength. Every other stronghold cell gets an enemy stronghold.
pub fn setup_board(config: &GameConfig, terrain: &TerrainField, rng: &mut GameRng) -> Result<Board> {
    let seats = seat_players(terrain, config.player_count)?;

    let mut strongholds = Vec::new();
    for hex in terrain.iter() {
        let seated = seats.contains(&hex.coord);
        match hex.role() {
            CellRole::HomeCitySlot if seated => strongholds.push(Stronghold::home_city(hex.coord)),
            CellRole::HomeCitySlot | CellRole::StrongholdSlot => {
                let cap = config.enemy_max_strength.sample(rng);
                let initial = config.enemy_initial_strength.sample(rng);
                strongholds.push(Stronghold::enemy(hex.coord, initial, cap));
            }
            CellRole::None | CellRole::Open => {}
        }
    }

    let factions = seats
        .iter()
        .enumerate()
        .map(|(i, cell)| Faction::new(&config.profile(i as u32), *cell, config.initial_player_strength))
        .collect();

    let mut board = Board::new(factions, strongholds);
    for (i, cell) in seats.iter().enumerate() {
        let id = board.factions()[i].id;
        board.capture(cell, id)?;
    }

    tracing::info!(
        "Seated {} factions, {} strongholds",
        seats.len(),
        board.strongholds().len()
    );
    Ok(board)
}

/// Generate a game from a layout and seed and start its first turn
pub fn start_game<O: GameObserver>(
    config: GameConfig,
    layout: &Layout,
    seed: Seed,
    observer: O,
) -> Result<TurnScheduler<O>> {
    config.validate()?;
    let config = config.validated();

    let mut rng = GameRng::new(seed);
    let (terrain, report) = TerrainField::generate(layout, &config, &mut rng);
    let board = setup_board(&config, &terrain, &mut rng)?;

    let mut scheduler = TurnScheduler::new(config, terrain, board, rng, observer, report);
    scheduler.start()?;
    Ok(scheduler)
}
