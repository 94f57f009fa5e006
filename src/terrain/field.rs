//! Terrain field - the immutable hex map a game is played on
//!
//! Built once per game from a layout and the game stream: noise heights,
//! global normalisation, terrace quantisation and biome classification.

use ahash::AHashMap;
use rand::Rng;
use std::time::{Duration, Instant};

use super::biome::{biome_for_height, Biome, CellRole};
use super::fractal::FractalNoise;
use super::layout::{Layout, TileKind};
use crate::core::config::GameConfig;
use crate::core::error::ConquestError;
use crate::core::GameRng;
use crate::hex::{within_one_terrace, CellCoord};

/// Normalised height of fixed tiles with no sampled neighbour, and of a flat map
const FIXED_RAW_HEIGHT: f64 = 0.5;

/// Most common terrace among the sampled neighbours of `cell`, lowest on ties
fn levelled_terrace(cell: &CellCoord, sampled: &AHashMap<CellCoord, u32>) -> Option<u32> {
    let mut counts: Vec<(u32, usize)> = Vec::with_capacity(6);
    for terrace in cell.neighbors().iter().filter_map(|n| sampled.get(n)) {
        match counts.iter_mut().find(|(t, _)| t == terrace) {
            Some((_, n)) => *n += 1,
            None => counts.push((*terrace, 1)),
        }
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
        .map(|(terrace, _)| terrace)
}

/// A generated cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hex {
    pub coord: CellCoord,
    /// Normalised height, always `terrace / terrace_count`
    pub height: f32,
    pub terrace: u32,
    pub biome: Biome,
}

impl Hex {
    pub fn new(coord: CellCoord, terrace: u32, terrace_count: u32, biome: Biome) -> Self {
        Self {
            coord,
            height: terrace as f32 / terrace_count.max(1) as f32,
            terrace,
            biome,
        }
    }

    pub fn role(&self) -> CellRole {
        self.biome.role()
    }

    /// Role `None` cells are never reachable
    pub fn is_passable(&self) -> bool {
        self.role() != CellRole::None
    }
}

/// What happened during generation besides the map itself
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Configuration problems that were downgraded to `None` cells
    pub errors: Vec<ConquestError>,
    pub stronghold_slots: usize,
    /// Stronghold slots turned into ordinary land
    pub demoted_slots: usize,
    pub elapsed: Duration,
}

/// Surface decided in the first pass, before heights are known
#[derive(Clone, Copy)]
enum Surface {
    None,
    Land,
    HomeCity,
    Stronghold,
}

#[derive(Debug, Clone, Default)]
pub struct TerrainField {
    hexes: AHashMap<CellCoord, Hex>,
    order: Vec<CellCoord>,
    terrace_count: u32,
}

impl TerrainField {
    /// Build a field from already classified cells
    pub fn from_hexes(terrace_count: u32, hexes: impl IntoIterator<Item = Hex>) -> Self {
        let mut field = Self {
            hexes: AHashMap::new(),
            order: Vec::new(),
            terrace_count: terrace_count.max(1),
        };
        for hex in hexes {
            if field.hexes.insert(hex.coord, hex).is_none() {
                field.order.push(hex.coord);
            }
        }
        field
    }

    /// Generate the field for `layout`, drawing from the game stream.
    ///
    /// Never fails: unknown tiles become `None` cells and are listed in the
    /// report.
    pub fn generate(layout: &Layout, config: &GameConfig, rng: &mut GameRng) -> (Self, GenerationReport) {
        let start = Instant::now();
        let mut report = GenerationReport::default();
        let terrace_count = config.terrace_count.max(1);

        let noise = FractalNoise::new(&config.noise, rng);

        // Fixed tiles carry no sample; they are levelled onto their neighbours below
        let mut raw: Vec<(CellCoord, Option<f64>, Surface)> = Vec::with_capacity(layout.len());
        for (cell, kind) in layout.tiles() {
            let sample = || {
                let (x, z) = cell.world_position();
                Some(noise.sample(x as f64, z as f64))
            };
            let entry = match kind {
                TileKind::Blocked => (None, Surface::None),
                TileKind::Open => (sample(), Surface::Land),
                TileKind::AlwaysOpen => (None, Surface::Land),
                TileKind::HomeCitySlot => (None, Surface::HomeCity),
                TileKind::StrongholdSlot => {
                    report.stronghold_slots += 1;
                    if rng.gen::<f64>() < config.enemy_city_chance {
                        (None, Surface::Stronghold)
                    } else {
                        report.demoted_slots += 1;
                        (sample(), Surface::Land)
                    }
                }
                TileKind::Unrecognized(symbol) => {
                    let error = ConquestError::UnknownTile { cell, symbol };
                    tracing::error!("{}", error);
                    report.errors.push(error);
                    (None, Surface::None)
                }
            };
            raw.push((cell, entry.0, entry.1));
        }

        let (min, max) = raw
            .iter()
            .filter_map(|(_, h, _)| *h)
            .fold((f64::MAX, f64::MIN), |(lo, hi), h| (lo.min(h), hi.max(h)));

        let to_terrace = |normalised: f64| {
            let curved = (normalised as f32)
                .powf(config.height_curve_exponent)
                .clamp(0.0, 1.0);
            (curved * terrace_count as f32).round() as u32
        };

        let sampled: AHashMap<CellCoord, u32> = raw
            .iter()
            .filter_map(|(cell, h, _)| h.map(|h| (*cell, h)))
            .map(|(cell, h)| {
                let normalised = if max - min > f64::EPSILON {
                    (h - min) / (max - min)
                } else {
                    FIXED_RAW_HEIGHT
                };
                (cell, to_terrace(normalised))
            })
            .collect();
        let fallback = to_terrace(FIXED_RAW_HEIGHT);

        let mut thresholds = config.biomes.clone();
        thresholds.sort_by(|a, b| a.min_height.total_cmp(&b.min_height));

        let hexes = raw.into_iter().map(|(cell, height, surface)| {
            if matches!(surface, Surface::None) {
                return Hex::new(cell, 0, terrace_count, Biome::None);
            }

            let terrace = match height {
                Some(_) => sampled.get(&cell).copied().unwrap_or(fallback),
                None => levelled_terrace(&cell, &sampled).unwrap_or(fallback),
            };
            let quantised = terrace as f32 / terrace_count as f32;

            let biome = match surface {
                Surface::Land => biome_for_height(&thresholds, quantised),
                Surface::HomeCity => Biome::HomeCity,
                Surface::Stronghold => Biome::Stronghold,
                Surface::None => Biome::None,
            };
            Hex::new(cell, terrace, terrace_count, biome)
        });

        let field = Self::from_hexes(terrace_count, hexes);
        report.elapsed = start.elapsed();

        tracing::info!(
            "Generated {} cells ({} of {} stronghold slots demoted) in {:.1?}",
            field.len(),
            report.demoted_slots,
            report.stronghold_slots,
            report.elapsed
        );

        (field, report)
    }

    /// Regenerate in place, fully replacing the previous map
    pub fn regenerate(&mut self, layout: &Layout, config: &GameConfig, rng: &mut GameRng) -> GenerationReport {
        let (field, report) = Self::generate(layout, config, rng);
        *self = field;
        report
    }

    pub fn get(&self, cell: &CellCoord) -> Option<&Hex> {
        self.hexes.get(cell)
    }

    pub fn contains(&self, cell: &CellCoord) -> bool {
        self.hexes.contains_key(cell)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn terrace_count(&self) -> u32 {
        self.terrace_count
    }

    /// Height difference between two adjacent terraces
    pub fn terrace_step(&self) -> f32 {
        1.0 / self.terrace_count as f32
    }

    /// Cells in layout order
    pub fn iter(&self) -> impl Iterator<Item = &Hex> + '_ {
        self.order.iter().filter_map(|c| self.hexes.get(c))
    }

    /// Cells with a given role, in layout order
    pub fn cells_with_role(&self, role: CellRole) -> Vec<CellCoord> {
        self.iter()
            .filter(|h| h.role() == role)
            .map(|h| h.coord)
            .collect()
    }

    /// Neighbours of `cell` that exist on this map
    pub fn existing_neighbors(&self, cell: &CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        cell.neighbors().into_iter().filter(|n| self.contains(n))
    }

    /// Whether two cells are within one terrace step of each other
    pub fn within_step(&self, a: &CellCoord, b: &CellCoord) -> bool {
        match (self.get(a), self.get(b)) {
            (Some(ha), Some(hb)) => within_one_terrace(ha.height, hb.height, self.terrace_step()),
            _ => false,
        }
    }

    /// World-space centre of a cell's top face (x, height, z)
    pub fn world_position(&self, cell: &CellCoord) -> Option<(f32, f32, f32)> {
        self.get(cell).map(|hex| {
            let (x, z) = cell.world_position();
            (x, hex.height, z)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(layout: &Layout, seed: u32) -> (TerrainField, GenerationReport) {
        TerrainField::generate(layout, &GameConfig::default(), &mut GameRng::new(seed))
    }

    #[test]
    fn test_heights_on_terrace_ladder() {
        let (field, _) = generate(&Layout::island(5), 42);
        let n = field.terrace_count();
        for hex in field.iter() {
            assert!(hex.terrace <= n);
            assert_eq!(hex.height, hex.terrace as f32 / n as f32);
        }
    }

    #[test]
    fn test_generation_is_idempotent() {
        let layout = Layout::island(5);
        let (a, _) = generate(&layout, 9);
        let (b, _) = generate(&layout, 9);
        assert_eq!(a.len(), b.len());
        for hex in a.iter() {
            assert_eq!(Some(hex), b.get(&hex.coord));
        }
    }

    #[test]
    fn test_regenerate_replaces_state() {
        let mut field = TerrainField::from_hexes(
            6,
            vec![Hex::new(CellCoord::new(99, 99), 1, 6, Biome::Grass)],
        );
        let report = field.regenerate(&Layout::island(3), &GameConfig::default(), &mut GameRng::new(1));
        assert!(!field.contains(&CellCoord::new(99, 99)));
        assert!(report.errors.is_empty());
        assert_eq!(field.len(), Layout::island(3).len());
    }

    #[test]
    fn test_unknown_tile_becomes_none() {
        let layout = Layout::parse("..?.");
        let (field, report) = generate(&layout, 1);
        assert_eq!(report.errors.len(), 1);
        assert!(matches!(
            report.errors[0],
            ConquestError::UnknownTile { symbol: '?', .. }
        ));
        let hex = field.get(&CellCoord::new(2, 0)).unwrap();
        assert_eq!(hex.biome, Biome::None);
        assert!(!hex.is_passable());
    }

    #[test]
    fn test_city_slots_exempt_from_biome_rule() {
        let layout = Layout::parse("H.#.S");
        let mut config = GameConfig::default();
        config.enemy_city_chance = 1.0;
        let (field, report) = TerrainField::generate(&layout, &config, &mut GameRng::new(4));
        assert_eq!(field.get(&CellCoord::new(0, 0)).unwrap().biome, Biome::HomeCity);
        assert_eq!(field.get(&CellCoord::new(4, 0)).unwrap().biome, Biome::Stronghold);
        assert_eq!(report.demoted_slots, 0);
    }

    #[test]
    fn test_zero_chance_demotes_every_slot() {
        let mut config = GameConfig::default();
        config.enemy_city_chance = 0.0;
        let layout = Layout::island(5);
        let (field, report) = TerrainField::generate(&layout, &config, &mut GameRng::new(4));
        assert_eq!(report.demoted_slots, report.stronghold_slots);
        assert!(field.cells_with_role(CellRole::StrongholdSlot).is_empty());
        assert_eq!(field.cells_with_role(CellRole::HomeCitySlot).len(), 6);
    }

    #[test]
    fn test_blocked_cells_are_none() {
        let (field, _) = generate(&Layout::parse("~.~"), 3);
        assert_eq!(field.get(&CellCoord::new(0, 0)).unwrap().role(), CellRole::None);
        assert_eq!(field.get(&CellCoord::new(1, 0)).unwrap().role(), CellRole::Open);
    }

    #[test]
    fn test_flat_map_sits_mid_ladder() {
        let layout = Layout::parse("###");
        let (field, _) = generate(&layout, 3);
        for hex in field.iter() {
            assert_eq!(hex.terrace, 3);
        }
    }

    #[test]
    fn test_home_cities_share_a_terrace_with_a_neighbour() {
        let layout = Layout::island(5);
        for seed in 0..40 {
            let (field, _) = generate(&layout, seed);
            for cell in field.cells_with_role(CellRole::HomeCitySlot) {
                let reachable = field
                    .existing_neighbors(&cell)
                    .filter(|n| field.get(n).map(|h| h.is_passable()).unwrap_or(false))
                    .any(|n| field.within_step(&cell, &n));
                assert!(reachable, "seed {}: home city {} is walled in", seed, cell);
            }
        }
    }

    #[test]
    fn test_levelled_tile_takes_most_common_neighbour_terrace() {
        let centre = CellCoord::new(2, 2);
        let n = centre.neighbors();
        let sampled: AHashMap<CellCoord, u32> =
            [(n[0], 4), (n[1], 1), (n[2], 4), (n[3], 1), (n[4], 2)].into_iter().collect();
        assert_eq!(levelled_terrace(&centre, &sampled), Some(1));

        let lonely: AHashMap<CellCoord, u32> = AHashMap::new();
        assert_eq!(levelled_terrace(&centre, &lonely), None);
    }

    #[test]
    fn test_within_step() {
        let field = TerrainField::from_hexes(
            6,
            vec![
                Hex::new(CellCoord::new(0, 0), 2, 6, Biome::Grass),
                Hex::new(CellCoord::new(1, 0), 3, 6, Biome::Grass),
                Hex::new(CellCoord::new(2, 0), 5, 6, Biome::Stone),
            ],
        );
        assert!(field.within_step(&CellCoord::new(0, 0), &CellCoord::new(1, 0)));
        assert!(!field.within_step(&CellCoord::new(1, 0), &CellCoord::new(2, 0)));
        assert!(!field.within_step(&CellCoord::new(0, 0), &CellCoord::new(7, 7)));
    }
}
