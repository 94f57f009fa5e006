//! Biomes and the gameplay role a cell plays

use serde::{Deserialize, Serialize};

use crate::core::config::BiomeThreshold;

/// Visual/terrain classification of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Biome {
    /// Impassable, never hosts an actor
    #[default]
    None,
    Sand,
    Grass,
    Forest,
    Stone,
    Snow,
    HomeCity,
    Stronghold,
}

/// What a cell means to movement and setup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellRole {
    None,
    Open,
    HomeCitySlot,
    StrongholdSlot,
}

impl Biome {
    pub fn role(&self) -> CellRole {
        match self {
            Self::None => CellRole::None,
            Self::HomeCity => CellRole::HomeCitySlot,
            Self::Stronghold => CellRole::StrongholdSlot,
            Self::Sand | Self::Grass | Self::Forest | Self::Stone | Self::Snow => CellRole::Open,
        }
    }
}

/// Pick the biome for a normalised height.
///
/// `thresholds` must be sorted ascending; the last threshold the height
/// still reaches wins. A height below every threshold is a lookup miss
/// and yields `Biome::None`.
pub fn biome_for_height(thresholds: &[BiomeThreshold], height: f32) -> Biome {
    let mut best = None;
    for threshold in thresholds {
        if height >= threshold.min_height {
            best = Some(threshold.biome);
        }
    }
    match best {
        Some(biome) => biome,
        None => {
            tracing::warn!("no biome threshold reached by height {:.3}", height);
            Biome::None
        }
    }
}
