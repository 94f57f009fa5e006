//! Terrain - layouts, noise heights, terraces and biomes

pub mod biome;
pub mod field;
pub mod fractal;
pub mod layout;

pub use biome::{biome_for_height, Biome, CellRole};
pub use field::{GenerationReport, Hex, TerrainField};
pub use fractal::FractalNoise;
pub use layout::{Layout, TileKind};
