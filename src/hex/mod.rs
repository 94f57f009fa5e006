//! Hex grid - offset cell coordinates and terrace comparison

pub mod coord;

pub use coord::{within_one_terrace, CellCoord, TERRACE_TOLERANCE};
