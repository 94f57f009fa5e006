//! Movement range search

pub mod range;

pub use range::{movement_range, Occupancy, StrongholdView};
