pub mod config;
pub mod error;
pub mod rng;
pub mod types;

pub use config::{BiomeThreshold, GameConfig, NoiseSettings, StrengthRange};
pub use error::{ConquestError, Result};
pub use rng::GameRng;
pub use types::{Color, FactionId, FactionProfile, Round, Seed};
