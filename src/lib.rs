//! Hex Conquest - turn-based territorial conquest on a procedural hex island

pub mod combat;
pub mod core;
pub mod faction;
pub mod hex;
pub mod movement;
pub mod terrain;
pub mod turn;

pub use crate::core::{ConquestError, GameConfig, GameRng, Result};
pub use crate::turn::{start_game, SchedulerEvent, TurnPhase, TurnScheduler};
