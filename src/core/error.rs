use thiserror::Error;

use crate::core::types::FactionId;
use crate::hex::CellCoord;

#[derive(Error, Debug)]
pub enum ConquestError {
    #[error("Unrecognized tile {symbol:?} at {cell}")]
    UnknownTile { cell: CellCoord, symbol: char },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Layout has {found} home city slots, need at least {required}")]
    InsufficientHomeCities { found: usize, required: usize },

    #[error("Faction not found: {0}")]
    FactionNotFound(FactionId),

    #[error("{0} is dead")]
    FactionDead(FactionId),

    #[error("Capture rejected at {cell}: stronghold still holds {strength}")]
    CaptureRejected { cell: CellCoord, strength: u32 },

    #[error("{cell} is not a legal destination for {faction}")]
    IllegalDestination { faction: FactionId, cell: CellCoord },

    #[error("Event {event} not accepted while {phase}")]
    UnexpectedEvent { phase: String, event: String },

    #[error("The game is already over")]
    GameAlreadyOver,
}

pub type Result<T> = std::result::Result<T, ConquestError>;

/// Report a broken caller contract.
///
/// Always logged; aborts in debug builds and is ignored in release builds.
pub fn contract_violation(message: &str) {
    tracing::error!("contract violation: {}", message);
    debug_assert!(false, "contract violation: {}", message);
}
