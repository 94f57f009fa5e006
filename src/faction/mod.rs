//! Factions, strongholds and the board that holds them

pub mod board;
pub mod faction;
pub mod stronghold;

pub use board::Board;
pub use faction::Faction;
pub use stronghold::{Stronghold, StrongholdKind};
