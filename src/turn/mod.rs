//! Turn sequencing: setup, the scheduler state machine and its observers

pub mod events;
pub mod observer;
pub mod resolution;
pub mod scheduler;
pub mod setup;

pub use events::{SchedulerEvent, Wait};
pub use observer::{EventLog, GameObserver, NullObserver, ObservedEvent, SkipReason};
pub use resolution::{
    handle_defeat, resolve_move, ClashResult, Defeat, Defender, MoveOutcome, MoveReport, MoveRules,
};
pub use scheduler::{TurnPhase, TurnScheduler};
pub use setup::{seat_players, setup_board, sorted_home_slots, start_game};
