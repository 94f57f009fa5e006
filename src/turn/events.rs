//! Events that drive the turn scheduler and the waits it asks for

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::types::FactionId;
use crate::hex::CellCoord;

/// External signal delivered to the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulerEvent {
    /// A requested delay finished (camera transition or settle timer)
    TimerElapsed,
    /// The active faction's choice; `None` passes the turn
    InputReceived(Option<CellCoord>),
    /// The host finished animating a resolved move
    AnimationSettled,
}

impl SchedulerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::TimerElapsed => "TimerElapsed",
            Self::InputReceived(_) => "InputReceived",
            Self::AnimationSettled => "AnimationSettled",
        }
    }
}

/// What the host must deliver before the scheduler can make progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Wait {
    /// Camera pan to the active faction, answer with `TimerElapsed`
    Camera { faction: FactionId, delay: Duration },
    /// Move selection, answer with `InputReceived`
    Input {
        faction: FactionId,
        legal: Vec<CellCoord>,
    },
    /// Post-move settle, answer with `AnimationSettled` or `TimerElapsed`
    Settle { faction: FactionId, delay: Duration },
}

impl Wait {
    pub fn faction(&self) -> FactionId {
        match self {
            Self::Camera { faction, .. } | Self::Input { faction, .. } | Self::Settle { faction, .. } => {
                *faction
            }
        }
    }
}
