//! Combat resolution

pub mod resolver;

pub use resolver::{resolve, resolve_detailed, CombatOutcome, CombatRules};
