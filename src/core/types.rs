//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Unique identifier for a faction (stable for the lifetime of a game)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FactionId(pub u32);

impl FactionId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for FactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "faction {}", self.0)
    }
}

/// Display colour handed to the UI collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Palette entry describing how a faction is presented
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionProfile {
    pub id: u32,
    pub color: Color,
    pub nickname: String,
}

impl FactionProfile {
    pub fn new(id: u32, color: Color, nickname: &str) -> Self {
        Self {
            id,
            color,
            nickname: nickname.to_string(),
        }
    }

    /// Fallback used when the palette has no entry for an id
    pub fn fallback(id: u32) -> Self {
        Self {
            id,
            color: Color::WHITE,
            nickname: format!("Player {}", id),
        }
    }
}

/// Game seed (drives terrain noise and every random draw)
pub type Seed = u32;

/// Round counter (one round = every live faction moved once)
pub type Round = u32;
