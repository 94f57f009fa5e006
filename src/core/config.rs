//! Game configuration with documented constants
//!
//! The configuration bundle is loaded once (TOML or `Default`) and is
//! read-only for the rest of the game. Out-of-range values are clamped by
//! [`GameConfig::validated`] rather than rejected.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::core::error::{ConquestError, Result};
use crate::core::types::{Color, FactionProfile};
use crate::terrain::Biome;

/// Smallest and largest number of factions a game can seat
pub const MIN_PLAYERS: u32 = 2;
pub const MAX_PLAYERS: u32 = 6;

/// Multi-octave noise parameters for terrain heights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseSettings {
    /// World units per noise period (larger = smoother island)
    pub scale: f64,
    pub octaves: u32,
    /// Amplitude multiplier per octave, 0..=1
    pub persistence: f64,
    /// Frequency multiplier per octave, >= 1
    pub lacunarity: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            scale: 50.0,
            octaves: 4,
            persistence: 0.6,
            lacunarity: 2.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl NoiseSettings {
    fn clamped(mut self) -> Self {
        if self.scale < 0.01 {
            tracing::warn!("noise scale {} raised to 0.01", self.scale);
            self.scale = 0.01;
        }
        if self.octaves < 1 {
            tracing::warn!("noise octaves raised to 1");
            self.octaves = 1;
        }
        if self.lacunarity < 1.0 {
            tracing::warn!("noise lacunarity {} raised to 1", self.lacunarity);
            self.lacunarity = 1.0;
        }
        if !(0.0..=1.0).contains(&self.persistence) {
            tracing::warn!("noise persistence {} clamped to [0, 1]", self.persistence);
            self.persistence = self.persistence.clamp(0.0, 1.0);
        }
        self
    }
}

/// A biome and the lowest normalised height it is used for
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiomeThreshold {
    pub biome: Biome,
    pub min_height: f32,
}

impl BiomeThreshold {
    pub fn new(biome: Biome, min_height: f32) -> Self {
        Self { biome, min_height }
    }
}

/// Half-open strength range `min..max` used for enemy strongholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrengthRange {
    pub min: u32,
    pub max: u32,
}

impl StrengthRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Draw a value from the range; an empty range yields `min`
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        if self.max <= self.min {
            self.min
        } else {
            rng.gen_range(self.min..self.max)
        }
    }

    fn ordered(self, name: &str) -> Self {
        if self.min > self.max {
            tracing::warn!("{} range {}..{} swapped", name, self.min, self.max);
            Self::new(self.max, self.min)
        } else {
            self
        }
    }
}

/// Configuration for one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === TERRAIN ===
    /// Number of terrace steps; heights take `terrace_count + 1` levels
    pub terrace_count: u32,
    pub noise: NoiseSettings,
    /// Exponent applied to the normalised height before quantisation
    ///
    /// 1.0 keeps the noise distribution, >1 flattens lowlands.
    pub height_curve_exponent: f32,
    /// Biome thresholds, sorted ascending by `validated`
    pub biomes: Vec<BiomeThreshold>,
    /// Chance that a stronghold slot hosts an enemy stronghold
    pub enemy_city_chance: f64,

    // === STRENGTH ===
    pub initial_player_strength: u32,
    /// Added to every stronghold at the end of each round
    pub reinforcement_per_turn: u32,
    pub enemy_initial_strength: StrengthRange,
    pub enemy_max_strength: StrengthRange,

    // === MOVEMENT ===
    /// Hex steps per turn on open terrain
    pub movement_budget: u32,
    /// Hex steps per turn when starting inside an owned stronghold
    pub stronghold_movement_budget: u32,
    /// Strength a faction leaves inside a stronghold it walks out of
    pub garrison_left_behind: u32,

    // === COMBAT ===
    /// Each unit rolls uniformly over `0..=die_sides`
    pub die_sides: u32,
    pub max_attackers: u32,
    pub max_defenders: u32,

    // === PLAYERS ===
    pub player_count: u32,
    pub factions: Vec<FactionProfile>,

    // === PACING ===
    /// Camera transition the host waits for before each turn
    pub camera_delay_ms: u64,
    /// Settle delay the host waits for after each resolved move
    pub settle_delay_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            terrace_count: 6,
            noise: NoiseSettings::default(),
            height_curve_exponent: 1.0,
            biomes: vec![
                BiomeThreshold::new(Biome::Sand, 0.0),
                BiomeThreshold::new(Biome::Grass, 0.3),
                BiomeThreshold::new(Biome::Forest, 0.55),
                BiomeThreshold::new(Biome::Stone, 0.75),
                BiomeThreshold::new(Biome::Snow, 0.9),
            ],
            enemy_city_chance: 0.25,

            initial_player_strength: 10,
            reinforcement_per_turn: 1,
            enemy_initial_strength: StrengthRange::new(3, 7),
            enemy_max_strength: StrengthRange::new(8, 15),

            movement_budget: 2,
            stronghold_movement_budget: 3,
            garrison_left_behind: 1,

            die_sides: 6,
            max_attackers: 2,
            max_defenders: 2,

            player_count: 6,
            factions: default_palette(),

            camera_delay_ms: 2000,
            settle_delay_ms: 1000,
        }
    }
}

fn default_palette() -> Vec<FactionProfile> {
    vec![
        FactionProfile::new(0, Color::rgb(220, 50, 47), "Crimson"),
        FactionProfile::new(1, Color::rgb(38, 139, 210), "Azure"),
        FactionProfile::new(2, Color::rgb(133, 153, 0), "Olive"),
        FactionProfile::new(3, Color::rgb(181, 137, 0), "Amber"),
        FactionProfile::new(4, Color::rgb(108, 113, 196), "Violet"),
        FactionProfile::new(5, Color::rgb(42, 161, 152), "Teal"),
    ]
}

impl GameConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Reject structurally broken configurations
    pub fn validate(&self) -> Result<()> {
        if self.biomes.is_empty() {
            return Err(ConquestError::InvalidConfig(
                "biome table must not be empty".into(),
            ));
        }
        if let Some(bad) = self.biomes.iter().find(|b| !b.min_height.is_finite()) {
            return Err(ConquestError::InvalidConfig(format!(
                "biome {:?} has non-finite threshold",
                bad.biome
            )));
        }
        Ok(())
    }

    /// Clamp every value into its legal range and sort the biome table
    pub fn validated(mut self) -> Self {
        self.noise = self.noise.clamped();

        if self.terrace_count < 1 {
            tracing::warn!("terrace_count raised to 1");
            self.terrace_count = 1;
        }
        if !(0.0..=1.0).contains(&self.enemy_city_chance) {
            tracing::warn!("enemy_city_chance {} clamped to [0, 1]", self.enemy_city_chance);
            self.enemy_city_chance = self.enemy_city_chance.clamp(0.0, 1.0);
        }
        if !(self.height_curve_exponent > 0.0) {
            tracing::warn!("height_curve_exponent {} reset to 1", self.height_curve_exponent);
            self.height_curve_exponent = 1.0;
        }

        self.movement_budget = at_least_one(self.movement_budget, "movement_budget");
        self.stronghold_movement_budget =
            at_least_one(self.stronghold_movement_budget, "stronghold_movement_budget");
        self.die_sides = at_least_one(self.die_sides, "die_sides");
        self.max_attackers = at_least_one(self.max_attackers, "max_attackers");
        self.max_defenders = at_least_one(self.max_defenders, "max_defenders");

        self.enemy_initial_strength = self.enemy_initial_strength.ordered("enemy_initial_strength");
        self.enemy_max_strength = self.enemy_max_strength.ordered("enemy_max_strength");
        if self.enemy_max_strength.min == 0 {
            tracing::warn!("enemy_max_strength minimum raised to 1");
            self.enemy_max_strength.min = 1;
            self.enemy_max_strength.max = self.enemy_max_strength.max.max(1);
        }

        self.player_count = clamp_player_count(self.player_count);

        // Stable sort: equal thresholds keep their insertion order
        self.biomes
            .sort_by(|a, b| a.min_height.total_cmp(&b.min_height));

        self
    }

    /// Palette entry for a faction id, falling back to white
    pub fn profile(&self, id: u32) -> FactionProfile {
        self.factions
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .unwrap_or_else(|| FactionProfile::fallback(id))
    }

    pub fn camera_delay(&self) -> Duration {
        Duration::from_millis(self.camera_delay_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

fn at_least_one(value: u32, name: &str) -> u32 {
    if value == 0 {
        tracing::warn!("{} raised to 1", name);
        1
    } else {
        value
    }
}

/// Clamp a requested player count to the seatable range
pub fn clamp_player_count(requested: u32) -> u32 {
    let clamped = requested.clamp(MIN_PLAYERS, MAX_PLAYERS);
    if clamped != requested {
        tracing::warn!("player count {} clamped to {}", requested, clamped);
    }
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.clone().validated(), config);
    }

    #[test]
    fn test_player_count_clamped() {
        assert_eq!(clamp_player_count(0), 2);
        assert_eq!(clamp_player_count(1), 2);
        assert_eq!(clamp_player_count(4), 4);
        assert_eq!(clamp_player_count(9), 6);
    }

    #[test]
    fn test_validated_sorts_biomes_stably() {
        let mut config = GameConfig::default();
        config.biomes = vec![
            BiomeThreshold::new(Biome::Snow, 0.9),
            BiomeThreshold::new(Biome::Grass, 0.2),
            BiomeThreshold::new(Biome::Forest, 0.2),
            BiomeThreshold::new(Biome::Sand, 0.0),
        ];
        let config = config.validated();
        let order: Vec<Biome> = config.biomes.iter().map(|b| b.biome).collect();
        assert_eq!(order, vec![Biome::Sand, Biome::Grass, Biome::Forest, Biome::Snow]);
    }

    #[test]
    fn test_validated_clamps_noise_and_counts() {
        let mut config = GameConfig::default();
        config.noise.scale = 0.0;
        config.noise.octaves = 0;
        config.noise.persistence = 3.0;
        config.noise.lacunarity = 0.5;
        config.die_sides = 0;
        config.terrace_count = 0;
        config.enemy_initial_strength = StrengthRange::new(9, 2);
        let config = config.validated();
        assert_eq!(config.noise.scale, 0.01);
        assert_eq!(config.noise.octaves, 1);
        assert_eq!(config.noise.persistence, 1.0);
        assert_eq!(config.noise.lacunarity, 1.0);
        assert_eq!(config.die_sides, 1);
        assert_eq!(config.terrace_count, 1);
        assert_eq!(config.enemy_initial_strength, StrengthRange::new(2, 9));
    }

    #[test]
    fn test_empty_biome_table_rejected() {
        let mut config = GameConfig::default();
        config.biomes.clear();
        assert!(matches!(config.validate(), Err(ConquestError::InvalidConfig(_))));
    }

    #[test]
    fn test_toml_overrides_and_defaults() {
        let config = GameConfig::from_toml_str(
            r#"
            terrace_count = 4
            player_count = 3

            [noise]
            octaves = 2

            [[biomes]]
            biome = "Grass"
            min_height = 0.0
            "#,
        )
        .unwrap();
        assert_eq!(config.terrace_count, 4);
        assert_eq!(config.player_count, 3);
        assert_eq!(config.noise.octaves, 2);
        assert_eq!(config.noise.scale, 50.0);
        assert_eq!(config.biomes.len(), 1);
        assert_eq!(config.die_sides, 6);
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        let result = GameConfig::from_toml_str("terrace_count = \"six\"");
        assert!(matches!(result, Err(ConquestError::Config(_))));
    }

    #[test]
    fn test_profile_fallback() {
        let config = GameConfig::default();
        assert_eq!(config.profile(1).nickname, "Azure");
        assert_eq!(config.profile(42), FactionProfile::fallback(42));
    }

    #[test]
    fn test_strength_range_sample() {
        let mut rng = crate::core::GameRng::new(3);
        let range = StrengthRange::new(3, 7);
        for _ in 0..100 {
            let v = range.sample(&mut rng);
            assert!((3..7).contains(&v));
        }
        assert_eq!(StrengthRange::new(5, 5).sample(&mut rng), 5);
    }
}
