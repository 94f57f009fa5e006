//! Layered Perlin noise used for terrace heights
//!
//! Octave offsets come from the game stream so the same seed always lands
//! on the same patch of noise.

use ::noise::{NoiseFn, Perlin};
use rand::Rng;

use crate::core::config::NoiseSettings;
use crate::core::GameRng;

/// Range of the random per-octave sampling offset
const OCTAVE_OFFSET_RANGE: i32 = 100_000;

/// Fractal (fBm) noise sampler with per-octave offsets
pub struct FractalNoise {
    perlin: Perlin,
    settings: NoiseSettings,
    octave_offsets: Vec<(f64, f64)>,
}

impl FractalNoise {
    /// Draws one offset pair per octave from `rng`
    pub fn new(settings: &NoiseSettings, rng: &mut GameRng) -> Self {
        let octaves = settings.octaves.max(1);
        let octave_offsets = (0..octaves)
            .map(|_| {
                let ox = rng.gen_range(-OCTAVE_OFFSET_RANGE..OCTAVE_OFFSET_RANGE) as f64;
                let oy = rng.gen_range(-OCTAVE_OFFSET_RANGE..OCTAVE_OFFSET_RANGE) as f64;
                (ox + settings.offset_x, oy - settings.offset_y)
            })
            .collect();

        Self {
            perlin: Perlin::new(rng.seed()),
            settings: settings.clone(),
            octave_offsets,
        }
    }

    /// Sample at a world-space point; roughly centred on 0.5 but unbounded
    pub fn sample(&self, x: f64, z: f64) -> f64 {
        let scale = self.settings.scale.max(0.01);
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut height = 0.0;

        for &(ox, oy) in &self.octave_offsets {
            let sx = (ox + x) / scale * frequency;
            let sz = (oy + z) / scale * frequency;
            height += self.perlin.get([sx, sz]) * amplitude;

            amplitude *= self.settings.persistence;
            frequency *= self.settings.lacunarity;
        }

        height / 2.5 + 0.5
    }
}
