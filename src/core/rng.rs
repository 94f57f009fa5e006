//! The single seeded random stream of a game
//!
//! Terrain generation, game setup and combat all draw from one `GameRng`,
//! in that order, so a seed plus a move sequence replays exactly.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::types::Seed;

#[derive(Debug, Clone)]
pub struct GameRng {
    seed: Seed,
    inner: ChaCha8Rng,
}

impl GameRng {
    pub fn new(seed: Seed) -> Self {
        Self {
            seed,
            inner: ChaCha8Rng::seed_from_u64(seed as u64),
        }
    }

    /// The seed this stream was created from
    pub fn seed(&self) -> Seed {
        self.seed
    }
}

impl RngCore for GameRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}
