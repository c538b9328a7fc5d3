//! Deterministic RNG resource for terrain-side randomness.
//!
//! Seed resolution, flatten jitter and placement sampling all draw from
//! `ResMut<TerrainRng>` so a run can be replayed from its seed.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Default seed used when no explicit seed is provided.
const DEFAULT_SEED: u64 = 42;

/// Systems that need randomness take `ResMut<TerrainRng>` and use `rng.0`.
#[derive(Resource)]
pub struct TerrainRng(pub ChaCha8Rng);

impl Default for TerrainRng {
    fn default() -> Self {
        Self(ChaCha8Rng::seed_from_u64(DEFAULT_SEED))
    }
}

impl TerrainRng {
    pub fn from_seed_u64(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}
