//! Heightmap synthesis: noise samples to per-vertex elevations.
//!
//! For every point of the `(width + 1) x (depth + 1)` vertex lattice:
//! 1. sample the noise source and subtract `height_shift`
//! 2. zero everything inside the green band, scale the rest by `1 - green_percentage`
//! 3. multiply by `height_multiplier` and round to multiples of `1 / round_amount`
//! 4. add a small jitter drawn from a per-cell deterministic stream
//!
//! The result is fully reproducible from the parameters alone.

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::{FLAT_HEIGHT_LIMIT, JITTER_AMPLITUDE, MAX_MAP_SIZE, MIN_MAP_SIZE, SHADING_BOUND};
use crate::noise::{NoiseParams, NoiseSource};
use crate::terrain_error::TerrainError;

// ---------------------------------------------------------------------------
// Per-cell jitter seeding
// ---------------------------------------------------------------------------

/// How the per-cell jitter stream is seeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellSeeding {
    /// Mix `(seed, x, z)` as three independent values. No collisions along
    /// the map edges or between coordinate pairs with equal products.
    #[default]
    Hashed,
    /// `seed * x * z` with 32-bit wrapping. Every cell on the `x = 0` and
    /// `z = 0` edges shares one stream. Kept for parity with older maps.
    Legacy,
}

impl CellSeeding {
    pub fn cell_seed(self, seed: u32, x: usize, z: usize) -> u64 {
        match self {
            CellSeeding::Hashed => hash_cell(seed as u64, x as u64, z as u64),
            CellSeeding::Legacy => (seed as i32)
                .wrapping_mul(x as i32)
                .wrapping_mul(z as i32) as u32 as u64,
        }
    }
}

/// Splitmix64-style mix of `(seed, x, z)`.
#[inline]
fn hash_cell(seed: u64, x: u64, z: u64) -> u64 {
    let mut h = seed;
    h = h.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(x);
    h = h.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(z);
    h ^= h >> 30;
    h = h.wrapping_mul(0xbf58476d1ce4e5b9);
    h ^= h >> 27;
    h = h.wrapping_mul(0x94d049bb133111eb);
    h ^= h >> 31;
    h
}

/// Draw one jitter value `(u - 0.5) * JITTER_AMPLITUDE`, `u` uniform in [0, 1).
#[inline]
pub fn draw_jitter(rng: &mut impl Rng) -> f32 {
    (rng.gen::<f32>() - 0.5) * JITTER_AMPLITUDE
}

fn cell_jitter(seeding: CellSeeding, seed: u32, x: usize, z: usize) -> f32 {
    let mut rng = ChaCha8Rng::seed_from_u64(seeding.cell_seed(seed, x, z));
    draw_jitter(&mut rng)
}

// ---------------------------------------------------------------------------
// HeightGrid
// ---------------------------------------------------------------------------

/// Everything that determines a height grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightGridParams {
    pub width: usize,
    pub depth: usize,
    pub seed: u32,
    pub noise: NoiseParams,
    pub height_shift: f32,
    pub green_percentage: f32,
    pub height_multiplier: f32,
    pub round_amount: f32,
    pub cell_seeding: CellSeeding,
}

/// Per-vertex elevations for a `width x depth` cell map.
///
/// Points are stored row-major by `z`, so index `z * (width + 1) + x` is also
/// the index of the matching mesh vertex.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct HeightGrid {
    width: usize,
    depth: usize,
    raw: Vec<f32>,
    heights: Vec<f32>,
    observed_min: f32,
    observed_max: f32,
}

/// Threshold, scale and round a shifted noise sample.
fn shape_height(raw: f32, params: &HeightGridParams) -> f32 {
    let threshold = params.green_percentage - 0.5;
    let shaped = if raw > -threshold && raw < threshold {
        0.0
    } else {
        raw * (1.0 - params.green_percentage)
    };
    (shaped * params.height_multiplier * params.round_amount).round_ties_even() / params.round_amount
}

impl HeightGrid {
    /// Build a grid from a noise source.
    ///
    /// Fails with `InvalidDimension` before touching the noise source if
    /// either side is outside `MIN_MAP_SIZE..=MAX_MAP_SIZE`.
    pub fn build(params: &HeightGridParams, noise: &dyn NoiseSource) -> Result<Self, TerrainError> {
        let dims = MIN_MAP_SIZE..=MAX_MAP_SIZE;
        if !dims.contains(&params.width) || !dims.contains(&params.depth) {
            return Err(TerrainError::InvalidDimension {
                width: params.width,
                depth: params.depth,
            });
        }

        let points_x = params.width + 1;
        let points_z = params.depth + 1;
        let noise_map =
            noise.generate_noise_map(points_x, points_z, params.seed as i32, &params.noise)?;
        if noise_map.width() != points_x || noise_map.height() != points_z {
            return Err(TerrainError::NoiseShape {
                expected: (points_x, points_z),
                found: (noise_map.width(), noise_map.height()),
            });
        }

        let mut raw = Vec::with_capacity(points_x * points_z);
        let mut heights = Vec::with_capacity(points_x * points_z);
        let mut observed_min = f32::MAX;
        let mut observed_max = f32::MIN;

        for z in 0..points_z {
            for x in 0..points_x {
                let shifted = noise_map.get(x, z) - params.height_shift;
                let height = shape_height(shifted, params)
                    + cell_jitter(params.cell_seeding, params.seed, x, z);

                observed_min = observed_min.min(height);
                observed_max = observed_max.max(height);
                raw.push(shifted);
                heights.push(height);
            }
        }

        Ok(Self {
            width: params.width,
            depth: params.depth,
            raw,
            heights,
            observed_min,
            observed_max,
        })
    }

    /// Wrap explicit per-vertex heights (`(width + 1) * (depth + 1)` values).
    /// The raw samples are set equal to the heights.
    pub fn from_heights(width: usize, depth: usize, heights: Vec<f32>) -> Option<Self> {
        if width == 0 || depth == 0 || heights.len() != (width + 1) * (depth + 1) {
            return None;
        }
        let observed_min = heights.iter().cloned().fold(f32::MAX, f32::min);
        let observed_max = heights.iter().cloned().fold(f32::MIN, f32::max);
        Some(Self {
            width,
            depth,
            raw: heights.clone(),
            heights,
            observed_min,
            observed_max,
        })
    }

    /// Number of mesh cells along X.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of mesh cells along Z.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn vertex_count(&self) -> usize {
        self.heights.len()
    }

    #[inline]
    pub fn index(&self, x: usize, z: usize) -> usize {
        z * (self.width + 1) + x
    }

    #[inline]
    pub fn height(&self, x: usize, z: usize) -> f32 {
        self.heights[self.index(x, z)]
    }

    /// Noise sample after the height shift, before thresholding.
    #[inline]
    pub fn raw(&self, x: usize, z: usize) -> f32 {
        self.raw[self.index(x, z)]
    }

    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// Flat enough to walk on and to place things.
    #[inline]
    pub fn is_flat(&self, x: usize, z: usize) -> bool {
        self.height(x, z).abs() < FLAT_HEIGHT_LIMIT
    }

    /// Unclamped `(min, max)` of the generated heights.
    pub fn observed_range(&self) -> (f32, f32) {
        (self.observed_min, self.observed_max)
    }

    /// Lower shading bound, never above `-SHADING_BOUND`.
    pub fn min_height(&self) -> f32 {
        self.observed_min.min(-SHADING_BOUND)
    }

    /// Upper shading bound, never below `SHADING_BOUND`.
    pub fn max_height(&self) -> f32 {
        self.observed_max.max(SHADING_BOUND)
    }
}
