//! Coherent-noise source for heightmap synthesis.
//!
//! The height pipeline only depends on the [`NoiseSource`] trait: give it a
//! size, a seed and the octave parameters, get back a deterministic grid of
//! samples. [`FastNoiseSource`] is the default implementation, an
//! octave-summed Perlin field built on `fastnoise-lite` and normalized into
//! `[0, 1]` over the generated map.

use fastnoise_lite::{FastNoiseLite, NoiseType};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::{MIN_NOISE_SCALE, NOISE_OCTAVE_OFFSET_RANGE};
use crate::terrain_error::TerrainError;

/// Octave parameters shared by every noise source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseParams {
    pub scale: f32,
    pub octaves: u32,
    pub persistence: f32,
    pub lacunarity: f32,
    /// Sample-space offset `[x, z]`, lets a seed be scrolled without reseeding.
    pub offset: [f32; 2],
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            scale: 25.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            offset: [0.0, 0.0],
        }
    }
}

/// Row-major grid of noise samples, `width` columns by `height` rows.
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseMap {
    width: usize,
    height: usize,
    values: Vec<f32>,
}

impl NoiseMap {
    /// Wrap precomputed samples. Returns `None` if `values` has the wrong length.
    pub fn from_values(width: usize, height: usize, values: Vec<f32>) -> Option<Self> {
        (values.len() == width * height).then_some(Self {
            width,
            height,
            values,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, z: usize) -> f32 {
        self.values[z * self.width + x]
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

/// A deterministic 2D noise generator: same inputs, same map.
pub trait NoiseSource: Send + Sync {
    fn generate_noise_map(
        &self,
        width: usize,
        height: usize,
        seed: i32,
        params: &NoiseParams,
    ) -> Result<NoiseMap, TerrainError>;
}

/// Octave-summed Perlin noise normalized into `[0, 1]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FastNoiseSource;

/// Per-octave sample offsets, drawn from a stream seeded by `seed`.
fn octave_offsets(seed: i32, params: &NoiseParams) -> Vec<[f32; 2]> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed as u32 as u64);
    (0..params.octaves)
        .map(|_| {
            let ox = rng.gen_range(-NOISE_OCTAVE_OFFSET_RANGE..NOISE_OCTAVE_OFFSET_RANGE);
            let oz = rng.gen_range(-NOISE_OCTAVE_OFFSET_RANGE..NOISE_OCTAVE_OFFSET_RANGE);
            [ox + params.offset[0], oz - params.offset[1]]
        })
        .collect()
}

impl NoiseSource for FastNoiseSource {
    fn generate_noise_map(
        &self,
        width: usize,
        height: usize,
        seed: i32,
        params: &NoiseParams,
    ) -> Result<NoiseMap, TerrainError> {
        let mut noise = FastNoiseLite::with_seed(seed);
        noise.set_noise_type(Some(NoiseType::Perlin));
        noise.set_frequency(Some(1.0));

        let offsets = octave_offsets(seed, params);
        let scale = if params.scale <= 0.0 {
            MIN_NOISE_SCALE
        } else {
            params.scale
        };
        let half_w = width as f32 / 2.0;
        let half_h = height as f32 / 2.0;

        let mut values = vec![0.0_f32; width * height];
        let mut min = f32::MAX;
        let mut max = f32::MIN;

        for z in 0..height {
            for x in 0..width {
                let mut amplitude = 1.0_f32;
                let mut frequency = 1.0_f32;
                let mut sum = 0.0_f32;

                for offset in &offsets {
                    let sx = (x as f32 - half_w + offset[0]) / scale * frequency;
                    let sz = (z as f32 - half_h + offset[1]) / scale * frequency;
                    // get_noise_2d is already in [-1, 1]
                    sum += noise.get_noise_2d(sx, sz) * amplitude;
                    amplitude *= params.persistence;
                    frequency *= params.lacunarity;
                }

                min = min.min(sum);
                max = max.max(sum);
                values[z * width + x] = sum;
            }
        }

        let span = max - min;
        for v in values.iter_mut() {
            *v = if span > f32::EPSILON {
                (*v - min) / span
            } else {
                0.0
            };
        }

        Ok(NoiseMap {
            width,
            height,
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> NoiseParams {
        NoiseParams {
            scale: 5.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            offset: [0.0, 0.0],
        }
    }

    #[test]
    fn test_noise_map_deterministic() {
        let a = FastNoiseSource
            .generate_noise_map(11, 11, 42, &params())
            .unwrap();
        let b = FastNoiseSource
            .generate_noise_map(11, 11, 42, &params())
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_noise_map_normalized() {
        let map = FastNoiseSource
            .generate_noise_map(32, 24, 7, &params())
            .unwrap();
        assert_eq!(map.values().len(), 32 * 24);
        for &v in map.values() {
            assert!((0.0..=1.0).contains(&v), "sample out of range: {v}");
        }
        let max = map.values().iter().cloned().fold(f32::MIN, f32::max);
        let min = map.values().iter().cloned().fold(f32::MAX, f32::min);
        assert!((max - 1.0).abs() < 1e-5, "max should normalize to 1, got {max}");
        assert!(min.abs() < 1e-5, "min should normalize to 0, got {min}");
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = FastNoiseSource
            .generate_noise_map(16, 16, 1, &params())
            .unwrap();
        let b = FastNoiseSource
            .generate_noise_map(16, 16, 2, &params())
            .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_zero_octaves_is_flat() {
        let p = NoiseParams {
            octaves: 0,
            ..params()
        };
        let map = FastNoiseSource.generate_noise_map(8, 8, 3, &p).unwrap();
        assert!(map.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_non_positive_scale_is_clamped() {
        let p = NoiseParams {
            scale: 0.0,
            ..params()
        };
        let map = FastNoiseSource.generate_noise_map(8, 8, 3, &p).unwrap();
        assert!(map.values().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_from_values_checks_length() {
        assert!(NoiseMap::from_values(2, 2, vec![0.0; 4]).is_some());
        assert!(NoiseMap::from_values(2, 2, vec![0.0; 3]).is_none());
        let map = NoiseMap::from_values(2, 2, vec![0.0, 1.0, 2.0, 3.0]).unwrap();
        assert_eq!(map.get(1, 0), 1.0);
        assert_eq!(map.get(0, 1), 2.0);
    }
}
