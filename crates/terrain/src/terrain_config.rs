//! Terrain generation parameters and JSON map presets.
//!
//! `TerrainConfig` is the single resource that controls a generation pass.
//! A `MapPreset` is a JSON document carrying the same generation parameters;
//! when `use_preset` is set, the preset overwrites the config right before
//! the terrain is built.

use std::path::{Path, PathBuf};

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{MAX_MAP_SIZE, MAX_OCTAVES, MIN_MAP_SIZE};
use crate::height_grid::{CellSeeding, HeightGridParams};
use crate::mesh_builder::MapBounds;
use crate::noise::NoiseParams;
use crate::terrain_error::TerrainError;

/// Configuration for procedural terrain generation.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainConfig {
    /// Generation seed. `0` picks a random seed on the next generation.
    pub seed: u32,
    /// Noise sample offset `[x, z]`.
    pub offset: [f32; 2],
    /// Number of mesh cells along X (vertex grid is `map_width + 1` wide).
    pub map_width: usize,
    /// Number of mesh cells along Z.
    pub map_depth: usize,
    /// World-space distance between neighbouring vertices.
    pub vertex_distance: f32,
    pub height_multiplier: f32,
    /// Share of the noise range flattened to zero, in [0.1, 1].
    pub green_percentage: f32,
    /// Subtracted from every noise sample, in [0.1, 1].
    pub height_shift: f32,
    pub noise_scale: f32,
    pub octaves: u32,
    pub persistence: f32,
    pub lacunarity: f32,
    /// Heights are rounded to multiples of `1 / round_amount`, in [0.01, 1].
    pub round_amount: f32,
    pub cell_seeding: CellSeeding,
    pub use_preset: bool,
    pub preset_path: Option<PathBuf>,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            offset: [0.0, 0.0],
            map_width: 100,
            map_depth: 100,
            vertex_distance: 1.0,
            height_multiplier: 10.0,
            green_percentage: 0.6,
            height_shift: 0.5,
            noise_scale: 25.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            round_amount: 0.5,
            cell_seeding: CellSeeding::Hashed,
            use_preset: false,
            preset_path: None,
        }
    }
}

fn check_range(
    name: &'static str,
    value: f32,
    range: std::ops::RangeInclusive<f32>,
) -> Result<(), TerrainError> {
    if value.is_finite() && range.contains(&value) {
        Ok(())
    } else {
        Err(TerrainError::InvalidParameter { name, value })
    }
}

fn check_finite(name: &'static str, value: f32) -> Result<(), TerrainError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(TerrainError::InvalidParameter { name, value })
    }
}

impl TerrainConfig {
    /// Check every parameter against its documented range.
    pub fn validate(&self) -> Result<(), TerrainError> {
        let dims = MIN_MAP_SIZE..=MAX_MAP_SIZE;
        if !dims.contains(&self.map_width) || !dims.contains(&self.map_depth) {
            return Err(TerrainError::InvalidDimension {
                width: self.map_width,
                depth: self.map_depth,
            });
        }
        if !(self.vertex_distance.is_finite() && self.vertex_distance > 0.0) {
            return Err(TerrainError::InvalidParameter {
                name: "vertex_distance",
                value: self.vertex_distance,
            });
        }
        check_range("green_percentage", self.green_percentage, 0.1..=1.0)?;
        check_range("height_shift", self.height_shift, 0.1..=1.0)?;
        check_range("persistence", self.persistence, 0.0..=1.0)?;
        check_range("round_amount", self.round_amount, 0.01..=1.0)?;
        check_finite("height_multiplier", self.height_multiplier)?;
        check_finite("noise_scale", self.noise_scale)?;
        check_finite("lacunarity", self.lacunarity)?;
        if self.octaves > MAX_OCTAVES {
            return Err(TerrainError::InvalidParameter {
                name: "octaves",
                value: self.octaves as f32,
            });
        }
        Ok(())
    }

    /// Replace a zero seed with a random non-zero one and return the seed in use.
    ///
    /// The chosen seed is written back so the same map can be rebuilt later.
    pub fn resolve_seed(&mut self, rng: &mut impl Rng) -> u32 {
        if self.seed == 0 {
            self.seed = rng.gen_range(1..=i32::MAX as u32);
        }
        self.seed
    }

    pub fn noise_params(&self) -> NoiseParams {
        NoiseParams {
            scale: self.noise_scale,
            octaves: self.octaves,
            persistence: self.persistence,
            lacunarity: self.lacunarity,
            offset: self.offset,
        }
    }

    pub fn height_params(&self) -> HeightGridParams {
        HeightGridParams {
            width: self.map_width,
            depth: self.map_depth,
            seed: self.seed,
            noise: self.noise_params(),
            height_shift: self.height_shift,
            green_percentage: self.green_percentage,
            height_multiplier: self.height_multiplier,
            round_amount: self.round_amount,
            cell_seeding: self.cell_seeding,
        }
    }

    pub fn map_bounds(&self) -> MapBounds {
        MapBounds {
            width: self.map_width,
            depth: self.map_depth,
            vertex_distance: self.vertex_distance,
        }
    }

    /// Load and apply the configured preset if `use_preset` is set.
    /// Returns `true` if a preset was applied.
    pub fn apply_configured_preset(&mut self) -> Result<bool, TerrainError> {
        if !self.use_preset {
            return Ok(false);
        }
        let Some(path) = self.preset_path.clone() else {
            return Ok(false);
        };
        MapPreset::load(&path)?.apply(self);
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Map presets
// ---------------------------------------------------------------------------

/// A named set of generation parameters stored as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapPreset {
    #[serde(default)]
    pub name: String,
    /// Overrides the config seed when present.
    #[serde(default)]
    pub seed: Option<u32>,
    #[serde(default)]
    pub offset: [f32; 2],
    pub map_width: usize,
    pub map_depth: usize,
    pub vertex_distance: f32,
    pub height_multiplier: f32,
    pub green_percentage: f32,
    pub height_shift: f32,
    pub noise_scale: f32,
    pub octaves: u32,
    pub persistence: f32,
    pub lacunarity: f32,
    pub round_amount: f32,
    #[serde(default)]
    pub cell_seeding: CellSeeding,
}

impl MapPreset {
    pub fn from_json(json: &str) -> Result<Self, TerrainError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, TerrainError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn to_json(&self) -> Result<String, TerrainError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Capture the generation parameters of `config` as a preset.
    pub fn from_config(name: impl Into<String>, config: &TerrainConfig) -> Self {
        Self {
            name: name.into(),
            seed: (config.seed != 0).then_some(config.seed),
            offset: config.offset,
            map_width: config.map_width,
            map_depth: config.map_depth,
            vertex_distance: config.vertex_distance,
            height_multiplier: config.height_multiplier,
            green_percentage: config.green_percentage,
            height_shift: config.height_shift,
            noise_scale: config.noise_scale,
            octaves: config.octaves,
            persistence: config.persistence,
            lacunarity: config.lacunarity,
            round_amount: config.round_amount,
            cell_seeding: config.cell_seeding,
        }
    }

    /// Overwrite the generation parameters of `config`. Preset bookkeeping
    /// fields (`use_preset`, `preset_path`) are left alone.
    pub fn apply(&self, config: &mut TerrainConfig) {
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        config.offset = self.offset;
        config.map_width = self.map_width;
        config.map_depth = self.map_depth;
        config.vertex_distance = self.vertex_distance;
        config.height_multiplier = self.height_multiplier;
        config.green_percentage = self.green_percentage;
        config.height_shift = self.height_shift;
        config.noise_scale = self.noise_scale;
        config.octaves = self.octaves;
        config.persistence = self.persistence;
        config.lacunarity = self.lacunarity;
        config.round_amount = self.round_amount;
        config.cell_seeding = self.cell_seeding;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_default_is_valid() {
        assert!(TerrainConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_width_is_invalid_dimension() {
        let config = TerrainConfig {
            map_width: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TerrainError::InvalidDimension { width: 0, .. })
        ));
    }

    #[test]
    fn test_oversized_depth_is_invalid_dimension() {
        let config = TerrainConfig {
            map_depth: MAX_MAP_SIZE + 1,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TerrainError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_out_of_range_parameters() {
        let cases = [
            TerrainConfig {
                green_percentage: 0.05,
                ..Default::default()
            },
            TerrainConfig {
                height_shift: 1.5,
                ..Default::default()
            },
            TerrainConfig {
                round_amount: 0.0,
                ..Default::default()
            },
            TerrainConfig {
                octaves: 11,
                ..Default::default()
            },
            TerrainConfig {
                vertex_distance: -1.0,
                ..Default::default()
            },
            TerrainConfig {
                persistence: f32::NAN,
                ..Default::default()
            },
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(TerrainError::InvalidParameter { .. })),
                "expected InvalidParameter for {config:?}"
            );
        }
    }

    #[test]
    fn test_resolve_seed_keeps_explicit_seed() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut config = TerrainConfig {
            seed: 77,
            ..Default::default()
        };
        assert_eq!(config.resolve_seed(&mut rng), 77);
        assert_eq!(config.seed, 77);
    }

    #[test]
    fn test_resolve_seed_replaces_zero() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut config = TerrainConfig::default();
        let seed = config.resolve_seed(&mut rng);
        assert_ne!(seed, 0);
        assert_eq!(config.seed, seed);
        // Once resolved the seed sticks.
        assert_eq!(config.resolve_seed(&mut rng), seed);
    }

    #[test]
    fn test_preset_json_roundtrip_applies_parameters() {
        let source = TerrainConfig {
            seed: 9,
            map_width: 64,
            map_depth: 48,
            octaves: 6,
            ..Default::default()
        };
        let json = MapPreset::from_config("hills", &source).to_json().unwrap();
        let preset = MapPreset::from_json(&json).unwrap();
        assert_eq!(preset.name, "hills");

        let mut target = TerrainConfig::default();
        preset.apply(&mut target);
        assert_eq!(target.seed, 9);
        assert_eq!(target.map_width, 64);
        assert_eq!(target.map_depth, 48);
        assert_eq!(target.octaves, 6);
    }

    #[test]
    fn test_preset_without_seed_keeps_config_seed() {
        let json = r#"{
            "map_width": 20, "map_depth": 30, "vertex_distance": 2.0,
            "height_multiplier": 5.0, "green_percentage": 0.5, "height_shift": 0.5,
            "noise_scale": 10.0, "octaves": 3, "persistence": 0.4,
            "lacunarity": 2.0, "round_amount": 1.0
        }"#;
        let preset = MapPreset::from_json(json).unwrap();
        let mut config = TerrainConfig {
            seed: 1234,
            ..Default::default()
        };
        preset.apply(&mut config);
        assert_eq!(config.seed, 1234);
        assert_eq!(config.map_width, 20);
        assert_eq!(config.cell_seeding, CellSeeding::Hashed);
    }

    #[test]
    fn test_preset_bad_json() {
        assert!(matches!(
            MapPreset::from_json("{ nope"),
            Err(TerrainError::PresetParse(_))
        ));
    }

    #[test]
    fn test_missing_preset_file() {
        let mut config = TerrainConfig {
            use_preset: true,
            preset_path: Some(PathBuf::from("/definitely/not/here/preset.json")),
            ..Default::default()
        };
        assert!(matches!(
            config.apply_configured_preset(),
            Err(TerrainError::PresetIo(_))
        ));
    }

    #[test]
    fn test_preset_ignored_unless_enabled() {
        let mut config = TerrainConfig {
            use_preset: false,
            preset_path: Some(PathBuf::from("/definitely/not/here/preset.json")),
            ..Default::default()
        };
        assert!(!config.apply_configured_preset().unwrap());
    }
}
