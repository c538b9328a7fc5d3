//! # TestTerrain - headless test harness for the terrain plugin
//!
//! Wraps `bevy::app::App` + `MinimalPlugins` + `TerrainPlugin` so tests can
//! drive generation, flattening and placement through events without a
//! window or renderer. Also carries small `NoiseSource` doubles.

use std::sync::atomic::{AtomicUsize, Ordering};

use bevy::app::App;
use bevy::prelude::*;

use crate::events::{FindPlacement, FlattenTerrain, GenerateTerrain};
use crate::height_grid::HeightGrid;
use crate::mesh_builder::TerrainMesh;
use crate::noise::{NoiseMap, NoiseParams, NoiseSource};
use crate::placement::Obstacle;
use crate::regions::FlatRegions;
use crate::systems::{SkipTerrainInit, TerrainNoise};
use crate::terrain_config::TerrainConfig;
use crate::terrain_error::TerrainError;
use crate::terrain_rng::TerrainRng;
use crate::TerrainPlugin;

/// A headless Bevy App wrapping `TerrainPlugin`.
pub struct TestTerrain {
    app: App,
}

impl Default for TestTerrain {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTerrain {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Plugin installed, startup generation skipped. Nothing is built until
    /// `generate()` is called.
    pub fn new() -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);

        // Insert the marker BEFORE TerrainPlugin so init_terrain skips.
        app.insert_resource(SkipTerrainInit);
        app.add_plugins(TerrainPlugin);
        app.update();

        Self { app }
    }

    /// Let the startup system build the map from `config`.
    pub fn with_startup_generation(config: TerrainConfig) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(config);
        app.add_plugins(TerrainPlugin);
        app.update();
        Self { app }
    }

    // -----------------------------------------------------------------------
    // Setup (builder pattern)
    // -----------------------------------------------------------------------

    pub fn with_config(mut self, config: TerrainConfig) -> Self {
        self.app.insert_resource(config);
        self
    }

    pub fn with_noise(mut self, noise: impl NoiseSource + 'static) -> Self {
        self.app.insert_resource(TerrainNoise(Box::new(noise)));
        self
    }

    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.app.insert_resource(TerrainRng::from_seed_u64(seed));
        self
    }

    /// Spawn an obstacle box centred at `center`.
    pub fn with_obstacle(mut self, center: Vec3, half_extents: Vec3) -> Self {
        self.app
            .world_mut()
            .spawn((Transform::from_translation(center), Obstacle { half_extents }));
        self
    }

    // -----------------------------------------------------------------------
    // Actions (each sends a request and runs one frame)
    // -----------------------------------------------------------------------

    pub fn generate(&mut self) {
        self.send(GenerateTerrain::default());
    }

    pub fn generate_with_seed(&mut self, seed: u32) {
        self.send(GenerateTerrain { seed: Some(seed) });
    }

    pub fn flatten(&mut self, center: Vec3, radius: f32) {
        self.send(FlattenTerrain { center, radius });
    }

    pub fn find_placement(&mut self, half_extents: Vec3, max_iterations: usize) {
        self.send(FindPlacement {
            half_extents,
            max_iterations,
        });
    }

    pub fn send<E: Event>(&mut self, event: E) {
        self.app.world_mut().send_event(event);
        self.app.update();
    }

    pub fn update(&mut self) {
        self.app.update();
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    pub fn resource<T: Resource>(&self) -> &T {
        self.app.world().resource::<T>()
    }

    pub fn get_resource<T: Resource>(&self) -> Option<&T> {
        self.app.world().get_resource::<T>()
    }

    pub fn config(&self) -> &TerrainConfig {
        self.resource::<TerrainConfig>()
    }

    pub fn grid(&self) -> &HeightGrid {
        self.resource::<HeightGrid>()
    }

    pub fn mesh(&self) -> &TerrainMesh {
        self.resource::<TerrainMesh>()
    }

    pub fn regions(&self) -> &FlatRegions {
        self.resource::<FlatRegions>()
    }

    /// Take every pending event of type `E`.
    pub fn drain_events<E: Event>(&mut self) -> Vec<E> {
        self.app
            .world_mut()
            .resource_mut::<Events<E>>()
            .drain()
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Noise doubles
// ---------------------------------------------------------------------------

/// Every sample is the same value.
#[derive(Debug, Clone, Copy)]
pub struct ConstantNoise(pub f32);

impl NoiseSource for ConstantNoise {
    fn generate_noise_map(
        &self,
        width: usize,
        height: usize,
        _seed: i32,
        _params: &NoiseParams,
    ) -> Result<NoiseMap, TerrainError> {
        NoiseMap::from_values(width, height, vec![self.0; width * height]).ok_or(
            TerrainError::NoiseShape {
                expected: (width, height),
                found: (0, 0),
            },
        )
    }
}

/// Constant mid-level noise that counts how often it was asked.
#[derive(Debug, Default)]
pub struct CountingNoise {
    calls: AtomicUsize,
}

impl CountingNoise {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl NoiseSource for CountingNoise {
    fn generate_noise_map(
        &self,
        width: usize,
        height: usize,
        seed: i32,
        params: &NoiseParams,
    ) -> Result<NoiseMap, TerrainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        ConstantNoise(0.5).generate_noise_map(width, height, seed, params)
    }
}

/// Always fails.
#[derive(Debug, Clone, Copy)]
pub struct FailingNoise;

impl NoiseSource for FailingNoise {
    fn generate_noise_map(
        &self,
        _width: usize,
        _height: usize,
        _seed: i32,
        _params: &NoiseParams,
    ) -> Result<NoiseMap, TerrainError> {
        Err(TerrainError::NoiseSource("noise backend unavailable".into()))
    }
}

/// Returns a map one column short.
#[derive(Debug, Clone, Copy)]
pub struct WrongShapeNoise;

impl NoiseSource for WrongShapeNoise {
    fn generate_noise_map(
        &self,
        width: usize,
        height: usize,
        _seed: i32,
        _params: &NoiseParams,
    ) -> Result<NoiseMap, TerrainError> {
        let width = width.saturating_sub(1);
        NoiseMap::from_values(width, height, vec![0.5; width * height]).ok_or(
            TerrainError::NoiseShape {
                expected: (width, height),
                found: (0, 0),
            },
        )
    }
}
