//! ECS systems driving generation, flattening and placement.

use bevy::prelude::*;

use crate::events::{
    FindPlacement, FlattenTerrain, GenerateTerrain, PlacementResolved, TerrainFlattened,
    TerrainGenerated, TerrainGenerationFailed,
};
use crate::generation::generate_terrain;
use crate::mesh_builder::{MapBounds, TerrainMesh};
use crate::noise::{FastNoiseSource, NoiseSource};
use crate::placement::{
    find_valid_position, Obstacle, ObstacleSet, Placement, PlacementError, PlacementQuery,
};
use crate::regions::FlatRegions;
use crate::terrain_config::TerrainConfig;
use crate::terrain_editor::flatten_in_radius;
use crate::terrain_rng::TerrainRng;

/// Marker resource that, when present, makes `init_terrain` skip the startup
/// generation. The test harness uses it to control when terrain is built.
#[derive(Resource)]
pub struct SkipTerrainInit;

/// Noise source used by every generation pass.
#[derive(Resource)]
pub struct TerrainNoise(pub Box<dyn NoiseSource>);

impl Default for TerrainNoise {
    fn default() -> Self {
        Self(Box::new(FastNoiseSource))
    }
}

/// Outcome of the most recent successful placement search.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct LastPlacement(pub Option<Placement>);

/// Apply the preset, resolve the seed, build, and publish the resources.
fn run_generation(
    commands: &mut Commands,
    config: &mut TerrainConfig,
    rng: &mut TerrainRng,
    noise: &TerrainNoise,
    generated: &mut EventWriter<TerrainGenerated>,
    failed: &mut EventWriter<TerrainGenerationFailed>,
) {
    match config.apply_configured_preset() {
        Ok(true) => info!("Applied map preset {:?}", config.preset_path),
        Ok(false) => {}
        Err(e) => {
            warn!("Terrain preset could not be applied: {}", e);
            failed.send(TerrainGenerationFailed {
                reason: e.to_string(),
            });
            return;
        }
    }

    let seed = config.resolve_seed(&mut rng.0);
    match generate_terrain(config, noise.0.as_ref()) {
        Ok(terrain) => {
            generated.send(TerrainGenerated {
                seed,
                width: terrain.bounds.width,
                depth: terrain.bounds.depth,
                region_count: terrain.regions.len(),
            });
            commands.insert_resource(terrain.bounds);
            commands.insert_resource(terrain.grid);
            commands.insert_resource(terrain.mesh);
            commands.insert_resource(FlatRegions(terrain.regions));
            commands.insert_resource(LastPlacement::default());
        }
        Err(e) => {
            warn!("Terrain generation failed (seed {}): {}", seed, e);
            failed.send(TerrainGenerationFailed {
                reason: e.to_string(),
            });
        }
    }
}

pub fn init_terrain(
    mut commands: Commands,
    mut config: ResMut<TerrainConfig>,
    mut rng: ResMut<TerrainRng>,
    noise: Res<TerrainNoise>,
    skip: Option<Res<SkipTerrainInit>>,
    mut generated: EventWriter<TerrainGenerated>,
    mut failed: EventWriter<TerrainGenerationFailed>,
) {
    if skip.is_some() {
        return;
    }
    run_generation(
        &mut commands,
        &mut config,
        &mut rng,
        &noise,
        &mut generated,
        &mut failed,
    );
}

/// Several requests in one frame collapse into a single rebuild; the last
/// seed override wins.
pub fn handle_generate_requests(
    mut requests: EventReader<GenerateTerrain>,
    mut commands: Commands,
    mut config: ResMut<TerrainConfig>,
    mut rng: ResMut<TerrainRng>,
    noise: Res<TerrainNoise>,
    mut generated: EventWriter<TerrainGenerated>,
    mut failed: EventWriter<TerrainGenerationFailed>,
) {
    let mut requested = false;
    for request in requests.read() {
        requested = true;
        if let Some(seed) = request.seed {
            config.seed = seed;
        }
    }
    if !requested {
        return;
    }
    run_generation(
        &mut commands,
        &mut config,
        &mut rng,
        &noise,
        &mut generated,
        &mut failed,
    );
}

/// Flatten edits only the exported mesh; the height grid keeps its values.
pub fn handle_flatten_requests(
    mut requests: EventReader<FlattenTerrain>,
    mesh: Option<ResMut<TerrainMesh>>,
    mut rng: ResMut<TerrainRng>,
    mut flattened: EventWriter<TerrainFlattened>,
) {
    let Some(mut mesh) = mesh else {
        for request in requests.read() {
            warn!("Flatten at {} ignored: no terrain mesh yet", request.center);
        }
        return;
    };

    for request in requests.read() {
        let edited = flatten_in_radius(&mut mesh.vertices, request.center, request.radius, &mut rng.0);
        debug!(
            "Flattened {} vertices around {} (radius {})",
            edited, request.center, request.radius
        );
        flattened.send(TerrainFlattened {
            center: request.center,
            radius: request.radius,
            edited,
        });
    }
}

pub fn handle_placement_requests(
    mut requests: EventReader<FindPlacement>,
    regions: Option<Res<FlatRegions>>,
    bounds: Option<Res<MapBounds>>,
    obstacles: Query<(&Transform, &Obstacle)>,
    mut rng: ResMut<TerrainRng>,
    mut last: ResMut<LastPlacement>,
    mut resolved: EventWriter<PlacementResolved>,
) {
    if requests.is_empty() {
        return;
    }
    let (Some(regions), Some(bounds)) = (regions, bounds) else {
        for _ in requests.read() {
            warn!("Placement requested before terrain was generated");
            resolved.send(PlacementResolved {
                result: Err(PlacementError::EmptyRegionSet),
            });
        }
        return;
    };

    let obstacle_set: ObstacleSet = obstacles
        .iter()
        .map(|(transform, obstacle)| (transform.translation, obstacle.half_extents))
        .collect();

    for request in requests.read() {
        let query = PlacementQuery {
            half_extents: request.half_extents,
            max_iterations: request.max_iterations,
            bounds: *bounds,
        };
        let result = find_valid_position(&regions.0, &query, &obstacle_set, &mut rng.0);
        match &result {
            Ok(placement) => {
                debug!(
                    "Placement found at {} after {} attempts",
                    placement.position, placement.attempts
                );
                last.0 = Some(*placement);
            }
            Err(e) => warn!("Placement search failed: {}", e),
        }
        resolved.send(PlacementResolved { result });
    }
}
