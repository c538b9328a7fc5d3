use bevy::prelude::*;

pub mod config;
pub mod events;
pub mod generation;
pub mod height_grid;
pub mod mesh_builder;
pub mod noise;
pub mod placement;
pub mod regions;
pub mod systems;
pub mod terrain_config;
pub mod terrain_editor;
pub mod terrain_error;
pub mod terrain_rng;

#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

pub use events::{
    FindPlacement, FlattenTerrain, GenerateTerrain, PlacementResolved, TerrainFlattened,
    TerrainGenerated, TerrainGenerationFailed,
};
pub use generation::{generate_terrain, GeneratedTerrain};
pub use height_grid::{CellSeeding, HeightGrid, HeightGridParams};
pub use mesh_builder::{build_mesh, navigation_bounds, MapBounds, TerrainMesh};
pub use noise::{FastNoiseSource, NoiseMap, NoiseParams, NoiseSource};
pub use placement::{
    find_valid_position, position_or_origin, Obstacle, ObstacleSet, ObstructionCheck, Placement,
    PlacementError, PlacementQuery,
};
pub use regions::{segment_regions, FlatRegions, GridCoord, Region};
pub use systems::{LastPlacement, SkipTerrainInit, TerrainNoise};
pub use terrain_config::{MapPreset, TerrainConfig};
pub use terrain_editor::flatten_in_radius;
pub use terrain_error::TerrainError;
pub use terrain_rng::TerrainRng;

/// Terrain generation, editing and placement for a Bevy app.
///
/// Insert a `TerrainConfig` (and optionally a `TerrainNoise`) before adding
/// the plugin to override the defaults. Generated data is published as the
/// `HeightGrid`, `TerrainMesh`, `FlatRegions` and `MapBounds` resources.
pub struct TerrainPlugin;

impl Plugin for TerrainPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TerrainConfig>()
            .init_resource::<TerrainRng>()
            .init_resource::<TerrainNoise>()
            .init_resource::<LastPlacement>()
            .add_event::<GenerateTerrain>()
            .add_event::<TerrainGenerated>()
            .add_event::<TerrainGenerationFailed>()
            .add_event::<FlattenTerrain>()
            .add_event::<TerrainFlattened>()
            .add_event::<FindPlacement>()
            .add_event::<PlacementResolved>()
            .add_systems(Startup, systems::init_terrain)
            .add_systems(
                Update,
                (
                    systems::handle_generate_requests,
                    systems::handle_flatten_requests,
                    systems::handle_placement_requests,
                )
                    .chain(),
            );
    }
}
