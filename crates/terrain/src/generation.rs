//! One full generation pass: heights, mesh, flat regions.

use std::time::Instant;

use bevy::log::{debug, info};

use crate::config::MIN_REGION_CELLS;
use crate::height_grid::HeightGrid;
use crate::mesh_builder::{build_mesh, MapBounds, TerrainMesh};
use crate::noise::NoiseSource;
use crate::regions::{segment_regions, Region};
use crate::terrain_config::TerrainConfig;
use crate::terrain_error::TerrainError;

/// Everything one generation pass produces.
#[derive(Debug, Clone)]
pub struct GeneratedTerrain {
    pub seed: u32,
    pub bounds: MapBounds,
    pub grid: HeightGrid,
    pub mesh: TerrainMesh,
    pub regions: Vec<Region>,
}

/// Validate `config` and build the height grid, mesh and flat regions.
///
/// The seed is used as given; resolve a zero seed with
/// [`TerrainConfig::resolve_seed`] first if a random map is wanted.
pub fn generate_terrain(
    config: &TerrainConfig,
    noise: &dyn NoiseSource,
) -> Result<GeneratedTerrain, TerrainError> {
    config.validate()?;

    let start = Instant::now();
    let grid = HeightGrid::build(&config.height_params(), noise)?;
    let heights_ms = start.elapsed().as_secs_f64() * 1000.0;

    let mesh_start = Instant::now();
    let mesh = build_mesh(&grid, config.vertex_distance);
    let mesh_ms = mesh_start.elapsed().as_secs_f64() * 1000.0;

    let regions_start = Instant::now();
    let regions = segment_regions(&grid, MIN_REGION_CELLS);
    let regions_ms = regions_start.elapsed().as_secs_f64() * 1000.0;

    debug!(
        "Terrain timings: heights {:.2}ms, mesh {:.2}ms, regions {:.2}ms",
        heights_ms, mesh_ms, regions_ms
    );
    let (min, max) = grid.observed_range();
    info!(
        "Generated {}x{} terrain (seed {}): {} vertices, {} triangles, {} flat regions, heights {:.2}..{:.2}, mesh built in {:.2}ms",
        config.map_width,
        config.map_depth,
        config.seed,
        mesh.vertices.len(),
        mesh.triangle_count(),
        regions.len(),
        min,
        max,
        mesh_ms
    );

    Ok(GeneratedTerrain {
        seed: config.seed,
        bounds: config.map_bounds(),
        grid,
        mesh,
        regions,
    })
}
