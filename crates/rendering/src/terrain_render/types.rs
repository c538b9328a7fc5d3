use bevy::prelude::*;

use terrain::config::SHADING_BOUND;
use terrain::TerrainMesh;

/// Marker for the single entity that renders the terrain mesh.
#[derive(Component)]
pub struct TerrainSurface;

/// Elevation range the height ramp is stretched over.
///
/// Always spans at least `[-1, 1]` so a perfectly flat map still shades.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct TerrainShading {
    pub min_y: f32,
    pub max_y: f32,
}

impl Default for TerrainShading {
    fn default() -> Self {
        Self {
            min_y: -SHADING_BOUND,
            max_y: SHADING_BOUND,
        }
    }
}

impl TerrainShading {
    pub fn from_range(min_y: f32, max_y: f32) -> Self {
        Self {
            min_y: min_y.min(-SHADING_BOUND),
            max_y: max_y.max(SHADING_BOUND),
        }
    }

    /// Recompute bounds from the live vertex buffer (picks up flatten edits).
    pub fn from_mesh(mesh: &TerrainMesh) -> Self {
        let (min, max) = mesh.bounds();
        Self::from_range(min.y, max.y)
    }

    /// Map an elevation into `[0, 1]` across the shading range.
    pub fn normalize(&self, y: f32) -> f32 {
        ((y - self.min_y) / (self.max_y - self.min_y)).clamp(0.0, 1.0)
    }
}
