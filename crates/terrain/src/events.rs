use bevy::prelude::*;

use crate::placement::{position_or_origin, Placement, PlacementError};

// =============================================================================
// Requests
// =============================================================================

/// Rebuild the terrain from the current `TerrainConfig`.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct GenerateTerrain {
    /// Overrides `TerrainConfig::seed` for this and later generations.
    pub seed: Option<u32>,
}

/// Flatten the live mesh around `center`.
#[derive(Event, Debug, Clone, Copy)]
pub struct FlattenTerrain {
    pub center: Vec3,
    pub radius: f32,
}

/// Search the flat regions for a free spot for a box of `half_extents`.
#[derive(Event, Debug, Clone, Copy)]
pub struct FindPlacement {
    pub half_extents: Vec3,
    pub max_iterations: usize,
}

// =============================================================================
// Outcomes
// =============================================================================

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct TerrainGenerated {
    pub seed: u32,
    pub width: usize,
    pub depth: usize,
    pub region_count: usize,
}

#[derive(Event, Debug, Clone)]
pub struct TerrainGenerationFailed {
    pub reason: String,
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct TerrainFlattened {
    pub center: Vec3,
    pub radius: f32,
    /// Vertices rewritten.
    pub edited: usize,
}

#[derive(Event, Debug)]
pub struct PlacementResolved {
    pub result: Result<Placement, PlacementError>,
}

impl PlacementResolved {
    /// Found position, or the origin when the search failed.
    pub fn position(&self) -> Vec3 {
        position_or_origin(&self.result)
    }
}
