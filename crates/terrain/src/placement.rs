//! Random placement search over flat regions.
//!
//! Bounded rejection sampling: each attempt picks a uniformly random region,
//! then a uniformly random cell inside it. Cells already tried in this call
//! are skipped. A cell must sit strictly inside `PLACEMENT_EDGE_MARGIN` from
//! every map edge; surviving candidates are lifted to world space at
//! `y = PLACEMENT_HEIGHT` and handed to the obstruction check. The first
//! candidate with zero overlaps wins. Every attempt counts toward
//! `max_iterations`, duplicates included, so the search always terminates.

use std::collections::HashSet;
use std::fmt;

use bevy::prelude::*;
use rand::Rng;

use crate::config::{PLACEMENT_EDGE_MARGIN, PLACEMENT_HEIGHT};
use crate::mesh_builder::MapBounds;
use crate::regions::{GridCoord, Region};
use crate::terrain_error::CollaboratorError;

// ---------------------------------------------------------------------------
// Obstruction collaborator
// ---------------------------------------------------------------------------

/// Answers "how many obstacles intersect this box?".
pub trait ObstructionCheck {
    fn overlap_count(&self, center: Vec3, half_extents: Vec3) -> Result<usize, CollaboratorError>;
}

/// Marks an entity as blocking placement. The box is centred on the
/// entity's translation.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub half_extents: Vec3,
}

/// Axis-aligned obstacle boxes, `(center, half_extents)`.
#[derive(Debug, Clone, Default)]
pub struct ObstacleSet {
    boxes: Vec<(Vec3, Vec3)>,
}

impl ObstacleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, center: Vec3, half_extents: Vec3) {
        self.boxes.push((center, half_extents.abs()));
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

impl FromIterator<(Vec3, Vec3)> for ObstacleSet {
    fn from_iter<I: IntoIterator<Item = (Vec3, Vec3)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (center, half_extents) in iter {
            set.push(center, half_extents);
        }
        set
    }
}

impl ObstructionCheck for ObstacleSet {
    /// Boxes that only touch do not overlap.
    fn overlap_count(&self, center: Vec3, half_extents: Vec3) -> Result<usize, CollaboratorError> {
        let half_extents = half_extents.abs();
        Ok(self
            .boxes
            .iter()
            .filter(|(c, h)| {
                let gap = (center - *c).abs();
                let reach = half_extents + *h;
                gap.x < reach.x && gap.y < reach.y && gap.z < reach.z
            })
            .count())
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum PlacementError {
    /// No region holds any cell.
    EmptyRegionSet,
    /// `attempts` samples were drawn without an accepted, unobstructed cell.
    SearchExhausted { attempts: usize },
    /// The obstruction check failed; the original error is kept as the source.
    Obstruction(CollaboratorError),
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementError::EmptyRegionSet => write!(f, "No flat region to place into"),
            PlacementError::SearchExhausted { attempts } => {
                write!(f, "No free position found after {attempts} attempts")
            }
            PlacementError::Obstruction(e) => write!(f, "Obstruction check failed: {e}"),
        }
    }
}

impl std::error::Error for PlacementError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlacementError::Obstruction(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementQuery {
    /// Half extents of the box that must be free.
    pub half_extents: Vec3,
    pub max_iterations: usize,
    pub bounds: MapBounds,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub cell: GridCoord,
    pub position: Vec3,
    /// Attempts used, including the successful one.
    pub attempts: usize,
}

/// World position of a successful search, the origin otherwise.
pub fn position_or_origin(result: &Result<Placement, PlacementError>) -> Vec3 {
    match result {
        Ok(placement) => placement.position,
        Err(_) => Vec3::ZERO,
    }
}

#[inline]
fn inside_margin(cell: GridCoord, bounds: &MapBounds) -> bool {
    let m = PLACEMENT_EDGE_MARGIN;
    cell.x > m && cell.x + m < bounds.width && cell.z > m && cell.z + m < bounds.depth
}

/// Look for an unobstructed cell in `regions`.
pub fn find_valid_position(
    regions: &[Region],
    query: &PlacementQuery,
    check: &dyn ObstructionCheck,
    rng: &mut impl Rng,
) -> Result<Placement, PlacementError> {
    if regions.iter().all(Region::is_empty) {
        return Err(PlacementError::EmptyRegionSet);
    }

    let mut tried: HashSet<GridCoord> = HashSet::new();

    for attempt in 1..=query.max_iterations {
        let region = &regions[rng.gen_range(0..regions.len())];
        if region.is_empty() {
            continue;
        }
        let cell = region.cells[rng.gen_range(0..region.len())];
        if !tried.insert(cell) || !inside_margin(cell, &query.bounds) {
            continue;
        }

        let position = query.bounds.grid_to_world(cell.x, cell.z, PLACEMENT_HEIGHT);
        let overlaps = check
            .overlap_count(position, query.half_extents)
            .map_err(PlacementError::Obstruction)?;
        if overlaps == 0 {
            return Ok(Placement {
                cell,
                position,
                attempts: attempt,
            });
        }
    }

    Err(PlacementError::SearchExhausted {
        attempts: query.max_iterations,
    })
}
