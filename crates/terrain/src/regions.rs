//! Flat-region segmentation.
//!
//! A region is a maximal 4-connected set of cells with `|height| < 1`
//! holding more than `min_cells` cells. The outer scan runs `x` then `z`
//! over the `width x depth` cells, so regions come out in order of first
//! discovery. Every flood-filled cell is marked visited whether its region
//! is kept or rejected, which keeps the scan linear without changing the
//! result set.

use std::collections::VecDeque;

use bevy::prelude::*;

use crate::height_grid::HeightGrid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCoord {
    pub x: usize,
    pub z: usize,
}

impl GridCoord {
    pub const fn new(x: usize, z: usize) -> Self {
        Self { x, z }
    }

    /// In-bounds edge neighbours on a `width x depth` cell grid.
    pub fn neighbors4(self, width: usize, depth: usize) -> ([GridCoord; 4], usize) {
        let mut result = [self; 4];
        let mut count = 0;
        if self.x > 0 {
            result[count] = GridCoord::new(self.x - 1, self.z);
            count += 1;
        }
        if self.x + 1 < width {
            result[count] = GridCoord::new(self.x + 1, self.z);
            count += 1;
        }
        if self.z > 0 {
            result[count] = GridCoord::new(self.x, self.z - 1);
            count += 1;
        }
        if self.z + 1 < depth {
            result[count] = GridCoord::new(self.x, self.z + 1);
            count += 1;
        }
        (result, count)
    }
}

/// Connected flat cells in flood-fill order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub cells: Vec<GridCoord>,
}

impl Region {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: GridCoord) -> bool {
        self.cells.contains(&cell)
    }
}

/// Regions found by the last generation pass.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct FlatRegions(pub Vec<Region>);

impl FlatRegions {
    pub fn total_cells(&self) -> usize {
        self.0.iter().map(Region::len).sum()
    }
}

/// Split the flat cells of `grid` into connected regions larger than `min_cells`.
pub fn segment_regions(grid: &HeightGrid, min_cells: usize) -> Vec<Region> {
    let width = grid.width();
    let depth = grid.depth();
    let mut visited = vec![false; width * depth];
    let mut regions = Vec::new();
    let mut queue = VecDeque::new();

    for x in 0..width {
        for z in 0..depth {
            if visited[z * width + x] || !grid.is_flat(x, z) {
                continue;
            }

            let start = GridCoord::new(x, z);
            let mut cells = Vec::new();
            visited[z * width + x] = true;
            queue.push_back(start);

            while let Some(cell) = queue.pop_front() {
                cells.push(cell);
                let (neighbors, count) = cell.neighbors4(width, depth);
                for &n in &neighbors[..count] {
                    let idx = n.z * width + n.x;
                    if !visited[idx] && grid.is_flat(n.x, n.z) {
                        visited[idx] = true;
                        queue.push_back(n);
                    }
                }
            }

            if cells.len() > min_cells {
                regions.push(Region { cells });
            }
        }
    }

    regions
}
