//! Vertex and index buffers for a height grid.
//!
//! One vertex per grid point, index `z * (width + 1) + x`. Each cell emits
//! two triangles from corners `p0 = (x, z)`, `p1 = (x, z + 1)`,
//! `p2 = (x + 1, z)`, `p3 = (x + 1, z + 1)` with the fixed winding
//! `(p0, p1, p2), (p2, p1, p3)`, which faces +Y. Zero-area triangles are kept.

use bevy::prelude::*;

use crate::height_grid::HeightGrid;

/// Map extent in grid cells plus the world spacing between vertices.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct MapBounds {
    pub width: usize,
    pub depth: usize,
    pub vertex_distance: f32,
}

impl MapBounds {
    /// World-space size of the map along X and Z.
    pub fn world_extent(&self) -> Vec2 {
        Vec2::new(
            self.width as f32 * self.vertex_distance,
            self.depth as f32 * self.vertex_distance,
        )
    }

    /// Grid point to world position at the given elevation.
    pub fn grid_to_world(&self, x: usize, z: usize, y: f32) -> Vec3 {
        Vec3::new(
            x as f32 * self.vertex_distance,
            y,
            z as f32 * self.vertex_distance,
        )
    }
}

/// Exported triangle mesh, consumed by the renderer and the terrain editor.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct TerrainMesh {
    pub vertices: Vec<[f32; 3]>,
    pub triangles: Vec<u32>,
    pub width: usize,
    pub depth: usize,
}

impl TerrainMesh {
    #[inline]
    pub fn vertex_index(&self, x: usize, z: usize) -> usize {
        z * (self.width + 1) + x
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Axis-aligned `(min, max)` over all vertices.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.vertices.iter().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(min, max), v| {
                let p = Vec3::from_array(*v);
                (min.min(p), max.max(p))
            },
        )
    }
}

/// Lay out the vertices and triangles of `grid` with `vertex_distance` spacing.
pub fn build_mesh(grid: &HeightGrid, vertex_distance: f32) -> TerrainMesh {
    let width = grid.width();
    let depth = grid.depth();
    let row = width + 1;

    let mut vertices = Vec::with_capacity(grid.vertex_count());
    for z in 0..=depth {
        for x in 0..=width {
            vertices.push([
                x as f32 * vertex_distance,
                grid.height(x, z),
                z as f32 * vertex_distance,
            ]);
        }
    }

    let mut triangles = Vec::with_capacity(width * depth * 6);
    for z in 0..depth {
        for x in 0..width {
            let p0 = (z * row + x) as u32;
            let p1 = ((z + 1) * row + x) as u32;
            let p2 = (z * row + x + 1) as u32;
            let p3 = ((z + 1) * row + x + 1) as u32;
            triangles.extend_from_slice(&[p0, p1, p2, p2, p1, p3]);
        }
    }

    TerrainMesh {
        vertices,
        triangles,
        width,
        depth,
    }
}

/// Box the navigation backend is built over: `(center, size)`.
pub fn navigation_bounds(bounds: &MapBounds) -> (Vec3, Vec3) {
    let extent = bounds.world_extent();
    let center = Vec3::new(extent.x / 2.0, 0.0, extent.y / 2.0);
    let size = Vec3::new(extent.x, 1.0, extent.y);
    (center, size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_grid(width: usize, depth: usize) -> HeightGrid {
        HeightGrid::from_heights(width, depth, vec![0.0; (width + 1) * (depth + 1)]).unwrap()
    }

    #[test]
    fn test_triangle_count_invariant() {
        for (w, d) in [(1, 1), (1, 5), (4, 3), (17, 9)] {
            let mesh = build_mesh(&flat_grid(w, d), 1.0);
            assert_eq!(mesh.triangles.len(), w * d * 6);
            assert_eq!(mesh.triangle_count(), w * d * 2);
            assert_eq!(mesh.vertices.len(), (w + 1) * (d + 1));
            assert!(mesh
                .triangles
                .iter()
                .all(|&i| (i as usize) < mesh.vertices.len()));
        }
    }

    #[test]
    fn test_single_cell_winding() {
        let mesh = build_mesh(&flat_grid(1, 1), 1.0);
        // p0 = 0, p1 = 2, p2 = 1, p3 = 3
        assert_eq!(mesh.triangles, vec![0, 2, 1, 1, 2, 3]);
    }

    #[test]
    fn test_winding_faces_up() {
        let mesh = build_mesh(&flat_grid(3, 2), 2.0);
        for tri in mesh.triangles.chunks(3) {
            let a = Vec3::from_array(mesh.vertices[tri[0] as usize]);
            let b = Vec3::from_array(mesh.vertices[tri[1] as usize]);
            let c = Vec3::from_array(mesh.vertices[tri[2] as usize]);
            let normal = (b - a).cross(c - a);
            assert!(normal.y > 0.0, "triangle {tri:?} faces down");
        }
    }

    #[test]
    fn test_vertex_positions() {
        let heights = vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let grid = HeightGrid::from_heights(2, 1, heights).unwrap();
        let mesh = build_mesh(&grid, 2.5);
        let idx = mesh.vertex_index(1, 1);
        assert_eq!(idx, 4);
        assert_eq!(mesh.vertices[idx], [2.5, 4.0, 2.5]);
        assert_eq!(mesh.vertices[2], [5.0, 2.0, 0.0]);
    }

    #[test]
    fn test_bounds() {
        let heights = vec![-2.0, 0.0, 0.0, 0.0, 0.0, 3.0];
        let grid = HeightGrid::from_heights(2, 1, heights).unwrap();
        let (min, max) = build_mesh(&grid, 1.0).bounds();
        assert_eq!(min, Vec3::new(0.0, -2.0, 0.0));
        assert_eq!(max, Vec3::new(2.0, 3.0, 1.0));
    }

    #[test]
    fn test_navigation_bounds() {
        let bounds = MapBounds {
            width: 100,
            depth: 60,
            vertex_distance: 2.0,
        };
        let (center, size) = navigation_bounds(&bounds);
        assert_eq!(center, Vec3::new(100.0, 0.0, 60.0));
        assert_eq!(size, Vec3::new(200.0, 1.0, 120.0));
    }
}
