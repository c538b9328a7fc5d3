use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;

use terrain::TerrainMesh;

use super::types::TerrainShading;
use crate::color_ramps::TERRAIN_HEIGHT;

/// Unnormalized face normal; its length is twice the triangle area.
fn face_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ]
}

fn normalize_or_up(n: [f32; 3]) -> [f32; 3] {
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if len < 1e-8 {
        [0.0, 1.0, 0.0]
    } else {
        [n[0] / len, n[1] / len, n[2] / len]
    }
}

/// Smooth per-vertex normals: area-weighted sum of adjacent face normals.
/// Vertices touched only by degenerate triangles point straight up.
pub fn vertex_normals(vertices: &[[f32; 3]], triangles: &[u32]) -> Vec<[f32; 3]> {
    let mut sums = vec![[0.0_f32; 3]; vertices.len()];
    for tri in triangles.chunks_exact(3) {
        let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let n = face_normal(vertices[i0], vertices[i1], vertices[i2]);
        for i in [i0, i1, i2] {
            sums[i][0] += n[0];
            sums[i][1] += n[1];
            sums[i][2] += n[2];
        }
    }
    sums.into_iter().map(normalize_or_up).collect()
}

/// UVs stretched once across the whole map, `[x / width, z / depth]`.
pub fn vertex_uvs(mesh: &TerrainMesh) -> Vec<[f32; 2]> {
    let row = mesh.width + 1;
    let w = mesh.width.max(1) as f32;
    let d = mesh.depth.max(1) as f32;
    (0..mesh.vertices.len())
        .map(|i| [(i % row) as f32 / w, (i / row) as f32 / d])
        .collect()
}

/// Convert the exported buffers into a renderable Bevy mesh.
pub fn build_render_mesh(terrain: &TerrainMesh, shading: &TerrainShading) -> Mesh {
    let positions = terrain.vertices.clone();
    let normals = vertex_normals(&terrain.vertices, &terrain.triangles);
    let uvs = vertex_uvs(terrain);
    let colors: Vec<[f32; 4]> = terrain
        .vertices
        .iter()
        .map(|v| TERRAIN_HEIGHT.sample_rgba(shading.normalize(v[1])))
        .collect();

    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
    .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, colors)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
    .with_inserted_indices(Indices::U32(terrain.triangles.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::render::mesh::VertexAttributeValues;
    use terrain::{build_mesh, HeightGrid};

    fn terrain_from(width: usize, depth: usize, heights: Vec<f32>) -> TerrainMesh {
        build_mesh(&HeightGrid::from_heights(width, depth, heights).unwrap(), 1.0)
    }

    #[test]
    fn flat_terrain_normals_point_up() {
        let terrain = terrain_from(3, 2, vec![0.0; 12]);
        for n in vertex_normals(&terrain.vertices, &terrain.triangles) {
            assert!((n[1] - 1.0).abs() < 1e-6, "normal {n:?}");
        }
    }

    #[test]
    fn slope_normals_lean_downhill() {
        // Height rises with x, so normals lean toward -x.
        let heights = (0..9).map(|i| (i % 3) as f32).collect();
        let terrain = terrain_from(2, 2, heights);
        for n in vertex_normals(&terrain.vertices, &terrain.triangles) {
            assert!(n[0] < 0.0 && n[1] > 0.0, "normal {n:?}");
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert!((len - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn degenerate_triangles_fall_back_to_up() {
        let vertices = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]];
        let normals = vertex_normals(&vertices, &[0, 1, 2]);
        assert_eq!(normals, vec![[0.0, 1.0, 0.0]; 3]);
    }

    #[test]
    fn uvs_span_map() {
        let terrain = terrain_from(4, 2, vec![0.0; 15]);
        let uvs = vertex_uvs(&terrain);
        assert_eq!(uvs[0], [0.0, 0.0]);
        assert_eq!(uvs[terrain.vertex_index(4, 2)], [1.0, 1.0]);
        assert_eq!(uvs[terrain.vertex_index(2, 1)], [0.5, 0.5]);
    }

    #[test]
    fn render_mesh_carries_buffers() {
        let terrain = terrain_from(2, 2, vec![0.0, 0.0, 0.0, 0.0, 5.0, 0.0, 0.0, 0.0, -5.0]);
        let shading = TerrainShading::from_mesh(&terrain);
        let mesh = build_render_mesh(&terrain, &shading);

        assert_eq!(mesh.count_vertices(), 9);
        match mesh.indices() {
            Some(Indices::U32(indices)) => assert_eq!(indices, &terrain.triangles),
            other => panic!("unexpected indices: {other:?}"),
        }
        let Some(VertexAttributeValues::Float32x4(colors)) = mesh.attribute(Mesh::ATTRIBUTE_COLOR)
        else {
            panic!("missing vertex colors");
        };
        // Peak and pit sit on opposite ends of the ramp.
        assert_eq!(colors[4], TERRAIN_HEIGHT.sample_rgba(1.0));
        assert_eq!(colors[8], TERRAIN_HEIGHT.sample_rgba(0.0));
    }
}
