mod mesh;
mod systems;
mod types;

pub use mesh::{build_render_mesh, vertex_normals, vertex_uvs};
pub use systems::sync_terrain_mesh;
pub use types::{TerrainShading, TerrainSurface};
