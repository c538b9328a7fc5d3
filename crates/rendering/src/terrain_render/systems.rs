use bevy::prelude::*;

use terrain::TerrainMesh;

use super::mesh::build_render_mesh;
use super::types::{TerrainShading, TerrainSurface};

/// Rebuild the render mesh whenever `TerrainMesh` is inserted or edited.
/// The first build spawns the `TerrainSurface` entity; later builds swap the
/// mesh asset in place.
pub fn sync_terrain_mesh(
    mut commands: Commands,
    terrain: Option<Res<TerrainMesh>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    surfaces: Query<&Mesh3d, With<TerrainSurface>>,
) {
    let Some(terrain) = terrain else {
        return;
    };
    if !terrain.is_changed() {
        return;
    }

    let shading = TerrainShading::from_mesh(&terrain);
    let mesh = build_render_mesh(&terrain, &shading);
    commands.insert_resource(shading);

    if let Ok(handle) = surfaces.get_single() {
        if let Some(existing) = meshes.get_mut(&handle.0) {
            *existing = mesh;
            return;
        }
    }

    commands.spawn((
        Mesh3d(meshes.add(mesh)),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::WHITE,
            perceptual_roughness: 0.9,
            ..default()
        })),
        Transform::IDENTITY,
        TerrainSurface,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use terrain::{build_mesh, HeightGrid};

    fn headless_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(AssetPlugin::default());
        app.init_asset::<Mesh>();
        app.init_asset::<StandardMaterial>();
        app.add_systems(Update, sync_terrain_mesh);
        app
    }

    fn terrain_mesh(height: f32) -> TerrainMesh {
        build_mesh(&HeightGrid::from_heights(4, 4, vec![height; 25]).unwrap(), 1.0)
    }

    fn surface_count(app: &mut App) -> usize {
        app.world_mut()
            .query_filtered::<Entity, With<TerrainSurface>>()
            .iter(app.world())
            .count()
    }

    #[test]
    fn nothing_spawned_without_terrain() {
        let mut app = headless_app();
        app.update();
        assert_eq!(surface_count(&mut app), 0);
        assert!(app.world().get_resource::<TerrainShading>().is_none());
    }

    #[test]
    fn single_surface_across_updates() {
        let mut app = headless_app();
        app.insert_resource(terrain_mesh(0.0));
        app.update();
        assert_eq!(surface_count(&mut app), 1);
        assert_eq!(
            *app.world().resource::<TerrainShading>(),
            TerrainShading::default()
        );

        app.insert_resource(terrain_mesh(7.0));
        app.update();
        app.update();
        assert_eq!(surface_count(&mut app), 1);
        assert_eq!(app.world().resource::<TerrainShading>().max_y, 7.0);
        assert_eq!(app.world().resource::<Assets<Mesh>>().len(), 1);
    }
}
