use bevy::prelude::*;
use bevy::render::view::screenshot::{save_to_disk, Screenshot};
use bevy::window::PresentMode;
use bevy::winit::{UpdateMode, WinitSettings};

use rendering::camera::OrbitCamera;
use terrain::{
    FindPlacement, FlattenTerrain, GenerateTerrain, Obstacle, PlacementResolved, TerrainConfig,
    TerrainGenerated, TerrainPlugin,
};

const FLATTEN_RADIUS: f32 = 6.0;
const MARKER_HALF_EXTENTS: Vec3 = Vec3::new(1.0, 1.0, 1.0);
const PLACEMENT_ITERATIONS: usize = 200;

fn main() {
    let config = config_from_env(
        std::env::var("TERRAIN_SEED").ok(),
        std::env::var("TERRAIN_PRESET").ok(),
    );

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Terrain".to_string(),
            resolution: (1280.0, 720.0).into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    }))
    .insert_resource(WinitSettings {
        focused_mode: UpdateMode::reactive_low_power(std::time::Duration::from_millis(16)),
        unfocused_mode: UpdateMode::reactive_low_power(std::time::Duration::from_millis(100)),
    })
    .insert_resource(config)
    .add_plugins((TerrainPlugin, rendering::RenderingPlugin))
    .add_systems(
        Update,
        (terrain_controls, spawn_placement_markers, clear_markers_on_regenerate),
    );

    // Screenshot mode: capture the framed map once and exit
    if let Ok(path) = std::env::var("TERRAIN_SCREENSHOT") {
        app.insert_resource(ScreenshotRequest { frame: 0, path });
        app.add_systems(Update, drive_screenshot);
    }

    app.run();
}

/// Build the startup config from `TERRAIN_SEED` / `TERRAIN_PRESET` values.
fn config_from_env(seed: Option<String>, preset: Option<String>) -> TerrainConfig {
    let mut config = TerrainConfig::default();
    if let Some(raw) = seed {
        match raw.trim().parse::<u32>() {
            Ok(seed) => config.seed = seed,
            Err(e) => warn!("Ignoring TERRAIN_SEED={:?}: {}", raw, e),
        }
    }
    if let Some(path) = preset.filter(|p| !p.trim().is_empty()) {
        config.use_preset = true;
        config.preset_path = Some(path.into());
    }
    config
}

#[derive(Component)]
struct PlacementMarker;

/// R: new random map. G: rebuild current seed. F: flatten at the camera
/// focus. P: place a marker on free flat ground.
fn terrain_controls(
    keys: Res<ButtonInput<KeyCode>>,
    orbit: Option<Res<OrbitCamera>>,
    mut generate: EventWriter<GenerateTerrain>,
    mut flatten: EventWriter<FlattenTerrain>,
    mut place: EventWriter<FindPlacement>,
) {
    if keys.just_pressed(KeyCode::KeyR) {
        generate.send(GenerateTerrain { seed: Some(0) });
    }
    if keys.just_pressed(KeyCode::KeyG) {
        generate.send(GenerateTerrain::default());
    }
    if keys.just_pressed(KeyCode::KeyF) {
        if let Some(orbit) = orbit {
            flatten.send(FlattenTerrain {
                center: orbit.focus,
                radius: FLATTEN_RADIUS,
            });
        }
    }
    if keys.just_pressed(KeyCode::KeyP) {
        place.send(FindPlacement {
            half_extents: MARKER_HALF_EXTENTS,
            max_iterations: PLACEMENT_ITERATIONS,
        });
    }
}

/// Each placed marker becomes an obstacle for later searches.
fn spawn_placement_markers(
    mut commands: Commands,
    mut resolved: EventReader<PlacementResolved>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for event in resolved.read() {
        let Ok(placement) = &event.result else {
            continue;
        };
        info!(
            "Marker placed at {} (cell {}, {})",
            placement.position, placement.cell.x, placement.cell.z
        );
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::from_size(MARKER_HALF_EXTENTS * 2.0))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.85, 0.2, 0.15),
                ..default()
            })),
            Transform::from_translation(placement.position),
            Obstacle {
                half_extents: MARKER_HALF_EXTENTS,
            },
            PlacementMarker,
        ));
    }
}

fn clear_markers_on_regenerate(
    mut commands: Commands,
    mut generated: EventReader<TerrainGenerated>,
    markers: Query<Entity, With<PlacementMarker>>,
) {
    if generated.read().count() == 0 {
        return;
    }
    for entity in &markers {
        commands.entity(entity).despawn();
    }
}

#[derive(Resource)]
struct ScreenshotRequest {
    frame: u32,
    path: String,
}

fn drive_screenshot(
    mut commands: Commands,
    mut request: ResMut<ScreenshotRequest>,
    mut exit: EventWriter<AppExit>,
) {
    request.frame += 1;
    // Let the first frames render before capturing.
    if request.frame == 60 {
        commands
            .spawn(Screenshot::primary_window())
            .observe(save_to_disk(request.path.clone()));
    }
    if request.frame > 90 {
        exit.send(AppExit::Success);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_seed_is_parsed() {
        let config = config_from_env(Some(" 1234 ".into()), None);
        assert_eq!(config.seed, 1234);
        assert!(!config.use_preset);
    }

    #[test]
    fn bad_env_seed_keeps_default() {
        let config = config_from_env(Some("lots".into()), None);
        assert_eq!(config.seed, TerrainConfig::default().seed);
    }

    #[test]
    fn env_preset_enables_preset() {
        let config = config_from_env(None, Some("maps/hills.json".into()));
        assert!(config.use_preset);
        assert_eq!(config.preset_path, Some("maps/hills.json".into()));

        let config = config_from_env(None, Some("  ".into()));
        assert!(!config.use_preset);
    }
}
