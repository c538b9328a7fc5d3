use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

use terrain::MapBounds;

const PAN_SPEED: f32 = 120.0;
const ZOOM_SPEED: f32 = 0.15;
const MIN_DISTANCE: f32 = 5.0;
const MAX_DISTANCE: f32 = 1500.0;
const MIN_PITCH: f32 = 5.0 * std::f32::consts::PI / 180.0;
const MAX_PITCH: f32 = 85.0 * std::f32::consts::PI / 180.0;
const ORBIT_SENSITIVITY: f32 = 0.005;
/// Framing distance as a multiple of the longest map side.
const FRAME_FACTOR: f32 = 1.1;

/// Orbital camera model: camera orbits around a focus point on the ground.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub focus: Vec3,
    /// Horizontal rotation in radians
    pub yaw: f32,
    /// Elevation angle in radians, clamped to `MIN_PITCH..=MAX_PITCH`
    pub pitch: f32,
    pub distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            focus: Vec3::new(50.0, 0.0, 50.0),
            yaw: std::f32::consts::FRAC_PI_4,
            pitch: 45.0_f32.to_radians(),
            distance: 120.0,
        }
    }
}

impl OrbitCamera {
    /// Center on the map and back off far enough to see all of it.
    pub fn frame(&mut self, bounds: &MapBounds) {
        let extent = bounds.world_extent();
        self.focus = Vec3::new(extent.x / 2.0, 0.0, extent.y / 2.0);
        self.distance = (extent.max_element() * FRAME_FACTOR).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }
}

#[derive(Resource, Default)]
pub struct CameraOrbitDrag {
    pub dragging: bool,
    pub last_pos: Vec2,
}

pub fn setup_camera(mut commands: Commands) {
    let orbit = OrbitCamera::default();
    let (pos, look_at) = orbit_to_transform(&orbit);

    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(pos).looking_at(look_at, Vec3::Y),
    ));
    commands.insert_resource(orbit);
    commands.init_resource::<CameraOrbitDrag>();
}

/// Keep the focus within half a map of the terrain.
fn clamp_focus(focus: &mut Vec3, bounds: Option<&MapBounds>) {
    let Some(bounds) = bounds else {
        return;
    };
    let extent = bounds.world_extent();
    let margin = extent.max_element() / 2.0;
    focus.x = focus.x.clamp(-margin, extent.x + margin);
    focus.z = focus.z.clamp(-margin, extent.y + margin);
}

pub(crate) fn orbit_to_transform(orbit: &OrbitCamera) -> (Vec3, Vec3) {
    let x = orbit.distance * orbit.pitch.cos() * orbit.yaw.sin();
    let y = orbit.distance * orbit.pitch.sin();
    let z = orbit.distance * orbit.pitch.cos() * orbit.yaw.cos();
    (orbit.focus + Vec3::new(x, y, z), orbit.focus)
}

/// System: re-frame the camera whenever a new map is generated.
pub fn frame_new_terrain(bounds: Option<Res<MapBounds>>, orbit: Option<ResMut<OrbitCamera>>) {
    let (Some(bounds), Some(mut orbit)) = (bounds, orbit) else {
        return;
    };
    if bounds.is_changed() {
        orbit.frame(&bounds);
    }
}

/// System: apply OrbitCamera state to the camera Transform.
pub fn apply_orbit_camera(
    orbit: Option<Res<OrbitCamera>>,
    mut query: Query<&mut Transform, With<Camera3d>>,
) {
    let Some(orbit) = orbit else {
        return;
    };
    if !orbit.is_changed() {
        return;
    }
    let (pos, look_at) = orbit_to_transform(&orbit);
    let Ok(mut transform) = query.get_single_mut() else {
        return;
    };
    *transform = Transform::from_translation(pos).looking_at(look_at, Vec3::Y);
}

/// WASD/Arrow keys: pan focus along the ground plane, relative to yaw.
pub fn camera_pan_keyboard(
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    bounds: Option<Res<MapBounds>>,
    mut orbit: ResMut<OrbitCamera>,
) {
    let scale = orbit.distance / 100.0;

    let mut dir = Vec2::ZERO;
    if keys.pressed(KeyCode::KeyW) || keys.pressed(KeyCode::ArrowUp) {
        dir.y -= 1.0;
    }
    if keys.pressed(KeyCode::KeyS) || keys.pressed(KeyCode::ArrowDown) {
        dir.y += 1.0;
    }
    if keys.pressed(KeyCode::KeyA) || keys.pressed(KeyCode::ArrowLeft) {
        dir.x -= 1.0;
    }
    if keys.pressed(KeyCode::KeyD) || keys.pressed(KeyCode::ArrowRight) {
        dir.x += 1.0;
    }

    if dir != Vec2::ZERO {
        let dir = dir.normalize();
        let delta = PAN_SPEED * scale * time.delta_secs();
        let cos_yaw = orbit.yaw.cos();
        let sin_yaw = orbit.yaw.sin();
        let world_x = dir.x * cos_yaw + dir.y * sin_yaw;
        let world_z = -dir.x * sin_yaw + dir.y * cos_yaw;
        orbit.focus.x += world_x * delta;
        orbit.focus.z += world_z * delta;
        clamp_focus(&mut orbit.focus, bounds.as_deref());
    }
}

/// Right-mouse drag: orbit (horizontal = yaw, vertical = pitch).
pub fn camera_orbit_drag(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    mut drag: ResMut<CameraOrbitDrag>,
    mut orbit: ResMut<OrbitCamera>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };

    if buttons.just_pressed(MouseButton::Right) {
        if let Some(pos) = window.cursor_position() {
            drag.dragging = true;
            drag.last_pos = pos;
        }
    }

    if buttons.just_released(MouseButton::Right) {
        drag.dragging = false;
    }

    if drag.dragging {
        if let Some(pos) = window.cursor_position() {
            let delta = pos - drag.last_pos;
            orbit.yaw += delta.x * ORBIT_SENSITIVITY;
            orbit.pitch = (orbit.pitch - delta.y * ORBIT_SENSITIVITY).clamp(MIN_PITCH, MAX_PITCH);
            drag.last_pos = pos;
        }
    }
}

/// Scroll wheel: zoom (change distance).
pub fn camera_zoom(mut scroll_evts: EventReader<MouseWheel>, mut orbit: ResMut<OrbitCamera>) {
    for evt in scroll_evts.read() {
        let dy = match evt.unit {
            MouseScrollUnit::Line => evt.y,
            MouseScrollUnit::Pixel => evt.y / 100.0,
        };
        let factor = 1.0 - dy * ZOOM_SPEED;
        orbit.distance = (orbit.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_centers_on_map() {
        let mut orbit = OrbitCamera::default();
        orbit.frame(&MapBounds {
            width: 200,
            depth: 100,
            vertex_distance: 2.0,
        });
        assert_eq!(orbit.focus, Vec3::new(200.0, 0.0, 100.0));
        assert!((orbit.distance - 440.0).abs() < 1e-3);
    }

    #[test]
    fn orbit_position_is_at_distance() {
        let orbit = OrbitCamera::default();
        let (pos, look_at) = orbit_to_transform(&orbit);
        assert_eq!(look_at, orbit.focus);
        assert!((pos.distance(look_at) - orbit.distance).abs() < 1e-3);
        assert!(pos.y > 0.0);
    }

    #[test]
    fn focus_clamped_near_map() {
        let bounds = MapBounds {
            width: 100,
            depth: 100,
            vertex_distance: 1.0,
        };
        let mut focus = Vec3::new(-500.0, 0.0, 900.0);
        clamp_focus(&mut focus, Some(&bounds));
        assert_eq!(focus, Vec3::new(-50.0, 0.0, 150.0));
    }

    #[test]
    fn setup_camera_owns_drag_state() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_systems(Startup, setup_camera);
        assert!(app.world().get_resource::<CameraOrbitDrag>().is_none());
        app.update();
        assert!(!app.world().resource::<CameraOrbitDrag>().dragging);
        assert_eq!(*app.world().resource::<OrbitCamera>(), OrbitCamera::default());
    }
}
