//! In-place terrain edits on the exported vertex buffer.

use bevy::prelude::*;
use rand::Rng;

use crate::height_grid::draw_jitter;

/// Replace the elevation of every vertex within `radius` of `center`
/// (horizontal distance, `y` ignored) with fresh jitter. `x` and `z` are
/// left alone and there is no falloff at the rim.
///
/// Returns the number of vertices rewritten. A radius of zero still hits a
/// vertex sitting exactly on `center`; an infinite radius hits every vertex.
/// A negative or NaN radius edits nothing.
pub fn flatten_in_radius(
    vertices: &mut [[f32; 3]],
    center: Vec3,
    radius: f32,
    rng: &mut impl Rng,
) -> usize {
    if radius.is_nan() || radius < 0.0 {
        return 0;
    }
    let center = Vec2::new(center.x, center.z);
    let radius_sq = radius * radius;

    let mut edited = 0;
    for v in vertices.iter_mut() {
        if Vec2::new(v[0], v[2]).distance_squared(center) <= radius_sq {
            v[1] = draw_jitter(rng);
            edited += 1;
        }
    }
    edited
}
