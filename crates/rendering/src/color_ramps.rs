//! Height color ramp for the terrain surface.
//!
//! Control points are sRGB and evenly spaced; intermediate values are
//! interpolated linearly in sRGB space.

use bevy::prelude::*;

/// A continuous color ramp defined by evenly-spaced sRGB control points.
pub struct ColorRamp {
    points: &'static [[f32; 3]],
}

impl ColorRamp {
    /// Sample the ramp at parameter `t` (clamped to `[0, 1]`).
    pub fn sample(&self, t: f32) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let n = self.points.len();
        if n == 0 {
            return Color::BLACK;
        }
        if n == 1 {
            let p = self.points[0];
            return Color::srgb(p[0], p[1], p[2]);
        }
        let scaled = t * (n - 1) as f32;
        let lo = (scaled as usize).min(n - 2);
        let frac = scaled - lo as f32;
        let a = self.points[lo];
        let b = self.points[lo + 1];
        Color::srgb(
            a[0] + (b[0] - a[0]) * frac,
            a[1] + (b[1] - a[1]) * frac,
            a[2] + (b[2] - a[2]) * frac,
        )
    }

    /// Sample as an opaque `[r, g, b, a]` array for vertex colors.
    pub fn sample_rgba(&self, t: f32) -> [f32; 4] {
        let s = self.sample(t).to_srgba();
        [s.red, s.green, s.blue, 1.0]
    }
}

/// Low ground to peaks: basin, shore, meadow (the flat band), hills, rock, snow.
pub static TERRAIN_HEIGHT: ColorRamp = ColorRamp {
    points: &[
        [0.18, 0.30, 0.42], // basin
        [0.62, 0.58, 0.42], // shore
        [0.33, 0.55, 0.24], // meadow
        [0.36, 0.50, 0.22],
        [0.45, 0.42, 0.30], // hills
        [0.50, 0.47, 0.44], // rock
        [0.93, 0.94, 0.96], // snow
    ],
};
