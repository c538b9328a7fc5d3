pub const MIN_MAP_SIZE: usize = 1;
pub const MAX_MAP_SIZE: usize = 250;

/// Cells with `|height| < FLAT_HEIGHT_LIMIT` count as flat/walkable.
pub const FLAT_HEIGHT_LIMIT: f32 = 1.0;
/// A flat region must hold strictly more cells than this to be kept.
pub const MIN_REGION_CELLS: usize = 100;

/// Placements must sit strictly inside this many grid units from every edge.
pub const PLACEMENT_EDGE_MARGIN: usize = 25;
/// World-space Y of every placement candidate handed to the obstruction check.
pub const PLACEMENT_HEIGHT: f32 = 2.0;

/// Per-vertex jitter is `(u - 0.5) * JITTER_AMPLITUDE` for `u` in [0, 1).
pub const JITTER_AMPLITUDE: f32 = 0.5;

/// Shading bounds never get closer to zero than this (max >= 1, min <= -1).
pub const SHADING_BOUND: f32 = 1.0;

/// Per-octave sample offsets are drawn from `-RANGE..RANGE`.
pub const NOISE_OCTAVE_OFFSET_RANGE: f32 = 10_000.0;
/// Noise scales at or below zero are clamped to this.
pub const MIN_NOISE_SCALE: f32 = 0.0001;
pub const MAX_OCTAVES: u32 = 10;
