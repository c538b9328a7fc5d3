//! Criterion benchmarks for flat-region segmentation and placement search.
//!
//! Benchmarks:
//!   - segment_regions on a fully flat 250x250 grid (one huge region)
//!   - segment_regions on a checkerboard of small patches (all rejected)
//!   - find_valid_position against an empty obstacle set
//!
//! Run with: cargo bench -p terrain --bench regions_bench

use bevy::math::Vec3;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use terrain::config::MIN_REGION_CELLS;
use terrain::{
    find_valid_position, segment_regions, HeightGrid, MapBounds, ObstacleSet, PlacementQuery,
};

const SIZE: usize = 250;

fn flat_grid() -> HeightGrid {
    HeightGrid::from_heights(SIZE, SIZE, vec![0.0; (SIZE + 1) * (SIZE + 1)]).unwrap()
}

/// 5x5 flat patches separated by one-cell ridges.
fn patchy_grid() -> HeightGrid {
    let row = SIZE + 1;
    let mut heights = vec![0.0; row * row];
    for z in 0..row {
        for x in 0..row {
            if x % 6 == 5 || z % 6 == 5 {
                heights[z * row + x] = 4.0;
            }
        }
    }
    HeightGrid::from_heights(SIZE, SIZE, heights).unwrap()
}

// ---------------------------------------------------------------------------
// Benchmark: segmentation
// ---------------------------------------------------------------------------

fn bench_segment(c: &mut Criterion) {
    let mut group = c.benchmark_group("segment_regions");
    group.sample_size(20);

    let flat = flat_grid();
    group.bench_function("flat_250", |b| {
        b.iter(|| black_box(segment_regions(black_box(&flat), MIN_REGION_CELLS)));
    });

    let patchy = patchy_grid();
    group.bench_function("patchy_250", |b| {
        b.iter(|| black_box(segment_regions(black_box(&patchy), MIN_REGION_CELLS)));
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: placement
// ---------------------------------------------------------------------------

fn bench_placement(c: &mut Criterion) {
    let mut group = c.benchmark_group("placement");

    let regions = segment_regions(&flat_grid(), MIN_REGION_CELLS);
    let obstacles = ObstacleSet::new();
    let query = PlacementQuery {
        half_extents: Vec3::splat(1.0),
        max_iterations: 1_000,
        bounds: MapBounds {
            width: SIZE,
            depth: SIZE,
            vertex_distance: 1.0,
        },
    };
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    group.bench_function("find_valid_position_250", |b| {
        b.iter(|| black_box(find_valid_position(&regions, &query, &obstacles, &mut rng).is_ok()));
    });

    group.finish();
}

criterion_group!(benches, bench_segment, bench_placement);
criterion_main!(benches);
