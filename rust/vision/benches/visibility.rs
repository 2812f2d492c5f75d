// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Benchmark of topology digestion and the two shadow casters.
//!
//! Run with: cargo bench -p vtt-fog-vision --bench visibility

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use vtt_fog_region::{shapes, Point2, Region};
use vtt_fog_vision::{cast_visibility, cast_visibility_digested, DigestedTopology, VisionConfig};

/// Random rectangular walls on a 10000x10000 map, centre kept clear
fn generate_map(wall_count: usize) -> Region {
    let mut rng = StdRng::seed_from_u64(12345);
    let walls: Vec<Region> = (0..wall_count)
        .map(|_| {
            Region::rectangle(
                rng.random_range(0.0..10000.0),
                rng.random_range(0.0..10000.0),
                rng.random_range(50.0..550.0),
                rng.random_range(50.0..550.0),
            )
        })
        .collect();

    Region::union_all(&walls).subtract(&Region::rectangle(4800.0, 4800.0, 400.0, 400.0))
}

fn bench_digest(c: &mut Criterion) {
    let config = VisionConfig::default();
    let mut group = c.benchmark_group("digest");
    group.sample_size(20);

    for wall_count in [25, 100] {
        let map = generate_map(wall_count);
        group.bench_with_input(BenchmarkId::from_parameter(wall_count), &map, |b, map| {
            b.iter(|| DigestedTopology::digest(black_box(map), &config).unwrap())
        });
    }

    group.finish();
}

fn bench_cast(c: &mut Criterion) {
    let config = VisionConfig::default();
    let map = generate_map(100);
    let digest = DigestedTopology::digest(&map, &config).unwrap();
    let observer = Point2::new(5000.0, 5000.0);

    let mut group = c.benchmark_group("cast");
    group.sample_size(20);

    for range in [1000.0, 4000.0] {
        let vision = shapes::circle(range, config.circle_segments).unwrap();

        group.bench_with_input(BenchmarkId::new("raw", range), &vision, |b, vision| {
            b.iter(|| cast_visibility(black_box(&observer), vision, &map, &config).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("digested", range), &vision, |b, vision| {
            b.iter(|| cast_visibility_digested(black_box(&observer), vision, &digest, &config).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_digest, bench_cast);
criterion_main!(benches);
