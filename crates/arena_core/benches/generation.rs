//! Map generation and round reconciliation benchmarks for arena_core.
//!
//! Run with: `cargo bench -p arena_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use arena_core::arena::Arena;
use arena_core::map_generation::{generate_map, MapConfig};
use arena_core::settings::ArenaSettings;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Generation cost grows with the perimeter, each obstacle paying for a few searches.
pub fn generation_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_map");
    for size in [15u32, 31, 63] {
        let config = MapConfig::new(size, size, 0.5);
        group.bench_with_input(BenchmarkId::from_parameter(size), &config, |b, config| {
            let mut rng = ChaCha8Rng::seed_from_u64(12345);
            b.iter(|| generate_map(black_box(config), &mut rng));
        });
    }
    group.finish();
}

/// One reconciliation per iteration on a default arena.
pub fn reconstruct_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconstruct_interactive_state");
    for avatars in [2usize, 8, 32] {
        let settings = ArenaSettings::default().with_map(MapConfig::new(31, 31, 0.1));
        let mut arena = Arena::new(settings).expect("valid bench settings");
        group.bench_with_input(BenchmarkId::from_parameter(avatars), &avatars, |b, &avatars| {
            b.iter(|| arena.reconstruct_interactive_state(black_box(avatars)));
        });
    }
    group.finish();
}

criterion_group!(benches, generation_benchmark, reconstruct_benchmark);
criterion_main!(benches);
