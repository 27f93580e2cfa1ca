use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rank_tree::RankTreeMap;
use std::collections::BTreeMap;

const N: usize = 10_000;

// ─── Helper functions to generate key sequences ─────────────────────────────

fn random_keys(n: usize) -> Vec<i64> {
    // Simple LCG for a deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

// ─── Map benchmarks ─────────────────────────────────────────────────────────

fn bench_map_insert_ordered(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_insert_ordered");

    group.bench_function(BenchmarkId::new("RankTreeMap", N), |b| {
        b.iter(|| {
            let mut map = RankTreeMap::new();
            for i in 0..N as i64 {
                map.insert(i, i);
            }
            map
        });
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut map = BTreeMap::new();
            for i in 0..N as i64 {
                map.insert(i, i);
            }
            map
        });
    });

    group.finish();
}

fn bench_map_insert_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_insert_random");
    let keys = random_keys(N);

    group.bench_function(BenchmarkId::new("RankTreeMap", N), |b| {
        b.iter(|| {
            let mut map = RankTreeMap::new();
            for &k in &keys {
                map.insert(k, k);
            }
            map
        });
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut map = BTreeMap::new();
            for &k in &keys {
                map.insert(k, k);
            }
            map
        });
    });

    group.finish();
}

fn bench_map_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_get");
    let keys = random_keys(N);
    let rt_map: RankTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
    let bt_map: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();

    group.bench_function(BenchmarkId::new("RankTreeMap", N), |b| {
        b.iter(|| {
            let mut found = 0usize;
            for k in &keys {
                if rt_map.get(k).is_some() {
                    found += 1;
                }
            }
            found
        });
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut found = 0usize;
            for k in &keys {
                if bt_map.get(k).is_some() {
                    found += 1;
                }
            }
            found
        });
    });

    group.finish();
}

fn bench_map_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_remove");
    let keys = random_keys(N);

    group.bench_function(BenchmarkId::new("RankTreeMap", N), |b| {
        b.iter_batched(
            || keys.iter().map(|&k| (k, k)).collect::<RankTreeMap<i64, i64>>(),
            |mut map| {
                for k in &keys {
                    map.remove(k);
                }
                map
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter_batched(
            || keys.iter().map(|&k| (k, k)).collect::<BTreeMap<i64, i64>>(),
            |mut map| {
                for k in &keys {
                    map.remove(k);
                }
                map
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

// ─── Rank benchmarks ────────────────────────────────────────────────────────

fn bench_get_by_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_by_rank");
    let keys = random_keys(N);
    let rt_map: RankTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
    let bt_map: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
    let len = rt_map.len();

    group.bench_function(BenchmarkId::new("RankTreeMap", N), |b| {
        b.iter(|| {
            let mut acc = 0i64;
            for rank in (0..len).step_by(7) {
                acc ^= *rt_map.get_by_rank(rank).unwrap().0;
            }
            acc
        });
    });

    // the BTreeMap equivalent has to walk the range
    group.bench_function(BenchmarkId::new("BTreeMap_nth", N), |b| {
        b.iter(|| {
            let mut acc = 0i64;
            for rank in (0..len).step_by(7) {
                acc ^= *bt_map.iter().nth(rank).unwrap().0;
            }
            acc
        });
    });

    group.finish();
}

fn bench_bulk_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("bulk_load");
    let items: Vec<(i64, i64)> = (0..N as i64).map(|k| (k, k)).collect();

    group.bench_function(BenchmarkId::new("from_sorted", N), |b| {
        b.iter(|| RankTreeMap::from_sorted(items.clone()).unwrap());
    });

    group.bench_function(BenchmarkId::new("insert_loop", N), |b| {
        b.iter(|| {
            let mut map = RankTreeMap::new();
            for &(k, v) in &items {
                map.insert(k, v);
            }
            map
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_map_insert_ordered,
    bench_map_insert_random,
    bench_map_get,
    bench_map_remove,
    bench_get_by_rank,
    bench_bulk_load,
);
criterion_main!(benches);
