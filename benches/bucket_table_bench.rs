use chain_table::BucketTable;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn filled(seed: u64, n: usize) -> (BucketTable<String, u64>, Vec<String>) {
    let mut t = BucketTable::new();
    let keys: Vec<_> = lcg(seed).take(n).map(key).collect();
    for (i, k) in keys.iter().enumerate() {
        t.put(k.clone(), i as u64);
    }
    (t, keys)
}

// Includes every doubling from 16 buckets up.
fn bench_put_fresh_100k(c: &mut Criterion) {
    c.bench_function("table::put_fresh_100k", |b| {
        b.iter_batched(
            || lcg(1).take(100_000).map(key).collect::<Vec<_>>(),
            |keys| {
                let mut t = BucketTable::new();
                for (i, k) in keys.into_iter().enumerate() {
                    t.put(k, i as u64);
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

// Bulk load is presized, so no doubling happens.
fn bench_from_pairs_100k(c: &mut Criterion) {
    c.bench_function("table::from_pairs_100k", |b| {
        b.iter_batched(
            || {
                lcg(1)
                    .take(100_000)
                    .enumerate()
                    .map(|(i, x)| (key(x), i as u64))
                    .collect::<Vec<_>>()
            },
            |pairs| black_box(BucketTable::from_pairs(pairs)),
            BatchSize::SmallInput,
        )
    });
}

fn bench_overwrite_10k(c: &mut Criterion) {
    c.bench_function("table::overwrite_10k_on_100k", |b| {
        b.iter_batched(
            || filled(3, 100_000),
            |(mut t, keys)| {
                for (i, k) in keys.into_iter().take(10_000).enumerate() {
                    t.put(k, i as u64);
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit_10k(c: &mut Criterion) {
    c.bench_function("table::get_hit_10k_on_100k", |b| {
        let (t, keys) = filled(7, 100_000);
        let n = keys.len();
        let mut s = 0x9e3779b97f4a7c15u64;
        let queries: Vec<String> = (0..10_000)
            .map(|_| {
                s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
                keys[(s as usize) % n].clone()
            })
            .collect();
        b.iter(|| {
            for k in &queries {
                black_box(t.get(k.as_str()));
            }
        })
    });
}

fn bench_get_miss_10k(c: &mut Criterion) {
    c.bench_function("table::get_miss_10k_on_100k", |b| {
        let (t, _) = filled(11, 100_000);
        let misses: Vec<String> = lcg(0xdead_beef).take(10_000).map(key).collect();
        b.iter(|| {
            for k in &misses {
                black_box(t.get(k.as_str()));
            }
        })
    });
}

fn bench_remove_10k(c: &mut Criterion) {
    c.bench_function("table::remove_10k_of_100k", |b| {
        b.iter_batched(
            || filled(5, 100_000),
            |(mut t, keys)| {
                for k in keys.iter().step_by(10) {
                    black_box(t.remove(k.as_str()));
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_iterate(c: &mut Criterion) {
    let (t, _) = filled(999, 100_000);
    c.bench_function("table::values_sum_100k", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            for v in t.values() {
                sum = sum.wrapping_add(*v);
            }
            black_box(sum)
        })
    });
    c.bench_function("table::scan_statistics_100k", |b| {
        b.iter(|| black_box(t.scan_statistics()))
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches_insert;
    config = bench_config();
    targets = bench_put_fresh_100k, bench_from_pairs_100k, bench_overwrite_10k
}
criterion_group! {
    name = benches_ops;
    config = bench_config();
    targets = bench_get_hit_10k,
              bench_get_miss_10k,
              bench_remove_10k,
              bench_iterate
}
criterion_main!(benches_insert, benches_ops);
