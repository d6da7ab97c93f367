use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::Rng;

// Reference the main crate
extern crate khashmap;

// Import the hash functions from the main crate
use khashmap::hash::{HashKind, fmix64, hash_64, xxh64_key};

// Generate random keys
fn generate_random_keys(count: usize) -> Vec<u64> {
    let mut rng = rand::thread_rng();
    (0..count).map(|_| rng.gen_range(0..u64::MAX)).collect()
}

// Benchmark the raw hash functions on a single key
pub fn bench_single_key(c: &mut Criterion) {
    let key = 0x0123_4567_89ab_cdefu64;

    let mut group = c.benchmark_group("SingleKey");

    group.bench_function("fmix64", |b: &mut criterion::Bencher| {
        b.iter(|| fmix64(black_box(key)))
    });
    group.bench_function("hash_64", |b: &mut criterion::Bencher| {
        b.iter(|| hash_64(black_box(key), 9))
    });
    group.bench_function("xxh64_key", |b: &mut criterion::Bencher| {
        b.iter(|| xxh64_key(black_box(key), 9))
    });

    group.finish();
}

// Benchmark bucket routing over a batch of random keys
pub fn bench_bucket_routing(c: &mut Criterion) {
    let keys = generate_random_keys(1024);

    let mut group = c.benchmark_group("BucketRouting");

    for kind in [HashKind::Fmix64, HashKind::Golden, HashKind::Xxh64] {
        group.bench_function(format!("{:?}", kind), |b: &mut criterion::Bencher| {
            b.iter(|| {
                let mut acc = 0usize;
                for &key in &keys {
                    acc ^= kind.bucket(black_box(key), 9);
                }
                acc
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_key, bench_bucket_routing);
criterion_main!(benches);
