use criterion::{Criterion, black_box, criterion_group, criterion_main};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;

// Import the map and its configuration from the crate
use khashmap::{AllocBackend, AllocPolicy, HashKind, HashMapConfig, KHashMap};

// Test configuration
const THREAD_COUNT: usize = 8;
const OPERATIONS_PER_THREAD: usize = 10_000;

fn config(bits: u32, hash: HashKind, alloc: AllocPolicy) -> HashMapConfig {
    HashMapConfig { bits, hash, alloc }
}

// Benchmark insert, find and delete for every hash function
pub fn bench_single_threaded(c: &mut Criterion) {
    let mut group = c.benchmark_group("SingleThreaded");

    for hash in [HashKind::Fmix64, HashKind::Golden, HashKind::Xxh64] {
        group.bench_function(format!("{:?}", hash), |b| {
            b.iter(|| {
                let mut map = KHashMap::from_config(config(12, hash, AllocPolicy::Auto)).unwrap();

                // Insert operations
                for i in 0..OPERATIONS_PER_THREAD {
                    map.add(i as u64, i).unwrap();
                }

                // Read operations
                for i in 0..OPERATIONS_PER_THREAD {
                    assert!(map.find(black_box(i as u64)).is_some());
                }

                // Remove operations
                for i in 0..OPERATIONS_PER_THREAD {
                    map.del(i as u64);
                }
            });
        });
    }

    group.finish();
}

// Benchmark a full scan of the map, where bucket count and backend matter
pub fn bench_full_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("FullScan");

    for bits in [9u32, 14] {
        for backend in [AllocBackend::Heap, AllocBackend::Mapped] {
            let mut map =
                KHashMap::from_config(config(bits, HashKind::Fmix64, AllocPolicy::Always(backend)))
                    .unwrap();
            for i in 0..1000u64 {
                map.add(i, i).unwrap();
            }

            group.bench_function(format!("bits{}_{:?}", bits, backend), |b| {
                b.iter(|| map.iter().map(|(_, value)| *value).sum::<u64>())
            });
        }
    }

    group.finish();
}

// Benchmark concurrent insertions behind a single lock
pub fn bench_concurrent_insertions(c: &mut Criterion) {
    let mut group = c.benchmark_group("ConcurrentInsertions");

    group.bench_function("Mutex<KHashMap>", |b| {
        b.iter(|| {
            let map = Arc::new(Mutex::new(KHashMap::with_bits(14).unwrap()));

            // Spawn threads for concurrent insertions
            let handles: Vec<_> = (0..THREAD_COUNT)
                .map(|thread_id| {
                    let map = map.clone();
                    thread::spawn(move || {
                        for i in 0..OPERATIONS_PER_THREAD {
                            let key = (thread_id * OPERATIONS_PER_THREAD + i) as u64;
                            map.lock().add(key, "test_value").unwrap();
                        }
                    })
                })
                .collect();

            // Wait for all threads to complete
            for handle in handles {
                handle.join().unwrap();
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_single_threaded,
    bench_full_scan,
    bench_concurrent_insertions
);
criterion_main!(benches);
