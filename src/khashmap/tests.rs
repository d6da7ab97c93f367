use super::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::rc::Rc;

#[test]
fn test_khashmap_basic() {
    // Create a map with 16 buckets
    let mut map = KHashMap::with_bits(4).unwrap();
    assert_eq!(map.size(), 16);

    // 5 and 21 may share a bucket, both must stay retrievable
    map.add(5, "a").unwrap();
    map.add(21, "b").unwrap();
    assert_eq!(map.find(5), Some(&"a"));
    assert_eq!(map.find(21), Some(&"b"));

    // Remove one of them
    assert_eq!(map.del(5), Some("a"));
    assert_eq!(map.find(5), None);
    assert_eq!(map.find(21), Some(&"b"));

    map.destroy();
    assert!(!map.is_initialized());
}

#[test]
fn test_khashmap_replace() {
    let mut map = KHashMap::with_bits(4).unwrap();

    assert_eq!(map.add(7, "one").unwrap(), None);

    // The displaced value goes back to the caller
    assert_eq!(map.add(7, "uno").unwrap(), Some("one"));

    // Replacing does not add a second item
    assert_eq!(map.find(7), Some(&"uno"));
    assert_eq!(map.iter().count(), 1);
}

#[test]
fn test_khashmap_miss() {
    let mut map = KHashMap::with_bits(4).unwrap();
    assert_eq!(map.find(1), None);

    map.add(1, 10u64).unwrap();
    assert_eq!(map.find(2), None);

    map.del(1);
    assert_eq!(map.find(1), None);
    assert!(!map.contains_key(1));
}

#[test]
fn test_khashmap_idempotent_delete() {
    let mut map = KHashMap::with_bits(4).unwrap();
    map.add(3, "three").unwrap();
    map.add(4, "four").unwrap();

    assert_eq!(map.del(3), Some("three"));
    assert_eq!(map.del(3), None);

    // The other key is untouched
    assert_eq!(map.find(4), Some(&"four"));
    assert_eq!(map.iter().count(), 1);
}

#[test]
fn test_khashmap_empty() {
    let mut map = KHashMap::with_bits(4).unwrap();
    assert!(map.empty());

    map.add(1, ()).unwrap();
    assert!(!map.empty());
    map.add(2, ()).unwrap();

    map.del(1);
    assert!(!map.empty());
    map.del(2);
    assert!(map.empty());
}

#[test]
fn test_khashmap_thousand_keys() {
    let mut map = KHashMap::with_bits(9).unwrap();
    assert_eq!(map.size(), 512);

    for key in 0..1000u64 {
        map.add(key * 7919, key).unwrap();
    }

    for key in 0..1000u64 {
        assert_eq!(map.find(key * 7919), Some(&key));
    }
    assert_eq!(map.iter().count(), 1000);
    assert_eq!(map.chain_lengths().iter().sum::<usize>(), 1000);
}

#[test]
fn test_khashmap_every_hash_kind() {
    for hash in [HashKind::Fmix64, HashKind::Golden, HashKind::Xxh64] {
        let config = HashMapConfig {
            hash,
            ..HashMapConfig::with_bits(6)
        };
        let mut map = KHashMap::from_config(config).unwrap();
        assert_eq!(map.hash_kind(), hash);

        for key in 0..300u64 {
            map.add(key, key + 1).unwrap();
        }
        for key in 0..300u64 {
            assert_eq!(map.find(key), Some(&(key + 1)));
        }
        assert_eq!(map.iter().count(), 300);
    }
}

#[test]
fn test_khashmap_chain_order() {
    // A single bucket puts every key on one chain, newest first
    let mut map = KHashMap::with_bits(0).unwrap();
    assert_eq!(map.size(), 1);

    map.add(1, "one").unwrap();
    map.add(2, "two").unwrap();
    map.add(3, "three").unwrap();
    let keys: Vec<u64> = map.iter().map(|(key, _)| key).collect();
    assert_eq!(keys, vec![3, 2, 1]);

    // Replacing keeps the position
    map.add(2, "dos").unwrap();
    let pairs: Vec<(u64, &str)> = map.iter().map(|(key, value)| (key, *value)).collect();
    assert_eq!(pairs, vec![(3, "three"), (2, "dos"), (1, "one")]);

    // Unlink from the middle, the head and the tail
    map.del(2);
    let keys: Vec<u64> = map.iter().map(|(key, _)| key).collect();
    assert_eq!(keys, vec![3, 1]);
    map.del(3);
    map.del(1);
    assert!(map.empty());
}

#[test]
fn test_khashmap_slot_reuse() {
    let mut map = KHashMap::with_bits(0).unwrap();
    map.add(1, 100).unwrap();
    map.add(2, 200).unwrap();
    map.del(1);

    // The freed slot is handed out again
    map.add(3, 300).unwrap();
    assert_eq!(map.find(2), Some(&200));
    assert_eq!(map.find(3), Some(&300));
    assert_eq!(map.find(1), None);
    assert_eq!(map.iter().count(), 2);
}

#[test]
fn test_khashmap_find_mut() {
    let mut map = KHashMap::with_bits(4).unwrap();
    map.add(9, 1u32).unwrap();

    if let Some(value) = map.find_mut(9) {
        *value += 41;
    }
    assert_eq!(map.find(9), Some(&42));
    assert_eq!(map.find_mut(10), None);
}

#[test]
fn test_khashmap_uninitialized() {
    let mut map: KHashMap<&str> = KHashMap::new(4);
    assert!(!map.is_initialized());
    assert_eq!(map.backend(), None);

    // Queries are total on an unconstructed map
    assert!(map.empty());
    assert_eq!(map.find(1), None);
    assert_eq!(map.del(1), None);
    assert_eq!(map.iter().count(), 0);
    assert_eq!(
        map.add(1, "x"),
        Err(AddError::new(KHashMapError::NotInitialized, "x"))
    );

    // Destroying twice is harmless
    map.destroy();
    map.destroy();

    map.init().unwrap();
    map.add(1, "x").unwrap();
    assert_eq!(map.find(1), Some(&"x"));
}

#[test]
fn test_khashmap_destroy_then_reinit() {
    let mut map = KHashMap::with_bits(5).unwrap();
    for key in 0..100u64 {
        map.add(key, key).unwrap();
    }

    map.destroy();
    assert!(map.empty());
    assert_eq!(map.find(10), None);

    // Nothing survives into the new bucket array
    map.init().unwrap();
    assert!(map.empty());
    assert_eq!(map.iter().count(), 0);
    assert_eq!(map.find(10), None);
}

#[test]
fn test_khashmap_init_clears_contents() {
    let mut map = KHashMap::with_bits(3).unwrap();
    map.add(1, 1).unwrap();

    map.init().unwrap();
    assert!(map.empty());
}

#[test]
fn test_khashmap_out_of_memory_bucket_array() {
    // 2^64 heads cannot even be described
    let mut map: KHashMap<u64> = KHashMap::new(64);
    assert_eq!(map.init(), Err(KHashMapError::OutOfMemory));
    assert!(!map.is_initialized());
    assert!(map.empty());

    assert_eq!(
        KHashMap::<u64>::with_bits(62).err(),
        Some(KHashMapError::OutOfMemory)
    );
}

#[test]
fn test_khashmap_backend_selection() {
    let word = std::mem::size_of::<usize>();
    let threshold = 4096;

    let config = HashMapConfig {
        alloc: AllocPolicy::Threshold(threshold),
        ..HashMapConfig::with_bits(4)
    };
    let small = KHashMap::<u64>::from_config(config).unwrap();
    assert_eq!(small.size_in_bytes(), 16 * word);
    assert_eq!(small.backend(), Some(AllocBackend::Heap));

    let config = HashMapConfig {
        alloc: AllocPolicy::Threshold(threshold),
        ..HashMapConfig::with_bits(12)
    };
    let large = KHashMap::<u64>::from_config(config).unwrap();
    assert_eq!(large.size_in_bytes(), 4096 * word);
    assert_eq!(large.backend(), Some(AllocBackend::Mapped));
}

#[test]
fn test_khashmap_backend_does_not_change_behavior() {
    let mut results = Vec::new();

    for backend in [AllocBackend::Heap, AllocBackend::Mapped] {
        let config = HashMapConfig {
            alloc: AllocPolicy::Always(backend),
            ..HashMapConfig::with_bits(9)
        };
        let mut map = KHashMap::from_config(config).unwrap();
        assert_eq!(map.backend(), Some(backend));

        for key in 0..500u64 {
            map.add(key * 3, key).unwrap();
        }
        for key in (0..500u64).step_by(5) {
            map.del(key * 3);
        }
        results.push(map.iter().map(|(key, value)| (key, *value)).collect::<Vec<_>>());
    }

    assert_eq!(results[0], results[1]);
    assert_eq!(results[0].len(), 400);
}

#[test]
fn test_khashmap_safe_cursor_delete_current() {
    let mut map = KHashMap::with_bits(4).unwrap();
    for key in 0..100u64 {
        map.add(key, key * 10).unwrap();
    }

    // Delete every even key while walking
    let mut visited = 0;
    let mut cursor = map.safe_cursor();
    while let Some((key, value)) = cursor.next(&map) {
        assert_eq!(*value, key * 10);
        visited += 1;
        if key % 2 == 0 {
            map.del(key);
        }
    }

    assert_eq!(visited, 100);
    assert_eq!(map.iter().count(), 50);
    assert!(map.iter().all(|(key, _)| key % 2 == 1));
}

#[test]
fn test_khashmap_safe_cursor_drain_single_chain() {
    let mut map = KHashMap::with_bits(0).unwrap();
    for key in 0..10u64 {
        map.add(key, ()).unwrap();
    }

    let mut cursor = map.safe_cursor();
    while let Some(key) = cursor.next_key(&map) {
        map.del(key);
    }
    assert!(map.empty());
}

#[test]
fn test_khashmap_safe_cursor_successor_deleted() {
    // One chain holding 5, 4, 3, 2, 1, 0
    let mut map = KHashMap::with_bits(0).unwrap();
    for key in 0..6u64 {
        map.add(key, ()).unwrap();
    }

    // Removing the recorded successor ends the walk, but stays memory-safe
    let mut visited = Vec::new();
    let mut cursor = map.safe_cursor();
    while let Some(key) = cursor.next_key(&map) {
        visited.push(key);
        if key == 5 {
            map.del(4);
        }
    }

    assert_eq!(visited, vec![5]);
    let mut left: Vec<u64> = map.iter().map(|(key, _)| key).collect();
    left.sort_unstable();
    assert_eq!(left, vec![0, 1, 2, 3, 5]);
}

#[test]
fn test_khashmap_large_mapped_array_starts_empty() {
    let config = HashMapConfig {
        alloc: AllocPolicy::Always(AllocBackend::Mapped),
        ..HashMapConfig::with_bits(16)
    };
    let mut map = KHashMap::from_config(config).unwrap();
    assert_eq!(map.backend(), Some(AllocBackend::Mapped));

    // Fresh mapped pages read as empty chains
    assert!(map.empty());
    assert!(map.chain_lengths().iter().all(|&len| len == 0));

    map.add(u64::MAX, "last").unwrap();
    assert_eq!(map.find(u64::MAX), Some(&"last"));
    assert_eq!(map.iter().count(), 1);
}

#[test]
fn test_khashmap_retain() {
    let mut map = KHashMap::with_bits(3).unwrap();
    for key in 0..64u64 {
        map.add(key, key).unwrap();
    }

    map.retain(|key, value| {
        *value += 1;
        key % 4 == 0
    });

    assert_eq!(map.iter().count(), 16);
    assert_eq!(map.find(8), Some(&9));
    assert_eq!(map.find(9), None);
}

#[test]
fn test_khashmap_payloads_handed_back() {
    let payload = Rc::new(());
    let mut map = KHashMap::with_bits(4).unwrap();

    for key in 0..10u64 {
        assert!(map.add(key, Rc::clone(&payload)).unwrap().is_none());
    }
    assert_eq!(Rc::strong_count(&payload), 11);

    // A replaced value comes back instead of being dropped
    let fresh = Rc::new(());
    let old = map.add(0, Rc::clone(&fresh)).unwrap();
    assert!(old.as_ref().is_some_and(|old| Rc::ptr_eq(old, &payload)));
    assert_eq!(Rc::strong_count(&payload), 11);
    assert_eq!(Rc::strong_count(&fresh), 2);
    drop(old);
    assert_eq!(Rc::strong_count(&payload), 10);

    // A deleted one as well
    let removed = map.del(1);
    assert!(removed.is_some());
    assert_eq!(Rc::strong_count(&payload), 10);
    drop(removed);
    assert_eq!(Rc::strong_count(&payload), 9);

    // Destroying the map releases what it still owns
    map.destroy();
    assert_eq!(Rc::strong_count(&payload), 1);
    assert_eq!(Rc::strong_count(&fresh), 1);

    // A rejected value is returned inside the error
    let err = map.add(1, Rc::clone(&payload)).unwrap_err();
    assert_eq!(err.kind, KHashMapError::NotInitialized);
    assert_eq!(Rc::strong_count(&payload), 2);
    let rejected = err.into_value();
    assert!(Rc::ptr_eq(&rejected, &payload));
    drop(rejected);
    assert_eq!(Rc::strong_count(&payload), 1);

    // Dropping the map releases the items too
    let mut map = KHashMap::with_bits(4).unwrap();
    map.add(1, Rc::clone(&payload)).unwrap();
    drop(map);
    assert_eq!(Rc::strong_count(&payload), 1);
}

#[test]
fn test_khashmap_random_against_std() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut map = KHashMap::with_bits(6).unwrap();
    let mut oracle = HashMap::new();

    for _ in 0..5000 {
        let key = rng.gen_range(0..500u64);
        if rng.gen_bool(0.7) {
            let value = rng.gen_range(0..1_000_000u64);
            assert_eq!(map.add(key, value).unwrap(), oracle.insert(key, value));
        } else {
            assert_eq!(map.del(key), oracle.remove(&key));
        }
    }

    // Every key appears at most once
    let mut keys: Vec<u64> = map.iter().map(|(key, _)| key).collect();
    let total = keys.len();
    keys.sort_unstable();
    keys.dedup();
    assert_eq!(keys.len(), total);
    assert_eq!(total, oracle.len());

    for (key, value) in &oracle {
        assert_eq!(map.find(*key), Some(value));
    }
    assert_eq!(map.empty(), oracle.is_empty());
}

#[test]
fn test_khashmap_default_and_debug() {
    let mut map: KHashMap<u32> = KHashMap::default();
    assert_eq!(map.bits(), 9);
    assert!(!map.is_initialized());

    map.init().unwrap();
    map.add(42, 7).unwrap();
    assert_eq!(format!("{:?}", map), "{42: 7}");

    let pairs: Vec<(u64, &u32)> = (&map).into_iter().collect();
    assert_eq!(pairs, vec![(42, &7)]);
}
