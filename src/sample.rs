//! Sample consumer: fills a map with random pairs and renders a text dump

use crate::error::KHashMapResult;
use crate::khashmap::KHashMap;
use crate::types::Key;
use parking_lot::Mutex;
use rand::Rng;
use std::fmt::{self, Write};

/// Map shared behind one coarse lock held for every operation
pub type SharedMap<V> = Mutex<KHashMap<V>>;

/// Add `count` random pairs, keys in `0..key_range`, values in `1..=key_range`
///
/// Keys repeat, so the map ends up with at most `count` items. Stops at the
/// first allocation failure.
pub fn fill_random<R: Rng>(
    map: &mut KHashMap<u64>,
    rng: &mut R,
    count: usize,
    key_range: u64,
) -> KHashMapResult<()> {
    let range = key_range.max(1);
    for _ in 0..count {
        let key = rng.gen_range(0..range);
        let value = rng.gen_range(0..range) + 1;
        map.add(key, value)?;
    }
    Ok(())
}

/// Every item as `"  key -> value"`, followed by the result of looking up `lookup`
pub fn render_dump<V: fmt::Display>(map: &KHashMap<V>, lookup: Key) -> String {
    let mut out = String::from("hash dump:\n");

    for (key, value) in map {
        let _ = writeln!(out, "  {} -> {}", key, value);
    }

    let _ = match map.find(lookup) {
        Some(value) => writeln!(out, "key={} value={}", lookup, value),
        None => writeln!(out, "key {} not found", lookup),
    };

    out
}

/// `render_dump` with the lock held across the whole traversal
pub fn dump_shared<V: fmt::Display>(shared: &SharedMap<V>, lookup: Key) -> String {
    let map = shared.lock();
    render_dump(&map, lookup)
}
