//! Traversal over every bucket and chain

use super::KHashMap;
use super::cache::{ItemCache, Link};
use crate::types::Key;
use std::iter::FusedIterator;

/// Iterator over the `(key, &value)` pairs of a `KHashMap`
///
/// Buckets are visited in index order, each chain from its head.
pub struct Iter<'a, V> {
    heads: &'a [Link],
    cache: &'a ItemCache<V>,
    bucket: usize,
    cursor: Link,
}

impl<'a, V> Iter<'a, V> {
    pub(crate) fn new(heads: &'a [Link], cache: &'a ItemCache<V>) -> Self {
        Iter {
            heads,
            cache,
            bucket: 0,
            cursor: None,
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (Key, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let cache = self.cache;
        loop {
            if let Some(item) = self.cursor.and_then(|id| cache.get(id)) {
                self.cursor = item.next;
                return Some((item.key, &item.value));
            }
            let head = self.heads.get(self.bucket)?;
            self.cursor = *head;
            self.bucket += 1;
        }
    }
}

impl<V> FusedIterator for Iter<'_, V> {}

impl<'a, V> IntoIterator for &'a KHashMap<V> {
    type Item = (Key, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Iter<'a, V> {
        self.iter()
    }
}

/// Traversal that tolerates removal of the item it just yielded
///
/// The cursor does not borrow the map between steps. Before an item is
/// handed out its successor is recorded, so the caller may `del` the
/// yielded key and keep going. Removing any other item mid-traversal is
/// memory-safe but may end the current chain early.
#[derive(Debug, Clone, Default)]
pub struct SafeCursor {
    bucket: usize,
    next: Link,
}

impl SafeCursor {
    pub(crate) fn new() -> Self {
        SafeCursor::default()
    }

    /// Advance to the next item of `map`
    pub fn next<'a, V>(&mut self, map: &'a KHashMap<V>) -> Option<(Key, &'a V)> {
        let heads = map.heads();
        loop {
            if let Some(item) = self.next.and_then(|id| map.cache.get(id)) {
                self.next = item.next;
                return Some((item.key, &item.value));
            }
            self.next = *heads.get(self.bucket)?;
            self.bucket += 1;
        }
    }

    /// Advance to the next item of `map`, yielding only its key
    pub fn next_key<V>(&mut self, map: &KHashMap<V>) -> Option<Key> {
        self.next(map).map(|(key, _)| key)
    }
}
