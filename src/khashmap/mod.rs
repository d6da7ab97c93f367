//! Fixed-capacity hash map keyed by 64-bit integers
//!
//! The bucket array holds `2^bits` chain heads and is never resized.
//! Collisions are resolved by a singly-linked chain per bucket, new items
//! going to the head of their chain. Items live in a slab owned by the map.
//!
//! The map does no locking. Callers sharing a map between threads must
//! serialize every operation, iteration included, behind one lock.

mod bucket;
mod cache;
pub mod iter;

use crate::config::HashMapConfig;
use crate::error::{AddError, AddResult, KHashMapError, KHashMapResult};
use crate::hash::HashKind;
use crate::memory::{AllocBackend, AllocPolicy};
use crate::types::{DEFAULT_BITS, Key};
use bucket::BucketArray;
use cache::{ItemCache, ItemId, Link};
use std::fmt;
use std::mem;

pub use iter::{Iter, SafeCursor};

/// Key/value hash map with a fixed number of buckets
pub struct KHashMap<V> {
    /// Amount of bits used to size the bucket array (size is 2^bits)
    bits: u32,
    hash: HashKind,
    alloc: AllocPolicy,
    /// `None` until `init`, and again after `destroy`
    buckets: Option<BucketArray>,
    cache: ItemCache<V>,
}

impl<V> KHashMap<V> {
    /// Declare a map of `2^bits` buckets without allocating it
    pub const fn new(bits: u32) -> Self {
        KHashMap {
            bits,
            hash: HashKind::Fmix64,
            alloc: AllocPolicy::Auto,
            buckets: None,
            cache: ItemCache::new(),
        }
    }

    /// Declare a map from a configuration without allocating it
    pub fn with_config(config: HashMapConfig) -> Self {
        KHashMap {
            bits: config.bits,
            hash: config.hash,
            alloc: config.alloc,
            buckets: None,
            cache: ItemCache::new(),
        }
    }

    /// Declare and initialize a map of `2^bits` buckets
    pub fn with_bits(bits: u32) -> KHashMapResult<Self> {
        let mut map = Self::new(bits);
        map.init()?;
        Ok(map)
    }

    /// Declare and initialize a map from a configuration
    pub fn from_config(config: HashMapConfig) -> KHashMapResult<Self> {
        let mut map = Self::with_config(config);
        map.init()?;
        Ok(map)
    }

    /// Allocate the bucket array, every bucket empty
    ///
    /// On failure the map stays uninitialized. Calling `init` on an
    /// initialized map destroys its contents first.
    pub fn init(&mut self) -> KHashMapResult<()> {
        self.destroy();
        self.buckets = Some(BucketArray::new(self.bits, self.alloc)?);
        Ok(())
    }

    /// Free every item, then the bucket array
    ///
    /// A no-op on an uninitialized map. The map must be `init`ed again
    /// before it can store anything.
    pub fn destroy(&mut self) {
        let Some(mut buckets) = self.buckets.take() else {
            return;
        };

        for head in buckets.iter_mut() {
            let mut link = head.take();
            while let Some(id) = link {
                link = self.cache.get(id).and_then(|item| item.next);
                drop(self.cache.free(id));
            }
        }

        self.cache.clear();
    }

    /// Whether the bucket array is allocated
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.buckets.is_some()
    }

    /// Bucket-count exponent
    #[inline]
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Hash function in use
    #[inline]
    pub fn hash_kind(&self) -> HashKind {
        self.hash
    }

    /// Number of chain heads in the bucket array (`2^bits`)
    pub fn size(&self) -> usize {
        bucket::bucket_count(self.bits).unwrap_or(usize::MAX)
    }

    /// Size of the bucket array in bytes
    pub fn size_in_bytes(&self) -> usize {
        self.size().saturating_mul(mem::size_of::<Link>())
    }

    /// Backend holding the bucket array, `None` when uninitialized
    pub fn backend(&self) -> Option<AllocBackend> {
        self.buckets.as_ref().map(|buckets| buckets.backend())
    }

    /// True if no bucket holds an item
    pub fn empty(&self) -> bool {
        self.heads().iter().all(Option::is_none)
    }

    /// Value stored under `key`
    pub fn find(&self, key: Key) -> Option<&V> {
        let id = self.find_item(key)?;
        self.cache.get(id).map(|item| &item.value)
    }

    /// Mutable access to the value stored under `key`
    pub fn find_mut(&mut self, key: Key) -> Option<&mut V> {
        let id = self.find_item(key)?;
        self.cache.get_mut(id).map(|item| &mut item.value)
    }

    /// Whether an item is stored under `key`
    pub fn contains_key(&self, key: Key) -> bool {
        self.find_item(key).is_some()
    }

    /// Store `value` under `key`
    ///
    /// An existing item gets its value replaced in place and the previous
    /// value is returned. Otherwise a new item is linked at the head of the
    /// bucket's chain. On error the map is left exactly as it was and
    /// `value` comes back inside the error.
    pub fn add(&mut self, key: Key, value: V) -> AddResult<V> {
        if let Some(item) = self.find_item(key).and_then(|id| self.cache.get_mut(id)) {
            return Ok(Some(mem::replace(&mut item.value, value)));
        }

        let index = self.bucket_of(key);
        let Some(buckets) = self.buckets.as_mut() else {
            return Err(AddError::new(KHashMapError::NotInitialized, value));
        };
        let id = self.cache.alloc(key, value, buckets[index])?;
        buckets[index] = Some(id);
        Ok(None)
    }

    /// Remove `key`, handing its value back to the caller
    ///
    /// Removing an absent key is a no-op.
    pub fn del(&mut self, key: Key) -> Option<V> {
        let index = self.bucket_of(key);
        let buckets = self.buckets.as_mut()?;

        let mut prev: Option<ItemId> = None;
        let mut link = buckets[index];
        while let Some(id) = link {
            let item = self.cache.get(id)?;
            if item.key == key {
                let next = item.next;
                match prev.and_then(|p| self.cache.get_mut(p)) {
                    Some(prev_item) => prev_item.next = next,
                    None => buckets[index] = next,
                }
                return Some(self.cache.free(id));
            }
            prev = Some(id);
            link = item.next;
        }

        None
    }

    /// Keep only the items for which `f` returns true
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(Key, &mut V) -> bool,
    {
        let mut cursor = self.safe_cursor();
        while let Some(key) = cursor.next_key(self) {
            let keep = match self.find_mut(key) {
                Some(value) => f(key, value),
                None => true,
            };
            if !keep {
                self.del(key);
            }
        }
    }

    /// Iterate over all `(key, &value)` pairs
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(self.heads(), &self.cache)
    }

    /// Start a traversal that allows deleting the current item
    pub fn safe_cursor(&self) -> SafeCursor {
        SafeCursor::new()
    }

    /// Length of every chain, in bucket order
    pub fn chain_lengths(&self) -> Vec<usize> {
        self.heads()
            .iter()
            .map(|head| {
                let mut len = 0;
                let mut link = *head;
                while let Some(item) = link.and_then(|id| self.cache.get(id)) {
                    len += 1;
                    link = item.next;
                }
                len
            })
            .collect()
    }

    /// Chain heads, empty when uninitialized
    #[inline]
    fn heads(&self) -> &[Link] {
        match &self.buckets {
            Some(buckets) => &buckets[..],
            None => &[],
        }
    }

    #[inline]
    fn bucket_of(&self, key: Key) -> usize {
        self.hash.bucket(key, self.bits)
    }

    /// Scan the chain of `key`'s bucket
    fn find_item(&self, key: Key) -> Option<ItemId> {
        let mut link = *self.heads().get(self.bucket_of(key))?;
        while let Some(id) = link {
            let item = self.cache.get(id)?;
            if item.key == key {
                return Some(id);
            }
            link = item.next;
        }
        None
    }
}

impl<V> Default for KHashMap<V> {
    fn default() -> Self {
        Self::new(DEFAULT_BITS)
    }
}

impl<V> Drop for KHashMap<V> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<V: fmt::Debug> fmt::Debug for KHashMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
