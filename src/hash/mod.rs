// Hash functions for 64-bit integer keys

use serde::{Deserialize, Serialize};

/// 2^64 / phi, the multiplier of the golden-ratio hash
pub const GOLDEN_RATIO_64: u64 = 0x61C8_8646_80B5_83EB;

/// MurmurHash3 64-bit finalizer
/// Every input bit affects every output bit, so the high bits can be used directly
pub fn fmix64(key: u64) -> u64 {
    let mut hash = key;
    hash ^= hash.wrapping_shr(33);
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash.wrapping_shr(33);
    hash = hash.wrapping_mul(0xc4ceb9fe1a85ec53);
    hash ^= hash.wrapping_shr(33);
    hash
}

/// Multiplicative hash keeping the top `bits` bits of `key * GOLDEN_RATIO_64`
pub fn hash_64(key: u64, bits: u32) -> u64 {
    top_bits(key.wrapping_mul(GOLDEN_RATIO_64), bits)
}

/// xxHash64 over the little-endian bytes of the key
pub fn xxh64_key(key: u64, seed: u64) -> u64 {
    xxhash_rust::xxh64::xxh64(&key.to_le_bytes(), seed)
}

/// Keep the `bits` most significant bits of `hash`
#[inline]
fn top_bits(hash: u64, bits: u32) -> u64 {
    match bits {
        0 => 0,
        1..=63 => hash >> (64 - bits),
        _ => hash,
    }
}

/// Hash function used to route a key to its bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashKind {
    /// MurmurHash3 finalizer
    #[default]
    Fmix64,
    /// Golden-ratio multiplicative hash
    Golden,
    /// xxHash64 seeded with the bucket-count exponent
    Xxh64,
}

impl HashKind {
    /// Full 64-bit hash of `key` for a table of `2^bits` buckets
    pub fn hash(&self, key: u64, bits: u32) -> u64 {
        match self {
            HashKind::Fmix64 => fmix64(key),
            HashKind::Golden => hash_64(key, u64::BITS),
            HashKind::Xxh64 => xxh64_key(key, bits as u64),
        }
    }

    /// Bucket index of `key`, always below `2^bits`
    #[inline]
    pub fn bucket(&self, key: u64, bits: u32) -> usize {
        top_bits(self.hash(key, bits), bits) as usize
    }
}
