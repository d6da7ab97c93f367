/// Global type definitions
///
/// Stores constants and type aliases shared by the hash map and its consumers

/// Key type stored in the map
pub type Key = u64;

/// Default amount of bits used to size the bucket array (512 buckets)
///
/// More bits lower the probability of key conflicts, but the array grows and
/// a full scan of the map trashes the CPU caches even more.
pub const DEFAULT_BITS: u32 = 9;

/// Fallback allocation threshold when the page size cannot be queried
pub const DEFAULT_PAGE_SIZE: usize = 4096;

/// Number of random pairs the sample consumer inserts
pub const DEFAULT_SAMPLE_COUNT: usize = 1000;

/// Keys and values produced by the sample consumer stay below this bound
pub const DEFAULT_SAMPLE_KEY_RANGE: u64 = 1000;
