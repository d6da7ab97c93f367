//! Fixed array of chain heads

use super::cache::Link;
use crate::error::{KHashMapError, KHashMapResult};
use crate::memory::{AllocBackend, AllocPolicy, RawRegion};
use std::alloc::Layout;
use std::ops::{Deref, DerefMut};
use std::slice;

/// Array of `2^bits` chain heads backed by a `RawRegion`
pub(crate) struct BucketArray {
    region: RawRegion,
    len: usize,
}

impl BucketArray {
    /// Allocate `2^bits` heads, every head starting as an empty chain
    pub(crate) fn new(bits: u32, policy: AllocPolicy) -> KHashMapResult<Self> {
        let len = bucket_count(bits).ok_or(KHashMapError::OutOfMemory)?;
        let layout = Layout::array::<Link>(len).map_err(|_| KHashMapError::OutOfMemory)?;
        let region = RawRegion::alloc(layout, policy.select(layout.size()))?;

        // Anonymous mappings come back zeroed and an empty `Link` is all
        // zero bits, so only heap memory needs its heads written. Leaving
        // mapped pages untouched keeps them uncommitted until first use.
        if region.backend() == AllocBackend::Heap {
            let heads = region.as_ptr() as *mut Link;
            for i in 0..len {
                unsafe { heads.add(i).write(None) };
            }
        }

        Ok(BucketArray { region, len })
    }

    /// Backend holding the heads
    pub(crate) fn backend(&self) -> AllocBackend {
        self.region.backend()
    }
}

/// Number of heads for `bits`, `None` if it does not fit in `usize`
pub(crate) fn bucket_count(bits: u32) -> Option<usize> {
    1usize.checked_shl(bits)
}

impl Deref for BucketArray {
    type Target = [Link];

    fn deref(&self) -> &[Link] {
        // Every head is initialized by `new`, and `Link` needs no drop
        unsafe { slice::from_raw_parts(self.region.as_ptr() as *const Link, self.len) }
    }
}

impl DerefMut for BucketArray {
    fn deref_mut(&mut self) -> &mut [Link] {
        unsafe { slice::from_raw_parts_mut(self.region.as_ptr() as *mut Link, self.len) }
    }
}
