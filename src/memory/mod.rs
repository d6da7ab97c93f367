//! Allocation backends for the bucket array
//!
//! Small arrays come from the global allocator, large ones are mapped
//! straight from the kernel as anonymous pages. The choice is made once,
//! when the array is allocated, and never changes how the map behaves.

use crate::error::{KHashMapError, KHashMapResult};
use crate::types::DEFAULT_PAGE_SIZE;
use libc::{self, c_void};
use serde::{Deserialize, Serialize};
use std::alloc::{self, Layout};
use std::ptr::{self, NonNull};

/// Memory source of an allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocBackend {
    /// Global allocator, low overhead for small blocks
    Heap,
    /// Anonymous private mapping, suited to large blocks
    Mapped,
}

/// Policy choosing an `AllocBackend` from the allocation size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocPolicy {
    /// `Heap` below the platform page size, `Mapped` otherwise
    #[default]
    Auto,
    /// `Heap` below the given byte size, `Mapped` otherwise
    Threshold(usize),
    /// Always use the given backend
    Always(AllocBackend),
}

impl AllocPolicy {
    /// Byte size from which allocations go to the mapped backend
    pub fn threshold(&self) -> Option<usize> {
        match self {
            AllocPolicy::Auto => Some(page_size()),
            AllocPolicy::Threshold(bytes) => Some(*bytes),
            AllocPolicy::Always(_) => None,
        }
    }

    /// Select the backend for an allocation of `size` bytes
    pub fn select(&self, size: usize) -> AllocBackend {
        match (self, self.threshold()) {
            (AllocPolicy::Always(backend), _) => *backend,
            (_, Some(threshold)) if size < threshold => AllocBackend::Heap,
            _ => AllocBackend::Mapped,
        }
    }
}

/// System page size, `DEFAULT_PAGE_SIZE` if it cannot be queried
pub fn page_size() -> usize {
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if size > 0 {
        size as usize
    } else {
        DEFAULT_PAGE_SIZE
    }
}

/// Owned block of uninitialized memory
///
/// The block is released through the backend it was obtained from.
pub struct RawRegion {
    ptr: NonNull<u8>,
    layout: Layout,
    backend: AllocBackend,
}

// The region is plain memory exclusively owned by this handle
unsafe impl Send for RawRegion {}
unsafe impl Sync for RawRegion {}

impl RawRegion {
    /// Allocate `layout` from `backend`
    ///
    /// Zero-sized layouts are rejected as `OutOfMemory`.
    pub fn alloc(layout: Layout, backend: AllocBackend) -> KHashMapResult<Self> {
        if layout.size() == 0 {
            return Err(KHashMapError::OutOfMemory);
        }

        let raw = match backend {
            AllocBackend::Heap => unsafe { alloc::alloc(layout) },
            AllocBackend::Mapped => map_anonymous(layout)?,
        };

        let ptr = NonNull::new(raw).ok_or(KHashMapError::OutOfMemory)?;
        Ok(RawRegion {
            ptr,
            layout,
            backend,
        })
    }

    /// Start of the region
    #[inline]
    pub fn as_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// Size of the region in bytes
    #[inline]
    pub fn size(&self) -> usize {
        self.layout.size()
    }

    /// Backend the region was obtained from
    #[inline]
    pub fn backend(&self) -> AllocBackend {
        self.backend
    }
}

impl Drop for RawRegion {
    fn drop(&mut self) {
        match self.backend {
            AllocBackend::Heap => unsafe { alloc::dealloc(self.ptr.as_ptr(), self.layout) },
            AllocBackend::Mapped => unsafe {
                libc::munmap(self.ptr.as_ptr() as *mut c_void, self.layout.size());
            },
        }
    }
}

/// Map private anonymous pages for `layout`
///
/// Mappings are page aligned, which covers any alignment the bucket array needs.
fn map_anonymous(layout: Layout) -> KHashMapResult<*mut u8> {
    if layout.align() > page_size() {
        return Err(KHashMapError::OutOfMemory);
    }

    let result = unsafe {
        libc::mmap(
            ptr::null_mut(),
            layout.size(),
            libc::PROT_READ | libc::PROT_WRITE,
            libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
            -1,
            0,
        )
    };

    if result == libc::MAP_FAILED {
        Err(KHashMapError::OutOfMemory)
    } else {
        Ok(result as *mut u8)
    }
}
