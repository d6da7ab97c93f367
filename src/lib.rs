//! khashmap: fixed-capacity hash map keyed by 64-bit integers

// Global type definitions
pub mod types;

// Import various modules
pub mod config;
pub mod error;
pub mod hash;
pub mod khashmap;
pub mod memory;
pub mod sample;

// Re-export the map and its companions for easier access
pub use config::HashMapConfig;
pub use error::{AddError, AddResult, ConfigError, ConfigResult, KHashMapError, KHashMapResult};
pub use hash::HashKind;
pub use khashmap::{Iter, KHashMap, SafeCursor};
pub use memory::{AllocBackend, AllocPolicy};
