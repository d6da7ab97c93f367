//! Hash map configuration
//!
//! The only option that changes the shape of a map is `bits`; the hash
//! function and the allocation policy are tuning knobs.

use crate::error::{ConfigError, ConfigResult};
use crate::hash::HashKind;
use crate::memory::AllocPolicy;
use crate::types::DEFAULT_BITS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Construction parameters of a `KHashMap`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashMapConfig {
    /// The bucket array has `2^bits` entries
    pub bits: u32,
    /// Hash function routing keys to buckets
    pub hash: HashKind,
    /// Backend selection for the bucket array
    pub alloc: AllocPolicy,
}

impl Default for HashMapConfig {
    fn default() -> Self {
        HashMapConfig {
            bits: DEFAULT_BITS,
            hash: HashKind::default(),
            alloc: AllocPolicy::default(),
        }
    }
}

impl HashMapConfig {
    /// Default configuration with a different bucket-count exponent
    pub fn with_bits(bits: u32) -> Self {
        HashMapConfig {
            bits,
            ..Default::default()
        }
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: HashMapConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that the configuration describes an addressable bucket array
    pub fn validate(&self) -> ConfigResult<()> {
        if self.bits >= usize::BITS {
            return Err(ConfigError::InvalidArgument(format!(
                "bits must be below {}, got {}",
                usize::BITS,
                self.bits
            )));
        }
        if let AllocPolicy::Threshold(0) = self.alloc {
            return Err(ConfigError::InvalidArgument(
                "allocation threshold must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
