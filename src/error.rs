//! Hash map and configuration error definitions

use std::error::Error;
use std::fmt;

/// Hash map error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KHashMapError {
    /// The bucket array or an item could not be allocated
    OutOfMemory,
    /// The map has no bucket array (never initialized, or destroyed)
    NotInitialized,
}

impl fmt::Display for KHashMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KHashMapError::OutOfMemory => write!(f, "Out of memory"),
            KHashMapError::NotInitialized => write!(f, "Hash map is not initialized"),
        }
    }
}

impl Error for KHashMapError {}

/// Result type for hash map operations
pub type KHashMapResult<T> = Result<T, KHashMapError>;

/// Failed insertion, carrying the rejected value back to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddError<V> {
    /// Why the value could not be stored
    pub kind: KHashMapError,
    /// The value passed to `add`, untouched
    pub value: V,
}

impl<V> AddError<V> {
    pub fn new(kind: KHashMapError, value: V) -> Self {
        AddError { kind, value }
    }

    /// Take the rejected value back
    pub fn into_value(self) -> V {
        self.value
    }
}

impl<V> fmt::Display for AddError<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Add failed: {}", self.kind)
    }
}

impl<V: fmt::Debug> Error for AddError<V> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.kind)
    }
}

impl<V> From<AddError<V>> for KHashMapError {
    fn from(err: AddError<V>) -> Self {
        err.kind
    }
}

/// Result type for `add`: the displaced value on success
pub type AddResult<V> = Result<Option<V>, AddError<V>>;

/// Configuration error types
///
/// Represents all possible errors that can occur while loading
/// or validating a `HashMapConfig`.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error while reading the configuration file
    IoError(std::io::Error),
    /// Error parsing configuration data
    ParseError(String),
    /// A field holds a value the map cannot use
    InvalidArgument(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(err) => write!(f, "I/O error: {}", err),
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
