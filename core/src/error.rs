//! Error types for the engine core
//!
//! Draw-call handlers never return these to the host: they are produced by
//! internal helpers, logged at the handler boundary, and the offending
//! operation is dropped for the current frame.

use std::path::PathBuf;

/// Contract violations and resource exhaustion inside the engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A fixed per-frame arena is full
    #[error("{what} capacity exceeded ({len} + {requested} > {capacity})")]
    CapacityExceeded {
        what: &'static str,
        len: usize,
        requested: usize,
        capacity: usize,
    },

    /// Texture addresses must be 256-byte aligned
    #[error("texture address {0:#x} is not 256-byte aligned")]
    MisalignedTextureAddress(u32),

    /// Only TMU 0 is emulated
    #[error("TMU {0} is not supported (only TMU 0)")]
    UnsupportedTmu(u32),

    /// A texture range falls outside the TMU arena
    #[error("texture at {address:#x} ({len} bytes) exceeds TMU memory of {capacity} bytes")]
    TextureOutOfBounds {
        address: u32,
        len: usize,
        capacity: usize,
    },

    /// Every game palette slot is taken
    #[error("too many palettes (max {0})")]
    PaletteTableFull(usize),

    /// Primitive mode outside the fan/strip set the game uses
    #[error("unsupported primitive mode {0}")]
    UnsupportedPrimitive(u32),

    /// Texture table type other than the 8-bit palette
    #[error("unsupported texture table type {0}")]
    UnsupportedTableType(u32),

    /// Contiguous vertex arrays must use the game vertex stride
    #[error("vertex stride {actual} does not match expected {expected}")]
    BadVertexStride { expected: usize, actual: usize },

    /// Vertex array with fewer vertices than a primitive needs
    #[error("vertex array of {0} vertices is too short")]
    TooFewVertices(usize),
}

/// Errors loading or validating a [`Config`](crate::config::Config).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

pub type CoreResult<T> = Result<T, CoreError>;
