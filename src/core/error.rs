//! Error types for octree construction

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the crate
///
/// Every variant is terminal for the current build: a partially built
/// octree would leave dangling child pointers in the shader, so there is
/// no degraded output and no recovery. Variants carry the context needed
/// to diagnose a failure without re-running.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("truncated volume file {}: expected {expected} bytes, got {actual}", .path.display())]
    TruncatedData {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },

    #[error("volume dimension {dim} is not a power of two in 1..={max}", max = crate::math::morton::MAX_DIM)]
    InvalidDimension { dim: u32 },

    #[error("unsupported bit depth {bits} (expected 8 or 16)")]
    UnsupportedBitDepth { bits: u32 },

    #[error("octree needs {required} buffer elements but the target allows {limit}")]
    CapacityExceeded { required: usize, limit: usize },

    #[error("GPU error: {0}")]
    Gpu(String),
}
