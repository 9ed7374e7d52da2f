//! Error types for `arrbench`.
//!
//! Every failure inside the core propagates to the caller unchanged; nothing
//! here is caught or retried. The harness decides whether a failing method
//! aborts the whole run or is skipped.

use thiserror::Error;

use crate::array::DType;
use crate::config::ConfigError;

/// Result type alias for `arrbench` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while saving, loading or verifying an array.
///
/// Error codes follow the pattern `ARRB-XXX`.
#[derive(Error, Debug)]
pub enum Error {
    /// File access failure, including a missing path on load (ARRB-001).
    #[error("[ARRB-001] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The codec behind a storage method failed to encode or decode (ARRB-002).
    #[error("[ARRB-002] Codec error in {method}: {message}")]
    Codec {
        /// Name of the storage method whose codec failed.
        method: &'static str,
        /// Message reported by the codec.
        message: String,
    },

    /// Loaded data differs from the reference array (ARRB-003).
    #[error("[ARRB-003] load failed for {method}")]
    Verification {
        /// Name of the storage method that returned wrong data.
        method: String,
    },

    /// Array shape does not match its data, or is empty (ARRB-004).
    #[error("[ARRB-004] Invalid shape: {rows}x{cols} with {len} elements")]
    InvalidShape {
        /// Requested row count.
        rows: usize,
        /// Requested column count.
        cols: usize,
        /// Number of elements supplied.
        len: usize,
    },

    /// Malformed `<dtype> <rows> <cols>` header line (ARRB-005).
    #[error("[ARRB-005] Invalid header: {0}")]
    InvalidHeader(String),

    /// Storage method cannot represent this element type (ARRB-006).
    #[error("[ARRB-006] {method} does not support element type {dtype}")]
    UnsupportedElementType {
        /// Name of the storage method.
        method: String,
        /// Rejected element type.
        dtype: DType,
    },

    /// Catalog name not recognized (ARRB-007).
    #[error("[ARRB-007] Unknown storage method '{0}'")]
    UnknownMethod(String),

    /// Configuration parse or validation failure (ARRB-008).
    #[error("[ARRB-008] Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    /// Returns the error code (e.g., "ARRB-001").
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "ARRB-001",
            Self::Codec { .. } => "ARRB-002",
            Self::Verification { .. } => "ARRB-003",
            Self::InvalidShape { .. } => "ARRB-004",
            Self::InvalidHeader(_) => "ARRB-005",
            Self::UnsupportedElementType { .. } => "ARRB-006",
            Self::UnknownMethod(_) => "ARRB-007",
            Self::Config(_) => "ARRB-008",
        }
    }

    /// Returns true if a load failed because the path does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }

    /// Builds a codec error for `method` from any displayable codec failure.
    pub(crate) fn codec(method: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Codec {
            method,
            message: err.to_string(),
        }
    }
}
