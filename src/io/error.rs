//! Error types for mosaic runs and their coarse classification

use std::fmt;
use std::path::PathBuf;

/// Main error type for all mosaic operations
#[derive(Debug)]
pub enum MosaicError {
    /// A run was requested while another one is still active
    Busy,

    /// Input rejected at the call boundary
    ///
    /// Covers files that are not images, unsupported formats and
    /// malformed tile geometry.
    InvalidInput {
        /// Name of the rejected input
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// The source image could not be decoded
    DecodeFailure {
        /// Path to the image file
        path: PathBuf,
        /// Underlying decoding error
        source: image::ImageError,
    },

    /// Tile sampling of a row failed
    SampleFailure {
        /// Row whose sampling failed
        row: usize,
        /// Description of the failure
        reason: String,
    },

    /// The tile service could not resolve a color
    LookupFailure {
        /// Hex key of the color being resolved
        key: String,
        /// Description of the failure
        reason: String,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// Coarse error classification reported with a failed run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A run is already active
    Busy,
    /// Input was rejected before the run started
    InvalidInput,
    /// The image failed to load
    DecodeFailure,
    /// Tile sampling failed
    SampleFailure,
    /// Color resolution failed
    LookupFailure,
}

impl MosaicError {
    /// Classify the error
    ///
    /// File system failures only arise while loading input, so they are
    /// reported as decode failures.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Busy => ErrorKind::Busy,
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::DecodeFailure { .. } | Self::FileSystem { .. } => ErrorKind::DecodeFailure,
            Self::SampleFailure { .. } => ErrorKind::SampleFailure,
            Self::LookupFailure { .. } => ErrorKind::LookupFailure,
        }
    }
}

impl fmt::Display for MosaicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy => write!(f, "A mosaic run is already in progress"),
            Self::InvalidInput {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid input '{parameter}' = '{value}': {reason}")
            }
            Self::DecodeFailure { path, source } => {
                write!(f, "Failed to decode image '{}': {source}", path.display())
            }
            Self::SampleFailure { row, reason } => {
                write!(f, "Sampling failed on row {row}: {reason}")
            }
            Self::LookupFailure { key, reason } => {
                write!(f, "Tile lookup failed for color #{key}: {reason}")
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for MosaicError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DecodeFailure { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Busy => "busy",
            Self::InvalidInput => "invalid input",
            Self::DecodeFailure => "decode failure",
            Self::SampleFailure => "sample failure",
            Self::LookupFailure => "lookup failure",
        };
        f.write_str(name)
    }
}

/// Convenience type alias for mosaic results
pub type Result<T> = std::result::Result<T, MosaicError>;

impl From<image::ImageError> for MosaicError {
    fn from(err: image::ImageError) -> Self {
        Self::DecodeFailure {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for MosaicError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid input error
pub fn invalid_input(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> MosaicError {
    MosaicError::InvalidInput {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a sampling failure for a row
pub fn sample_failure(row: usize, reason: &impl ToString) -> MosaicError {
    MosaicError::SampleFailure {
        row,
        reason: reason.to_string(),
    }
}

/// Create a lookup failure for a color key
pub fn lookup_failure(key: &impl ToString, reason: &impl ToString) -> MosaicError {
    MosaicError::LookupFailure {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

