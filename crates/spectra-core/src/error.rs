//! Error types for grid construction, filter management and image export.
//!
//! Nothing on the per-pixel path returns these. Frame-level failures are
//! reported as [`FrameStatus`](crate::frame::FrameStatus) values instead.

use std::path::PathBuf;

/// Errors raised while building or reading a [`ColorGrid`](crate::ColorGrid).
#[derive(Debug, thiserror::Error)]
pub enum LutError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("unsupported grid size {0}, expected 33")]
    UnsupportedSize(usize),

    #[error("expected {expected} values, found {found}")]
    EntryCount { expected: usize, found: usize },

    #[error("expected {expected} bytes, found {found}")]
    ByteLength { expected: usize, found: usize },

    #[error("entry {index} has value {value} outside [0, 1]")]
    ValueOutOfRange { index: usize, value: f32 },

    #[error("unsupported domain {min:?}..{max:?}, expected 0..1")]
    UnsupportedDomain { min: [f32; 3], max: [f32; 3] },
}

/// Result alias for grid operations.
pub type LutResult<T> = Result<T, LutError>;

/// Errors raised by the filter library.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("unknown filter: {0}")]
    UnknownFilter(String),

    #[error("\"{0}\" is reserved for the bypass filter")]
    ReservedName(String),

    #[error("failed to load filter \"{name}\": {source}")]
    Asset {
        name: String,
        #[source]
        source: LutError,
    },

    #[error("failed to read manifest {path}: {source}")]
    ManifestIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid manifest {path}: {source}")]
    ManifestFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result alias for filter library operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors raised when exporting a packed frame.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("pixel buffer holds {actual} pixels, {width}x{height} needs {required}")]
    Dimensions {
        width: u32,
        height: u32,
        required: usize,
        actual: usize,
    },

    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
}

pub type ImageResult<T> = Result<T, ImageError>;
