//! Error types for printmatch.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for printmatch operations.
pub type PrintMatchResult<T> = std::result::Result<T, PrintMatchError>;

/// Reasons an image descriptor could not be turned into a raster.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The file behind a path descriptor could not be read.
    #[error("could not load image from path {}: {reason}", path.display())]
    Unreadable { path: PathBuf, reason: String },
    /// Base64 text that stays invalid after padding repair.
    #[error("invalid base64 payload: {reason}")]
    Padding { reason: String },
    /// The bytes are not a supported image container or are corrupt.
    #[error("could not decode image: {reason}")]
    Format { reason: String },
    /// Zero-length input or a zero-size raster.
    #[error("image is empty")]
    Empty,
}

/// Errors that can occur when canonicalizing, scoring or selecting images.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PrintMatchError {
    /// The input could not be decoded into an image.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// Two rasters passed to the scorer do not share dimensions.
    #[error("dimension mismatch: {left:?} vs {right:?}")]
    DimensionMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },
    /// Width or height is zero or overflows.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is smaller than the width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer is shorter than the view requires.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

impl PrintMatchError {
    /// Returns true when the error originates from decoding an input.
    pub fn is_decode(&self) -> bool {
        matches!(self, PrintMatchError::Decode(_))
    }
}
