//! Canonicalization of heterogeneous image inputs.
//!
//! Every descriptor, whatever its encoding, goes through the same steps:
//! resolve to encoded bytes, decode the container, convert to grayscale and
//! resize to the configured canonical size. Two `CanonicalImage`s produced by
//! the same `Canonicalizer` are therefore always directly comparable.

use crate::image::io::{decode_gray_bytes, read_image_bytes};
use crate::image::resize::resize_u8_bilinear;
use crate::image::{ImageView, OwnedImage};
use crate::trace::{trace_event, trace_span};
use crate::util::{DecodeError, PrintMatchError, PrintMatchResult};
use std::borrow::Cow;
use std::path::PathBuf;

pub mod padding;

/// Side length of the canonical raster.
pub const CANONICAL_SIZE: usize = 300;

/// An encoded image in one of the supported input forms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageDescriptor {
    /// Path to an encoded image file on disk.
    FilePath(PathBuf),
    /// Base64 text of an encoded image; trailing padding may be missing.
    Base64String(String),
    /// Encoded image bytes already in memory.
    RawBytes(Vec<u8>),
}

impl ImageDescriptor {
    /// Creates a path descriptor.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::FilePath(path.into())
    }

    /// Creates a base64 descriptor.
    pub fn from_base64(text: impl Into<String>) -> Self {
        Self::Base64String(text.into())
    }

    /// Creates a raw-bytes descriptor.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::RawBytes(bytes.into())
    }

    /// Short label of the active variant, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FilePath(_) => "path",
            Self::Base64String(_) => "base64",
            Self::RawBytes(_) => "bytes",
        }
    }

    /// Resolves the descriptor to the bytes of an encoded image.
    pub fn resolve_bytes(&self) -> Result<Cow<'_, [u8]>, DecodeError> {
        match self {
            Self::FilePath(path) => read_image_bytes(path).map(Cow::Owned),
            Self::Base64String(text) => padding::decode_base64_lenient(text).map(Cow::Owned),
            Self::RawBytes(bytes) => Ok(Cow::Borrowed(bytes.as_slice())),
        }
    }
}

/// Target geometry of canonical rasters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CanonicalConfig {
    /// Output width in pixels.
    pub width: usize,
    /// Output height in pixels.
    pub height: usize,
}

impl Default for CanonicalConfig {
    fn default() -> Self {
        Self {
            width: CANONICAL_SIZE,
            height: CANONICAL_SIZE,
        }
    }
}

/// Fixed-size single-channel 8-bit raster ready for scoring.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanonicalImage {
    img: OwnedImage,
}

impl CanonicalImage {
    /// Returns a borrowed view of the raster.
    pub fn view(&self) -> ImageView<'_, u8> {
        self.img.view()
    }

    /// Returns the raster width in pixels.
    pub fn width(&self) -> usize {
        self.img.width()
    }

    /// Returns the raster height in pixels.
    pub fn height(&self) -> usize {
        self.img.height()
    }

    /// Returns the row-major pixel buffer.
    pub fn data(&self) -> &[u8] {
        self.img.data()
    }
}

/// Converts image descriptors into canonical rasters.
#[derive(Clone, Copy, Debug, Default)]
pub struct Canonicalizer {
    cfg: CanonicalConfig,
}

impl Canonicalizer {
    /// Creates a canonicalizer producing rasters of the given geometry.
    pub fn new(cfg: CanonicalConfig) -> PrintMatchResult<Self> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(PrintMatchError::InvalidDimensions {
                width: cfg.width,
                height: cfg.height,
            });
        }
        Ok(Self { cfg })
    }

    /// Returns the active configuration.
    pub fn config(&self) -> CanonicalConfig {
        self.cfg
    }

    /// Decodes, converts to grayscale and resizes a descriptor.
    pub fn canonicalize(&self, descriptor: &ImageDescriptor) -> PrintMatchResult<CanonicalImage> {
        let _span = trace_span!("canonicalize", kind = descriptor.kind()).entered();

        let bytes = descriptor.resolve_bytes()?;
        let gray = decode_gray_bytes(&bytes)?;
        trace_event!(
            "decoded",
            width = gray.width(),
            height = gray.height(),
            bytes = bytes.len()
        );

        let img = if gray.width() == self.cfg.width && gray.height() == self.cfg.height {
            gray
        } else {
            resize_u8_bilinear(gray.view(), self.cfg.width, self.cfg.height)?
        };
        Ok(CanonicalImage { img })
    }

    /// Wraps an already decoded grayscale raster, resizing it if needed.
    pub fn canonicalize_gray(&self, gray: ImageView<'_, u8>) -> PrintMatchResult<CanonicalImage> {
        let img = if gray.dims() == (self.cfg.width, self.cfg.height) {
            OwnedImage::from_view(gray)?
        } else {
            resize_u8_bilinear(gray, self.cfg.width, self.cfg.height)?
        };
        Ok(CanonicalImage { img })
    }
}

/// Canonicalizes a descriptor at the default 300x300 geometry.
pub fn canonicalize(descriptor: &ImageDescriptor) -> PrintMatchResult<CanonicalImage> {
    Canonicalizer::default().canonicalize(descriptor)
}
