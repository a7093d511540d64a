//! Structural similarity kernels.
//!
//! The score is the mean SSIM over every `window x window` placement that lies
//! fully inside the raster, with uniform weights. Window statistics come from
//! exact integer summed-area tables; per-row sums are accumulated in row order,
//! so every kernel produces identical bits for the same inputs.

use crate::canon::CanonicalImage;
use crate::util::{PrintMatchError, PrintMatchResult};
use crate::ImageView;

pub(crate) mod integral;
pub mod scalar;

#[cfg(feature = "rayon")]
pub mod rayon;

/// SSIM parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SsimParams {
    /// Side length of the sliding window; odd and at least 3.
    pub window: usize,
    /// Luminance stabilizer coefficient.
    pub k1: f64,
    /// Contrast stabilizer coefficient.
    pub k2: f64,
    /// Dynamic range of pixel values.
    pub data_range: f64,
    /// Normalize variances with `N / (N - 1)` instead of `1`.
    pub sample_covariance: bool,
}

impl Default for SsimParams {
    fn default() -> Self {
        Self {
            window: 7,
            k1: 0.01,
            k2: 0.03,
            data_range: 255.0,
            sample_covariance: true,
        }
    }
}

impl SsimParams {
    /// Checks the parameters against a raster of the given size.
    pub fn validate(&self, width: usize, height: usize) -> PrintMatchResult<()> {
        if self.window < 3 || self.window % 2 == 0 {
            return Err(PrintMatchError::InvalidConfig(
                "window must be odd and at least 3",
            ));
        }
        if self.window > width || self.window > height {
            return Err(PrintMatchError::InvalidConfig(
                "window larger than the image",
            ));
        }
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.k1) || !positive(self.k2) {
            return Err(PrintMatchError::InvalidConfig("k1 and k2 must be positive"));
        }
        if !positive(self.data_range) {
            return Err(PrintMatchError::InvalidConfig(
                "data_range must be positive and finite",
            ));
        }
        Ok(())
    }
}

/// Kernel trait for similarity scoring.
pub trait Kernel {
    /// Computes the mean SSIM between two equally sized rasters.
    fn score(
        a: ImageView<'_, u8>,
        b: ImageView<'_, u8>,
        params: &SsimParams,
    ) -> PrintMatchResult<f64>;
}

/// Scores two canonical images with default parameters.
///
/// Returns a value in approximately `[-1, 1]`; `1.0` for identical rasters.
pub fn score(a: &CanonicalImage, b: &CanonicalImage) -> PrintMatchResult<f64> {
    score_with(a, b, &SsimParams::default())
}

/// Scores two canonical images with explicit parameters.
pub fn score_with(
    a: &CanonicalImage,
    b: &CanonicalImage,
    params: &SsimParams,
) -> PrintMatchResult<f64> {
    <scalar::SsimScalar as Kernel>::score(a.view(), b.view(), params)
}
