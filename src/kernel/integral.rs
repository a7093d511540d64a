//! Exact windowed statistics for a pair of equally sized rasters.
//!
//! Five summed-area tables (`a`, `b`, `a²`, `b²`, `a·b`) are built in `u64`, so
//! every window sum is exact and independent of evaluation order. Each table
//! has one leading zero row and column: entry `(x, y)` holds the sum over
//! `[0, x) x [0, y)`.

use crate::image::ImageView;
use crate::kernel::SsimParams;
use crate::util::{PrintMatchError, PrintMatchResult};

/// Exact sums over one window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct WindowSums {
    pub(crate) a: u64,
    pub(crate) b: u64,
    pub(crate) aa: u64,
    pub(crate) bb: u64,
    pub(crate) ab: u64,
}

/// Summed-area tables for a raster pair.
pub(crate) struct PairIntegrals {
    width: usize,
    height: usize,
    stride: usize,
    a: Vec<u64>,
    b: Vec<u64>,
    aa: Vec<u64>,
    bb: Vec<u64>,
    ab: Vec<u64>,
}

impl PairIntegrals {
    /// Builds the tables; both views must share dimensions.
    pub(crate) fn build(a: ImageView<'_, u8>, b: ImageView<'_, u8>) -> PrintMatchResult<Self> {
        if a.dims() != b.dims() {
            return Err(PrintMatchError::DimensionMismatch {
                left: a.dims(),
                right: b.dims(),
            });
        }
        let (width, height) = a.dims();
        let stride = width + 1;
        let len = stride * (height + 1);
        let mut out = Self {
            width,
            height,
            stride,
            a: vec![0; len],
            b: vec![0; len],
            aa: vec![0; len],
            bb: vec![0; len],
            ab: vec![0; len],
        };

        for y in 0..height {
            let row_a = a.row(y).ok_or(PrintMatchError::BufferTooSmall {
                needed: (y + 1) * a.stride(),
                got: a.as_slice().len(),
            })?;
            let row_b = b.row(y).ok_or(PrintMatchError::BufferTooSmall {
                needed: (y + 1) * b.stride(),
                got: b.as_slice().len(),
            })?;

            let mut run = WindowSums::default();
            let above = y * stride;
            let here = (y + 1) * stride;
            for x in 0..width {
                let va = u64::from(row_a[x]);
                let vb = u64::from(row_b[x]);
                run.a += va;
                run.b += vb;
                run.aa += va * va;
                run.bb += vb * vb;
                run.ab += va * vb;

                let dst = here + x + 1;
                let src = above + x + 1;
                out.a[dst] = out.a[src] + run.a;
                out.b[dst] = out.b[src] + run.b;
                out.aa[dst] = out.aa[src] + run.aa;
                out.bb[dst] = out.bb[src] + run.bb;
                out.ab[dst] = out.ab[src] + run.ab;
            }
        }

        Ok(out)
    }

    /// Returns the raster width in pixels.
    pub(crate) fn width(&self) -> usize {
        self.width
    }

    /// Returns the raster height in pixels.
    pub(crate) fn height(&self) -> usize {
        self.height
    }

    /// Returns exact sums over the `size x size` window with top-left `(x, y)`.
    ///
    /// The caller guarantees the window lies inside the raster.
    pub(crate) fn window(&self, x: usize, y: usize, size: usize) -> WindowSums {
        let top = y * self.stride;
        let bottom = (y + size) * self.stride;
        let left = x;
        let right = x + size;
        let rect = |table: &[u64]| {
            (table[bottom + right] - table[top + right]) - (table[bottom + left] - table[top + left])
        };
        WindowSums {
            a: rect(self.a.as_slice()),
            b: rect(self.b.as_slice()),
            aa: rect(self.aa.as_slice()),
            bb: rect(self.bb.as_slice()),
            ab: rect(self.ab.as_slice()),
        }
    }
}

/// Per-window constants derived from `SsimParams`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SsimConstants {
    size: usize,
    inv_n: f64,
    cov_norm: f64,
    c1: f64,
    c2: f64,
}

impl SsimConstants {
    pub(crate) fn new(params: &SsimParams) -> Self {
        let n = (params.window * params.window) as f64;
        let cov_norm = if params.sample_covariance {
            n / (n - 1.0)
        } else {
            1.0
        };
        let c1 = (params.k1 * params.data_range).powi(2);
        let c2 = (params.k2 * params.data_range).powi(2);
        Self {
            size: params.window,
            inv_n: 1.0 / n,
            cov_norm,
            c1,
            c2,
        }
    }

    /// Window side length.
    pub(crate) fn size(&self) -> usize {
        self.size
    }

    /// SSIM of a single window.
    ///
    /// Every product is arranged so that swapping `a` and `b` yields the same
    /// bits, and identical inputs give exactly `1.0`.
    pub(crate) fn ssim(&self, s: WindowSums) -> f64 {
        let ux = s.a as f64 * self.inv_n;
        let uy = s.b as f64 * self.inv_n;
        let uxx = s.aa as f64 * self.inv_n;
        let uyy = s.bb as f64 * self.inv_n;
        let uxy = s.ab as f64 * self.inv_n;

        let vx = self.cov_norm * (uxx - ux * ux);
        let vy = self.cov_norm * (uyy - uy * uy);
        let vxy = self.cov_norm * (uxy - ux * uy);

        let a1 = 2.0 * (ux * uy) + self.c1;
        let a2 = 2.0 * vxy + self.c2;
        let b1 = (ux * ux + uy * uy) + self.c1;
        let b2 = (vx + vy) + self.c2;

        (a1 * a2) / (b1 * b2)
    }

    /// Sum of window SSIM values along placement row `y`, left to right.
    pub(crate) fn row_sum(&self, integrals: &PairIntegrals, y: usize) -> f64 {
        let max_x = integrals.width() - self.size;
        let mut acc = 0.0f64;
        for x in 0..=max_x {
            acc += self.ssim(integrals.window(x, y, self.size));
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::{PairIntegrals, WindowSums};
    use crate::image::ImageView;
    use crate::util::PrintMatchError;

    #[test]
    fn window_sums_match_direct_sums() {
        let a: Vec<u8> = (0u8..20).collect();
        let b: Vec<u8> = (0u8..20).map(|v| 19 - v).collect();
        let va = ImageView::from_slice(&a, 5, 4).unwrap();
        let vb = ImageView::from_slice(&b, 5, 4).unwrap();
        let integrals = PairIntegrals::build(va, vb).unwrap();

        let mut expected = WindowSums::default();
        for y in 1..4 {
            for x in 2..5 {
                let pa = u64::from(a[y * 5 + x]);
                let pb = u64::from(b[y * 5 + x]);
                expected.a += pa;
                expected.b += pb;
                expected.aa += pa * pa;
                expected.bb += pb * pb;
                expected.ab += pa * pb;
            }
        }
        assert_eq!(integrals.window(2, 1, 3), expected);
    }

    #[test]
    fn mismatched_dimensions_are_rejected() {
        let a = [0u8; 6];
        let va = ImageView::from_slice(&a, 3, 2).unwrap();
        let vb = ImageView::from_slice(&a, 2, 3).unwrap();
        let err = PairIntegrals::build(va, vb).err().unwrap();
        assert_eq!(
            err,
            PrintMatchError::DimensionMismatch {
                left: (3, 2),
                right: (2, 3),
            }
        );
    }
}
