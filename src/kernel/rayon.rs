//! Rayon-parallel SSIM kernel (feature-gated).
//!
//! Placement rows are scored in parallel and their sums are reduced in row
//! order, so the result matches `SsimScalar` exactly.

use crate::kernel::integral::{PairIntegrals, SsimConstants};
use crate::kernel::{Kernel, SsimParams};
use crate::util::PrintMatchResult;
use crate::ImageView;
use rayon::prelude::*;

/// Row-parallel SSIM kernel.
pub struct SsimRayon;

impl Kernel for SsimRayon {
    fn score(
        a: ImageView<'_, u8>,
        b: ImageView<'_, u8>,
        params: &SsimParams,
    ) -> PrintMatchResult<f64> {
        let integrals = PairIntegrals::build(a, b)?;
        params.validate(integrals.width(), integrals.height())?;
        let consts = SsimConstants::new(params);

        let rows = integrals.height() - consts.size() + 1;
        let cols = integrals.width() - consts.size() + 1;
        let row_sums: Vec<f64> = (0..rows)
            .into_par_iter()
            .map(|y| consts.row_sum(&integrals, y))
            .collect();

        let mut total = 0.0f64;
        for sum in row_sums {
            total += sum;
        }
        Ok(total / (rows * cols) as f64)
    }
}
