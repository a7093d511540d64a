//! Scalar reference SSIM kernel.

use crate::kernel::integral::{PairIntegrals, SsimConstants};
use crate::kernel::{Kernel, SsimParams};
use crate::util::PrintMatchResult;
use crate::ImageView;

/// Single-threaded SSIM kernel.
pub struct SsimScalar;

impl Kernel for SsimScalar {
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
        let mut total = 0.0f64;
        for y in 0..rows {
            total += consts.row_sum(&integrals, y);
        }
        Ok(total / (rows * cols) as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::SsimScalar;
    use crate::kernel::{Kernel, SsimParams};
    use crate::util::PrintMatchError;
    use crate::ImageView;

    fn ramp(width: usize, height: usize) -> Vec<u8> {
        (0..width * height)
            .map(|i| ((i % width) * 7 + (i / width) * 3) as u8)
            .collect()
    }

    #[test]
    fn identical_images_score_one() {
        let data = ramp(16, 12);
        let view = ImageView::from_slice(&data, 16, 12).unwrap();
        let score = SsimScalar::score(view, view, &SsimParams::default()).unwrap();
        assert_eq!(score, 1.0);
    }

    #[test]
    fn inverted_image_scores_negative() {
        let data = ramp(16, 16);
        let inverted: Vec<u8> = data.iter().map(|&v| 255 - v).collect();
        let a = ImageView::from_slice(&data, 16, 16).unwrap();
        let b = ImageView::from_slice(&inverted, 16, 16).unwrap();
        let score = SsimScalar::score(a, b, &SsimParams::default()).unwrap();
        assert!(score < 0.0, "score {score}");
        assert!(score >= -1.0);
    }

    #[test]
    fn constant_images_with_equal_level_score_one() {
        let data = vec![128u8; 9 * 9];
        let view = ImageView::from_slice(&data, 9, 9).unwrap();
        let score = SsimScalar::score(view, view, &SsimParams::default()).unwrap();
        assert_eq!(score, 1.0);
    }

    #[test]
    fn window_larger_than_image_is_rejected() {
        let data = vec![0u8; 5 * 5];
        let view = ImageView::from_slice(&data, 5, 5).unwrap();
        let err = SsimScalar::score(view, view, &SsimParams::default()).unwrap_err();
        assert_eq!(
            err,
            PrintMatchError::InvalidConfig("window larger than the image")
        );
    }

    #[test]
    fn even_window_is_rejected() {
        let data = vec![0u8; 16];
        let view = ImageView::from_slice(&data, 4, 4).unwrap();
        let params = SsimParams {
            window: 4,
            ..SsimParams::default()
        };
        assert!(SsimScalar::score(view, view, &params).is_err());
    }
}
