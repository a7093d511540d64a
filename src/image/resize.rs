//! Deterministic bilinear resampling for grayscale `u8` images.

use crate::image::{ImageView, OwnedImage};
use crate::util::{PrintMatchError, PrintMatchResult};

/// Resizes a grayscale image to `dst_width x dst_height` with bilinear sampling.
///
/// Pixel centers are aligned: destination pixel `x` samples the source at
/// `(x + 0.5) * src_width / dst_width - 0.5`, clamped to the valid range.
/// Interpolated values are rounded to nearest before clamping to `[0, 255]`.
/// Resizing to the source size returns an identical raster.
pub fn resize_u8_bilinear(
    src: ImageView<'_, u8>,
    dst_width: usize,
    dst_height: usize,
) -> PrintMatchResult<OwnedImage> {
    let len = dst_width
        .checked_mul(dst_height)
        .filter(|&len| len > 0)
        .ok_or(PrintMatchError::InvalidDimensions {
            width: dst_width,
            height: dst_height,
        })?;

    let src_width = src.width();
    let src_height = src.height();
    let xs = sample_axis(src_width, dst_width);
    let ys = sample_axis(src_height, dst_height);

    let mut out = Vec::with_capacity(len);
    for &(y0, y1, fy) in &ys {
        let row0 = src.row(y0).ok_or(PrintMatchError::BufferTooSmall {
            needed: (y0 + 1) * src.stride(),
            got: src.as_slice().len(),
        })?;
        let row1 = src.row(y1).ok_or(PrintMatchError::BufferTooSmall {
            needed: (y1 + 1) * src.stride(),
            got: src.as_slice().len(),
        })?;
        for &(x0, x1, fx) in &xs {
            let a = row0[x0] as f32;
            let b = row0[x1] as f32;
            let c = row1[x0] as f32;
            let d = row1[x1] as f32;

            let w00 = (1.0 - fx) * (1.0 - fy);
            let w10 = fx * (1.0 - fy);
            let w01 = (1.0 - fx) * fy;
            let w11 = fx * fy;
            let value = a * w00 + b * w10 + c * w01 + d * w11;

            out.push(value.round().clamp(0.0, 255.0) as u8);
        }
    }

    OwnedImage::new(out, dst_width, dst_height)
}

/// Precomputes `(i0, i1, frac)` source taps for every destination index.
fn sample_axis(src_len: usize, dst_len: usize) -> Vec<(usize, usize, f32)> {
    let scale = src_len as f64 / dst_len as f64;
    let max = src_len - 1;
    (0..dst_len)
        .map(|i| {
            let pos = ((i as f64 + 0.5) * scale - 0.5).clamp(0.0, max as f64);
            let i0 = pos.floor() as usize;
            let i1 = (i0 + 1).min(max);
            (i0, i1, (pos - i0 as f64) as f32)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::resize_u8_bilinear;
    use crate::image::ImageView;

    #[test]
    fn same_size_is_identity() {
        let data: Vec<u8> = (0u8..64).map(|v| v.wrapping_mul(37)).collect();
        let view = ImageView::from_slice(&data, 8, 8).unwrap();
        let out = resize_u8_bilinear(view, 8, 8).unwrap();
        assert_eq!(out.data(), data.as_slice());
    }

    #[test]
    fn upscale_interpolates_between_neighbors() {
        let data = [0u8, 100];
        let view = ImageView::from_slice(&data, 2, 1).unwrap();
        let out = resize_u8_bilinear(view, 4, 1).unwrap();
        assert_eq!(out.data(), &[0u8, 25, 75, 100]);
    }

    #[test]
    fn constant_image_stays_constant() {
        let data = vec![42u8; 5 * 3];
        let view = ImageView::from_slice(&data, 5, 3).unwrap();
        let out = resize_u8_bilinear(view, 300, 300).unwrap();
        assert_eq!(out.width(), 300);
        assert_eq!(out.height(), 300);
        assert!(out.data().iter().all(|&v| v == 42));
    }

    #[test]
    fn zero_target_is_rejected() {
        let data = [1u8; 4];
        let view = ImageView::from_slice(&data, 2, 2).unwrap();
        assert!(resize_u8_bilinear(view, 0, 4).is_err());
    }
}
