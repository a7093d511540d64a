//! Decoding of encoded image containers via the `image` crate.

use crate::image::OwnedImage;
use crate::util::DecodeError;
use image::{ImageDecoder, ImageReader};
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// Reads the raw bytes of an encoded image from disk.
///
/// The returned error names the path so a caller can tell which input failed.
pub fn read_image_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, DecodeError> {
    let path = path.as_ref();
    fs::read(path).map_err(|err| DecodeError::Unreadable {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

/// BT.601 luma in 14-bit fixed point, rounded to nearest.
fn luma_bt601(r: u8, g: u8, b: u8) -> u8 {
    let sum = u32::from(r) * 4899 + u32::from(g) * 9617 + u32::from(b) * 1868;
    ((sum + (1 << 13)) >> 14) as u8
}

/// Creates an owned grayscale image from a dynamic image.
///
/// Single-channel input passes through; colour input is reduced with BT.601
/// weights and alpha is ignored.
pub fn owned_from_dynamic_image(img: &image::DynamicImage) -> Result<OwnedImage, DecodeError> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    let data = match img {
        image::DynamicImage::ImageLuma8(gray) => gray.as_raw().clone(),
        image::DynamicImage::ImageLumaA8(_)
        | image::DynamicImage::ImageLuma16(_)
        | image::DynamicImage::ImageLumaA16(_) => img.to_luma8().into_raw(),
        _ => img
            .to_rgb8()
            .pixels()
            .map(|p| luma_bt601(p[0], p[1], p[2]))
            .collect(),
    };
    OwnedImage::new(data, width, height).map_err(|_| DecodeError::Empty)
}

/// Decodes a PNG/JPEG/BMP byte buffer into a grayscale owned image.
///
/// The container format is sniffed from the leading bytes. An EXIF
/// orientation tag, if present, is applied before the grayscale conversion.
pub fn decode_gray_bytes(bytes: &[u8]) -> Result<OwnedImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }
    let format_err = |err: image::ImageError| DecodeError::Format {
        reason: err.to_string(),
    };
    let mut decoder = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|err| DecodeError::Format {
            reason: err.to_string(),
        })?
        .into_decoder()
        .map_err(format_err)?;
    let orientation = decoder.orientation().map_err(format_err)?;
    let mut img = image::DynamicImage::from_decoder(decoder).map_err(format_err)?;
    if img.width() == 0 || img.height() == 0 {
        return Err(DecodeError::Empty);
    }
    img.apply_orientation(orientation);
    owned_from_dynamic_image(&img)
}
