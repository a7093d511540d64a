#![cfg(feature = "rayon")]

use printmatch::kernel::rayon::SsimRayon;
use printmatch::kernel::scalar::SsimScalar;
use printmatch::{ImageDescriptor, ImageView, Kernel, MatchConfig, Matcher, SsimParams};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Cursor;

fn make_print(width: usize, height: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let value = ((x * 11) ^ (y * 3) ^ (x * y)) & 0xFF;
            data.push(value as u8);
        }
    }
    data
}

fn png_descriptor(data: Vec<u8>, width: u32, height: u32) -> ImageDescriptor {
    let img = image::GrayImage::from_raw(width, height, data).unwrap();
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
    ImageDescriptor::from_bytes(buf.into_inner())
}

#[test]
fn parallel_kernel_matches_scalar_bits() {
    let mut rng = StdRng::seed_from_u64(17);
    let width = 300;
    let height = 300;
    let a = make_print(width, height);
    let b: Vec<u8> = a
        .iter()
        .map(|&v| (v as i16 + rng.random_range(-30i16..=30)).clamp(0, 255) as u8)
        .collect();
    let va = ImageView::from_slice(&a, width, height).unwrap();
    let vb = ImageView::from_slice(&b, width, height).unwrap();

    let params = SsimParams::default();
    let seq = SsimScalar::score(va, vb, &params).unwrap();
    let par = SsimRayon::score(va, vb, &params).unwrap();
    assert_eq!(seq.to_bits(), par.to_bits());
}

#[test]
fn parallel_selection_matches_sequential() {
    let mut rng = StdRng::seed_from_u64(23);
    let print = make_print(300, 300);
    let query = png_descriptor(print.clone(), 300, 300);

    let mut candidates = Vec::new();
    for i in 0..8 {
        let data: Vec<u8> = match i % 4 {
            0 => (0..300 * 300).map(|_| rng.random_range(0..=255)).collect(),
            1 => print
                .iter()
                .map(|&v| (v as i16 + rng.random_range(-10i16..=10)).clamp(0, 255) as u8)
                .collect(),
            2 => print.clone(),
            _ => Vec::new(),
        };
        if data.is_empty() {
            candidates.push(ImageDescriptor::from_bytes(b"broken".to_vec()));
        } else {
            candidates.push(png_descriptor(data, 300, 300));
        }
    }

    let seq = Matcher::default().with_config(MatchConfig {
        parallel: false,
        ..MatchConfig::default()
    });
    let par = Matcher::default().with_config(MatchConfig {
        parallel: true,
        ..MatchConfig::default()
    });

    let seq_report = seq.select_best(&query, &candidates);
    let par_report = par.select_best(&query, &candidates);
    assert_eq!(seq_report, par_report);
    assert_eq!(seq_report.result.index(), Some(2));
    let failed: Vec<_> = seq_report.failures.iter().map(|f| f.index).collect();
    assert_eq!(failed, vec![3, 7]);
}

#[test]
fn single_candidate_batch_matches_sequential() {
    let mut rng = StdRng::seed_from_u64(31);
    let print = make_print(300, 300);
    let query = png_descriptor(print.clone(), 300, 300);
    let close: Vec<u8> = print
        .iter()
        .map(|&v| (v as i16 + rng.random_range(-12i16..=12)).clamp(0, 255) as u8)
        .collect();

    let seq = Matcher::default();
    let par = Matcher::default().with_config(MatchConfig {
        parallel: true,
        ..MatchConfig::default()
    });

    for candidate in [
        png_descriptor(close, 300, 300),
        png_descriptor(print.clone(), 300, 300),
        ImageDescriptor::from_bytes(b"broken".to_vec()),
    ] {
        let candidates = std::slice::from_ref(&candidate);
        assert_eq!(seq.select_best(&query, candidates), par.select_best(&query, candidates));
    }
}
