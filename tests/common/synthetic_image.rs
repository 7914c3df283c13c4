#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use super_resolution::{ImageData, ImageSize};

/// Image with uniformly random pixels in `[0, 255)`, reproducible from `seed`.
pub fn random_image(size: ImageSize, channels: usize, seed: u64) -> ImageData {
    let mut rng = StdRng::seed_from_u64(seed);
    let data: Vec<f64> = (0..size.pixel_count() * channels)
        .map(|_| rng.gen_range(0.0..255.0))
        .collect();
    ImageData::from_raw(&data, size, channels).expect("buffer sized from image size")
}

/// Smooth diagonal ramp with a checkerboard overlay.
pub fn textured_image(size: ImageSize, cell: usize) -> ImageData {
    assert!(cell > 0, "cell size must be positive");
    let mut data = Vec::with_capacity(size.pixel_count());
    for y in 0..size.height {
        for x in 0..size.width {
            let ramp = 4.0 * (x + y) as f64;
            let check = if ((x / cell) + (y / cell)) % 2 == 0 { 40.0 } else { 180.0 };
            data.push(ramp + check);
        }
    }
    ImageData::from_raw(&data, size, 1).expect("buffer sized from image size")
}

pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len(), "dot product of different lengths");
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
