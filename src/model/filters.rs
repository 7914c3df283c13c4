//! Separable filters used by the PSF blur operator.
//!
//! Filtering is a correlation with zero padding outside the image, done as a
//! horizontal pass followed by a vertical pass. With symmetric taps the
//! resulting linear map is a symmetric matrix, so the same routine serves as
//! both the forward blur and its adjoint.
use crate::image::{ImageF64, ImageView, ImageViewMut};

/// Trait implemented by separable 1D filters.
pub trait SeparableFilter {
    /// Return the 1D taps (in left-to-right order). Odd length, centred.
    fn taps(&self) -> &[f64];

    fn radius(&self) -> usize {
        self.taps().len() / 2
    }

    /// True when `taps[r + d] == taps[r - d]` for every offset.
    fn is_symmetric(&self) -> bool {
        let taps = self.taps();
        taps.iter().eq(taps.iter().rev())
    }
}

/// Normalised sampled Gaussian with `size` taps.
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianFilter {
    taps: Vec<f64>,
}

impl GaussianFilter {
    /// Build taps `exp(-(i - r)^2 / (2 sigma^2))` normalised to unit sum.
    ///
    /// Callers validate `size` (odd, >= 1) and `sigma` (> 0).
    pub fn new(size: usize, sigma: f64) -> Self {
        let radius = (size / 2) as f64;
        let denom = 2.0 * sigma * sigma;
        let mut taps: Vec<f64> = (0..size)
            .map(|i| {
                let d = i as f64 - radius;
                (-(d * d) / denom).exp()
            })
            .collect();
        let sum: f64 = taps.iter().sum();
        for t in &mut taps {
            *t /= sum;
        }
        Self { taps }
    }
}

impl SeparableFilter for GaussianFilter {
    #[inline]
    fn taps(&self) -> &[f64] {
        &self.taps
    }
}

/// Filter `src` with `filter` along both axes, treating out-of-image samples as 0.
pub fn apply_zero_padded(filter: &dyn SeparableFilter, src: &ImageF64) -> ImageF64 {
    let taps = filter.taps();
    if taps.len() <= 1 || src.w == 0 || src.h == 0 {
        let gain = taps.first().copied().unwrap_or(1.0);
        let mut out = src.clone();
        out.as_mut_slice().iter_mut().for_each(|v| *v *= gain);
        return out;
    }
    let radius = filter.radius() as isize;

    let mut horiz = ImageF64::new(src.w, src.h);
    for y in 0..src.h {
        let src_row = src.row(y);
        let dst_row = horiz.row_mut(y);
        filter_row(src_row, dst_row, taps, radius);
    }

    let mut out = ImageF64::new(src.w, src.h);
    for y in 0..src.h {
        let dst_row = out.row_mut(y);
        for (k, &tap) in taps.iter().enumerate() {
            let sy = y as isize + k as isize - radius;
            if sy < 0 || sy as usize >= src.h {
                continue;
            }
            let src_row = horiz.row(sy as usize);
            for (d, &s) in dst_row.iter_mut().zip(src_row) {
                *d += tap * s;
            }
        }
    }
    out
}

fn filter_row(row: &[f64], out: &mut [f64], taps: &[f64], radius: isize) {
    let len = row.len() as isize;
    for (x, dst_px) in out.iter_mut().enumerate() {
        let mut acc = 0.0;
        for (k, &tap) in taps.iter().enumerate() {
            let sx = x as isize + k as isize - radius;
            if (0..len).contains(&sx) {
                acc += tap * row[sx as usize];
            }
        }
        *dst_px = acc;
    }
}
