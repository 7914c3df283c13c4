//! Plane resampling policies.
//!
//! - `Nearest`: output pixel `x` reads source pixel `x * src_w / dst_w`
//!   (floor). For integer downscales this is exactly the decimation selection
//!   `(x * scale, y * scale)`.
//! - `Additive`: the transpose of `Nearest` taken in the opposite direction.
//!   Each source pixel `x` is added into destination pixel `x * dst_w / src_w`
//!   and every other destination pixel stays zero. An integer upscale is
//!   therefore zero-fill upsampling.
//! - `Linear`: bilinear interpolation on pixel centres with clamped borders.
//!   Only meant for producing initial estimates, it has no adjoint partner.
use super::f64::ImageF64;
use super::traits::{ImageView, ImageViewMut};
use crate::types::ImageSize;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    Nearest,
    Linear,
    Additive,
}

/// Resample `src` to `size` with the given policy.
pub fn resize_plane(src: &ImageF64, size: ImageSize, interpolation: Interpolation) -> ImageF64 {
    if src.size() == size {
        return src.clone();
    }
    let mut dst = ImageF64::zeros(size);
    if size.is_empty() || src.w == 0 || src.h == 0 {
        return dst;
    }
    match interpolation {
        Interpolation::Nearest => resize_nearest(src, &mut dst),
        Interpolation::Additive => resize_additive(src, &mut dst),
        Interpolation::Linear => resize_linear(src, &mut dst),
    }
    dst
}

#[inline]
fn nearest_index(dst_index: usize, src_len: usize, dst_len: usize) -> usize {
    (dst_index * src_len / dst_len).min(src_len - 1)
}

fn resize_nearest(src: &ImageF64, dst: &mut ImageF64) {
    let xs: Vec<usize> = (0..dst.w).map(|x| nearest_index(x, src.w, dst.w)).collect();
    for y in 0..dst.h {
        let src_row = src.row(nearest_index(y, src.h, dst.h));
        let dst_row = dst.row_mut(y);
        for (dst_px, &sx) in dst_row.iter_mut().zip(&xs) {
            *dst_px = src_row[sx];
        }
    }
}

fn resize_additive(src: &ImageF64, dst: &mut ImageF64) {
    let xs: Vec<usize> = (0..src.w).map(|x| nearest_index(x, dst.w, src.w)).collect();
    for y in 0..src.h {
        let dy = nearest_index(y, dst.h, src.h);
        let src_row = src.row(y);
        let dst_row = dst.row_mut(dy);
        for (&value, &dx) in src_row.iter().zip(&xs) {
            dst_row[dx] += value;
        }
    }
}

fn resize_linear(src: &ImageF64, dst: &mut ImageF64) {
    let sx_ratio = src.w as f64 / dst.w as f64;
    let sy_ratio = src.h as f64 / dst.h as f64;
    let max_x = (src.w - 1) as f64;
    let max_y = (src.h - 1) as f64;
    for y in 0..dst.h {
        let fy = ((y as f64 + 0.5) * sy_ratio - 0.5).clamp(0.0, max_y);
        let y0 = fy.floor() as usize;
        let y1 = (y0 + 1).min(src.h - 1);
        let ty = fy - y0 as f64;
        for x in 0..dst.w {
            let fx = ((x as f64 + 0.5) * sx_ratio - 0.5).clamp(0.0, max_x);
            let x0 = fx.floor() as usize;
            let x1 = (x0 + 1).min(src.w - 1);
            let tx = fx - x0 as f64;
            let top = src.get(x0, y0) * (1.0 - tx) + src.get(x1, y0) * tx;
            let bottom = src.get(x0, y1) * (1.0 - tx) + src.get(x1, y1) * tx;
            dst.set(x, y, top * (1.0 - ty) + bottom * ty);
        }
    }
}
