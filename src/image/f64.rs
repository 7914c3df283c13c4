//! Owned single-channel f64 plane in row-major layout.
//!
//! One plane per spectral channel of an [`ImageData`](super::ImageData).
//! Pixel values follow the 0–255 intensity scale used by the degradation
//! operators.
use super::traits::{ImageView, ImageViewMut};
use crate::types::ImageSize;

#[derive(Clone, Debug, PartialEq)]
pub struct ImageF64 {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Backing storage in row-major order, `w * h` long
    pub data: Vec<f64>,
}

impl ImageF64 {
    /// Construct a zero-initialized plane of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![0.0; w * h],
        }
    }

    pub fn zeros(size: ImageSize) -> Self {
        Self::new(size.width, size.height)
    }

    /// Wrap an existing row-major buffer. Returns `None` on a length mismatch.
    pub fn from_vec(w: usize, h: usize, data: Vec<f64>) -> Option<Self> {
        (data.len() == w * h).then_some(Self { w, h, data })
    }

    pub fn from_slice(w: usize, h: usize, data: &[f64]) -> Option<Self> {
        Self::from_vec(w, h, data.to_vec())
    }

    #[inline]
    /// Convert (x, y) to a linear index into `data`.
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.data[self.idx(x, y)]
    }
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: f64) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }
    #[inline]
    pub fn add(&mut self, x: usize, y: usize, v: f64) {
        let i = self.idx(x, y);
        self.data[i] += v;
    }

    /// Value at signed coordinates, zero outside the plane.
    #[inline]
    pub fn get_or_zero(&self, x: isize, y: isize) -> f64 {
        if x < 0 || y < 0 || x as usize >= self.w || y as usize >= self.h {
            0.0
        } else {
            self.data[y as usize * self.w + x as usize]
        }
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }
}

impl ImageView for ImageF64 {
    type Pixel = f64;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn row(&self, y: usize) -> &[f64] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }
    #[inline]
    fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

impl ImageViewMut for ImageF64 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [f64] {
        let start = y * self.w;
        let end = start + self.w;
        &mut self.data[start..end]
    }
    #[inline]
    fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }
}
