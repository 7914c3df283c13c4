use serde::{Deserialize, Serialize};

/// Spatial extent of an image plane in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: usize,
    pub height: usize,
}

impl ImageSize {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Number of pixels in one channel of this size.
    #[inline]
    pub const fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Size after integer decimation, truncating partial blocks.
    pub const fn decimated(&self, scale: usize) -> Self {
        Self {
            width: self.width / scale,
            height: self.height / scale,
        }
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
