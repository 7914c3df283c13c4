use crate::types::ImageSize;

/// Read access to a single-channel, row-major image plane.
pub trait ImageView {
    type Pixel: Copy;

    fn width(&self) -> usize;
    fn height(&self) -> usize;

    fn row(&self, y: usize) -> &[Self::Pixel];

    fn size(&self) -> ImageSize {
        ImageSize::new(self.width(), self.height())
    }

    /// Contiguous row-major pixels, `width * height` long.
    fn as_slice(&self) -> &[Self::Pixel];
}

pub trait ImageViewMut: ImageView {
    fn row_mut(&mut self, y: usize) -> &mut [Self::Pixel];

    fn as_mut_slice(&mut self) -> &mut [Self::Pixel];
}
