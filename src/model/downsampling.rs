use crate::error::ModelError;
use crate::image::{ImageData, ImageF64, ImageView};
use crate::types::ImageSize;

/// Integer decimation keeping the top-left sample of every `scale × scale`
/// block.
///
/// Forward output is `(w / scale, h / scale)`; partial blocks on the right and
/// bottom are dropped. The transpose zero-fills back to the forward input size,
/// so the dropped border receives zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DownsamplingModule {
    scale: usize,
}

impl DownsamplingModule {
    pub fn new(scale: usize) -> Result<Self, ModelError> {
        if scale == 0 {
            return Err(ModelError::InvalidScale(scale));
        }
        Ok(Self { scale })
    }

    pub fn scale(&self) -> usize {
        self.scale
    }

    pub fn output_size(&self, input_size: ImageSize) -> ImageSize {
        input_size.decimated(self.scale)
    }

    pub fn apply(&self, image: &mut ImageData) {
        if self.scale == 1 {
            return;
        }
        let out_size = self.output_size(image.size());
        let scale = self.scale;
        image.map_channels(|plane| {
            let mut out = ImageF64::zeros(out_size);
            for y in 0..out.h {
                let src_row = plane.row(y * scale);
                for x in 0..out.w {
                    out.set(x, y, src_row[x * scale]);
                }
            }
            out
        });
    }

    /// Scatter every sample back to `(x * scale, y * scale)` in a zero image of
    /// `input_size`.
    pub fn apply_transpose(&self, image: &mut ImageData, input_size: ImageSize) {
        if self.scale == 1 && image.size() == input_size {
            return;
        }
        let scale = self.scale;
        image.map_channels(|plane| {
            let mut out = ImageF64::zeros(input_size);
            for y in 0..plane.h {
                let hy = y * scale;
                if hy >= input_size.height {
                    break;
                }
                for x in 0..plane.w {
                    let hx = x * scale;
                    if hx >= input_size.width {
                        break;
                    }
                    out.set(hx, hy, plane.get(x, y));
                }
            }
            out
        });
    }
}
