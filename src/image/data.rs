//! Multi-channel image buffer shared by the degradation operators and the
//! objective terms.
//!
//! Channels are stored as separate [`ImageF64`] planes of identical size.
//! Flat buffers exchanged with solvers are channel-major: all pixels of
//! channel 0 (row-major), then channel 1, and so on.
use super::f64::ImageF64;
use super::resize::{resize_plane, Interpolation};
use super::traits::{ImageView, ImageViewMut};
use crate::error::ModelError;
use crate::types::ImageSize;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImageData {
    size: ImageSize,
    channels: Vec<ImageF64>,
}

impl ImageData {
    /// Empty buffer; the first [`add_channel`](Self::add_channel) fixes the size.
    ///
    /// This is only a builder state: operators and objective terms expect at
    /// least one channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero-filled buffer with `num_channels` planes of `size`.
    ///
    /// Panics when `num_channels` is 0.
    pub fn zeros(size: ImageSize, num_channels: usize) -> Self {
        assert!(num_channels > 0, "image data needs at least one channel");
        Self {
            size,
            channels: vec![ImageF64::zeros(size); num_channels],
        }
    }

    /// Copy a channel-major flat buffer into `num_channels` planes of `size`.
    pub fn from_raw(data: &[f64], size: ImageSize, num_channels: usize) -> Result<Self, ModelError> {
        if num_channels == 0 {
            return Err(ModelError::NoChannels);
        }
        let num_pixels = size.pixel_count();
        let expected = num_pixels * num_channels;
        if data.len() != expected {
            return Err(ModelError::DataLength {
                expected,
                actual: data.len(),
            });
        }
        let channels = if num_pixels == 0 {
            vec![ImageF64::zeros(size); num_channels]
        } else {
            data.chunks_exact(num_pixels)
                .map(|chunk| ImageF64 {
                    w: size.width,
                    h: size.height,
                    data: chunk.to_vec(),
                })
                .collect()
        };
        Ok(Self { size, channels })
    }

    pub fn from_channel(channel: ImageF64) -> Self {
        Self {
            size: channel.size(),
            channels: vec![channel],
        }
    }

    pub fn from_channels(channels: Vec<ImageF64>) -> Result<Self, ModelError> {
        if channels.is_empty() {
            return Err(ModelError::NoChannels);
        }
        let mut image = Self::new();
        for channel in channels {
            image.add_channel(channel)?;
        }
        Ok(image)
    }

    /// Append a plane. It must match the size of the planes already present.
    pub fn add_channel(&mut self, channel: ImageF64) -> Result<(), ModelError> {
        if self.channels.is_empty() {
            self.size = channel.size();
        } else if channel.size() != self.size {
            return Err(ModelError::ChannelSize {
                expected: self.size,
                actual: channel.size(),
            });
        }
        self.channels.push(channel);
        Ok(())
    }

    /// Replace plane `index` with a plane of the same size.
    pub fn set_channel(&mut self, index: usize, channel: ImageF64) -> Result<(), ModelError> {
        if channel.size() != self.size {
            return Err(ModelError::ChannelSize {
                expected: self.size,
                actual: channel.size(),
            });
        }
        self.channels[index] = channel;
        Ok(())
    }

    #[inline]
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    #[inline]
    pub fn size(&self) -> ImageSize {
        self.size
    }

    #[inline]
    pub fn num_pixels(&self) -> usize {
        self.size.pixel_count()
    }

    pub fn channel(&self, index: usize) -> &ImageF64 {
        &self.channels[index]
    }

    pub fn channel_mut(&mut self, index: usize) -> &mut ImageF64 {
        &mut self.channels[index]
    }

    pub fn channel_data(&self, index: usize) -> &[f64] {
        self.channels[index].as_slice()
    }

    pub fn channel_data_mut(&mut self, index: usize) -> &mut [f64] {
        self.channels[index].as_mut_slice()
    }

    pub fn channels(&self) -> &[ImageF64] {
        &self.channels
    }

    pub fn channels_mut(&mut self) -> &mut [ImageF64] {
        &mut self.channels
    }

    /// Flatten into a channel-major buffer.
    pub fn to_vec(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.num_pixels() * self.num_channels());
        for channel in &self.channels {
            out.extend_from_slice(channel.as_slice());
        }
        out
    }

    /// Replace every plane with `f(plane)`. All results must share one size,
    /// which becomes the new size of the buffer.
    pub fn map_channels<F>(&mut self, mut f: F)
    where
        F: FnMut(&ImageF64) -> ImageF64,
    {
        let mapped: Vec<ImageF64> = self.channels.iter().map(&mut f).collect();
        if let Some(first) = mapped.first() {
            let size = first.size();
            assert!(
                mapped.iter().all(|c| c.size() == size),
                "channel transform produced planes of different sizes"
            );
            self.size = size;
        }
        self.channels = mapped;
    }

    /// Resample every channel to `size`.
    pub fn resize(&mut self, size: ImageSize, interpolation: Interpolation) {
        if size == self.size {
            return;
        }
        self.map_channels(|plane| resize_plane(plane, size, interpolation));
        self.size = size;
    }

    /// Resample every channel by a uniform scale factor (rounded to whole pixels).
    pub fn resize_by_scale(&mut self, scale: f64, interpolation: Interpolation) {
        let size = ImageSize::new(
            (self.size.width as f64 * scale).round() as usize,
            (self.size.height as f64 * scale).round() as usize,
        );
        self.resize(size, interpolation);
    }

    /// Add `factor * other` pixel-wise. Both buffers must have the same shape.
    pub fn add_scaled(&mut self, other: &ImageData, factor: f64) {
        assert_eq!(self.size, other.size, "image sizes differ");
        assert_eq!(
            self.num_channels(),
            other.num_channels(),
            "channel counts differ"
        );
        for (dst, src) in self.channels.iter_mut().zip(&other.channels) {
            for (d, s) in dst.data.iter_mut().zip(&src.data) {
                *d += factor * s;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_splits_channel_major() {
        let data: Vec<f64> = (0..12).map(f64::from).collect();
        let image = ImageData::from_raw(&data, ImageSize::new(3, 2), 2).expect("valid");
        assert_eq!(image.num_channels(), 2);
        assert_eq!(image.channel_data(0), &data[..6]);
        assert_eq!(image.channel_data(1), &data[6..]);
        assert_eq!(image.to_vec(), data);
    }

    #[test]
    fn from_raw_rejects_wrong_length() {
        let err = ImageData::from_raw(&[1.0; 5], ImageSize::new(3, 2), 1).unwrap_err();
        assert_eq!(
            err,
            ModelError::DataLength {
                expected: 6,
                actual: 5
            }
        );
    }

    #[test]
    fn zero_channel_buffers_are_rejected() {
        let size = ImageSize::new(3, 2);
        assert_eq!(
            ImageData::from_raw(&[], size, 0).unwrap_err(),
            ModelError::NoChannels
        );
        assert_eq!(
            ImageData::from_channels(Vec::new()).unwrap_err(),
            ModelError::NoChannels
        );
    }

    #[test]
    #[should_panic(expected = "at least one channel")]
    fn zeros_without_channels_panics() {
        let _ = ImageData::zeros(ImageSize::new(3, 2), 0);
    }

    #[test]
    fn add_channel_enforces_common_size() {
        let mut image = ImageData::new();
        image.add_channel(ImageF64::new(4, 4)).unwrap();
        assert!(image.add_channel(ImageF64::new(4, 3)).is_err());
        assert_eq!(image.num_channels(), 1);
        assert_eq!(image.size(), ImageSize::new(4, 4));
    }

    #[test]
    fn resize_by_scale_updates_all_channels() {
        let mut image = ImageData::zeros(ImageSize::new(8, 6), 3);
        image.resize_by_scale(0.5, Interpolation::Nearest);
        assert_eq!(image.size(), ImageSize::new(4, 3));
        assert!(image.channels().iter().all(|c| c.w == 4 && c.h == 3));
    }
}
