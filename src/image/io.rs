//! I/O helpers for observation images and JSON reports.
//!
//! - `load_image`: read a PNG/JPEG/etc. into an `ImageData` (1 or 3 channels,
//!   values in 0–255).
//! - `save_image`: write a 1- or 3-channel `ImageData` to disk, clamping to
//!   0–255.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{ImageData, ImageF64};
use image::{GrayImage, Luma, Rgb, RgbImage};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk. `grayscale` collapses colour inputs to luma.
pub fn load_image(path: &Path, grayscale: bool) -> Result<ImageData, String> {
    let img = image::open(path).map_err(|e| format!("Failed to open {}: {e}", path.display()))?;
    let width = img.width() as usize;
    let height = img.height() as usize;

    let planes = if grayscale {
        let gray = img.into_luma8();
        let data = gray.into_raw().into_iter().map(f64::from).collect();
        vec![to_plane(width, height, data)?]
    } else {
        let rgb = img.into_rgb8();
        let mut planes = vec![Vec::with_capacity(width * height); 3];
        for px in rgb.pixels() {
            for (plane, &v) in planes.iter_mut().zip(px.0.iter()) {
                plane.push(f64::from(v));
            }
        }
        planes
            .into_iter()
            .map(|data| to_plane(width, height, data))
            .collect::<Result<Vec<_>, _>>()?
    };

    ImageData::from_channels(planes).map_err(|e| format!("Failed to assemble {}: {e}", path.display()))
}

/// Save a 1-channel (gray) or 3-channel (RGB) image, clamping values to [0, 255].
pub fn save_image(image: &ImageData, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let size = image.size();
    let (w, h) = (size.width as u32, size.height as u32);
    let result = match image.num_channels() {
        1 => {
            let mut out = GrayImage::new(w, h);
            let plane = image.channel(0);
            for (x, y, px) in out.enumerate_pixels_mut() {
                *px = Luma([to_u8(plane.get(x as usize, y as usize))]);
            }
            out.save(path)
        }
        3 => {
            let mut out = RgbImage::new(w, h);
            for (x, y, px) in out.enumerate_pixels_mut() {
                let (x, y) = (x as usize, y as usize);
                *px = Rgb([
                    to_u8(image.channel(0).get(x, y)),
                    to_u8(image.channel(1).get(x, y)),
                    to_u8(image.channel(2).get(x, y)),
                ]);
            }
            out.save(path)
        }
        n => {
            return Err(format!(
                "Cannot save {} with {n} channels (expected 1 or 3)",
                path.display()
            ))
        }
    };
    result.map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn to_plane(width: usize, height: usize, data: Vec<f64>) -> Result<ImageF64, String> {
    ImageF64::from_vec(width, height, data)
        .ok_or_else(|| format!("Decoded pixel count does not match {width}x{height}"))
}

#[inline]
fn to_u8(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
