//! Per-frame sub-pixel translation.
//!
//! Frame `i` is shifted by `(dx, dy)`: `out(x, y) = in(x - dx, y - dy)`, read
//! with bilinear interpolation and zero outside the image. The transpose
//! scatters each pixel back onto the same four neighbours with the same
//! weights. That is the adjoint of the resampling matrix, not the inverse
//! shift, and it differs from the inverse shift near the borders and for
//! fractional offsets.
use crate::image::{ImageData, ImageF64};
use log::warn;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionShift {
    pub dx: f64,
    pub dy: f64,
}

impl MotionShift {
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }
}

/// Ordered motion estimates, one per observation frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MotionSequence {
    shifts: Vec<MotionShift>,
}

impl MotionSequence {
    pub fn new(shifts: Vec<MotionShift>) -> Self {
        Self { shifts }
    }

    pub fn push(&mut self, shift: MotionShift) {
        self.shifts.push(shift);
    }

    pub fn len(&self) -> usize {
        self.shifts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty()
    }

    /// Shift for `index`, or `None` past the end of the sequence.
    pub fn get(&self, index: usize) -> Option<MotionShift> {
        self.shifts.get(index).copied()
    }
}

/// Bilinear footprint of a sample at `(fx, fy)`: up to four pixel offsets
/// with their interpolation weights.
#[inline]
fn bilinear_taps(fx: f64, fy: f64) -> [(isize, isize, f64); 4] {
    let x0 = fx.floor();
    let y0 = fy.floor();
    let tx = fx - x0;
    let ty = fy - y0;
    let (x0, y0) = (x0 as isize, y0 as isize);
    [
        (x0, y0, (1.0 - tx) * (1.0 - ty)),
        (x0 + 1, y0, tx * (1.0 - ty)),
        (x0, y0 + 1, (1.0 - tx) * ty),
        (x0 + 1, y0 + 1, tx * ty),
    ]
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MotionModule {
    motion: MotionSequence,
}

impl MotionModule {
    pub fn new(motion: MotionSequence) -> Self {
        Self { motion }
    }

    pub fn motion(&self) -> &MotionSequence {
        &self.motion
    }

    fn shift_for(&self, index: usize) -> MotionShift {
        self.motion.get(index).unwrap_or_else(|| {
            warn!(
                "MotionModule: no motion estimate for frame {index} ({} known), assuming no motion",
                self.motion.len()
            );
            MotionShift::default()
        })
    }

    pub fn apply(&self, image: &mut ImageData, index: usize) {
        let shift = self.shift_for(index);
        if shift == MotionShift::default() {
            return;
        }
        image.map_channels(|plane| warp_gather(plane, shift));
    }

    pub fn apply_transpose(&self, image: &mut ImageData, index: usize) {
        let shift = self.shift_for(index);
        if shift == MotionShift::default() {
            return;
        }
        image.map_channels(|plane| warp_scatter(plane, shift));
    }
}

fn warp_gather(src: &ImageF64, shift: MotionShift) -> ImageF64 {
    let mut out = ImageF64::new(src.w, src.h);
    for y in 0..src.h {
        for x in 0..src.w {
            let fx = x as f64 - shift.dx;
            let fy = y as f64 - shift.dy;
            let value = bilinear_taps(fx, fy)
                .iter()
                .filter(|&&(_, _, w)| w != 0.0)
                .map(|&(sx, sy, w)| w * src.get_or_zero(sx, sy))
                .sum();
            out.set(x, y, value);
        }
    }
    out
}

fn warp_scatter(src: &ImageF64, shift: MotionShift) -> ImageF64 {
    let mut out = ImageF64::new(src.w, src.h);
    let (w, h) = (src.w as isize, src.h as isize);
    for y in 0..src.h {
        for x in 0..src.w {
            let value = src.get(x, y);
            if value == 0.0 {
                continue;
            }
            let fx = x as f64 - shift.dx;
            let fy = y as f64 - shift.dy;
            for (tx, ty, weight) in bilinear_taps(fx, fy) {
                if weight != 0.0 && (0..w).contains(&tx) && (0..h).contains(&ty) {
                    out.add(tx as usize, ty as usize, weight * value);
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ImageSize;

    #[test]
    fn integer_shift_moves_content() {
        let module = MotionModule::new(MotionSequence::new(vec![MotionShift::new(1.0, 0.0)]));
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let mut image = ImageData::from_raw(&data, ImageSize::new(3, 2), 1).unwrap();
        module.apply(&mut image, 0);
        assert_eq!(image.to_vec(), vec![0.0, 1.0, 2.0, 0.0, 4.0, 5.0]);
    }

    #[test]
    fn missing_frame_means_no_motion() {
        let module = MotionModule::new(MotionSequence::new(vec![MotionShift::new(0.5, 0.5)]));
        let data = vec![1.0, 2.0, 3.0, 4.0];
        let mut image = ImageData::from_raw(&data, ImageSize::new(2, 2), 1).unwrap();
        module.apply(&mut image, 5);
        assert_eq!(image.to_vec(), data);
    }

    #[test]
    fn sequence_parses_from_json_list() {
        let seq: MotionSequence =
            serde_json::from_str(r#"[{"dx": 0.5, "dy": -1.0}, {"dx": 0.0, "dy": 2.0}]"#)
                .expect("valid json");
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.get(1), Some(MotionShift::new(0.0, 2.0)));
    }
}
