//! Scalar intensity fields derived from RGB images.

use crate::buffer::TextureBuffer;
use crate::error::{NormalMapError, Result};

/// Dense single-channel field with one value per source pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityField {
    /// Width in samples.
    pub width: u32,
    /// Height in samples.
    pub height: u32,
    /// Sample data (row-major), each in `[0, 1]`.
    pub data: Vec<f32>,
}

impl IntensityField {
    /// Create a field filled with a constant value.
    pub fn new(width: u32, height: u32, fill: f32) -> Self {
        Self {
            width,
            height,
            data: vec![fill; width as usize * height as usize],
        }
    }

    /// Get a sample at the given coordinates.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Set a sample at the given coordinates.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: f32) {
        let idx = y as usize * self.width as usize + x as usize;
        self.data[idx] = value;
    }

    /// Get a sample, clamping out-of-range coordinates to the nearest edge.
    #[inline]
    pub fn get_clamped(&self, x: i64, y: i64) -> f32 {
        let cx = clamp_index(x, self.width);
        let cy = clamp_index(y, self.height);
        self.get(cx, cy)
    }
}

/// Clamp a signed coordinate into `0..len`. `len` must be non-zero.
#[inline]
pub(crate) fn clamp_index(i: i64, len: u32) -> u32 {
    if i < 0 {
        0
    } else if i >= len as i64 {
        len - 1
    } else {
        i as u32
    }
}

/// Convert an image into an intensity field.
///
/// Each sample is the mean of the R, G and B channels scaled to `[0, 1]`;
/// with `invert` the sample is `1 - intensity`. Alpha is ignored.
pub fn extract_intensity(image: &TextureBuffer, invert: bool) -> Result<IntensityField> {
    if image.is_empty() {
        return Err(NormalMapError::invalid(format!(
            "image dimensions must be non-zero, got {}x{}",
            image.width, image.height
        )));
    }

    let data = image
        .data
        .iter()
        .map(|px| {
            let intensity = px.intensity() as f32;
            if invert {
                1.0 - intensity
            } else {
                intensity
            }
        })
        .collect();

    Ok(IntensityField {
        width: image.width,
        height: image.height,
        data,
    })
}
