//! Pixel buffers: source images and encoded normal maps.

use crate::color::{decode_component, Rgba};
use crate::error::{NormalMapError, Result};
use crate::math::Vector3;

/// A 2D RGBA8 image buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureBuffer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel data (row-major).
    pub data: Vec<Rgba>,
}

impl TextureBuffer {
    /// Create a new texture buffer filled with a color.
    pub fn new(width: u32, height: u32, fill: Rgba) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            data: vec![fill; size],
        }
    }

    /// Build a buffer from a function of the pixel coordinates.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Rgba) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Build a buffer from tightly packed 8-bit RGBA bytes.
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if bytes.len() != expected {
            return Err(NormalMapError::invalid(format!(
                "expected {} bytes for {}x{} RGBA, got {}",
                expected,
                width,
                height,
                bytes.len()
            )));
        }
        let data = bytes
            .chunks_exact(4)
            .map(|px| Rgba::new(px[0], px[1], px[2], px[3]))
            .collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// True when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get a pixel at the given coordinates.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Rgba {
        self.data[self.index(x, y)]
    }

    /// Set a pixel at the given coordinates.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, color: Rgba) {
        let idx = self.index(x, y);
        self.data[idx] = color;
    }

    /// Convert to 8-bit RGBA bytes.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.data.len() * 4);
        for color in &self.data {
            bytes.extend_from_slice(&color.to_rgba8());
        }
        bytes
    }

    /// Convert to 8-bit RGB bytes.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.data.len() * 3);
        for color in &self.data {
            bytes.extend_from_slice(&color.to_rgb8());
        }
        bytes
    }
}

/// A tangent-space normal map.
///
/// Each pixel stores `(map(x), map(y), map(z), 255)` where `map` sends
/// `[-1, 1]` to `[0, 255]`. A flat surface is `(128, 128, 255, 255)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalMap(TextureBuffer);

impl NormalMap {
    /// A map where every pixel faces the viewer.
    pub fn flat(width: u32, height: u32) -> Self {
        Self(TextureBuffer::new(width, height, Rgba::FLAT_NORMAL))
    }

    /// Wrap an already encoded buffer.
    pub fn from_buffer(buffer: TextureBuffer) -> Self {
        Self(buffer)
    }

    pub fn width(&self) -> u32 {
        self.0.width
    }

    pub fn height(&self) -> u32 {
        self.0.height
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Rgba {
        self.0.get(x, y)
    }

    /// Decode the stored normal at a pixel (subject to 8-bit quantization).
    pub fn normal_at(&self, x: u32, y: u32) -> Vector3 {
        let px = self.get(x, y);
        Vector3::new(
            decode_component(px.r),
            decode_component(px.g),
            decode_component(px.b),
        )
    }

    pub fn as_buffer(&self) -> &TextureBuffer {
        &self.0
    }

    pub(crate) fn as_buffer_mut(&mut self) -> &mut TextureBuffer {
        &mut self.0
    }

    pub fn into_buffer(self) -> TextureBuffer {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texture_buffer_get_set() {
        let mut buf = TextureBuffer::new(2, 2, Rgba::TRANSPARENT);
        buf.set(0, 0, Rgba::rgb(255, 0, 0));
        buf.set(1, 0, Rgba::rgb(0, 255, 0));
        buf.set(0, 1, Rgba::rgb(0, 0, 255));
        buf.set(1, 1, Rgba::gray(255));

        assert_eq!(buf.get(0, 0), Rgba::rgb(255, 0, 0));
        assert_eq!(buf.get(1, 0), Rgba::rgb(0, 255, 0));
        assert_eq!(buf.get(0, 1), Rgba::rgb(0, 0, 255));
        assert_eq!(buf.get(1, 1), Rgba::gray(255));
    }

    #[test]
    fn test_from_fn_is_row_major() {
        let buf = TextureBuffer::from_fn(3, 2, |x, y| Rgba::gray((y * 3 + x) as u8));
        let values: Vec<u8> = buf.data.iter().map(|c| c.r).collect();
        assert_eq!(values, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_from_rgba8_round_trip() {
        let bytes: Vec<u8> = (0..16).collect();
        let buf = TextureBuffer::from_rgba8(2, 2, &bytes).unwrap();
        assert_eq!(buf.get(1, 0), Rgba::new(4, 5, 6, 7));
        assert_eq!(buf.to_rgba8(), bytes);
        assert_eq!(buf.to_rgb8().len(), 12);
    }

    #[test]
    fn test_from_rgba8_rejects_wrong_length() {
        let err = TextureBuffer::from_rgba8(2, 2, &[0; 15]).unwrap_err();
        assert!(matches!(err, NormalMapError::InvalidInput(_)));
    }

    #[test]
    fn test_flat_normal_map() {
        let map = NormalMap::flat(4, 3);
        assert_eq!(map.width(), 4);
        assert_eq!(map.height(), 3);
        assert!(map.as_buffer().data.iter().all(|&px| px == Rgba::FLAT_NORMAL));
        let n = map.normal_at(2, 1);
        assert!(n.x.abs() < 0.01 && n.y.abs() < 0.01 && (n.z - 1.0).abs() < 1e-12);
    }
}
