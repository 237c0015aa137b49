//! 8-bit RGBA pixels and the normal encoding helpers.

/// RGBA pixel with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    /// Encoded flat normal `(0, 0, 1)`.
    pub const FLAT_NORMAL: Rgba = Rgba::new(128, 128, 255, 255);

    /// Create a pixel from all four channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque pixel.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Create an opaque gray pixel.
    pub const fn gray(value: u8) -> Self {
        Self::rgb(value, value, value)
    }

    /// Create from 8-bit RGBA.
    pub const fn from_rgba8(rgba: [u8; 4]) -> Self {
        Self::new(rgba[0], rgba[1], rgba[2], rgba[3])
    }

    /// Convert to 8-bit RGBA.
    pub const fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Convert to 8-bit RGB, dropping alpha.
    pub const fn to_rgb8(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Mean of the color channels in `[0, 1]`.
    ///
    /// This is the plain `(R + G + B) / (3 * 255)` average, not a perceptual
    /// luminance.
    #[inline]
    pub fn intensity(self) -> f64 {
        (self.r as u32 + self.g as u32 + self.b as u32) as f64 / (255.0 * 3.0)
    }
}

/// Map a normal component in `[-1, 1]` to a byte.
#[inline]
pub fn encode_component(value: f64) -> u8 {
    ((value + 1.0) * 127.5).round().clamp(0.0, 255.0) as u8
}

/// Inverse of [`encode_component`], up to quantization.
#[inline]
pub fn decode_component(value: u8) -> f64 {
    value as f64 / 127.5 - 1.0
}
