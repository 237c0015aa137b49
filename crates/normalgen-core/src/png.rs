//! Deterministic PNG writer.
//!
//! Uses fixed compression settings so identical maps always encode to
//! identical bytes.

use std::io::Write;

use png::{BitDepth, ColorType, Compression, Encoder, FilterType};
use thiserror::Error;

use crate::buffer::TextureBuffer;

/// Errors from PNG operations.
#[derive(Debug, Error)]
pub enum PngError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encoding error: {0}")]
    Encoding(#[from] png::EncodingError),

    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),
}

/// PNG export configuration.
#[derive(Debug, Clone)]
pub struct PngConfig {
    pub compression: Compression,
    pub filter: FilterType,
}

impl Default for PngConfig {
    fn default() -> Self {
        Self {
            compression: Compression::Default,
            filter: FilterType::NoFilter,
        }
    }
}

impl PngConfig {
    /// Smaller files, slower encoding.
    pub fn best_compression() -> Self {
        Self {
            compression: Compression::Best,
            filter: FilterType::Paeth,
        }
    }
}

fn check_dimensions(buffer: &TextureBuffer) -> Result<(), PngError> {
    if buffer.is_empty() {
        return Err(PngError::InvalidDimensions(format!(
            "cannot encode {}x{} image",
            buffer.width, buffer.height
        )));
    }
    Ok(())
}

/// Write an RGBA texture buffer to any writer.
pub fn write_rgba_to_writer<W: Write>(
    buffer: &TextureBuffer,
    writer: W,
    config: &PngConfig,
) -> Result<(), PngError> {
    check_dimensions(buffer)?;
    let mut encoder = Encoder::new(writer, buffer.width, buffer.height);
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_compression(config.compression);
    encoder.set_filter(config.filter);

    // The png crate writes no timestamps unless asked to.
    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&buffer.to_rgba8())?;

    Ok(())
}

/// Encode an RGBA texture buffer into a byte vector.
pub fn write_rgba_to_vec(buffer: &TextureBuffer, config: &PngConfig) -> Result<Vec<u8>, PngError> {
    let mut data = Vec::new();
    write_rgba_to_writer(buffer, &mut data, config)?;
    Ok(data)
}

/// Compute the BLAKE3 hash of encoded image data.
pub fn hash_bytes(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}
