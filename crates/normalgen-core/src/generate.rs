//! Normal map generation entry points.

use std::path::Path;
use std::time::Instant;

use tracing::debug;

use crate::backend::ImageBackend;
use crate::blend::{blend_soft_light_in_place, large_detail_dimensions};
use crate::buffer::{NormalMap, TextureBuffer};
use crate::builder::build_normal_map;
use crate::config::{GenerationConfig, OutputOptions};
use crate::error::{NormalMapError, Result};
use crate::png::hash_bytes;

/// Result of the byte-level pipeline.
#[derive(Debug, Clone)]
pub struct NormalMapResult {
    /// Encoded normal map.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// BLAKE3 hash of `data`.
    pub hash: String,
    /// File path if saved.
    pub file_path: Option<String>,
}

/// Generate a normal map for `source`.
///
/// Either the complete map is returned or an error is, before any output
/// exists. With `keep_large_detail` the source is also processed at
/// `large_detail_scale`, upscaled back through `backend` and soft-light
/// blended over the full-resolution map.
#[tracing::instrument(skip(backend, source), fields(width = source.width, height = source.height))]
pub fn generate<B: ImageBackend + ?Sized>(
    backend: &B,
    source: &TextureBuffer,
    config: &GenerationConfig,
) -> Result<NormalMap> {
    config.validate()?;
    if source.is_empty() {
        return Err(NormalMapError::invalid(format!(
            "image dimensions must be non-zero, got {}x{}",
            source.width, source.height
        )));
    }

    // Reject a degenerate reduced size before doing any work.
    let large_detail_size = if config.keep_large_detail {
        Some(large_detail_dimensions(
            source.width,
            source.height,
            config.large_detail_scale,
        )?)
    } else {
        None
    };

    let start = Instant::now();
    let mut normal_map = build_normal_map(source, config.kernel, config.strength, config.invert)?;
    debug!(elapsed_ms = start.elapsed().as_millis() as u64, "base normal map");

    if let Some((w, h)) = large_detail_size {
        let start = Instant::now();
        let reduced = backend.scale(source, w, h)?;
        let coarse = build_normal_map(&reduced, config.kernel, config.strength, config.invert)?;
        let coarse = backend.scale(coarse.as_buffer(), source.width, source.height)?;
        blend_soft_light_in_place(&mut normal_map, &NormalMap::from_buffer(coarse))?;
        debug!(
            reduced_width = w,
            reduced_height = h,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "large detail blended"
        );
    }

    Ok(normal_map)
}

/// Decode, generate, post-process and encode.
#[tracing::instrument(skip(backend, bytes), fields(input_len = bytes.len()))]
pub fn generate_from_bytes<B: ImageBackend + ?Sized>(
    backend: &B,
    bytes: &[u8],
    config: &GenerationConfig,
    output: &OutputOptions,
) -> Result<NormalMapResult> {
    config.validate()?;
    output.validate()?;
    let source = backend.decode(bytes)?;
    debug!(width = source.width, height = source.height, "decoded source");

    let normal_map = generate(backend, &source, config)?;

    let buffer = match output.blur {
        Some(blur) => backend.blur(normal_map.as_buffer(), blur.radius, blur.sigma)?,
        None => normal_map.into_buffer(),
    };

    let data = backend.encode(&buffer, output.format)?;
    let hash = hash_bytes(&data);
    debug!(format = %output.format, encoded_len = data.len(), "encoded normal map");

    Ok(NormalMapResult {
        data,
        width: buffer.width,
        height: buffer.height,
        hash,
        file_path: None,
    })
}

/// Read an image file and run [`generate_from_bytes`] on it.
pub fn generate_from_file<B: ImageBackend + ?Sized>(
    backend: &B,
    path: &Path,
    config: &GenerationConfig,
    output: &OutputOptions,
) -> Result<NormalMapResult> {
    let bytes = std::fs::read(path)?;
    generate_from_bytes(backend, &bytes, config, output)
}

/// Save a normal map result to file.
pub fn save_normal_map(result: &NormalMapResult, output_path: &Path) -> Result<NormalMapResult> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::write(output_path, &result.data)?;

    Ok(NormalMapResult {
        file_path: Some(output_path.to_string_lossy().to_string()),
        ..result.clone()
    })
}
