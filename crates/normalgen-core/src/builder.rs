//! Full-resolution normal map from a source image.

use crate::buffer::{NormalMap, TextureBuffer};
use crate::error::Result;
use crate::intensity::extract_intensity;
use crate::kernel::{compute_normal_map, KernelType};

/// Build the normal map of `image` at its own resolution.
///
/// The intensity field is fully extracted before any gradient is sampled.
pub fn build_normal_map(
    image: &TextureBuffer,
    kernel: KernelType,
    strength: f64,
    invert: bool,
) -> Result<NormalMap> {
    let field = extract_intensity(image, invert)?;
    Ok(compute_normal_map(&field, kernel, strength))
}
