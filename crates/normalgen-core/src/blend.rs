//! Soft-light blending of a fine normal map with a coarse one.

use rayon::prelude::*;

use crate::buffer::NormalMap;
use crate::color::Rgba;
use crate::error::{NormalMapError, Result};

/// Soft-light blend of a base channel `a` with a blend channel `b`.
///
/// A dark `b` scales `a` down, a light `b` screens it up.
#[inline]
pub fn soft_light_channel(a: u8, b: u8) -> u8 {
    let a = a as f64;
    let b = b as f64;
    let value = if 2.0 * b < 255.0 {
        (a + 127.5) * b / 255.0
    } else {
        255.0 - (382.5 - a) * (255.0 - b) / 255.0
    };
    value.round().clamp(0.0, 255.0) as u8
}

/// Blend two pixels channel by channel; the result is opaque.
#[inline]
pub fn soft_light(base: Rgba, blend: Rgba) -> Rgba {
    Rgba::new(
        soft_light_channel(base.r, blend.r),
        soft_light_channel(base.g, blend.g),
        soft_light_channel(base.b, blend.b),
        255,
    )
}

/// Blend a base normal map with a large-detail map of the same size.
pub fn blend_soft_light(base: &NormalMap, detail: &NormalMap) -> Result<NormalMap> {
    let mut out = base.clone();
    blend_soft_light_in_place(&mut out, detail)?;
    Ok(out)
}

/// Replace the pixels of `base` with their blend against `detail`.
pub fn blend_soft_light_in_place(base: &mut NormalMap, detail: &NormalMap) -> Result<()> {
    if base.width() != detail.width() || base.height() != detail.height() {
        return Err(NormalMapError::invalid(format!(
            "cannot blend {}x{} map with {}x{} map",
            base.width(),
            base.height(),
            detail.width(),
            detail.height()
        )));
    }

    let width = base.width() as usize;
    if width == 0 {
        return Ok(());
    }
    let detail = &detail.as_buffer().data;
    base.as_buffer_mut()
        .data
        .par_chunks_mut(width)
        .zip(detail.par_chunks(width))
        .for_each(|(row, detail_row)| {
            for (px, &d) in row.iter_mut().zip(detail_row) {
                *px = soft_light(*px, d);
            }
        });
    Ok(())
}

/// Dimensions of the reduced-resolution pass.
///
/// Each side is `floor(side * scale)`; a side that rounds to zero is an
/// error rather than an empty map.
pub fn large_detail_dimensions(width: u32, height: u32, scale: f64) -> Result<(u32, u32)> {
    if !(scale > 0.0 && scale <= 1.0) {
        return Err(NormalMapError::invalid(format!(
            "large_detail_scale must be in (0, 1], got {}",
            scale
        )));
    }
    let w = (width as f64 * scale).floor() as u32;
    let h = (height as f64 * scale).floor() as u32;
    if w == 0 || h == 0 {
        return Err(NormalMapError::invalid(format!(
            "large_detail_scale {} reduces {}x{} to {}x{}",
            scale, width, height, w, h
        )));
    }
    Ok((w, h))
}
