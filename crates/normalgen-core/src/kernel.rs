//! Gradient estimation from 3x3 intensity neighborhoods.

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::buffer::{NormalMap, TextureBuffer};
use crate::color::{encode_component, Rgba};
use crate::intensity::IntensityField;
use crate::math::Vector3;

/// Convolution scheme used to estimate directional derivatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelType {
    /// Neighbors adjacent to the center are weighted twice.
    #[default]
    Sobel,
    /// All neighbors weighted equally.
    Prewitt,
}

impl KernelType {
    pub const ALL: [KernelType; 2] = [KernelType::Sobel, KernelType::Prewitt];

    pub fn as_str(&self) -> &'static str {
        match self {
            KernelType::Sobel => "sobel",
            KernelType::Prewitt => "prewitt",
        }
    }
}

impl fmt::Display for KernelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KernelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sobel" => Ok(KernelType::Sobel),
            "prewitt" => Ok(KernelType::Prewitt),
            other => Err(format!(
                "unknown kernel '{}', expected one of: sobel, prewitt",
                other
            )),
        }
    }
}

/// The eight samples surrounding a pixel.
///
/// The center is never sampled; it sits at `0.0` in [`Neighborhood::matrix`]
/// and takes no part in either kernel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Neighborhood {
    pub top_left: f64,
    pub top: f64,
    pub top_right: f64,
    pub right: f64,
    pub bottom_right: f64,
    pub bottom: f64,
    pub bottom_left: f64,
    pub left: f64,
}

impl Neighborhood {
    /// Sample the ring around `(x, y)` with edge clamping.
    #[inline]
    pub fn sample(field: &IntensityField, x: u32, y: u32) -> Self {
        let (x, y) = (x as i64, y as i64);
        let s = |dx: i64, dy: i64| field.get_clamped(x + dx, y + dy) as f64;
        Self {
            top_left: s(-1, -1),
            top: s(0, -1),
            top_right: s(1, -1),
            right: s(1, 0),
            bottom_right: s(1, 1),
            bottom: s(0, 1),
            bottom_left: s(-1, 1),
            left: s(-1, 0),
        }
    }

    /// Row-major 3x3 matrix with a zero center.
    pub fn matrix(&self) -> [[f64; 3]; 3] {
        [
            [self.top_left, self.top, self.top_right],
            [self.left, 0.0, self.right],
            [self.bottom_left, self.bottom, self.bottom_right],
        ]
    }

    /// Directional derivatives `(dX, dY)` under the given scheme.
    ///
    /// Prewitt's `dX` runs top minus bottom while Sobel's runs bottom minus
    /// top; the two schemes tilt X in opposite directions.
    pub fn gradient(&self, kernel: KernelType) -> (f64, f64) {
        let m = self.matrix();
        match kernel {
            KernelType::Sobel => {
                let top_side = m[0][0] + 2.0 * m[0][1] + m[0][2];
                let bottom_side = m[2][0] + 2.0 * m[2][1] + m[2][2];
                let right_side = m[0][2] + 2.0 * m[1][2] + m[2][2];
                let left_side = m[0][0] + 2.0 * m[1][0] + m[2][0];
                (bottom_side - top_side, right_side - left_side)
            }
            KernelType::Prewitt => {
                let top_side = m[0][0] + m[0][1] + m[0][2];
                let bottom_side = m[2][0] + m[2][1] + m[2][2];
                let right_side = m[0][2] + m[1][2] + m[2][2];
                let left_side = m[0][0] + m[1][0] + m[2][0];
                (top_side - bottom_side, right_side - left_side)
            }
        }
    }
}

/// Unit surface normal for a neighborhood.
///
/// `dZ` is `1 / strength`: the gradient is weighed against the inverse
/// strength before normalizing.
pub fn surface_normal(neighborhood: &Neighborhood, kernel: KernelType, strength: f64) -> Vector3 {
    let (dx, dy) = neighborhood.gradient(kernel);
    Vector3::new(dx, dy, 1.0 / strength).normalized()
}

/// Encode a unit normal as an opaque pixel.
#[inline]
pub fn encode_normal(normal: Vector3) -> Rgba {
    Rgba::new(
        encode_component(normal.x),
        encode_component(normal.y),
        encode_component(normal.z),
        255,
    )
}

/// Compute the encoded normal map of a fully populated intensity field.
///
/// Rows are processed in parallel; each worker writes only its own row and
/// reads the field, which is immutable for the whole pass.
pub fn compute_normal_map(field: &IntensityField, kernel: KernelType, strength: f64) -> NormalMap {
    let width = field.width;
    let mut buffer = TextureBuffer::new(width, field.height, Rgba::FLAT_NORMAL);
    if width == 0 {
        return NormalMap::from_buffer(buffer);
    }

    buffer
        .data
        .par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as u32;
            for (x, px) in row.iter_mut().enumerate() {
                let neighborhood = Neighborhood::sample(field, x as u32, y);
                *px = encode_normal(surface_normal(&neighborhood, kernel, strength));
            }
        });

    NormalMap::from_buffer(buffer)
}
