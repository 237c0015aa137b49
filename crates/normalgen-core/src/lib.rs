//! Normal map generation from height and albedo textures.
//!
//! This crate turns an RGB image into a tangent-space normal map. Pixel
//! intensity is treated as height, local gradients are estimated with a
//! Sobel or Prewitt kernel over each pixel's 3x3 neighborhood, and the
//! resulting unit normals are encoded as RGB.
//!
//! # Features
//!
//! - **Kernels**: Sobel and Prewitt gradient estimation with edge clamping
//! - **Large detail**: optional reduced-resolution pass, soft-light blended
//!   over the full-resolution map
//! - **Image backend**: decoding, resampling, blur and encoding behind the
//!   [`ImageBackend`] trait, with a default implementation on the `image` and
//!   `png` crates
//! - **Deterministic output**: identical input and configuration give
//!   byte-identical maps
//!
//! # Example
//!
//! ```no_run
//! use normalgen_core::{generate_from_file, save_normal_map};
//! use normalgen_core::{DefaultBackend, GenerationConfig, KernelType, OutputOptions};
//! use std::path::Path;
//!
//! let config = GenerationConfig::new()
//!     .with_kernel(KernelType::Sobel)
//!     .with_strength(2.0)
//!     .with_large_detail(0.25);
//!
//! let backend = DefaultBackend::new();
//! let result = generate_from_file(
//!     &backend,
//!     Path::new("bricks.png"),
//!     &config,
//!     &OutputOptions::default(),
//! )
//! .unwrap();
//! save_normal_map(&result, Path::new("bricks_normal.png")).unwrap();
//! ```

pub mod backend;
pub mod blend;
pub mod buffer;
pub mod builder;
pub mod color;
pub mod config;
pub mod error;
pub mod generate;
pub mod intensity;
pub mod kernel;
pub mod math;
pub mod png;

// Re-export main types for convenience
pub use backend::{DefaultBackend, ImageBackend};
pub use blend::{blend_soft_light, soft_light_channel};
pub use buffer::{NormalMap, TextureBuffer};
pub use builder::build_normal_map;
pub use color::Rgba;
pub use config::{BlurSettings, GenerationConfig, OutputFormat, OutputOptions, MAX_BLUR_RADIUS};
pub use error::NormalMapError;
pub use generate::{generate, generate_from_bytes, generate_from_file, save_normal_map, NormalMapResult};
pub use intensity::{extract_intensity, IntensityField};
pub use kernel::{compute_normal_map, KernelType};
pub use math::Vector3;
pub use crate::png::{PngConfig, PngError};
