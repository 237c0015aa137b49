//! Image backend: decoding, resampling, blur and encoding.
//!
//! The generation core only reads and writes [`TextureBuffer`] pixels. Anything
//! that depends on a resampling filter or a file format goes through the
//! [`ImageBackend`] trait so it can be swapped out.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageEncoder, RgbaImage};

use crate::buffer::TextureBuffer;
use crate::color::Rgba;
use crate::config::{BlurSettings, OutputFormat, MAX_BLUR_RADIUS};
use crate::error::{NormalMapError, Result};
use crate::png::{self, PngConfig};

/// Operations the generator needs from an image library.
pub trait ImageBackend {
    /// Decode encoded image bytes into RGBA pixels.
    fn decode(&self, bytes: &[u8]) -> Result<TextureBuffer>;

    /// Resample an image to the given dimensions. Must be deterministic.
    fn scale(&self, image: &TextureBuffer, width: u32, height: u32) -> Result<TextureBuffer>;

    /// Gaussian blur with an explicit kernel radius.
    fn blur(&self, image: &TextureBuffer, radius: u32, sigma: f64) -> Result<TextureBuffer>;

    /// Encode pixels in the given format.
    fn encode(&self, image: &TextureBuffer, format: OutputFormat) -> Result<Vec<u8>>;
}

/// Backend built on the `image` and `png` crates.
#[derive(Debug, Clone)]
pub struct DefaultBackend {
    /// Filter used by [`ImageBackend::scale`].
    pub filter: FilterType,
    /// JPEG quality (1-100).
    pub jpeg_quality: u8,
    pub png: PngConfig,
}

impl Default for DefaultBackend {
    fn default() -> Self {
        Self {
            filter: FilterType::Triangle,
            jpeg_quality: 90,
            png: PngConfig::default(),
        }
    }
}

impl DefaultBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }
}

fn to_rgba_image(buffer: &TextureBuffer) -> Result<RgbaImage> {
    RgbaImage::from_raw(buffer.width, buffer.height, buffer.to_rgba8()).ok_or_else(|| {
        NormalMapError::invalid(format!(
            "pixel data does not match {}x{}",
            buffer.width, buffer.height
        ))
    })
}

fn from_rgba_image(image: &RgbaImage) -> Result<TextureBuffer> {
    TextureBuffer::from_rgba8(image.width(), image.height(), image.as_raw())
}

impl ImageBackend for DefaultBackend {
    fn decode(&self, bytes: &[u8]) -> Result<TextureBuffer> {
        let decoded =
            image::load_from_memory(bytes).map_err(|e| NormalMapError::Decode(e.to_string()))?;
        from_rgba_image(&decoded.to_rgba8())
    }

    fn scale(&self, image: &TextureBuffer, width: u32, height: u32) -> Result<TextureBuffer> {
        if width == 0 || height == 0 {
            return Err(NormalMapError::invalid(format!(
                "cannot scale to {}x{}",
                width, height
            )));
        }
        if image.is_empty() {
            return Err(NormalMapError::invalid("cannot scale an empty image"));
        }
        if (image.width, image.height) == (width, height) {
            return Ok(image.clone());
        }
        let src = to_rgba_image(image)?;
        let resized = imageops::resize(&src, width, height, self.filter);
        from_rgba_image(&resized)
    }

    fn blur(&self, image: &TextureBuffer, radius: u32, sigma: f64) -> Result<TextureBuffer> {
        Ok(gaussian_blur(image, radius, sigma))
    }

    fn encode(&self, image: &TextureBuffer, format: OutputFormat) -> Result<Vec<u8>> {
        match format {
            OutputFormat::Png => Ok(png::write_rgba_to_vec(image, &self.png)?),
            OutputFormat::Jpeg => {
                if image.is_empty() {
                    return Err(NormalMapError::Encode(format!(
                        "cannot encode {}x{} image",
                        image.width, image.height
                    )));
                }
                let mut data = Vec::new();
                JpegEncoder::new_with_quality(&mut data, self.jpeg_quality)
                    .write_image(
                        &image.to_rgb8(),
                        image.width,
                        image.height,
                        ExtendedColorType::Rgb8,
                    )
                    .map_err(|e| NormalMapError::Encode(e.to_string()))?;
                Ok(data)
            }
        }
    }
}

/// Normalized 1D Gaussian kernel of `2 * radius + 1` taps.
///
/// A radius of zero is derived from sigma as `ceil(3 * sigma)`; either way
/// the radius is capped at [`MAX_BLUR_RADIUS`]. A sigma too small to form
/// a finite kernel yields the identity kernel `[1.0]`.
pub fn gaussian_kernel(radius: u32, sigma: f64) -> Vec<f64> {
    let denominator = 2.0 * sigma * sigma;
    if !(denominator > 0.0 && denominator.is_finite()) {
        return vec![1.0];
    }
    let radius = BlurSettings { radius, sigma }
        .effective_radius()
        .min(MAX_BLUR_RADIUS as f64) as i64;

    let mut kernel: Vec<f64> = (-radius..=radius)
        .map(|i| {
            let x = i as f64;
            (-x * x / denominator).exp()
        })
        .collect();
    let sum: f64 = kernel.iter().sum();
    if !(sum > 0.0 && sum.is_finite()) {
        return vec![1.0];
    }
    for value in &mut kernel {
        *value /= sum;
    }
    kernel
}

/// Separable Gaussian blur over all four channels with edge clamping.
///
/// A non-positive or non-finite sigma returns the image unchanged.
pub fn gaussian_blur(image: &TextureBuffer, radius: u32, sigma: f64) -> TextureBuffer {
    if !(sigma > 0.0 && sigma.is_finite()) || image.is_empty() {
        return image.clone();
    }

    let width = image.width as i64;
    let height = image.height as i64;
    let kernel = gaussian_kernel(radius, sigma);
    let half = (kernel.len() / 2) as i64;
    let idx = |x: i64, y: i64| (y * width + x) as usize;

    // Horizontal pass
    let mut temp = vec![[0.0f64; 4]; image.data.len()];
    for y in 0..height {
        for x in 0..width {
            let mut acc = [0.0; 4];
            for (i, weight) in kernel.iter().enumerate() {
                let sx = (x + i as i64 - half).clamp(0, width - 1);
                let px = image.data[idx(sx, y)].to_rgba8();
                for c in 0..4 {
                    acc[c] += px[c] as f64 * weight;
                }
            }
            temp[idx(x, y)] = acc;
        }
    }

    // Vertical pass
    let mut out = TextureBuffer::new(image.width, image.height, Rgba::TRANSPARENT);
    for y in 0..height {
        for x in 0..width {
            let mut acc = [0.0; 4];
            for (i, weight) in kernel.iter().enumerate() {
                let sy = (y + i as i64 - half).clamp(0, height - 1);
                let px = temp[idx(x, sy)];
                for c in 0..4 {
                    acc[c] += px[c] * weight;
                }
            }
            let byte = |v: f64| v.round().clamp(0.0, 255.0) as u8;
            out.data[idx(x, y)] = Rgba::new(byte(acc[0]), byte(acc[1]), byte(acc[2]), byte(acc[3]));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(width: u32, height: u32) -> TextureBuffer {
        TextureBuffer::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba::gray(255)
            } else {
                Rgba::gray(0)
            }
        })
    }

    #[test]
    fn test_png_round_trip_through_decode() {
        let backend = DefaultBackend::new();
        let image = TextureBuffer::from_fn(5, 4, |x, y| Rgba::new(x as u8 * 50, y as u8 * 60, 7, 200));
        let bytes = backend.encode(&image, OutputFormat::Png).unwrap();
        let decoded = backend.decode(&bytes).unwrap();
        assert_eq!(decoded, image);
    }

    #[test]
    fn test_decode_garbage_is_decode_error() {
        let err = DefaultBackend::new().decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, NormalMapError::Decode(_)));
    }

    #[test]
    fn test_jpeg_encode_has_soi_marker() {
        let backend = DefaultBackend::new().with_jpeg_quality(80);
        let bytes = backend.encode(&checker(16, 16), OutputFormat::Jpeg).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        let decoded = backend.decode(&bytes).unwrap();
        assert_eq!((decoded.width, decoded.height), (16, 16));
    }

    #[test]
    fn test_scale_dimensions() {
        let backend = DefaultBackend::new();
        let down = backend.scale(&checker(16, 8), 4, 2).unwrap();
        assert_eq!((down.width, down.height), (4, 2));
        let up = backend.scale(&down, 16, 8).unwrap();
        assert_eq!((up.width, up.height), (16, 8));
    }

    #[test]
    fn test_scale_uniform_image_stays_uniform() {
        let backend = DefaultBackend::new();
        let image = TextureBuffer::new(9, 9, Rgba::rgb(128, 128, 255));
        let up = backend.scale(&image, 20, 13).unwrap();
        assert!(up.data.iter().all(|&px| px == Rgba::rgb(128, 128, 255)));
    }

    #[test]
    fn test_nearest_filter_upscale_repeats_pixels() {
        let backend = DefaultBackend::new().with_filter(FilterType::Nearest);
        let image = TextureBuffer::from_fn(2, 1, |x, _| Rgba::gray(x as u8 * 200));
        let up = backend.scale(&image, 4, 1).unwrap();
        assert_eq!(up.get(0, 0), Rgba::gray(0));
        assert_eq!(up.get(1, 0), Rgba::gray(0));
        assert_eq!(up.get(2, 0), Rgba::gray(200));
        assert_eq!(up.get(3, 0), Rgba::gray(200));
    }

    #[test]
    fn test_scale_rejects_zero_target() {
        let err = DefaultBackend::new().scale(&checker(4, 4), 0, 2).unwrap_err();
        assert!(matches!(err, NormalMapError::InvalidInput(_)));
    }

    #[test]
    fn test_gaussian_kernel_is_normalized_and_symmetric() {
        let kernel = gaussian_kernel(5, 1.0);
        assert_eq!(kernel.len(), 11);
        assert!((kernel.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        for i in 0..kernel.len() / 2 {
            assert!((kernel[i] - kernel[kernel.len() - 1 - i]).abs() < 1e-15);
        }
        assert_eq!(gaussian_kernel(0, 1.0).len(), 7);
    }

    #[test]
    fn test_blur_uniform_image_is_unchanged() {
        let image = TextureBuffer::new(6, 6, Rgba::rgb(128, 128, 255));
        assert_eq!(gaussian_blur(&image, 5, 1.0), image);
    }

    #[test]
    fn test_blur_smooths_checker() {
        let image = checker(8, 8);
        let blurred = gaussian_blur(&image, 2, 1.5);
        let px = blurred.get(4, 4);
        assert!(px.r > 60 && px.r < 195, "got {}", px.r);
    }

    #[test]
    fn test_gaussian_kernel_underflowing_sigma_is_identity() {
        assert_eq!(gaussian_kernel(5, 1e-200), vec![1.0]);
        assert_eq!(gaussian_kernel(0, f64::MIN_POSITIVE), vec![1.0]);
    }

    #[test]
    fn test_gaussian_kernel_radius_is_capped() {
        let taps = 2 * MAX_BLUR_RADIUS as usize + 1;
        assert_eq!(gaussian_kernel(u32::MAX, 1.0).len(), taps);
        assert_eq!(gaussian_kernel(0, 1e9).len(), taps);
    }

    #[test]
    fn test_blur_tiny_sigma_keeps_flat_map() {
        let image = TextureBuffer::new(3, 3, Rgba::FLAT_NORMAL);
        let blurred = gaussian_blur(&image, 5, 1e-200);
        assert_eq!(blurred, image);
        assert_eq!(blurred.get(1, 1), Rgba::FLAT_NORMAL);
    }

    #[test]
    fn test_blur_zero_sigma_is_identity() {
        let image = checker(5, 5);
        assert_eq!(gaussian_blur(&image, 5, 0.0), image);
    }
}
