//! Generation and output configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{NormalMapError, Result};
use crate::kernel::KernelType;

/// Parameters of a single normal map generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Gradient kernel.
    pub kernel: KernelType,
    /// Normal strength; `dZ` is its inverse. Must be finite and positive.
    pub strength: f64,
    /// Treat dark pixels as high instead of low.
    pub invert: bool,
    /// Blend in a normal map computed at reduced resolution.
    pub keep_large_detail: bool,
    /// Resolution factor of the large-detail pass, in `(0, 1]`.
    pub large_detail_scale: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            kernel: KernelType::Sobel,
            strength: 2.5,
            invert: false,
            keep_large_detail: false,
            large_detail_scale: 0.25,
        }
    }
}

impl GenerationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kernel(mut self, kernel: KernelType) -> Self {
        self.kernel = kernel;
        self
    }

    pub fn with_strength(mut self, strength: f64) -> Self {
        self.strength = strength;
        self
    }

    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Enable the large-detail pass at the given scale.
    pub fn with_large_detail(mut self, scale: f64) -> Self {
        self.keep_large_detail = true;
        self.large_detail_scale = scale;
        self
    }

    pub fn without_large_detail(mut self) -> Self {
        self.keep_large_detail = false;
        self
    }

    /// Check parameter ranges.
    ///
    /// `large_detail_scale` is only checked when the large-detail pass is
    /// enabled.
    pub fn validate(&self) -> Result<()> {
        if !self.strength.is_finite() || self.strength <= 0.0 {
            return Err(NormalMapError::invalid(format!(
                "strength must be a finite positive number, got {}",
                self.strength
            )));
        }
        if self.keep_large_detail
            && !(self.large_detail_scale > 0.0 && self.large_detail_scale <= 1.0)
        {
            return Err(NormalMapError::invalid(format!(
                "large_detail_scale must be in (0, 1], got {}",
                self.large_detail_scale
            )));
        }
        Ok(())
    }
}

/// Encoded output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Lossless, deterministic PNG.
    #[default]
    Png,
    /// Baseline JPEG at a fixed quality.
    Jpeg,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }

    /// Infer the format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(OutputFormat::Png),
            "jpg" | "jpeg" => Some(OutputFormat::Jpeg),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Png => f.write_str("png"),
            OutputFormat::Jpeg => f.write_str("jpeg"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputFormat::from_extension(s)
            .ok_or_else(|| format!("unknown format '{}', expected one of: png, jpeg", s))
    }
}

/// Largest blur radius accepted, explicit or derived from sigma.
pub const MAX_BLUR_RADIUS: u32 = 64;

/// Gaussian blur applied to the final map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurSettings {
    /// Kernel radius in pixels; `0` derives it from `sigma`.
    pub radius: u32,
    /// Standard deviation in pixels.
    pub sigma: f64,
}

impl Default for BlurSettings {
    fn default() -> Self {
        Self {
            radius: 5,
            sigma: 1.0,
        }
    }
}

impl BlurSettings {
    /// Radius the kernel will actually use.
    pub fn effective_radius(&self) -> f64 {
        if self.radius == 0 {
            (self.sigma * 3.0).ceil().max(1.0)
        } else {
            self.radius as f64
        }
    }

    /// Check that sigma is finite and non-negative and the radius is at most
    /// [`MAX_BLUR_RADIUS`].
    pub fn validate(&self) -> Result<()> {
        if !self.sigma.is_finite() || self.sigma < 0.0 {
            return Err(NormalMapError::invalid(format!(
                "blur sigma must be a finite non-negative number, got {}",
                self.sigma
            )));
        }
        if self.effective_radius() > MAX_BLUR_RADIUS as f64 {
            return Err(NormalMapError::invalid(format!(
                "blur radius must be at most {}, got {} (sigma {})",
                MAX_BLUR_RADIUS, self.radius, self.sigma
            )));
        }
        Ok(())
    }
}

/// Post-processing and encoding options for the byte-level pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    pub format: OutputFormat,
    /// Cosmetic blur; `None` leaves the map untouched.
    pub blur: Option<BlurSettings>,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Png,
            blur: Some(BlurSettings::default()),
        }
    }
}

impl OutputOptions {
    /// Raw output: PNG without blur.
    pub fn raw() -> Self {
        Self {
            format: OutputFormat::Png,
            blur: None,
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_blur(mut self, blur: Option<BlurSettings>) -> Self {
        self.blur = blur;
        self
    }

    pub fn validate(&self) -> Result<()> {
        match &self.blur {
            Some(blur) => blur.validate(),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_is_valid() {
        GenerationConfig::default().validate().unwrap();
    }

    #[test]
    fn test_rejects_non_positive_strength() {
        for strength in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = GenerationConfig::new()
                .with_strength(strength)
                .validate()
                .unwrap_err();
            assert!(err.to_string().contains("strength"), "{strength}: {err}");
        }
    }

    #[test]
    fn test_large_detail_scale_range() {
        for scale in [0.0, -0.5, 1.5, f64::NAN] {
            let err = GenerationConfig::new()
                .with_large_detail(scale)
                .validate()
                .unwrap_err();
            assert!(err.to_string().contains("large_detail_scale"));
        }
        GenerationConfig::new().with_large_detail(1.0).validate().unwrap();
        GenerationConfig::new().with_large_detail(0.01).validate().unwrap();
    }

    #[test]
    fn test_scale_ignored_when_pass_disabled() {
        let config = GenerationConfig {
            large_detail_scale: 7.0,
            ..Default::default()
        };
        config.validate().unwrap();
    }

    #[test]
    fn test_config_serde_defaults() {
        let config: GenerationConfig =
            serde_json::from_str(r#"{ "kernel": "prewitt", "invert": true }"#).unwrap();
        assert_eq!(
            config,
            GenerationConfig {
                kernel: KernelType::Prewitt,
                invert: true,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = GenerationConfig::new()
            .with_kernel(KernelType::Prewitt)
            .with_strength(4.0)
            .with_large_detail(0.5);
        let json = serde_json::to_string(&config).unwrap();
        let parsed: GenerationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_output_format_from_extension() {
        assert_eq!(OutputFormat::from_extension("PNG"), Some(OutputFormat::Png));
        assert_eq!(OutputFormat::from_extension("jpeg"), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::from_extension("jpg"), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::from_extension("tga"), None);
        assert_eq!("jpeg".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
    }

    #[test]
    fn test_output_options_default_blur() {
        let options = OutputOptions::default();
        assert_eq!(options.blur, Some(BlurSettings { radius: 5, sigma: 1.0 }));
        assert_eq!(OutputOptions::raw().blur, None);
    }

    #[test]
    fn test_blur_settings_validate() {
        BlurSettings::default().validate().unwrap();
        BlurSettings { radius: 0, sigma: 0.0 }.validate().unwrap();
        BlurSettings { radius: MAX_BLUR_RADIUS, sigma: 1e-200 }.validate().unwrap();

        for sigma in [-1.0, f64::NAN, f64::INFINITY] {
            let err = BlurSettings { radius: 5, sigma }.validate().unwrap_err();
            assert!(err.to_string().contains("sigma"), "{sigma}: {err}");
        }
        for blur in [
            BlurSettings { radius: 4_000_000_000, sigma: 1.0 },
            BlurSettings { radius: 0, sigma: 1e9 },
        ] {
            let err = blur.validate().unwrap_err();
            assert_eq!(err.code(), "NORMAL_001");
        }
    }

    #[test]
    fn test_output_options_validate_checks_blur() {
        OutputOptions::raw().validate().unwrap();
        let options = OutputOptions::default().with_blur(Some(BlurSettings {
            radius: 5,
            sigma: f64::NAN,
        }));
        assert!(options.validate().is_err());
    }
}
