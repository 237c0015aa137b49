//! Error types for normal map generation.

use crate::png::PngError;

/// Errors from normal map generation.
#[derive(Debug, thiserror::Error)]
pub enum NormalMapError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("PNG error: {0}")]
    Png(#[from] PngError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NormalMapError {
    /// Stable error code for reporting.
    pub fn code(&self) -> &'static str {
        match self {
            NormalMapError::InvalidInput(_) => "NORMAL_001",
            NormalMapError::Decode(_) => "NORMAL_002",
            NormalMapError::Encode(_) => "NORMAL_003",
            NormalMapError::Png(_) => "NORMAL_004",
            NormalMapError::Io(_) => "NORMAL_005",
        }
    }

    /// Error category for grouping related errors.
    pub fn category(&self) -> &'static str {
        "normal_map"
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        NormalMapError::InvalidInput(message.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = NormalMapError> = std::result::Result<T, E>;
