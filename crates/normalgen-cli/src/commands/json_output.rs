//! JSON output types for machine-readable CLI output.
//!
//! Produced by `normalgen generate --json` so scripts can consume the result
//! without parsing colored text.

use serde::{Deserialize, Serialize};

use normalgen_core::GenerationConfig;

/// Error codes for CLI operations.
///
/// Library errors pass through with their own `NORMAL_XXX` codes.
pub mod error_codes {
    /// Input file could not be read
    pub const FILE_READ: &str = "CLI_001";
    /// Config file could not be parsed
    pub const CONFIG_PARSE: &str = "CLI_002";
    /// Output format could not be determined
    pub const UNKNOWN_FORMAT: &str = "CLI_003";
    /// Output file could not be written
    pub const FILE_WRITE: &str = "CLI_004";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001", "NORMAL_001")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Source file path (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl JsonError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            file: None,
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

/// Details of a successful generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResult {
    /// Input image path
    pub input: String,
    /// Written normal map path
    pub output: String,
    /// Output format (png, jpeg)
    pub format: String,
    pub width: u32,
    pub height: u32,
    /// BLAKE3 hash of the written file
    pub hash: String,
    /// Effective generation parameters
    pub config: GenerationConfig,
}

/// Top-level output of `generate --json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOutput {
    /// Whether generation succeeded
    pub success: bool,
    /// Errors encountered during generation
    pub errors: Vec<JsonError>,
    /// Generation result details (on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<GenerateResult>,
}

impl GenerateOutput {
    pub fn success(result: GenerateResult) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            result: Some(result),
        }
    }

    pub fn failure(errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            errors,
            result: None,
        }
    }
}
