//! Config command implementation
//!
//! Prints the default generation parameters as JSON, ready to be edited and
//! passed back with `generate --config`.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use normalgen_core::GenerationConfig;

/// Load a generation config from a JSON file.
///
/// Missing fields take their default values.
pub fn load(path: &Path) -> Result<GenerationConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: GenerationConfig = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    Ok(config)
}

/// Run the config command
///
/// # Arguments
/// * `output` - File to write to (default: stdout)
pub fn run(output: Option<&str>) -> Result<ExitCode> {
    let json = serde_json::to_string_pretty(&GenerationConfig::default())?;
    match output {
        Some(path) => fs::write(path, format!("{}\n", json))
            .with_context(|| format!("Failed to write config file: {}", path))?,
        None => println!("{}", json),
    }
    Ok(ExitCode::SUCCESS)
}
