//! Generate command implementation
//!
//! Reads an image, generates its normal map and writes it next to the input
//! (or to an explicit output path).

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use normalgen_core::{
    generate_from_bytes, save_normal_map, BlurSettings, DefaultBackend, GenerationConfig,
    KernelType, NormalMapError, OutputFormat, OutputOptions,
};

use super::config;
use super::json_output::{error_codes, GenerateOutput, GenerateResult, JsonError};

/// Arguments of the generate command, as parsed from the command line.
#[derive(Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Input image path
    pub input: String,
    /// Output path (default: `<stem>_normal.<ext>` beside the input)
    pub output: Option<String>,
    /// JSON config file; flags override its values
    pub config: Option<String>,
    pub kernel: Option<String>,
    pub strength: Option<f64>,
    pub invert: bool,
    pub keep_large_detail: bool,
    /// Implies `keep_large_detail`
    pub large_detail_scale: Option<f64>,
    /// Output format; inferred from the output extension when absent
    pub format: Option<String>,
    pub no_blur: bool,
    pub blur_radius: Option<u32>,
    pub blur_sigma: Option<f64>,
}

/// Run the generate command
///
/// # Arguments
/// * `args` - Parsed command arguments
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 on success, 1 on error
pub fn run(args: &GenerateArgs, json_output: bool) -> Result<ExitCode> {
    if json_output {
        run_json(args)
    } else {
        run_human(args)
    }
}

/// Run generate with human-readable (colored) output
fn run_human(args: &GenerateArgs) -> Result<ExitCode> {
    let start = Instant::now();

    let config = resolve_config(args)?;
    let format = resolve_format(args)?;
    let output_path = resolve_output_path(&args.input, args.output.as_deref(), format);
    let options = resolve_output_options(args, format);

    println!("{} {}", "Generating:".cyan().bold(), args.input);
    println!(
        "{} {} strength={} invert={}",
        "Kernel:".dimmed(),
        config.kernel,
        config.strength,
        config.invert
    );
    if config.keep_large_detail {
        println!("{} {}", "Large detail:".dimmed(), config.large_detail_scale);
    }

    let bytes =
        fs::read(&args.input).with_context(|| format!("Failed to read input: {}", args.input))?;
    let result = generate_from_bytes(&DefaultBackend::new(), &bytes, &config, &options)
        .with_context(|| format!("Failed to generate normal map for {}", args.input))?;
    let result = save_normal_map(&result, &output_path)
        .with_context(|| format!("Failed to write output: {}", output_path.display()))?;

    let duration_ms = start.elapsed().as_millis();
    println!(
        "{} {} ({}x{}, {}) in {}ms",
        "Wrote".green().bold(),
        output_path.display(),
        result.width,
        result.height,
        format,
        duration_ms
    );
    println!("{} {}", "Hash:".dimmed(), &result.hash[..16]);

    Ok(ExitCode::SUCCESS)
}

/// Run generate with machine-readable JSON output
fn run_json(args: &GenerateArgs) -> Result<ExitCode> {
    match generate_json(args) {
        Ok(result) => {
            let output = GenerateOutput::success(result);
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            let output = GenerateOutput::failure(vec![error]);
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(ExitCode::from(1))
        }
    }
}

fn generate_json(args: &GenerateArgs) -> Result<GenerateResult, JsonError> {
    let config = load_config(args).map_err(|e| {
        let error = JsonError::new(error_codes::CONFIG_PARSE, format!("{:#}", e));
        match &args.config {
            Some(path) => error.with_file(path),
            None => error,
        }
    })?;
    let config = apply_overrides(config, args).map_err(|e| library_error(&e))?;
    let format = resolve_format(args)
        .map_err(|e| JsonError::new(error_codes::UNKNOWN_FORMAT, format!("{:#}", e)))?;
    let output_path = resolve_output_path(&args.input, args.output.as_deref(), format);
    let options = resolve_output_options(args, format);

    let bytes = fs::read(&args.input).map_err(|e| {
        JsonError::new(error_codes::FILE_READ, format!("Failed to read input: {}", e))
            .with_file(&args.input)
    })?;
    let result = generate_from_bytes(&DefaultBackend::new(), &bytes, &config, &options)
        .map_err(|e| library_error(&e).with_file(&args.input))?;
    let result = save_normal_map(&result, &output_path).map_err(|e| {
        JsonError::new(error_codes::FILE_WRITE, format!("Failed to write output: {}", e))
            .with_file(output_path.display().to_string())
    })?;

    Ok(GenerateResult {
        input: args.input.clone(),
        output: output_path.display().to_string(),
        format: format.to_string(),
        width: result.width,
        height: result.height,
        hash: result.hash,
        config,
    })
}

fn library_error(error: &NormalMapError) -> JsonError {
    JsonError::new(error.code(), error.to_string())
}

/// Build the generation config from the optional config file and flags.
pub fn resolve_config(args: &GenerateArgs) -> Result<GenerationConfig> {
    let config = load_config(args)?;
    Ok(apply_overrides(config, args)?)
}

/// Config file contents, or the defaults when no file was given.
fn load_config(args: &GenerateArgs) -> Result<GenerationConfig> {
    match &args.config {
        Some(path) => config::load(Path::new(path)),
        None => Ok(GenerationConfig::default()),
    }
}

/// Apply command-line flags on top of `config` and validate the result.
fn apply_overrides(
    mut config: GenerationConfig,
    args: &GenerateArgs,
) -> Result<GenerationConfig, NormalMapError> {
    if let Some(kernel) = &args.kernel {
        config.kernel = kernel
            .parse::<KernelType>()
            .map_err(NormalMapError::InvalidInput)?;
    }
    if let Some(strength) = args.strength {
        config.strength = strength;
    }
    if args.invert {
        config.invert = true;
    }
    if args.keep_large_detail {
        config.keep_large_detail = true;
    }
    if let Some(scale) = args.large_detail_scale {
        config = config.with_large_detail(scale);
    }

    config.validate()?;
    Ok(config)
}

/// Pick the output format: explicit flag, then output extension, then PNG.
pub fn resolve_format(args: &GenerateArgs) -> Result<OutputFormat> {
    if let Some(format) = &args.format {
        return format.parse::<OutputFormat>().map_err(anyhow::Error::msg);
    }

    let ext = args
        .output
        .as_deref()
        .and_then(|o| Path::new(o).extension())
        .and_then(|e| e.to_str());
    match ext {
        Some(ext) => OutputFormat::from_extension(ext).ok_or_else(|| {
            anyhow::anyhow!(
                "cannot infer output format from extension '.{}' (use --format png|jpeg)",
                ext
            )
        }),
        None => Ok(OutputFormat::Png),
    }
}

/// Output path, defaulting to `<stem>_normal.<ext>` in the input's directory.
pub fn resolve_output_path(input: &str, output: Option<&str>, format: OutputFormat) -> PathBuf {
    if let Some(output) = output {
        return PathBuf::from(output);
    }
    let input = Path::new(input);
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{}_normal.{}", stem, format.extension()))
}

fn resolve_output_options(args: &GenerateArgs, format: OutputFormat) -> OutputOptions {
    let blur = if args.no_blur {
        None
    } else {
        let defaults = BlurSettings::default();
        Some(BlurSettings {
            radius: args.blur_radius.unwrap_or(defaults.radius),
            sigma: args.blur_sigma.unwrap_or(defaults.sigma),
        })
    };
    OutputOptions::default().with_format(format).with_blur(blur)
}
