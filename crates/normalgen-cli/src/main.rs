//! normalgen CLI - Command-line interface for normal map generation
//!
//! Turns height or albedo textures into tangent-space normal maps.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use normalgen_cli::commands;
use normalgen_cli::commands::generate::GenerateArgs;
use normalgen_cli::logging;

/// normalgen - Normal map generator
#[derive(Parser)]
#[command(name = "normalgen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a normal map from an image
    Generate {
        /// Path to the input image (PNG or JPEG)
        #[arg(short, long)]
        input: String,

        /// Output file path (default: <input stem>_normal.<ext> beside the input)
        #[arg(short, long)]
        output: Option<String>,

        /// JSON generation config; flags override its values
        #[arg(short, long)]
        config: Option<String>,

        /// Gradient kernel
        #[arg(short, long, value_parser = ["sobel", "prewitt"])]
        kernel: Option<String>,

        /// Normal strength (default: 2.5)
        #[arg(short, long)]
        strength: Option<f64>,

        /// Treat dark pixels as high
        #[arg(long)]
        invert: bool,

        /// Blend in a reduced-resolution normal map
        #[arg(long)]
        keep_large_detail: bool,

        /// Resolution factor of the large-detail pass, in (0, 1]; implies --keep-large-detail
        #[arg(long)]
        large_detail_scale: Option<f64>,

        /// Output format (default: from the output extension, else png)
        #[arg(short, long, value_parser = ["png", "jpeg", "jpg"])]
        format: Option<String>,

        /// Skip the final gaussian blur
        #[arg(long)]
        no_blur: bool,

        /// Blur kernel radius in pixels (default: 5)
        #[arg(long, conflicts_with = "no_blur")]
        blur_radius: Option<u32>,

        /// Blur standard deviation (default: 1.0)
        #[arg(long, conflicts_with = "no_blur")]
        blur_sigma: Option<f64>,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Print the default generation config as JSON
    Config {
        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Generate {
            input,
            output,
            config,
            kernel,
            strength,
            invert,
            keep_large_detail,
            large_detail_scale,
            format,
            no_blur,
            blur_radius,
            blur_sigma,
            json,
        } => {
            let args = GenerateArgs {
                input,
                output,
                config,
                kernel,
                strength,
                invert,
                keep_large_detail,
                large_detail_scale,
                format,
                no_blur,
                blur_radius,
                blur_sigma,
            };
            commands::generate::run(&args, json)
        }
        Commands::Config { output } => commands::config::run(output.as_deref()),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_generate_minimal() {
        let cli = Cli::try_parse_from(["normalgen", "generate", "-i", "bricks.png"]).unwrap();
        assert!(!cli.verbose);
        match cli.command {
            Commands::Generate {
                input,
                output,
                kernel,
                strength,
                no_blur,
                json,
                ..
            } => {
                assert_eq!(input, "bricks.png");
                assert!(output.is_none());
                assert!(kernel.is_none());
                assert!(strength.is_none());
                assert!(!no_blur);
                assert!(!json);
            }
            _ => panic!("expected generate command"),
        }
    }

    #[test]
    fn test_cli_parses_generate_full() {
        let cli = Cli::try_parse_from([
            "normalgen",
            "--verbose",
            "generate",
            "--input",
            "a.png",
            "--output",
            "b.jpg",
            "--kernel",
            "prewitt",
            "--strength",
            "1.5",
            "--invert",
            "--large-detail-scale",
            "0.5",
            "--blur-radius",
            "3",
            "--json",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Generate {
                output,
                kernel,
                strength,
                invert,
                large_detail_scale,
                blur_radius,
                json,
                ..
            } => {
                assert_eq!(output.as_deref(), Some("b.jpg"));
                assert_eq!(kernel.as_deref(), Some("prewitt"));
                assert_eq!(strength, Some(1.5));
                assert!(invert);
                assert_eq!(large_detail_scale, Some(0.5));
                assert_eq!(blur_radius, Some(3));
                assert!(json);
            }
            _ => panic!("expected generate command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_kernel() {
        let result = Cli::try_parse_from(["normalgen", "generate", "-i", "a.png", "-k", "laplace"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_rejects_blur_radius_with_no_blur() {
        let result = Cli::try_parse_from([
            "normalgen",
            "generate",
            "-i",
            "a.png",
            "--no-blur",
            "--blur-radius",
            "2",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parses_config() {
        let cli = Cli::try_parse_from(["normalgen", "config", "-o", "normalgen.json"]).unwrap();
        match cli.command {
            Commands::Config { output } => assert_eq!(output.as_deref(), Some("normalgen.json")),
            _ => panic!("expected config command"),
        }
    }
}
