use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use colored::*;
use photopipe_core::configs::pipeline::{DescriberPreset, GeometricModel, PipelineConfig};
use photopipe_core::configs::toolchain::{load_toolchain_config, ToolchainConfig};
use photopipe_core::Pipeline;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// Photopipe - OpenMVG/OpenMVS pipeline
#[derive(Parser, Debug)]
#[command(name = "photopipe")]
#[command(about = "Reconstruct a textured mesh from a folder of images with OpenMVG and OpenMVS")]
#[command(version)]
struct Cli {
    /// Input images folder
    #[arg(long, value_parser = existing_dir, help_heading = "Required arguments")]
    input: PathBuf,

    /// Output path
    #[arg(long, help_heading = "Required arguments")]
    output: PathBuf,

    /// Pixel focal length, for cameras missing from the sensor database.
    /// max(width-pixels, height-pixels) * focal length(mm) / sensor width
    #[arg(long, help_heading = "OpenMVG Image Listing")]
    flength: Option<f64>,

    /// Image describer configuration: NORMAL (default), HIGH or ULTRA
    #[arg(long, value_parser = str::parse::<DescriberPreset>, help_heading = "OpenMVG Compute Features")]
    dpreset: Option<DescriberPreset>,

    /// Geometric model: f = fundamental (default, incremental SfM),
    /// e = essential (global SfM), h = homography (shared projection point)
    #[arg(long, value_parser = str::parse::<GeometricModel>, help_heading = "OpenMVG Compute Matches")]
    geomodel: Option<GeometricModel>,

    /// YAML file overriding tool install locations
    #[arg(long)]
    toolchain: Option<PathBuf>,

    /// Print the planned steps without running them
    #[arg(long)]
    dry_run: bool,
}

fn existing_dir(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.is_dir() {
        Ok(path)
    } else {
        Err(format!("'{}' is not an existing directory", value))
    }
}

impl Cli {
    fn into_config(self) -> Result<PipelineConfig> {
        let toolchain = match &self.toolchain {
            Some(path) => load_toolchain_config(path)?,
            None => ToolchainConfig::default(),
        };

        // Steps run in several working directories, so relative paths would
        // resolve differently from one step to the next
        let input = std::path::absolute(&self.input)?;
        let output = std::path::absolute(&self.output)?;

        Ok(PipelineConfig::new(input, output)
            .with_focal_length(self.flength)
            .with_describer_preset(self.dpreset)
            .with_geometric_model(self.geomodel)
            .with_toolchain(toolchain))
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> Result<()> {
    let dry_run = cli.dry_run;
    let config = cli.into_config()?;
    debug!(?config, "parsed configuration");
    let pipeline = Pipeline::new(config)?;

    // CLI layer only handles presentation
    if dry_run {
        commands::plan::execute(&pipeline)
    } else {
        commands::run::execute(&pipeline).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_requires_input_and_output() {
        let err = Cli::try_parse_from(["photopipe", "--output", "./out"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_input_must_exist() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("nope");
        let err = Cli::try_parse_from([
            "photopipe",
            "--input",
            missing.to_str().unwrap(),
            "--output",
            "./out",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_optional_flags_parse() {
        let temp_dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from([
            "photopipe",
            "--input",
            temp_dir.path().to_str().unwrap(),
            "--output",
            "./out",
            "--flength",
            "2400.5",
            "--dpreset",
            "high",
            "--geomodel",
            "e",
        ])
        .unwrap();

        assert_eq!(cli.flength, Some(2400.5));
        assert_eq!(cli.dpreset, Some(DescriberPreset::High));
        assert_eq!(cli.geomodel, Some(GeometricModel::Essential));
        assert!(!cli.dry_run);

        let config = cli.into_config().unwrap();
        assert_eq!(config.toolchain, ToolchainConfig::default());
    }

    #[test]
    fn test_relative_paths_become_absolute() {
        let cli = Cli::try_parse_from(["photopipe", "--input", ".", "--output", "./out"]).unwrap();

        let config = cli.into_config().unwrap();

        let cwd = std::env::current_dir().unwrap();
        assert!(config.input_dir.is_absolute());
        assert!(config.output_dir.is_absolute());
        assert!(config.input_dir.starts_with(&cwd));
        assert_eq!(config.output_dir, cwd.join("out"));
    }

    #[test]
    fn test_rejects_unknown_geometric_model() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = Cli::try_parse_from([
            "photopipe",
            "--input",
            temp_dir.path().to_str().unwrap(),
            "--output",
            "./out",
            "--geomodel",
            "x",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_toolchain_file_feeds_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let toolchain = temp_dir.path().join("toolchain.yml");
        std::fs::write(&toolchain, "openmvgBin: /srv/openmvg/bin\n").unwrap();

        let cli = Cli::try_parse_from([
            "photopipe",
            "--input",
            temp_dir.path().to_str().unwrap(),
            "--output",
            "./out",
            "--toolchain",
            toolchain.to_str().unwrap(),
            "--dry-run",
        ])
        .unwrap();
        assert!(cli.dry_run);

        let config = cli.into_config().unwrap();
        assert_eq!(config.toolchain.openmvg_bin, PathBuf::from("/srv/openmvg/bin"));
    }
}
