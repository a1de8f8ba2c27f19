//! Command line interface
//!
//! Reads request bodies from JSON files, runs them through
//! [`PerfPanelService`] and writes the results next to the caller.

use crate::service::{ExportRequest, GenerationRequest, ImageRequest, PerfPanelService};
use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use perfpanel_camtools::{analyze_image_resized, open_image, render_preview};
use perfpanel_core::{parse_length, PanelSpec, PanelUnits, ShapeKind};
use perfpanel_export::{ExportFormat, ExportPayload, ExportSettings};
use perfpanel_settings::Config;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::info;

/// Largest image dimension analysed by the `image` command
const MAX_ANALYSIS_DIMENSION: u32 = 1024;

#[derive(Parser, Debug)]
#[command(name = "perfpanel")]
#[command(about = "Perforated panel pattern generator and exporter")]
#[command(version)]
pub struct Cli {
    /// Settings file (.json or .toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate perforations from a generation request
    Generate {
        /// Request body (JSON)
        #[arg(short, long)]
        request: PathBuf,

        /// Response file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Seed for the random pattern
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Serialize perforations from an export request
    Export {
        /// Request body (JSON)
        #[arg(short, long)]
        request: PathBuf,

        /// Directory receiving the exported file
        #[arg(short = 'd', long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Place perforations directly from an image
    Image {
        /// Input image file
        #[arg(short, long)]
        input: PathBuf,

        /// Panel width, e.g. `24`, `8 1/2` or `3/4` for inches; the image
        /// is scaled to fit inside the panel
        #[arg(long)]
        width: String,

        /// Panel height, same forms as the width
        #[arg(long)]
        height: String,

        /// Panel units (inches or mm)
        #[arg(long, default_value = "inches")]
        units: PanelUnits,

        /// Brightness threshold (0-255)
        #[arg(short, long)]
        threshold: Option<u8>,

        /// Place on bright pixels instead of dark ones
        #[arg(long)]
        invert: bool,

        /// Perforation shape
        #[arg(long)]
        shape: Option<ShapeKind>,

        /// Export format; the response JSON is written when omitted
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// Write a preview PNG of the sampled pixels
        #[arg(long)]
        preview: Option<PathBuf>,

        /// Directory receiving output files
        #[arg(short = 'd', long, default_value = ".")]
        output_dir: PathBuf,
    },
}

/// Execute a parsed command line
pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load_or_default(cli.config.as_deref())
        .context("Failed to load settings")?;
    let service = PerfPanelService::new(config);

    match cli.command {
        Command::Generate {
            request,
            output,
            seed,
        } => {
            let request: GenerationRequest = read_json(&request)?;
            let response = service.generate_seeded(&request, seed)?;
            let body = serde_json::to_string_pretty(&response)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, body)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!("Wrote {}", path.display());
                }
                None => println!("{}", body),
            }
        }
        Command::Export {
            request,
            output_dir,
        } => {
            let request: ExportRequest = read_json(&request)?;
            let payload = service.export(&request, Utc::now())?;
            write_payload(&output_dir, &payload)?;
        }
        Command::Image {
            input,
            width,
            height,
            units,
            threshold,
            invert,
            shape,
            format,
            preview,
            output_dir,
        } => {
            let img = open_image(&input)?;
            let analysis = analyze_image_resized(&img, MAX_ANALYSIS_DIMENSION);
            info!(
                width = analysis.width,
                height = analysis.height,
                mean = analysis.statistics.mean,
                "Analysed {}",
                input.display()
            );

            let panel = PanelSpec::new(
                parse_length(&width, units).context("Invalid --width")?,
                parse_length(&height, units).context("Invalid --height")?,
                units,
            );
            let mut settings = service.config().image.clone();
            if let Some(threshold) = threshold {
                settings.threshold = threshold;
            }
            if let Some(shape) = shape {
                settings.shape = shape;
            }
            settings.invert |= invert;

            let request = ImageRequest {
                panel_dimensions: Some(panel),
                settings: Some(settings),
            };
            let response = service.generate_from_image(&analysis, &request)?;

            if let (Some(path), Some(grid)) = (preview, analysis.grid.as_ref()) {
                render_preview(grid, &response.result)
                    .save(&path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                info!("Wrote preview {}", path.display());
            }

            match format {
                Some(format) => {
                    let export = ExportRequest {
                        format: None,
                        panel_dimensions: panel,
                        perforations: response.result.perforations,
                        settings: ExportSettings::new(format, units),
                    };
                    let payload = service.export(&export, Utc::now())?;
                    write_payload(&output_dir, &payload)?;
                }
                None => {
                    let path = output_dir.join("perforations.json");
                    std::fs::write(&path, serde_json::to_string_pretty(&response)?)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!("Wrote {}", path.display());
                }
            }
        }
    }

    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid request in {}", path.display()))
}

fn write_payload(dir: &Path, payload: &ExportPayload) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(&payload.filename);
    std::fs::write(&path, &payload.bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(mime = %payload.mime_type, "Wrote {}", path.display());
    Ok(path)
}
