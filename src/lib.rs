//! # PerfPanel
//!
//! Perforated panel designer: lays out perforation patterns on a rectangular
//! sheet, sizes them from image brightness, reports coverage statistics and
//! exports the result as SVG, DXF or PDF.
//!
//! ## Architecture
//!
//! PerfPanel is organized as a workspace with multiple crates:
//!
//! 1. **perfpanel-core** - Units, data model, error taxonomy
//! 2. **perfpanel-designer** - Placement algorithms, brightness mapping, statistics
//! 3. **perfpanel-camtools** - Image analysis and the image-driven generator
//! 4. **perfpanel-export** - SVG, DXF and PDF serializers
//! 5. **perfpanel-settings** - Configuration files
//! 6. **perfpanel** - Request facade and the command line binary
//!
//! ## Features
//!
//! - **Patterns**: grid, staggered, random (seedable) and radial
//! - **Shapes**: circle, square, rectangle, hexagon, triangle
//! - **Brightness Sizing**: image mean or per-position grid sampling
//! - **Export**: display SVG, layered DXF R12, printable PDF

pub mod cli;
pub mod service;

pub use perfpanel_camtools as camtools;
pub use perfpanel_designer as designer;
pub use perfpanel_export as export;

pub use perfpanel_core::{
    convert_length, format_dimension, Error, ExportError, GenerationError, PanelSpec, PanelUnits,
    PatternKind, Perforation, PerforationSettings, Point, Result, ShapeKind, Spacing, Statistics,
};

pub use perfpanel_designer::{
    compute_statistics, map_size, BrightnessGrid, BrightnessSample, GeneratorConfig,
    PatternGenerator,
};

pub use perfpanel_camtools::{
    analyze_file, analyze_image, ImageAnalysis, ImageDrivenGenerator, ImageDrivenSettings,
};

pub use perfpanel_export::{ExportConfig, ExportFormat, ExportPayload, ExportSettings};

pub use perfpanel_settings::{Config, ConfigFormat};

pub use service::{
    ExportRequest, GenerationRequest, GenerationResponse, ImageRequest, ImageResponse,
    PerfPanelService,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr, leaving stdout for command output
/// - RUST_LOG environment variable support
/// - `info` level unless RUST_LOG says otherwise
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
