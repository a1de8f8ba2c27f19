//! # PerfPanel CAM Tools
//!
//! Image processing that feeds perforation layout.
//!
//! ## Tools Included
//!
//! - **Image Analysis**: decodes rasters and reports brightness statistics plus
//!   the luma grid used for per-position sizing
//! - **Image-Driven Generator**: samples a brightness grid directly and places
//!   perforations on pixels that pass a threshold, with an optional preview
//!   image marking every sample

pub mod error;
pub mod image_analysis;
pub mod image_driven;

pub use error::{CamToolError, CamToolResult, ParameterError};
pub use image_analysis::{
    analyze_file, analyze_image, analyze_image_resized, luma_grid, open_image, ImageAnalysis,
    ImageStatistics,
};
pub use image_driven::{
    render_preview, ImageDrivenGenerator, ImageDrivenResult, ImageDrivenSettings,
    ImageDrivenSummary, SampleMark,
};
