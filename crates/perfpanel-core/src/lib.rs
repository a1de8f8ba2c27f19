//! # PerfPanel Core
//!
//! Core types, unit conversion, and error taxonomy for PerfPanel.
//! Provides the fundamental data model shared by the pattern generators,
//! the statistics calculator and the geometry serializers.

pub mod constants;
pub mod data;
pub mod error;
pub mod units;

pub use data::{
    PanelSpec, PatternKind, Perforation, PerforationSettings, Point, ShapeKind, Spacing,
    Statistics,
};

pub use error::{Error, ExportError, GenerationError, Result};

pub use units::{
    convert_length, format_dimension, from_compute_units, parse_length, to_compute_units,
    PanelUnits,
};
