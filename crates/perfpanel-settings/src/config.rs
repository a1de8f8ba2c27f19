//! Configuration and settings management for PerfPanel
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats.
//!
//! Configuration is organized into logical sections:
//! - Generation parameters (reference resolution, random and radial tuning)
//! - Export parameters (SVG pixel density, DXF annotation offsets, PDF margins)
//! - Image-driven generation defaults

use perfpanel_camtools::ImageDrivenSettings;
use perfpanel_core::{Error, Result};
use perfpanel_designer::GeneratorConfig;
use perfpanel_export::ExportConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Format implied by a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            _ => Err(Error::config("Config file must be .json or .toml")),
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
/// Missing sections and fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Pattern generator parameters
    pub generation: GeneratorConfig,
    /// Serializer parameters
    pub export: ExportConfig,
    /// Image-driven generator defaults
    pub image: ImageDrivenSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse config text in the given format
    pub fn from_str_with_format(content: &str, format: ConfigFormat) -> Result<Self> {
        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(content)
                .map_err(|e| Error::config(format!("Invalid JSON config: {}", e)))?,
            ConfigFormat::Toml => toml::from_str(content)
                .map_err(|e| Error::config(format!("Invalid TOML config: {}", e)))?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Serialize config in the given format
    pub fn to_string_with_format(&self, format: ConfigFormat) -> Result<String> {
        match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self)
                .map_err(|e| Error::config(format!("Failed to serialize config: {}", e))),
            ConfigFormat::Toml => toml::to_string_pretty(self)
                .map_err(|e| Error::config(format!("Failed to serialize config: {}", e))),
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read config file: {}", e)))?;
        Self::from_str_with_format(&content, format)
    }

    /// Load config from a file if given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;
        let format = ConfigFormat::from_path(path)?;
        let content = self.to_string_with_format(format)?;

        std::fs::write(path, content)
            .map_err(|e| Error::config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let generation = &self.generation;
        if !generation.reference_dpi.is_finite() || generation.reference_dpi <= 0.0 {
            return Err(Error::config("Reference DPI must be > 0"));
        }
        if !(0.0..=1.0).contains(&generation.random_density) {
            return Err(Error::config("Random density must be between 0 and 1"));
        }
        if !generation.random_rotation_jitter_deg.is_finite()
            || generation.random_rotation_jitter_deg < 0.0
        {
            return Err(Error::config("Random rotation jitter must be >= 0"));
        }
        if !generation.radial_angle_factor_deg.is_finite()
            || generation.radial_angle_factor_deg <= 0.0
        {
            return Err(Error::config("Radial angle factor must be > 0"));
        }

        let export = &self.export;
        if !export.svg_px_per_inch.is_finite() || export.svg_px_per_inch <= 0.0 {
            return Err(Error::config("SVG pixels per inch must be > 0"));
        }
        if !export.dxf_text_height.is_finite() || export.dxf_text_height <= 0.0 {
            return Err(Error::config("DXF text height must be > 0"));
        }
        for (name, value) in [
            ("DXF dimension gap", export.dxf_dimension_gap),
            ("DXF text offset", export.dxf_text_offset),
            ("PDF margin", export.pdf_margin_pt),
            ("PDF custom page margin", export.pdf_custom_margin_units),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::config(format!("{} must be >= 0", name)));
            }
        }

        self.image
            .validate()
            .map_err(|e| Error::config(format!("Image settings: {}", e)))?;

        Ok(())
    }
}
