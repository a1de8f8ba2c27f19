//! Export settings and serializer tuning.

use chrono::{DateTime, Utc};
use perfpanel_core::constants::SVG_PX_PER_INCH;
use perfpanel_core::{ExportError, PanelUnits};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Gap between the panel edge and a DXF dimension line, export units
pub const DEFAULT_DXF_DIMENSION_GAP: f64 = 0.5;
/// Extra offset from a DXF dimension line to its text, export units
pub const DEFAULT_DXF_TEXT_OFFSET: f64 = 0.2;
/// DXF dimension text height, export units
pub const DEFAULT_DXF_TEXT_HEIGHT: f64 = 0.25;
/// PDF page margin in points
pub const DEFAULT_PDF_MARGIN_PT: f64 = 36.0;
/// Extra page extent around the panel for custom PDF pages, export units
pub const DEFAULT_PDF_CUSTOM_MARGIN_UNITS: f64 = 2.0;

/// Output geometry format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Svg,
    Dxf,
    Pdf,
}

impl ExportFormat {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Dxf => "dxf",
            Self::Pdf => "pdf",
        }
    }

    /// MIME type of the payload
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Svg => "image/svg+xml",
            Self::Dxf => "application/dxf",
            Self::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "dxf" => Ok(Self::Dxf),
            "pdf" => Ok(Self::Pdf),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Name and ACI colour of one CAD layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub name: String,
    pub color: i16,
}

impl LayerSpec {
    pub fn new(name: impl Into<String>, color: i16) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

/// CAD layer names and colours
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerSettings {
    pub outline: LayerSpec,
    pub perforations: LayerSpec,
    pub dimensions: LayerSpec,
}

impl Default for LayerSettings {
    fn default() -> Self {
        Self {
            outline: LayerSpec::new("OUTLINE", 7),
            perforations: LayerSpec::new("PERFORATIONS", 1),
            dimensions: LayerSpec::new("DIMENSIONS", 3),
        }
    }
}

/// Named PDF page sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    Letter,
    Legal,
    Tabloid,
    A4,
    A3,
    /// Panel plus a fixed border
    Custom,
}

impl PageSize {
    /// Portrait size in points, `None` for custom pages
    pub fn points(&self) -> Option<(f64, f64)> {
        match self {
            Self::Letter => Some((612.0, 792.0)),
            Self::Legal => Some((612.0, 1008.0)),
            Self::Tabloid => Some((792.0, 1224.0)),
            Self::A4 => Some((595.28, 841.89)),
            Self::A3 => Some((841.89, 1190.55)),
            Self::Custom => None,
        }
    }
}

/// Page orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// PDF page setup
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PdfSettings {
    pub page_size: PageSize,
    pub orientation: Orientation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Timestamp printed in the footer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
}

fn default_scale() -> f64 {
    1.0
}

/// Per-request export options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSettings {
    pub format: ExportFormat,
    #[serde(default)]
    pub units: PanelUnits,
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default)]
    pub include_outline: bool,
    #[serde(default)]
    pub include_dimensions: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_settings: Option<LayerSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_settings: Option<PdfSettings>,
}

impl ExportSettings {
    /// Settings for `format` with outline and dimensions enabled
    pub fn new(format: ExportFormat, units: PanelUnits) -> Self {
        Self {
            format,
            units,
            scale: 1.0,
            include_outline: true,
            include_dimensions: true,
            layer_settings: None,
            pdf_settings: None,
        }
    }

    /// Layers in effect
    pub fn layers(&self) -> LayerSettings {
        self.layer_settings.clone().unwrap_or_default()
    }

    /// PDF page setup in effect
    pub fn pdf(&self) -> PdfSettings {
        self.pdf_settings.clone().unwrap_or_default()
    }
}

/// Serializer constants that callers may override
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub svg_px_per_inch: f64,
    pub dxf_dimension_gap: f64,
    pub dxf_text_offset: f64,
    pub dxf_text_height: f64,
    pub pdf_margin_pt: f64,
    pub pdf_custom_margin_units: f64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            svg_px_per_inch: SVG_PX_PER_INCH,
            dxf_dimension_gap: DEFAULT_DXF_DIMENSION_GAP,
            dxf_text_offset: DEFAULT_DXF_TEXT_OFFSET,
            dxf_text_height: DEFAULT_DXF_TEXT_HEIGHT,
            pdf_margin_pt: DEFAULT_PDF_MARGIN_PT,
            pdf_custom_margin_units: DEFAULT_PDF_CUSTOM_MARGIN_UNITS,
        }
    }
}
