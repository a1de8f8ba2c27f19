//! Data models for panels, perforation settings and perforation primitives
//!
//! This module provides:
//! - Panel specification (width, height, units)
//! - Generation settings (shape, pattern, spacing, size bounds)
//! - Perforation primitives produced by the generators
//! - Aggregate statistics consumed by the UI and reports
//!
//! Every type serializes with camelCase field names and lower-case enum
//! values so it round-trips through the JSON bodies used by the web host.

use crate::error::GenerationError;
use crate::units::PanelUnits;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 2D point in panel space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate, increasing to the right
    pub x: f64,
    /// Vertical coordinate, increasing downward
    pub y: f64,
}

impl Point {
    /// Create a new point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Check that both coordinates are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Rectangular sheet being perforated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelSpec {
    /// Panel width in `units`
    pub width: f64,
    /// Panel height in `units`
    pub height: f64,
    /// Physical unit of width, height and every primitive position
    #[serde(default)]
    pub units: PanelUnits,
}

impl PanelSpec {
    /// Create a new panel specification
    pub fn new(width: f64, height: f64, units: PanelUnits) -> Self {
        Self {
            width,
            height,
            units,
        }
    }

    /// Panel area in square `units`
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Reject non-finite or negative extents.
    ///
    /// Zero-width or zero-height panels pass; they simply produce no output.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if !self.width.is_finite()
            || !self.height.is_finite()
            || self.width < 0.0
            || self.height < 0.0
        {
            return Err(GenerationError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// True when the panel encloses no area
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Perforation shape
///
/// `Unknown` absorbs any unrecognized value coming from JSON and, like
/// `Custom`, renders and measures as a circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Round hole, `size` is the diameter
    Circle,
    /// Square hole, `size` is the edge length
    Square,
    /// 4:3 slot, `size` is the long edge
    Rectangle,
    /// Regular hexagon, `size` is the vertex-to-vertex diameter
    Hexagon,
    /// Equilateral triangle, `size` is the edge length
    Triangle,
    /// User-defined outline, rendered as a circle
    Custom,
    /// Unrecognized shape name
    #[serde(other)]
    Unknown,
}

impl Default for ShapeKind {
    fn default() -> Self {
        Self::Circle
    }
}

impl ShapeKind {
    /// Returns the name of the shape.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Square => "square",
            Self::Rectangle => "rectangle",
            Self::Hexagon => "hexagon",
            Self::Triangle => "triangle",
            Self::Custom => "custom",
            Self::Unknown => "unknown",
        }
    }

    /// True for shapes drawn with the circle renderer
    pub fn renders_as_circle(&self) -> bool {
        matches!(self, Self::Circle | Self::Custom | Self::Unknown)
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ShapeKind {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "circle" => Ok(Self::Circle),
            "square" => Ok(Self::Square),
            "rectangle" => Ok(Self::Rectangle),
            "hexagon" => Ok(Self::Hexagon),
            "triangle" => Ok(Self::Triangle),
            "custom" => Ok(Self::Custom),
            _ => Err(GenerationError::InvalidShape {
                shape: s.to_string(),
            }),
        }
    }
}

/// Placement algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    /// Regular rows and columns, centered on the panel
    Grid,
    /// Grid with odd rows shifted by half the horizontal spacing
    Staggered,
    /// Uniform random scatter
    Random,
    /// Concentric rings around the panel center
    Radial,
    /// Caller-supplied placement; has no generator
    Custom,
    /// Unrecognized pattern name
    #[serde(other)]
    Unknown,
}

impl Default for PatternKind {
    fn default() -> Self {
        Self::Grid
    }
}

impl PatternKind {
    /// Returns the name of the pattern.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::Staggered => "staggered",
            Self::Random => "random",
            Self::Radial => "radial",
            Self::Custom => "custom",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for PatternKind {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "grid" => Ok(Self::Grid),
            "staggered" => Ok(Self::Staggered),
            "random" => Ok(Self::Random),
            "radial" => Ok(Self::Radial),
            "custom" => Ok(Self::Custom),
            _ => Err(GenerationError::InvalidPattern {
                pattern: s.to_string(),
            }),
        }
    }
}

/// Center-to-center spacing between perforations, in panel units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spacing {
    /// Column pitch; ring pitch for radial patterns
    pub horizontal: f64,
    /// Row pitch; angular step (x10 degrees) for radial patterns
    pub vertical: f64,
    /// Optional diagonal pitch, carried for the UI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagonal: Option<f64>,
}

impl Spacing {
    /// Create spacing with equal horizontal and vertical pitch
    pub fn uniform(pitch: f64) -> Self {
        Self {
            horizontal: pitch,
            vertical: pitch,
            diagonal: None,
        }
    }
}

impl Default for Spacing {
    fn default() -> Self {
        Self::uniform(1.0)
    }
}

/// Pattern generation settings
///
/// `max_size >= min_size` is validated by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerforationSettings {
    /// Smallest perforation size
    pub min_size: f64,
    /// Largest perforation size
    pub max_size: f64,
    /// Perforation shape
    #[serde(default)]
    pub shape: ShapeKind,
    /// Placement algorithm
    #[serde(default)]
    pub pattern: PatternKind,
    /// Center-to-center spacing
    #[serde(default)]
    pub spacing: Spacing,
    /// Base rotation in degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    /// Fill ratio for the random pattern (0..1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density: Option<f64>,
    /// Map bright pixels to small holes instead of large ones
    #[serde(default)]
    pub invert_brightness: bool,
}

impl Default for PerforationSettings {
    fn default() -> Self {
        Self {
            min_size: 0.25,
            max_size: 0.5,
            shape: ShapeKind::Circle,
            pattern: PatternKind::Grid,
            spacing: Spacing::default(),
            rotation: None,
            density: None,
            invert_brightness: false,
        }
    }
}

impl PerforationSettings {
    /// Size used when no brightness data drives the pattern
    pub fn mid_size(&self) -> f64 {
        (self.min_size + self.max_size) / 2.0
    }

    /// Base rotation, defaulting to zero
    pub fn base_rotation(&self) -> f64 {
        self.rotation.unwrap_or(0.0)
    }
}

/// A single perforation primitive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Perforation {
    /// Unique within one generation batch
    pub id: String,
    /// Center position in panel units
    pub position: Point,
    /// Diameter or edge length, depending on shape
    pub size: f64,
    /// Shape of the hole
    pub shape: ShapeKind,
    /// Rotation in degrees
    pub rotation: f64,
}

impl Perforation {
    /// Create a new perforation
    pub fn new(
        id: impl Into<String>,
        position: Point,
        size: f64,
        shape: ShapeKind,
        rotation: f64,
    ) -> Self {
        Self {
            id: id.into(),
            position,
            size,
            shape,
            rotation,
        }
    }
}

/// Aggregate geometry statistics for a perforation set
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Number of perforations
    pub total_perforations: usize,
    /// Panel area in square panel units
    pub total_area: f64,
    /// Sum of all perforation areas
    pub total_perforation_area: f64,
    /// Open area as a percentage of the panel, 2 decimals
    pub coverage: f64,
    /// Mean perforation size
    pub average_size: f64,
    /// Smallest perforation size
    pub min_size: f64,
    /// Largest perforation size
    pub max_size: f64,
    /// Perforations per square unit, 2 decimals
    pub density: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_validation() {
        assert!(PanelSpec::new(24.0, 36.0, PanelUnits::Inches).validate().is_ok());
        assert!(PanelSpec::new(0.0, 36.0, PanelUnits::Inches).validate().is_ok());
        assert!(PanelSpec::new(-1.0, 36.0, PanelUnits::Inches).validate().is_err());
        assert!(PanelSpec::new(f64::NAN, 36.0, PanelUnits::Inches).validate().is_err());
        assert!(PanelSpec::new(f64::INFINITY, 1.0, PanelUnits::Mm).validate().is_err());
    }

    #[test]
    fn test_unknown_shape_deserializes_leniently() {
        let shape: ShapeKind = serde_json::from_str("\"star\"").unwrap();
        assert_eq!(shape, ShapeKind::Unknown);
        assert!(shape.renders_as_circle());
        assert!("star".parse::<ShapeKind>().is_err());
    }

    #[test]
    fn test_unknown_pattern_deserializes_to_unknown() {
        let pattern: PatternKind = serde_json::from_str("\"spiral\"").unwrap();
        assert_eq!(pattern, PatternKind::Unknown);
        assert!(matches!(
            "spiral".parse::<PatternKind>(),
            Err(GenerationError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_settings_from_camel_case_json() {
        let json = r#"{
            "minSize": 0.25,
            "maxSize": 0.75,
            "shape": "hexagon",
            "pattern": "staggered",
            "spacing": { "horizontal": 1.0, "vertical": 0.866 }
        }"#;
        let settings: PerforationSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.shape, ShapeKind::Hexagon);
        assert_eq!(settings.pattern, PatternKind::Staggered);
        assert_eq!(settings.mid_size(), 0.5);
        assert_eq!(settings.base_rotation(), 0.0);
        assert!(!settings.invert_brightness);
    }

    #[test]
    fn test_statistics_serialize_camel_case() {
        let json = serde_json::to_value(Statistics::default()).unwrap();
        assert!(json.get("totalPerforations").is_some());
        assert!(json.get("totalPerforationArea").is_some());
        assert!(json.get("averageSize").is_some());
    }
}
