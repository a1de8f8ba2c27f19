//! Unit conversion and validation shared by the serializers.

use crate::settings::ExportSettings;
use perfpanel_core::{convert_length, ExportError, PanelSpec, PanelUnits, Perforation, Point};
use perfpanel_designer::ShapeOutline;

/// Panel extent in export units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportPanel {
    /// Scaled width
    pub width: f64,
    /// Scaled height
    pub height: f64,
    /// Physical width for annotations, unscaled
    pub label_width: f64,
    /// Physical height for annotations, unscaled
    pub label_height: f64,
    pub units: PanelUnits,
}

/// A validated perforation together with the export scale factor
#[derive(Debug, Clone, Copy)]
pub struct ExportPerforation<'a> {
    pub perforation: &'a Perforation,
    factor: f64,
}

impl<'a> ExportPerforation<'a> {
    pub fn id(&self) -> &'a str {
        &self.perforation.id
    }

    /// Center in export units
    pub fn center(&self) -> Point {
        scale_point(self.perforation.position, self.factor)
    }

    pub fn rotation(&self) -> f64 {
        self.perforation.rotation
    }

    /// Outline around the origin, unrotated, in export units
    pub fn local_outline(&self) -> ShapeOutline {
        let factor = self.factor;
        ShapeOutline::local(self.perforation.shape, self.perforation.size)
            .map(factor, |p| scale_point(p, factor))
    }

    /// Outline at its final position with rotation applied, in export units
    pub fn placed_outline(&self) -> ShapeOutline {
        let factor = self.factor;
        ShapeOutline::placed(self.perforation).map(factor, |p| scale_point(p, factor))
    }
}

fn scale_point(p: Point, factor: f64) -> Point {
    Point::new(p.x * factor, p.y * factor)
}

/// Panel and perforations converted into the export units
#[derive(Debug, Clone)]
pub struct ExportGeometry<'a> {
    pub panel: ExportPanel,
    pub perforations: Vec<ExportPerforation<'a>>,
    /// Export units per panel unit, scale included
    pub factor: f64,
}

impl<'a> ExportGeometry<'a> {
    /// Convert and validate.
    ///
    /// Fails on a panel or scale that cannot be drawn, and on the first
    /// perforation with non-finite geometry.
    pub fn prepare(
        panel: &PanelSpec,
        perforations: &'a [Perforation],
        settings: &ExportSettings,
    ) -> Result<Self, ExportError> {
        let invalid_panel = || ExportError::InvalidDimensions {
            width: panel.width,
            height: panel.height,
        };
        if panel.validate().is_err() || !settings.scale.is_finite() || settings.scale <= 0.0 {
            return Err(invalid_panel());
        }

        let unit_factor = convert_length(1.0, panel.units, settings.units);
        let factor = unit_factor * settings.scale;
        let export_panel = ExportPanel {
            width: panel.width * factor,
            height: panel.height * factor,
            label_width: panel.width * unit_factor,
            label_height: panel.height * unit_factor,
            units: settings.units,
        };
        if !export_panel.width.is_finite() || !export_panel.height.is_finite() {
            return Err(invalid_panel());
        }

        let perforations = perforations
            .iter()
            .map(|perforation| {
                validate_perforation(perforation, factor)?;
                Ok(ExportPerforation {
                    perforation,
                    factor,
                })
            })
            .collect::<Result<Vec<_>, ExportError>>()?;

        Ok(Self {
            panel: export_panel,
            perforations,
            factor,
        })
    }
}

fn validate_perforation(perforation: &Perforation, factor: f64) -> Result<(), ExportError> {
    let failure = |reason: &str| ExportError::SerializationFailure {
        id: perforation.id.clone(),
        reason: reason.to_string(),
    };

    if !perforation.position.is_finite() {
        return Err(failure("non-finite position"));
    }
    if !perforation.size.is_finite() || perforation.size < 0.0 {
        return Err(failure("size must be a finite, non-negative number"));
    }
    if !perforation.rotation.is_finite() {
        return Err(failure("non-finite rotation"));
    }
    let scaled = scale_point(perforation.position, factor);
    if !scaled.is_finite() || !(perforation.size * factor).is_finite() {
        return Err(failure("geometry overflows the export units"));
    }
    Ok(())
}

/// Format a coordinate with at most four decimals and no trailing zeros
pub fn fmt_coord(value: f64) -> String {
    let mut s = format!("{:.4}", value);
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}
