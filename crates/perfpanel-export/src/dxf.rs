//! DXF R12 serializer.
//!
//! Writes three layers (outline, perforations, dimensions). The outline is
//! four LINE entities, circular perforations are CIRCLE entities and every
//! other shape is a closed loop of LINE entities. Coordinates are panel
//! coordinates in export units; the y axis is not flipped.

use crate::geometry::{fmt_coord, ExportGeometry};
use crate::settings::{ExportConfig, ExportFormat, ExportSettings, LayerSpec};
use crate::GeometrySerializer;
use perfpanel_core::{format_dimension, ExportError, PanelSpec, Perforation, Point};
use perfpanel_designer::ShapeOutline;
use std::fmt::Write;

/// Group-code/value writer for a DXF document
struct DxfWriter {
    out: String,
}

impl DxfWriter {
    fn new() -> Self {
        Self { out: String::new() }
    }

    fn pair(&mut self, code: i32, value: impl std::fmt::Display) -> Result<(), ExportError> {
        writeln!(self.out, "{}", code)?;
        writeln!(self.out, "{}", value)?;
        Ok(())
    }

    fn coord(&mut self, code: i32, value: f64) -> Result<(), ExportError> {
        self.pair(code, fmt_coord(value))
    }

    fn line(&mut self, layer: &str, a: Point, b: Point) -> Result<(), ExportError> {
        self.pair(0, "LINE")?;
        self.pair(8, layer)?;
        self.coord(10, a.x)?;
        self.coord(20, a.y)?;
        self.coord(30, 0.0)?;
        self.coord(11, b.x)?;
        self.coord(21, b.y)?;
        self.coord(31, 0.0)
    }

    fn circle(&mut self, layer: &str, center: Point, radius: f64) -> Result<(), ExportError> {
        self.pair(0, "CIRCLE")?;
        self.pair(8, layer)?;
        self.coord(10, center.x)?;
        self.coord(20, center.y)?;
        self.coord(30, 0.0)?;
        self.coord(40, radius)
    }

    fn text(
        &mut self,
        layer: &str,
        at: Point,
        height: f64,
        rotation: f64,
        value: &str,
    ) -> Result<(), ExportError> {
        self.pair(0, "TEXT")?;
        self.pair(8, layer)?;
        self.coord(10, at.x)?;
        self.coord(20, at.y)?;
        self.coord(30, 0.0)?;
        self.coord(40, height)?;
        self.pair(1, value)?;
        if rotation != 0.0 {
            self.coord(50, rotation)?;
        }
        Ok(())
    }

    fn closed_loop(&mut self, layer: &str, points: &[Point]) -> Result<(), ExportError> {
        for (a, b) in points.iter().zip(points.iter().cycle().skip(1)) {
            self.line(layer, *a, *b)?;
        }
        Ok(())
    }

    fn layer_table(&mut self, layers: &[&LayerSpec]) -> Result<(), ExportError> {
        self.pair(0, "TABLE")?;
        self.pair(2, "LAYER")?;
        self.pair(70, layers.len())?;
        for layer in layers {
            self.pair(0, "LAYER")?;
            self.pair(2, &layer.name)?;
            self.pair(70, 0)?;
            self.pair(62, layer.color)?;
            self.pair(6, "CONTINUOUS")?;
        }
        self.pair(0, "ENDTAB")
    }
}

/// Writes perforation layouts as DXF R12 drawings
#[derive(Debug, Clone, Default)]
pub struct DxfSerializer {
    config: ExportConfig,
}

impl DxfSerializer {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Render the drawing as a string
    pub fn render(
        &self,
        panel: &PanelSpec,
        perforations: &[Perforation],
        settings: &ExportSettings,
    ) -> Result<String, ExportError> {
        let geometry = ExportGeometry::prepare(panel, perforations, settings)?;
        let layers = settings.layers();
        let (w, h) = (geometry.panel.width, geometry.panel.height);
        let mut dxf = DxfWriter::new();

        dxf.pair(0, "SECTION")?;
        dxf.pair(2, "HEADER")?;
        dxf.pair(9, "$ACADVER")?;
        dxf.pair(1, "AC1009")?;
        dxf.pair(0, "ENDSEC")?;

        dxf.pair(0, "SECTION")?;
        dxf.pair(2, "TABLES")?;
        dxf.layer_table(&[&layers.outline, &layers.perforations, &layers.dimensions])?;
        dxf.pair(0, "ENDSEC")?;

        dxf.pair(0, "SECTION")?;
        dxf.pair(2, "ENTITIES")?;

        if settings.include_outline {
            let corners = [
                Point::new(0.0, 0.0),
                Point::new(w, 0.0),
                Point::new(w, h),
                Point::new(0.0, h),
            ];
            dxf.closed_loop(&layers.outline.name, &corners)?;
        }

        for perforation in &geometry.perforations {
            match perforation.placed_outline() {
                ShapeOutline::Circle { center, radius } => {
                    dxf.circle(&layers.perforations.name, center, radius)?;
                }
                ShapeOutline::Polygon(points) => {
                    dxf.closed_loop(&layers.perforations.name, &points)?;
                }
            }
        }

        if settings.include_dimensions {
            let gap = self.config.dxf_dimension_gap;
            let text_at = gap + self.config.dxf_text_offset;
            let text_height = self.config.dxf_text_height;
            let layer = &layers.dimensions.name;

            dxf.line(layer, Point::new(0.0, -gap), Point::new(w, -gap))?;
            dxf.line(layer, Point::new(-gap, 0.0), Point::new(-gap, h))?;
            dxf.text(
                layer,
                Point::new(w / 2.0, -text_at),
                text_height,
                0.0,
                &format_dimension(geometry.panel.label_width, settings.units),
            )?;
            dxf.text(
                layer,
                Point::new(-text_at, h / 2.0),
                text_height,
                90.0,
                &format_dimension(geometry.panel.label_height, settings.units),
            )?;
        }

        dxf.pair(0, "ENDSEC")?;
        dxf.pair(0, "EOF")?;
        Ok(dxf.out)
    }
}

impl GeometrySerializer for DxfSerializer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Dxf
    }

    fn serialize(
        &self,
        panel: &PanelSpec,
        perforations: &[Perforation],
        settings: &ExportSettings,
    ) -> Result<Vec<u8>, ExportError> {
        Ok(self.render(panel, perforations, settings)?.into_bytes())
    }
}
