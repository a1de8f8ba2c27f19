//! SVG serializer.
//!
//! Output space is display pixels: export units are multiplied by a fixed
//! pixels-per-inch factor (96 per inch, about 3.78 per millimeter).
//! Polygons are written unrotated around their center and carry a
//! `rotate(..)` transform.

use crate::geometry::{fmt_coord, ExportGeometry, ExportPerforation};
use crate::settings::{ExportConfig, ExportFormat, ExportSettings};
use crate::GeometrySerializer;
use perfpanel_core::constants::MM_PER_INCH;
use perfpanel_core::{format_dimension, ExportError, PanelSpec, PanelUnits, Perforation};
use perfpanel_designer::ShapeOutline;
use std::fmt::Write;

/// Space reserved around the panel for dimension labels, in pixels
const DIMENSION_PADDING_PX: f64 = 40.0;
const DIMENSION_FONT_SIZE: f64 = 12.0;

/// Escape text for XML attributes and content
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Writes perforation layouts as SVG documents
#[derive(Debug, Clone, Default)]
pub struct SvgSerializer {
    config: ExportConfig,
}

impl SvgSerializer {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Pixels per export unit
    pub fn px_per_unit(&self, units: PanelUnits) -> f64 {
        match units {
            PanelUnits::Inches => self.config.svg_px_per_inch,
            PanelUnits::Mm => self.config.svg_px_per_inch / MM_PER_INCH,
        }
    }

    /// Render the document as a string
    pub fn render(
        &self,
        panel: &PanelSpec,
        perforations: &[Perforation],
        settings: &ExportSettings,
    ) -> Result<String, ExportError> {
        let geometry = ExportGeometry::prepare(panel, perforations, settings)?;
        let px = self.px_per_unit(settings.units);
        let width = geometry.panel.width * px;
        let height = geometry.panel.height * px;
        let pad = if settings.include_dimensions {
            DIMENSION_PADDING_PX
        } else {
            0.0
        };
        let doc_width = width + 2.0 * pad;
        let doc_height = height + 2.0 * pad;

        let mut out = String::new();
        writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = fmt_coord(doc_width),
            h = fmt_coord(doc_height),
        )?;
        writeln!(
            out,
            r#"  <rect x="0" y="0" width="{}" height="{}" fill="white"/>"#,
            fmt_coord(doc_width),
            fmt_coord(doc_height)
        )?;
        writeln!(
            out,
            r#"  <g id="panel" transform="translate({} {})">"#,
            fmt_coord(pad),
            fmt_coord(pad)
        )?;

        if settings.include_outline {
            writeln!(
                out,
                r#"    <rect id="outline" x="0" y="0" width="{}" height="{}" fill="none" stroke="black" stroke-width="1"/>"#,
                fmt_coord(width),
                fmt_coord(height)
            )?;
        }

        writeln!(out, r#"    <g id="perforations" fill="black">"#)?;
        for perforation in &geometry.perforations {
            write_perforation(&mut out, perforation, px)?;
        }
        writeln!(out, "    </g>")?;

        if settings.include_dimensions {
            let label_y = height + pad * 0.6;
            let label_x = -pad * 0.6;
            writeln!(
                out,
                r#"    <g id="dimensions" font-family="Arial, sans-serif" font-size="{}" fill="black" text-anchor="middle">"#,
                fmt_coord(DIMENSION_FONT_SIZE)
            )?;
            writeln!(
                out,
                r#"      <text x="{}" y="{}">{}</text>"#,
                fmt_coord(width / 2.0),
                fmt_coord(label_y),
                escape_xml(&format_dimension(geometry.panel.label_width, settings.units))
            )?;
            writeln!(
                out,
                r#"      <text x="{x}" y="{y}" transform="rotate(-90 {x} {y})">{}</text>"#,
                escape_xml(&format_dimension(geometry.panel.label_height, settings.units)),
                x = fmt_coord(label_x),
                y = fmt_coord(height / 2.0),
            )?;
            writeln!(out, "    </g>")?;
        }

        writeln!(out, "  </g>")?;
        writeln!(out, "</svg>")?;
        Ok(out)
    }
}

fn write_perforation(
    out: &mut String,
    perforation: &ExportPerforation<'_>,
    px: f64,
) -> Result<(), ExportError> {
    let center = perforation.center();
    let (cx, cy) = (center.x * px, center.y * px);
    let id = escape_xml(perforation.id());

    match perforation.local_outline() {
        ShapeOutline::Circle { radius, .. } => {
            writeln!(
                out,
                r#"      <circle id="{}" cx="{}" cy="{}" r="{}"/>"#,
                id,
                fmt_coord(cx),
                fmt_coord(cy),
                fmt_coord(radius * px)
            )?;
        }
        ShapeOutline::Polygon(points) => {
            let points = points
                .iter()
                .map(|p| format!("{},{}", fmt_coord(cx + p.x * px), fmt_coord(cy + p.y * px)))
                .collect::<Vec<_>>()
                .join(" ");
            write!(out, r#"      <polygon id="{}" points="{}""#, id, points)?;
            let rotation = perforation.rotation();
            if rotation != 0.0 {
                write!(
                    out,
                    r#" transform="rotate({} {} {})""#,
                    fmt_coord(rotation),
                    fmt_coord(cx),
                    fmt_coord(cy)
                )?;
            }
            writeln!(out, "/>")?;
        }
    }
    Ok(())
}

impl GeometrySerializer for SvgSerializer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Svg
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
