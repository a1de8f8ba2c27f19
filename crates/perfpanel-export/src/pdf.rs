//! PDF serializer.
//!
//! Draws the panel on a single page, scaled down (never up) to fit inside the
//! page margins and centered. Page space has y pointing up, so panel
//! coordinates are flipped.

use crate::geometry::{ExportGeometry, ExportPanel};
use crate::settings::{
    ExportConfig, ExportFormat, ExportSettings, Orientation, PageSize, PdfSettings,
};
use crate::GeometrySerializer;
use perfpanel_core::constants::MM_PER_INCH;
use perfpanel_core::{format_dimension, ExportError, PanelSpec, PanelUnits, Perforation, Point};
use perfpanel_designer::ShapeOutline;
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str, TextStr};

const POINTS_PER_INCH: f64 = 72.0;
const TITLE_FONT_SIZE: f32 = 14.0;
const DIMENSION_FONT_SIZE: f32 = 10.0;
const FOOTER_FONT_SIZE: f32 = 8.0;
const OUTLINE_WIDTH: f32 = 1.0;
const PERFORATION_GRAY: f32 = 0.2;
const DIMENSION_GRAY: f32 = 0.4;
/// Bezier control distance for a quarter circle
const KAPPA: f64 = 0.552_284_749_8;
const FONT_NAME: Name<'static> = Name(b"F1");

/// Points per export unit
pub fn points_per_unit(units: PanelUnits) -> f64 {
    match units {
        PanelUnits::Inches => POINTS_PER_INCH,
        PanelUnits::Mm => POINTS_PER_INCH / MM_PER_INCH,
    }
}

/// Restrict text to printable ASCII for the standard Helvetica encoding
fn sanitize_text(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect()
}

/// Rough Helvetica advance width, good enough for centering labels
fn approx_text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.5
}

/// Where the panel lands on the page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub page_width: f64,
    pub page_height: f64,
    pub margin: f64,
    /// Uniform fit factor, never above 1
    pub fit: f64,
    pub origin_x: f64,
    pub origin_y: f64,
    pub drawn_width: f64,
    pub drawn_height: f64,
    points_per_unit: f64,
}

impl PageLayout {
    /// Map a panel-space point (export units, y down) to page space
    pub fn to_page(&self, p: Point) -> (f32, f32) {
        let k = self.points_per_unit * self.fit;
        (
            (self.origin_x + p.x * k) as f32,
            (self.origin_y + self.drawn_height - p.y * k) as f32,
        )
    }

    fn length(&self, value: f64) -> f32 {
        (value * self.points_per_unit * self.fit) as f32
    }
}

fn fit_ratio(available: f64, extent: f64) -> f64 {
    if extent > 0.0 {
        available.max(0.0) / extent
    } else {
        f64::INFINITY
    }
}

/// Writes perforation layouts as single-page PDF documents
#[derive(Debug, Clone, Default)]
pub struct PdfSerializer {
    config: ExportConfig,
}

impl PdfSerializer {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Compute page size, fit and placement for a panel
    pub fn layout(&self, panel: &ExportPanel, pdf: &PdfSettings) -> PageLayout {
        let ppu = points_per_unit(panel.units);
        let panel_w = panel.width * ppu;
        let panel_h = panel.height * ppu;

        let (page_width, page_height, margin) = match pdf.page_size.points() {
            Some((w, h)) => {
                let (w, h) = match pdf.orientation {
                    Orientation::Portrait => (w.min(h), w.max(h)),
                    Orientation::Landscape => (w.max(h), w.min(h)),
                };
                (w, h, self.config.pdf_margin_pt)
            }
            None => {
                let border = self.config.pdf_custom_margin_units * ppu;
                (
                    panel_w + border,
                    panel_h + border,
                    self.config.pdf_margin_pt.min(border / 2.0),
                )
            }
        };

        let fit = fit_ratio(page_width - 2.0 * margin, panel_w)
            .min(fit_ratio(page_height - 2.0 * margin, panel_h))
            .min(1.0);
        let drawn_width = panel_w * fit;
        let drawn_height = panel_h * fit;

        PageLayout {
            page_width,
            page_height,
            margin,
            fit,
            origin_x: (page_width - drawn_width) / 2.0,
            origin_y: (page_height - drawn_height) / 2.0,
            drawn_width,
            drawn_height,
            points_per_unit: ppu,
        }
    }

    /// Render the document
    pub fn render(
        &self,
        panel: &PanelSpec,
        perforations: &[Perforation],
        settings: &ExportSettings,
    ) -> Result<Vec<u8>, ExportError> {
        let geometry = ExportGeometry::prepare(panel, perforations, settings)?;
        let pdf_settings = settings.pdf();
        let layout = self.layout(&geometry.panel, &pdf_settings);
        let content = self.page_content(&geometry, settings, &pdf_settings, &layout);

        let catalog_id = Ref::new(1);
        let page_tree_id = Ref::new(2);
        let page_id = Ref::new(3);
        let font_id = Ref::new(4);
        let content_id = Ref::new(5);
        let info_id = Ref::new(6);

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(page_tree_id);
        pdf.pages(page_tree_id).kids([page_id]).count(1);

        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(
            0.0,
            0.0,
            layout.page_width as f32,
            layout.page_height as f32,
        ));
        page.parent(page_tree_id);
        page.contents(content_id);
        page.resources().fonts().pair(FONT_NAME, font_id);
        page.finish();

        pdf.type1_font(font_id).base_font(Name(b"Helvetica"));
        pdf.stream(content_id, &content.finish());

        {
            let mut info = pdf.document_info(info_id);
            if let Some(title) = &pdf_settings.title {
                info.title(TextStr(title));
            }
            info.producer(TextStr("PerfPanel"));
        }

        Ok(pdf.finish())
    }

    fn page_content(
        &self,
        geometry: &ExportGeometry<'_>,
        settings: &ExportSettings,
        pdf_settings: &PdfSettings,
        layout: &PageLayout,
    ) -> Content {
        let mut content = Content::new();

        if let Some(title) = &pdf_settings.title {
            content.set_fill_gray(0.0);
            write_text(
                &mut content,
                &sanitize_text(title),
                TITLE_FONT_SIZE,
                layout.margin as f32,
                (layout.page_height - layout.margin * 0.6) as f32,
            );
        }

        if settings.include_outline {
            content.set_stroke_gray(0.0);
            content.set_line_width(OUTLINE_WIDTH);
            content.rect(
                layout.origin_x as f32,
                layout.origin_y as f32,
                layout.drawn_width as f32,
                layout.drawn_height as f32,
            );
            content.stroke();
        }

        content.set_fill_gray(PERFORATION_GRAY);
        for perforation in &geometry.perforations {
            match perforation.placed_outline() {
                ShapeOutline::Circle { center, radius } => {
                    circle_path(&mut content, layout, center, radius);
                }
                ShapeOutline::Polygon(points) => {
                    polygon_path(&mut content, layout, &points);
                }
            }
            content.fill_nonzero();
        }

        if settings.include_dimensions {
            let units = settings.units;
            let width_label = format_dimension(geometry.panel.label_width, units);
            let height_label = format_dimension(geometry.panel.label_height, units);
            let ox = layout.origin_x as f32;
            let oy = layout.origin_y as f32;
            let dw = layout.drawn_width as f32;
            let dh = layout.drawn_height as f32;

            content.set_fill_gray(DIMENSION_GRAY);
            write_text(
                &mut content,
                &width_label,
                DIMENSION_FONT_SIZE,
                ox + dw / 2.0 - approx_text_width(&width_label, DIMENSION_FONT_SIZE) / 2.0,
                oy - DIMENSION_FONT_SIZE - 4.0,
            );

            let height_x = ox - 6.0;
            let height_y =
                oy + dh / 2.0 - approx_text_width(&height_label, DIMENSION_FONT_SIZE) / 2.0;
            content.begin_text();
            content.set_font(FONT_NAME, DIMENSION_FONT_SIZE);
            content.set_text_matrix([0.0, 1.0, -1.0, 0.0, height_x, height_y]);
            content.show(Str(height_label.as_bytes()));
            content.end_text();
        }

        content.set_fill_gray(0.0);
        let footer = footer_text(pdf_settings, geometry.perforations.len(), layout.fit);
        write_text(
            &mut content,
            &footer,
            FOOTER_FONT_SIZE,
            layout.margin as f32,
            (layout.margin * 0.4) as f32,
        );

        content
    }
}

fn footer_text(pdf: &PdfSettings, count: usize, fit: f64) -> String {
    let mut parts = Vec::new();
    if let Some(at) = pdf.generated_at {
        parts.push(format!("Generated {}", at.format("%Y-%m-%d %H:%M:%S UTC")));
    }
    parts.push(format!("{} perforations", count));
    parts.push(format!("Scale {:.1}%", fit * 100.0));
    parts.join(" | ")
}

fn write_text(content: &mut Content, text: &str, size: f32, x: f32, y: f32) {
    content.begin_text();
    content.set_font(FONT_NAME, size);
    content.next_line(x, y);
    content.show(Str(text.as_bytes()));
    content.end_text();
}

fn circle_path(content: &mut Content, layout: &PageLayout, center: Point, radius: f64) {
    let (cx, cy) = layout.to_page(center);
    let r = layout.length(radius);
    let k = r * KAPPA as f32;

    content.move_to(cx + r, cy);
    content.cubic_to(cx + r, cy + k, cx + k, cy + r, cx, cy + r);
    content.cubic_to(cx - k, cy + r, cx - r, cy + k, cx - r, cy);
    content.cubic_to(cx - r, cy - k, cx - k, cy - r, cx, cy - r);
    content.cubic_to(cx + k, cy - r, cx + r, cy - k, cx + r, cy);
    content.close_path();
}

fn polygon_path(content: &mut Content, layout: &PageLayout, points: &[Point]) {
    let mut iter = points.iter();
    let Some(first) = iter.next() else {
        return;
    };
    let (x, y) = layout.to_page(*first);
    content.move_to(x, y);
    for p in iter {
        let (x, y) = layout.to_page(*p);
        content.line_to(x, y);
    }
    content.close_path();
}

impl GeometrySerializer for PdfSerializer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pdf
    }

    fn serialize(
        &self,
        panel: &PanelSpec,
        perforations: &[Perforation],
        settings: &ExportSettings,
    ) -> Result<Vec<u8>, ExportError> {
        self.render(panel, perforations, settings)
    }
}
