use chrono::{TimeZone, Utc};
use dxf::entities::EntityType;
use dxf::Drawing;
use perfpanel_core::{ExportError, PanelSpec, PanelUnits, Perforation, Point, ShapeKind};
use perfpanel_export::{
    export, DxfSerializer, ExportConfig, ExportFormat, ExportSettings, GeometrySerializer,
    LayerSettings, LayerSpec, PdfSerializer, PdfSettings, SvgSerializer,
};
use std::io::Cursor;

fn panel() -> PanelSpec {
    PanelSpec::new(10.0, 10.0, PanelUnits::Inches)
}

fn perforations() -> Vec<Perforation> {
    vec![
        Perforation::new("c-0", Point::new(1.0, 1.0), 0.5, ShapeKind::Circle, 0.0),
        Perforation::new("h-0", Point::new(5.0, 5.0), 1.0, ShapeKind::Hexagon, 30.0),
        Perforation::new("u-0", Point::new(8.0, 2.0), 0.5, ShapeKind::Unknown, 0.0),
    ]
}

fn load_dxf(bytes: &[u8]) -> Drawing {
    Drawing::load(&mut Cursor::new(bytes)).unwrap()
}

fn count<F>(drawing: &Drawing, layer: &str, pred: F) -> usize
where
    F: Fn(&EntityType) -> bool,
{
    drawing
        .entities()
        .filter(|e| e.common.layer == layer && pred(&e.specific))
        .count()
}

fn is_line(e: &EntityType) -> bool {
    matches!(e, EntityType::Line(_))
}

fn is_circle(e: &EntityType) -> bool {
    matches!(e, EntityType::Circle(_))
}

fn is_text(e: &EntityType) -> bool {
    matches!(e, EntityType::Text(_))
}

#[test]
fn test_dxf_layer_structure() {
    let settings = ExportSettings::new(ExportFormat::Dxf, PanelUnits::Inches);
    let bytes = DxfSerializer::default()
        .serialize(&panel(), &perforations(), &settings)
        .unwrap();
    let drawing = load_dxf(&bytes);

    assert_eq!(count(&drawing, "OUTLINE", is_line), 4);
    assert_eq!(count(&drawing, "PERFORATIONS", is_circle), 2);
    assert_eq!(count(&drawing, "PERFORATIONS", is_line), 6);
    assert_eq!(count(&drawing, "DIMENSIONS", is_line), 2);
    assert_eq!(count(&drawing, "DIMENSIONS", is_text), 2);

    let texts: Vec<String> = drawing
        .entities()
        .filter_map(|e| match &e.specific {
            EntityType::Text(t) => Some(t.value.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(texts, vec!["10.00\"".to_string(), "10.00\"".to_string()]);

    let layer_names: Vec<String> = drawing.layers().map(|l| l.name.clone()).collect();
    for name in ["OUTLINE", "PERFORATIONS", "DIMENSIONS"] {
        assert!(layer_names.iter().any(|n| n == name), "missing layer {}", name);
    }
}

#[test]
fn test_dxf_dimension_offsets() {
    let settings = ExportSettings::new(ExportFormat::Dxf, PanelUnits::Inches);
    let bytes = DxfSerializer::default()
        .serialize(&panel(), &[], &settings)
        .unwrap();
    let drawing = load_dxf(&bytes);

    let text_ys: Vec<f64> = drawing
        .entities()
        .filter_map(|e| match &e.specific {
            EntityType::Text(t) => Some(t.location.y),
            _ => None,
        })
        .collect();
    assert!((text_ys[0] + 0.7).abs() < 1e-9);

    let dimension_line = drawing
        .entities()
        .find_map(|e| match &e.specific {
            EntityType::Line(l) if e.common.layer == "DIMENSIONS" => Some(l.clone()),
            _ => None,
        })
        .unwrap();
    assert!((dimension_line.p1.y + 0.5).abs() < 1e-9);
    assert!((dimension_line.p2.x - 10.0).abs() < 1e-9);
}

#[test]
fn test_dxf_layer_override_and_toggles() {
    let mut settings = ExportSettings::new(ExportFormat::Dxf, PanelUnits::Inches);
    settings.include_outline = false;
    settings.include_dimensions = false;
    settings.layer_settings = Some(LayerSettings {
        perforations: LayerSpec::new("HOLES", 5),
        ..Default::default()
    });

    let bytes = DxfSerializer::default()
        .serialize(&panel(), &perforations(), &settings)
        .unwrap();
    let drawing = load_dxf(&bytes);

    assert_eq!(count(&drawing, "OUTLINE", |_| true), 0);
    assert_eq!(count(&drawing, "DIMENSIONS", |_| true), 0);
    assert_eq!(count(&drawing, "HOLES", |_| true), 8);
}

#[test]
fn test_dxf_converts_inches_to_mm() {
    let settings = ExportSettings::new(ExportFormat::Dxf, PanelUnits::Mm);
    let bytes = DxfSerializer::default()
        .serialize(&panel(), &perforations()[..1], &settings)
        .unwrap();
    let drawing = load_dxf(&bytes);

    let circle = drawing
        .entities()
        .find_map(|e| match &e.specific {
            EntityType::Circle(c) => Some(c.clone()),
            _ => None,
        })
        .unwrap();
    assert!((circle.center.x - 25.4).abs() < 1e-9);
    assert!((circle.center.y - 25.4).abs() < 1e-9);
    assert!((circle.radius - 6.35).abs() < 1e-9);
}

#[test]
fn test_svg_pixel_scale() {
    let mut settings = ExportSettings::new(ExportFormat::Svg, PanelUnits::Inches);
    settings.include_dimensions = false;
    let doc = SvgSerializer::default()
        .render(&panel(), &perforations()[..1], &settings)
        .unwrap();

    assert!(doc.contains(r#"width="960" height="960""#));
    assert!(doc.contains(r#"<circle id="c-0" cx="96" cy="96" r="24"/>"#));
}

#[test]
fn test_svg_mm_output_keeps_physical_size() {
    let mut inches = ExportSettings::new(ExportFormat::Svg, PanelUnits::Inches);
    inches.include_dimensions = false;
    let mut mm = inches.clone();
    mm.units = PanelUnits::Mm;

    let svg = SvgSerializer::default();
    let a = svg.render(&panel(), &perforations(), &inches).unwrap();
    let b = svg.render(&panel(), &perforations(), &mm).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_svg_unknown_shape_renders_as_circle() {
    let settings = ExportSettings::new(ExportFormat::Svg, PanelUnits::Inches);
    let doc = SvgSerializer::default()
        .render(&panel(), &perforations(), &settings)
        .unwrap();

    assert!(doc.contains(r#"<circle id="u-0""#));
    assert!(doc.contains(r#"<polygon id="h-0""#));
    assert!(doc.contains("10.00\"</text>"));
}

#[test]
fn test_svg_dimension_suffix_in_mm() {
    let settings = ExportSettings::new(ExportFormat::Svg, PanelUnits::Mm);
    let doc = SvgSerializer::default()
        .render(&panel(), &[], &settings)
        .unwrap();
    assert!(doc.contains(">254.00mm</text>"));
}

#[test]
fn test_pdf_document_shape() {
    let mut settings = ExportSettings::new(ExportFormat::Pdf, PanelUnits::Inches);
    settings.pdf_settings = Some(PdfSettings {
        title: Some("Lobby panel".to_string()),
        ..Default::default()
    });
    let bytes = PdfSerializer::default()
        .render(&panel(), &perforations(), &settings)
        .unwrap();

    assert!(bytes.starts_with(b"%PDF-"));
    assert!(bytes.windows(5).any(|w| w == b"%%EOF"));
    assert!(bytes.windows(9).any(|w| w == b"Helvetica"));
}

#[test]
fn test_payloads_are_idempotent() {
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    for format in [ExportFormat::Svg, ExportFormat::Dxf, ExportFormat::Pdf] {
        let settings = ExportSettings::new(format, PanelUnits::Inches);
        let a = export(&panel(), &perforations(), &settings, ExportConfig::default(), now).unwrap();
        let b = export(&panel(), &perforations(), &settings, ExportConfig::default(), now).unwrap();
        assert_eq!(a, b, "{} output differs", format);
        assert_eq!(a.mime_type, format.mime_type());
        assert!(a.filename.ends_with(format.extension()));
    }
}

#[test]
fn test_timestamp_stays_out_of_vector_geometry() {
    let earlier = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let later = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    for format in [ExportFormat::Svg, ExportFormat::Dxf] {
        let settings = ExportSettings::new(format, PanelUnits::Inches);
        let config = ExportConfig::default();
        let a = export(&panel(), &perforations(), &settings, config, earlier).unwrap();
        let b = export(&panel(), &perforations(), &settings, config, later).unwrap();
        assert_eq!(a.bytes, b.bytes);
        assert_ne!(a.filename, b.filename);
    }
}

#[test]
fn test_non_finite_geometry_reports_perforation_id() {
    let mut perfs = perforations();
    perfs.push(Perforation::new(
        "broken-7",
        Point::new(2.0, 2.0),
        f64::INFINITY,
        ShapeKind::Square,
        0.0,
    ));
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

    for format in [ExportFormat::Svg, ExportFormat::Dxf, ExportFormat::Pdf] {
        let settings = ExportSettings::new(format, PanelUnits::Inches);
        match export(&panel(), &perfs, &settings, ExportConfig::default(), now) {
            Err(ExportError::SerializationFailure { id, .. }) => assert_eq!(id, "broken-7"),
            other => panic!(
                "{}: expected serialization failure, got {:?}",
                format,
                other.map(|p| p.filename)
            ),
        }
    }
}
