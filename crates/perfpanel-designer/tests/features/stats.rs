use perfpanel_core::{PanelSpec, PanelUnits, Perforation, Point, ShapeKind};
use perfpanel_designer::compute_statistics;
use std::f64::consts::PI;

fn single(shape: ShapeKind, size: f64) -> Vec<Perforation> {
    vec![Perforation::new("p-0", Point::new(1.0, 1.0), size, shape, 0.0)]
}

#[test]
fn test_empty_statistics_are_zero() {
    let panel = PanelSpec::new(24.0, 36.0, PanelUnits::Inches);
    let stats = compute_statistics(&[], &panel);

    assert_eq!(stats.total_perforations, 0);
    assert_eq!(stats.coverage, 0.0);
    assert_eq!(stats.average_size, 0.0);
    assert_eq!(stats.density, 0.0);
    assert_eq!(stats.total_area, 864.0);
    assert!(!stats.min_size.is_nan() && !stats.max_size.is_nan());
}

#[test]
fn test_circle_area() {
    let panel = PanelSpec::new(10.0, 10.0, PanelUnits::Inches);
    let stats = compute_statistics(&single(ShapeKind::Circle, 2.0), &panel);
    assert!((stats.total_perforation_area - PI).abs() < 1e-6);
    assert_eq!(stats.coverage, 3.14);
    assert_eq!(stats.density, 0.01);
}

#[test]
fn test_unknown_shape_uses_circle_area() {
    let panel = PanelSpec::new(10.0, 10.0, PanelUnits::Inches);
    let circle = compute_statistics(&single(ShapeKind::Circle, 1.5), &panel);
    let unknown = compute_statistics(&single(ShapeKind::Unknown, 1.5), &panel);
    assert_eq!(circle.total_perforation_area, unknown.total_perforation_area);
}

#[test]
fn test_shape_areas() {
    let panel = PanelSpec::new(10.0, 10.0, PanelUnits::Inches);
    let area = |shape| compute_statistics(&single(shape, 2.0), &panel).total_perforation_area;

    assert!((area(ShapeKind::Square) - 4.0).abs() < 1e-12);
    assert!((area(ShapeKind::Rectangle) - 3.0).abs() < 1e-12);
    assert!((area(ShapeKind::Hexagon) - 3.0 * 3f64.sqrt() / 2.0).abs() < 1e-12);
    assert!((area(ShapeKind::Triangle) - 3f64.sqrt()).abs() < 1e-12);
}

#[test]
fn test_statistics_serialize_camel_case() {
    let panel = PanelSpec::new(10.0, 10.0, PanelUnits::Inches);
    let stats = compute_statistics(&single(ShapeKind::Square, 1.0), &panel);
    let json = serde_json::to_value(stats).unwrap();
    assert_eq!(json["totalPerforations"], 1);
    assert_eq!(json["totalPerforationArea"], 1.0);
    assert_eq!(json["averageSize"], 1.0);
}
