use perfpanel_core::{
    PanelSpec, PanelUnits, PatternKind, Perforation, PerforationSettings, ShapeKind, Spacing,
};
use perfpanel_designer::{GeneratorConfig, PatternGenerator};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

fn settings(pattern: PatternKind, horizontal: f64, vertical: f64) -> PerforationSettings {
    PerforationSettings {
        min_size: 0.5,
        max_size: 0.5,
        shape: ShapeKind::Circle,
        pattern,
        spacing: Spacing {
            horizontal,
            vertical,
            diagonal: None,
        },
        ..Default::default()
    }
}

fn generate(panel: &PanelSpec, settings: &PerforationSettings, seed: u64) -> Vec<Perforation> {
    let mut rng = StdRng::seed_from_u64(seed);
    PatternGenerator::default()
        .generate(panel, settings, None, &mut rng)
        .unwrap()
}

#[test]
fn test_poster_panel_grid() {
    let panel = PanelSpec::new(24.0, 36.0, PanelUnits::Inches);
    let perfs = generate(&panel, &settings(PatternKind::Grid, 1.0, 1.0), 0);

    assert_eq!(perfs.len(), 864);
    assert!(perfs.iter().all(|p| p.size == 0.5));

    let ids: HashSet<_> = perfs.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids.len(), perfs.len());
}

#[test]
fn test_staggered_never_exceeds_grid() {
    let panel = PanelSpec::new(24.0, 36.0, PanelUnits::Inches);
    for (h, v) in [(1.0, 1.0), (0.7, 1.3), (2.5, 0.9), (5.0, 5.0)] {
        let grid = generate(&panel, &settings(PatternKind::Grid, h, v), 0);
        let staggered = generate(&panel, &settings(PatternKind::Staggered, h, v), 0);
        assert!(staggered.len() <= grid.len(), "spacing {}x{}", h, v);
    }
}

#[test]
fn test_random_density_zero_places_nothing() {
    let panel = PanelSpec::new(24.0, 36.0, PanelUnits::Inches);
    let mut s = settings(PatternKind::Random, 1.0, 1.0);
    s.density = Some(0.0);
    assert!(generate(&panel, &s, 42).is_empty());
}

#[test]
fn test_random_count_and_bounds() {
    let panel = PanelSpec::new(10.0, 10.0, PanelUnits::Inches);
    let mut s = settings(PatternKind::Random, 1.0, 1.0);
    s.rotation = Some(30.0);

    let perfs = generate(&panel, &s, 42);
    // floor(100 * 0.7)
    assert_eq!(perfs.len(), 70);
    for p in &perfs {
        assert!(p.position.x >= 0.0 && p.position.x < 10.0);
        assert!(p.position.y >= 0.0 && p.position.y < 10.0);
        assert!(p.rotation >= 15.0 && p.rotation <= 45.0);
    }

    s.density = Some(0.5);
    assert_eq!(generate(&panel, &s, 42).len(), 50);
}

#[test]
fn test_random_is_reproducible_with_seed() {
    let panel = PanelSpec::new(10.0, 10.0, PanelUnits::Inches);
    let s = settings(PatternKind::Random, 1.0, 1.0);
    assert_eq!(generate(&panel, &s, 9), generate(&panel, &s, 9));
}

#[test]
fn test_random_positions_are_spread_uniformly() {
    let panel = PanelSpec::new(100.0, 100.0, PanelUnits::Inches);
    let perfs = generate(&panel, &settings(PatternKind::Random, 1.0, 1.0), 1234);
    assert_eq!(perfs.len(), 7000);

    let mean_x = perfs.iter().map(|p| p.position.x).sum::<f64>() / perfs.len() as f64;
    let mean_y = perfs.iter().map(|p| p.position.y).sum::<f64>() / perfs.len() as f64;
    assert!((mean_x - 50.0).abs() < 2.0, "mean x {}", mean_x);
    assert!((mean_y - 50.0).abs() < 2.0, "mean y {}", mean_y);

    let left = perfs.iter().filter(|p| p.position.x < 50.0).count();
    assert!(left > 3200 && left < 3800, "left half {}", left);
}

#[test]
fn test_random_jitter_follows_config() {
    let panel = PanelSpec::new(10.0, 10.0, PanelUnits::Inches);
    let generator = PatternGenerator::new(GeneratorConfig {
        random_rotation_jitter_deg: 0.0,
        random_density: 0.2,
        ..Default::default()
    });
    let mut rng = StdRng::seed_from_u64(5);
    let perfs = generator
        .generate(&panel, &settings(PatternKind::Random, 1.0, 1.0), None, &mut rng)
        .unwrap();
    assert_eq!(perfs.len(), 20);
    assert!(perfs.iter().all(|p| p.rotation == 0.0));
}

#[test]
fn test_radial_rings() {
    let panel = PanelSpec::new(10.0, 10.0, PanelUnits::Inches);
    let perfs = generate(&panel, &settings(PatternKind::Radial, 2.0, 1.0), 0);

    let ring1 = perfs.iter().filter(|p| p.id.starts_with("radial-1-")).count();
    let ring2 = perfs.iter().filter(|p| p.id.starts_with("radial-2-")).count();
    assert_eq!(ring1, 36);
    assert_eq!(ring2, 36);
    assert_eq!(perfs.len(), 72);

    for p in &perfs {
        let r = ((p.position.x - 5.0).powi(2) + (p.position.y - 5.0).powi(2)).sqrt();
        assert!((r - 2.0).abs() < 1e-9 || (r - 4.0).abs() < 1e-9, "radius {}", r);
    }

    let first = perfs.iter().find(|p| p.id == "radial-1-3").unwrap();
    assert!((first.rotation - 30.0).abs() < 1e-9);
}

#[test]
fn test_radial_angle_step_scales_with_vertical_spacing() {
    let panel = PanelSpec::new(10.0, 10.0, PanelUnits::Inches);
    let perfs = generate(&panel, &settings(PatternKind::Radial, 2.0, 3.0), 0);
    // 30 degree step, 12 holes per ring
    assert_eq!(perfs.len(), 24);
}

#[test]
fn test_unknown_pattern_fails_without_output() {
    let panel = PanelSpec::new(10.0, 10.0, PanelUnits::Inches);
    let mut rng = StdRng::seed_from_u64(0);
    let result = PatternGenerator::default().generate(
        &panel,
        &settings(PatternKind::Unknown, 1.0, 1.0),
        None,
        &mut rng,
    );
    assert!(result.is_err());
}

#[test]
fn test_zero_area_panel_is_empty() {
    let panel = PanelSpec::new(0.0, 10.0, PanelUnits::Inches);
    for pattern in [
        PatternKind::Grid,
        PatternKind::Staggered,
        PatternKind::Random,
        PatternKind::Radial,
    ] {
        assert!(generate(&panel, &settings(pattern, 1.0, 1.0), 0).is_empty());
    }
}

proptest! {
    #[test]
    fn prop_grid_count_is_exact(
        cols in 1usize..40,
        rows in 1usize..40,
        col_slack in 0.05f64..0.95,
        row_slack in 0.05f64..0.95,
        h in 0.3f64..5.0,
        v in 0.3f64..5.0,
    ) {
        let width = h * (cols as f64 + col_slack);
        let height = v * (rows as f64 + row_slack);
        let panel = PanelSpec::new(width, height, PanelUnits::Inches);
        let grid = settings(PatternKind::Grid, h, v);
        let perfs = generate(&panel, &grid, 0);

        prop_assert_eq!(perfs.len(), cols * rows);
        prop_assert_eq!(PatternGenerator::default().grid_count(&panel, &grid), cols * rows);

        for p in &perfs {
            prop_assert!(p.position.x >= -1e-9 && p.position.x <= width + 1e-9);
            prop_assert!(p.position.y >= -1e-9 && p.position.y <= height + 1e-9);
        }
    }
}
