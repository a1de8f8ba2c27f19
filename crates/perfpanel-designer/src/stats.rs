//! Aggregate statistics for a perforation set.

use crate::shapes::shape_area;
use perfpanel_core::{PanelSpec, Perforation, Statistics};

/// Round to two decimal places for display
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute coverage, density and size extrema.
///
/// An empty list or a zero-area panel yields zeros rather than NaN.
pub fn compute_statistics(perforations: &[Perforation], panel: &PanelSpec) -> Statistics {
    let total_area = panel.area();
    if perforations.is_empty() {
        return Statistics {
            total_area,
            ..Statistics::default()
        };
    }

    let count = perforations.len();
    let mut total_perforation_area = 0.0;
    let mut size_sum = 0.0;
    let mut min_size = f64::INFINITY;
    let mut max_size = f64::NEG_INFINITY;

    for perf in perforations {
        total_perforation_area += shape_area(perf.shape, perf.size);
        size_sum += perf.size;
        min_size = min_size.min(perf.size);
        max_size = max_size.max(perf.size);
    }

    let (coverage, density) = if total_area > 0.0 {
        (
            round2(total_perforation_area / total_area * 100.0),
            round2(count as f64 / total_area),
        )
    } else {
        (0.0, 0.0)
    };

    Statistics {
        total_perforations: count,
        total_area,
        total_perforation_area,
        coverage,
        average_size: size_sum / count as f64,
        min_size,
        max_size,
        density,
    }
}
