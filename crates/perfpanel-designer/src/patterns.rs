//! Perforation pattern generation.
//!
//! Places perforations on a panel with one of four algorithms: grid,
//! staggered, random and radial. Placement runs in compute units (pixels at
//! the configured reference resolution) and positions are converted back to
//! panel units before they are returned.

use crate::brightness::BrightnessSample;
use perfpanel_core::constants::{
    COUNT_EPSILON, DEFAULT_RADIAL_ANGLE_FACTOR_DEG, DEFAULT_RANDOM_DENSITY,
    DEFAULT_RANDOM_ROTATION_JITTER_DEG, DEFAULT_REFERENCE_DPI,
};
use perfpanel_core::{
    from_compute_units, to_compute_units, GenerationError, PanelSpec, PatternKind, Perforation,
    PerforationSettings, Point, Spacing,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Parameters that used to be hard-coded in the generator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Pixels per inch of the compute space
    pub reference_dpi: f64,
    /// Random pattern fill ratio when the settings carry none
    pub random_density: f64,
    /// Random rotation jitter half-width in degrees
    pub random_rotation_jitter_deg: f64,
    /// Radial angular step per unit of vertical spacing, in degrees
    pub radial_angle_factor_deg: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            reference_dpi: DEFAULT_REFERENCE_DPI,
            random_density: DEFAULT_RANDOM_DENSITY,
            random_rotation_jitter_deg: DEFAULT_RANDOM_ROTATION_JITTER_DEG,
            radial_angle_factor_deg: DEFAULT_RADIAL_ANGLE_FACTOR_DEG,
        }
    }
}

/// Grid geometry in compute units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub cols: usize,
    pub rows: usize,
    pub h_spacing: f64,
    pub v_spacing: f64,
    pub start_x: f64,
    pub start_y: f64,
    pub width: f64,
    pub height: f64,
}

impl GridLayout {
    /// Number of cells
    pub fn cell_count(&self) -> usize {
        self.cols * self.rows
    }
}

/// Position and orientation chosen by a placement algorithm, before sizing
#[derive(Debug, Clone)]
struct Placement {
    id: String,
    position: Point,
    rotation: f64,
}

/// `floor(extent / pitch)` with a small tolerance for exact multiples
fn cell_count(extent: f64, pitch: f64) -> usize {
    let count = (extent / pitch + COUNT_EPSILON).floor();
    if count.is_finite() && count > 0.0 {
        count as usize
    } else {
        0
    }
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Generates perforation primitives from panel and pattern settings
#[derive(Debug, Clone, Default)]
pub struct PatternGenerator {
    config: GeneratorConfig,
}

impl PatternGenerator {
    /// Creates a new pattern generator.
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Returns the generator configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates the perforations for a panel.
    ///
    /// `rng` only feeds the random pattern. Unsupported patterns fail before
    /// any placement work; degenerate panels and spacing produce an empty list.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        panel: &PanelSpec,
        settings: &PerforationSettings,
        brightness: Option<&BrightnessSample>,
        rng: &mut R,
    ) -> Result<Vec<Perforation>, GenerationError> {
        if matches!(settings.pattern, PatternKind::Custom | PatternKind::Unknown) {
            return Err(GenerationError::InvalidPattern {
                pattern: settings.pattern.name().to_string(),
            });
        }
        panel.validate()?;
        if settings.pattern == PatternKind::Random {
            let density = self.random_density(settings);
            if !(0.0..=1.0).contains(&density) {
                return Err(GenerationError::InvalidDensity { density });
            }
        }
        if let Some(BrightnessSample::Grid(grid)) = brightness {
            grid.validate()?;
        }

        let placements = match settings.pattern {
            PatternKind::Grid => self.grid_placements(panel, settings),
            PatternKind::Staggered => self.staggered_placements(panel, settings),
            PatternKind::Random => self.random_placements(panel, settings, rng),
            PatternKind::Radial => self.radial_placements(panel, settings),
            PatternKind::Custom | PatternKind::Unknown => Vec::new(),
        };

        let fallback = settings.mid_size();
        Ok(placements
            .into_iter()
            .map(|p| {
                let size = match brightness {
                    Some(sample) => sample.size_at(
                        p.position,
                        panel,
                        settings.min_size,
                        settings.max_size,
                        settings.invert_brightness,
                        fallback,
                    ),
                    None => fallback,
                };
                Perforation::new(p.id, p.position, size, settings.shape, p.rotation)
            })
            .collect())
    }

    /// Grid geometry for the panel, or `None` when nothing fits
    pub fn grid_layout(&self, panel: &PanelSpec, spacing: &Spacing) -> Option<GridLayout> {
        if panel.is_degenerate() || !positive(spacing.horizontal) || !positive(spacing.vertical) {
            return None;
        }
        let width = self.to_px(panel.width, panel);
        let height = self.to_px(panel.height, panel);
        let h_spacing = self.to_px(spacing.horizontal, panel);
        let v_spacing = self.to_px(spacing.vertical, panel);

        let cols = cell_count(width, h_spacing);
        let rows = cell_count(height, v_spacing);
        if cols == 0 || rows == 0 {
            return None;
        }

        Some(GridLayout {
            cols,
            rows,
            h_spacing,
            v_spacing,
            start_x: (width - (cols - 1) as f64 * h_spacing) / 2.0,
            start_y: (height - (rows - 1) as f64 * v_spacing) / 2.0,
            width,
            height,
        })
    }

    /// Number of perforations the grid pattern would place
    pub fn grid_count(&self, panel: &PanelSpec, settings: &PerforationSettings) -> usize {
        self.grid_layout(panel, &settings.spacing)
            .map(|layout| layout.cell_count())
            .unwrap_or(0)
    }

    fn grid_placements(&self, panel: &PanelSpec, settings: &PerforationSettings) -> Vec<Placement> {
        let Some(layout) = self.grid_layout(panel, &settings.spacing) else {
            return Vec::new();
        };
        let rotation = settings.base_rotation();
        let mut placements = Vec::with_capacity(layout.cell_count());

        for row in 0..layout.rows {
            for col in 0..layout.cols {
                let x = layout.start_x + col as f64 * layout.h_spacing;
                let y = layout.start_y + row as f64 * layout.v_spacing;
                placements.push(Placement {
                    id: format!("grid-{}-{}", row, col),
                    position: self.px_point(x, y, panel),
                    rotation,
                });
            }
        }

        placements
    }

    fn staggered_placements(
        &self,
        panel: &PanelSpec,
        settings: &PerforationSettings,
    ) -> Vec<Placement> {
        let Some(layout) = self.grid_layout(panel, &settings.spacing) else {
            return Vec::new();
        };
        let rotation = settings.base_rotation();
        let mut placements = Vec::with_capacity(layout.cell_count());

        for row in 0..layout.rows {
            let offset = if row % 2 == 1 {
                layout.h_spacing / 2.0
            } else {
                0.0
            };
            for col in 0..layout.cols {
                let x = layout.start_x + col as f64 * layout.h_spacing + offset;
                // Offset rows lose the holes pushed past the right edge.
                if x < 0.0 || x > layout.width {
                    continue;
                }
                let y = layout.start_y + row as f64 * layout.v_spacing;
                placements.push(Placement {
                    id: format!("staggered-{}-{}", row, col),
                    position: self.px_point(x, y, panel),
                    rotation,
                });
            }
        }

        placements
    }

    /// Density for the random pattern, request value first
    fn random_density(&self, settings: &PerforationSettings) -> f64 {
        settings.density.unwrap_or(self.config.random_density)
    }

    fn random_placements<R: Rng + ?Sized>(
        &self,
        panel: &PanelSpec,
        settings: &PerforationSettings,
        rng: &mut R,
    ) -> Vec<Placement> {
        let density = self.random_density(settings);
        if density <= 0.0 {
            return Vec::new();
        }
        let target = (self.grid_count(panel, settings) as f64 * density).floor() as usize;
        let rotation = settings.base_rotation();
        let jitter = self.config.random_rotation_jitter_deg.abs();

        (0..target)
            .map(|i| {
                let x = rng.gen::<f64>() * panel.width;
                let y = rng.gen::<f64>() * panel.height;
                let spin = if jitter > 0.0 {
                    rng.gen_range(-jitter..=jitter)
                } else {
                    0.0
                };
                Placement {
                    id: format!("random-{}", i),
                    position: Point::new(x, y),
                    rotation: rotation + spin,
                }
            })
            .collect()
    }

    fn radial_placements(
        &self,
        panel: &PanelSpec,
        settings: &PerforationSettings,
    ) -> Vec<Placement> {
        let angle_step_deg = settings.spacing.vertical * self.config.radial_angle_factor_deg;
        if panel.is_degenerate()
            || !positive(settings.spacing.horizontal)
            || !positive(angle_step_deg)
        {
            return Vec::new();
        }

        let width = self.to_px(panel.width, panel);
        let height = self.to_px(panel.height, panel);
        let ring_spacing = self.to_px(settings.spacing.horizontal, panel);
        let (cx, cy) = (width / 2.0, height / 2.0);
        let max_radius = width.min(height) / 2.0;
        let limit = max_radius * (1.0 + COUNT_EPSILON);
        let tolerance = COUNT_EPSILON * width.max(height);
        let angle_step = angle_step_deg.to_radians();

        let mut placements = Vec::new();
        let mut ring = 1usize;
        loop {
            let radius = ring as f64 * ring_spacing;
            if radius > limit {
                break;
            }

            let circumference = 2.0 * PI * radius;
            let arc_length = radius * angle_step;
            let holes = cell_count(circumference, arc_length);

            for i in 0..holes {
                let angle_deg = i as f64 * angle_step_deg;
                let angle = angle_deg.to_radians();
                let x = cx + radius * angle.cos();
                let y = cy + radius * angle.sin();
                if x < -tolerance
                    || x > width + tolerance
                    || y < -tolerance
                    || y > height + tolerance
                {
                    continue;
                }
                placements.push(Placement {
                    id: format!("radial-{}-{}", ring, i),
                    position: self.px_point(x, y, panel),
                    rotation: angle_deg,
                });
            }

            ring += 1;
        }

        placements
    }

    fn to_px(&self, value: f64, panel: &PanelSpec) -> f64 {
        to_compute_units(value, panel.units, self.config.reference_dpi)
    }

    fn px_point(&self, x: f64, y: f64, panel: &PanelSpec) -> Point {
        Point::new(
            from_compute_units(x, panel.units, self.config.reference_dpi),
            from_compute_units(y, panel.units, self.config.reference_dpi),
        )
    }
}
