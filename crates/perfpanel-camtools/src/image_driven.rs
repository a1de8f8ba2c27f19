//! Image-Driven Perforation Generator
//!
//! Walks a brightness grid on a fixed sampling step and drops a perforation on
//! every sampled pixel that passes the brightness threshold. Works in canvas
//! space: a pixel at `(x, y)` lands at `(x * scale, y * scale)`.

use crate::error::{CamToolResult, ParameterError};
use image::{Rgba, RgbaImage};
use perfpanel_core::{Perforation, Point, ShapeKind};
use perfpanel_designer::{map_size, round2, shape_area, BrightnessGrid};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const PLACED_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);
const REJECTED_COLOR: Rgba<u8> = Rgba([0, 0, 255, 255]);

/// Image-driven generation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageDrivenSettings {
    /// Spacing at full density, canvas units
    pub min_spacing: f64,
    /// Spacing at zero density, canvas units
    pub max_spacing: f64,
    /// Density percentage (0-100)
    pub density: f64,
    pub min_size: f64,
    pub max_size: f64,
    /// Brightness threshold (0-255)
    pub threshold: u8,
    /// Place on bright pixels instead of dark ones, and map bright to small
    pub invert: bool,
    /// Snap positions to this pitch on both axes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_snap: Option<f64>,
    /// Canvas units per image pixel
    pub scale: f64,
    pub shape: ShapeKind,
    /// Rotation in degrees
    pub rotation: f64,
}

impl Default for ImageDrivenSettings {
    fn default() -> Self {
        Self {
            min_spacing: 4.0,
            max_spacing: 20.0,
            density: 50.0,
            min_size: 1.0,
            max_size: 8.0,
            threshold: 128,
            invert: false,
            grid_snap: None,
            scale: 1.0,
            shape: ShapeKind::Circle,
            rotation: 0.0,
        }
    }
}

impl ImageDrivenSettings {
    /// Validate parameters before sampling
    pub fn validate(&self) -> Result<(), ParameterError> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(ParameterError::InvalidValue {
                name: "scale".to_string(),
                reason: "must be a positive number".to_string(),
            });
        }
        if !self.density.is_finite() || !(0.0..=100.0).contains(&self.density) {
            return Err(ParameterError::OutOfRange {
                name: "density".to_string(),
                value: self.density,
                min: 0.0,
                max: 100.0,
            });
        }
        for (name, value) in [
            ("minSpacing", self.min_spacing),
            ("maxSpacing", self.max_spacing),
            ("minSize", self.min_size),
            ("maxSize", self.max_size),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ParameterError::InvalidValue {
                    name: name.to_string(),
                    reason: "must be a non-negative number".to_string(),
                });
            }
        }
        if self.max_spacing < self.min_spacing {
            return Err(ParameterError::InvalidValue {
                name: "maxSpacing".to_string(),
                reason: "must not be smaller than minSpacing".to_string(),
            });
        }
        if self.max_size < self.min_size {
            return Err(ParameterError::InvalidValue {
                name: "maxSize".to_string(),
                reason: "must not be smaller than minSize".to_string(),
            });
        }
        if let Some(snap) = self.grid_snap {
            if !snap.is_finite() || snap <= 0.0 {
                return Err(ParameterError::InvalidValue {
                    name: "gridSnap".to_string(),
                    reason: "must be a positive number".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Spacing biased by density, canvas units
    pub fn base_spacing(&self) -> f64 {
        self.min_spacing + (self.max_spacing - self.min_spacing) * (1.0 - self.density / 100.0)
    }

    /// Pixel step between samples, at least 1
    pub fn sampling_step(&self) -> u32 {
        let step = (self.base_spacing() / self.scale).floor();
        if step.is_finite() && step >= 1.0 {
            step as u32
        } else {
            1
        }
    }

    /// Whether a sampled brightness receives a perforation
    pub fn passes_threshold(&self, brightness: u8) -> bool {
        if self.invert {
            brightness > self.threshold
        } else {
            brightness < self.threshold
        }
    }
}

/// Aggregate figures for an image-driven run
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDrivenSummary {
    pub count: usize,
    pub average_size: f64,
    /// Open area as a percentage of the canvas, 2 decimals
    pub coverage: f64,
}

/// A sampled pixel and whether it received a perforation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleMark {
    pub x: u32,
    pub y: u32,
    pub placed: bool,
}

/// Output of the image-driven generator
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDrivenResult {
    pub perforations: Vec<Perforation>,
    pub summary: ImageDrivenSummary,
    #[serde(skip)]
    pub samples: Vec<SampleMark>,
}

/// Generates perforations directly from image brightness
#[derive(Debug, Clone, Default)]
pub struct ImageDrivenGenerator {
    settings: ImageDrivenSettings,
}

impl ImageDrivenGenerator {
    /// Create a generator, rejecting invalid parameters
    pub fn new(settings: ImageDrivenSettings) -> CamToolResult<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    /// Parameters in use
    pub fn settings(&self) -> &ImageDrivenSettings {
        &self.settings
    }

    /// Canvas extent covered by a grid
    pub fn canvas_size(&self, grid: &BrightnessGrid) -> (f64, f64) {
        (
            grid.width as f64 * self.settings.scale,
            grid.height as f64 * self.settings.scale,
        )
    }

    /// Sample the grid and place perforations
    pub fn generate(&self, grid: &BrightnessGrid) -> CamToolResult<ImageDrivenResult> {
        grid.validate()?;

        let s = &self.settings;
        let step = s.sampling_step() as usize;
        let mut perforations = Vec::new();
        let mut samples = Vec::new();
        let mut occupied = HashSet::new();

        for y in (0..grid.height).step_by(step) {
            for x in (0..grid.width).step_by(step) {
                let Some(brightness) = grid.get(x, y) else {
                    continue;
                };
                if !s.passes_threshold(brightness) {
                    samples.push(SampleMark { x, y, placed: false });
                    continue;
                }

                let mut position = Point::new(x as f64 * s.scale, y as f64 * s.scale);
                if let Some(snap) = s.grid_snap {
                    let cell = (
                        (position.x / snap).round() as i64,
                        (position.y / snap).round() as i64,
                    );
                    if !occupied.insert(cell) {
                        samples.push(SampleMark { x, y, placed: false });
                        continue;
                    }
                    position = Point::new(cell.0 as f64 * snap, cell.1 as f64 * snap);
                }

                let size = map_size(brightness as f64, s.min_size, s.max_size, s.invert);
                perforations.push(Perforation::new(
                    format!("image-{}-{}", y, x),
                    position,
                    size,
                    s.shape,
                    s.rotation,
                ));
                samples.push(SampleMark { x, y, placed: true });
            }
        }

        let summary = self.summarize(&perforations, grid);
        Ok(ImageDrivenResult {
            perforations,
            summary,
            samples,
        })
    }

    /// Scale a result uniformly so the whole canvas fits inside a
    /// `width` x `height` panel, anchored at the origin
    ///
    /// Returns the factor applied. Positions are clamped to the panel
    /// edges and the summary is recomputed against the fitted canvas.
    pub fn fit_into(
        &self,
        result: &mut ImageDrivenResult,
        grid: &BrightnessGrid,
        width: f64,
        height: f64,
    ) -> CamToolResult<f64> {
        let (canvas_width, canvas_height) = self.canvas_size(grid);
        if !positive(width) || !positive(height) {
            return Err(ParameterError::InvalidValue {
                name: "panel".to_string(),
                reason: format!("dimensions must be positive, got {} x {}", width, height),
            }
            .into());
        }
        if !positive(canvas_width) || !positive(canvas_height) {
            return Err(ParameterError::InvalidValue {
                name: "canvas".to_string(),
                reason: "image has no area".to_string(),
            }
            .into());
        }

        let factor = (width / canvas_width).min(height / canvas_height);
        for perforation in &mut result.perforations {
            perforation.position.x = (perforation.position.x * factor).clamp(0.0, width);
            perforation.position.y = (perforation.position.y * factor).clamp(0.0, height);
            perforation.size *= factor;
        }
        let canvas_area = canvas_width * canvas_height * factor * factor;
        result.summary = summarize_over(&result.perforations, canvas_area);
        Ok(factor)
    }

    fn summarize(&self, perforations: &[Perforation], grid: &BrightnessGrid) -> ImageDrivenSummary {
        let (w, h) = self.canvas_size(grid);
        summarize_over(perforations, w * h)
    }
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn summarize_over(perforations: &[Perforation], canvas_area: f64) -> ImageDrivenSummary {
    if perforations.is_empty() {
        return ImageDrivenSummary::default();
    }
    let count = perforations.len();
    let average_size = perforations.iter().map(|p| p.size).sum::<f64>() / count as f64;
    let open_area: f64 = perforations
        .iter()
        .map(|p| shape_area(p.shape, p.size))
        .sum();
    let coverage = if canvas_area > 0.0 {
        round2(open_area / canvas_area * 100.0)
    } else {
        0.0
    };

    ImageDrivenSummary {
        count,
        average_size,
        coverage,
    }
}

/// Grayscale copy of the grid with sampled pixels marked: red where a
/// perforation was placed, blue where the sample was rejected
pub fn render_preview(grid: &BrightnessGrid, result: &ImageDrivenResult) -> RgbaImage {
    let mut preview = RgbaImage::from_fn(grid.width, grid.height, |x, y| {
        let v = grid.get(x, y).unwrap_or(0);
        Rgba([v, v, v, 255])
    });
    for mark in &result.samples {
        if mark.x < preview.width() && mark.y < preview.height() {
            let color = if mark.placed { PLACED_COLOR } else { REJECTED_COLOR };
            preview.put_pixel(mark.x, mark.y, color);
        }
    }
    preview
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampling_step() {
        let mut s = ImageDrivenSettings {
            min_spacing: 4.0,
            max_spacing: 20.0,
            density: 50.0,
            scale: 2.0,
            ..Default::default()
        };
        assert_eq!(s.base_spacing(), 12.0);
        assert_eq!(s.sampling_step(), 6);

        s.density = 100.0;
        s.scale = 10.0;
        assert_eq!(s.sampling_step(), 1);
    }

    #[test]
    fn test_threshold_direction() {
        let mut s = ImageDrivenSettings::default();
        assert!(s.passes_threshold(10));
        assert!(!s.passes_threshold(128));
        s.invert = true;
        assert!(s.passes_threshold(200));
        assert!(!s.passes_threshold(128));
    }

    #[test]
    fn test_rejects_bad_scale() {
        let s = ImageDrivenSettings {
            scale: 0.0,
            ..Default::default()
        };
        assert!(ImageDrivenGenerator::new(s).is_err());
    }

    #[test]
    fn test_rejects_density_out_of_range() {
        let s = ImageDrivenSettings {
            density: 150.0,
            ..Default::default()
        };
        assert!(matches!(
            s.validate(),
            Err(ParameterError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_fit_into_respects_both_panel_axes() {
        let grid = BrightnessGrid::new(2, 8, vec![0; 16]).unwrap();
        let generator = ImageDrivenGenerator::new(ImageDrivenSettings {
            min_spacing: 1.0,
            max_spacing: 1.0,
            ..Default::default()
        })
        .unwrap();
        let mut result = generator.generate(&grid).unwrap();
        assert_eq!(result.perforations.len(), 16);
        let unscaled = result.perforations[0].size;

        let factor = generator.fit_into(&mut result, &grid, 10.0, 2.0).unwrap();
        assert_eq!(factor, 0.25);
        for p in &result.perforations {
            assert!(p.position.x <= 10.0 && p.position.y <= 2.0, "{:?}", p.position);
            assert_eq!(p.size, unscaled * 0.25);
        }
        let last = result.perforations.last().unwrap();
        assert_eq!((last.position.x, last.position.y), (0.25, 1.75));
        assert_eq!(result.summary.count, 16);
        assert_eq!(result.summary.average_size, unscaled * 0.25);

        assert!(generator.fit_into(&mut result, &grid, 10.0, 0.0).is_err());
        assert!(generator.fit_into(&mut result, &grid, f64::NAN, 2.0).is_err());
    }
}
