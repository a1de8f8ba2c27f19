//! Brightness-to-size mapping.
//!
//! Converts brightness samples (0-255) into perforation sizes within the
//! configured bounds. Brightness arrives either as one scalar for the whole
//! panel or as a grid aligned to image pixel space.

use perfpanel_core::constants::MAX_BRIGHTNESS;
use perfpanel_core::{GenerationError, PanelSpec, Point};
use serde::{Deserialize, Serialize};

/// Map a brightness sample to a size in `[min_size, max_size]`.
///
/// Bright samples give large sizes unless `invert` is set. Samples outside
/// 0-255 are clamped and NaN counts as black.
pub fn map_size(brightness: f64, min_size: f64, max_size: f64, invert: bool) -> f64 {
    let brightness = if brightness.is_nan() {
        0.0
    } else {
        brightness.clamp(0.0, MAX_BRIGHTNESS)
    };
    let normalized = brightness / MAX_BRIGHTNESS;
    let mapped = if invert { 1.0 - normalized } else { normalized };
    min_size + mapped * (max_size - min_size)
}

/// Row-major grid of 8-bit brightness values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrightnessGrid {
    /// Columns
    pub width: u32,
    /// Rows
    pub height: u32,
    /// `width * height` samples, row-major
    pub values: Vec<u8>,
}

impl BrightnessGrid {
    /// Create a grid, rejecting data whose length disagrees with the size
    pub fn new(width: u32, height: u32, values: Vec<u8>) -> Result<Self, GenerationError> {
        let grid = Self {
            width,
            height,
            values,
        };
        grid.validate()?;
        Ok(grid)
    }

    /// Check the data length against the declared size
    pub fn validate(&self) -> Result<(), GenerationError> {
        let expected = self.width as usize * self.height as usize;
        if self.values.len() != expected {
            return Err(GenerationError::InvalidBrightnessGrid {
                reason: format!(
                    "expected {} samples for {}x{}, got {}",
                    expected,
                    self.width,
                    self.height,
                    self.values.len()
                ),
            });
        }
        Ok(())
    }

    /// True when the grid holds no samples
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sample at pixel coordinates
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.values
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Nearest sample for normalized coordinates `u, v` in `[0, 1]`
    pub fn sample_normalized(&self, u: f64, v: f64) -> Option<u8> {
        if self.is_empty() || !u.is_finite() || !v.is_finite() {
            return None;
        }
        let x = (u.clamp(0.0, 1.0) * self.width as f64).floor() as u32;
        let y = (v.clamp(0.0, 1.0) * self.height as f64).floor() as u32;
        self.get(x.min(self.width - 1), y.min(self.height - 1))
    }

    /// Sample the pixel under a panel-space position, stretching the grid
    /// over the whole panel
    pub fn sample_panel(&self, position: Point, panel: &PanelSpec) -> Option<u8> {
        if panel.is_degenerate() {
            return None;
        }
        self.sample_normalized(position.x / panel.width, position.y / panel.height)
    }

    /// Mean brightness over all samples, 0 for an empty grid
    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let sum: u64 = self.values.iter().map(|&v| v as u64).sum();
        sum as f64 / self.values.len() as f64
    }
}

/// Brightness input for the pattern generator
#[derive(Debug, Clone, PartialEq)]
pub enum BrightnessSample {
    /// One value for the whole panel (image mean)
    Scalar(f64),
    /// Per-position sampling
    Grid(BrightnessGrid),
}

impl BrightnessSample {
    /// Size for a perforation at `position`.
    ///
    /// Falls back to `fallback` when a grid has nothing to sample.
    pub fn size_at(
        &self,
        position: Point,
        panel: &PanelSpec,
        min_size: f64,
        max_size: f64,
        invert: bool,
        fallback: f64,
    ) -> f64 {
        match self {
            Self::Scalar(mean) => map_size(*mean, min_size, max_size, invert),
            Self::Grid(grid) => match grid.sample_panel(position, panel) {
                Some(value) => map_size(value as f64, min_size, max_size, invert),
                None => fallback,
            },
        }
    }
}
