//! Raster Image Analysis
//!
//! Decodes an image, converts it to luma and reports brightness statistics
//! together with the brightness grid that drives per-position sizing.

use crate::error::{CamToolError, CamToolResult};
use image::{DynamicImage, GrayImage};
use perfpanel_designer::{BrightnessGrid, BrightnessSample};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Brightness statistics of an image (0-255 scale)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageStatistics {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
}

impl ImageStatistics {
    /// Statistics over a luma image; all zero for an empty image
    pub fn from_luma(gray: &GrayImage) -> Self {
        let count = gray.as_raw().len();
        if count == 0 {
            return Self::default();
        }

        let mut sum = 0u64;
        let mut min = u8::MAX;
        let mut max = u8::MIN;
        for &v in gray.as_raw() {
            sum += v as u64;
            min = min.min(v);
            max = max.max(v);
        }
        let mean = sum as f64 / count as f64;
        let variance = gray
            .as_raw()
            .iter()
            .map(|&v| {
                let d = v as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / count as f64;

        Self {
            mean,
            min: min as f64,
            max: max as f64,
            std_dev: variance.sqrt(),
        }
    }
}

/// Result of analysing an image.
///
/// Requests from the HTTP host may carry only `statistics.mean`; the grid is
/// optional on the wire.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnalysis {
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    pub statistics: ImageStatistics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<BrightnessGrid>,
}

impl ImageAnalysis {
    /// Brightness input for the pattern generator; the grid wins over the mean
    pub fn brightness_sample(&self) -> BrightnessSample {
        match &self.grid {
            Some(grid) if !grid.is_empty() => BrightnessSample::Grid(grid.clone()),
            _ => BrightnessSample::Scalar(self.statistics.mean),
        }
    }
}

/// Convert a luma image into a brightness grid
pub fn luma_grid(gray: &GrayImage) -> BrightnessGrid {
    BrightnessGrid {
        width: gray.width(),
        height: gray.height(),
        values: gray.as_raw().clone(),
    }
}

/// Analyse a decoded image at full resolution
pub fn analyze_image(img: &DynamicImage) -> ImageAnalysis {
    let gray = img.to_luma8();
    ImageAnalysis {
        width: gray.width(),
        height: gray.height(),
        statistics: ImageStatistics::from_luma(&gray),
        grid: Some(luma_grid(&gray)),
    }
}

/// Analyse an image, shrinking the grid so neither side exceeds
/// `max_dimension`. Statistics still cover the full image.
pub fn analyze_image_resized(img: &DynamicImage, max_dimension: u32) -> ImageAnalysis {
    let gray = img.to_luma8();
    let (width, height) = gray.dimensions();
    let statistics = ImageStatistics::from_luma(&gray);

    let longest = width.max(height);
    let grid = if max_dimension == 0 || longest <= max_dimension {
        luma_grid(&gray)
    } else {
        let ratio = max_dimension as f64 / longest as f64;
        let w = ((width as f64 * ratio).round() as u32).max(1);
        let h = ((height as f64 * ratio).round() as u32).max(1);
        let small = image::imageops::resize(&gray, w, h, image::imageops::FilterType::Triangle);
        luma_grid(&small)
    };

    ImageAnalysis {
        width,
        height,
        statistics,
        grid: Some(grid),
    }
}

/// Load and analyse an image file
pub fn analyze_file<P: AsRef<Path>>(path: P) -> CamToolResult<ImageAnalysis> {
    let img = open_image(path)?;
    Ok(analyze_image(&img))
}

/// Decode an image file
pub fn open_image<P: AsRef<Path>>(path: P) -> CamToolResult<DynamicImage> {
    let path = path.as_ref();
    image::open(path)
        .map_err(|e| CamToolError::LoadError(format!("{}: {}", path.display(), e)))
}
