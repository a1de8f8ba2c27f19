//! Request facade
//!
//! The call shapes a host (HTTP handler, CLI, batch job) uses to drive the
//! core: a generation request returning perforations plus statistics, an
//! export request returning a named payload, and an image-driven request.
//! All request types use camelCase JSON field names.

use chrono::{DateTime, Utc};
use perfpanel_camtools::{
    CamToolError, CamToolResult, ImageAnalysis, ImageDrivenGenerator, ImageDrivenResult,
    ImageDrivenSettings,
};
use perfpanel_core::{PanelSpec, Perforation, PerforationSettings, Result, Statistics};
use perfpanel_designer::{compute_statistics, BrightnessSample, PatternGenerator};
use perfpanel_export::{ExportFormat, ExportPayload, ExportSettings};
use perfpanel_settings::Config;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Generation request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub panel_dimensions: PanelSpec,
    #[serde(default)]
    pub settings: PerforationSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_analysis: Option<ImageAnalysis>,
}

/// Generation response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    pub perforations: Vec<Perforation>,
    pub statistics: Statistics,
}

/// Export request body
///
/// A top-level `format` overrides the one in `settings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ExportFormat>,
    pub panel_dimensions: PanelSpec,
    #[serde(default)]
    pub perforations: Vec<Perforation>,
    #[serde(alias = "exportSettings")]
    pub settings: ExportSettings,
}

impl ExportRequest {
    /// Settings with the effective format applied
    pub fn effective_settings(&self) -> ExportSettings {
        let mut settings = self.settings.clone();
        if let Some(format) = self.format {
            settings.format = format;
        }
        settings
    }
}

/// Image-driven request
///
/// Spacing and sizes are in canvas units (image pixels times `scale`). With
/// a panel, the canvas is scaled uniformly to the largest size that fits
/// inside it and positions and sizes come out in panel units.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panel_dimensions: Option<PanelSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<ImageDrivenSettings>,
}

/// Image-driven response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    /// Perforations, summary and the sample marks used for previews
    #[serde(flatten)]
    pub result: ImageDrivenResult,
    /// Statistics against the request panel, when one was given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<Statistics>,
}

/// Stateless entry point bound to a configuration
#[derive(Debug, Clone, Default)]
pub struct PerfPanelService {
    config: Config,
}

impl PerfPanelService {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run a generation request with the given random source
    pub fn generate<R: Rng + ?Sized>(
        &self,
        request: &GenerationRequest,
        rng: &mut R,
    ) -> Result<GenerationResponse> {
        let panel = &request.panel_dimensions;
        let settings = &request.settings;
        info!(
            pattern = settings.pattern.name(),
            shape = settings.shape.name(),
            width = panel.width,
            height = panel.height,
            units = %panel.units,
            "Generation request"
        );

        let brightness = request
            .image_analysis
            .as_ref()
            .map(ImageAnalysis::brightness_sample);
        match &brightness {
            Some(BrightnessSample::Grid(grid)) => {
                debug!(width = grid.width, height = grid.height, "Sizing from brightness grid")
            }
            Some(BrightnessSample::Scalar(mean)) => debug!(mean, "Sizing from image mean"),
            None => {}
        }

        let generator = PatternGenerator::new(self.config.generation);
        let perforations = generator
            .generate(panel, settings, brightness.as_ref(), rng)
            .inspect_err(|e| warn!("Generation rejected: {}", e))?;
        let statistics = compute_statistics(&perforations, panel);

        info!(
            count = statistics.total_perforations,
            coverage = statistics.coverage,
            "Generated perforations"
        );
        Ok(GenerationResponse {
            perforations,
            statistics,
        })
    }

    /// Run a generation request, seeding the random source when `seed` is set
    pub fn generate_seeded(
        &self,
        request: &GenerationRequest,
        seed: Option<u64>,
    ) -> Result<GenerationResponse> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.generate(request, &mut rng)
    }

    /// Run an export request; `now` names the file and stamps PDF footers
    pub fn export(&self, request: &ExportRequest, now: DateTime<Utc>) -> Result<ExportPayload> {
        let settings = request.effective_settings();
        info!(
            format = %settings.format,
            units = %settings.units,
            perforations = request.perforations.len(),
            "Export request"
        );

        let payload = perfpanel_export::export(
            &request.panel_dimensions,
            &request.perforations,
            &settings,
            self.config.export,
            now,
        )
        .inspect_err(|e| warn!("Export failed: {}", e))?;

        info!(
            filename = %payload.filename,
            bytes = payload.bytes.len(),
            "Export complete"
        );
        Ok(payload)
    }

    /// Run the image-driven generator over an analysed image
    pub fn generate_from_image(
        &self,
        analysis: &ImageAnalysis,
        request: &ImageRequest,
    ) -> CamToolResult<ImageResponse> {
        let grid = analysis.grid.as_ref().ok_or_else(|| {
            CamToolError::InvalidParameters("image analysis carries no brightness grid".to_string())
        })?;

        let settings = request
            .settings
            .clone()
            .unwrap_or_else(|| self.config.image.clone());
        info!(
            width = grid.width,
            height = grid.height,
            scale = settings.scale,
            threshold = settings.threshold,
            "Image-driven request"
        );

        let generator = ImageDrivenGenerator::new(settings)?;
        let mut result = generator.generate(grid)?;
        let statistics = match &request.panel_dimensions {
            Some(panel) => {
                let factor = generator.fit_into(&mut result, grid, panel.width, panel.height)?;
                debug!(factor, "Fitted canvas onto panel");
                Some(compute_statistics(&result.perforations, panel))
            }
            None => None,
        };

        info!(count = result.summary.count, "Image-driven perforations placed");
        Ok(ImageResponse { result, statistics })
    }
}
