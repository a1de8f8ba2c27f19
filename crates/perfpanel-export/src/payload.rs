//! Export dispatch and payload naming.

use crate::dxf::DxfSerializer;
use crate::pdf::PdfSerializer;
use crate::settings::{ExportConfig, ExportFormat, ExportSettings};
use crate::svg::SvgSerializer;
use crate::GeometrySerializer;
use chrono::{DateTime, Utc};
use perfpanel_core::{convert_length, ExportError, PanelSpec, Perforation};
use perfpanel_designer::round2;
use serde::{Deserialize, Serialize};

/// Serialized export ready for download
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPayload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub filename: String,
}

/// Serializer for a format
pub fn serializer_for(format: ExportFormat, config: ExportConfig) -> Box<dyn GeometrySerializer> {
    match format {
        ExportFormat::Svg => Box::new(SvgSerializer::new(config)),
        ExportFormat::Dxf => Box::new(DxfSerializer::new(config)),
        ExportFormat::Pdf => Box::new(PdfSerializer::new(config)),
    }
}

/// Suggested download name, e.g. `panel_24x36inches_1714566600000.svg`
pub fn suggested_filename(
    panel: &PanelSpec,
    settings: &ExportSettings,
    now: DateTime<Utc>,
) -> String {
    let width = round2(convert_length(panel.width, panel.units, settings.units));
    let height = round2(convert_length(panel.height, panel.units, settings.units));
    format!(
        "panel_{}x{}{}_{}.{}",
        width,
        height,
        settings.units.label(),
        now.timestamp_millis(),
        settings.format.extension()
    )
}

/// Serialize a perforation set in the requested format.
///
/// `now` only reaches the file name and, for PDFs without an explicit
/// `generatedAt`, the footer.
pub fn export(
    panel: &PanelSpec,
    perforations: &[Perforation],
    settings: &ExportSettings,
    config: ExportConfig,
    now: DateTime<Utc>,
) -> Result<ExportPayload, ExportError> {
    let mut settings = settings.clone();
    if settings.format == ExportFormat::Pdf {
        let mut pdf = settings.pdf();
        pdf.generated_at.get_or_insert(now);
        settings.pdf_settings = Some(pdf);
    }

    let bytes = serializer_for(settings.format, config).serialize(panel, perforations, &settings)?;
    Ok(ExportPayload {
        bytes,
        mime_type: settings.format.mime_type().to_string(),
        filename: suggested_filename(panel, &settings, now),
    })
}
