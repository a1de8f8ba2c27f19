//! # PerfPanel Export
//!
//! Serializes perforation layouts into three geometry formats:
//!
//! - **SVG**: display-pixel document with optional outline and dimension labels
//! - **DXF**: R12 drawing with outline, perforation and dimension layers
//! - **PDF**: single printable page, fit to a preset or custom page size
//!
//! Every serializer converts from the panel's units into the export units,
//! treats unknown shapes as circles, and produces identical bytes for
//! identical input.

pub mod dxf;
pub mod geometry;
pub mod payload;
pub mod pdf;
pub mod settings;
pub mod svg;

use perfpanel_core::{ExportError, PanelSpec, Perforation};

pub use dxf::DxfSerializer;
pub use geometry::{ExportGeometry, ExportPanel, ExportPerforation};
pub use payload::{export, serializer_for, suggested_filename, ExportPayload};
pub use pdf::{PageLayout, PdfSerializer};
pub use settings::{
    ExportConfig, ExportFormat, ExportSettings, LayerSettings, LayerSpec, Orientation, PageSize,
    PdfSettings,
};
pub use svg::SvgSerializer;

/// A serializer for one output format
pub trait GeometrySerializer {
    /// Format this serializer produces
    fn format(&self) -> ExportFormat;

    /// Serialize a panel and its perforations
    fn serialize(
        &self,
        panel: &PanelSpec,
        perforations: &[Perforation],
        settings: &ExportSettings,
    ) -> Result<Vec<u8>, ExportError>;
}
