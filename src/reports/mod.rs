//! Reporting: aggregate statistics over the doctor directory and export the
//! rendered report region as a PDF.

pub mod export;
pub mod region;
pub mod stats;

pub use export::{
    compose_pdf, export_region_to_pdf, fit_to_page_width, save_pdf, ExportedReport, PageLayout,
    PAGE_HEIGHT_MM, PAGE_WIDTH_MM,
};
pub use region::ReportRegion;
pub use stats::{compute_stats, AggregateStats, SpecialtyCount};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Rasterization failed: {0}")]
    Raster(String),

    #[error("PDF encoding failed: {0}")]
    Encode(String),

    #[error("Invalid export filename: {0:?}")]
    InvalidFilename(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
