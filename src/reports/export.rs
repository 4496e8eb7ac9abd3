//! PDF export of the report region.
//!
//! The region is captured as one bitmap, scaled to span the full A4 page
//! width with its aspect ratio preserved, and anchored at the page's top-left
//! corner. There is no pagination: a bitmap taller than one page, once
//! scaled, runs past the bottom edge and is clipped.

use std::io::BufWriter;
use std::path::{Path, PathBuf};

use printpdf::image_crate::{DynamicImage, RgbImage};
use printpdf::{Image, ImageTransform, Mm, PdfDocument};

use super::region::ReportRegion;
use super::ExportError;

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;

const MM_PER_INCH: f32 = 25.4;

/// Where the bitmap lands on the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    /// Drawn width; always the page width.
    pub width_mm: f32,
    /// Drawn height: `bitmap_height * page_width / bitmap_width`.
    pub height_mm: f32,
    /// Resolution at which the bitmap spans exactly `width_mm`.
    pub dpi: f32,
}

impl PageLayout {
    /// True when the scaled bitmap runs past the bottom of the page.
    pub fn overflows_page(&self) -> bool {
        self.height_mm > PAGE_HEIGHT_MM
    }
}

/// Scale a `width_px` × `height_px` bitmap to the page width.
pub fn fit_to_page_width(width_px: u32, height_px: u32) -> PageLayout {
    let width_px = width_px.max(1) as f32;
    PageLayout {
        width_mm: PAGE_WIDTH_MM,
        height_mm: height_px as f32 * PAGE_WIDTH_MM / width_px,
        dpi: width_px * MM_PER_INCH / PAGE_WIDTH_MM,
    }
}

/// Result of a completed export.
#[derive(Debug, Clone)]
pub struct ExportedReport {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    pub layout: PageLayout,
}

/// Embed a bitmap in a single A4 page. Returns the PDF bytes and placement.
pub fn compose_pdf(bitmap: RgbImage, title: &str) -> Result<(Vec<u8>, PageLayout), ExportError> {
    let layout = fit_to_page_width(bitmap.width(), bitmap.height());

    let (doc, page1, layer1) =
        PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let layer = doc.get_page(page1).get_layer(layer1);

    let image = Image::from_dynamic_image(&DynamicImage::ImageRgb8(bitmap));
    // PDF origin is bottom-left; anchor the bitmap's top edge to the page top.
    let transform = ImageTransform {
        translate_x: Some(Mm(0.0)),
        translate_y: Some(Mm(PAGE_HEIGHT_MM - layout.height_mm)),
        dpi: Some(layout.dpi),
        ..Default::default()
    };
    image.add_to_layer(layer, transform);

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ExportError::Encode(format!("PDF save error: {e}")))?;
    let bytes = buf
        .into_inner()
        .map_err(|e| ExportError::Encode(format!("PDF buffer error: {e}")))?;
    Ok((bytes, layout))
}

/// Write PDF bytes into `exports_dir`, creating it if needed.
///
/// Only the final path component of `filename` is used.
pub fn save_pdf(bytes: &[u8], filename: &str, exports_dir: &Path) -> Result<PathBuf, ExportError> {
    let name = Path::new(filename)
        .file_name()
        .ok_or_else(|| ExportError::InvalidFilename(filename.to_string()))?;

    std::fs::create_dir_all(exports_dir)?;
    let path = exports_dir.join(name);
    std::fs::write(&path, bytes)?;
    Ok(path)
}

/// Capture `region` and save it as a one-page PDF named `filename`.
///
/// An absent region is a silent no-op: nothing is written and `Ok(None)` is
/// returned. Capture runs on the blocking pool and is awaited once, with no
/// timeout.
pub async fn export_region_to_pdf(
    region: Option<&ReportRegion>,
    filename: &str,
    exports_dir: &Path,
) -> Result<Option<ExportedReport>, ExportError> {
    let Some(region) = region else {
        return Ok(None);
    };

    let snapshot = region.clone();
    let bitmap = tokio::task::spawn_blocking(move || snapshot.rasterize())
        .await
        .map_err(|e| ExportError::Raster(e.to_string()))??;

    let title = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename)
        .replace('_', " ");
    let (bytes, layout) = compose_pdf(bitmap, &title)?;
    let path = save_pdf(&bytes, filename, exports_dir)?;

    tracing::info!(
        path = %path.display(),
        size = bytes.len(),
        height_mm = layout.height_mm,
        overflow = layout.overflows_page(),
        "Report exported"
    );

    Ok(Some(ExportedReport { path, bytes, layout }))
}
