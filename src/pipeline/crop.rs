//! Region rasterisation: render the first page at the configured zoom and
//! persist one PNG crop per text block.
//!
//! The block bounding boxes arrive in page points; multiplying by the same
//! zoom factor the renderer used aligns them with the bitmap's pixel grid.
//! Crops are named `rectangle_<i>.png` with a 1-based index in
//! block-discovery order — the filename is the only place that order is
//! recorded, recognition recovers it from there.

use crate::config::ConversionConfig;
use crate::error::BlockOcrError;
use crate::pipeline::locate::{BlockBounds, TextBlock};
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Integer pixel rectangle inside the rendered bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Render page 0 and write one crop per block into `out_dir`, creating the
/// directory if absent. Returns the number of crops written.
///
/// Runs inside `spawn_blocking` since pdfium is not async-safe.
///
/// # Errors
/// * [`BlockOcrError::Rasterization`] when the page cannot be rendered or a
///   crop cannot be written.
/// * [`BlockOcrError::DegenerateRegion`] when a scaled bounding box has zero
///   or negative area once clamped to the bitmap.
pub async fn rasterize_regions(
    pdf_path: &Path,
    out_dir: &Path,
    blocks: &[TextBlock],
    config: &ConversionConfig,
) -> Result<usize, BlockOcrError> {
    let path = pdf_path.to_path_buf();
    let dir = out_dir.to_path_buf();
    let blocks = blocks.to_vec();
    let zoom = config.zoom;

    tokio::task::spawn_blocking(move || rasterize_blocking(&path, &dir, &blocks, zoom))
        .await
        .map_err(|e| BlockOcrError::Internal(format!("rasterise task panicked: {e}")))?
}

fn rasterize_blocking(
    pdf_path: &Path,
    out_dir: &Path,
    blocks: &[TextBlock],
    zoom: f32,
) -> Result<usize, BlockOcrError> {
    let pdfium = Pdfium::default();

    let document =
        pdfium
            .load_pdf_from_file(pdf_path, None)
            .map_err(|e| BlockOcrError::DocumentOpen {
                path: pdf_path.to_path_buf(),
                detail: format!("{e:?}"),
            })?;

    let pages = document.pages();
    let page = pages
        .get(0)
        .map_err(|e| BlockOcrError::Rasterization {
            page: 1,
            detail: format!("document has no first page: {e:?}"),
        })?;

    // Bitmap dimensions are the page's point dimensions multiplied by the
    // zoom factor on each axis, so scaled block coordinates land on the
    // right pixels.
    let target_width = (page.width().value * zoom).round() as i32;
    let target_height = (page.height().value * zoom).round() as i32;
    let render_config = PdfRenderConfig::new()
        .set_target_width(target_width)
        .set_target_height(target_height);

    let bitmap = page
        .render_with_config(&render_config)
        .map_err(|e| BlockOcrError::Rasterization {
            page: 1,
            detail: format!("{e:?}"),
        })?;

    let image = bitmap.as_image();
    info!(
        "Rendered page 1 at zoom {zoom} → {}x{} px",
        image.width(),
        image.height()
    );

    std::fs::create_dir_all(out_dir).map_err(|e| BlockOcrError::Io {
        path: out_dir.to_path_buf(),
        source: e,
    })?;

    for (i, block) in blocks.iter().enumerate() {
        let index = i + 1;
        let rect = scaled_crop_rect(&block.bounds, zoom, image.width(), image.height())
            .map_err(|(w, h)| BlockOcrError::DegenerateRegion {
                index,
                width: w,
                height: h,
            })?;

        let crop = image.crop_imm(rect.x, rect.y, rect.width, rect.height);
        let crop_path = out_dir.join(format!("rectangle_{index}.png"));

        crop.save(&crop_path)
            .map_err(|e| BlockOcrError::Rasterization {
                page: 1,
                detail: format!("failed to save crop {index}: {e}"),
            })?;

        debug!(
            "Crop {index}: ({}, {}) {}x{} px → {}",
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            crop_path.display()
        );
    }

    Ok(blocks.len())
}

/// Scale a block's page-space bounds by `zoom`, round to integer pixels, and
/// intersect with the bitmap bounds.
///
/// Returns `Err((width, height))` with the signed post-clamp dimensions when
/// the rectangle is degenerate (zero or negative area).
pub fn scaled_crop_rect(
    bounds: &BlockBounds,
    zoom: f32,
    image_width: u32,
    image_height: u32,
) -> Result<CropRect, (i64, i64)> {
    let scale = |v: f32| (v * zoom).round() as i64;

    let x0 = scale(bounds.x0).clamp(0, image_width as i64);
    let y0 = scale(bounds.y0).clamp(0, image_height as i64);
    let x1 = scale(bounds.x1).clamp(0, image_width as i64);
    let y1 = scale(bounds.y1).clamp(0, image_height as i64);

    let (width, height) = (x1 - x0, y1 - y0);
    if width <= 0 || height <= 0 {
        return Err((width, height));
    }

    Ok(CropRect {
        x: x0 as u32,
        y: y0 as u32,
        width: width as u32,
        height: height as u32,
    })
}
