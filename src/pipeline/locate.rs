//! Text-block location: enumerate every text block on every page with its
//! bounding box in page coordinates.
//!
//! pdfium reports coordinates with a bottom-left origin while the rendered
//! bitmap (and every crop computed from it) is top-left. The flip happens
//! here, once, so everything downstream works in a single convention:
//! y grows downward, `y0 < y1`.

use crate::error::BlockOcrError;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Bounding box in top-left-origin page points. `x0 < x1`, `y0 < y1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockBounds {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

/// One text block located on a page. Immutable after creation.
#[derive(Debug, Clone)]
pub struct TextBlock {
    /// 0-based page the block was found on.
    pub page_index: usize,
    /// Block text, trimmed of leading/trailing whitespace.
    pub text: String,
    pub bounds: BlockBounds,
}

/// Locate every text block in the document, in native enumeration order.
///
/// Walks all pages; non-text page content (images, vector paths) is never
/// yielded by the text API, and segments that are pure whitespace are
/// dropped. Runs inside `spawn_blocking` since pdfium is not async-safe.
///
/// # Errors
/// [`BlockOcrError::DocumentOpen`] when the path does not refer to a
/// parseable PDF.
pub async fn locate_text_blocks(pdf_path: &Path) -> Result<Vec<TextBlock>, BlockOcrError> {
    let path = pdf_path.to_path_buf();

    tokio::task::spawn_blocking(move || locate_blocking(&path))
        .await
        .map_err(|e| BlockOcrError::Internal(format!("locate task panicked: {e}")))?
}

fn locate_blocking(pdf_path: &Path) -> Result<Vec<TextBlock>, BlockOcrError> {
    let pdfium = Pdfium::default();

    let document =
        pdfium
            .load_pdf_from_file(pdf_path, None)
            .map_err(|e| BlockOcrError::DocumentOpen {
                path: pdf_path.to_path_buf(),
                detail: format!("{e:?}"),
            })?;

    let mut blocks = Vec::new();
    let pages = document.pages();

    for (page_index, page) in pages.iter().enumerate() {
        let page_height = page.height().value;

        let text_page = page.text().map_err(|e| BlockOcrError::DocumentOpen {
            path: pdf_path.to_path_buf(),
            detail: format!("text extraction failed on page {}: {e:?}", page_index + 1),
        })?;

        for segment in text_page.segments().iter() {
            let text = segment.text();
            if text.trim().is_empty() {
                continue;
            }

            let b = segment.bounds();
            blocks.push(TextBlock {
                page_index,
                text: text.trim().to_string(),
                bounds: BlockBounds {
                    x0: b.left().value,
                    y0: page_height - b.top().value,
                    x1: b.right().value,
                    y1: page_height - b.bottom().value,
                },
            });
        }

        debug!(
            "Page {}: {} text blocks so far",
            page_index + 1,
            blocks.len()
        );
    }

    info!("Located {} text blocks", blocks.len());

    Ok(blocks)
}
