//! Top-level conversion entry points.
//!
//! [`convert`] drives the three pipeline stages against a PDF already on
//! disk; [`convert_from_bytes`] is the variant the HTTP handler uses — it
//! owns a per-request temporary working directory, so concurrent requests
//! never share an upload path or a crop folder, and everything is removed
//! when the request finishes regardless of outcome.

use crate::config::ConversionConfig;
use crate::error::BlockOcrError;
use crate::output::{ConversionOutput, ConversionStats};
use crate::pipeline::{crop, locate, recognize};
use std::io::Read;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Name of the crop folder inside each working directory.
const CROP_DIR_NAME: &str = "output_images";

/// Convert a PDF file to text: locate page-0 text blocks, crop each one from
/// the rendered page, OCR the crops, and concatenate the results.
///
/// Crop images live in a temporary directory owned by this call and are
/// deleted on return.
///
/// # Example
/// ```rust,no_run
/// use blockocr::{convert, ConversionConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ConversionConfig::default();
///     let output = convert("invoice.pdf".as_ref(), &config).await?;
///     println!("{}", output.text);
///     Ok(())
/// }
/// ```
///
/// # Errors
/// Any stage failure aborts the conversion; there are no partial results.
pub async fn convert(
    pdf_path: &Path,
    config: &ConversionConfig,
) -> Result<ConversionOutput, BlockOcrError> {
    let workdir = tempfile::tempdir().map_err(|e| BlockOcrError::Io {
        path: std::env::temp_dir(),
        source: e,
    })?;

    // `workdir` is dropped (and the crops deleted) when this returns
    convert_in_workdir(pdf_path, workdir.path(), config).await
}

/// Convert in-memory PDF bytes to text.
///
/// Writes `bytes` into a fresh temporary working directory under (the final
/// component of) `filename` and runs the pipeline there. This is the
/// per-request isolation boundary: no two calls ever touch the same paths.
pub async fn convert_from_bytes(
    bytes: &[u8],
    filename: &str,
    config: &ConversionConfig,
) -> Result<ConversionOutput, BlockOcrError> {
    let workdir = tempfile::tempdir().map_err(|e| BlockOcrError::Io {
        path: std::env::temp_dir(),
        source: e,
    })?;

    // Use only the final path component of the client-supplied name.
    let name = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("upload.pdf");
    let pdf_path = workdir.path().join(name);

    tokio::fs::write(&pdf_path, bytes)
        .await
        .map_err(|e| BlockOcrError::Io {
            path: pdf_path.clone(),
            source: e,
        })?;
    debug!("Persisted {} upload bytes to {}", bytes.len(), pdf_path.display());

    convert_in_workdir(&pdf_path, workdir.path(), config).await
}

async fn convert_in_workdir(
    pdf_path: &Path,
    workdir: &Path,
    config: &ConversionConfig,
) -> Result<ConversionOutput, BlockOcrError> {
    let total_start = Instant::now();
    info!("Starting conversion: {}", pdf_path.display());

    // ── Step 1: Validate magic bytes ─────────────────────────────────────
    // Cheap check before handing the file to pdfium, so a non-PDF upload
    // fails with a meaningful error rather than an engine crash report.
    check_pdf_magic(pdf_path)?;

    // ── Step 2: Locate text blocks ───────────────────────────────────────
    let locate_start = Instant::now();
    let blocks = locate::locate_text_blocks(pdf_path).await?;
    let locate_duration_ms = locate_start.elapsed().as_millis() as u64;

    // Single-page contract: only page 0 is rasterised. Blocks found on
    // later pages are dropped here, loudly.
    let later_pages = blocks.iter().filter(|b| b.page_index > 0).count();
    if later_pages > 0 {
        warn!(
            "Ignoring {later_pages} text blocks beyond page 1; only the first page is converted"
        );
    }
    let page_blocks: Vec<_> = blocks.into_iter().filter(|b| b.page_index == 0).collect();
    info!("Page 1 has {} text blocks", page_blocks.len());

    // ── Step 3: Rasterise and crop ───────────────────────────────────────
    let crop_dir = workdir.join(CROP_DIR_NAME);
    let render_start = Instant::now();
    let region_count = crop::rasterize_regions(pdf_path, &crop_dir, &page_blocks, config).await?;
    let render_duration_ms = render_start.elapsed().as_millis() as u64;
    info!("Wrote {region_count} region crops in {render_duration_ms}ms");

    // ── Step 4: Recognise regions ────────────────────────────────────────
    let ocr_start = Instant::now();
    let text = recognize::recognize_regions(&crop_dir, config).await?;
    let ocr_duration_ms = ocr_start.elapsed().as_millis() as u64;

    let stats = ConversionStats {
        locate_duration_ms,
        render_duration_ms,
        ocr_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Conversion complete: {} regions, {} chars, {}ms total",
        region_count,
        text.len(),
        stats.total_duration_ms
    );

    Ok(ConversionOutput {
        text,
        region_count,
        stats,
    })
}

/// Verify the file starts with the `%PDF` magic bytes.
fn check_pdf_magic(path: &Path) -> Result<(), BlockOcrError> {
    let mut file = std::fs::File::open(path).map_err(|e| BlockOcrError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut magic = [0u8; 4];
    match file.read_exact(&mut magic) {
        Ok(()) if &magic == b"%PDF" => Ok(()),
        Ok(()) => Err(BlockOcrError::NotAPdf {
            path: path.to_path_buf(),
            magic,
        }),
        // Shorter than 4 bytes cannot be a PDF either.
        Err(_) => Err(BlockOcrError::NotAPdf {
            path: path.to_path_buf(),
            magic,
        }),
    }
}
