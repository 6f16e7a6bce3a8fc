//! Region recognition: OCR each persisted crop in numeric filename order and
//! concatenate the results.
//!
//! ## Why an external process?
//!
//! Tesseract is consumed as a subprocess rather than through C bindings: the
//! binary path is an injected [`ConversionConfig`] value, so the engine
//! location is per-config state instead of a process-wide global, and a
//! missing or broken install surfaces as an ordinary [`BlockOcrError::Ocr`]
//! instead of a link-time failure.
//!
//! ## Why threshold before OCR?
//!
//! A fixed binary cutoff (default 120) maps every pixel to pure black or
//! white. Anti-aliasing fringes and tinted backgrounds in the rendered crops
//! measurably hurt Tesseract's segmentation; a hard threshold removes both.

use crate::config::ConversionConfig;
use crate::error::BlockOcrError;
use crate::pipeline::sequence::sequence_key;
use image::{DynamicImage, GrayImage};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Crop files are `rectangle_<digits>.png`; anything else in the folder is
/// not ours and is ignored.
static REGION_FILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^rectangle_\d+\.png$").expect("valid regex"));

/// Tesseract page segmentation mode 6: "assume a single uniform block of
/// text". Each crop is exactly one block, so full page-layout analysis would
/// only misfire.
const PAGE_SEG_MODE: &str = "6";

/// OCR every region image in `crop_dir`, in numeric filename order, and
/// return the concatenated text — one recognized string plus `\n` per region.
///
/// Runs inside `spawn_blocking`: image decoding and the Tesseract subprocess
/// are blocking work.
///
/// # Errors
/// [`BlockOcrError::Ocr`] when a crop cannot be decoded or the engine is
/// unavailable or exits non-zero. The first failure aborts the remaining
/// regions; no partial result is returned.
pub async fn recognize_regions(
    crop_dir: &Path,
    config: &ConversionConfig,
) -> Result<String, BlockOcrError> {
    let dir = crop_dir.to_path_buf();
    let config = config.clone();

    tokio::task::spawn_blocking(move || recognize_blocking(&dir, &config))
        .await
        .map_err(|e| BlockOcrError::Internal(format!("recognise task panicked: {e}")))?
}

fn recognize_blocking(crop_dir: &Path, config: &ConversionConfig) -> Result<String, BlockOcrError> {
    let files = list_region_files(crop_dir)?;
    info!("Recognising {} regions from {}", files.len(), crop_dir.display());

    let mut aggregated = String::new();

    for path in &files {
        let image = image::open(path).map_err(|e| BlockOcrError::Ocr {
            path: path.clone(),
            detail: format!("failed to decode crop: {e}"),
        })?;

        let binarized = binarize(&image, config.threshold);
        let text = ocr_image(&binarized, path, config)?;

        debug!("Region {}: {} chars", path.display(), text.len());
        aggregated.push_str(text.trim_end());
        aggregated.push('\n');
    }

    Ok(aggregated)
}

/// List the region crop files in `crop_dir`, sorted by their numeric
/// filename index (ascending). OS directory-listing order is irrelevant.
pub fn list_region_files(crop_dir: &Path) -> Result<Vec<PathBuf>, BlockOcrError> {
    let entries = std::fs::read_dir(crop_dir).map_err(|e| BlockOcrError::Io {
        path: crop_dir.to_path_buf(),
        source: e,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| REGION_FILE.is_match(name))
        })
        .collect();

    files.sort_by_key(|path| {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(sequence_key)
            .unwrap_or(crate::pipeline::sequence::NO_SEQUENCE)
    });

    Ok(files)
}

/// Map every pixel above `cutoff` to white and the rest to black.
pub fn binarize(image: &DynamicImage, cutoff: u8) -> GrayImage {
    let mut gray = image.to_luma8();
    for pixel in gray.pixels_mut() {
        pixel.0[0] = if pixel.0[0] > cutoff { 255 } else { 0 };
    }
    gray
}

/// Run Tesseract on a binarized crop and return the recognized text.
///
/// The binarized image is written to a temporary PNG next to nothing the
/// caller can observe; `tesseract <input> stdout` keeps the output off disk.
fn ocr_image(
    binarized: &GrayImage,
    source: &Path,
    config: &ConversionConfig,
) -> Result<String, BlockOcrError> {
    let input = tempfile::Builder::new()
        .prefix("blockocr_")
        .suffix(".png")
        .tempfile()
        .map_err(|e| BlockOcrError::Ocr {
            path: source.to_path_buf(),
            detail: format!("failed to create temp image: {e}"),
        })?;

    binarized
        .save_with_format(input.path(), image::ImageFormat::Png)
        .map_err(|e| BlockOcrError::Ocr {
            path: source.to_path_buf(),
            detail: format!("failed to write temp image: {e}"),
        })?;

    let output = Command::new(&config.tesseract_cmd)
        .arg(input.path())
        .arg("stdout")
        .args(["-l", &config.language])
        .args(["--psm", PAGE_SEG_MODE])
        .output()
        .map_err(|e| BlockOcrError::Ocr {
            path: source.to_path_buf(),
            detail: format!(
                "failed to run '{}': {e}",
                config.tesseract_cmd.display()
            ),
        })?;

    if !output.status.success() {
        return Err(BlockOcrError::Ocr {
            path: source.to_path_buf(),
            detail: format!(
                "tesseract exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
