//! Error types for the blockocr library.
//!
//! Every pipeline stage surfaces its own failure mode as a distinct variant
//! of [`BlockOcrError`], but the HTTP boundary never forwards the raw
//! message: [`BlockOcrError::public_message`] maps each variant to a short,
//! sanitized string for the response body, while the full detail is logged
//! server-side only.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the blockocr library.
#[derive(Debug, Error)]
pub enum BlockOcrError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// pdfium could not open or parse the document.
    #[error("Failed to open PDF '{path}': {detail}")]
    DocumentOpen { path: PathBuf, detail: String },

    // ── Rasterization errors ──────────────────────────────────────────────
    /// Page render or crop write failed.
    #[error("Rasterisation failed for page {page}: {detail}")]
    Rasterization { page: usize, detail: String },

    /// A block's bounding box collapses to zero or negative area once
    /// scaled and clamped to the rendered bitmap.
    #[error("Region {index} has a degenerate crop rectangle ({width}x{height} px)")]
    DegenerateRegion {
        index: usize,
        width: i64,
        height: i64,
    },

    // ── OCR errors ────────────────────────────────────────────────────────
    /// Tesseract missing, exited non-zero, or a crop file could not be
    /// decoded as an image.
    #[error("OCR failed on '{path}': {detail}")]
    Ocr { path: PathBuf, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Filesystem read/write failure outside the stages above.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (panicked blocking task etc.).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BlockOcrError {
    /// Sanitized message for the HTTP response body.
    ///
    /// Internal detail (paths, engine stderr, library debug output) stays in
    /// the server log; callers only learn which stage failed.
    pub fn public_message(&self) -> &'static str {
        match self {
            BlockOcrError::NotAPdf { .. } | BlockOcrError::DocumentOpen { .. } => {
                "failed to open document"
            }
            BlockOcrError::Rasterization { .. } | BlockOcrError::DegenerateRegion { .. } => {
                "failed to rasterise page"
            }
            BlockOcrError::Ocr { .. } => "text recognition failed",
            BlockOcrError::Io { .. } => "storage error",
            BlockOcrError::InvalidConfig(_) | BlockOcrError::Internal(_) => "internal error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_region_display() {
        let e = BlockOcrError::DegenerateRegion {
            index: 3,
            width: 0,
            height: -2,
        };
        let msg = e.to_string();
        assert!(msg.contains("Region 3"), "got: {msg}");
        assert!(msg.contains("0x-2"), "got: {msg}");
    }

    #[test]
    fn not_a_pdf_display() {
        let e = BlockOcrError::NotAPdf {
            path: PathBuf::from("notes.txt"),
            magic: *b"hell",
        };
        assert!(e.to_string().contains("notes.txt"));
    }

    #[test]
    fn public_messages_never_leak_detail() {
        let secret = "/var/data/private/invoice.pdf";
        let errors = [
            BlockOcrError::DocumentOpen {
                path: PathBuf::from(secret),
                detail: "xref table corrupt".into(),
            },
            BlockOcrError::Ocr {
                path: PathBuf::from(secret),
                detail: "tesseract: command not found".into(),
            },
            BlockOcrError::Internal(secret.into()),
        ];
        for e in errors {
            assert!(!e.public_message().contains("invoice"));
            assert!(!e.public_message().is_empty());
        }
    }
}
