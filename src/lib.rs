//! # blockocr
//!
//! Convert an uploaded PDF to text by OCR-ing each text block individually.
//!
//! ## Why per-block OCR?
//!
//! Running Tesseract over a whole rendered page forces it to guess the page
//! layout, and multi-column or form-style documents come out interleaved.
//! Instead this crate asks the PDF itself where its text blocks are, crops
//! the rendered page around each block, and recognises every crop in
//! "single uniform block" mode — the layout is taken from the document's own
//! geometry rather than re-derived from pixels.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF upload
//!  │
//!  ├─ 1. Persist    write bytes into an isolated temp working directory
//!  ├─ 2. Locate     enumerate text blocks + bounding boxes via pdfium
//!  ├─ 3. Crop       render page 1 at the zoom factor, save rectangle_<i>.png per block
//!  ├─ 4. Recognise  threshold each crop and run tesseract --psm 6, in numeric filename order
//!  └─ 5. Respond    {"text": "<one line per region>"}
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use blockocr::{convert, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let output = convert("invoice.pdf".as_ref(), &config).await?;
//!     print!("{}", output.text);
//!     eprintln!("{} regions in {}ms", output.region_count, output.stats.total_duration_ms);
//!     Ok(())
//! }
//! ```
//!
//! Or run the server (`cli` feature, on by default):
//!
//! ```text
//! blockocr --port 8000
//! curl -F file=@invoice.pdf http://localhost:8000/upload_pdf/
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `blockocr` server binary (clap + anyhow + tracing-subscriber) |
//!
//! ## External engines
//!
//! Rendering and block geometry come from pdfium (loaded as a shared
//! library); recognition shells out to a Tesseract binary whose location is
//! part of [`ConversionConfig`], not process-global state.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, ServerConfig};
pub use convert::{convert, convert_from_bytes};
pub use error::BlockOcrError;
pub use output::{ConversionOutput, ConversionStats};
pub use pipeline::locate::{BlockBounds, TextBlock};
pub use server::{router, serve};
