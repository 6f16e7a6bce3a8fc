//! Pipeline stages for PDF-to-text conversion.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. switch the OCR engine) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! locate ──▶ crop ──▶ recognize
//! (pdfium)   (zoom + PNG crops)  (threshold + tesseract)
//! ```
//!
//! 1. [`locate`]    — enumerate text blocks with bounding boxes on every
//!    page; runs in `spawn_blocking` because pdfium is not async-safe
//! 2. [`crop`]      — render page 0 at the zoom factor, crop one PNG per
//!    block, write `rectangle_<i>.png` files in discovery order
//! 3. [`recognize`] — re-list the crops, sort by numeric filename index,
//!    binarize and OCR each one, concatenate the text
//! 4. [`sequence`]  — the numeric filename sort key shared by the crop
//!    naming and the recognition ordering

pub mod crop;
pub mod locate;
pub mod recognize;
pub mod sequence;
