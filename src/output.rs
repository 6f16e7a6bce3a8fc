//! Output types for a completed conversion.

use serde::{Deserialize, Serialize};

/// Result of one PDF-to-text conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// Aggregated recognized text, one entry per region plus a trailing
    /// newline, in region order.
    pub text: String,
    /// Number of regions cropped and recognized (page-0 text blocks).
    pub region_count: usize,
    /// Per-stage timings.
    pub stats: ConversionStats,
}

/// Wall-clock timings for the pipeline stages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    pub locate_duration_ms: u64,
    pub render_duration_ms: u64,
    pub ocr_duration_ms: u64,
    pub total_duration_ms: u64,
}
