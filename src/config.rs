//! Configuration types for the block-OCR pipeline and server.
//!
//! All pipeline behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share the config across request handlers and to log exactly
//! which settings produced a given output.
//!
//! The Tesseract binary location lives here as an injected value rather than
//! process-global state, so two servers in one process can point at two
//! different engine installs.

use crate::error::BlockOcrError;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

/// Configuration for one PDF-to-text conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use blockocr::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .zoom(3.0)
///     .language("eng+deu")
///     .tesseract_cmd("/usr/local/bin/tesseract")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Zoom factor applied when rendering the page. Range: 0.5–8.0. Default: 2.0.
    ///
    /// The rendered bitmap's pixel dimensions are the page's point dimensions
    /// multiplied by this factor, and every block bounding box is scaled by
    /// the same factor so crop coordinates line up with the pixel grid.
    /// 2.0 (≈144 DPI) is enough for Tesseract on ordinary body text; raise it
    /// for small-font documents at the cost of render time and memory.
    pub zoom: f32,

    /// Binarization cutoff applied to each crop before OCR. Default: 120.
    ///
    /// Grey values above the cutoff become white (255), the rest black (0).
    /// A hard threshold strips anti-aliasing haze and background tint that
    /// otherwise degrade recognition on low-contrast scans.
    pub threshold: u8,

    /// Tesseract language spec, e.g. `"eng"` or `"eng+deu"`. Default: `"eng"`.
    pub language: String,

    /// Path to the Tesseract executable. Default: `"tesseract"` (from `$PATH`).
    pub tesseract_cmd: PathBuf,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            zoom: 2.0,
            threshold: 120,
            language: "eng".to_string(),
            tesseract_cmd: PathBuf::from("tesseract"),
        }
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn zoom(mut self, zoom: f32) -> Self {
        self.config.zoom = zoom;
        self
    }

    pub fn threshold(mut self, cutoff: u8) -> Self {
        self.config.threshold = cutoff;
        self
    }

    pub fn language(mut self, lang: impl Into<String>) -> Self {
        self.config.language = lang.into();
        self
    }

    pub fn tesseract_cmd(mut self, cmd: impl Into<PathBuf>) -> Self {
        self.config.tesseract_cmd = cmd.into();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, BlockOcrError> {
        let c = &self.config;
        if !c.zoom.is_finite() || c.zoom < 0.5 || c.zoom > 8.0 {
            return Err(BlockOcrError::InvalidConfig(format!(
                "zoom must be 0.5–8.0, got {}",
                c.zoom
            )));
        }
        if c.language.is_empty() {
            return Err(BlockOcrError::InvalidConfig(
                "language must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

/// Listening address for the HTTP server. Defaults: all interfaces, port 8000.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8000,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> std::net::SocketAddr {
        std::net::SocketAddr::new(self.host, self.port)
    }
}
