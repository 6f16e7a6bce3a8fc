//! Server binary for blockocr.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig` / `ServerConfig` and runs the HTTP server.

use anyhow::{Context, Result};
use blockocr::{serve, ConversionConfig, ServerConfig};
use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// OCR text blocks out of uploaded PDFs over HTTP.
#[derive(Debug, Parser)]
#[command(name = "blockocr", version, about)]
struct Cli {
    /// Listening address.
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,

    /// Listening port.
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// Path to the Tesseract executable.
    #[arg(long, env = "TESSERACT_CMD", default_value = "tesseract")]
    tesseract_cmd: PathBuf,

    /// Tesseract language spec, e.g. "eng" or "eng+deu".
    #[arg(long, default_value = "eng")]
    language: String,

    /// Zoom factor applied when rendering pages (0.5–8.0).
    #[arg(long, default_value_t = 2.0)]
    zoom: f32,

    /// Binarization cutoff applied to crops before OCR (0–255).
    #[arg(long, default_value_t = 120)]
    threshold: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "blockocr=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config = ConversionConfig::builder()
        .zoom(cli.zoom)
        .threshold(cli.threshold)
        .language(cli.language)
        .tesseract_cmd(cli.tesseract_cmd)
        .build()
        .context("invalid conversion settings")?;

    let server = ServerConfig {
        host: cli.host,
        port: cli.port,
    };

    tracing::info!(
        "blockocr v{} — tesseract: {}, zoom: {}",
        env!("CARGO_PKG_VERSION"),
        config.tesseract_cmd.display(),
        config.zoom
    );

    serve(&server, config)
        .await
        .with_context(|| format!("server failed on {}", server.addr()))
}
