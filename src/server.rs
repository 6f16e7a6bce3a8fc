//! HTTP surface: one multipart upload endpoint driving the pipeline.
//!
//! `POST /upload_pdf/` accepts a multipart body with a `file` field carrying
//! PDF bytes and replies `200 {"text": …}` on success. Every pipeline
//! failure is logged with full detail and answered with
//! `500 {"error": "<sanitized message>"}` — internal paths and engine output
//! never reach the caller.

use crate::config::{ConversionConfig, ServerConfig};
use crate::convert::convert_from_bytes;
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Uploads above this size are rejected before buffering. 100 MB covers any
/// realistic single-document scan.
const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Shared handler state: the conversion settings chosen at startup.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConversionConfig>,
}

#[derive(Serialize)]
struct ConvertResponse {
    text: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Build the application router.
pub fn router(config: ConversionConfig) -> Router {
    Router::new()
        .route("/upload_pdf/", post(upload_pdf))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState {
            config: Arc::new(config),
        })
}

/// Bind `server.addr()` and serve the router until the process exits.
pub async fn serve(server: &ServerConfig, config: ConversionConfig) -> std::io::Result<()> {
    let addr = server.addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{addr}");
    axum::serve(listener, router(config)).await
}

/// POST /upload_pdf/
///
/// Reads the `file` multipart field, runs the conversion pipeline in an
/// isolated working directory, and returns the aggregated text.
async fn upload_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ConvertResponse>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "upload.pdf".to_string());

        let data = field
            .bytes()
            .await
            .map_err(|e| bad_request(format!("failed to read upload: {e}")))?;

        info!(bytes = data.len(), filename = %filename, "Received PDF upload");

        let output = convert_from_bytes(&data, &filename, &state.config)
            .await
            .map_err(|e| {
                error!(error = %e, filename = %filename, "Conversion failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: e.public_message().to_string(),
                    }),
                )
            })?;

        return Ok(Json(ConvertResponse { text: output.text }));
    }

    Err(bad_request("missing 'file' field in multipart body"))
}
