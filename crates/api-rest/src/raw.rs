//! Raw byte retrieval under `/files/*path`.

use crate::error::ApiError;
use crate::AppState;
use axum::body::Body;
use axum::extract::{Path, Request, State};
use axum::http::{header, HeaderValue};
use axum::response::Response;
use hub_core::ContentError;
use tower::ServiceExt;
use tower_http::services::ServeFile;

/// Serves a file's bytes with range and conditional request support.
///
/// The path goes through the same confinement as every other route, so dot-segments
/// and hidden entries are refused before the filesystem is consulted. Only regular
/// files are served; folders and symlinks report not found.
pub async fn serve_file(
    State(state): State<AppState>,
    Path(path): Path<String>,
    req: Request,
) -> Result<Response, ApiError> {
    let resolved = state.service.config().resolver().resolve(&path)?;
    match tokio::fs::symlink_metadata(resolved.absolute()).await {
        Ok(meta) if meta.is_file() => {}
        _ => return Err(ContentError::NotFound("File not found").into()),
    }

    let mut res = ServeFile::new(resolved.absolute())
        .oneshot(req)
        .await
        .unwrap_or_else(|never| match never {})
        .map(Body::new);
    res.headers_mut().insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    Ok(res)
}
