//! Admin gate for mutating routes.

use crate::error::ApiError;
use crate::AppState;
use api_shared::auth::{validate_api_key, API_KEY_HEADER};
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

/// Middleware that lets a request through only when `x-api-key` matches the configured
/// admin key. Runs before any body is read, so refused uploads never touch disk.
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let provided = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    if let Err(e) = validate_api_key(provided, state.admin_api_key.as_deref()) {
        tracing::warn!(
            method = %req.method(),
            uri = %req.uri(),
            "admin request refused: {e}"
        );
        return Err(e.into());
    }
    Ok(next.run(req).await)
}
