//! Mapping of core and auth errors onto HTTP responses.

use api_shared::auth::AuthError;
use api_shared::ErrorRes;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use hub_core::{ContentError, ErrorKind};

/// Every failure a handler can return.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("upload exceeds {limit} bytes")]
    PayloadTooLarge { limit: u64 },
    #[error("malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),
    #[error("{action}: {source}")]
    Io {
        action: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Content(e) => match e.kind() {
                ErrorKind::InvalidInput | ErrorKind::PathConfinement => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Conflict => StatusCode::CONFLICT,
                ErrorKind::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                ErrorKind::Io => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Auth(AuthError::Missing | AuthError::Invalid) => StatusCode::UNAUTHORIZED,
            ApiError::Auth(AuthError::NotConfigured) => StatusCode::FORBIDDEN,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Multipart(e) => e.status(),
            ApiError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            ApiError::Content(e) => e.public_message(),
            ApiError::Auth(e) => e.to_string(),
            ApiError::PayloadTooLarge { .. } => "File too large".into(),
            ApiError::Multipart(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                "File too large".into()
            }
            ApiError::Multipart(_) => "Malformed upload".into(),
            ApiError::Io { action, .. } => (*action).into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            let os_error = match &self {
                ApiError::Content(e) => e.os_error(),
                ApiError::Io { source, .. } => source.raw_os_error(),
                _ => None,
            };
            tracing::error!(?os_error, "request failed: {:?}", self);
        } else {
            tracing::debug!(%status, "request refused: {self}");
        }
        (status, Json(ErrorRes::new(self.public_message()))).into_response()
    }
}
