//! # API REST
//!
//! REST API implementation for the Learning Hub.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, multipart uploads, CORS, admin gate)
//!
//! Uses `api-shared` for wire types and `hub-core` for every filesystem operation.

#![warn(rust_2018_idioms)]

pub mod admin;
pub mod error;
pub mod handlers;
pub mod raw;
pub mod upload;

use api_shared::auth::API_KEY_HEADER;
use api_shared::{
    CreateFolderReq, ErrorRes, FileRes, HealthRes, ListNodesRes, ModuleRes, NodeRes, OkRes,
    RenameReq,
};
use axum::extract::DefaultBodyLimit;
use axum::http::header::{InvalidHeaderValue, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method};
use axum::routing::get;
use axum::{middleware, Router};
use hub_core::constants::MAX_UPLOAD_BYTES;
use hub_core::ContentService;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use error::ApiError;

/// Headroom on top of the upload cap for multipart boundaries and the `path` part.
const MULTIPART_OVERHEAD: u64 = 1024 * 1024;

/// Application state shared across REST API handlers
#[derive(Clone)]
pub struct AppState {
    pub service: ContentService,
    /// Shared admin key. `None` refuses every mutation.
    pub admin_api_key: Option<Arc<str>>,
    /// Largest accepted upload in bytes.
    pub upload_limit: u64,
}

impl AppState {
    pub fn new(service: ContentService, admin_api_key: Option<String>) -> Self {
        Self {
            service,
            admin_api_key: admin_api_key
                .filter(|k| !k.trim().is_empty())
                .map(Arc::from),
            upload_limit: MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_upload_limit(mut self, limit: u64) -> Self {
        self.upload_limit = limit;
        self
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::list_nodes,
        handlers::list_modules,
        handlers::create_folder,
        handlers::rename_folder,
        handlers::delete_folder,
        handlers::upload_file,
        handlers::rename_file,
        handlers::delete_file,
    ),
    components(schemas(
        HealthRes,
        NodeRes,
        FileRes,
        ListNodesRes,
        ModuleRes,
        CreateFolderReq,
        RenameReq,
        OkRes,
        ErrorRes,
    ))
)]
pub struct ApiDoc;

/// Builds the full application router.
///
/// Listing, catalogue, health and raw file routes are open. Folder and file mutations
/// sit behind [`admin::require_admin`].
pub fn router(state: AppState) -> Router {
    let body_limit =
        usize::try_from(state.upload_limit.saturating_add(MULTIPART_OVERHEAD)).unwrap_or(usize::MAX);

    let admin_routes = Router::new()
        .route(
            "/api/folders",
            axum::routing::post(handlers::create_folder)
                .put(handlers::rename_folder)
                .delete(handlers::delete_folder),
        )
        .route(
            "/api/files",
            axum::routing::post(handlers::upload_file)
                .layer(DefaultBodyLimit::max(body_limit))
                .put(handlers::rename_file)
                .delete(handlers::delete_file),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin::require_admin,
        ));

    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/nodes", get(handlers::list_nodes))
        .route("/api/modules", get(handlers::list_modules))
        .route("/files/*path", get(raw::serve_file))
        .merge(admin_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy: a single allowed origin when one is configured, otherwise permissive.
pub fn cors_layer(origin: Option<&str>) -> Result<CorsLayer, InvalidHeaderValue> {
    let Some(origin) = origin.map(str::trim).filter(|o| !o.is_empty()) else {
        return Ok(CorsLayer::permissive());
    };
    Ok(CorsLayer::new()
        .allow_origin(HeaderValue::from_str(origin)?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(API_KEY_HEADER)]))
}
