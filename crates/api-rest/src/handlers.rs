//! JSON handlers for the content tree.

use crate::error::ApiError;
use crate::upload;
use crate::AppState;
use api_shared::{
    CreateFolderReq, ErrorRes, HealthRes, HealthService, ListNodesRes, ModuleRes, NodeRes,
    OkRes, PathQuery, RenameReq,
};
use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::Json;

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used by process supervisors and the web client to confirm the server is up.
#[axum::debug_handler]
pub async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/api/nodes",
    params(PathQuery),
    responses(
        (status = 200, description = "Folders and files directly inside the path", body = ListNodesRes),
        (status = 400, description = "Invalid path", body = ErrorRes),
        (status = 404, description = "Folder not found", body = ErrorRes)
    )
)]
/// List one folder of the content tree
///
/// A missing `path` lists the root. Hidden entries are never returned.
#[axum::debug_handler]
pub async fn list_nodes(
    State(state): State<AppState>,
    Query(query): Query<PathQuery>,
) -> Result<Json<ListNodesRes>, ApiError> {
    Ok(Json(state.service.list_nodes(query.path).await?))
}

#[utoipa::path(
    get,
    path = "/api/modules",
    responses(
        (status = 200, description = "Every file below the subject folders", body = [ModuleRes])
    )
)]
#[axum::debug_handler]
pub async fn list_modules(
    State(state): State<AppState>,
) -> Result<Json<Vec<ModuleRes>>, ApiError> {
    Ok(Json(state.service.catalogue().await?))
}

#[utoipa::path(
    post,
    path = "/api/folders",
    request_body = CreateFolderReq,
    responses(
        (status = 201, description = "Folder created", body = NodeRes),
        (status = 400, description = "Invalid name or path", body = ErrorRes),
        (status = 401, description = "Missing or wrong admin key", body = ErrorRes),
        (status = 404, description = "Parent folder not found", body = ErrorRes),
        (status = 409, description = "Folder already exists", body = ErrorRes)
    )
)]
/// Create a folder inside an existing folder
#[axum::debug_handler]
pub async fn create_folder(
    State(state): State<AppState>,
    Json(req): Json<CreateFolderReq>,
) -> Result<(StatusCode, Json<NodeRes>), ApiError> {
    let node = state.service.create_folder(req.path, req.name).await?;
    Ok((StatusCode::CREATED, Json(node)))
}

#[utoipa::path(
    put,
    path = "/api/folders",
    request_body = RenameReq,
    responses(
        (status = 200, description = "Folder renamed", body = NodeRes),
        (status = 400, description = "Invalid name or path", body = ErrorRes),
        (status = 404, description = "Folder not found", body = ErrorRes),
        (status = 409, description = "Target name exists", body = ErrorRes),
        (status = 500, description = "Rename failed", body = ErrorRes)
    )
)]
/// Rename a folder in place
///
/// Case-only renames (`Folder` to `folder`) are supported on every filesystem.
#[axum::debug_handler]
pub async fn rename_folder(
    State(state): State<AppState>,
    Json(req): Json<RenameReq>,
) -> Result<Json<NodeRes>, ApiError> {
    Ok(Json(state.service.rename_folder(req.path, req.new_name).await?))
}

#[utoipa::path(
    delete,
    path = "/api/folders",
    params(PathQuery),
    responses(
        (status = 200, description = "Folder deleted", body = OkRes),
        (status = 404, description = "Folder not found", body = ErrorRes),
        (status = 409, description = "Folder is not empty", body = ErrorRes)
    )
)]
/// Delete an empty folder
#[axum::debug_handler]
pub async fn delete_folder(
    State(state): State<AppState>,
    Query(query): Query<PathQuery>,
) -> Result<Json<OkRes>, ApiError> {
    state.service.delete_folder(query.path).await?;
    Ok(Json(OkRes { ok: true }))
}

#[utoipa::path(
    post,
    path = "/api/files",
    request_body(
        content = String,
        content_type = "multipart/form-data",
        description = "`path` text part and `file` part"
    ),
    responses(
        (status = 201, description = "File stored", body = NodeRes),
        (status = 400, description = "Missing path or file", body = ErrorRes),
        (status = 404, description = "Destination folder not found", body = ErrorRes),
        (status = 413, description = "File too large", body = ErrorRes),
        (status = 415, description = "Only PDF and MP4 files are allowed", body = ErrorRes)
    )
)]
/// Upload a PDF or MP4 into a folder
///
/// Duplicate names get a ` (n)` suffix before the extension.
#[axum::debug_handler]
pub async fn upload_file(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<NodeRes>), ApiError> {
    let form = upload::receive(multipart, state.service.scratch_dir(), state.upload_limit).await?;
    let node = state.service.upload_file(form.path, form.file).await?;
    Ok((StatusCode::CREATED, Json(node)))
}

#[utoipa::path(
    put,
    path = "/api/files",
    request_body = RenameReq,
    responses(
        (status = 200, description = "File renamed", body = NodeRes),
        (status = 400, description = "Invalid name, type or path", body = ErrorRes),
        (status = 404, description = "File not found", body = ErrorRes),
        (status = 409, description = "Target name exists", body = ErrorRes)
    )
)]
/// Rename a file in place, keeping it a PDF or MP4
#[axum::debug_handler]
pub async fn rename_file(
    State(state): State<AppState>,
    Json(req): Json<RenameReq>,
) -> Result<Json<NodeRes>, ApiError> {
    Ok(Json(state.service.rename_file(req.path, req.new_name).await?))
}

#[utoipa::path(
    delete,
    path = "/api/files",
    params(PathQuery),
    responses(
        (status = 200, description = "File deleted", body = OkRes),
        (status = 404, description = "File not found", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn delete_file(
    State(state): State<AppState>,
    Query(query): Query<PathQuery>,
) -> Result<Json<OkRes>, ApiError> {
    state.service.delete_file(query.path).await?;
    Ok(Json(OkRes { ok: true }))
}
