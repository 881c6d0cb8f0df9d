//! Request and response bodies exchanged with clients.
//!
//! Request fields are optional at the serde level so that a missing field is reported
//! as an invalid-input error by the content service instead of a framework rejection.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// A directory in a listing, or the result of a create/rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NodeRes {
    /// Entry name (single segment)
    pub name: String,
    /// Virtual path, always starting with `/`
    pub path: String,
}

/// A file in a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FileRes {
    pub name: String,
    pub path: String,
    /// Size in bytes
    pub size: u64,
    /// MIME type derived from the extension, `null` when unknown
    pub mime: Option<String>,
}

/// One level of the content tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ListNodesRes {
    pub path: String,
    pub name: String,
    pub dirs: Vec<NodeRes>,
    pub files: Vec<FileRes>,
}

/// A file found by the recursive module catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ModuleRes {
    pub name: String,
    pub rel: String,
    pub size: u64,
    pub mime: Option<String>,
    /// Lower-cased parent segments joined by ` / `
    pub breadcrumbs: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateFolderReq {
    /// Parent folder virtual path
    pub path: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenameReq {
    /// Virtual path of the folder or file to rename
    pub path: Option<String>,
    pub new_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PathQuery {
    /// Virtual path, defaults to `/` for listings
    pub path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OkRes {
    pub ok: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

impl ErrorRes {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
