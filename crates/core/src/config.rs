//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. The intent is to avoid reading process-wide environment variables
//! during request handling, which can lead to inconsistent behaviour in multi-threaded runtimes
//! and test harnesses.

use crate::constants::{DEFAULT_CONTENT_DIR, DEFAULT_UPLOAD_DIR_NAME};
use crate::resolver::PathResolver;
use crate::{ContentError, ContentResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    resolver: PathResolver,
    upload_scratch_dir: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// The content root must already exist and is canonicalised so that every resolved path
    /// shares its prefix. The scratch directory is created if missing and must not live inside
    /// the content root, otherwise half-written uploads would show up in listings.
    pub fn new(content_root: PathBuf, upload_scratch_dir: PathBuf) -> ContentResult<Self> {
        let root = content_root.canonicalize().map_err(|_| {
            ContentError::InvalidInput(format!(
                "content directory {} does not exist",
                content_root.display()
            ))
        })?;
        if !root.is_dir() {
            return Err(ContentError::InvalidInput(format!(
                "content directory {} is not a directory",
                root.display()
            )));
        }

        let inside_root = || {
            ContentError::InvalidInput(
                "upload scratch directory must be outside the content directory".into(),
            )
        };
        // Checked before and after creation: the second check catches symlinked parents.
        let absolute_content = std::path::absolute(&content_root)
            .map_err(ContentError::io("Resolve content directory failed"))?;
        let absolute_scratch = std::path::absolute(&upload_scratch_dir)
            .map_err(ContentError::io("Create upload directory failed"))?;
        if absolute_scratch.starts_with(&absolute_content) || absolute_scratch.starts_with(&root) {
            return Err(inside_root());
        }

        std::fs::create_dir_all(&upload_scratch_dir)
            .map_err(ContentError::io("Create upload directory failed"))?;
        let scratch = upload_scratch_dir
            .canonicalize()
            .map_err(ContentError::io("Create upload directory failed"))?;
        if scratch.starts_with(&root) {
            return Err(inside_root());
        }

        Ok(Self {
            resolver: PathResolver::new(root),
            upload_scratch_dir: scratch,
        })
    }

    pub fn content_root(&self) -> &Path {
        self.resolver.root()
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    pub fn upload_scratch_dir(&self) -> &Path {
        &self.upload_scratch_dir
    }
}

/// Parse the content directory from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns `./content`.
pub fn content_dir_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTENT_DIR))
}

/// Parse the upload scratch directory from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns a folder under the system temp dir.
pub fn upload_dir_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_UPLOAD_DIR_NAME))
}
