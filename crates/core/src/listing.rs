//! One-level directory listings.
//!
//! Listings are computed from disk on every call. Hidden entries (names starting
//! with `.`) are never emitted, and entries that are neither a plain directory nor a
//! regular file (symlinks, sockets, devices) are skipped as well.

use crate::mime::mime_for_name;
use crate::resolver::PathResolver;
use crate::{ContentError, ContentResult};
use api_shared::wire::{FileRes, ListNodesRes, NodeRes};
use std::fs;

/// Lists the folders and files directly inside `virtual_path`.
///
/// Directories and files come back as two separately sorted lists, each ordered
/// case-insensitively by name. A file that disappears between `read_dir` and `stat`
/// is skipped.
///
/// # Errors
///
/// - [`ContentError::PathConfinement`] if the path does not resolve under the root
/// - [`ContentError::NotFound`] if the target is missing or is not a directory
/// - [`ContentError::Io`] if the directory cannot be read
pub fn list_nodes(resolver: &PathResolver, virtual_path: &str) -> ContentResult<ListNodesRes> {
    let resolved = resolver.resolve(virtual_path)?;

    match fs::symlink_metadata(resolved.absolute()) {
        Ok(meta) if meta.is_dir() => {}
        _ => return Err(ContentError::NotFound("Folder not found")),
    }

    let mut dirs = Vec::new();
    let mut files = Vec::new();

    for entry in fs::read_dir(resolved.absolute()).map_err(ContentError::io("List failed"))? {
        let entry = entry.map_err(ContentError::io("List failed"))?;
        let Ok(name) = entry.file_name().into_string() else {
            tracing::debug!(path = %entry.path().display(), "skipping non UTF-8 entry");
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            dirs.push(NodeRes {
                path: resolved.child_virtual(&name),
                name,
            });
        } else if file_type.is_file() {
            let size = match entry.metadata() {
                Ok(meta) => meta.len(),
                Err(e) => {
                    tracing::debug!(name = %name, "entry vanished before stat: {e}");
                    continue;
                }
            };
            files.push(FileRes {
                path: resolved.child_virtual(&name),
                mime: mime_for_name(&name).map(str::to_owned),
                size,
                name,
            });
        }
    }

    dirs.sort_by(|a, b| sort_key(&a.name).cmp(&sort_key(&b.name)));
    files.sort_by(|a, b| sort_key(&a.name).cmp(&sort_key(&b.name)));

    Ok(ListNodesRes {
        path: resolved.virtual_path(),
        name: resolved.name().to_owned(),
        dirs,
        files,
    })
}

/// Case-insensitive ordering with the exact name as a tie-breaker.
pub(crate) fn sort_key(name: &str) -> (String, &str) {
    (name.to_lowercase(), name)
}
