//! Temporary names for rename hops and in-flight uploads.

use crate::FilesError;
use chrono::Utc;
use std::path::{Path, PathBuf};

/// Infix shared by every temporary sibling, so operators can recognise leftovers.
pub const TEMP_MARKER: &str = ".tmp-";

const MAX_TEMP_PROBES: u32 = 1_000;

/// Longest slice of the client name kept in a scratch name, in bytes. Leaves room for
/// the timestamp prefix under the usual 255-byte NAME_MAX.
const MAX_SCRATCH_NAME_BYTES: usize = 200;

/// Picks an unused hidden sibling of `path` to park it under during a two-hop rename.
///
/// The name is `.<file name>.tmp-<unix millis>`, with `-<n>` appended when that is
/// already taken. The leading dot keeps the entry out of every listing while it exists.
///
/// # Errors
///
/// Returns [`FilesError::InvalidPath`] when `path` has no parent or file name, and
/// [`FilesError::TempNameExhausted`] when every probed name is occupied.
pub fn unique_temp_sibling(path: &Path) -> Result<PathBuf, FilesError> {
    let parent = path
        .parent()
        .ok_or_else(|| FilesError::InvalidPath(path.to_path_buf()))?;
    let name = path
        .file_name()
        .ok_or_else(|| FilesError::InvalidPath(path.to_path_buf()))?
        .to_string_lossy();
    let stamp = Utc::now().timestamp_millis();

    for counter in 0..MAX_TEMP_PROBES {
        let candidate = if counter == 0 {
            parent.join(format!(".{name}{TEMP_MARKER}{stamp}"))
        } else {
            parent.join(format!(".{name}{TEMP_MARKER}{stamp}-{counter}"))
        };
        if std::fs::symlink_metadata(&candidate).is_err() {
            return Ok(candidate);
        }
    }

    Err(FilesError::TempNameExhausted(path.to_path_buf()))
}

/// Scratch file name for an upload: `<unix nanos>-<original name>`.
///
/// Anything that is not alphanumeric, `.`, `-` or `_` in the original name is replaced
/// with `_` so the scratch entry can never address another directory. The cleaned name
/// is cut to its first 200 bytes on a character boundary.
pub fn scratch_file_name(original_name: &str) -> String {
    let stamp = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_micros().saturating_mul(1_000));
    let mut cleaned = String::with_capacity(original_name.len().min(MAX_SCRATCH_NAME_BYTES));
    for c in original_name.chars() {
        let c = if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') {
            c
        } else {
            '_'
        };
        if cleaned.len() + c.len_utf8() > MAX_SCRATCH_NAME_BYTES {
            break;
        }
        cleaned.push(c);
    }
    format!("{stamp}-{cleaned}")
}
