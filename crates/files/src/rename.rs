//! Three-tier directory rename
//!
//! [`safe_rename`] renames a directory and degrades through progressively less atomic
//! strategies when the platform refuses a plain rename with a transient condition
//! (locked handle, cross-device mount, busy flash controller, and so on).
//!
//! [`safe_rename_via_temp`] starts at the second tier. Case-only renames use it because
//! a case-insensitive filesystem may treat `Folder -> folder` as a no-op or a collision.
//!
//! # Tiers
//!
//! | Tier | Steps | Atomic |
//! |------|-------|--------|
//! | [`RenameTier::Direct`] | `rename(old, new)` | yes |
//! | [`RenameTier::TempHop`] | `rename(old, tmp)`, `rename(tmp, new)` | per hop |
//! | [`RenameTier::CopyThenRemove`] | copy the tree to `new`, remove the source | no |
//!
//! The third tier copies from wherever the data currently lives: the original path, or
//! the temporary sibling if the first hop of tier two succeeded. It refuses to run when
//! `new` already exists, so a case-only rename on a case-insensitive filesystem can never
//! copy a tree onto itself and then delete it.

use crate::copy::copy_dir_recursive;
use crate::temp::unique_temp_sibling;
use crate::{is_retryable, FilesError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Which strategy finally moved the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameTier {
    Direct,
    TempHop,
    CopyThenRemove,
}

/// Renames the directory at `old` to `new`, falling back through the temp-hop and
/// copy-then-remove tiers on retryable errors.
///
/// # Errors
///
/// Returns `FilesError::Rename` when the direct rename fails with a non-retryable error,
/// and the tier-three error (`Copy`, `Remove`, `DestinationExists`) when every tier fails.
pub fn safe_rename(old: &Path, new: &Path) -> Result<RenameTier, FilesError> {
    rename_chain(old, new, true, |from: &Path, to: &Path| fs::rename(from, to))
}

/// Same as [`safe_rename`] but skips the direct attempt and goes through a hidden
/// temporary sibling straight away.
///
/// # Errors
///
/// See [`safe_rename`].
pub fn safe_rename_via_temp(old: &Path, new: &Path) -> Result<RenameTier, FilesError> {
    rename_chain(old, new, false, |from: &Path, to: &Path| fs::rename(from, to))
}

pub(crate) fn rename_chain<R>(
    old: &Path,
    new: &Path,
    try_direct: bool,
    rename: R,
) -> Result<RenameTier, FilesError>
where
    R: Fn(&Path, &Path) -> io::Result<()>,
{
    if try_direct {
        match rename(old, new) {
            Ok(()) => return Ok(RenameTier::Direct),
            Err(e) if is_retryable(&e) => {
                tracing::warn!(
                    from = %old.display(),
                    to = %new.display(),
                    os_error = ?e.raw_os_error(),
                    "direct rename failed, retrying through temporary name: {e}"
                );
            }
            Err(e) => {
                return Err(FilesError::Rename {
                    from: old.to_path_buf(),
                    to: new.to_path_buf(),
                    source: e,
                })
            }
        }
    }

    let tmp = unique_temp_sibling(old)?;
    let current: PathBuf = match rename(old, &tmp) {
        Ok(()) => match rename(&tmp, new) {
            Ok(()) => return Ok(RenameTier::TempHop),
            Err(e) => {
                tracing::warn!(
                    from = %tmp.display(),
                    to = %new.display(),
                    os_error = ?e.raw_os_error(),
                    "second rename hop failed, falling back to copy: {e}"
                );
                tmp
            }
        },
        Err(e) => {
            tracing::warn!(
                from = %old.display(),
                to = %tmp.display(),
                os_error = ?e.raw_os_error(),
                "first rename hop failed, falling back to copy: {e}"
            );
            old.to_path_buf()
        }
    };

    if fs::symlink_metadata(new).is_ok() {
        return Err(FilesError::DestinationExists(new.to_path_buf()));
    }

    tracing::warn!(
        from = %current.display(),
        to = %new.display(),
        "copying directory tree; an interruption may leave both copies on disk"
    );
    copy_dir_recursive(&current, new).map_err(|source| FilesError::Copy {
        from: current.clone(),
        to: new.to_path_buf(),
        source,
    })?;
    fs::remove_dir_all(&current).map_err(|source| FilesError::Remove {
        path: current.clone(),
        source,
    })?;

    Ok(RenameTier::CopyThenRemove)
}
