use crate::copy::copy_file_no_clobber;
use crate::FilesError;
use std::fs;
use std::io;
use std::path::Path;

/// Which strategy finally placed the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveTier {
    /// Hard-linked at the destination, then unlinked at the source
    Linked,
    /// Plain rename of one entry onto a different spelling of itself
    Recased,
    /// Bytes copied into a newly created destination
    Copied,
}

/// Moves a regular file from `src` to `dst` without ever replacing an existing `dst`.
///
/// The first tier hard-links `src` at `dst`, which fails atomically when `dst` is taken,
/// and then unlinks `src`. If linking fails with a cross-device, permission or
/// unsupported error, the bytes are copied into a newly created `dst` instead. Any
/// other link error is fatal.
///
/// Once the data is in place a failure to remove `src` is logged and otherwise ignored.
///
/// # Errors
///
/// Returns `FilesError::DestinationExists` when `dst` already exists (in either tier),
/// `FilesError::Rename` for a fatal link error and `FilesError::Copy` when the fallback
/// copy fails (a partially written `dst` is removed again).
pub fn safe_move(src: &Path, dst: &Path) -> Result<MoveTier, FilesError> {
    move_with(
        src,
        dst,
        |from: &Path, to: &Path| fs::hard_link(from, to),
        |path: &Path| fs::remove_file(path),
    )
}

/// Changes only the letter case of a file name on a case-insensitive filesystem.
///
/// `src` and `dst` must already name the same directory entry, so the rename has
/// nothing else to replace.
///
/// # Errors
///
/// Returns `FilesError::Rename` when the rename fails.
pub fn recase_file(src: &Path, dst: &Path) -> Result<MoveTier, FilesError> {
    fs::rename(src, dst)
        .map(|()| MoveTier::Recased)
        .map_err(|source| FilesError::Rename {
            from: src.to_path_buf(),
            to: dst.to_path_buf(),
            source,
        })
}

pub(crate) fn move_with<L, R>(
    src: &Path,
    dst: &Path,
    link: L,
    remove: R,
) -> Result<MoveTier, FilesError>
where
    L: Fn(&Path, &Path) -> io::Result<()>,
    R: Fn(&Path) -> io::Result<()>,
{
    let tier = match link(src, dst) {
        Ok(()) => MoveTier::Linked,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Err(FilesError::DestinationExists(dst.to_path_buf()));
        }
        Err(e)
            if matches!(
                e.kind(),
                io::ErrorKind::CrossesDevices
                    | io::ErrorKind::PermissionDenied
                    | io::ErrorKind::Unsupported
            ) =>
        {
            tracing::warn!(
                from = %src.display(),
                to = %dst.display(),
                os_error = ?e.raw_os_error(),
                "hard link failed, copying file instead: {e}"
            );
            copy_file_no_clobber(src, dst).map_err(|source| {
                if source.kind() == io::ErrorKind::AlreadyExists {
                    FilesError::DestinationExists(dst.to_path_buf())
                } else {
                    FilesError::Copy {
                        from: src.to_path_buf(),
                        to: dst.to_path_buf(),
                        source,
                    }
                }
            })?;
            MoveTier::Copied
        }
        Err(source) => {
            return Err(FilesError::Rename {
                from: src.to_path_buf(),
                to: dst.to_path_buf(),
                source,
            });
        }
    };

    if let Err(e) = remove(src) {
        tracing::warn!(
            path = %src.display(),
            os_error = ?e.raw_os_error(),
            ?tier,
            "file is in place but the source could not be removed: {e}"
        );
    }
    Ok(tier)
}
