//! Learning Hub filesystem primitives
//!
//! This crate provides the low-level mutation primitives the content service builds on. Each
//! primitive favours eventual success over strict atomicity once a plain `rename(2)` is not
//! available, which is common on flash storage and network mounts.
//!
//! ## Fallback chains
//!
//! Directory renames ([`safe_rename`]) walk three tiers:
//!
//! ```text
//! 1. rename(old, new)                       atomic
//! 2. rename(old, .old.tmp-<ts>)             two atomic hops through a hidden sibling
//!    rename(.old.tmp-<ts>, new)
//! 3. copy_dir(current, new) + remove(current)   non-atomic, last resort
//! ```
//!
//! File moves ([`safe_move`]) never replace an existing destination. They walk two
//! tiers: a hard link at the destination followed by unlinking the source, then a
//! no-clobber copy when linking fails because of a cross-device, permission or
//! unsupported condition.
//!
//! Nothing is rolled back automatically. A failure in the last tier leaves whatever
//! is already on disk and is reported to the caller.
//!
//! ## Example Usage
//!
//! ```no_run
//! use hub_files::{safe_rename, RenameTier};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let tier = safe_rename(Path::new("content/Maths"), Path::new("content/maths"))?;
//! if tier != RenameTier::Direct {
//!     println!("rename degraded to {tier:?}");
//! }
//! # Ok(())
//! # }
//! ```

mod copy;
mod moves;
mod rename;
mod temp;

use std::io;
use std::path::PathBuf;

pub use copy::copy_dir_recursive;
pub use moves::{recase_file, safe_move, MoveTier};
pub use rename::{safe_rename, safe_rename_via_temp, RenameTier};
pub use temp::{scratch_file_name, unique_temp_sibling, TEMP_MARKER};

/// Errors that can occur during filesystem mutation
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    /// A rename step failed with a condition no fallback applies to
    #[error("rename {from} -> {to} failed: {source}", from = from.display(), to = to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Copying data to the destination failed
    #[error("copy {from} -> {to} failed: {source}", from = from.display(), to = to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Removing the source after a successful copy failed
    #[error("failed to remove {path}: {source}", path = path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A no-clobber step refused to write over an existing entry
    #[error("destination already exists: {0}")]
    DestinationExists(PathBuf),

    /// No unused temporary sibling name could be found
    #[error("no free temporary name next to {0}")]
    TempNameExhausted(PathBuf),

    /// Path has no parent or final component
    #[error("invalid path: {0}")]
    InvalidPath(PathBuf),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl FilesError {
    /// The OS error code behind this failure, if any, for diagnostics.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            FilesError::Rename { source, .. }
            | FilesError::Copy { source, .. }
            | FilesError::Remove { source, .. } => source.raw_os_error(),
            FilesError::Io(e) => e.raw_os_error(),
            _ => None,
        }
    }
}

/// Whether a failed rename is worth retrying through a fallback tier.
///
/// Covers permission/lock (`EPERM`, `EACCES`), cross-device (`EXDEV`), invalid
/// (`EINVAL`), busy (`EBUSY`) and non-empty-target (`ENOTEMPTY`) conditions.
pub fn is_retryable(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::PermissionDenied
            | io::ErrorKind::CrossesDevices
            | io::ErrorKind::InvalidInput
            | io::ErrorKind::ResourceBusy
            | io::ErrorKind::DirectoryNotEmpty
    )
}
