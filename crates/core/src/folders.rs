//! Folder create / rename / delete.
//!
//! ## Invariants
//!
//! - Names are validated with [`EntryName`] before any disk access.
//! - Creation is non-recursive and never idempotent: an existing entry is a conflict.
//! - Renames never replace an existing sibling. The only tolerated collision is a
//!   case-only rename of the folder onto itself, which goes through a hidden
//!   temporary sibling so case-insensitive filesystems cannot swallow it.
//! - Only empty folders are deleted. Hidden entries count, even though listings never
//!   show them.

use crate::resolver::{PathResolver, ResolvedPath};
use crate::{ContentError, ContentResult};
use api_shared::wire::NodeRes;
use hub_files::{safe_rename, safe_rename_via_temp};
use hub_types::EntryName;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub struct FolderMutator<'a> {
    resolver: &'a PathResolver,
}

impl<'a> FolderMutator<'a> {
    pub fn new(resolver: &'a PathResolver) -> Self {
        Self { resolver }
    }

    /// Creates folder `name` inside the existing folder `parent`.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` if:
    /// - `name` fails validation or `parent` fails confinement
    /// - the parent is missing (`NotFound`) or is not a folder (`NotADirectory`)
    /// - an entry called `name` already exists (`Conflict`)
    /// - the directory cannot be created (`Io`)
    pub fn create(&self, parent: &str, name: &str) -> ContentResult<NodeRes> {
        let name = EntryName::new(name)?;
        let parent = self.resolver.resolve(parent)?;
        require_dir(
            &parent,
            "Parent folder not found",
            "Parent is not a folder",
        )?;

        let target = parent.absolute().join(name.as_str());
        fs::create_dir(&target).map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => ContentError::Conflict("Folder already exists"),
            ErrorKind::NotFound => ContentError::NotFound("Parent folder not found"),
            _ => ContentError::Io {
                action: "Create folder failed",
                source: e,
            },
        })?;

        let path = parent.child_virtual(name.as_str());
        tracing::info!(path = %path, "folder created");
        Ok(NodeRes {
            name: name.into_string(),
            path,
        })
    }

    /// Renames the folder at `virtual_path` to `new_name`, keeping it in the same parent.
    ///
    /// Renaming to the current name is a successful no-op.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` if:
    /// - `new_name` fails validation or the path fails confinement
    /// - the target is the root, is missing, or is not a folder
    /// - another entry already uses `new_name` (`Conflict`)
    /// - every rename tier fails (`Filesystem`)
    pub fn rename(&self, virtual_path: &str, new_name: &str) -> ContentResult<NodeRes> {
        let new_name = EntryName::new(new_name)?;
        let target = self.resolver.resolve(virtual_path)?;
        if target.is_root() {
            return Err(ContentError::InvalidInput(
                "Cannot rename the root folder".into(),
            ));
        }
        require_dir(&target, "Folder not found", "Not a folder")?;

        let parent = target.parent();
        let old_abs = target.absolute();
        let new_abs = parent.absolute().join(new_name.as_str());
        let result = NodeRes {
            path: parent.child_virtual(new_name.as_str()),
            name: new_name.as_str().to_owned(),
        };

        if new_name.as_str() == target.name() || new_abs == old_abs {
            return Ok(result);
        }

        let case_only = new_name.differs_only_in_case(target.name());
        if fs::symlink_metadata(&new_abs).is_ok() && !(case_only && same_entry(old_abs, &new_abs))
        {
            return Err(ContentError::Conflict(
                "A folder or file with that name already exists",
            ));
        }

        let tier = if case_only {
            safe_rename_via_temp(old_abs, &new_abs)
        } else {
            safe_rename(old_abs, &new_abs)
        }
        .map_err(ContentError::fs("Rename failed"))?;

        tracing::info!(
            from = %target.virtual_path(),
            to = %result.path,
            ?tier,
            "folder renamed"
        );
        Ok(result)
    }

    /// Deletes the empty folder at `virtual_path`.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` if:
    /// - the path fails confinement or is the root
    /// - the target is missing or is not a folder
    /// - the folder has any entry, hidden ones included (`Conflict`)
    /// - the directory cannot be removed (`Io`)
    pub fn delete(&self, virtual_path: &str) -> ContentResult<()> {
        let target = self.resolver.resolve(virtual_path)?;
        if target.is_root() {
            return Err(ContentError::InvalidInput(
                "Cannot delete the root folder".into(),
            ));
        }
        require_dir(&target, "Folder not found", "Not a folder")?;

        let mut entries = fs::read_dir(target.absolute()).map_err(ContentError::io("Delete failed"))?;
        if entries.next().is_some() {
            return Err(ContentError::Conflict("Folder is not empty"));
        }

        fs::remove_dir(target.absolute()).map_err(|e| match e.kind() {
            ErrorKind::DirectoryNotEmpty => ContentError::Conflict("Folder is not empty"),
            ErrorKind::NotFound => ContentError::NotFound("Folder not found"),
            _ => ContentError::Io {
                action: "Delete failed",
                source: e,
            },
        })?;

        tracing::info!(path = %target.virtual_path(), "folder deleted");
        Ok(())
    }
}

pub(crate) fn require_dir(
    target: &ResolvedPath,
    missing: &'static str,
    wrong_type: &'static str,
) -> ContentResult<()> {
    match fs::symlink_metadata(target.absolute()) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ContentError::NotADirectory(wrong_type)),
        Err(_) => Err(ContentError::NotFound(missing)),
    }
}

/// True when both paths name the same directory entry (case-insensitive filesystems).
#[cfg(unix)]
pub(crate) fn same_entry(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;
    match (fs::symlink_metadata(a), fs::symlink_metadata(b)) {
        (Ok(x), Ok(y)) => x.dev() == y.dev() && x.ino() == y.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
pub(crate) fn same_entry(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(x), Ok(y)) => x == y,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, PathResolver) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        fs::create_dir_all(root.join("math/algebra")).unwrap();
        fs::write(root.join("math/syllabus.pdf"), b"%PDF").unwrap();
        (temp, PathResolver::new(root))
    }

    #[test]
    fn create_then_conflict() {
        let (_temp, resolver) = fixture();
        let folders = FolderMutator::new(&resolver);

        let node = folders.create("/math", "  geometry ").unwrap();
        assert_eq!(node.name, "geometry");
        assert_eq!(node.path, "/math/geometry");
        assert!(resolver.root().join("math/geometry").is_dir());

        assert!(matches!(
            folders.create("/math", "geometry"),
            Err(ContentError::Conflict(_))
        ));
    }

    #[test]
    fn create_conflicts_with_existing_file() {
        let (_temp, resolver) = fixture();
        assert!(matches!(
            FolderMutator::new(&resolver).create("/math", "syllabus.pdf"),
            Err(ContentError::Conflict(_))
        ));
    }

    #[test]
    fn create_at_root() {
        let (_temp, resolver) = fixture();
        let node = FolderMutator::new(&resolver).create("/", "science").unwrap();
        assert_eq!(node.path, "/science");
    }

    #[test]
    fn create_is_not_recursive() {
        let (_temp, resolver) = fixture();
        let folders = FolderMutator::new(&resolver);
        assert!(matches!(
            folders.create("/missing/deeper", "x"),
            Err(ContentError::NotFound(_))
        ));
        assert!(!resolver.root().join("missing").exists());
    }

    #[test]
    fn create_rejects_bad_names_and_parents() {
        let (_temp, resolver) = fixture();
        let folders = FolderMutator::new(&resolver);

        for bad in ["", "   ", ".hidden", "a/b", "a\\b", "nul\0"] {
            assert!(
                matches!(folders.create("/math", bad), Err(ContentError::InvalidName(_))),
                "{bad:?}"
            );
        }
        assert!(matches!(
            folders.create("/math/syllabus.pdf", "x"),
            Err(ContentError::NotADirectory(_))
        ));
        assert!(matches!(
            folders.create("/../outside", "x"),
            Err(ContentError::PathConfinement)
        ));
    }

    #[test]
    fn rename_moves_within_parent() {
        let (_temp, resolver) = fixture();
        let folders = FolderMutator::new(&resolver);

        let node = folders.rename("/math/algebra", "Algebra I").unwrap();

        assert_eq!(node.name, "Algebra I");
        assert_eq!(node.path, "/math/Algebra I");
        assert!(!resolver.root().join("math/algebra").exists());
        assert!(resolver.root().join("math/Algebra I").is_dir());
    }

    #[test]
    fn rename_to_same_name_is_noop() {
        let (_temp, resolver) = fixture();
        let node = FolderMutator::new(&resolver)
            .rename("/math/algebra", "algebra")
            .unwrap();
        assert_eq!(node.path, "/math/algebra");
        assert!(resolver.root().join("math/algebra").is_dir());
    }

    #[test]
    fn rename_refuses_to_clobber() {
        let (_temp, resolver) = fixture();
        fs::create_dir(resolver.root().join("math/geometry")).unwrap();
        fs::write(resolver.root().join("math/geometry/keep.pdf"), b"keep").unwrap();
        let folders = FolderMutator::new(&resolver);

        assert!(matches!(
            folders.rename("/math/algebra", "geometry"),
            Err(ContentError::Conflict(_))
        ));
        assert!(matches!(
            folders.rename("/math/algebra", "syllabus.pdf"),
            Err(ContentError::Conflict(_))
        ));
        assert!(resolver.root().join("math/algebra").is_dir());
        assert!(resolver.root().join("math/geometry/keep.pdf").is_file());
    }

    #[test]
    fn case_only_rename_succeeds() {
        let (_temp, resolver) = fixture();
        fs::create_dir(resolver.root().join("Folder")).unwrap();
        fs::write(resolver.root().join("Folder/a.pdf"), b"a").unwrap();

        let node = FolderMutator::new(&resolver).rename("/Folder", "folder").unwrap();

        assert_eq!(node.path, "/folder");
        let names: Vec<String> = fs::read_dir(resolver.root())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.eq_ignore_ascii_case("folder") || n.starts_with('.'))
            .collect();
        assert_eq!(names, vec!["folder".to_string()]);
        assert!(resolver.root().join("folder/a.pdf").is_file());
    }

    #[test]
    fn rename_rejects_root_files_and_missing() {
        let (_temp, resolver) = fixture();
        let folders = FolderMutator::new(&resolver);

        assert!(matches!(
            folders.rename("/", "x"),
            Err(ContentError::InvalidInput(_))
        ));
        assert!(matches!(
            folders.rename("/math/syllabus.pdf", "x"),
            Err(ContentError::NotADirectory(_))
        ));
        assert!(matches!(
            folders.rename("/math/nope", "x"),
            Err(ContentError::NotFound(_))
        ));
        assert!(matches!(
            folders.rename("/math/algebra", ".secret"),
            Err(ContentError::InvalidName(_))
        ));
    }

    #[test]
    fn delete_only_empty_folders() {
        let (_temp, resolver) = fixture();
        let folders = FolderMutator::new(&resolver);
        let dir = resolver.root().join("math/algebra");
        fs::write(dir.join(".gitkeep"), b"").unwrap();

        assert!(matches!(
            folders.delete("/math/algebra"),
            Err(ContentError::Conflict(_))
        ));
        assert!(dir.is_dir());

        fs::remove_file(dir.join(".gitkeep")).unwrap();
        folders.delete("/math/algebra").unwrap();
        assert!(!dir.exists());
    }

    #[test]
    fn delete_rejects_root_files_and_missing() {
        let (_temp, resolver) = fixture();
        let folders = FolderMutator::new(&resolver);

        assert!(matches!(folders.delete("/"), Err(ContentError::InvalidInput(_))));
        assert!(matches!(
            folders.delete("/math/syllabus.pdf"),
            Err(ContentError::NotADirectory(_))
        ));
        assert!(matches!(
            folders.delete("/math/gone"),
            Err(ContentError::NotFound(_))
        ));
    }
}
