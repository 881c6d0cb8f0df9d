//! Virtual path confinement.
//!
//! Clients address content with POSIX-style virtual paths (`/english/grade7`). The
//! [`PathResolver`] maps each one onto exactly one absolute path under the content
//! root, or refuses it with [`ContentError::PathConfinement`].
//!
//! Resolution is path algebra followed by one canonicalization of the deepest part of
//! the path that already exists. Lexically bad paths are refused before any disk access.
//!
//! ## Rules
//!
//! - Backslashes are treated as forward slashes.
//! - Empty segments are dropped, so `//a//b` and `/a/b/` are the same as `/a/b`.
//! - Any segment starting with `.` is refused. This covers `..` as well as hidden
//!   entries, which are never exposed through the API.
//! - Every remaining segment must be a single plain path component on this platform
//!   (no drive prefixes, no root markers).
//! - The deepest existing prefix, once symlinks are followed, must still be the root
//!   or lie below it. A symlinked folder pointing elsewhere is refused.

use crate::{ContentError, ContentResult};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Maps client-supplied virtual paths onto the content root.
#[derive(Clone, Debug)]
pub struct PathResolver {
    root: PathBuf,
}

/// A virtual path that has passed confinement, together with its absolute location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedPath {
    segments: Vec<String>,
    absolute: PathBuf,
}

impl PathResolver {
    /// `root` should already be absolute and canonical; `CoreConfig` guarantees this.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Confines `virtual_path` to the content root.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::PathConfinement`] for dot-prefixed segments, segments
    /// that are not a single plain component, or a path whose existing part leads
    /// outside the root through a symlink.
    pub fn resolve(&self, virtual_path: &str) -> ContentResult<ResolvedPath> {
        let normalised = virtual_path.replace('\\', "/");
        let segments: Vec<String> = normalised
            .trim_start_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect();

        let mut absolute = self.root.clone();
        for segment in &segments {
            if segment.starts_with('.') || segment.contains('\0') {
                return Err(ContentError::PathConfinement);
            }
            let mut components = Path::new(segment).components();
            match (components.next(), components.next()) {
                (Some(Component::Normal(_)), None) => absolute.push(segment),
                _ => return Err(ContentError::PathConfinement),
            }
        }

        // Path::starts_with compares whole components: `root` itself or `root/...`.
        if !absolute.starts_with(&self.root) {
            return Err(ContentError::PathConfinement);
        }
        self.confine_existing(&absolute)?;

        Ok(ResolvedPath { segments, absolute })
    }

    /// Canonicalizes the deepest existing ancestor of `absolute` (itself included) and
    /// checks it is still inside the root. Prefixes that do not exist are skipped; the
    /// root itself is canonical already.
    fn confine_existing(&self, absolute: &Path) -> ContentResult<()> {
        for candidate in absolute.ancestors() {
            if candidate == self.root || !candidate.starts_with(&self.root) {
                break;
            }
            match fs::canonicalize(candidate) {
                Ok(real) if real.starts_with(&self.root) => return Ok(()),
                Ok(real) => {
                    tracing::warn!(
                        path = %absolute.display(),
                        real = %real.display(),
                        "path leaves the content root through a symlink"
                    );
                    return Err(ContentError::PathConfinement);
                }
                Err(_) => continue,
            }
        }
        Ok(())
    }
}

impl ResolvedPath {
    pub fn absolute(&self) -> &Path {
        &self.absolute
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Final segment, or an empty string for the root.
    pub fn name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or("")
    }

    /// Normalised virtual path: `/` for the root, `/a/b` otherwise.
    pub fn virtual_path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    /// Virtual path of a child entry named `name`.
    pub fn child_virtual(&self, name: &str) -> String {
        if self.is_root() {
            format!("/{name}")
        } else {
            format!("{}/{name}", self.virtual_path())
        }
    }

    /// Virtual path and absolute location of the containing folder.
    ///
    /// The root is its own parent.
    pub fn parent(&self) -> ResolvedPath {
        if self.is_root() {
            return self.clone();
        }
        let mut segments = self.segments.clone();
        segments.pop();
        let absolute = self
            .absolute
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.absolute.clone());
        ResolvedPath { segments, absolute }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> PathResolver {
        PathResolver::new("/srv/content")
    }

    #[test]
    fn root_variants_resolve_to_root() {
        for input in ["", "/", "//", "\\"] {
            let resolved = resolver().resolve(input).unwrap();
            assert!(resolved.is_root(), "{input:?}");
            assert_eq!(resolved.absolute(), Path::new("/srv/content"));
            assert_eq!(resolved.virtual_path(), "/");
            assert_eq!(resolved.name(), "");
        }
    }

    #[test]
    fn empty_segments_collapse() {
        let a = resolver().resolve("//english//grade7/").unwrap();
        let b = resolver().resolve("/english/grade7").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.virtual_path(), "/english/grade7");
        assert_eq!(a.absolute(), Path::new("/srv/content/english/grade7"));
        assert_eq!(a.name(), "grade7");
    }

    #[test]
    fn backslashes_are_separators() {
        let resolved = resolver().resolve("\\english\\reading").unwrap();
        assert_eq!(resolved.virtual_path(), "/english/reading");
    }

    #[test]
    fn dotdot_is_refused_anywhere() {
        for input in [
            "..",
            "/..",
            "/../etc/passwd",
            "/english/../../etc",
            "/english/..",
            "english\\..\\..",
        ] {
            assert!(
                matches!(resolver().resolve(input), Err(ContentError::PathConfinement)),
                "{input:?}"
            );
        }
    }

    #[test]
    fn hidden_segments_are_refused() {
        for input in ["/.git", "/english/.env", "/./english", "/english/.hidden/x.pdf"] {
            assert!(
                matches!(resolver().resolve(input), Err(ContentError::PathConfinement)),
                "{input:?}"
            );
        }
    }

    #[test]
    fn nul_segment_is_refused() {
        assert!(matches!(
            resolver().resolve("/bad\0name"),
            Err(ContentError::PathConfinement)
        ));
    }

    #[test]
    fn child_and_parent_paths() {
        let root = resolver().resolve("/").unwrap();
        assert_eq!(root.child_virtual("math"), "/math");
        assert!(root.parent().is_root());

        let nested = resolver().resolve("/math/algebra").unwrap();
        assert_eq!(nested.child_virtual("unit 1"), "/math/algebra/unit 1");
        let parent = nested.parent();
        assert_eq!(parent.virtual_path(), "/math");
        assert_eq!(parent.absolute(), Path::new("/srv/content/math"));
    }

    #[test]
    fn names_with_inner_dots_are_fine() {
        let resolved = resolver().resolve("/notes/v1.2 final.pdf").unwrap();
        assert_eq!(resolved.name(), "v1.2 final.pdf");
    }

    #[test]
    fn missing_tail_below_real_folder_resolves() {
        let temp = tempfile::TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        fs::create_dir(root.join("math")).unwrap();
        let resolver = PathResolver::new(&root);

        let resolved = resolver.resolve("/math/not/yet/here.pdf").unwrap();
        assert_eq!(resolved.absolute(), root.join("math/not/yet/here.pdf"));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_folder_leading_outside_is_refused() {
        let content = tempfile::TempDir::new().unwrap();
        let outside = tempfile::TempDir::new().unwrap();
        let root = content.path().canonicalize().unwrap();
        fs::create_dir_all(outside.path().join("sub")).unwrap();
        fs::write(outside.path().join("sub/secret.pdf"), b"secret").unwrap();
        std::os::unix::fs::symlink(outside.path(), root.join("shared")).unwrap();
        let resolver = PathResolver::new(&root);

        for input in [
            "/shared",
            "/shared/sub",
            "/shared/sub/secret.pdf",
            "/shared/sub/new folder",
        ] {
            assert!(
                matches!(resolver.resolve(input), Err(ContentError::PathConfinement)),
                "{input:?}"
            );
        }
    }

    #[cfg(unix)]
    #[test]
    fn symlink_staying_inside_root_is_allowed() {
        let temp = tempfile::TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        fs::create_dir_all(root.join("math/algebra")).unwrap();
        std::os::unix::fs::symlink(root.join("math"), root.join("maths")).unwrap();

        let resolved = PathResolver::new(&root).resolve("/maths/algebra").unwrap();
        assert_eq!(resolved.virtual_path(), "/maths/algebra");
    }
}
