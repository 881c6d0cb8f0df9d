//! File upload / rename / delete.
//!
//! Uploads arrive as a fully written scratch file outside the content root. The
//! mutator validates the name and media type, then walks the candidate names
//! (`name`, `stem (2).ext`, ...) and moves the scratch file onto the first one that is
//! free. The move itself refuses to replace an entry, so a name claimed concurrently
//! is simply skipped. The scratch file is removed on every failure.

use crate::constants::MAX_DUPLICATE_PROBES;
use crate::folders::{require_dir, same_entry};
use crate::mime::AllowedMedia;
use crate::resolver::{PathResolver, ResolvedPath};
use crate::{ContentError, ContentResult};
use api_shared::wire::NodeRes;
use hub_files::{recase_file, safe_move, FilesError};
use hub_types::EntryName;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// A completed upload waiting in the scratch directory.
#[derive(Clone, Debug)]
pub struct IncomingFile {
    /// Name as sent by the client, possibly with a path prefix.
    pub original_name: String,
    /// Declared MIME type, if the client sent one.
    pub mime_hint: Option<String>,
    pub temp_location: PathBuf,
    pub byte_size: u64,
}

impl IncomingFile {
    /// Client name with any `/` or `\` prefix stripped.
    pub fn base_name(&self) -> &str {
        self.original_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.original_name)
    }

    /// Best-effort removal of the scratch file.
    pub fn discard(&self) {
        match fs::remove_file(&self.temp_location) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                temp = %self.temp_location.display(),
                "failed to remove scratch upload: {e}"
            ),
        }
    }
}

pub struct FileMutator<'a> {
    resolver: &'a PathResolver,
    max_duplicates: u32,
}

impl<'a> FileMutator<'a> {
    pub fn new(resolver: &'a PathResolver) -> Self {
        Self {
            resolver,
            max_duplicates: MAX_DUPLICATE_PROBES,
        }
    }

    /// Highest ` (n)` suffix tried before an upload gives up.
    pub fn with_duplicate_limit(mut self, max_duplicates: u32) -> Self {
        self.max_duplicates = max_duplicates;
        self
    }

    /// Moves `incoming` into the folder at `dest`, suffixing ` (n)` to avoid collisions.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` if:
    /// - `dest` fails confinement, is missing or is not a folder
    /// - the uploaded name is invalid after stripping its path prefix
    /// - the name or declared MIME type is outside the PDF/MP4 allow-list
    /// - no free name is found within the probe limit
    /// - the move into place fails
    pub fn upload(&self, dest: &str, incoming: &IncomingFile) -> ContentResult<NodeRes> {
        let result = self.place_upload(dest, incoming);
        if let Err(e) = &result {
            tracing::debug!(original = %incoming.original_name, "upload rejected: {e}");
        }
        // Normally already gone after a move; a copy may leave it behind.
        incoming.discard();
        result
    }

    fn place_upload(&self, dest: &str, incoming: &IncomingFile) -> ContentResult<NodeRes> {
        let folder = self.resolver.resolve(dest)?;
        require_dir(&folder, "Destination folder not found", "Destination is not a folder")?;

        let name = EntryName::new(incoming.base_name())?;
        let media = AllowedMedia::from_upload(name.as_str(), incoming.mime_hint.as_deref())
            .ok_or_else(|| ContentError::UnsupportedMediaType(name.as_str().to_owned()))?;

        let dir = folder.absolute();
        for candidate in candidate_names(&name, self.max_duplicates) {
            let target = dir.join(&candidate);
            if fs::symlink_metadata(&target).is_ok() {
                continue;
            }
            match safe_move(&incoming.temp_location, &target) {
                Ok(tier) => {
                    let path = folder.child_virtual(&candidate);
                    tracing::info!(
                        path = %path,
                        bytes = incoming.byte_size,
                        ?media,
                        ?tier,
                        "file uploaded"
                    );
                    return Ok(NodeRes {
                        name: candidate,
                        path,
                    });
                }
                Err(FilesError::DestinationExists(_)) => {
                    tracing::debug!(name = %candidate, "name claimed meanwhile, trying the next one");
                }
                Err(e) => return Err(ContentError::fs("Save failed")(e)),
            }
        }

        Err(ContentError::TooManyDuplicates(name.as_str().to_owned()))
    }

    /// Renames the file at `virtual_path` to `new_name` in the same folder.
    ///
    /// The new name must itself end in `.pdf` or `.mp4`. Collisions are refused rather
    /// than suffixed.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` if:
    /// - `new_name` is invalid or has a disallowed extension (`InvalidInput`)
    /// - the path fails confinement, is missing or is not a file
    /// - another entry already uses `new_name` (`Conflict`)
    /// - the move fails (`Filesystem`)
    pub fn rename(&self, virtual_path: &str, new_name: &str) -> ContentResult<NodeRes> {
        let new_name = EntryName::new(new_name)?;
        if AllowedMedia::from_name(new_name.as_str()).is_none() {
            return Err(ContentError::InvalidInput(
                "File name must end in .pdf or .mp4".into(),
            ));
        }

        let target = self.resolver.resolve(virtual_path)?;
        require_file(&target)?;

        let parent = target.parent();
        let old_abs = target.absolute();
        let new_abs = parent.absolute().join(new_name.as_str());
        let result = NodeRes {
            path: parent.child_virtual(new_name.as_str()),
            name: new_name.as_str().to_owned(),
        };
        if new_name.as_str() == target.name() {
            return Ok(result);
        }

        let recase =
            new_name.differs_only_in_case(target.name()) && same_entry(old_abs, &new_abs);
        if !recase && fs::symlink_metadata(&new_abs).is_ok() {
            return Err(NAME_TAKEN);
        }

        let moved = if recase {
            recase_file(old_abs, &new_abs)
        } else {
            safe_move(old_abs, &new_abs)
        };
        let tier = moved.map_err(|e| match e {
            FilesError::DestinationExists(_) => NAME_TAKEN,
            other => ContentError::fs("Rename failed")(other),
        })?;
        tracing::info!(
            from = %target.virtual_path(),
            to = %result.path,
            ?tier,
            "file renamed"
        );
        Ok(result)
    }

    /// Deletes the file at `virtual_path`.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` if the path fails confinement, is missing or is not a
    /// file, or if the removal itself fails.
    pub fn delete(&self, virtual_path: &str) -> ContentResult<()> {
        let target = self.resolver.resolve(virtual_path)?;
        require_file(&target)?;

        fs::remove_file(target.absolute()).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ContentError::NotFound("File not found"),
            _ => ContentError::Io {
                action: "Delete failed",
                source: e,
            },
        })?;

        tracing::info!(path = %target.virtual_path(), "file deleted");
        Ok(())
    }
}

const NAME_TAKEN: ContentError =
    ContentError::Conflict("A file or folder with that name already exists");

fn require_file(target: &ResolvedPath) -> ContentResult<()> {
    match fs::symlink_metadata(target.absolute()) {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(_) => Err(ContentError::NotAFile("Not a file")),
        Err(_) => Err(ContentError::NotFound("File not found")),
    }
}

/// Upload names in the order they are tried: `name`, `stem (2).ext`, ... `stem (max).ext`.
fn candidate_names(name: &EntryName, max: u32) -> impl Iterator<Item = String> + '_ {
    let (stem, ext) = name.split_extension();
    std::iter::once(name.as_str().to_owned())
        .chain((2..=max).map(move |n| format!("{stem} ({n}){ext}")))
}
