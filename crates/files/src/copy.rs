use std::fs;
use std::io;
use std::path::Path;

/// Recursively copies a directory and its contents to a destination that must not exist yet.
///
/// The top-level destination is created with `create_dir`, so an existing entry at
/// `dst` is reported as `AlreadyExists` instead of being merged into. Files are
/// written with `create_new` semantics for the same reason. Hidden entries are
/// copied too, since the caller is relocating the whole directory.
///
/// # Errors
/// Returns an `std::io::Error` if:
/// - `dst` already exists,
/// - reading source directory entries fails,
/// - inspecting entry types fails,
/// - copying a file fails.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> io::Result<()> {
    fs::create_dir(dst)?;

    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let ty = entry.file_type()?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if ty.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            copy_file_no_clobber(&src_path, &dst_path)?;
        }
    }

    Ok(())
}

/// Copies `src` to a freshly created `dst`, failing if `dst` already exists.
///
/// A partially written `dst` is removed again before the error is returned.
pub(crate) fn copy_file_no_clobber(src: &Path, dst: &Path) -> io::Result<u64> {
    let mut reader = fs::File::open(src)?;
    let mut writer = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(dst)?;
    let result = io::copy(&mut reader, &mut writer).and_then(|n| writer.sync_all().map(|()| n));
    if result.is_err() {
        drop(writer);
        let _ = fs::remove_file(dst);
    }
    result
}
