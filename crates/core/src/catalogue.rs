//! Recursive module catalogue.
//!
//! Flattens every visible file below the top-level subject folders into one list,
//! with breadcrumbs that category pages use for grouping. Subjects named in
//! [`PREFERRED_SUBJECTS`] come first; files sitting directly in the content root are
//! not part of any subject and are left out.

use crate::constants::PREFERRED_SUBJECTS;
use crate::listing::sort_key;
use crate::mime::mime_for_name;
use api_shared::wire::ModuleRes;
use std::fs;
use std::path::Path;

/// Walks the content root and returns every visible file below a subject folder.
///
/// A missing or unreadable root yields an empty list. Unreadable subfolders and files
/// that vanish mid-walk are skipped.
pub fn list_modules(root: &Path) -> Vec<ModuleRes> {
    let Ok(top) = visible_entries(root) else {
        tracing::warn!(root = %root.display(), "content root unreadable, catalogue is empty");
        return Vec::new();
    };

    let subjects: Vec<String> = top
        .into_iter()
        .filter(|(_, is_dir)| *is_dir)
        .map(|(name, _)| name)
        .collect();
    let is_preferred = |name: &str| {
        PREFERRED_SUBJECTS
            .iter()
            .any(|p| p.eq_ignore_ascii_case(name))
    };
    let ordered = subjects
        .iter()
        .filter(|n| is_preferred(n))
        .chain(subjects.iter().filter(|n| !is_preferred(n)));

    let mut modules = Vec::new();
    for subject in ordered {
        walk(&root.join(subject), &[subject.clone()], &mut modules);
    }
    modules
}

fn walk(dir: &Path, rel_parts: &[String], out: &mut Vec<ModuleRes>) {
    let entries = match visible_entries(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(dir = %dir.display(), "skipping unreadable folder: {e}");
            return;
        }
    };

    for (name, is_dir) in entries {
        let path = dir.join(&name);
        let mut parts = rel_parts.to_vec();
        parts.push(name.clone());

        if is_dir {
            walk(&path, &parts, out);
            continue;
        }

        let Ok(meta) = fs::metadata(&path) else {
            continue;
        };
        let crumb_len = parts.len().saturating_sub(1).max(1);
        out.push(ModuleRes {
            rel: format!("/{}", parts.join("/")),
            size: meta.len(),
            mime: mime_for_name(&name).map(str::to_owned),
            breadcrumbs: parts[..crumb_len].join(" / ").to_lowercase(),
            name,
        });
    }
}

/// Visible plain directories and regular files of `dir`, sorted by name.
fn visible_entries(dir: &Path) -> std::io::Result<Vec<(String, bool)>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        match entry.file_type() {
            Ok(t) if t.is_dir() => entries.push((name, true)),
            Ok(t) if t.is_file() => entries.push((name, false)),
            _ => {}
        }
    }
    entries.sort_by(|a, b| sort_key(&a.0).cmp(&sort_key(&b.0)));
    Ok(entries)
}
