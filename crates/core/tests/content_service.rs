//! End-to-end tests for the async content service.
//!
//! Each test builds a fresh content root and scratch directory, then drives the
//! service the way the REST layer does: optional inputs in, wire types out.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use hub_core::{ContentError, ContentService, CoreConfig, ErrorKind, IncomingFile};
use tempfile::TempDir;

// ============================================================================
// Shared test setup
// ============================================================================

struct Hub {
    _content: TempDir,
    _scratch: TempDir,
    service: ContentService,
}

impl Hub {
    fn new() -> Self {
        let content = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        fs::create_dir(content.path().join("a")).unwrap();
        let cfg = CoreConfig::new(
            content.path().to_path_buf(),
            scratch.path().join("uploads"),
        )
        .unwrap();
        Self {
            _content: content,
            _scratch: scratch,
            service: ContentService::new(Arc::new(cfg)),
        }
    }

    fn root(&self) -> PathBuf {
        self.service.config().content_root().to_path_buf()
    }

    fn scratch_upload(&self, name: &str, mime: &str) -> IncomingFile {
        let temp_location = self
            .service
            .scratch_dir()
            .join(hub_files::scratch_file_name(name));
        fs::write(&temp_location, b"payload").unwrap();
        IncomingFile {
            original_name: name.into(),
            mime_hint: Some(mime.into()),
            temp_location,
            byte_size: 7,
        }
    }

    async fn names_in(&self, path: &str) -> (Vec<String>, Vec<String>) {
        let listing = self.service.list_nodes(Some(path.into())).await.unwrap();
        (
            listing.dirs.into_iter().map(|d| d.name).collect(),
            listing.files.into_iter().map(|f| f.name).collect(),
        )
    }
}

// ============================================================================
// Confinement and listing
// ============================================================================

#[tokio::test]
async fn traversal_is_refused_everywhere() {
    let hub = Hub::new();
    let s = &hub.service;

    for path in ["/..", "/a/../..", "..\\..\\etc", "/a/.hidden"] {
        let err = s.list_nodes(Some(path.into())).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PathConfinement, "{path}");
        assert_eq!(err.public_message(), "Invalid path");
    }
    let err = s
        .create_folder(Some("/../".into()), Some("x".into()))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PathConfinement);
    let err = s.delete_file(Some("/a/../../x.pdf".into())).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PathConfinement);
}

#[cfg(unix)]
#[tokio::test]
async fn symlinked_folder_cannot_reach_outside_root() {
    let hub = Hub::new();
    let outside = TempDir::new().unwrap();
    fs::create_dir(outside.path().join("sub")).unwrap();
    let secret = outside.path().join("sub/secret.pdf");
    fs::write(&secret, b"secret").unwrap();
    std::os::unix::fs::symlink(outside.path(), hub.root().join("shared")).unwrap();
    let s = &hub.service;

    let err = s.list_nodes(Some("/shared/sub".into())).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PathConfinement);
    let err = s
        .delete_file(Some("/shared/sub/secret.pdf".into()))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PathConfinement);
    let err = s
        .create_folder(Some("/shared/sub".into()), Some("x".into()))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PathConfinement);
    let incoming = hub.scratch_upload("drop.pdf", "application/pdf");
    let err = s
        .upload_file(Some("/shared".into()), Some(incoming.clone()))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PathConfinement);

    assert_eq!(fs::read(&secret).unwrap(), b"secret");
    assert!(!outside.path().join("sub/x").exists());
    assert!(!outside.path().join("drop.pdf").exists());
    assert!(!incoming.temp_location.exists());
}

#[tokio::test]
async fn listings_never_show_dotfiles() {
    let hub = Hub::new();
    fs::create_dir(hub.root().join("a/.git")).unwrap();
    fs::write(hub.root().join("a/.env"), b"SECRET=1").unwrap();
    fs::write(hub.root().join("a/visible.pdf"), b"x").unwrap();

    let (dirs, files) = hub.names_in("/a").await;

    assert!(dirs.is_empty());
    assert_eq!(files, vec!["visible.pdf"]);
}

#[tokio::test]
async fn missing_list_path_means_root() {
    let hub = Hub::new();
    let listing = hub.service.list_nodes(None).await.unwrap();
    assert_eq!(listing.path, "/");
    assert_eq!(listing.dirs[0].path, "/a");
}

// ============================================================================
// Folders
// ============================================================================

#[tokio::test]
async fn create_list_and_conflict() {
    let hub = Hub::new();
    let s = &hub.service;

    let node = s
        .create_folder(Some("/a".into()), Some("new".into()))
        .await
        .unwrap();
    assert_eq!((node.name.as_str(), node.path.as_str()), ("new", "/a/new"));

    let listing = s.list_nodes(Some("/a".into())).await.unwrap();
    assert!(listing
        .dirs
        .iter()
        .any(|d| d.name == "new" && d.path == "/a/new"));

    let err = s
        .create_folder(Some("/a".into()), Some("new".into()))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn delete_refuses_hidden_contents_until_emptied() {
    let hub = Hub::new();
    let s = &hub.service;
    fs::create_dir(hub.root().join("a/old")).unwrap();
    fs::write(hub.root().join("a/old/.keep"), b"").unwrap();

    let err = s.delete_folder(Some("/a/old".into())).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    fs::remove_file(hub.root().join("a/old/.keep")).unwrap();
    s.delete_folder(Some("/a/old".into())).await.unwrap();
    assert!(!hub.root().join("a/old").exists());
}

#[tokio::test]
async fn rename_round_trip_keeps_parent() {
    let hub = Hub::new();
    let s = &hub.service;

    s.create_folder(Some("/a".into()), Some("Week 1".into()))
        .await
        .unwrap();
    let node = s
        .rename_folder(Some("/a/Week 1".into()), Some("Week One".into()))
        .await
        .unwrap();
    assert_eq!(node.path, "/a/Week One");

    let (dirs, _) = hub.names_in("/a").await;
    assert_eq!(dirs, vec!["Week One"]);
}

#[tokio::test]
async fn case_only_folder_rename() {
    let hub = Hub::new();
    let s = &hub.service;
    fs::create_dir(hub.root().join("Folder")).unwrap();

    let node = s
        .rename_folder(Some("/Folder".into()), Some("folder".into()))
        .await
        .unwrap();

    assert_eq!(node.path, "/folder");
    let (dirs, _) = hub.names_in("/").await;
    assert_eq!(dirs, vec!["a", "folder"]);
}

#[tokio::test]
async fn missing_fields_are_invalid_input() {
    let hub = Hub::new();
    let s = &hub.service;

    let err = s.create_folder(None, Some("x".into())).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    let err = s
        .rename_folder(Some("/a".into()), None)
        .await
        .unwrap_err();
    assert_eq!(err.public_message(), "Missing newName");
    let err = s.delete_file(None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    let err = s.upload_file(Some("/a".into()), None).await.unwrap_err();
    assert_eq!(err.public_message(), "Missing file");
}

// ============================================================================
// Files
// ============================================================================

#[tokio::test]
async fn repeated_uploads_are_numbered() {
    let hub = Hub::new();
    let s = &hub.service;

    let mut names = Vec::new();
    for _ in 0..3 {
        let file = hub.scratch_upload("report.pdf", "application/pdf");
        names.push(s.upload_file(Some("/a".into()), Some(file)).await.unwrap().name);
    }

    assert_eq!(names, vec!["report.pdf", "report (2).pdf", "report (3).pdf"]);
    let (_, files) = hub.names_in("/a").await;
    assert_eq!(files, vec!["report (2).pdf", "report (3).pdf", "report.pdf"]);
    assert_eq!(fs::read_dir(s.scratch_dir()).unwrap().count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_uploads_of_one_name_keep_every_file() {
    let hub = Hub::new();
    let mut tasks = Vec::new();
    for i in 0..8 {
        let temp_location = hub
            .service
            .scratch_dir()
            .join(format!("{i}-{}", hub_files::scratch_file_name("report.pdf")));
        fs::write(&temp_location, format!("upload {i}")).unwrap();
        let file = IncomingFile {
            original_name: "report.pdf".into(),
            mime_hint: Some("application/pdf".into()),
            temp_location,
            byte_size: 8,
        };
        let service = hub.service.clone();
        tasks.push(tokio::spawn(async move {
            service.upload_file(Some("/a".into()), Some(file)).await
        }));
    }

    let mut names = Vec::new();
    for task in tasks {
        names.push(task.await.unwrap().unwrap().name);
    }
    names.sort();
    names.dedup();
    assert_eq!(names.len(), 8);

    let mut contents: Vec<String> = names
        .iter()
        .map(|n| fs::read_to_string(hub.root().join("a").join(n)).unwrap())
        .collect();
    contents.sort();
    let expected: Vec<String> = (0..8).map(|i| format!("upload {i}")).collect();
    assert_eq!(contents, expected);
    assert_eq!(fs::read_dir(hub.service.scratch_dir()).unwrap().count(), 0);
}

#[tokio::test]
async fn upload_without_path_discards_scratch() {
    let hub = Hub::new();
    let file = hub.scratch_upload("report.pdf", "application/pdf");
    let temp = file.temp_location.clone();

    let err = hub.service.upload_file(None, Some(file)).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(!temp.exists());
}

#[tokio::test]
async fn unsupported_upload_is_415_kind() {
    let hub = Hub::new();
    let file = hub.scratch_upload("slides.pptx", "application/octet-stream");

    let err = hub
        .service
        .upload_file(Some("/a".into()), Some(file))
        .await
        .unwrap_err();

    assert!(matches!(err, ContentError::UnsupportedMediaType(_)));
    assert_eq!(err.kind(), ErrorKind::UnsupportedMediaType);
}

#[tokio::test]
async fn file_rename_keeps_allowed_types() {
    let hub = Hub::new();
    let s = &hub.service;
    let file = hub.scratch_upload("lesson.mp4", "video/mp4");
    let node = s.upload_file(Some("/a".into()), Some(file)).await.unwrap();

    let err = s
        .rename_file(Some(node.path.clone()), Some("notes".into()))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let renamed = s
        .rename_file(Some(node.path), Some("notes.mp4".into()))
        .await
        .unwrap();
    assert!(renamed.path.ends_with("/notes.mp4"));

    s.delete_file(Some(renamed.path)).await.unwrap();
    let (_, files) = hub.names_in("/a").await;
    assert!(files.is_empty());
}

#[tokio::test]
async fn catalogue_walks_subjects() {
    let hub = Hub::new();
    fs::create_dir_all(hub.root().join("math/Grade 7")).unwrap();
    fs::write(hub.root().join("math/Grade 7/fractions.pdf"), b"x").unwrap();
    fs::write(hub.root().join("a/intro.mp4"), b"xy").unwrap();

    let modules = hub.service.catalogue().await.unwrap();

    let rels: Vec<&str> = modules.iter().map(|m| m.rel.as_str()).collect();
    assert_eq!(rels, vec!["/math/Grade 7/fractions.pdf", "/a/intro.mp4"]);
    assert_eq!(modules[0].breadcrumbs, "math / grade 7");
}
